pub mod conversation;
pub mod discord;
pub mod responder;
pub mod web;
