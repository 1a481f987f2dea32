pub mod booking_flow;
pub mod session_store;
