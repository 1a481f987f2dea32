use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;

use crate::handlers::conversation::ConversationDriver;
use crate::handlers::responder::SerenityResponder;
use crate::models::conversation::ConversationKey;

pub struct BotHandler {
    driver: ConversationDriver,
}

impl BotHandler {
    pub fn new(driver: ConversationDriver) -> Self {
        BotHandler { driver }
    }
}

#[async_trait]
impl EventHandler for BotHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        tracing::info!(user = %ready.user.name, "connected to discord");
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let key = ConversationKey::new(msg.channel_id.get(), msg.author.id.get());
        let responder = SerenityResponder::new(ctx.http.clone());
        let outcome = self
            .driver
            .handle_text_with(&responder, key, &msg.content)
            .await;
        tracing::trace!(channel_id = key.channel_id, user_id = key.user_id, ?outcome, "message handled");
    }
}
