use serenity::async_trait;
use serenity::http::Http;
use serenity::model::id::ChannelId;
use std::sync::Arc;

use crate::error::ReplyError;

/// Outbound side of the chat transport.
#[async_trait]
pub trait ChatResponder: Send + Sync {
    async fn send(&self, channel_id: u64, content: &str) -> Result<(), ReplyError>;
}

pub struct SerenityResponder {
    http: Arc<Http>,
}

impl SerenityResponder {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ChatResponder for SerenityResponder {
    async fn send(&self, channel_id: u64, content: &str) -> Result<(), ReplyError> {
        if channel_id == 0 {
            return Err(ReplyError::Delivery {
                channel_id,
                reason: "channel id must be non-zero".to_string(),
            });
        }
        ChannelId::new(channel_id)
            .say(self.http.as_ref(), content)
            .await
            .map(|_| ())
            .map_err(|e| ReplyError::Delivery {
                channel_id,
                reason: e.to_string(),
            })
    }
}
