use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::events::broadcast::TaskBroadcaster;
use crate::handlers::responder::ChatResponder;
use crate::models::conversation::{ConversationKey, Step};
use crate::models::task::Task;
use crate::service::booking_flow::{
    advance, start_booking, Command, StepOutcome, FAILURE_MESSAGE, WELCOME_MESSAGE,
};
use crate::service::session_store::SessionStore;

/// What a single inbound message did to its conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogueOutcome {
    Ignored,
    Welcomed,
    Started,
    Advanced(Step),
    Rejected(Step),
    Completed(Task),
    Failed,
}

/// Routes inbound chat text through the booking dialogue.
#[derive(Clone)]
pub struct ConversationDriver {
    sessions: Arc<Mutex<SessionStore>>,
    broadcaster: TaskBroadcaster,
    session_ttl: Duration,
}

impl ConversationDriver {
    pub fn new(
        sessions: Arc<Mutex<SessionStore>>,
        broadcaster: TaskBroadcaster,
        session_ttl: Duration,
    ) -> Self {
        Self {
            sessions,
            broadcaster,
            session_ttl,
        }
    }

    pub fn sessions(&self) -> Arc<Mutex<SessionStore>> {
        self.sessions.clone()
    }

    pub async fn handle_text_with(
        &self,
        responder: &dyn ChatResponder,
        key: ConversationKey,
        text: &str,
    ) -> DialogueOutcome {
        self.handle_text_at(responder, key, text, Utc::now()).await
    }

    pub async fn handle_text_at(
        &self,
        responder: &dyn ChatResponder,
        key: ConversationKey,
        text: &str,
        now: DateTime<Utc>,
    ) -> DialogueOutcome {
        let (outcome, reply) = self.process(key, text, now).await;
        if let Some(reply) = reply {
            if let Err(err) = responder.send(key.channel_id, &reply).await {
                tracing::warn!(
                    channel_id = key.channel_id,
                    user_id = key.user_id,
                    error = %err,
                    "failed to send reply"
                );
            }
        }
        outcome
    }

    async fn process(
        &self,
        key: ConversationKey,
        text: &str,
        now: DateTime<Utc>,
    ) -> (DialogueOutcome, Option<String>) {
        if text.trim().is_empty() {
            return (DialogueOutcome::Ignored, None);
        }

        match Command::parse(text) {
            Some(Command::Start) => {
                (DialogueOutcome::Welcomed, Some(WELCOME_MESSAGE.to_string()))
            }
            Some(Command::Book) => {
                let (state, prompt) = start_booking(now);
                let mut sessions = self.sessions.lock().await;
                let replaced = sessions.get(&key).is_some();
                sessions.set(key, state);
                tracing::info!(
                    channel_id = key.channel_id,
                    user_id = key.user_id,
                    replaced,
                    "booking started"
                );
                (DialogueOutcome::Started, Some(prompt.to_string()))
            }
            None => {
                let mut sessions = self.sessions.lock().await;
                let Some(state) = sessions.get_active(&key, now, self.session_ttl).cloned()
                else {
                    return (DialogueOutcome::Ignored, None);
                };
                let step = state.step;

                match advance(state, text, now) {
                    Ok(StepOutcome::Advanced { state, reply }) => {
                        let next = state.step;
                        sessions.set(key, state);
                        tracing::debug!(
                            channel_id = key.channel_id,
                            user_id = key.user_id,
                            %step,
                            %next,
                            "step advanced"
                        );
                        (DialogueOutcome::Advanced(next), Some(reply))
                    }
                    Ok(StepOutcome::Rejected { step, reply }) => {
                        sessions.touch(&key, now);
                        tracing::debug!(
                            channel_id = key.channel_id,
                            user_id = key.user_id,
                            %step,
                            "input rejected"
                        );
                        (DialogueOutcome::Rejected(step), Some(reply))
                    }
                    Ok(StepOutcome::Completed { task, reply }) => {
                        sessions.clear(&key);
                        drop(sessions);
                        tracing::info!(
                            channel_id = key.channel_id,
                            user_id = key.user_id,
                            task_id = %task.id,
                            "booking completed"
                        );
                        self.broadcaster.publish(task.clone());
                        (DialogueOutcome::Completed(task), Some(reply))
                    }
                    Err(err) => {
                        tracing::warn!(
                            channel_id = key.channel_id,
                            user_id = key.user_id,
                            %step,
                            error = %err,
                            "booking step failed"
                        );
                        (DialogueOutcome::Failed, Some(FAILURE_MESSAGE.to_string()))
                    }
                }
            }
        }
    }
}
