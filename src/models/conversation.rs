use chrono::{DateTime, Duration, Utc};
use std::fmt;

use crate::models::task::TaskDraft;

/// Identifies one user's dialogue: replies go to `channel_id`, and
/// `user_id` keeps people sharing a channel apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversationKey {
    pub channel_id: u64,
    pub user_id: u64,
}

impl ConversationKey {
    pub fn new(channel_id: u64, user_id: u64) -> Self {
        Self {
            channel_id,
            user_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    AwaitingTitle,
    AwaitingDescription,
    AwaitingAssignee,
    AwaitingDate,
    AwaitingTime,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::AwaitingTitle => "awaiting_title",
            Step::AwaitingDescription => "awaiting_description",
            Step::AwaitingAssignee => "awaiting_assignee",
            Step::AwaitingDate => "awaiting_date",
            Step::AwaitingTime => "awaiting_time",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationState {
    pub step: Step,
    pub draft: TaskDraft,
    pub last_activity_at: DateTime<Utc>,
}

impl ConversationState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            step: Step::AwaitingTitle,
            draft: TaskDraft::default(),
            last_activity_at: now,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.last_activity_at > ttl
    }
}
