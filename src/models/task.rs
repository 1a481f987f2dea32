use chrono::NaiveDate;
use std::borrow::Cow;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::BookingError;

/// A fully specified booking, as broadcast to calendar viewers.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub assignee: String,
    pub date: NaiveDate,
    /// Zero-padded `HH:MM`.
    pub time_slot: String,
}

/// Fields collected so far in a booking dialogue.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assignee: Option<String>,
    pub date: Option<NaiveDate>,
}

impl TaskDraft {
    pub fn is_empty(&self) -> bool {
        *self == TaskDraft::default()
    }

    /// Seals the draft into a task with a fresh id.
    pub fn complete(self, time_slot: String) -> Result<Task, BookingError> {
        Ok(Task {
            id: Uuid::new_v4().to_string(),
            title: self.title.ok_or(BookingError::IncompleteDraft("title"))?,
            description: self
                .description
                .ok_or(BookingError::IncompleteDraft("description"))?,
            assignee: self.assignee.ok_or(BookingError::IncompleteDraft("assignee"))?,
            date: self.date.ok_or(BookingError::IncompleteDraft("date"))?,
            time_slot,
        })
    }
}

/// Longest echo of a free-text field in the confirmation, in characters.
/// Three fields at this size stay under Discord's 2000-character message cap.
pub const SUMMARY_FIELD_LIMIT: usize = 400;

fn clip(text: &str, limit: usize) -> Cow<'_, str> {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => Cow::Owned(format!("{}…", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}

pub fn render_task_summary(task: &Task) -> String {
    format!(
        "✅ Task scheduled successfully!\n\n\
         📝 Title: {}\n\
         📋 Description: {}\n\
         👤 Assignee: {}\n\
         📅 Date: {}\n\
         🕒 Time: {}",
        clip(&task.title, SUMMARY_FIELD_LIMIT),
        clip(&task.description, SUMMARY_FIELD_LIMIT),
        clip(&task.assignee, SUMMARY_FIELD_LIMIT),
        task.date.format("%Y-%m-%d"),
        task.time_slot
    )
}
