use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

use crate::error::BookingError;
use crate::models::conversation::{ConversationState, Step};
use crate::models::task::{render_task_summary, Task};

pub const WELCOME_MESSAGE: &str =
    "Welcome to Team Task Calendar Bot! 📅\n\nUse /book to schedule a new task.";
pub const TITLE_PROMPT: &str = "📝 Please enter the task title:";
pub const DESCRIPTION_PROMPT: &str = "📋 Please enter the task description:";
pub const ASSIGNEE_PROMPT: &str = "👤 Please enter the assignee name:";
pub const DATE_PROMPT: &str = "📅 Please enter the date (YYYY-MM-DD):\nExample: 2024-03-20";
pub const TIME_PROMPT: &str = "🕒 Please enter the time (HH:mm):\nExample: 09:00";
pub const INVALID_DATE_MESSAGE: &str =
    "❌ Invalid date. Please use YYYY-MM-DD format with a real calendar date (e.g., 2024-03-20).";
pub const INVALID_TIME_MESSAGE: &str =
    "❌ Invalid time format. Please use HH:mm format (e.g., 09:00).";
pub const FAILURE_MESSAGE: &str =
    "❌ An error occurred. Please try again or use /book to start over.";

static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"));
static TIME_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-1]?[0-9]|2[0-3]):([0-5][0-9])$").expect("time pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Book,
}

impl Command {
    /// Recognizes `/start` and `/book` as the first word of a message.
    pub fn parse(text: &str) -> Option<Self> {
        let first = text.split_whitespace().next()?;
        match first {
            "/start" => Some(Command::Start),
            "/book" => Some(Command::Book),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Input accepted; the dialogue moves on to `state.step`.
    Advanced { state: ConversationState, reply: String },
    /// Input rejected; the stored state stays exactly as it was.
    Rejected { step: Step, reply: String },
    /// The last field was filled in and the task is ready to broadcast.
    Completed { task: Task, reply: String },
}

/// Opens a fresh dialogue at the title step.
pub fn start_booking(now: DateTime<Utc>) -> (ConversationState, &'static str) {
    (ConversationState::new(now), TITLE_PROMPT)
}

/// Feeds one message into the dialogue.
pub fn advance(
    mut state: ConversationState,
    input: &str,
    now: DateTime<Utc>,
) -> Result<StepOutcome, BookingError> {
    let (next, prompt) = match state.step {
        Step::AwaitingTitle => {
            state.draft.title = Some(input.to_string());
            (Step::AwaitingDescription, DESCRIPTION_PROMPT)
        }
        Step::AwaitingDescription => {
            state.draft.description = Some(input.to_string());
            (Step::AwaitingAssignee, ASSIGNEE_PROMPT)
        }
        Step::AwaitingAssignee => {
            state.draft.assignee = Some(input.to_string());
            (Step::AwaitingDate, DATE_PROMPT)
        }
        Step::AwaitingDate => {
            let Some(date) = parse_date(input) else {
                return Ok(StepOutcome::Rejected {
                    step: Step::AwaitingDate,
                    reply: INVALID_DATE_MESSAGE.to_string(),
                });
            };
            state.draft.date = Some(date);
            (Step::AwaitingTime, TIME_PROMPT)
        }
        Step::AwaitingTime => {
            let Some(time_slot) = parse_time_slot(input) else {
                return Ok(StepOutcome::Rejected {
                    step: Step::AwaitingTime,
                    reply: INVALID_TIME_MESSAGE.to_string(),
                });
            };
            let task = state.draft.complete(time_slot)?;
            let reply = render_task_summary(&task);
            return Ok(StepOutcome::Completed { task, reply });
        }
    };

    state.step = next;
    state.last_activity_at = now;
    Ok(StepOutcome::Advanced {
        state,
        reply: prompt.to_string(),
    })
}

/// Accepts `YYYY-MM-DD` naming a real calendar day.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if !DATE_SHAPE.is_match(input) {
        return None;
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

/// Accepts `H:MM` or `HH:MM` on a 24-hour clock and returns it zero-padded.
pub fn parse_time_slot(input: &str) -> Option<String> {
    let caps = TIME_SHAPE.captures(input.trim())?;
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    Some(time.format("%H:%M").to_string())
}
