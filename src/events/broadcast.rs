use serde::Serialize;
use tokio::sync::broadcast;

use crate::models::task::Task;

pub const DEFAULT_CAPACITY: usize = 64;

/// Events pushed to calendar viewers.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "event", content = "data")]
pub enum CalendarEvent {
    #[serde(rename = "newTask")]
    NewTask(Task),
}

impl CalendarEvent {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Fan-out of completed tasks to whoever is subscribed at publish time.
/// Nothing is retained for later subscribers.
#[derive(Clone)]
pub struct TaskBroadcaster {
    tx: broadcast::Sender<CalendarEvent>,
}

impl TaskBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CalendarEvent> {
        self.tx.subscribe()
    }

    /// Returns how many viewers the task was handed to.
    pub fn publish(&self, task: Task) -> usize {
        let task_id = task.id.clone();
        match self.tx.send(CalendarEvent::NewTask(task)) {
            Ok(viewers) => {
                tracing::info!(task_id = %task_id, viewers, "broadcast new task");
                viewers
            }
            Err(_) => {
                tracing::debug!(task_id = %task_id, "no viewers connected; task dropped");
                0
            }
        }
    }

    pub fn viewer_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for TaskBroadcaster {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
