use std::future::Future;
use tokio::task::JoinHandle;

/// Collects background jobs and spawns them together once wiring is done.
#[derive(Default)]
pub struct TaskRunner {
    tasks: Vec<(&'static str, Box<dyn FnOnce() -> JoinHandle<()> + Send>)>,
}

impl TaskRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_task<F, Fut>(&mut self, name: &'static str, task: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.tasks.push((name, Box::new(move || tokio::spawn(task()))));
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn start_all(self) -> Vec<JoinHandle<()>> {
        self.tasks
            .into_iter()
            .map(|(name, spawn)| {
                tracing::debug!(task = name, "starting background task");
                spawn()
            })
            .collect()
    }
}
