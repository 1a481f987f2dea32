pub mod session_sweeper;
pub mod task_runner;
