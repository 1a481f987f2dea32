use clap::{Parser, Subcommand};
use inquire::{InquireError, Text};
use serenity::async_trait;

use crate::config::RunMode;
use crate::error::{ReplyError, StartupError};
use crate::handlers::conversation::ConversationDriver;
use crate::handlers::responder::ChatResponder;
use crate::models::conversation::ConversationKey;

/// The console plays a single user in a single channel.
pub const CONSOLE_KEY: ConversationKey = ConversationKey {
    channel_id: 0,
    user_id: 0,
};

#[derive(Parser, Debug)]
#[command(name = "task-calendar-bot", about = "Books team tasks over chat and streams them to a live calendar")]
pub struct Cli {
    /// Dotenv-style file whose values take precedence over the environment.
    #[arg(long, env = "CONFIG_FILE")]
    pub config: Option<String>,
    #[arg(long)]
    pub port: Option<u16>,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Serve the Discord bot (default).
    Bot,
    /// Run the booking dialogue from this terminal.
    Console,
}

impl Cli {
    pub fn run_mode(&self) -> Option<RunMode> {
        self.command.map(|command| match command {
            Commands::Bot => RunMode::Bot,
            Commands::Console => RunMode::Console,
        })
    }
}

pub struct ConsoleResponder;

#[async_trait]
impl ChatResponder for ConsoleResponder {
    async fn send(&self, _channel_id: u64, content: &str) -> Result<(), ReplyError> {
        println!("{}", content);
        Ok(())
    }
}

pub async fn run_console(driver: ConversationDriver) -> Result<(), StartupError> {
    println!("Type /book to schedule a task, /quit to exit.");
    let responder = ConsoleResponder;
    loop {
        let line = match tokio::task::spawn_blocking(read_line).await {
            Ok(Ok(line)) => line,
            Ok(Err(InquireError::OperationCanceled | InquireError::OperationInterrupted)) => break,
            Ok(Err(err)) => return Err(err.into()),
            Err(err) => {
                tracing::error!(error = %err, "console reader stopped");
                break;
            }
        };
        if line.trim() == "/quit" {
            break;
        }
        driver.handle_text_with(&responder, CONSOLE_KEY, &line).await;
    }
    Ok(())
}

fn read_line() -> Result<String, InquireError> {
    Text::new(">").prompt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subcommand_selects_run_mode() {
        let cli = Cli::parse_from(["task-calendar-bot", "--port", "4000", "console"]);
        assert_eq!(cli.run_mode(), Some(RunMode::Console));
        assert_eq!(cli.port, Some(4000));

        let cli = Cli::parse_from(["task-calendar-bot"]);
        assert_eq!(cli.run_mode(), None);
    }
}
