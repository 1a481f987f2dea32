use std::sync::Arc;

use serenity::model::gateway::GatewayIntents;
use tokio::sync::Mutex;

use crate::cli;
use crate::config::{RunMode, Settings};
use crate::error::{ConfigError, StartupError};
use crate::events::broadcast::TaskBroadcaster;
use crate::handlers::conversation::ConversationDriver;
use crate::handlers::discord::BotHandler;
use crate::handlers::web;
use crate::service::session_store::SessionStore;
use crate::tasks::session_sweeper::run_session_sweeper;
use crate::tasks::task_runner::TaskRunner;

pub async fn run(settings: Settings) -> Result<(), StartupError> {
    let broadcaster = TaskBroadcaster::default();
    let sessions = Arc::new(Mutex::new(SessionStore::new()));
    let driver = ConversationDriver::new(sessions.clone(), broadcaster.clone(), settings.session_ttl);

    let listener = web::bind_viewer_listener(settings.port).await?;
    tracing::info!(port = settings.port, origin = %settings.viewer_origin, "viewer server listening");

    let mut task_runner = TaskRunner::new();
    task_runner.add_task("viewer-server", {
        let routes = web::routes(broadcaster.clone(), settings.viewer_origin.clone());
        move || async move {
            warp::serve(routes).incoming(listener).run().await;
        }
    });
    task_runner.add_task("session-sweeper", {
        let ttl = settings.session_ttl;
        let interval = settings.sweep_interval;
        move || run_session_sweeper(sessions, ttl, interval)
    });
    let _handles = task_runner.start_all();

    match settings.run_mode {
        RunMode::Bot => {
            let token = settings.bot_token.ok_or(ConfigError::Missing {
                key: "DISCORD_BOT_TOKEN",
            })?;
            run_bot(token, driver).await
        }
        RunMode::Console => cli::run_console(driver).await,
    }
}

async fn run_bot(token: String, driver: ConversationDriver) -> Result<(), StartupError> {
    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;
    let mut client = serenity::Client::builder(token, intents)
        .event_handler(BotHandler::new(driver))
        .await?;

    client.start().await?;
    Ok(())
}
