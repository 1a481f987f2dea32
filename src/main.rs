#![allow(non_snake_case)]

use std::env;

use clap::Parser;
use taskCalendarBot::cli::Cli;
use taskCalendarBot::config::{AppConfig, Settings};
use taskCalendarBot::error::ConfigError;
use taskCalendarBot::runtime;

const DEFAULT_LOG_FILTER: &str = "taskCalendarBot=info,serenity=warn,warp=info";

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    tracing::info!(mode = ?settings.run_mode, port = settings.port, "starting task calendar bot");
    if let Err(e) = runtime::run(settings).await {
        tracing::error!(error = %e, "bot stopped");
        std::process::exit(1);
    }
}

fn load_settings(cli: &Cli) -> Result<Settings, ConfigError> {
    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    let get_prop = |key: &str| -> Option<String> { config.get(key).or_else(|| env::var(key).ok()) };

    let mut settings = Settings::resolve(get_prop, cli.run_mode())?;
    if let Some(port) = cli.port {
        settings.port = port;
    }
    Ok(settings)
}
