use std::collections::HashMap;
use std::fs;

use chrono::Duration;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_WEB_APP_URL: &str = "http://localhost:5173";
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 30;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Key/value pairs read from a dotenv-style file.
#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(ConfigError::Syntax {
                    line: idx + 1,
                    content: line.to_string(),
                });
            };
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            values.insert(key.trim().to_string(), value.to_string());
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Bot,
    Console,
}

impl RunMode {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bot" => Ok(RunMode::Bot),
            "console" | "cli" => Ok(RunMode::Console),
            _ => Err(ConfigError::Invalid {
                key: "RUN_MODE",
                value: value.to_string(),
            }),
        }
    }
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub run_mode: RunMode,
    /// Present whenever `run_mode` is `Bot`.
    pub bot_token: Option<String>,
    pub port: u16,
    /// Serialized origin of the trusted viewer app, e.g. `http://localhost:5173`.
    pub viewer_origin: String,
    pub session_ttl: Duration,
    pub sweep_interval: std::time::Duration,
}

impl Settings {
    /// Resolves settings through `lookup`, which should consult the config
    /// file before the process environment.
    pub fn resolve<F>(lookup: F, run_mode_override: Option<RunMode>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let run_mode = match run_mode_override {
            Some(mode) => mode,
            None => lookup("RUN_MODE")
                .map(|v| RunMode::parse(&v))
                .transpose()?
                .unwrap_or(RunMode::Bot),
        };

        let bot_token = lookup("DISCORD_BOT_TOKEN").filter(|t| !t.trim().is_empty());
        if run_mode == RunMode::Bot && bot_token.is_none() {
            return Err(ConfigError::Missing {
                key: "DISCORD_BOT_TOKEN",
            });
        }

        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?;
        let web_app_url = lookup("WEB_APP_URL").unwrap_or_else(|| DEFAULT_WEB_APP_URL.to_string());
        let viewer_origin = parse_origin(&web_app_url)?;

        let ttl_minutes: i64 = parse_or(
            "SESSION_TTL_MINUTES",
            lookup("SESSION_TTL_MINUTES"),
            DEFAULT_SESSION_TTL_MINUTES,
        )?;
        if ttl_minutes <= 0 {
            return Err(ConfigError::Invalid {
                key: "SESSION_TTL_MINUTES",
                value: ttl_minutes.to_string(),
            });
        }
        let sweep_secs: u64 = parse_or(
            "SWEEP_INTERVAL_SECS",
            lookup("SWEEP_INTERVAL_SECS"),
            DEFAULT_SWEEP_INTERVAL_SECS,
        )?;
        if sweep_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "SWEEP_INTERVAL_SECS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            run_mode,
            bot_token,
            port,
            viewer_origin,
            session_ttl: Duration::minutes(ttl_minutes),
            sweep_interval: std::time::Duration::from_secs(sweep_secs),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn parse_origin(raw: &str) -> Result<String, ConfigError> {
    let invalid = || ConfigError::Invalid {
        key: "WEB_APP_URL",
        value: raw.to_string(),
    };
    let url = Url::parse(raw).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid());
    }
    Ok(url.origin().ascii_serialization())
}
