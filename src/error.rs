use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} is required")]
    Missing { key: &'static str },
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config line {line}: {content}")]
    Syntax { line: usize, content: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookingError {
    #[error("booking draft is missing its {0}")]
    IncompleteDraft(&'static str),
}

#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("failed to deliver reply to channel {channel_id}: {reason}")]
    Delivery { channel_id: u64, reason: String },
    #[error("console output closed")]
    ConsoleClosed,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to bind viewer port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },
    #[error("discord client error: {0}")]
    Discord(#[from] serenity::Error),
    #[error("console prompt failed: {0}")]
    Console(#[from] inquire::InquireError),
}
