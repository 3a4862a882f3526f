use thiserror::Error;

/// Failure of a single external lookup.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("lookup aborted")]
    Aborted,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{service} returned HTTP {status}")]
    Status { service: &'static str, status: u16 },
    #[error("{0} returned an unexpected payload")]
    Malformed(&'static str),
}

impl LookupError {
    pub fn is_aborted(&self) -> bool {
        matches!(self, LookupError::Aborted)
    }
}

/// The turn was cancelled before a reply was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("turn aborted")]
pub struct Aborted;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("failed to create database directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("chat {0} not found")]
    ChatNotFound(String),
}
