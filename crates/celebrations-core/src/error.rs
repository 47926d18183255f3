//! Unified error types for Celebrations.

use thiserror::Error;

/// Result type alias using CelebrationsError.
pub type Result<T> = std::result::Result<T, CelebrationsError>;

#[derive(Error, Debug)]
pub enum CelebrationsError {
    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(String),

    #[error("Invalid template: {0}")]
    Template(String),

    // Channel errors
    #[error("Channel error: {0}")]
    Channel(String),

    #[error("Slack API error ({method}): {error}")]
    SlackApi { method: String, error: String },

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("HTTP error: {0}")]
    Http(String),
}

impl CelebrationsError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn template(msg: impl Into<String>) -> Self {
        Self::Template(msg.into())
    }

    pub fn channel(msg: impl Into<String>) -> Self {
        Self::Channel(msg.into())
    }

    pub fn slack_api(method: impl Into<String>, error: impl Into<String>) -> Self {
        Self::SlackApi {
            method: method.into(),
            error: error.into(),
        }
    }
}
