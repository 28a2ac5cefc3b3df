//! Error types for the Telegram bot.

use sportlog_core::{ConfigError, StoreError};
use thiserror::Error;

/// Errors that can occur in the Telegram bot.
#[derive(Debug, Error)]
pub enum BotError {
    /// Bot token not provided.
    #[error("Telegram bot token not set. Set TELEGRAM_BOT_TOKEN environment variable.")]
    NoToken,

    /// Failed to start the bot.
    #[error("Failed to start bot: {0}")]
    BotStartFailed(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Training log storage error.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for bot operations.
pub type Result<T> = std::result::Result<T, BotError>;
