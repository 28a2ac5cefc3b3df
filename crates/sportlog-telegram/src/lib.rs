//! Telegram bot interface for Sportlog.
//!
//! Users send free-text training notes ("Бег 5 км, устал"); the bot parses
//! them, appends a row to the training sheet and answers with the parsed
//! record. Commands request AI-written reports over the log, falling back to
//! plain statistics when no AI provider is reachable.
//!
//! # Environment Variables
//!
//! See [`sportlog_core::config`] for the full list. At minimum
//! `TELEGRAM_BOT_TOKEN` must be set.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use sportlog_core::MemoryStore;
//! use sportlog_telegram::{create_shared_state, TelegramBot};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = create_shared_state(Arc::new(MemoryStore::demo()), None);
//!     let bot = TelegramBot::new(std::env::var("TELEGRAM_BOT_TOKEN")?, state)?;
//!     bot.start_polling().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Commands
//!
//! - `/start` - Welcome message and usage
//! - `/help` - Show available commands
//! - `/report` - Report over the latest sessions
//! - `/analysis` - Personal training-style analysis
//! - `/analysis_last` - Comment on the latest session
//! - `/analysis_week` - Overview of the last 7 days
//! - `/analysis_all` - Overview of the whole log

pub mod bot;
pub mod error;
pub mod handlers;
pub mod state;

pub use bot::TelegramBot;
pub use error::{BotError, Result};
pub use handlers::Command;
pub use state::{create_shared_state, BotState, LoggedTraining};
