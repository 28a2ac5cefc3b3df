//! Sportlog Core - training diary logic shared by Sportlog interfaces.
//!
//! - **parser**: Turn free-text messages into training records
//! - **credential_cache**: Time-bounded cache for short-lived bearer tokens
//! - **clock**: Wall-clock and manual time sources
//! - **analytics**: Sheet rows, offline statistics, reminders
//! - **report**: Prompts for AI reports
//! - **ai**: GigaChat/OpenAI chat-completion client
//! - **store**: Google Sheets and in-memory training logs
//! - **config**: Paths and environment configuration

pub mod ai;
pub mod analytics;
pub mod clock;
pub mod config;
pub mod credential_cache;
pub mod parser;
pub mod report;
pub mod store;

pub use ai::{ask_or_fallback, AiClient, AiError, AiProvider};
pub use analytics::{
    by_activity, fallback_summary, inactivity_warning, parse_date, random_tip, since, Totals,
    WorkoutRow, NO_DATA_MESSAGE,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{env_file, state_dir, BotConfig, ConfigError, SheetConfig};
pub use credential_cache::{CachedToken, CredentialCache, TOKEN_TTL_SECS};
pub use parser::{
    parse_positional, parse_structured, parse_training, TrainingRecord, DEFAULT_ACTIVITY,
    DEFAULT_FEELING, UNKNOWN_QUANTITY,
};
pub use store::{MemoryStore, ServiceAccountKey, SheetsStore, StoreError, TrainingStore};
