//! Configuration for Sportlog.
//!
//! Paths live under `~/.sportlog/` (override with `SPORTLOG_STATE_DIR`):
//!
//! ```text
//! ~/.sportlog/
//! └── .env          # Secrets loaded at startup
//! ```
//!
//! # Environment Variables
//!
//! Required:
//! - `TELEGRAM_BOT_TOKEN`: Bot token from @BotFather
//!
//! Spreadsheet (optional; without it the bot keeps an in-memory log):
//! - `GOOGLE_SHEET_ID`: Target spreadsheet ID
//! - `GOOGLE_CREDENTIALS_JSON_PATH`: Service-account key (default: `credentials.json`)
//! - `GOOGLE_SHEET_RANGE`: Log range (default: `A:D`)
//!
//! AI provider (optional; GigaChat wins when both are set):
//! - `GIGACHAT_CLIENT_ID`, `GIGACHAT_CLIENT_SECRET`
//! - `GIGACHAT_SCOPE` (default: `GIGACHAT_API_PERS`), `GIGACHAT_MODEL` (default: `GigaChat`)
//! - `GIGACHAT_CA_CERT`: Extra root certificate for the GigaChat endpoints
//! - `OPENAI_API_KEY`, `OPENAI_MODEL` (default: `gpt-4o-mini`)

use std::path::PathBuf;
use std::sync::OnceLock;

use thiserror::Error;

use crate::ai::{AiProvider, DEFAULT_GIGACHAT_MODEL, DEFAULT_GIGACHAT_SCOPE, DEFAULT_OPENAI_MODEL};
use crate::store::DEFAULT_RANGE;

/// Environment variable for custom state directory.
pub const STATE_DIR_ENV: &str = "SPORTLOG_STATE_DIR";

/// Default state directory name under home.
const DEFAULT_STATE_DIR: &str = ".sportlog";

/// Default service-account key path.
pub const DEFAULT_CREDENTIALS_PATH: &str = "credentials.json";

static STATE_DIR_CACHE: OnceLock<PathBuf> = OnceLock::new();

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("{0} not set")]
    Missing(&'static str),

    /// A variable is set but unusable.
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Get the Sportlog state directory.
///
/// 1. `SPORTLOG_STATE_DIR` if set
/// 2. `~/.sportlog` if the home directory is known
/// 3. `.sportlog` in the current directory
pub fn state_dir() -> PathBuf {
    STATE_DIR_CACHE
        .get_or_init(|| {
            std::env::var(STATE_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    dirs::home_dir()
                        .map(|h| h.join(DEFAULT_STATE_DIR))
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
                })
        })
        .clone()
}

/// The `.env` file inside the state directory.
pub fn env_file() -> PathBuf {
    state_dir().join(".env")
}

/// Spreadsheet settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetConfig {
    pub sheet_id: String,
    pub credentials_path: PathBuf,
    pub range: String,
}

/// Everything the bot needs at startup.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub telegram_token: String,
    pub sheet: Option<SheetConfig>,
    pub ai: Option<AiProvider>,
}

impl BotConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup (tests, alternate sources).
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let get_path =
            |key: &str| get(key).map(|p| PathBuf::from(shellexpand::tilde(&p).into_owned()));

        let telegram_token =
            get("TELEGRAM_BOT_TOKEN").ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))?;

        let sheet = get("GOOGLE_SHEET_ID").map(|sheet_id| SheetConfig {
            sheet_id,
            credentials_path: get_path("GOOGLE_CREDENTIALS_JSON_PATH")
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_PATH)),
            range: get("GOOGLE_SHEET_RANGE").unwrap_or_else(|| DEFAULT_RANGE.to_string()),
        });

        let gigachat = match (get("GIGACHAT_CLIENT_ID"), get("GIGACHAT_CLIENT_SECRET")) {
            (Some(client_id), Some(client_secret)) => Some(AiProvider::GigaChat {
                client_id,
                client_secret,
                scope: get("GIGACHAT_SCOPE")
                    .unwrap_or_else(|| DEFAULT_GIGACHAT_SCOPE.to_string()),
                model: get("GIGACHAT_MODEL")
                    .unwrap_or_else(|| DEFAULT_GIGACHAT_MODEL.to_string()),
                ca_cert: get_path("GIGACHAT_CA_CERT"),
            }),
            (Some(_), None) => {
                return Err(ConfigError::Invalid {
                    name: "GIGACHAT_CLIENT_SECRET",
                    reason: "required when GIGACHAT_CLIENT_ID is set".to_string(),
                })
            }
            (None, Some(_)) => {
                return Err(ConfigError::Invalid {
                    name: "GIGACHAT_CLIENT_ID",
                    reason: "required when GIGACHAT_CLIENT_SECRET is set".to_string(),
                })
            }
            (None, None) => None,
        };

        let ai = gigachat.or_else(|| {
            get("OPENAI_API_KEY").map(|api_key| AiProvider::OpenAi {
                api_key,
                model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            })
        });

        Ok(Self {
            telegram_token,
            sheet,
            ai,
        })
    }
}
