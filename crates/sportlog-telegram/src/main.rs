//! Sportlog Telegram Bot binary.
//!
//! Start the bot with:
//! ```bash
//! TELEGRAM_BOT_TOKEN=xxx cargo run -p sportlog-telegram
//! ```

use std::sync::Arc;

use clap::Parser;
use sportlog_core::config::{self, BotConfig, ConfigError};
use sportlog_core::{AiClient, MemoryStore, ServiceAccountKey, SheetsStore, TrainingStore};
use sportlog_telegram::{create_shared_state, BotError, TelegramBot};
use tracing_subscriber::EnvFilter;

/// Sportlog Telegram Bot - log workouts and get AI reports
#[derive(Parser, Debug)]
#[command(name = "sportlog-telegram")]
#[command(about = "Telegram training diary with AI reports")]
struct Args {
    /// Keep the log in memory, seeded with sample sessions
    #[arg(long)]
    demo: bool,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn build_store(config: &BotConfig, demo: bool) -> Result<Arc<dyn TrainingStore>, BotError> {
    if demo {
        tracing::info!("Demo mode: using in-memory sample log");
        return Ok(Arc::new(MemoryStore::demo()));
    }

    match &config.sheet {
        Some(sheet) => {
            let key = ServiceAccountKey::from_file(&sheet.credentials_path)?;
            tracing::info!(
                sheet_id = %sheet.sheet_id,
                range = %sheet.range,
                account = %key.client_email,
                "Using Google Sheets log"
            );
            Ok(Arc::new(SheetsStore::new(key, &sheet.sheet_id, &sheet.range)))
        }
        None => {
            tracing::warn!("GOOGLE_SHEET_ID not set, sessions are kept in memory only");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

fn build_ai(config: &BotConfig) -> Option<AiClient> {
    let provider = config.ai.clone()?;
    let name = provider.name();
    match AiClient::new(provider) {
        Ok(client) => {
            tracing::info!(provider = name, "AI provider configured");
            Some(client)
        }
        Err(e) => {
            tracing::warn!(
                provider = name,
                error = %e,
                "AI provider unavailable, using offline statistics"
            );
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load environment variables from the state directory first
    let env_path = config::env_file();
    if env_path.exists() {
        let _ = dotenvy::from_path(&env_path);
    }
    let _ = dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv());

    let filter = match args.verbose {
        0 => "sportlog_telegram=info,sportlog_core=info,teloxide=warn",
        1 => "sportlog_telegram=debug,sportlog_core=debug,teloxide=info",
        2 => "sportlog_telegram=trace,sportlog_core=trace,teloxide=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(filter))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = BotConfig::from_env().map_err(|e| match e {
        ConfigError::Missing("TELEGRAM_BOT_TOKEN") => BotError::NoToken,
        other => BotError::Config(other),
    })?;

    let store = build_store(&config, args.demo)?;
    let ai = build_ai(&config);
    let state = create_shared_state(store, ai);

    let bot = TelegramBot::new(&config.telegram_token, Arc::clone(&state))?;

    match bot.get_me().await {
        Ok(username) => {
            tracing::info!(username = %username, "Bot initialized successfully");
            println!("\n🏋️ Sportlog Telegram Bot");
            println!("   Bot: @{}", username);
            println!("   Storage: {}", state.store_name());
            println!("   AI: {}", state.ai_provider_name().unwrap_or("offline statistics"));
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to get bot info");
            return Err(e.into());
        }
    }

    println!("\n📱 Open Telegram and send /start to begin");
    println!("   Press Ctrl+C to stop\n");

    bot.start_polling().await?;

    Ok(())
}
