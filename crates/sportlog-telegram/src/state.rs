//! Shared state for the Telegram bot.

use std::sync::Arc;

use chrono::{Duration, Local, NaiveDateTime};
use sportlog_core::report::{
    overview_prompt, personal_analysis_prompt, single_session_prompt, weekly_report_prompt,
};
use sportlog_core::{
    ask_or_fallback, inactivity_warning, parse_training, random_tip, since, AiClient, Clock,
    StoreError, SystemClock, TrainingRecord, TrainingStore, WorkoutRow, NO_DATA_MESSAGE,
};
use tracing::{info, warn};

/// Rows fed into the weekly `/report`.
pub const REPORT_ROWS: usize = 7;

/// Days covered by `/analysis_week`.
pub const WEEK_DAYS: i64 = 7;

/// Reply when the log has no rows yet.
pub const EMPTY_LOG_MESSAGE: &str = "Пока нет записей тренировок.";

/// Reply when the log cannot be read.
pub const STORE_UNAVAILABLE_MESSAGE: &str =
    "⚠️ Не удалось прочитать дневник тренировок. Попробуй позже.";

/// Outcome of logging one training message.
#[derive(Debug)]
pub struct LoggedTraining {
    /// What the parser extracted.
    pub record: TrainingRecord,
    /// The row handed to the store.
    pub row: WorkoutRow,
    /// Reminder shown when the previous session was long ago.
    pub warning: Option<&'static str>,
    /// Comment on this session, from the AI provider or offline statistics.
    pub analysis: String,
    /// Why the row could not be saved, if it could not.
    pub store_error: Option<StoreError>,
}

impl LoggedTraining {
    /// Whether the row reached the store.
    pub fn is_saved(&self) -> bool {
        self.store_error.is_none()
    }

    /// Text sent back to the user.
    pub fn reply_text(&self, tip: &str) -> String {
        let mut text = String::new();
        if let Some(warning) = self.warning {
            text.push_str(warning);
            text.push_str("\n\n");
        }

        if self.is_saved() {
            text.push_str("✅ Тренировка записана!\n");
        } else {
            text.push_str("⚠️ Тренировку распознал, но записать в таблицу не получилось.\n");
        }

        text.push_str(&format!(
            "📅 {}\n🏃 {}\n⏱️ {}\n😊 {}\n\n{}\n\n💡 Совет: {}",
            self.row.date,
            self.record.activity,
            self.record.quantity,
            self.record.feeling,
            self.analysis,
            tip
        ));
        text
    }
}

/// Shared state for the Telegram bot, accessible across all handlers.
pub struct BotState {
    /// Where training rows live.
    store: Arc<dyn TrainingStore>,
    /// AI provider client, if configured.
    ai: Option<AiClient>,
    /// Time source for stamping rows and windowing reports.
    clock: Arc<dyn Clock>,
}

impl BotState {
    /// Create state on the wall clock.
    pub fn new(store: Arc<dyn TrainingStore>, ai: Option<AiClient>) -> Self {
        Self::with_clock(store, ai, Arc::new(SystemClock))
    }

    /// Create state with a custom clock.
    pub fn with_clock(
        store: Arc<dyn TrainingStore>,
        ai: Option<AiClient>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { store, ai, clock }
    }

    /// Whether an AI provider is configured.
    pub fn has_ai(&self) -> bool {
        self.ai.is_some()
    }

    /// Name of the AI provider, if any.
    pub fn ai_provider_name(&self) -> Option<&'static str> {
        self.ai.as_ref().map(|c| c.provider().name())
    }

    /// Name of the storage backend.
    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    /// Current local time, as written into the sheet.
    pub fn now_local(&self) -> NaiveDateTime {
        self.clock.now().with_timezone(&Local).naive_local()
    }

    /// Parse a message, append it to the log and comment on the session.
    ///
    /// Never fails: a storage error is reported in the result so the caller
    /// can still acknowledge the message. The comment covers the new row only
    /// and is produced even when the row could not be saved.
    pub async fn log_training(&self, text: &str) -> LoggedTraining {
        let record = parse_training(text);
        let now = self.clock.now().with_timezone(&Local);
        let row = WorkoutRow::from_record(&record, &now);

        // Checked against the log before this row lands in it.
        let warning = match self.store.rows().await {
            Ok(rows) => inactivity_warning(&rows, now.naive_local()),
            Err(e) => {
                warn!(error = %e, "Could not read log for inactivity check");
                None
            }
        };

        let store_error = match self.store.append(&row).await {
            Ok(()) => {
                info!(
                    store = self.store.name(),
                    activity = %record.activity,
                    quantity = %record.quantity,
                    "Training logged"
                );
                None
            }
            Err(e) => {
                warn!(store = self.store.name(), error = %e, "Failed to save training");
                Some(e)
            }
        };

        let analysis = self
            .ask(&single_session_prompt(&row), std::slice::from_ref(&row))
            .await;

        LoggedTraining {
            record,
            row,
            warning,
            analysis,
            store_error,
        }
    }

    /// Full weekly report over the last [`REPORT_ROWS`] rows.
    pub async fn weekly_report(&self) -> String {
        match self.store.recent(REPORT_ROWS).await {
            Ok(rows) if rows.is_empty() => EMPTY_LOG_MESSAGE.to_string(),
            Ok(rows) => self.ask(&weekly_report_prompt(&rows), &rows).await,
            Err(e) => store_unavailable(e),
        }
    }

    /// Personal training-style analysis over the whole log.
    pub async fn personal_analysis(&self) -> String {
        match self.store.rows().await {
            Ok(rows) if rows.is_empty() => EMPTY_LOG_MESSAGE.to_string(),
            Ok(rows) => self.ask(&personal_analysis_prompt(&rows), &rows).await,
            Err(e) => store_unavailable(e),
        }
    }

    /// Comment on the latest session, plus a tip.
    pub async fn analysis_last(&self) -> String {
        match self.store.recent(1).await {
            Ok(rows) => match rows.last() {
                Some(last) => {
                    let analysis = self.ask(&single_session_prompt(last), &rows).await;
                    format!("{}\n\n💡 Совет: {}", analysis, random_tip())
                }
                None => EMPTY_LOG_MESSAGE.to_string(),
            },
            Err(e) => store_unavailable(e),
        }
    }

    /// Overview of the last [`WEEK_DAYS`] days.
    pub async fn analysis_week(&self) -> String {
        match self.store.rows().await {
            Ok(rows) => {
                let cutoff = self.now_local() - Duration::days(WEEK_DAYS);
                let week = since(&rows, cutoff);
                if week.is_empty() {
                    return NO_DATA_MESSAGE.to_string();
                }
                self.ask(&overview_prompt(&week), &week).await
            }
            Err(e) => store_unavailable(e),
        }
    }

    /// Overview of every logged session.
    pub async fn analysis_all(&self) -> String {
        match self.store.rows().await {
            Ok(rows) if rows.is_empty() => EMPTY_LOG_MESSAGE.to_string(),
            Ok(rows) => self.ask(&overview_prompt(&rows), &rows).await,
            Err(e) => store_unavailable(e),
        }
    }

    async fn ask(&self, prompt: &str, rows: &[WorkoutRow]) -> String {
        ask_or_fallback(self.ai.as_ref(), prompt, rows).await
    }
}

fn store_unavailable(e: StoreError) -> String {
    warn!(error = %e, "Failed to read training log");
    STORE_UNAVAILABLE_MESSAGE.to_string()
}

/// Create a shared state wrapped in Arc.
pub fn create_shared_state(store: Arc<dyn TrainingStore>, ai: Option<AiClient>) -> Arc<BotState> {
    Arc::new(BotState::new(store, ai))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sportlog_core::{ManualClock, MemoryStore};

    fn row(activity: &str) -> WorkoutRow {
        WorkoutRow {
            date: "2026-01-15 08:00".into(),
            activity: activity.into(),
            quantity: "30 мин".into(),
            feeling: "хорошо".into(),
        }
    }

    #[test]
    fn test_reply_text_saved() {
        let logged = LoggedTraining {
            record: TrainingRecord::new("Бег", "5 км", "устал"),
            row: row("Бег"),
            warning: None,
            analysis: "Ровный темп.".into(),
            store_error: None,
        };
        let text = logged.reply_text("Пей воду.");
        assert!(text.starts_with("✅ Тренировка записана!"));
        assert!(text.contains("🏃 Бег"));
        assert!(text.contains("⏱️ 5 км"));
        assert!(text.contains("😊 устал\n\nРовный темп.\n\n💡"));
        assert!(text.ends_with("💡 Совет: Пей воду."));
    }

    #[test]
    fn test_reply_text_with_warning_and_failure() {
        let logged = LoggedTraining {
            record: TrainingRecord::new("Бег", "5 км", "устал"),
            row: row("Бег"),
            warning: Some("⏰ давно"),
            analysis: "📊 Тренировок: 1".into(),
            store_error: Some(StoreError::Api("403".into())),
        };
        assert!(!logged.is_saved());
        let text = logged.reply_text("tip");
        assert!(text.starts_with("⏰ давно\n\n⚠️"));
        assert!(text.contains("🏃 Бег"));
    }

    #[tokio::test]
    async fn test_empty_log_messages() {
        let state = BotState::new(Arc::new(MemoryStore::new()), None);
        assert_eq!(state.weekly_report().await, EMPTY_LOG_MESSAGE);
        assert_eq!(state.personal_analysis().await, EMPTY_LOG_MESSAGE);
        assert_eq!(state.analysis_last().await, EMPTY_LOG_MESSAGE);
        assert_eq!(state.analysis_all().await, EMPTY_LOG_MESSAGE);
        assert_eq!(state.analysis_week().await, NO_DATA_MESSAGE);
    }

    #[tokio::test]
    async fn test_state_reports_backends() {
        let state = BotState::with_clock(
            Arc::new(MemoryStore::demo()),
            None,
            Arc::new(ManualClock::new(chrono::Utc::now())),
        );
        assert!(!state.has_ai());
        assert_eq!(state.ai_provider_name(), None);
        assert_eq!(state.store_name(), "memory");
    }
}
