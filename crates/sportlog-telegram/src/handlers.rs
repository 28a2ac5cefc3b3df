//! Command handlers for the Telegram bot.

use std::sync::Arc;

use sportlog_core::random_tip;
use teloxide::prelude::*;
use teloxide::types::ChatAction;
use teloxide::utils::command::BotCommands;
use tracing::{debug, info};

use crate::state::BotState;

/// Bot commands that can be invoked with /.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "snake_case", description = "Доступные команды:")]
pub enum Command {
    #[command(description = "Начать и получить подсказку")]
    Start,

    #[command(description = "Показать список команд")]
    Help,

    #[command(description = "Отчёт по последним тренировкам")]
    Report,

    #[command(description = "Персональный анализ стиля тренировок")]
    Analysis,

    #[command(description = "Разбор последней тренировки")]
    AnalysisLast,

    #[command(description = "Анализ за 7 дней")]
    AnalysisWeek,

    #[command(description = "Анализ всех тренировок")]
    AnalysisAll,
}

/// Welcome text, reflecting which backends are live.
pub fn welcome_text(state: &BotState) -> String {
    format!(
        "👋 AI Спортдневник\n\n\
        ✍️ Просто напиши тренировку, например:\n\
        Бег 5 км, устал\n\
        Коньки, 45 мин, легко\n\n\
        📊 Команды:\n\
        /report — отчёт по последним тренировкам\n\
        /analysis — персональный анализ\n\
        /analysis_last — последняя тренировка\n\
        /analysis_week — отчёт за 7 дней\n\
        /analysis_all — все тренировки\n\n\
        Хранилище: {}\n\
        AI: {}",
        state.store_name(),
        state.ai_provider_name().unwrap_or("не подключён (только статистика)")
    )
}

/// Handle the /start command.
pub async fn handle_start(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    bot.send_message(msg.chat.id, welcome_text(&state)).await?;
    info!(
        chat_id = %msg.chat.id,
        user = ?msg.from.as_ref().map(|u| &u.username),
        "User started bot"
    );
    Ok(())
}

/// Handle the /help command.
pub async fn handle_help(bot: Bot, msg: Message) -> ResponseResult<()> {
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}

/// Run a report-producing command with a progress note and typing indicator.
async fn send_report<F, Fut>(
    bot: Bot,
    msg: Message,
    progress: Option<&str>,
    make: F,
) -> ResponseResult<()>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = String>,
{
    if let Some(progress) = progress {
        bot.send_message(msg.chat.id, progress).await?;
    }
    let _ = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await;

    let text = make().await;
    bot.send_message(msg.chat.id, text).await?;
    debug!(chat_id = %msg.chat.id, "Report sent");
    Ok(())
}

/// Dispatch a parsed command.
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: Arc<BotState>,
) -> ResponseResult<()> {
    match cmd {
        Command::Start => handle_start(bot, msg, state).await,
        Command::Help => handle_help(bot, msg).await,
        Command::Report => {
            send_report(bot, msg, Some("📊 Генерирую отчёт..."), || async {
                format!("📈 Отчёт:\n\n{}", state.weekly_report().await)
            })
            .await
        }
        Command::Analysis => {
            send_report(bot, msg, None, || async {
                format!("🎯 Твой анализ:\n\n{}", state.personal_analysis().await)
            })
            .await
        }
        Command::AnalysisLast => send_report(bot, msg, None, || state.analysis_last()).await,
        Command::AnalysisWeek => send_report(bot, msg, None, || state.analysis_week()).await,
        Command::AnalysisAll => send_report(bot, msg, None, || state.analysis_all()).await,
    }
}

/// Handle a plain text message: log it as a training session.
pub async fn handle_message(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let _ = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await;
    let logged = state.log_training(text).await;
    info!(
        chat_id = %msg.chat.id,
        activity = %logged.record.activity,
        saved = logged.is_saved(),
        "Training message handled"
    );

    bot.send_message(msg.chat.id, logged.reply_text(random_tip()))
        .await?;
    Ok(())
}

/// Reply to a `/command` the bot does not know.
pub async fn handle_unknown_command(bot: Bot, msg: Message) -> ResponseResult<()> {
    if let Some(text) = msg.text() {
        info!(cmd = %text, "Unrecognized command");
        bot.send_message(
            msg.chat.id,
            format!(
                "Неизвестная команда: {}\n\nСписок команд: /help",
                text.split_whitespace().next().unwrap_or(text)
            ),
        )
        .await?;
    }
    Ok(())
}
