//! Prompts sent to the AI provider.

use crate::analytics::WorkoutRow;

/// System prompt shared by every request.
pub const SYSTEM_PROMPT: &str =
    "Ты профессиональный фитнес-тренер. Отвечай кратко и по делу на русском языке.";

/// One line per row: `- date: activity (quantity), feeling`.
pub fn format_rows(rows: &[WorkoutRow]) -> String {
    rows.iter()
        .map(|r| format!("- {}: {} ({}), {}", r.date, r.activity, r.quantity, r.feeling))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full weekly report: summary, statistics table, motivation, advice.
pub fn weekly_report_prompt(rows: &[WorkoutRow]) -> String {
    format!(
        r#"Ты — AI-коуч по фитнесу. На основе этих данных тренировок за неделю:

**Данные:**
{}

Создай **ПОЛНЫЙ ОТЧЁТ**:

### 1. КОНСПЕКТ НЕДЕЛИ
Что делал, сколько сеансов, ключевые активности.

### 2. СТАТИСТИКА И БАЛАНС
Таблица: вид активности, количество раз, суммарное время.

### 3. МОТИВАЦИЯ
3 предложения позитивного вывода.

### 4. РЕКОМЕНДАЦИИ
3-4 совета на следующую неделю.

**Стиль:** минималистичный, структурированный, Markdown."#,
        format_rows(rows)
    )
}

/// Personal training-style analysis.
pub fn personal_analysis_prompt(rows: &[WorkoutRow]) -> String {
    format!(
        r#"На основе лога тренировок:
{}

Создай **ПЕРСОНАЛЬНЫЙ АНАЛИЗ**:

1. **МОЙ СТИЛЬ ТРЕНИРОВОК:** какой я спортсмен?
2. **СИЛЬНЫЕ СТОРОНЫ:** что хорошо получается?
3. **ПУТИ РАЗВИТИЯ:** где улучшить?
4. **ДОЛГОСРОЧНЫЙ ПЛАН:** 5 целей на сезон.

**Тон:** мотивирующий, персональный, как разговор с другом."#,
        format_rows(rows)
    )
}

/// Regularity/load/variety overview of many sessions.
pub fn overview_prompt(rows: &[WorkoutRow]) -> String {
    format!(
        "Проанализируй эти тренировки: регулярность, нагрузку, разнообразие и баланс.\n\
         Сделай вывод и практические рекомендации, обязательно закончи мотивирующим советом.\n\
         Пиши 4–7 предложений без списков.\n\n{}",
        format_rows(rows)
    )
}

/// Short comment on a single session.
pub fn single_session_prompt(row: &WorkoutRow) -> String {
    format!(
        "Проанализируй эту одну тренировку: вид нагрузки, длительность и самочувствие.\n\
         Сделай краткий вывод (2–4 предложения) только про эту тренировку.\n\n{}",
        format_rows(std::slice::from_ref(row))
    )
}
