//! Training log rows and offline statistics.
//!
//! Used when no AI provider is available, and for reminders that do not need
//! one (inactivity warnings, motivation tips).

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone};
use rand::seq::SliceRandom;

use crate::parser::{extract_calories, quantity_km, quantity_minutes, TrainingRecord};

/// Format used when stamping new rows.
pub const ROW_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Accepted date formats for rows read back from the sheet.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M", "%Y-%m-%d", "%d.%m.%Y"];

/// Days without training before a reminder is shown.
pub const INACTIVITY_DAYS: i64 = 3;

/// Reply used when there is nothing to analyze.
pub const NO_DATA_MESSAGE: &str = "⚠️ Нет данных для анализа";

const MOTIVATION_TIPS: &[&str] = &[
    "Продолжай в том же духе, ты уже строишь сильную привычку.",
    "Не забывай про восстановление и сон: они усиливают эффект каждой тренировки.",
    "Даже маленькая тренировка лучше, чем её отсутствие.",
    "Старайся фокусироваться на прогрессе, а не на идеале.",
    "Дисциплина важнее мотивации. Просто сделай следующий шаг.",
    "Добавь чуть больше движения в течение дня: шаги, лестница, лёгкая растяжка.",
    "Отслеживай не только цифры, но и самочувствие.",
    "Иногда лучше сделать полегче, чем пропустить тренировку совсем.",
    "Закрепи результат: разминка утром и заминка после тренировки.",
    "Не сравнивай себя с другими, сравнивай себя с собой вчерашним.",
];

/// One row of the training sheet: date, activity, quantity, feeling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutRow {
    pub date: String,
    pub activity: String,
    pub quantity: String,
    pub feeling: String,
}

impl WorkoutRow {
    /// Stamp a parsed record with the time it was logged.
    pub fn from_record<Tz: TimeZone>(record: &TrainingRecord, logged_at: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            date: logged_at.format(ROW_DATE_FORMAT).to_string(),
            activity: record.activity.clone(),
            quantity: record.quantity.clone(),
            feeling: record.feeling.clone(),
        }
    }

    /// Build a row from sheet cells, padding missing trailing cells.
    pub fn from_cells(cells: &[String]) -> Self {
        let cell = |i: usize| cells.get(i).map(|s| s.trim().to_string()).unwrap_or_default();
        Self {
            date: cell(0),
            activity: cell(1),
            quantity: cell(2),
            feeling: cell(3),
        }
    }

    /// Cells in sheet column order.
    pub fn to_cells(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.activity.clone(),
            self.quantity.clone(),
            self.feeling.clone(),
        ]
    }

    /// The row's date, if it is in a recognized format.
    pub fn logged_at(&self) -> Option<NaiveDateTime> {
        parse_date(&self.date)
    }
}

/// Parse a sheet date cell.
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for fmt in DATE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Rows logged at or after `cutoff`. Rows with unreadable dates are dropped.
pub fn since(rows: &[WorkoutRow], cutoff: NaiveDateTime) -> Vec<WorkoutRow> {
    rows.iter()
        .filter(|row| row.logged_at().is_some_and(|at| at >= cutoff))
        .cloned()
        .collect()
}

/// A reminder if the latest row is more than [`INACTIVITY_DAYS`] old.
pub fn inactivity_warning(rows: &[WorkoutRow], now: NaiveDateTime) -> Option<&'static str> {
    let last = rows.last()?.logged_at()?;
    (now - last > Duration::days(INACTIVITY_DAYS))
        .then_some("⏰ Ты не тренировался больше 3 дней. Самое время размяться!")
}

/// Totals across a set of rows.
///
/// Minute and calorie sums saturate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Totals {
    pub sessions: usize,
    pub minutes: u64,
    pub km: f64,
    pub calories: u64,
}

impl Totals {
    pub fn of(rows: &[WorkoutRow]) -> Self {
        rows.iter().fold(Self::default(), |mut acc, row| {
            acc.add(row);
            acc
        })
    }

    fn add(&mut self, row: &WorkoutRow) {
        self.sessions += 1;
        self.minutes = self
            .minutes
            .saturating_add(quantity_minutes(&row.quantity).map_or(0, u64::from));
        self.km += quantity_km(&row.quantity).unwrap_or(0.0);
        let calories = extract_calories(&row.feeling).or_else(|| extract_calories(&row.quantity));
        self.calories = self.calories.saturating_add(calories.map_or(0, u64::from));
    }
}

/// Totals per activity, keyed by the activity label.
pub fn by_activity(rows: &[WorkoutRow]) -> BTreeMap<String, Totals> {
    let mut groups: BTreeMap<String, Totals> = BTreeMap::new();
    for row in rows {
        groups.entry(row.activity.clone()).or_default().add(row);
    }
    groups
}

/// Plain statistics, used when the AI provider is unavailable.
pub fn fallback_summary(rows: &[WorkoutRow]) -> String {
    if rows.is_empty() {
        return NO_DATA_MESSAGE.to_string();
    }

    let totals = Totals::of(rows);
    let mut text = format!(
        "📊 Тренировок: {}\n⏱ Время: {} мин\n",
        totals.sessions, totals.minutes
    );
    if totals.km > 0.0 {
        text.push_str(&format!("📏 Дистанция: {:.1} км\n", totals.km));
    }
    if totals.calories > 0 {
        text.push_str(&format!("🔥 Калории: {} ккал\n", totals.calories));
    }

    let groups = by_activity(rows);
    if groups.len() > 1 {
        text.push_str("\nПо видам:\n");
        for (activity, group) in &groups {
            text.push_str(&format!(
                "• {}: {} трен., {} мин\n",
                activity, group.sessions, group.minutes
            ));
        }
    }
    text
}

/// A random motivation tip.
pub fn random_tip() -> &'static str {
    MOTIVATION_TIPS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(MOTIVATION_TIPS[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(date: &str, activity: &str, quantity: &str, feeling: &str) -> WorkoutRow {
        WorkoutRow {
            date: date.to_string(),
            activity: activity.to_string(),
            quantity: quantity.to_string(),
            feeling: feeling.to_string(),
        }
    }

    fn at(s: &str) -> NaiveDateTime {
        parse_date(s).expect("valid test date")
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(
            parse_date("2026-01-15 18:30"),
            NaiveDate::from_ymd_opt(2026, 1, 15).and_then(|d| d.and_hms_opt(18, 30, 0))
        );
        assert_eq!(
            parse_date("2026-01-15"),
            NaiveDate::from_ymd_opt(2026, 1, 15).and_then(|d| d.and_hms_opt(0, 0, 0))
        );
        assert_eq!(
            parse_date(" 13.01.2026 "),
            NaiveDate::from_ymd_opt(2026, 1, 13).and_then(|d| d.and_hms_opt(0, 0, 0))
        );
        assert_eq!(parse_date("вчера"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_from_cells_pads_missing() {
        let cells = vec!["13.01.2026".to_string(), "Коньки".to_string()];
        let r = WorkoutRow::from_cells(&cells);
        assert_eq!(r.date, "13.01.2026");
        assert_eq!(r.activity, "Коньки");
        assert_eq!(r.quantity, "");
        assert_eq!(r.feeling, "");
    }

    #[test]
    fn test_from_record_stamps_date() {
        let record = TrainingRecord::new("Бег", "5 км", "устал");
        let logged = Utc.with_ymd_and_hms(2026, 1, 15, 7, 5, 0).unwrap();
        let r = WorkoutRow::from_record(&record, &logged);
        assert_eq!(
            r.to_cells(),
            vec!["2026-01-15 07:05", "Бег", "5 км", "устал"]
        );
    }

    #[test]
    fn test_since_filters_by_cutoff() {
        let rows = vec![
            row("2026-01-01", "Бег", "5 км", ""),
            row("2026-01-10 08:00", "Зал", "60 мин", ""),
            row("непонятно", "Йога", "30 мин", ""),
        ];
        let recent = since(&rows, at("2026-01-08"));
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].activity, "Зал");
    }

    #[test]
    fn test_inactivity_warning() {
        let rows = vec![row("2026-01-10 08:00", "Бег", "5 км", "")];
        assert!(inactivity_warning(&rows, at("2026-01-12 08:00")).is_none());
        assert!(inactivity_warning(&rows, at("2026-01-14 08:00")).is_some());
        assert!(inactivity_warning(&[], at("2026-01-14 08:00")).is_none());

        let undated = vec![row("когда-то", "Бег", "5 км", "")];
        assert!(inactivity_warning(&undated, at("2026-01-14 08:00")).is_none());
    }

    #[test]
    fn test_totals() {
        let rows = vec![
            row("13.01.2026", "Коньки", "45 мин", "Легко"),
            row("14.01.2026", "Зал", "1 ч", "400 ккал"),
            row("15.01.2026", "Бег", "5 км", "Стандартно"),
        ];
        let totals = Totals::of(&rows);
        assert_eq!(totals.sessions, 3);
        assert_eq!(totals.minutes, 105);
        assert_eq!(totals.km, 5.0);
        assert_eq!(totals.calories, 400);
    }

    #[test]
    fn test_fallback_summary() {
        let rows = vec![
            row("13.01.2026", "Коньки", "45 мин", "Легко"),
            row("15.01.2026", "Бег", "5 км", "Стандартно"),
        ];
        let text = fallback_summary(&rows);
        assert!(text.contains("Тренировок: 2"));
        assert!(text.contains("45 мин"));
        assert!(text.contains("5.0 км"));
        assert!(!text.contains("Калории"));
    }

    #[test]
    fn test_totals_saturate_on_huge_quantities() {
        let record = crate::parser::parse_training("Бег 4294967295 мин, 4000000000 ккал");
        let logged = Utc.with_ymd_and_hms(2026, 1, 15, 7, 5, 0).unwrap();
        let huge = WorkoutRow::from_record(&record, &logged);
        let rows = vec![huge.clone(), huge];

        let totals = Totals::of(&rows);
        assert_eq!(totals.sessions, 2);
        assert_eq!(totals.minutes, 2 * u64::from(u32::MAX));
        assert_eq!(totals.calories, 8_000_000_000);

        let text = fallback_summary(&rows);
        assert!(text.contains("Тренировок: 2"));
        assert!(text.contains("8589934590 мин"));
    }

    #[test]
    fn test_by_activity_groups_rows() {
        let rows = vec![
            row("13.01.2026", "Коньки", "45 мин", "Легко"),
            row("14.01.2026", "Бег", "30 мин", ""),
            row("15.01.2026", "Коньки", "1 ч", ""),
        ];
        let groups = by_activity(&rows);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["Коньки"].sessions, 2);
        assert_eq!(groups["Коньки"].minutes, 105);
        assert_eq!(groups["Бег"].minutes, 30);

        let text = fallback_summary(&rows);
        assert!(text.contains("По видам:"));
        assert!(text.contains("• Коньки: 2 трен., 105 мин"));
        assert!(text.contains("• Бег: 1 трен., 30 мин"));
    }

    #[test]
    fn test_single_activity_has_no_breakdown() {
        let rows = vec![row("13.01.2026", "Бег", "30 мин", "")];
        assert!(!fallback_summary(&rows).contains("По видам:"));
    }

    #[test]
    fn test_fallback_summary_empty() {
        assert_eq!(fallback_summary(&[]), NO_DATA_MESSAGE);
    }

    #[test]
    fn test_random_tip_from_list() {
        let tip = random_tip();
        assert!(MOTIVATION_TIPS.contains(&tip));
    }
}
