//! Free-text training message parser.
//!
//! Turns a chat message such as `"Бег 5 км, устал"` into a [`TrainingRecord`].
//! Parsing is total: messages that do not fit the expected shape degrade to
//! a positional comma split instead of failing.
//!
//! Two strategies are tried in order:
//!
//! 1. [`parse_structured`] looks for `activity <number><unit> [,|-] feeling`,
//!    where the unit comes from a closed minute/kilometer/hour vocabulary.
//! 2. [`parse_positional`] splits on commas: activity, quantity, feeling.

use regex::Regex;
use std::sync::LazyLock;

/// Quantity used when the message carries none.
pub const UNKNOWN_QUANTITY: &str = "unknown";

/// Feeling used when the message carries none.
pub const DEFAULT_FEELING: &str = "хорошо";

/// Activity used when the message is blank.
pub const DEFAULT_ACTIVITY: &str = "Тренировка";

/// Activity, then the first unit-bearing quantity, then an optional separator
/// and the remainder as feeling.
static STRUCTURED_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)^\s*(?P<activity>.+?)[\s,:\-–—]+(?P<quantity>\d+(?:[.,]\d+)?\s*(?:минут[аы]?|мин|км|час(?:а|ов)?|ч|min|km|h))\b[\s,\-–—]*(?P<feeling>.*)$",
    )
    .expect("Invalid structured training regex")
});

static MINUTES_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(?:минут[аы]?|мин|min)\b").expect("Invalid minutes regex")
});

static HOURS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(?:час(?:а|ов)?|ч|h)\b").expect("Invalid hours regex")
});

static KM_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(?:км|km)\b").expect("Invalid km regex")
});

static CALORIES_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*(?:ккал|kcal)").expect("Invalid calories regex")
});

/// One training session as described by a single chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingRecord {
    /// What was done, e.g. "Бег".
    pub activity: String,
    /// Duration or distance, e.g. "45 мин", or [`UNKNOWN_QUANTITY`].
    pub quantity: String,
    /// How it felt, or [`DEFAULT_FEELING`].
    pub feeling: String,
}

impl TrainingRecord {
    /// Build a record, substituting defaults for blank fields.
    pub fn new(activity: &str, quantity: &str, feeling: &str) -> Self {
        Self {
            activity: non_blank(activity).unwrap_or(DEFAULT_ACTIVITY).to_string(),
            quantity: non_blank(quantity).unwrap_or(UNKNOWN_QUANTITY).to_string(),
            feeling: non_blank(feeling).unwrap_or(DEFAULT_FEELING).to_string(),
        }
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Parse a training message. Never fails.
///
/// # Example
/// ```
/// use sportlog_core::parser::parse_training;
///
/// let record = parse_training("Бег 5 км, устал");
/// assert_eq!(record.activity, "Бег");
/// assert_eq!(record.quantity, "5 км");
/// assert_eq!(record.feeling, "устал");
/// ```
pub fn parse_training(message: &str) -> TrainingRecord {
    parse_structured(message).unwrap_or_else(|| parse_positional(message))
}

/// Match the `activity quantity feeling` shape.
///
/// Returns `None` when no recognized unit follows the activity. The first
/// unit-bearing token wins; everything after it (commas included) is the
/// feeling.
pub fn parse_structured(message: &str) -> Option<TrainingRecord> {
    let caps = STRUCTURED_REGEX.captures(message)?;
    let activity = caps.name("activity")?.as_str();
    let quantity = caps.name("quantity")?.as_str();
    let feeling = caps.name("feeling").map(|m| m.as_str()).unwrap_or("");

    // A separator-only activity like "," is not an activity.
    non_blank(activity)?;

    Some(TrainingRecord::new(activity, &normalize_spaces(quantity), feeling))
}

/// Split on commas: activity, quantity, then the rest as feeling.
pub fn parse_positional(message: &str) -> TrainingRecord {
    let mut parts = message.splitn(3, ',');
    let activity = parts.next().unwrap_or("");
    let quantity = parts.next().unwrap_or("");
    let feeling = parts.next().unwrap_or("");
    TrainingRecord::new(activity, quantity, feeling)
}

/// Collapse internal whitespace runs ("5   км" -> "5 км").
fn normalize_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_number(s: &str) -> Option<f64> {
    s.replace(',', ".").parse().ok()
}

/// Duration in whole minutes, if the quantity is a minute or hour token.
pub fn quantity_minutes(quantity: &str) -> Option<u32> {
    if let Some(caps) = MINUTES_REGEX.captures(quantity) {
        return parse_number(&caps[1]).map(|m| m.round() as u32);
    }
    HOURS_REGEX
        .captures(quantity)
        .and_then(|caps| parse_number(&caps[1]))
        .map(|h| (h * 60.0).round() as u32)
}

/// Distance in kilometers, if the quantity is a kilometer token.
pub fn quantity_km(quantity: &str) -> Option<f64> {
    KM_REGEX
        .captures(quantity)
        .and_then(|caps| parse_number(&caps[1]))
}

/// Calories mentioned anywhere in the text, e.g. "400 ккал".
pub fn extract_calories(text: &str) -> Option<u32> {
    CALORIES_REGEX
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
}
