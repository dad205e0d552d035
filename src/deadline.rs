use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use regex::Regex;
use std::sync::LazyLock;

/// Display and input format of a deadline, e.g. `2025.03.15 14:30`.
pub const DEADLINE_FORMAT: &str = "%Y.%m.%d %H:%M";

static ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*?\)").expect("static annotation pattern"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeadlineError {
    #[error("period text has no `~` separator")]
    MissingSeparator,
    #[error("period text has nothing after `~`")]
    MissingEnd,
    #[error("malformed deadline `{0}`")]
    Malformed(String),
}

/// Drops every parenthesized annotation, e.g. `(마감됨)`, and trims.
pub fn strip_annotations(text: &str) -> String {
    ANNOTATION.replace_all(text.trim(), "").trim().to_string()
}

/// End-of-range text of a `"<start> ~ <end>"` period.
pub fn end_of_period(period_text: &str) -> Result<String, DeadlineError> {
    let stripped = strip_annotations(period_text);
    let (_, end) = stripped
        .split_once('~')
        .ok_or(DeadlineError::MissingSeparator)?;
    let end = end.split('~').next().unwrap_or_default().trim();
    if end.is_empty() {
        return Err(DeadlineError::MissingEnd);
    }
    Ok(end.to_string())
}

/// Parses `YYYY.MM.DD HH:MM`.
///
/// A `00:00` time marks the end of the previous day, so it becomes `23:59` of
/// the prior calendar date.
pub fn parse_deadline(text: &str) -> Result<NaiveDateTime, DeadlineError> {
    let malformed = || DeadlineError::Malformed(text.trim().to_string());

    let mut parts = text.split_whitespace();
    let (Some(date_part), Some(time_part), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(malformed());
    };

    let date = NaiveDate::parse_from_str(date_part, "%Y.%m.%d").map_err(|_| malformed())?;
    let time = NaiveTime::parse_from_str(time_part, "%H:%M").map_err(|_| malformed())?;

    if time.hour() == 0 && time.minute() == 0 {
        let prev = date.pred_opt().ok_or_else(malformed)?;
        return prev.and_hms_opt(23, 59, 0).ok_or_else(malformed);
    }
    Ok(date.and_time(time))
}

/// Deadline instant of a raw period cell text.
pub fn parse_period(period_text: &str) -> Result<NaiveDateTime, DeadlineError> {
    parse_deadline(&end_of_period(period_text)?)
}

pub fn format_deadline(deadline: NaiveDateTime) -> String {
    deadline.format(DEADLINE_FORMAT).to_string()
}
