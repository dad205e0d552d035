use chrono::NaiveDateTime;
use std::fmt;

use crate::deadline::format_deadline;

const MS_PER_MINUTE: i64 = 60 * 1000;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Time left until a deadline, as shown next to the period text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    Expired,
    Days(i64),
    HoursMinutes { hours: i64, minutes: i64 },
}

impl Remaining {
    pub fn between(deadline: NaiveDateTime, now: NaiveDateTime) -> Self {
        let ms = deadline.signed_duration_since(now).num_milliseconds();
        if ms <= 0 {
            Self::Expired
        } else if ms >= MS_PER_DAY {
            Self::Days(ms / MS_PER_DAY)
        } else {
            Self::HoursMinutes {
                hours: ms / MS_PER_HOUR,
                minutes: (ms % MS_PER_HOUR) / MS_PER_MINUTE,
            }
        }
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expired => write!(f, "(마감됨)"),
            Self::Days(days) => write!(f, "({days}일 전)"),
            Self::HoursMinutes { hours, minutes } => write!(f, "({hours}시간 {minutes}분 전)"),
        }
    }
}

/// Rewritten period cell text: `"<YYYY.MM.DD HH:MM> <remaining>"`.
pub fn annotate(deadline: NaiveDateTime, now: NaiveDateTime) -> String {
    format!(
        "{} {}",
        format_deadline(deadline),
        Remaining::between(deadline, now)
    )
}
