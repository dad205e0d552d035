use chrono::NaiveDateTime;

/// Inclusive calendar-day window in which an open assignment counts as urgent.
pub const URGENCY_WINDOW_DAYS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Urgent,
    NotSubmitted,
    Submitted,
    Expired,
    SubmittedExpired,
}

impl Category {
    /// Order in which buckets appear on the page.
    pub const DISPLAY_ORDER: [Category; 5] = [
        Category::Urgent,
        Category::NotSubmitted,
        Category::Submitted,
        Category::Expired,
        Category::SubmittedExpired,
    ];

    /// Heading shown above the bucket's table.
    pub fn title(self) -> &'static str {
        match self {
            Self::Urgent => "기한이 얼마 안 남은 과제 (3일 이내)",
            Self::NotSubmitted => "제출 안 한 과제",
            Self::Submitted => "제출 완료",
            Self::Expired => "마감된 과제",
            Self::SubmittedExpired => "제출 완료한 마감된 과제",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::NotSubmitted => "not submitted",
            Self::Submitted => "submitted",
            Self::Expired => "expired",
            Self::SubmittedExpired => "submitted, expired",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_title(title: &str) -> Option<Self> {
        Self::DISPLAY_ORDER.into_iter().find(|c| c.title() == title)
    }
}

/// Buckets one assignment.
///
/// Expiry is checked to the millisecond while urgency compares calendar days,
/// and expiry or submission always win over urgency.
pub fn classify(deadline: NaiveDateTime, now: NaiveDateTime, submitted: bool) -> Category {
    let expired = deadline.signed_duration_since(now).num_milliseconds() <= 0;
    let day_diff = deadline
        .date()
        .signed_duration_since(now.date())
        .num_days();

    match (expired, submitted) {
        (true, true) => Category::SubmittedExpired,
        (true, false) => Category::Expired,
        (false, true) => Category::Submitted,
        (false, false) if (0..=URGENCY_WINDOW_DAYS).contains(&day_diff) => Category::Urgent,
        (false, false) => Category::NotSubmitted,
    }
}
