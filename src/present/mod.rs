pub mod inplace;
pub mod split;

use crate::classify::Category;
use crate::models::Row;
use crate::options::Options;

pub const URGENT_BG: &str = "#ffcccc";
pub const SUBMITTED_BG: &str = "#cce5ff";
pub const EXPIRED_BG: &str = "#f0f0f0";
pub const STRUCK_COLOR: &str = "gray";

/// Inline properties the presenters own; cleared before every restyle.
const MANAGED_PROPERTIES: [&str; 4] = ["background-color", "color", "text-decoration", "display"];

// ─── Category look ──────────────────────────────────────────────────────────

/// Row styling shared by both presenters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryLook {
    pub background: Option<&'static str>,
    /// Gray text with a line through it.
    pub strike: bool,
}

impl CategoryLook {
    pub fn for_category(category: Category, options: &Options) -> Self {
        match category {
            Category::Urgent => Self {
                background: Some(URGENT_BG),
                strike: false,
            },
            Category::NotSubmitted => Self {
                background: None,
                strike: false,
            },
            Category::Submitted => Self {
                background: Some(SUBMITTED_BG),
                strike: options.submitted_strike,
            },
            Category::Expired => Self {
                background: Some(EXPIRED_BG),
                strike: true,
            },
            Category::SubmittedExpired => Self {
                background: Some(SUBMITTED_BG),
                strike: true,
            },
        }
    }

    /// Sets the look on the row and on each of its cells.
    pub fn apply(&self, row: &mut Row, important: bool) {
        clear_managed(row);
        let mut declarations: Vec<(&str, &str)> = Vec::new();
        if let Some(bg) = self.background {
            declarations.push(("background-color", bg));
        }
        if self.strike {
            declarations.push(("color", STRUCK_COLOR));
            declarations.push(("text-decoration", "line-through"));
        }
        for (property, value) in declarations {
            row.style.insert(property, value, important);
            for cell in &mut row.cells {
                cell.style.insert(property, value, important);
            }
        }
    }
}

/// Whether a bucket is rendered at all.
pub fn is_shown(category: Category, options: &Options) -> bool {
    category != Category::Expired || options.show_expired_unsubmitted
}

pub fn clear_managed(row: &mut Row) {
    for property in MANAGED_PROPERTIES {
        row.style.remove(property);
        for cell in &mut row.cells {
            cell.style.remove(property);
        }
    }
}

/// Keeps the row in place but takes it out of the visual flow.
pub fn hide(row: &mut Row) {
    clear_managed(row);
    row.style.set_important("display", "none");
}

// ─── Tally ──────────────────────────────────────────────────────────────────

/// What a presenter did with the rows it saw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    /// Rows per category, indexed by [`Category::index`].
    pub counts: [usize; 5],
    /// Rows without a usable deadline.
    pub skipped: usize,
    /// Rows left out of the output (split mode).
    pub omitted: usize,
    /// Rows kept but hidden (in-place mode).
    pub hidden: usize,
}

impl Tally {
    pub fn count(&self, category: Category) -> usize {
        self.counts[category.index()]
    }

    pub fn classified(&self) -> usize {
        self.counts.iter().sum()
    }
}
