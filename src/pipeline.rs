use chrono::NaiveDateTime;
use std::fmt;
use tracing::{debug, info};

use crate::classify::Category;
use crate::completion::{update_completion, Completion};
use crate::models::Page;
use crate::options::{Options, PresenterKind};
use crate::present::{inplace, split, Tally};

/// Outcome of one run over the assignment list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub presenter: PresenterKind,
    pub tally: Tally,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.presenter.label())?;
        for category in Category::DISPLAY_ORDER {
            write!(f, " {}={}", category.label(), self.tally.count(category))?;
        }
        write!(f, " | skipped={}", self.tally.skipped)?;
        match self.presenter {
            PresenterKind::Split => write!(f, " omitted={}", self.tally.omitted),
            PresenterKind::InPlace => write!(f, " hidden={}", self.tally.hidden),
        }
    }
}

/// Sorts, buckets and restyles the page's assignment list.
///
/// Returns `None` without touching the page when it has no assignment
/// container or the container has no usable table.
pub fn run(
    page: &mut Page,
    options: &Options,
    now: NaiveDateTime,
    submitted_marker: &str,
) -> Option<RunReport> {
    let Some(container) = page.assignment_list.as_mut() else {
        debug!("page has no assignment list");
        return None;
    };

    let presenter = options.presenter();
    let tally = match presenter {
        PresenterKind::Split => split::present(container, options, now, submitted_marker),
        PresenterKind::InPlace => inplace::present(container, options, now, submitted_marker),
    }?;

    let report = RunReport { presenter, tally };
    info!(%options, classified = report.tally.classified(), "{report}");
    Some(report)
}

/// Recomputes the completion percentage when the page has a summary table.
pub fn run_completion(page: &mut Page) -> Option<Completion> {
    let completion = update_completion(page.summary.as_mut()?)?;
    info!(
        total = completion.total,
        completed = completion.completed,
        "completion {:.1}%",
        completion.percentage()
    );
    Some(completion)
}
