//! Reads assignment rows off the page model.
//!
//! Every row yields a tagged [`Extracted`] result; nothing here panics on a
//! malformed row.

use chrono::NaiveDateTime;

use crate::classify::{classify, Category};
use crate::deadline::{parse_period, DeadlineError};
use crate::models::Row;
use crate::remaining::annotate;

pub const PERIOD_CELL: usize = 2;
pub const STATUS_CELL: usize = 3;
pub const MIN_CELLS: usize = 4;

/// Row data key holding the period text as it was before the first rewrite.
pub const DEADLINE_SOURCE_KEY: &str = "deadline-source";

pub const DEFAULT_SUBMITTED_MARKER: &str = "제출완료";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    #[error("row has {0} cells, expected at least {min}", min = MIN_CELLS)]
    TooFewCells(usize),
    #[error(transparent)]
    Deadline(#[from] DeadlineError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRow {
    pub period_text: String,
    pub deadline: NaiveDateTime,
    pub submitted: bool,
}

impl AssignmentRow {
    pub fn category(&self, now: NaiveDateTime) -> Category {
        classify(self.deadline, now, self.submitted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    Parsed(AssignmentRow),
    Unparseable(SkipReason),
}

impl Extracted {
    #[cfg(test)]
    pub fn parsed(&self) -> Option<&AssignmentRow> {
        match self {
            Self::Parsed(row) => Some(row),
            Self::Unparseable(_) => None,
        }
    }
}

/// Unformatted period text: the remembered source if the row was already
/// rewritten, the live cell text otherwise.
pub fn source_period(row: &Row) -> Option<&str> {
    row.data
        .get(DEADLINE_SOURCE_KEY)
        .map(String::as_str)
        .or_else(|| row.cells.get(PERIOD_CELL).map(|c| c.text.as_str()))
}

pub fn extract_row(row: &Row, submitted_marker: &str) -> Extracted {
    if row.cells.len() < MIN_CELLS {
        return Extracted::Unparseable(SkipReason::TooFewCells(row.cells.len()));
    }
    let period_text = source_period(row).unwrap_or_default().trim().to_string();
    match parse_period(&period_text) {
        Ok(deadline) => Extracted::Parsed(AssignmentRow {
            period_text,
            deadline,
            submitted: row.cells[STATUS_CELL].text.contains(submitted_marker),
        }),
        Err(err) => Extracted::Unparseable(err.into()),
    }
}

/// Replaces the period cell with the annotated deadline, keeping the
/// original text in the row data for later runs.
pub fn rewrite_period(row: &mut Row, assignment: &AssignmentRow, now: NaiveDateTime) {
    row.data
        .entry(DEADLINE_SOURCE_KEY.to_string())
        .or_insert_with(|| assignment.period_text.clone());
    if let Some(cell) = row.cells.get_mut(PERIOD_CELL) {
        cell.text = annotate(assignment.deadline, now);
    }
}

/// Writes a 1-based display index into the row's numbering cell, if any.
pub fn renumber(row: &mut Row, display_index: usize) {
    if let Some(cell) = row.num_cell_mut() {
        cell.text = display_index.to_string();
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::{Cell, Row};

    pub fn row(num: usize, title: &str, period: &str, status: &str) -> Row {
        Row::new(vec![
            Cell::td(num.to_string()).with_class("num"),
            Cell::td(title),
            Cell::td(period),
            Cell::td(status),
        ])
    }

    pub fn title(row: &Row) -> &str {
        &row.cells[1].text
    }
}
