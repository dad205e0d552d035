use tracing::debug;

use crate::models::Table;

pub const TOTAL_LABEL: &str = "총 수강생";
pub const COMPLETED_LABEL: &str = "제출완료 인원";

/// Cell data key holding the completed count before the cell was rewritten.
pub const COMPLETED_COUNT_KEY: &str = "completed-count";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub total: i64,
    pub completed: i64,
}

impl Completion {
    pub fn percentage(&self) -> f64 {
        self.completed as f64 / self.total as f64 * 100.0
    }

    /// `"<completed>명 (<percentage>%)"` with one decimal place, ties
    /// rounded away from zero.
    pub fn display(&self) -> String {
        let rounded = (self.percentage() * 10.0).round() / 10.0;
        format!("{}명 ({:.1}%)", self.completed, rounded)
    }
}

/// Leading integer of a count cell, read the way `parseInt` would after the
/// `명` unit is removed.
fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim().replacen('명', "", 1);
    let text = text.trim_start();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// Position of the value cell following a header cell with `label`.
/// When the label repeats, the last occurrence wins.
fn find_value(table: &Table, label: &str) -> Option<(usize, usize)> {
    table
        .rows()
        .enumerate()
        .flat_map(|(row_idx, row)| {
            row.cells
                .iter()
                .enumerate()
                .filter(move |(_, c)| c.header && c.text.contains(label))
                .filter_map(move |(idx, _)| {
                    (idx + 1 < row.cells.len()).then_some((row_idx, idx + 1))
                })
        })
        .last()
}

/// Rewrites the completed-count cell as `"<n>명 (<p>%)"`.
///
/// The original count is remembered on the cell, so running this twice
/// leaves the same text. Does nothing if either labeled cell is missing or
/// the total is not positive.
pub fn update_completion(table: &mut Table) -> Option<Completion> {
    let (total_row, total_col) = find_value(table, TOTAL_LABEL)?;
    let (done_row, done_col) = find_value(table, COMPLETED_LABEL)?;

    let total = table
        .rows()
        .nth(total_row)
        .and_then(|r| r.cells.get(total_col))
        .and_then(|c| leading_integer(&c.text))?;

    let cell = table
        .rows_mut()
        .nth(done_row)
        .and_then(|r| r.cells.get_mut(done_col))?;
    let completed = cell
        .data
        .get(COMPLETED_COUNT_KEY)
        .and_then(|v| v.parse::<i64>().ok())
        .or_else(|| leading_integer(&cell.text))?;

    if total <= 0 {
        debug!("total student count is {total}; leaving completion cell alone");
        return None;
    }

    let completion = Completion { total, completed };
    cell.data
        .insert(COMPLETED_COUNT_KEY.to_string(), completed.to_string());
    cell.text = completion.display();
    Some(completion)
}
