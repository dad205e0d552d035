use chrono::NaiveDateTime;
use tracing::debug;

use super::{hide, is_shown, CategoryLook, Tally};
use crate::extract::{extract_row, renumber, rewrite_period, AssignmentRow, Extracted};
use crate::models::Container;
use crate::options::Options;

/// Sorts and restyles the rows of the container's first table in place.
///
/// Parseable rows are sorted by deadline among the positions parseable rows
/// already hold; rows without a deadline stay where they are, unstyled. An
/// expired row that should not be shown is hidden, not removed.
pub fn present(
    container: &mut Container,
    options: &Options,
    now: NaiveDateTime,
    submitted_marker: &str,
) -> Option<Tally> {
    let Some(body) = container
        .first_table_mut()
        .and_then(|table| table.body.as_mut())
    else {
        debug!("assignment table has no body; nothing to sort");
        return None;
    };

    let mut tally = Tally::default();
    let mut slots = Vec::new();
    let mut sortable = Vec::new();
    for (idx, row) in body.iter_mut().enumerate() {
        match extract_row(row, submitted_marker) {
            Extracted::Parsed(assignment) => {
                slots.push(idx);
                sortable.push((assignment, std::mem::take(row)));
            }
            Extracted::Unparseable(reason) => {
                debug!("leaving row {} in place: {reason}", idx + 1);
                tally.skipped += 1;
            }
        }
    }

    sortable.sort_by_key(|(assignment, _)| assignment.deadline);
    let mut placed: Vec<Option<AssignmentRow>> = vec![None; body.len()];
    for (slot, (assignment, row)) in slots.into_iter().zip(sortable) {
        body[slot] = row;
        placed[slot] = Some(assignment);
    }

    for (idx, (row, assignment)) in body.iter_mut().zip(placed).enumerate() {
        renumber(row, idx + 1);
        let Some(assignment) = assignment else {
            continue;
        };

        rewrite_period(row, &assignment, now);
        let category = assignment.category(now);
        tally.counts[category.index()] += 1;

        if is_shown(category, options) {
            CategoryLook::for_category(category, options).apply(row, true);
        } else {
            hide(row);
            tally.hidden += 1;
        }
    }

    Some(tally)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Category;
    use crate::extract::fixtures::{row, title};
    use crate::extract::{DEFAULT_SUBMITTED_MARKER, PERIOD_CELL};
    use crate::models::{Block, Row, Table};
    use crate::present::{SUBMITTED_BG, URGENT_BG};
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn container(rows: Vec<Row>) -> Container {
        Container {
            blocks: vec![Block::Table(Table {
                head: Vec::new(),
                body: Some(rows),
            })],
        }
    }

    fn sample() -> Container {
        container(vec![
            row(1, "far lab", "2025.03.01 09:00 ~ 2025.03.30 18:00", "미제출"),
            row(2, "always open", "상시", "미제출"),
            row(3, "late essay", "2025.03.01 09:00 ~ 2025.03.05 18:00", "미제출"),
            row(4, "done report", "2025.03.01 09:00 ~ 2025.03.20 18:00", "제출완료"),
            row(5, "soon quiz", "2025.03.01 09:00 ~ 2025.03.11 00:00", "미제출"),
        ])
    }

    fn rows(c: &mut Container) -> &Vec<Row> {
        c.first_table_mut().unwrap().body.as_ref().unwrap()
    }

    #[test]
    fn sorts_parseable_rows_around_fixed_unparseable_ones() {
        let mut c = sample();
        let tally = present(&mut c, &Options::default(), now(), DEFAULT_SUBMITTED_MARKER).unwrap();

        let titles: Vec<&str> = rows(&mut c).iter().map(title).collect();
        assert_eq!(
            titles,
            vec!["late essay", "always open", "soon quiz", "done report", "far lab"]
        );
        assert_eq!(tally.skipped, 1);
        assert_eq!(tally.classified(), 4);
    }

    #[test]
    fn every_row_is_renumbered_by_position() {
        let mut c = sample();
        present(&mut c, &Options::default(), now(), DEFAULT_SUBMITTED_MARKER).unwrap();
        let numbers: Vec<&str> = rows(&mut c).iter().map(|r| r.cells[0].text.as_str()).collect();
        assert_eq!(numbers, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn styles_are_forced_overrides() {
        let mut c = sample();
        present(&mut c, &Options::default(), now(), DEFAULT_SUBMITTED_MARKER).unwrap();
        let rows = rows(&mut c);

        let urgent = &rows[2];
        assert_eq!(urgent.style.get("background-color"), Some(URGENT_BG));
        assert!(urgent.style.to_css().contains("!important"));

        let submitted = &rows[3];
        assert_eq!(submitted.style.get("background-color"), Some(SUBMITTED_BG));
        assert!(submitted.style.is_struck());

        let unparseable = &rows[1];
        assert!(unparseable.style.is_empty());
        assert_eq!(unparseable.cells[PERIOD_CELL].text, "상시");
    }

    #[test]
    fn hidden_expired_row_stays_in_the_table() {
        let mut c = sample();
        let options = Options {
            show_expired_unsubmitted: false,
            ..Options::default()
        };
        let tally = present(&mut c, &options, now(), DEFAULT_SUBMITTED_MARKER).unwrap();
        let rows = rows(&mut c);

        assert_eq!(rows.len(), 5);
        let expired = rows.iter().find(|r| title(r) == "late essay").unwrap();
        assert!(expired.is_hidden());
        assert_eq!(rows.iter().filter(|r| r.is_hidden()).count(), 1);
        assert_eq!(tally.hidden, 1);
        assert_eq!(tally.count(Category::Expired), 1);
    }

    #[test]
    fn rerun_with_new_options_reveals_hidden_row() {
        let mut c = sample();
        let hidden = Options {
            show_expired_unsubmitted: false,
            ..Options::default()
        };
        present(&mut c, &hidden, now(), DEFAULT_SUBMITTED_MARKER).unwrap();
        present(&mut c, &Options::default(), now(), DEFAULT_SUBMITTED_MARKER).unwrap();

        let rows = rows(&mut c);
        let expired = rows.iter().find(|r| title(r) == "late essay").unwrap();
        assert!(!expired.is_hidden());
        assert!(expired.style.is_struck());
        assert_eq!(expired.cells[PERIOD_CELL].text, "2025.03.05 18:00 (마감됨)");
    }

    #[test]
    fn missing_body_is_a_no_op() {
        let mut c = Container {
            blocks: vec![Block::Table(Table::default())],
        };
        assert!(present(&mut c, &Options::default(), now(), DEFAULT_SUBMITTED_MARKER).is_none());
    }
}
