use chrono::NaiveDateTime;
use tracing::debug;

use super::{is_shown, CategoryLook, Tally};
use crate::classify::Category;
use crate::extract::{extract_row, renumber, rewrite_period, AssignmentRow, Extracted};
use crate::models::{Block, Container, Heading, Row, Style};
use crate::options::Options;

fn heading(category: Category) -> Heading {
    let mut style = Style::default();
    style.set("font-size", "1.5em");
    style.set("margin-top", "20px");
    style.set("margin-bottom", "10px");
    style.set("font-weight", "bold");
    Heading {
        text: category.title().to_string(),
        style,
    }
}

/// Rebuilds the container as one heading and table per non-empty category.
///
/// Rows are gathered from every table in the container, so a page that was
/// already split is rebuilt from the same rows. Rows without a deadline are
/// dropped. Returns `None` when there is no table body to work from.
pub fn present(
    container: &mut Container,
    options: &Options,
    now: NaiveDateTime,
    submitted_marker: &str,
) -> Option<Tally> {
    let Some(template) = container
        .tables()
        .find(|t| t.body.is_some())
        .map(|t| t.empty_copy())
    else {
        debug!("assignment container has no table body; nothing to split");
        return None;
    };

    let mut tally = Tally::default();
    let mut buckets: [Vec<(AssignmentRow, Row)>; 5] = Default::default();

    for block in std::mem::take(&mut container.blocks) {
        match block {
            Block::Table(table) => {
                for mut row in table.body.into_iter().flatten() {
                    match extract_row(&row, submitted_marker) {
                        Extracted::Parsed(assignment) => {
                            rewrite_period(&mut row, &assignment, now);
                            let category = assignment.category(now);
                            buckets[category.index()].push((assignment, row));
                        }
                        Extracted::Unparseable(reason) => {
                            debug!("dropping row without deadline: {reason}");
                            tally.skipped += 1;
                        }
                    }
                }
            }
            // Headings left by an earlier split are regenerated below.
            Block::Heading(h) if Category::from_title(&h.text).is_some() => {}
            other => container.blocks.push(other),
        }
    }

    for category in Category::DISPLAY_ORDER {
        let mut bucket = std::mem::take(&mut buckets[category.index()]);
        if bucket.is_empty() {
            continue;
        }
        tally.counts[category.index()] = bucket.len();
        if !is_shown(category, options) {
            tally.omitted += bucket.len();
            continue;
        }

        bucket.sort_by_key(|(assignment, _)| assignment.deadline);
        let look = CategoryLook::for_category(category, options);
        let mut table = template.clone();
        let body = table.body.get_or_insert_with(Vec::new);
        for (idx, (_, mut row)) in bucket.into_iter().enumerate() {
            renumber(&mut row, idx + 1);
            look.apply(&mut row, false);
            body.push(row);
        }

        container.blocks.push(Block::Heading(heading(category)));
        container.blocks.push(Block::Table(table));
    }

    Some(tally)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::fixtures::{row, title};
    use crate::extract::{DEFAULT_SUBMITTED_MARKER, PERIOD_CELL};
    use crate::models::{Cell, Table};
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
                head: vec![Row::new(vec![
                    Cell::th("번호"),
                    Cell::th("제목"),
                    Cell::th("기간"),
                    Cell::th("상태"),
                ])],
                body: Some(rows),
            })],
        }
    }

    fn sample() -> Container {
        container(vec![
            row(1, "late essay", "2025.03.01 09:00 ~ 2025.03.05 18:00", "미제출"),
            row(2, "far lab", "2025.03.01 09:00 ~ 2025.03.30 18:00", "미제출"),
            row(3, "soon quiz", "2025.03.01 09:00 ~ 2025.03.11 00:00", "미제출"),
            row(4, "done report", "2025.03.01 09:00 ~ 2025.03.20 18:00", "제출완료"),
            row(5, "old report", "2025.03.01 09:00 ~ 2025.03.02 00:00", "제출완료"),
            row(6, "no deadline", "상시", "미제출"),
            row(7, "sooner quiz", "2025.03.01 09:00 ~ 2025.03.10 18:00", "미제출"),
            row(8, "far lab 2", "2025.03.01 09:00 ~ 2025.03.25 18:00", "미제출"),
        ])
    }

    fn sections(c: &Container) -> Vec<(String, Vec<String>)> {
        let mut out = Vec::new();
        let mut current = String::new();
        for block in &c.blocks {
            match block {
                Block::Heading(h) => current = h.text.clone(),
                Block::Table(t) => out.push((
                    current.clone(),
                    t.body.iter().flatten().map(|r| title(r).to_string()).collect(),
                )),
            }
        }
        out
    }

    #[test]
    fn builds_one_section_per_category_in_display_order() {
        let mut c = sample();
        let tally = present(&mut c, &Options::default(), now(), DEFAULT_SUBMITTED_MARKER).unwrap();

        let expected: Vec<(String, Vec<String>)> = [
            (Category::Urgent, vec!["sooner quiz", "soon quiz"]),
            (Category::NotSubmitted, vec!["far lab 2", "far lab"]),
            (Category::Submitted, vec!["done report"]),
            (Category::Expired, vec!["late essay"]),
            (Category::SubmittedExpired, vec!["old report"]),
        ]
        .into_iter()
        .map(|(category, rows)| {
            (
                category.title().to_string(),
                rows.into_iter().map(String::from).collect(),
            )
        })
        .collect();
        assert_eq!(sections(&c), expected);
        assert_eq!(tally.skipped, 1);
        assert_eq!(tally.classified(), 7);
    }

    #[test]
    fn rows_are_renumbered_per_bucket_and_sorted() {
        let mut c = sample();
        present(&mut c, &Options::default(), now(), DEFAULT_SUBMITTED_MARKER).unwrap();
        for table in c.tables() {
            let rows = table.body.as_ref().unwrap();
            let numbers: Vec<&str> = rows.iter().map(|r| r.cells[0].text.as_str()).collect();
            let expected: Vec<String> = (1..=rows.len()).map(|n| n.to_string()).collect();
            assert_eq!(numbers, expected);

            let deadlines: Vec<NaiveDateTime> = rows
                .iter()
                .map(|r| extract_row(r, DEFAULT_SUBMITTED_MARKER).parsed().unwrap().deadline)
                .collect();
            assert!(deadlines.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn equal_deadlines_keep_document_order() {
        let mut c = container(vec![
            row(1, "first", "2025.03.01 09:00 ~ 2025.03.20 18:00", "미제출"),
            row(2, "second", "2025.03.01 09:00 ~ 2025.03.20 18:00", "미제출"),
        ]);
        present(&mut c, &Options::default(), now(), DEFAULT_SUBMITTED_MARKER).unwrap();
        assert_eq!(sections(&c)[0].1, vec!["first", "second"]);
    }

    #[test]
    fn hidden_expired_bucket_is_omitted() {
        let mut c = sample();
        let options = Options {
            show_expired_unsubmitted: false,
            ..Options::default()
        };
        let tally = present(&mut c, &options, now(), DEFAULT_SUBMITTED_MARKER).unwrap();

        let all = sections(&c);
        assert!(all.iter().all(|(heading, _)| heading != Category::Expired.title()));
        assert!(all.iter().all(|(_, rows)| !rows.contains(&"late essay".to_string())));
        assert_eq!(tally.omitted, 1);
        assert_eq!(tally.count(Category::Expired), 1);
    }

    #[test]
    fn styles_follow_category() {
        let mut c = sample();
        let options = Options {
            submitted_strike: false,
            ..Options::default()
        };
        present(&mut c, &options, now(), DEFAULT_SUBMITTED_MARKER).unwrap();
        let tables: Vec<&Table> = c.tables().collect();

        let urgent = &tables[0].body.as_ref().unwrap()[0];
        assert_eq!(urgent.style.get("background-color"), Some(super::super::URGENT_BG));
        assert!(!urgent.style.is_struck());

        let plain = &tables[1].body.as_ref().unwrap()[0];
        assert!(plain.style.is_empty());

        let submitted = &tables[2].body.as_ref().unwrap()[0];
        assert!(!submitted.style.is_struck());

        let expired = &tables[3].body.as_ref().unwrap()[0];
        assert!(expired.style.is_struck());
        assert!(expired.cells.iter().all(|c| c.style.is_struck()));
    }

    #[test]
    fn period_cells_are_annotated() {
        let mut c = sample();
        present(&mut c, &Options::default(), now(), DEFAULT_SUBMITTED_MARKER).unwrap();
        let urgent = &c.tables().next().unwrap().body.as_ref().unwrap()[0];
        assert_eq!(urgent.cells[PERIOD_CELL].text, "2025.03.10 18:00 (6시간 0분 전)");
    }

    #[test]
    fn second_run_rebuilds_the_same_sections() {
        let mut c = sample();
        present(&mut c, &Options::default(), now(), DEFAULT_SUBMITTED_MARKER).unwrap();
        let first = c.clone();
        let tally = present(&mut c, &Options::default(), now(), DEFAULT_SUBMITTED_MARKER).unwrap();
        assert_eq!(c, first);
        assert_eq!(tally.classified(), 7);
    }

    #[test]
    fn missing_body_is_a_no_op() {
        let mut c = Container {
            blocks: vec![Block::Table(Table::default())],
        };
        let before = c.clone();
        assert!(present(&mut c, &Options::default(), now(), DEFAULT_SUBMITTED_MARKER).is_none());
        assert_eq!(c, before);
    }
}
