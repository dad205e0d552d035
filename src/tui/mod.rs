pub mod event;
pub mod ui;

use chrono::NaiveDateTime;
use ratatui::widgets::ListState as RListState;
use std::path::PathBuf;
use tracing::warn;

use crate::completion::Completion;
use crate::models::Page;
use crate::options::{Options, OptionsUpdate};
use crate::pipeline::{self, RunReport};
use crate::store;

// ─── List state ─────────────────────────────────────────────────────────────

/// Logical selection plus the ratatui scroll offset.
pub struct ListState {
    pub inner: RListState,
    pub selected: usize,
    pub len: usize,
}

impl ListState {
    pub fn new() -> Self {
        let mut inner = RListState::default();
        inner.select(Some(0));
        Self {
            inner,
            selected: 0,
            len: 0,
        }
    }

    /// Move down, clamped at the last item.
    pub fn select_next(&mut self) {
        if self.len > 0 && self.selected + 1 < self.len {
            self.selected += 1;
        }
    }

    /// Move up, clamped at the first item.
    pub fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if self.selected >= len && len > 0 {
            self.selected = len - 1;
        }
    }
}

// ─── App State ──────────────────────────────────────────────────────────────

pub struct App {
    pub running: bool,

    /// Page as loaded; every run starts from a fresh copy of it.
    pub source: Page,
    /// Page after the latest run.
    pub view: Page,

    pub options: Options,
    pub store_path: Option<PathBuf>,
    pub submitted_marker: String,
    /// Pinned clock from `--now`; the wall clock is used otherwise.
    pub pinned_now: Option<NaiveDateTime>,
    pub now: NaiveDateTime,

    pub report: Option<RunReport>,
    pub completion: Option<Completion>,
    pub list_state: ListState,
    pub status_message: String,
}

impl App {
    pub fn new(
        source: Page,
        options: Options,
        store_path: Option<PathBuf>,
        submitted_marker: String,
        pinned_now: Option<NaiveDateTime>,
    ) -> Self {
        let mut app = Self {
            running: true,
            view: source.clone(),
            source,
            options,
            store_path,
            submitted_marker,
            pinned_now,
            now: pinned_now.unwrap_or_else(|| chrono::Local::now().naive_local()),
            report: None,
            completion: None,
            list_state: ListState::new(),
            status_message: String::new(),
        };
        app.rerun();
        app
    }

    /// Runs the pipeline from the pristine snapshot with the current options.
    pub fn rerun(&mut self) {
        self.now = self
            .pinned_now
            .unwrap_or_else(|| chrono::Local::now().naive_local());
        let mut view = self.source.clone();
        self.report = pipeline::run(&mut view, &self.options, self.now, &self.submitted_marker);
        self.completion = pipeline::run_completion(&mut view);
        self.view = view;

        self.status_message = match &self.report {
            Some(report) => report.to_string(),
            None => "No assignment list on this page.".into(),
        };
    }

    /// Handles a configuration update: merge, persist, re-run.
    pub fn notify(&mut self, update: OptionsUpdate) {
        self.options = self.options.apply(&update);
        self.rerun();
        if let Some(path) = &self.store_path {
            if let Err(e) = store::save(path, &self.options) {
                warn!("failed to persist options: {e:#}");
                self.status_message = format!("Options not saved: {e}");
            }
        }
    }

    pub fn toggle_split_table(&mut self) {
        self.notify(OptionsUpdate {
            split_table: Some(!self.options.split_table),
            ..OptionsUpdate::default()
        });
    }

    pub fn toggle_submitted_strike(&mut self) {
        self.notify(OptionsUpdate {
            submitted_strike: Some(!self.options.submitted_strike),
            ..OptionsUpdate::default()
        });
    }

    pub fn toggle_show_expired(&mut self) {
        self.notify(OptionsUpdate {
            show_expired_unsubmitted: Some(!self.options.show_expired_unsubmitted),
            ..OptionsUpdate::default()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::fixtures::row;
    use crate::extract::DEFAULT_SUBMITTED_MARKER;
    use crate::models::{Block, Container, Table};
    use crate::options::PresenterKind;
    use chrono::NaiveDate;

    fn app(store_path: Option<PathBuf>) -> App {
        let page = Page {
            assignment_list: Some(Container {
                blocks: vec![Block::Table(Table {
                    head: Vec::new(),
                    body: Some(vec![
                        row(1, "late essay", "2025.03.01 09:00 ~ 2025.03.05 18:00", "미제출"),
                        row(2, "soon quiz", "2025.03.01 09:00 ~ 2025.03.11 00:00", "미제출"),
                    ]),
                })],
            }),
            ..Page::default()
        };
        let now = NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        App::new(
            page,
            Options::default(),
            store_path,
            DEFAULT_SUBMITTED_MARKER.to_string(),
            Some(now),
        )
    }

    #[test]
    fn toggles_rebuild_from_the_source_page() {
        let mut app = app(None);
        assert_eq!(app.report.as_ref().unwrap().presenter, PresenterKind::Split);
        assert_eq!(app.view.assignment_list.as_ref().unwrap().tables().count(), 2);

        app.toggle_split_table();
        assert_eq!(app.report.as_ref().unwrap().presenter, PresenterKind::InPlace);
        let tables: Vec<_> = app.view.assignment_list.as_ref().unwrap().tables().collect();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].body.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn hiding_expired_in_place_keeps_row_count() {
        let mut app = app(None);
        app.toggle_split_table();
        app.toggle_show_expired();
        let report = app.report.as_ref().unwrap();
        assert_eq!(report.tally.hidden, 1);
        let table = app.view.assignment_list.as_ref().unwrap().tables().next().unwrap();
        assert_eq!(table.body.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn toggles_are_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        let mut app = app(Some(path.clone()));
        app.toggle_submitted_strike();
        let stored = store::current(Some(path.as_path()), Options::default());
        assert!(!stored.submitted_strike);
        assert!(stored.split_table);
    }
}
