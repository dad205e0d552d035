use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use std::time::Duration;

use super::App;

pub fn poll_event(timeout: Duration) -> anyhow::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

pub fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match (code, modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.running = false;
        }
        (KeyCode::Char('s'), _) => app.toggle_split_table(),
        (KeyCode::Char('x'), _) => app.toggle_submitted_strike(),
        (KeyCode::Char('e'), _) => app.toggle_show_expired(),
        (KeyCode::Char('r'), _) => app.rerun(),
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => app.list_state.select_next(),
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => app.list_state.select_prev(),
        (KeyCode::Home, _) | (KeyCode::Char('g'), _) => app.list_state.selected = 0,
        (KeyCode::End, _) | (KeyCode::Char('G'), _) => {
            let ls = &mut app.list_state;
            if ls.len > 0 {
                ls.selected = ls.len - 1;
            }
        }
        _ => {}
    }
}
