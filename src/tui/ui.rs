use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::App;
use crate::deadline::format_deadline;
use crate::models::{self, Row, Table};

const ACCENT: Color = Color::Cyan;
const HEADER_BG: Color = Color::DarkGray;
const SELECTED_BG: Color = Color::Rgb(40, 40, 60);
const DIM: Color = Color::DarkGray;
const GOOD: Color = Color::Green;
const OFF: Color = Color::Red;

/// Widest a single column may grow before its text is cut.
const MAX_COLUMN_WIDTH: usize = 40;

// ─── Main render ────────────────────────────────────────────────────────────

pub fn render(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_options_bar(f, app, chunks[0]);
    render_assignments(f, app, chunks[1]);
    render_status_bar(f, app, chunks[2]);
}

// ─── Options Bar ────────────────────────────────────────────────────────────

fn flag(key: &str, name: &str, on: bool) -> Vec<Span<'static>> {
    vec![
        Span::styled(format!(" {key} "), Style::default().fg(DIM)),
        Span::styled(
            format!("{name} "),
            Style::default().fg(if on { GOOD } else { OFF }),
        ),
    ]
}

fn render_options_bar(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();
    spans.extend(flag("s", "split tables", app.options.split_table));
    spans.extend(flag("x", "strike submitted", app.options.submitted_strike));
    spans.extend(flag("e", "show expired", app.options.show_expired_unsubmitted));
    spans.push(Span::styled(
        format!("   now {}", format_deadline(app.now)),
        Style::default().fg(ACCENT),
    ));

    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .title(" duesort ")
            .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
    );
    f.render_widget(bar, area);
}

// ─── Status Bar ─────────────────────────────────────────────────────────────

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let completion = app
        .completion
        .map(|c| format!("  completion {}", c.display()))
        .unwrap_or_default();
    let hidden = app
        .report
        .as_ref()
        .map(|r| r.tally.hidden)
        .filter(|n| *n > 0)
        .map(|n| format!("  ({n} hidden)"))
        .unwrap_or_default();

    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(&app.status_message, Style::default().fg(Color::White)),
        Span::styled(hidden, Style::default().fg(DIM)),
        Span::styled(completion, Style::default().fg(ACCENT)),
        Span::styled("  q:quit  j/k:nav  r:rerun  ", Style::default().fg(DIM)),
    ]))
    .style(Style::default().bg(HEADER_BG));

    f.render_widget(status, area);
}

// ─── Assignments ────────────────────────────────────────────────────────────

fn render_assignments(f: &mut Frame, app: &mut App, area: Rect) {
    let mut items = page_lines(&app.view)
        .into_iter()
        .map(ListItem::new)
        .collect::<Vec<_>>();

    if items.is_empty() {
        items.push(ListItem::new("  No assignments found."));
    }
    app.list_state.set_len(items.len());

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Assignments ")
                .title_style(Style::default().fg(ACCENT)),
        )
        .highlight_style(Style::default().bg(SELECTED_BG));

    app.list_state.inner.select(Some(app.list_state.selected));
    f.render_stateful_widget(list, area, &mut app.list_state.inner);
}

/// One line per heading and per visible row of the assignment list.
pub fn page_lines(page: &models::Page) -> Vec<Line<'static>> {
    let Some(container) = &page.assignment_list else {
        return Vec::new();
    };

    let mut lines = Vec::new();
    for block in &container.blocks {
        match block {
            models::Block::Heading(heading) => {
                lines.push(Line::from(Span::styled(
                    format!("── {} ──", heading.text),
                    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                )));
            }
            models::Block::Table(table) => lines.extend(table_lines(table)),
        }
    }
    lines
}

fn table_lines(table: &Table) -> Vec<Line<'static>> {
    let widths = column_widths(table);
    let mut lines: Vec<Line<'static>> = table
        .head
        .iter()
        .map(|row| row_line(row, &widths, Style::default().fg(DIM).add_modifier(Modifier::BOLD)))
        .collect();

    for row in table.body.iter().flatten().filter(|r| !r.is_hidden()) {
        lines.push(row_line(row, &widths, row_style(&row.style)));
    }
    lines
}

fn row_line(row: &Row, widths: &[usize], style: Style) -> Line<'static> {
    let text = row
        .cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad(&cell.text, *width))
        .collect::<Vec<_>>()
        .join("  ");
    Line::from(Span::styled(format!("  {text}"), style))
}

fn column_widths(table: &Table) -> Vec<usize> {
    let mut widths: Vec<usize> = Vec::new();
    for row in table.rows().filter(|r| !r.is_hidden()) {
        for (idx, cell) in row.cells.iter().enumerate() {
            let width = cell.text.width().min(MAX_COLUMN_WIDTH);
            match widths.get_mut(idx) {
                Some(w) => *w = (*w).max(width),
                None => widths.push(width),
            }
        }
    }
    widths
}

/// Pads or cuts `text` to exactly `width` terminal columns.
pub fn pad(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    if text.width() > width {
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0);
            if used + w + 1 > width {
                break;
            }
            out.push(ch);
            used += w;
        }
        out.push('…');
        used += 1;
    } else {
        out.push_str(text);
        used = text.width();
    }
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(used)));
    out
}

/// Terminal style for a row's inline CSS.
pub fn row_style(style: &models::Style) -> Style {
    let mut out = Style::default();
    let background = style.get("background-color").and_then(css_color);
    if let Some(bg) = background {
        out = out.bg(bg).fg(Color::Black);
    }
    if let Some(fg) = style.get("color").and_then(css_color) {
        out = out.fg(if background.is_some() { Color::DarkGray } else { fg });
    }
    if style.is_struck() {
        out = out.add_modifier(Modifier::CROSSED_OUT);
    }
    out
}

pub fn css_color(value: &str) -> Option<Color> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        return Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?));
    }
    match value.to_ascii_lowercase().as_str() {
        "gray" | "grey" => Some(Color::Gray),
        "black" => Some(Color::Black),
        "white" => Some(Color::White),
        "red" => Some(Color::Red),
        "blue" => Some(Color::Blue),
        _ => None,
    }
}
