//! View rendering for the search page.

pub mod results;

use crate::keys::KEY_HELP;
use crate::state::App;
use crate::theme::notification_color;
use crate::widgets::PagerStrip;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const HEADER_HEIGHT: u16 = 3;
const PAGER_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 3;

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(PAGER_HEIGHT),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);
    results::render(f, app, layout[1]);
    PagerStrip {
        pager: app.controller.state().pager.as_ref(),
        style: Style::default().fg(app.theme.text_dim),
        current_style: Style::default().fg(app.theme.primary),
        border_style: Style::default().fg(app.theme.border),
    }
    .render(f, layout[2]);
    render_footer(f, app, layout[3]);
}

/// Number of cards the result list can show on a terminal `height` rows tall.
pub fn results_viewport_rows(height: u16) -> usize {
    let body = height.saturating_sub(HEADER_HEIGHT + PAGER_HEIGHT + FOOTER_HEIGHT);
    let inner = body.saturating_sub(2) as usize;
    (inner / results::CARD_HEIGHT).max(1)
}

/// One-line summary of the active query: text, filters, sort.
pub fn query_summary(app: &App) -> String {
    let state = app.controller.state();
    let mut parts = Vec::new();
    if let Some(text) = &state.query.text {
        parts.push(format!("\"{}\"", text));
    }

    let filters = &state.query.filters;
    let ordered = app.controller.filter_type();
    for key in ordered {
        if let Some(value) = filters.get(key) {
            parts.push(format!("{}: {}", key, value.to_query_string()));
        }
    }
    for (key, value) in filters.iter() {
        if !ordered.iter().any(|k| k == key) {
            parts.push(format!("{}: {}", key, value.to_query_string()));
        }
    }

    if let Some(sort) = app.controller.active_sort_name() {
        parts.push(format!("sorted by {}", sort));
    }
    if parts.is_empty() {
        "All content".to_string()
    } else {
        parts.join(" | ")
    }
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let title = match &app.location {
        Some(location) => format!("LIBRARY SEARCH | opened {}", location),
        None => "LIBRARY SEARCH".to_string(),
    };
    let header = Paragraph::new(query_summary(app))
        .style(Style::default().fg(app.theme.text))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border))
                .title(Span::styled(title, Style::default().fg(app.theme.primary))),
        );
    f.render_widget(header, area);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let (text, style) = if let Some(note) = app.controller.notifications().last() {
        (
            format!("{}: {}", note.level.label(), note.message),
            Style::default().fg(notification_color(note.level, &app.theme)),
        )
    } else {
        (KEY_HELP.to_string(), Style::default().fg(app.theme.text_dim))
    };
    let footer = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(style);
    f.render_widget(footer, area);
}
