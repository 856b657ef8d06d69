//! Result list of the search page.

use crate::state::App;
use crate::theme::rating_color;
use crate::widgets::StatusIndicator;
use libsearch_core::Card;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Terminal rows taken by one card.
pub const CARD_HEIGHT: usize = 2;

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let state = app.controller.state();

    if state.show_loader {
        StatusIndicator {
            title: "Results",
            headline: None,
            detail: "Searching…",
            style: Style::default().fg(app.theme.info),
            border_style: Style::default().fg(app.theme.border),
        }
        .render(f, area);
        return;
    }

    if state.no_result {
        let (headline, detail) = match &state.no_result_message {
            Some(message) => (message.message.as_deref(), message.message_text.as_str()),
            None => (None, ""),
        };
        let color = if headline.is_some() { app.theme.warning } else { app.theme.error };
        StatusIndicator {
            title: "Results",
            headline,
            detail,
            style: Style::default().fg(color),
            border_style: Style::default().fg(app.theme.border),
        }
        .render(f, area);
        return;
    }

    let cards = app.cards();
    let items: Vec<ListItem> = cards
        .iter()
        .skip(app.offset)
        .take(app.viewport_rows)
        .map(|card| card_item(card, app))
        .collect();

    let mut list_state = ListState::default();
    if !cards.is_empty() {
        list_state.select(Some(app.selected.saturating_sub(app.offset)));
    }

    let title = format!("Results ({})", state.total_count);
    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .highlight_style(
            Style::default()
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD),
        );
    f.render_stateful_widget(list, area, &mut list_state);
}

fn card_item<'a>(card: &'a Card, app: &App) -> ListItem<'a> {
    let theme = &app.theme;
    let title = Line::from(vec![
        Span::styled(card.title(), Style::default().fg(theme.text)),
        Span::raw("  "),
        Span::styled(
            format!("★ {}", card.rating),
            Style::default().fg(rating_color(&card.rating, theme)),
        ),
    ]);

    let mut details = vec![card.object_type.clone()];
    details.extend(
        card.fields
            .iter()
            .filter(|(_, value)| !value.is_object())
            .filter_map(|(key, _)| card.field_str(key).map(|value| format!("{}: {}", key, value))),
    );
    let detail = Line::from(Span::styled(
        format!("  {}", details.join(" · ")),
        Style::default().fg(theme.text_dim),
    ));

    ListItem::new(vec![title, detail])
}
