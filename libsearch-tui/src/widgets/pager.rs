//! Page strip widget.

use libsearch_core::Pager;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct PagerStrip<'a> {
    pub pager: Option<&'a Pager>,
    pub style: Style,
    pub current_style: Style,
    pub border_style: Style,
}

impl PagerStrip<'_> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let line = match self.pager {
            Some(pager) => Line::from(strip_spans(pager, self.style, self.current_style)),
            None => Line::from(Span::styled("-", self.style)),
        };
        let paragraph = Paragraph::new(line).block(
            Block::default()
                .title("Pages")
                .borders(Borders::ALL)
                .border_style(self.border_style),
        );
        f.render_widget(paragraph, area);
    }
}

/// Text of the strip, e.g. `‹ 1 [2] 3 ›  page 2/3 · 45 results`.
pub fn strip_text(pager: &Pager) -> String {
    strip_spans(pager, Style::default(), Style::default())
        .iter()
        .map(|span| span.content.as_ref())
        .collect()
}

fn strip_spans(pager: &Pager, style: Style, current_style: Style) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let prev = if pager.has_previous() { "‹ " } else { "  " };
    spans.push(Span::styled(prev, style));
    for page in &pager.pages {
        if *page == pager.current_page {
            spans.push(Span::styled(
                format!("[{}]", page),
                current_style.add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(page.to_string(), style));
        }
        spans.push(Span::styled(" ", style));
    }
    let next = if pager.has_next() { "›" } else { " " };
    spans.push(Span::styled(next, style));
    spans.push(Span::styled(
        format!(
            "  page {}/{} · {} results",
            pager.current_page, pager.total_pages, pager.total_items
        ),
        style,
    ));
    spans
}
