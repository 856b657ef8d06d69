//! Status panel for loader and "no result" states.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct StatusIndicator<'a> {
    pub title: &'a str,
    pub headline: Option<&'a str>,
    pub detail: &'a str,
    pub style: Style,
    pub border_style: Style,
}

impl StatusIndicator<'_> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let mut lines = Vec::new();
        if let Some(headline) = self.headline {
            lines.push(Line::from(Span::styled(
                headline.to_string(),
                self.style.add_modifier(Modifier::BOLD),
            )));
        }
        lines.push(Line::from(Span::styled(self.detail.to_string(), self.style)));

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(self.title)
                    .borders(Borders::ALL)
                    .border_style(self.border_style),
            );
        f.render_widget(paragraph, area);
    }
}
