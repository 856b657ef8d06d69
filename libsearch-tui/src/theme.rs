//! Color palette of the search page.

use crate::notifications::NotificationLevel;
use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color,
    pub tertiary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_dim: Color,
    pub border: Color,
    pub highlight_bg: Color,
}

impl Theme {
    pub fn synthbrute() -> Self {
        Self {
            primary: Color::Rgb(0, 255, 255),
            tertiary: Color::Rgb(255, 255, 0),
            success: Color::Rgb(0, 255, 0),
            warning: Color::Rgb(255, 255, 0),
            error: Color::Rgb(255, 0, 0),
            info: Color::Rgb(0, 255, 255),
            text: Color::Rgb(255, 255, 255),
            text_dim: Color::Rgb(136, 136, 136),
            border: Color::Rgb(68, 68, 68),
            highlight_bg: Color::Rgb(42, 42, 42),
        }
    }
}

pub fn notification_color(level: NotificationLevel, theme: &Theme) -> Color {
    match level {
        NotificationLevel::Info => theme.info,
        NotificationLevel::Warning => theme.warning,
        NotificationLevel::Error => theme.error,
    }
}

/// Rating strings are free-form; anything unparsable is dim.
pub fn rating_color(rating: &str, theme: &Theme) -> Color {
    match rating.trim().parse::<f32>() {
        Ok(value) if value >= 4.0 => theme.success,
        Ok(value) if value >= 2.5 => theme.tertiary,
        Ok(value) if value > 0.0 => theme.warning,
        _ => theme.text_dim,
    }
}
