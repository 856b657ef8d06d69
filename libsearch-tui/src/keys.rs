//! Keybinding definitions for the search page.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Close,
    MoveUp,
    MoveDown,
    NextPage,
    PrevPage,
    /// Jump to the n-th page link of the pager strip.
    JumpToStrip(usize),
    Play,
    Dismiss,
}

pub fn map_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent { code, modifiers, .. } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('x') => Some(Action::Close),
        KeyCode::Esc => Some(Action::Dismiss),
        KeyCode::Enter => Some(Action::Play),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Right | KeyCode::Char('n') | KeyCode::PageDown => Some(Action::NextPage),
        KeyCode::Left | KeyCode::Char('p') | KeyCode::PageUp => Some(Action::PrevPage),
        KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
            let idx = c.to_digit(10).map(|d| d as usize - 1)?;
            Some(Action::JumpToStrip(idx))
        }
        _ => None,
    }
}

pub const KEY_HELP: &str = "j/k move • n/p page • 1-9 jump • Enter play • x close • q quit";
