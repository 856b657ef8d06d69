//! Event types for the TUI event loop.

use crate::api_client::ApiClientError;
use crate::nav::Location;
use crossterm::event::KeyEvent;
use libsearch_core::{Generation, ServerResponse};

#[derive(Debug)]
pub enum TuiEvent {
    Input(KeyEvent),
    Resize { width: u16, height: u16 },
    Navigate(Location),
    SearchCompleted {
        generation: Generation,
        outcome: Result<ServerResponse, ApiClientError>,
    },
}
