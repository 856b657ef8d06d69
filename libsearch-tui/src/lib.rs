//! Library search TUI exports.

pub mod api_client;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod keys;
pub mod logging;
pub mod nav;
pub mod notifications;
pub mod player;
pub mod runtime;
pub mod state;
pub mod theme;
pub mod views;
pub mod widgets;
