//! Error types for the TUI.

use crate::api_client::ApiClientError;
use crate::config::ConfigError;
use crate::nav::NavError;
use libsearch_core::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum TuiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiClientError),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Nav(#[from] NavError),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Logging setup failed: {0}")]
    Logging(String),
}
