//! Error types for core operations

use thiserror::Error;

/// Errors raised while building core values from external input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid query pair '{pair}': expected key=value")]
    InvalidQueryPair { pair: String },

    #[error("Invalid page number '{value}': must be a positive integer")]
    InvalidPageNumber { value: String },

    #[error("Invalid pager setting {field}: {reason}")]
    InvalidPagerSetting { field: &'static str, reason: String },
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
