//! Configuration loading for the library search TUI.
//!
//! All fields are required unless explicitly marked optional. No defaults.

use libsearch_core::{CardMapping, ResultMessages, TelemetryRouteData};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TuiConfig {
    pub api_base_url: String,
    pub search_path: String,
    pub auth: ClientCredentials,
    pub request_timeout_ms: u64,
    pub refresh_interval_ms: u64,
    pub notification_ttl_ms: u64,
    pub error_log_path: PathBuf,
    pub search: SearchConfig,
    pub sort_options: Vec<SortOption>,
    pub card: CardMapping,
    pub messages: ResultMessages,
    pub telemetry: TelemetryRouteData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientCredentials {
    pub api_key: Option<String>,
    pub jwt: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Results per page.
    pub page_limit: u32,
    /// Number of page links in the pager strip.
    pub page_strip: u32,
    /// Filter keys shown first, in this order.
    pub filter_type: Vec<String>,
    /// Location opened when the search page is closed.
    pub redirect_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SortOption {
    pub field: String,
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl TuiConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::from_path(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: TuiConfig = toml::from_str(contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(invalid("api_base_url", "must not be empty"));
        }
        if !self.search_path.starts_with('/') {
            return Err(invalid("search_path", "must start with '/'"));
        }
        if self.auth.api_key.is_none() && self.auth.jwt.is_none() {
            return Err(invalid("auth", "api_key or jwt must be provided"));
        }
        if self.request_timeout_ms == 0 {
            return Err(invalid("request_timeout_ms", "must be > 0"));
        }
        if self.refresh_interval_ms == 0 {
            return Err(invalid("refresh_interval_ms", "must be > 0"));
        }
        if self.notification_ttl_ms == 0 {
            return Err(invalid("notification_ttl_ms", "must be > 0"));
        }
        if self.error_log_path.as_os_str().is_empty() {
            return Err(invalid("error_log_path", "must not be empty"));
        }
        if self.search.page_limit == 0 {
            return Err(invalid("search.page_limit", "must be > 0"));
        }
        if self.search.page_strip == 0 {
            return Err(invalid("search.page_strip", "must be > 0"));
        }
        if self.search.redirect_url.trim().is_empty() {
            return Err(invalid("search.redirect_url", "must not be empty"));
        }
        if self.sort_options.iter().any(|o| o.field.trim().is_empty()) {
            return Err(invalid("sort_options.field", "must not be empty"));
        }
        let messages = [
            &self.messages.no_result_title,
            &self.messages.no_result_text,
            &self.messages.search_failed_text,
            &self.messages.search_failed_toast,
        ];
        if messages.iter().any(|m| m.trim().is_empty()) {
            return Err(invalid("messages", "all messages must be non-empty"));
        }
        if self.telemetry.env.trim().is_empty() || self.telemetry.pageid.trim().is_empty() {
            return Err(invalid("telemetry", "env and pageid must be non-empty"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}
