//! Tracing subscriber setup.
//!
//! The terminal UI owns stdout/stderr while it runs, so interactive sessions
//! log to a file. One-shot runs log JSON lines to stderr.

use crate::error::TuiError;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

pub fn init_logging(target: &LogTarget) -> Result<(), TuiError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    let result = match target {
        LogTarget::Stderr => builder.json().with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => {
            let file = open_log_file(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
    };
    result.map_err(|e| TuiError::Logging(e.to_string()))
}

fn open_log_file(path: &Path) -> Result<std::fs::File, TuiError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}
