//! Settings error types

use std::path::PathBuf;

/// Errors that can occur while loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings: {0}")]
    Parse(String),

    #[error("Invalid setting {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

pub type SettingsResult<T> = Result<T, SettingsError>;
