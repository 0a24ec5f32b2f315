//! Provider fetch error types

use thiserror::Error;

/// Errors that can occur when fetching a config from a provider
///
/// `Empty`, `CloudConfig` and `Script` are classifications rather than
/// failures: the source answered, but with something that is not a config
/// document. The engine turns them into a successful no-op run.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The source holds no config
    #[error("not a config (empty)")]
    Empty,

    /// The source holds a cloud-config, which is handled elsewhere
    #[error("not a config (found cloud-config)")]
    CloudConfig,

    /// The source holds a script rather than a config
    #[error("not a config (found script)")]
    Script,

    /// The source could not be reached or answered badly
    #[error("{provider} unavailable: {message}")]
    Unavailable { provider: String, message: String },

    /// IO error while reading the source
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The source returned bytes that are not a valid document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl FetchError {
    /// Create an unavailable error
    pub fn unavailable(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unavailable {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether this outcome should end the run successfully without running a stage
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::Empty | Self::CloudConfig | Self::Script)
    }
}

pub type FetchResult<T> = Result<T, FetchError>;
