//! Acquisition error types

use std::path::PathBuf;

use thiserror::Error;

use crate::providers::FetchError;
use crate::race::RaceError;

/// Errors that can occur while acquiring the config
#[derive(Error, Debug)]
pub enum AcquireError {
    /// No provider won the race
    #[error(transparent)]
    Race(#[from] RaceError),

    /// The winning provider failed to fetch, or returned a non-document
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The cache file exists but does not hold a document
    #[error("failed to parse cached config {path}: {source}")]
    CacheParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to marshal cached config: {0}")]
    CacheEncode(#[source] serde_json::Error),

    #[error("failed to write cached config {path}: {source}")]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AcquireError {
    /// Whether the run should end successfully without running the stage
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::Fetch(err) if err.is_benign())
    }
}

pub type AcquireResult<T> = Result<T, AcquireError>;
