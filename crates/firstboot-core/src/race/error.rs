//! Provider race error types

use thiserror::Error;

/// Why a race ended without a winner
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceError {
    /// Every provider dropped out without coming online
    #[error("no config providers were online")]
    NoProviders,

    /// The deadline passed before any provider came online
    #[error("timed out while waiting for a config provider to come online")]
    Timeout,
}

pub type RaceResult<T> = Result<T, RaceError>;
