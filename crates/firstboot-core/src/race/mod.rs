//! Provider race
//!
//! Picks the first provider to come online. Every provider is probed by its
//! own task, on its own backoff schedule, while the coordinator waits for
//! whichever happens first:
//!
//! ```text
//! winner announced      -> Ok(provider)
//! every task dropped out -> Err(NoProviders)
//! deadline elapsed       -> Err(Timeout)
//! ```
//!
//! Whatever the outcome, the remaining tasks are told to stop and exit at
//! their next suspension point.

mod error;
mod select;

pub use error::{RaceError, RaceResult};
pub use select::select_provider;
