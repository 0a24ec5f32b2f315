//! Config acquisition engine
//!
//! ```text
//! Engine::run(stage)
//!     -> acquire_config()
//!            cache hit  -> cached document
//!            cache miss -> race providers -> fetch from winner -> write cache
//!     -> stage.run(document)
//! ```
//!
//! Empty, cloud-config and script outcomes end the run successfully without
//! running the stage. Every other failure is logged as critical and fails the run.

mod cache;
mod error;
mod runner;

pub use cache::{ConfigCache, CACHE_FILE_MODE};
pub use error::{AcquireError, AcquireResult};
pub use runner::Engine;
