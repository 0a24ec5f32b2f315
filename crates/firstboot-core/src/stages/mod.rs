//! Pipeline stages
//!
//! A stage consumes the acquired config and performs provisioning work
//! (disks, files, users, ...). Stages live outside this crate; the engine
//! only looks them up by name, creates one per run and hands it the config.

mod traits;
mod registry;

pub use traits::{Stage, StageFactory};
pub use registry::StageRegistry;
