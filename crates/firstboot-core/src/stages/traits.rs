//! Stage trait definitions

use async_trait::async_trait;
use std::path::Path;

use crate::logging::SharedLogger;
use crate::types::ConfigDocument;

/// One run of a pipeline stage
#[async_trait]
pub trait Stage: Send + Sync {
    /// Apply the config. Returns true if the stage succeeded.
    async fn run(&self, config: &ConfigDocument) -> bool;
}

/// Creates stage instances
pub trait StageFactory: Send + Sync {
    /// Stage name, unique within a registry
    fn name(&self) -> &str;

    /// Create a stage that logs to `logger` and operates below `root`
    fn create(&self, logger: SharedLogger, root: &Path) -> Box<dyn Stage>;
}
