//! Provider for platforms that have no config source

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::error::{FetchError, FetchResult};
use super::traits::Provider;
use crate::logging::{Logger, SharedLogger};
use crate::types::ConfigDocument;

pub const NOOP_PROVIDER_NAME: &str = "noop";

/// Always online, never retries, never has a config
///
/// Gives platforms without a real source a well-defined outcome: the race
/// resolves immediately and the run ends as an empty-config no-op.
pub struct NoopProvider {
    logger: SharedLogger,
}

impl NoopProvider {
    pub fn new(logger: SharedLogger) -> Self {
        Self { logger }
    }

    /// Factory used by the provider catalog
    pub fn create(logger: SharedLogger) -> Arc<dyn Provider> {
        Arc::new(Self::new(logger))
    }
}

#[async_trait]
impl Provider for NoopProvider {
    fn name(&self) -> &str {
        NOOP_PROVIDER_NAME
    }

    async fn is_online(&self) -> bool {
        true
    }

    fn should_retry(&self) -> bool {
        false
    }

    fn backoff_duration(&self) -> Duration {
        Duration::ZERO
    }

    async fn fetch_config(&self) -> FetchResult<ConfigDocument> {
        self.logger.debug("noop provider fetching empty config");
        Err(FetchError::Empty)
    }
}
