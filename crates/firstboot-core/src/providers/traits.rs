//! Provider trait definition

use async_trait::async_trait;
use std::time::Duration;

use crate::types::ConfigDocument;
use super::error::FetchResult;

/// A source of the config document
///
/// Each platform (metadata service, config drive, ...) implements this trait.
/// During a race a provider is probed by a single task, so `is_online`,
/// `should_retry` and `backoff_duration` are never called concurrently for
/// the same instance. Providers that track attempts use interior mutability.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get the provider name (e.g., "noop", "ec2"), unique within a registry
    fn name(&self) -> &str;

    /// Probe whether the source is reachable right now
    ///
    /// Should return quickly; the race may abandon a probe that is still
    /// running when another provider wins.
    async fn is_online(&self) -> bool;

    /// Asked after a negative probe. `false` drops this provider out of the race.
    fn should_retry(&self) -> bool;

    /// How long to wait before the next probe
    fn backoff_duration(&self) -> Duration;

    /// Fetch the config. Only called on the provider that won the race.
    async fn fetch_config(&self) -> FetchResult<ConfigDocument>;
}
