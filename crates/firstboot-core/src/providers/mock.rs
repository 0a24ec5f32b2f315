//! Mock provider for testing
//!
//! Scripted liveness and fetch behaviour without any real source. Used to
//! drive the provider race and the engine through every outcome.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::error::{FetchError, FetchResult};
use super::traits::Provider;
use crate::types::ConfigDocument;

/// When the mock reports itself online
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockLiveness {
    /// Online on the first probe
    Immediately,
    /// Offline for this many probes, online afterwards
    AfterProbes(u32),
    /// Never online
    Never,
}

/// How many negative probes the mock retries after
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockRetry {
    /// Drop out after the first negative probe
    Never,
    /// Retry this many times, then drop out
    Times(u32),
    Forever,
}

/// What `fetch_config` returns
#[derive(Debug, Clone)]
pub enum MockFetch {
    Document(Value),
    Empty,
    CloudConfig,
    Script,
    /// A non-benign failure with the given message
    Fail(String),
}

impl MockFetch {
    fn outcome(&self, provider: &str) -> FetchResult<ConfigDocument> {
        match self {
            MockFetch::Document(value) => Ok(ConfigDocument::new(value.clone())),
            MockFetch::Empty => Err(FetchError::Empty),
            MockFetch::CloudConfig => Err(FetchError::CloudConfig),
            MockFetch::Script => Err(FetchError::Script),
            MockFetch::Fail(message) => Err(FetchError::unavailable(provider, message.clone())),
        }
    }
}

/// Configuration for the mock provider
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub liveness: MockLiveness,
    pub retry: MockRetry,
    pub backoff: Duration,
    pub fetch: MockFetch,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            liveness: MockLiveness::Immediately,
            retry: MockRetry::Never,
            backoff: Duration::from_millis(10),
            fetch: MockFetch::Empty,
        }
    }
}

/// Scripted provider for tests
pub struct MockProvider {
    name: String,
    config: MockConfig,
    probes: AtomicU32,
    retries: AtomicU32,
    fetches: AtomicU32,
    backoffs: Mutex<Vec<Duration>>,
}

impl MockProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, MockConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: MockConfig) -> Self {
        Self {
            name: name.into(),
            config,
            probes: AtomicU32::new(0),
            retries: AtomicU32::new(0),
            fetches: AtomicU32::new(0),
            backoffs: Mutex::new(Vec::new()),
        }
    }

    /// Online on the first probe, fetch returns `document`
    pub fn online(name: impl Into<String>, document: Value) -> Self {
        Self::new(name).with_fetch(MockFetch::Document(document))
    }

    /// Never online, drops out after the first probe
    pub fn offline(name: impl Into<String>) -> Self {
        Self::new(name).with_liveness(MockLiveness::Never)
    }

    /// Never online, keeps retrying every `backoff`
    pub fn unreachable(name: impl Into<String>, backoff: Duration) -> Self {
        Self::new(name)
            .with_liveness(MockLiveness::Never)
            .with_retry(MockRetry::Forever)
            .with_backoff(backoff)
    }

    pub fn with_liveness(mut self, liveness: MockLiveness) -> Self {
        self.config.liveness = liveness;
        self
    }

    pub fn with_retry(mut self, retry: MockRetry) -> Self {
        self.config.retry = retry;
        self
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.config.backoff = backoff;
        self
    }

    pub fn with_fetch(mut self, fetch: MockFetch) -> Self {
        self.config.fetch = fetch;
        self
    }

    /// Number of `is_online` calls so far
    pub fn probe_count(&self) -> u32 {
        self.probes.load(Ordering::SeqCst)
    }

    /// Number of `fetch_config` calls so far
    pub fn fetch_count(&self) -> u32 {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Every backoff handed out, in order
    pub fn backoffs(&self) -> Vec<Duration> {
        self.backoffs.lock().clone()
    }

    /// Convenience for registering a shared handle while keeping one for assertions
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl std::fmt::Debug for MockProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockProvider")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("probes", &self.probe_count())
            .field("fetches", &self.fetch_count())
            .finish()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn is_online(&self) -> bool {
        let seen = self.probes.fetch_add(1, Ordering::SeqCst);
        match self.config.liveness {
            MockLiveness::Immediately => true,
            MockLiveness::AfterProbes(offline) => seen >= offline,
            MockLiveness::Never => false,
        }
    }

    fn should_retry(&self) -> bool {
        match self.config.retry {
            MockRetry::Never => false,
            MockRetry::Forever => true,
            MockRetry::Times(limit) => self.retries.fetch_add(1, Ordering::SeqCst) < limit,
        }
    }

    fn backoff_duration(&self) -> Duration {
        self.backoffs.lock().push(self.config.backoff);
        self.config.backoff
    }

    async fn fetch_config(&self) -> FetchResult<ConfigDocument> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.config.fetch.outcome(&self.name)
    }
}
