//! End-to-end acquisition scenarios

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tempfile::tempdir;
use tokio::time::Instant;

use firstboot_core::providers::{MockFetch, MockLiveness, MockRetry};
use firstboot_core::{
    select_provider, AcquireError, ConfigDocument, Engine, EngineSettings, LogLevel, MemoryLogger,
    MockProvider, NoOpLogger, Provider, ProviderCatalog, ProviderRegistry, RaceError, SharedLogger,
    Stage, StageFactory,
};

/// Stage factory that counts how often a stage gets built
#[derive(Default)]
struct CountingStages {
    created: AtomicU32,
}

struct Succeed;

#[async_trait]
impl Stage for Succeed {
    async fn run(&self, _config: &ConfigDocument) -> bool {
        true
    }
}

impl StageFactory for CountingStages {
    fn name(&self) -> &str {
        "first-stage"
    }

    fn create(&self, _logger: SharedLogger, _root: &Path) -> Box<dyn Stage> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Box::new(Succeed)
    }
}

fn settings(cache: PathBuf) -> EngineSettings {
    EngineSettings::default()
        .with_config_cache(cache)
        .with_fetch_timeout(Duration::from_secs(1))
}

#[tokio::test(start_paused = true)]
async fn noop_only_registry_is_a_successful_no_op() {
    let dir = tempdir().unwrap();
    let logger = Arc::new(MemoryLogger::new());
    let providers =
        ProviderRegistry::from_catalog(&ProviderCatalog::with_builtins(), ["noop"], logger.clone()).unwrap();
    let stages = Arc::new(CountingStages::default());

    let mut engine = Engine::new(settings(dir.path().join("cache.json")), logger.clone()).with_providers(providers);
    engine.add_stage(stages.clone()).unwrap();

    assert!(engine.run("first-stage").await);
    assert_eq!(stages.created.load(Ordering::SeqCst), 0, "stage must never be constructed");
    assert!(logger.contains(LogLevel::Info, "not a config (empty)"));
}

#[tokio::test(start_paused = true)]
async fn dropout_and_slow_provider_race() {
    let a = Arc::new(MockProvider::offline("A"));
    let b = Arc::new(
        MockProvider::new("B")
            .with_liveness(MockLiveness::AfterProbes(2))
            .with_retry(MockRetry::Forever)
            .with_backoff(Duration::from_millis(10)),
    );
    let set: Vec<Arc<dyn Provider>> = vec![a.clone(), b.clone()];
    let logger: SharedLogger = Arc::new(NoOpLogger);
    let start = Instant::now();

    let winner = select_provider(&set, Duration::from_secs(1), &logger).await.unwrap();

    assert_eq!(winner.name(), "B");
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(20), "elapsed {:?}", elapsed);
    assert!(elapsed <= Duration::from_millis(30), "elapsed {:?}", elapsed);
    assert_eq!(a.probe_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn empty_registry_without_cache_fails() {
    let dir = tempdir().unwrap();
    let logger = Arc::new(MemoryLogger::new());
    let mut engine = Engine::new(settings(dir.path().join("cache.json")), logger.clone());
    engine.add_stage(Arc::new(CountingStages::default())).unwrap();

    let err = engine.acquire_config().await.unwrap_err();
    assert!(matches!(err, AcquireError::Race(RaceError::NoProviders)));

    assert!(!engine.run("first-stage").await);
    assert!(logger.contains(LogLevel::Crit, "no config providers were online"));
}

#[tokio::test(start_paused = true)]
async fn valid_cache_short_circuits_providers() {
    let dir = tempdir().unwrap();
    let cache = dir.path().join("cache.json");
    let doc = ConfigDocument::new(json!({"ignition": {"version": "1"}, "systemd": {"units": []}}));
    std::fs::write(&cache, doc.to_vec().unwrap()).unwrap();

    let tripwire = Arc::new(
        MockProvider::online("ec2", json!({}))
            .with_fetch(MockFetch::Fail("providers must not be consulted".to_string())),
    );
    let mut engine = Engine::new(settings(cache), Arc::new(NoOpLogger));
    engine.add_provider(tripwire.clone()).unwrap();

    assert_eq!(engine.acquire_config().await.unwrap(), doc);
    assert_eq!(tripwire.probe_count(), 0);
    assert_eq!(tripwire.fetch_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn second_acquisition_comes_from_cache() {
    let dir = tempdir().unwrap();
    let cache = dir.path().join("cache.json");
    let provider = Arc::new(MockProvider::online("gce", json!({"passwd": {"users": [{"name": "core"}]}})));

    let mut engine = Engine::new(settings(cache), Arc::new(NoOpLogger));
    engine.add_provider(provider.clone()).unwrap();

    let first = engine.acquire_config().await.unwrap();
    let second = engine.acquire_config().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(provider.fetch_count(), 1);
    assert_eq!(provider.probe_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn unreachable_providers_time_out_within_one_backoff() {
    let set: Vec<Arc<dyn Provider>> = vec![
        Arc::new(MockProvider::unreachable("azure", Duration::from_millis(40))),
        Arc::new(MockProvider::unreachable("openstack", Duration::from_millis(25))),
    ];
    let logger: SharedLogger = Arc::new(NoOpLogger);
    let timeout = Duration::from_millis(500);
    let start = Instant::now();

    let result = select_provider(&set, timeout, &logger).await;

    assert_eq!(result.err(), Some(RaceError::Timeout));
    let elapsed = start.elapsed();
    assert!(elapsed >= timeout);
    assert!(elapsed <= timeout + Duration::from_millis(40));
}
