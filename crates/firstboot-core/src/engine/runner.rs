//! The engine that acquires the config and runs a stage with it

use std::sync::Arc;

use super::cache::ConfigCache;
use super::error::{AcquireError, AcquireResult};
use crate::logging::{Logger, PrefixedLogger, SharedLogger};
use crate::providers::{Provider, ProviderRegistry, RegistryResult};
use crate::race::select_provider;
use crate::settings::EngineSettings;
use crate::stages::{StageFactory, StageRegistry};
use crate::types::ConfigDocument;
use crate::{log_crit, log_debug, log_info};

/// Fetches the config and executes a stage with it
///
/// Providers and stages are registered once at startup; a run only reads them.
///
/// # Example
///
/// ```no_run
/// use firstboot_core::{ConsoleLogger, Engine, EngineSettings, NoopProvider};
/// use std::sync::Arc;
///
/// # async fn boot() {
/// let logger = Arc::new(ConsoleLogger::new());
/// let mut engine = Engine::new(EngineSettings::default(), logger.clone());
/// engine.add_provider(Arc::new(NoopProvider::new(logger))).unwrap();
///
/// let ok = engine.run("disks").await;
/// # }
/// ```
pub struct Engine {
    settings: EngineSettings,
    cache: ConfigCache,
    logger: SharedLogger,
    providers: ProviderRegistry,
    stages: StageRegistry,
}

impl Engine {
    pub fn new(settings: EngineSettings, logger: SharedLogger) -> Self {
        Self {
            cache: ConfigCache::new(settings.config_cache.clone()),
            settings,
            logger,
            providers: ProviderRegistry::new(),
            stages: StageRegistry::new(),
        }
    }

    /// Replace the provider registry
    pub fn with_providers(mut self, providers: ProviderRegistry) -> Self {
        self.providers = providers;
        self
    }

    /// Replace the stage registry
    pub fn with_stages(mut self, stages: StageRegistry) -> Self {
        self.stages = stages;
        self
    }

    /// Register a config provider with the engine
    pub fn add_provider(&mut self, provider: Arc<dyn Provider>) -> RegistryResult<()> {
        self.providers.register(provider)
    }

    /// Register a stage with the engine
    pub fn add_stage(&mut self, stage: Arc<dyn StageFactory>) -> RegistryResult<()> {
        self.stages.register(stage)
    }

    /// Get a registered provider by name
    pub fn provider(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(name)
    }

    /// All registered providers in alphabetical order
    pub fn providers(&self) -> Vec<Arc<dyn Provider>> {
        self.providers.providers()
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Execute the named stage
    ///
    /// Returns true if the stage ran successfully, or if the config turned
    /// out to be empty, a cloud-config or a script (nothing to do). Returns
    /// false on any other failure.
    pub async fn run(&self, stage_name: &str) -> bool {
        let config = match self.acquire_config().await {
            Ok(config) => config,
            Err(err) if err.is_benign() => {
                log_info!(self.logger, "{}: ignoring and exiting...", err);
                return true;
            }
            Err(err) => {
                log_crit!(self.logger, "{}: failed to acquire config: {}", stage_name, err);
                return false;
            }
        };

        let Some(factory) = self.stages.get(stage_name) else {
            log_crit!(self.logger, "{}: no such stage", stage_name);
            return false;
        };

        let logger: SharedLogger = Arc::new(PrefixedLogger::new(Arc::clone(&self.logger), stage_name));
        factory.create(logger, &self.settings.root).run(&config).await
    }

    /// Return the config, from the cache if present, otherwise from the
    /// first provider to come online
    ///
    /// A freshly fetched config is written to the cache before it is returned;
    /// failing to write it fails the acquisition.
    pub async fn acquire_config(&self) -> AcquireResult<ConfigDocument> {
        match self.cache.load() {
            Ok(Some(config)) => {
                log_debug!(self.logger, "using cached config from {}", self.cache.path().display());
                return Ok(config);
            }
            Ok(None) => {}
            Err(err) => {
                self.logger.crit(&err.to_string());
                return Err(err);
            }
        }

        let config = self.fetch_config().await?;
        log_debug!(self.logger, "fetched config: {}", config.as_value());

        if let Err(err) = self.cache.store(&config) {
            self.logger.crit(&err.to_string());
            return Err(err);
        }

        Ok(config)
    }

    /// Race the registered providers and fetch from the winner
    async fn fetch_config(&self) -> AcquireResult<ConfigDocument> {
        let providers = self.providers();
        let provider = select_provider(&providers, self.settings.fetch_timeout, &self.logger)
            .await
            .map_err(|err| {
                log_crit!(self.logger, "failed to fetch config: {}", err);
                AcquireError::from(err)
            })?;

        provider.fetch_config().await.map_err(|err| {
            if !err.is_benign() {
                log_crit!(self.logger, "failed to fetch config from {}: {}", provider.name(), err);
            }
            AcquireError::from(err)
        })
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("settings", &self.settings)
            .field("providers", &self.providers)
            .field("stages", &self.stages)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogLevel, MemoryLogger};
    use crate::providers::{MockFetch, MockProvider, NoopProvider};
    use crate::race::RaceError;
    use crate::stages::Stage;
    use async_trait::async_trait;
    use serde_json::json;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use tempfile::{tempdir, TempDir};

    #[derive(Default)]
    struct Recorder {
        created: AtomicU32,
        seen: parking_lot::Mutex<Vec<(ConfigDocument, PathBuf)>>,
    }

    struct RecordingStage {
        recorder: Arc<Recorder>,
        root: PathBuf,
        logger: SharedLogger,
        succeed: bool,
    }

    #[async_trait]
    impl Stage for RecordingStage {
        async fn run(&self, config: &ConfigDocument) -> bool {
            self.logger.info("running");
            self.recorder.seen.lock().push((config.clone(), self.root.clone()));
            self.succeed
        }
    }

    struct RecordingFactory {
        name: &'static str,
        recorder: Arc<Recorder>,
        succeed: bool,
    }

    impl StageFactory for RecordingFactory {
        fn name(&self) -> &str {
            self.name
        }

        fn create(&self, logger: SharedLogger, root: &Path) -> Box<dyn Stage> {
            self.recorder.created.fetch_add(1, Ordering::SeqCst);
            Box::new(RecordingStage {
                recorder: Arc::clone(&self.recorder),
                root: root.to_path_buf(),
                logger,
                succeed: self.succeed,
            })
        }
    }

    struct Fixture {
        _dir: TempDir,
        cache_path: PathBuf,
        logger: Arc<MemoryLogger>,
        recorder: Arc<Recorder>,
        engine: Engine,
    }

    fn fixture(stage_succeeds: bool) -> Fixture {
        let dir = tempdir().unwrap();
        let cache_path = dir.path().join("firstboot.json");
        let logger = Arc::new(MemoryLogger::new());
        let settings = EngineSettings::default()
            .with_config_cache(&cache_path)
            .with_fetch_timeout(Duration::from_secs(1))
            .with_root("/sysroot");
        let recorder = Arc::new(Recorder::default());

        let mut engine = Engine::new(settings, logger.clone());
        engine
            .add_stage(Arc::new(RecordingFactory {
                name: "disks",
                recorder: Arc::clone(&recorder),
                succeed: stage_succeeds,
            }))
            .unwrap();

        Fixture {
            _dir: dir,
            cache_path,
            logger,
            recorder,
            engine,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetches_caches_and_runs_stage() {
        let mut f = fixture(true);
        let doc = json!({"storage": {"disks": []}});
        let provider = MockProvider::online("ec2", doc.clone()).shared();
        f.engine.add_provider(provider.clone()).unwrap();

        assert!(f.engine.run("disks").await);

        assert_eq!(provider.fetch_count(), 1);
        let seen = f.recorder.seen.lock().clone();
        assert_eq!(seen, vec![(ConfigDocument::new(doc.clone()), PathBuf::from("/sysroot"))]);
        let cached = std::fs::read(&f.cache_path).unwrap();
        assert_eq!(ConfigDocument::from_slice(&cached).unwrap().into_value(), doc);
        assert!(f.logger.contains(LogLevel::Info, "disks: running"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stage_failure_fails_run() {
        let mut f = fixture(false);
        f.engine.add_provider(Arc::new(MockProvider::online("ec2", json!({})))).unwrap();

        assert!(!f.engine.run("disks").await);
        assert_eq!(f.recorder.created.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_hit_skips_providers() {
        let f = fixture(true);
        let doc = ConfigDocument::new(json!({"cached": true}));
        std::fs::write(&f.cache_path, doc.to_vec().unwrap()).unwrap();

        let mut engine = f.engine;
        let broken = MockProvider::online("ec2", json!({}))
            .with_fetch(MockFetch::Fail("must not be called".to_string()))
            .shared();
        engine.add_provider(broken.clone()).unwrap();

        assert_eq!(engine.acquire_config().await.unwrap(), doc);
        assert_eq!(broken.probe_count(), 0);
        assert_eq!(broken.fetch_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_corrupt_cache_is_not_refetched() {
        let mut f = fixture(true);
        std::fs::write(&f.cache_path, b"garbage").unwrap();
        let provider = MockProvider::online("ec2", json!({})).shared();
        f.engine.add_provider(provider.clone()).unwrap();

        let err = f.engine.acquire_config().await.unwrap_err();
        assert!(matches!(err, AcquireError::CacheParse { .. }));
        assert_eq!(provider.probe_count(), 0);
        assert_eq!(std::fs::read(&f.cache_path).unwrap(), b"garbage");
        assert!(f.logger.contains(LogLevel::Crit, "failed to parse cached config"));

        assert!(!f.engine.run("disks").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_benign_outcomes_succeed_without_stage() {
        for fetch in [MockFetch::Empty, MockFetch::CloudConfig, MockFetch::Script] {
            let mut f = fixture(true);
            f.engine
                .add_provider(Arc::new(MockProvider::new("oem").with_fetch(fetch)))
                .unwrap();

            assert!(f.engine.run("disks").await);
            assert_eq!(f.recorder.created.load(Ordering::SeqCst), 0);
            assert!(!f.cache_path.exists(), "non-documents are never cached");
            assert!(f.logger.contains(LogLevel::Info, "ignoring and exiting"));
            assert!(f.logger.messages_at(LogLevel::Crit).is_empty());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_noop_provider_run_is_a_successful_no_op() {
        let mut f = fixture(true);
        let logger: SharedLogger = f.logger.clone();
        f.engine.add_provider(Arc::new(NoopProvider::new(logger))).unwrap();

        assert!(f.engine.run("disks").await);
        assert_eq!(f.recorder.created.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_fails_run() {
        let mut f = fixture(true);
        f.engine
            .add_provider(Arc::new(
                MockProvider::new("ec2").with_fetch(MockFetch::Fail("connection reset".to_string())),
            ))
            .unwrap();

        assert!(!f.engine.run("disks").await);
        assert_eq!(f.recorder.created.load(Ordering::SeqCst), 0);
        assert!(!f.cache_path.exists());
        assert!(f.logger.contains(LogLevel::Crit, "connection reset"));
        assert!(f.logger.contains(LogLevel::Crit, "disks: failed to acquire config"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_race_timeout_fails_run() {
        let mut f = fixture(true);
        f.engine
            .add_provider(Arc::new(MockProvider::unreachable("ec2", Duration::from_millis(100))))
            .unwrap();

        let err = f.engine.acquire_config().await.unwrap_err();
        assert!(matches!(err, AcquireError::Race(RaceError::Timeout)));
        assert!(f.logger.contains(LogLevel::Crit, "timed out"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_stage_fails_run() {
        let mut f = fixture(true);
        f.engine.add_provider(Arc::new(MockProvider::online("ec2", json!({})))).unwrap();

        assert!(!f.engine.run("users").await);
        assert!(f.logger.contains(LogLevel::Crit, "users: no such stage"));
        // The config was still acquired and cached.
        assert!(f.cache_path.exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_write_failure_fails_acquisition() {
        let dir = tempdir().unwrap();
        let logger = Arc::new(MemoryLogger::new());
        // The cache path is an existing directory, so the write fails.
        let settings = EngineSettings::default().with_config_cache(dir.path().join("cache"));
        std::fs::create_dir(dir.path().join("cache")).unwrap();

        let mut engine = Engine::new(settings, logger.clone());
        let provider = MockProvider::online("ec2", json!({"a": 1})).shared();
        engine.add_provider(provider.clone()).unwrap();

        let err = engine.acquire_config().await.unwrap_err();
        // A directory is unreadable as a cache file, so the providers were consulted.
        assert_eq!(provider.fetch_count(), 1);
        assert!(matches!(err, AcquireError::CacheWrite { .. }));
        assert!(logger.contains(LogLevel::Crit, "failed to write cached config"));
    }

    #[test]
    fn test_providers_listed_alphabetically() {
        let mut f = fixture(true);
        f.engine.add_provider(Arc::new(MockProvider::new("vmware"))).unwrap();
        f.engine.add_provider(Arc::new(MockProvider::new("azure"))).unwrap();

        let names: Vec<String> = f.engine.providers().iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names, vec!["azure", "vmware"]);
        assert_eq!(f.engine.provider("azure").unwrap().name(), "azure");
        assert!(f.engine.add_provider(Arc::new(MockProvider::new("azure"))).is_err());
    }
}
