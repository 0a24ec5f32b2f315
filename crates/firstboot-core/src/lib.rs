//! Firstboot Core
//!
//! First-boot config acquisition. On its first boot a machine has to find
//! its config in one of several platform-specific places (a metadata
//! service, a config drive, ...), none of which may be ready yet. This crate:
//!
//! - races every registered provider, each retrying on its own backoff,
//!   and picks the first one to come online (or gives up at a deadline)
//! - fetches the config from the winner and caches it on disk
//! - hands the config to a named pipeline stage
//!
//! ```rust,ignore
//! use firstboot_core::{ConsoleLogger, Engine, EngineSettings, ProviderCatalog, ProviderRegistry};
//!
//! let logger = Arc::new(ConsoleLogger::new());
//! let settings = EngineSettings::load("/etc/firstboot.yaml")?;
//! let providers = ProviderRegistry::from_catalog(&ProviderCatalog::with_builtins(), ["noop"], logger.clone())?;
//!
//! let engine = Engine::new(settings, logger).with_providers(providers).with_stages(stages);
//! let ok = engine.run("disks").await;
//! ```

pub mod types;
pub mod logging;
pub mod settings;
pub mod providers;
pub mod race;
pub mod stages;
pub mod engine;

// Re-export commonly used types
pub use types::{ConfigDocument, StopSignal};

pub use logging::{
    Logger, LogLevel, SharedLogger,
    NoOpLogger, ConsoleLogger, MemoryLogger, PrefixedLogger,
};

pub use settings::{EngineSettings, SettingsError, SettingsResult, DEFAULT_FETCH_TIMEOUT};

pub use providers::{
    Provider, FetchError, FetchResult,
    NoopProvider, MockProvider, ExponentialBackoff,
    ProviderCatalog, ProviderRegistry, RegistryError, RegistryResult,
};

pub use race::{select_provider, RaceError, RaceResult};

pub use stages::{Stage, StageFactory, StageRegistry};

pub use engine::{Engine, AcquireError, AcquireResult, ConfigCache};
