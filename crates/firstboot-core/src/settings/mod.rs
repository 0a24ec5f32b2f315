//! Engine settings
//!
//! Where the config cache lives, how long to wait for a provider, the
//! filesystem root handed to stages, and how chatty to be. Settings come
//! from defaults, optionally overridden by a YAML file:
//!
//! ```yaml
//! config_cache: /run/firstboot/config.json
//! fetch_timeout_secs: 120
//! root: /sysroot
//! log_level: debug
//! ```

mod error;
mod file;

pub use error::{SettingsError, SettingsResult};
pub use file::{EngineSettings, SettingsFile, DEFAULT_CONFIG_CACHE, DEFAULT_FETCH_TIMEOUT, DEFAULT_ROOT};
