//! File-backed engine settings (YAML)

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::{SettingsError, SettingsResult};
use crate::logging::{ConsoleLogger, LogLevel};

/// How long the provider race waits by default
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Where the acquired config is cached by default
pub const DEFAULT_CONFIG_CACHE: &str = "/tmp/firstboot.json";

/// Filesystem root handed to stages by default
pub const DEFAULT_ROOT: &str = "/";

/// On-disk settings structure; every key is optional
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    #[serde(default)]
    pub config_cache: Option<PathBuf>,

    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,

    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Minimum log level ("debug", "info", "warn", "error", "crit")
    #[serde(default)]
    pub log_level: Option<String>,
}

/// Resolved engine settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Path of the config cache file
    pub config_cache: PathBuf,
    /// Deadline for the provider race
    pub fetch_timeout: Duration,
    /// Filesystem root handed to stages
    pub root: PathBuf,
    /// Minimum level for console logging
    pub log_level: LogLevel,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            config_cache: PathBuf::from(DEFAULT_CONFIG_CACHE),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            root: PathBuf::from(DEFAULT_ROOT),
            log_level: LogLevel::Info,
        }
    }
}

impl EngineSettings {
    /// Load settings from a YAML file
    ///
    /// A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text, filling unset keys with defaults
    pub fn from_yaml(content: &str) -> SettingsResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let file: SettingsFile = serde_yaml::from_str(content)
            .map_err(|e| SettingsError::Parse(format!("Failed to parse YAML: {}", e)))?;
        Self::from_file(file)
    }

    /// Apply a parsed settings file over the defaults
    pub fn from_file(file: SettingsFile) -> SettingsResult<Self> {
        let mut settings = Self::default();

        if let Some(path) = file.config_cache {
            if path.as_os_str().is_empty() {
                return Err(SettingsError::Invalid {
                    key: "config_cache",
                    message: "path must not be empty".to_string(),
                });
            }
            settings.config_cache = path;
        }
        if let Some(secs) = file.fetch_timeout_secs {
            if secs == 0 {
                return Err(SettingsError::Invalid {
                    key: "fetch_timeout_secs",
                    message: "timeout must be greater than zero".to_string(),
                });
            }
            settings.fetch_timeout = Duration::from_secs(secs);
        }
        if let Some(root) = file.root {
            settings.root = root;
        }
        if let Some(level) = file.log_level {
            settings.log_level = LogLevel::from_str_lossy(&level);
        }

        Ok(settings)
    }

    /// Console logger filtered at the configured level
    pub fn console_logger(&self) -> ConsoleLogger {
        ConsoleLogger::new().with_min_level(self.log_level)
    }

    pub fn with_config_cache(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_cache = path.into();
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }
}
