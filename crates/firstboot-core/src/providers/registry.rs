//! Name-keyed collection of the providers taking part in a run

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use super::catalog::ProviderCatalog;
use super::traits::Provider;
use crate::logging::SharedLogger;

/// Errors raised while assembling registries at startup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{kind} already registered: {name}")]
    DuplicateName { kind: &'static str, name: String },

    #[error("unknown {kind}: {name}")]
    Unknown { kind: &'static str, name: String },
}

impl RegistryError {
    pub fn duplicate(kind: &'static str, name: impl Into<String>) -> Self {
        Self::DuplicateName { kind, name: name.into() }
    }

    pub fn unknown(kind: &'static str, name: impl Into<String>) -> Self {
        Self::Unknown { kind, name: name.into() }
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Registered providers, enumerated in alphabetical order
///
/// Built once at startup and read-only afterwards; a race only ever reads it.
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn Provider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiate the named providers from a catalog
    ///
    /// # Example
    ///
    /// ```
    /// use firstboot_core::logging::NoOpLogger;
    /// use firstboot_core::providers::{ProviderCatalog, ProviderRegistry};
    /// use std::sync::Arc;
    ///
    /// let catalog = ProviderCatalog::with_builtins();
    /// let registry = ProviderRegistry::from_catalog(&catalog, ["noop"], Arc::new(NoOpLogger)).unwrap();
    /// assert_eq!(registry.names(), vec!["noop".to_string()]);
    /// ```
    pub fn from_catalog<I, S>(catalog: &ProviderCatalog, names: I, logger: SharedLogger) -> RegistryResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::new();
        for name in names {
            let name = name.as_ref();
            let provider = catalog
                .create(name, Arc::clone(&logger))
                .ok_or_else(|| RegistryError::unknown("provider", name))?;
            registry.register(provider)?;
        }
        Ok(registry)
    }

    /// Add a provider under its own name
    ///
    /// A duplicate name is a startup configuration mistake; callers should
    /// treat the error as fatal.
    pub fn register(&mut self, provider: Arc<dyn Provider>) -> RegistryResult<()> {
        let name = provider.name().to_string();
        if self.providers.contains_key(&name) {
            return Err(RegistryError::duplicate("provider", name));
        }
        self.providers.insert(name, provider);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(name).cloned()
    }

    /// All registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.keys().cloned().collect();
        names.sort();
        names
    }

    /// All registered providers, in the order of `names()`
    pub fn providers(&self) -> Vec<Arc<dyn Provider>> {
        self.names()
            .iter()
            .filter_map(|name| self.get(name))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish()
    }
}
