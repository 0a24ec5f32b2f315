//! Catalog of provider variants, for creating providers by name

use std::collections::HashMap;
use std::sync::Arc;

use super::noop::{NoopProvider, NOOP_PROVIDER_NAME};
use super::registry::{RegistryError, RegistryResult};
use super::traits::Provider;
use crate::logging::SharedLogger;

/// Factory function type for creating providers
pub type ProviderFactory = Box<dyn Fn(SharedLogger) -> Arc<dyn Provider> + Send + Sync>;

/// Definition of a provider variant
pub struct ProviderDefinition {
    /// Unique name for this variant; instances report the same name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Factory function to create instances
    pub factory: ProviderFactory,
}

impl std::fmt::Debug for ProviderDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

/// Known provider variants, keyed by name
///
/// Startup code fills a catalog once, then picks the variants that apply to
/// the platform and instantiates them into a `ProviderRegistry`.
#[derive(Debug, Default)]
pub struct ProviderCatalog {
    definitions: HashMap<String, ProviderDefinition>,
}

impl ProviderCatalog {
    /// An empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog holding the built-in variants
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        catalog.definitions.insert(
            NOOP_PROVIDER_NAME.to_string(),
            ProviderDefinition {
                name: NOOP_PROVIDER_NAME.to_string(),
                description: "Always online, never has a config; for platforms without a source".to_string(),
                factory: Box::new(NoopProvider::create),
            },
        );
        catalog
    }

    /// Register a new provider variant
    ///
    /// # Example
    ///
    /// ```
    /// use firstboot_core::providers::{ProviderCatalog, MockProvider, Provider};
    /// use std::sync::Arc;
    ///
    /// let mut catalog = ProviderCatalog::with_builtins();
    /// catalog
    ///     .register(
    ///         "file",
    ///         "Config from a local file",
    ///         Box::new(|_logger| Arc::new(MockProvider::new("file")) as Arc<dyn Provider>),
    ///     )
    ///     .unwrap();
    /// assert!(catalog.contains("file"));
    /// ```
    pub fn register(&mut self, name: &str, description: &str, factory: ProviderFactory) -> RegistryResult<()> {
        if self.definitions.contains_key(name) {
            return Err(RegistryError::duplicate("provider variant", name));
        }
        self.definitions.insert(
            name.to_string(),
            ProviderDefinition {
                name: name.to_string(),
                description: description.to_string(),
                factory,
            },
        );
        Ok(())
    }

    /// Create a provider by name, or None if the name is not registered
    pub fn create(&self, name: &str, logger: SharedLogger) -> Option<Arc<dyn Provider>> {
        self.definitions.get(name).map(|def| (def.factory)(logger))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// All registered variants as (name, description), sorted by name
    pub fn list(&self) -> Vec<(String, String)> {
        let mut list: Vec<(String, String)> = self
            .definitions
            .values()
            .map(|def| (def.name.clone(), def.description.clone()))
            .collect();
        list.sort();
        list
    }
}
