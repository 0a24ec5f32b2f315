//! Stage registry for looking up stages by name

use std::collections::HashMap;
use std::sync::Arc;

use super::traits::StageFactory;
use crate::providers::{RegistryError, RegistryResult};

/// Registered stage factories, keyed by stage name
#[derive(Default, Clone)]
pub struct StageRegistry {
    factories: HashMap<String, Arc<dyn StageFactory>>,
}

impl StageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stage factory under its own name
    pub fn register(&mut self, factory: Arc<dyn StageFactory>) -> RegistryResult<()> {
        let name = factory.name().to_string();
        if self.factories.contains_key(&name) {
            return Err(RegistryError::duplicate("stage", name));
        }
        self.factories.insert(name, factory);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn StageFactory>> {
        self.factories.get(name).cloned()
    }

    /// All registered stage names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for StageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageRegistry")
            .field("stages", &self.names())
            .finish()
    }
}
