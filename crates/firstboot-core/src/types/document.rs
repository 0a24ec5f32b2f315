//! The configuration document handed from providers to stages
//!
//! The engine never looks inside the document. It only needs to move it
//! between providers, the cache file and stages without losing anything.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::providers::{FetchError, FetchResult};

/// Header that marks a cloud-config document
const CLOUD_CONFIG_HEADER: &str = "#cloud-config";

/// Prefix that marks an executable script
const SHEBANG: &str = "#!";

/// An opaque, serializable configuration document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument(Value);

impl ConfigDocument {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Encode the document in the cache format
    pub fn to_vec(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(&self.0)
    }

    /// Decode a document from the cache format
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes).map(Self)
    }

    /// Turn raw bytes fetched from a source into a document
    ///
    /// Blank input, cloud-config and scripts are not documents; they come back
    /// as the benign `FetchError` classifications so the engine can skip the run.
    pub fn classify(raw: &[u8]) -> FetchResult<Self> {
        let text = String::from_utf8_lossy(raw);
        let trimmed = text.trim_start();

        if trimmed.trim_end().is_empty() {
            return Err(FetchError::Empty);
        }
        if trimmed.starts_with(CLOUD_CONFIG_HEADER) {
            return Err(FetchError::CloudConfig);
        }
        if trimmed.starts_with(SHEBANG) {
            return Err(FetchError::Script);
        }

        Ok(Self::from_slice(raw)?)
    }
}

impl From<Value> for ConfigDocument {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
