//! Config providers
//!
//! A provider is one possible source of the config document: a metadata
//! service, a config drive, a kernel command line, ... Each platform
//! registers the providers that apply to it, and the engine races them.
//!
//! The `NoopProvider` is the minimal provider. The `MockProvider` is kept
//! for testing purposes.

mod traits;
mod error;
mod backoff;
mod noop;
mod mock;
mod catalog;
mod registry;

pub use traits::Provider;
pub use error::{FetchError, FetchResult};
pub use backoff::ExponentialBackoff;
pub use noop::{NoopProvider, NOOP_PROVIDER_NAME};
pub use mock::{MockProvider, MockConfig, MockFetch, MockLiveness, MockRetry};
pub use catalog::{ProviderCatalog, ProviderDefinition, ProviderFactory};
pub use registry::{ProviderRegistry, RegistryError, RegistryResult};
