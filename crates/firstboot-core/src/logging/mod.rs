//! Logging abstractions for runtime-agnostic logging

mod traits;
mod level;
mod noop;
mod console;
mod memory;
mod prefixed;

pub use traits::{Logger, BoxedLogger, SharedLogger};
pub use level::LogLevel;
pub use noop::NoOpLogger;
pub use console::ConsoleLogger;
pub use memory::MemoryLogger;
pub use prefixed::PrefixedLogger;
