//! Core types shared by providers, the engine and stages

mod document;
mod stop;

pub use document::ConfigDocument;
pub use stop::StopSignal;
