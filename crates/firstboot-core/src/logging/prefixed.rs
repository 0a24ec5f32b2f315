//! Logger that scopes messages under a prefix

use super::traits::{Logger, SharedLogger};

/// Wraps another logger and prefixes every message with `"<prefix>: "`
///
/// Prefixes nest: wrapping a `PrefixedLogger` again yields `"outer: inner: msg"`.
#[derive(Clone)]
pub struct PrefixedLogger {
    inner: SharedLogger,
    prefix: String,
}

impl PrefixedLogger {
    pub fn new(inner: SharedLogger, prefix: impl Into<String>) -> Self {
        Self {
            inner,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn scoped(&self, message: &str) -> String {
        format!("{}: {}", self.prefix, message)
    }
}

impl std::fmt::Debug for PrefixedLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrefixedLogger")
            .field("prefix", &self.prefix)
            .finish()
    }
}

impl Logger for PrefixedLogger {
    fn debug(&self, message: &str) {
        self.inner.debug(&self.scoped(message));
    }

    fn info(&self, message: &str) {
        self.inner.info(&self.scoped(message));
    }

    fn warn(&self, message: &str) {
        self.inner.warn(&self.scoped(message));
    }

    fn error(&self, message: &str) {
        self.inner.error(&self.scoped(message));
    }

    fn crit(&self, message: &str) {
        self.inner.crit(&self.scoped(message));
    }
}
