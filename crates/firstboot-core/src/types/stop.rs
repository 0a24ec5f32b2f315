//! One-shot stop signal shared between a coordinator and its tasks

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Broadcast stop signal
///
/// Every clone observes the same signal. Once triggered it stays triggered.
#[derive(Clone)]
pub struct StopSignal {
    inner: Arc<StopSignalInner>,
}

struct StopSignalInner {
    triggered: AtomicBool,
    notify: Notify,
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl StopSignal {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StopSignalInner {
                triggered: AtomicBool::new(false),
                notify: Notify::new(),
            }),
        }
    }

    /// Check if the signal has been triggered
    pub fn is_triggered(&self) -> bool {
        self.inner.triggered.load(Ordering::SeqCst)
    }

    /// Trigger the signal, waking every waiter
    pub fn trigger(&self) {
        if !self.inner.triggered.swap(true, Ordering::SeqCst) {
            self.inner.notify.notify_waiters();
        }
    }

    /// Wait until the signal is triggered
    pub async fn stopped(&self) {
        // The Notified future receives notify_waiters() from the moment it is
        // created, so a trigger between the flag check and the await is not lost.
        let notified = self.inner.notify.notified();
        if self.is_triggered() {
            return;
        }
        notified.await;
    }
}

impl std::fmt::Debug for StopSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopSignal")
            .field("is_triggered", &self.is_triggered())
            .finish()
    }
}
