//! Race coordinator and per-provider probing tasks

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use super::error::{RaceError, RaceResult};
use crate::logging::{Logger, SharedLogger};
use crate::providers::Provider;
use crate::types::StopSignal;

/// Choose the first online provider
///
/// Returns `RaceError::NoProviders` once every provider has declined to
/// retry (immediately if `providers` is empty), or `RaceError::Timeout` if
/// `timeout` elapses first. A winner that announced before the deadline is
/// preferred over a deadline that fires in the same instant.
///
/// Probing tasks still running when the race resolves are signalled to stop;
/// they exit without sleeping out their current backoff.
pub async fn select_provider(
    providers: &[Arc<dyn Provider>],
    timeout: Duration,
    logger: &SharedLogger,
) -> RaceResult<Arc<dyn Provider>> {
    let stop = StopSignal::new();
    let (online_tx, mut online_rx) = mpsc::unbounded_channel();

    for provider in providers {
        tokio::spawn(probe(
            Arc::clone(provider),
            online_tx.clone(),
            stop.clone(),
            Arc::clone(logger),
        ));
    }
    // Only probing tasks hold senders from here on, so the channel closes
    // exactly when the last of them has finished.
    drop(online_tx);

    let outcome = tokio::select! {
        biased;
        winner = online_rx.recv() => winner.ok_or(RaceError::NoProviders),
        _ = tokio::time::sleep(timeout) => Err(RaceError::Timeout),
    };
    stop.trigger();

    match &outcome {
        Ok(provider) => logger.debug(&format!("provider {} won the race", provider.name())),
        Err(err) => logger.debug(&format!("provider race failed: {}", err)),
    }
    outcome
}

/// Probe one provider until it is online, gives up, or the race is over
async fn probe(
    provider: Arc<dyn Provider>,
    online: mpsc::UnboundedSender<Arc<dyn Provider>>,
    stop: StopSignal,
    logger: SharedLogger,
) {
    loop {
        let is_online = tokio::select! {
            biased;
            _ = stop.stopped() => return,
            is_online = provider.is_online() => is_online,
        };

        if is_online {
            logger.debug(&format!("provider {} is online", provider.name()));
            // The coordinator may already have resolved; losing that send is fine.
            let _ = online.send(provider);
            return;
        }

        if !provider.should_retry() {
            logger.debug(&format!("provider {} is offline and will not retry", provider.name()));
            return;
        }

        let backoff = provider.backoff_duration();
        tokio::select! {
            biased;
            _ = stop.stopped() => return,
            _ = wait(backoff) => {}
        }
    }
}

async fn wait(backoff: Duration) {
    if backoff.is_zero() {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(backoff).await;
    }
}
