// Signal handling
//
// SIGTERM and SIGINT (Ctrl+C) both request a graceful shutdown: the accept
// loop stops, in-flight responses are drained, and the process exits 0.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Shutdown coordination handle shared between the signal task and the
/// accept loop
pub struct ShutdownSignal {
    pub notify: Arc<Notify>,
    pub requested: Arc<AtomicBool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self {
            notify: Arc::new(Notify::new()),
            requested: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    fn trigger(notify: &Notify, requested: &AtomicBool) {
        requested.store(true, Ordering::SeqCst);
        notify.notify_waiters();
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn the background task that listens for termination signals (Unix)
#[cfg(unix)]
pub fn spawn_signal_listener(shutdown: &ShutdownSignal) {
    use crate::logger;
    use tokio::signal::unix::{signal, SignalKind};

    let notify = Arc::clone(&shutdown.notify);
    let requested = Arc::clone(&shutdown.requested);

    tokio::spawn(async move {
        let Ok(mut sigterm) = signal(SignalKind::terminate()) else {
            logger::log_error("Failed to register SIGTERM handler");
            return;
        };
        let Ok(mut sigint) = signal(SignalKind::interrupt()) else {
            logger::log_error("Failed to register SIGINT handler");
            return;
        };

        tokio::select! {
            _ = sigterm.recv() => logger::log_shutdown_started("SIGTERM"),
            _ = sigint.recv() => logger::log_shutdown_started("SIGINT"),
        }
        ShutdownSignal::trigger(&notify, &requested);
    });
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn spawn_signal_listener(shutdown: &ShutdownSignal) {
    use crate::logger;

    let notify = Arc::clone(&shutdown.notify);
    let requested = Arc::clone(&shutdown.requested);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            logger::log_shutdown_started("Ctrl+C");
            ShutdownSignal::trigger(&notify, &requested);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_wakes_waiter_and_sets_flag() {
        let shutdown = ShutdownSignal::new();
        assert!(!shutdown.is_requested());

        // Register interest before triggering so notify_waiters reaches us
        let notified = shutdown.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        ShutdownSignal::trigger(&shutdown.notify, &shutdown.requested);
        assert!(shutdown.is_requested());
        notified.await;
    }
}
