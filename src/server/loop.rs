// Server accept loop
// Runs until shutdown is requested, then lets in-flight connections drain

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::ShutdownSignal;
use crate::config;
use crate::logger;

/// Accept connections until the shutdown signal fires.
///
/// The requested-flag check covers a signal that lands between loop
/// iterations, when no waiter is registered on the Notify. Dropping the
/// listener on exit closes the socket, so no new connections are admitted
/// while the drain runs.
pub async fn run_accept_loop(
    listener: TcpListener,
    state: Arc<config::AppState>,
    active_connections: Arc<AtomicUsize>,
    shutdown: &ShutdownSignal,
) {
    while !shutdown.is_requested() {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = shutdown.notify.notified() => break,
        }
    }
    drop(listener);
}

/// Wait for in-flight connections to finish, up to `timeout`.
pub async fn drain_connections(active_connections: &AtomicUsize, timeout: Duration) {
    let deadline = tokio::time::Instant::now() + timeout;

    while active_connections.load(Ordering::SeqCst) > 0 {
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Shutdown drain timed out with {} connection(s) still open",
                active_connections.load(Ordering::SeqCst)
            ));
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
