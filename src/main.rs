//! corserve - a small static file server with permissive cross-origin
//! headers on every response.
//!
//! Serves the directory containing the executable (or a configured root)
//! over HTTP/1.1. No routing, no persistence: configuration, file serving
//! and a cross-origin response hook.

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;

mod config;
mod handler;
mod http;
mod logger;
mod server;

const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let root = cfg.resolve_root().map_err(|e| {
        logger::log_error(&format!("Cannot resolve serving directory: {e}"));
        e
    })?;

    // Bind failure is fatal: exit non-zero with a clear message, no retry
    let listener = match server::bind_listener(addr) {
        Ok(l) => l,
        Err(e) => {
            logger::log_bind_failed(&addr, &e);
            return Err(e.into());
        }
    };

    let state = Arc::new(config::AppState::new(cfg, root));
    let active_connections = Arc::new(AtomicUsize::new(0));

    let shutdown = server::ShutdownSignal::new();
    server::spawn_signal_listener(&shutdown);

    logger::log_server_start(&addr, &state.root);

    server::run_accept_loop(
        listener,
        Arc::clone(&state),
        Arc::clone(&active_connections),
        &shutdown,
    )
    .await;

    // Let in-flight responses complete before exiting
    server::drain_connections(&active_connections, DRAIN_TIMEOUT).await;
    logger::log_shutdown_complete();

    Ok(())
}
