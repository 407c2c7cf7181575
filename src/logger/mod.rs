//! Logger module
//!
//! Logging utilities for the file server:
//! - Startup banner and lifecycle messages
//! - Access logging in common/combined/json formats
//! - Error and warning logging to stderr

mod format;

pub use format::AccessLogEntry;

use std::net::SocketAddr;
use std::path::Path;

pub fn log_server_start(addr: &SocketAddr, root: &Path) {
    println!("======================================");
    println!("Static file server started");
    println!("Serving directory: {}", root.display());
    println!("Server running at: http://{addr}");
    println!("======================================");
    println!("Press Ctrl+C to stop the server\n");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    println!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    eprintln!("[ERROR] Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

pub fn log_warning(message: &str) {
    eprintln!("[WARN] {message}");
}

pub fn log_bind_failed(addr: &SocketAddr, err: &std::io::Error) {
    eprintln!("[ERROR] Failed to bind {addr}: {err}");
    eprintln!("        Is the port already in use?");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    println!("{}", entry.format(format));
}

pub fn log_shutdown_started(signal: &str) {
    println!("\n[Shutdown] {signal} received, stopping accept loop");
}

pub fn log_shutdown_complete() {
    println!("[Shutdown] Server stopped");
}
