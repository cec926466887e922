//! Logger module
//!
//! Provides logging utilities for the file server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;
use std::path::Path;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

/// Startup banner, always on stdout so it is visible even when the access
/// log goes to a file
pub fn log_server_start(addr: &SocketAddr, root: &Path, config: &Config) {
    println!(
        "Serving HTTP on {} port {} (http://{addr}/) ...",
        addr.ip(),
        addr.port()
    );
    println!("Root directory: {}", root.display());
    if let Some(workers) = config.server.workers {
        println!("Worker threads: {workers}");
    }
    if let Some(ref path) = config.logging.access_log_file {
        println!("Access log: {path}");
    }
    if let Some(ref path) = config.logging.error_log_file {
        println!("Error log: {path}");
    }
}

pub fn log_shutdown() {
    write_info("[Shutdown] Keyboard interrupt or terminate signal received, exiting.");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}
