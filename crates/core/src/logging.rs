//! Structured logging infrastructure for the confidential agent.
//!
//! This module provides centralized logging initialization with support
//! for structured JSON output and environment-based configuration.
//! Callers must never pass secret material as a field value.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogFormat;

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the logging system with human-readable output.
///
/// Log level can be configured via the `RUST_LOG` environment variable.
/// If not set, defaults to `info` level.
///
/// # Example
/// ```no_run
/// use credtrust_core::logging;
///
/// logging::init();
/// tracing::info!("Agent started");
/// ```
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(default_filter())
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .try_init();
}

/// Initialize the logging system with JSON output.
///
/// Suitable for enclave log collectors that forward stderr to an aggregator.
///
/// # Example
/// ```no_run
/// use credtrust_core::logging;
///
/// logging::init_json();
/// tracing::info!(profile = "full", "Agent started");
/// ```
pub fn init_json() {
    let _ = tracing_subscriber::registry()
        .with(default_filter())
        .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
        .try_init();
}

/// Initialize logging in the format selected by configuration.
pub fn init_with_format(format: LogFormat) {
    match format {
        LogFormat::Text => init(),
        LogFormat::Json => init_json(),
    }
}
