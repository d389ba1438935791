//! Logging initialization using the `tracing` crate.
//!
//! This module configures the tracing subscriber with sensible defaults:
//! - Uses `RUST_LOG` environment variable for filtering (default: `info`)
//! - Outputs to stderr so the portal frontend's journal captures it
//! - Includes timestamps, target, and log levels

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Crate targets that get the default level; everything else stays at `warn`.
const TARGETS: &[&str] = &["termappchooser", "termappchooser_lib"];

/// Builds the default filter directive for the given level.
fn default_directive(level: &str) -> String {
    let mut directive = String::from("warn");
    for target in TARGETS {
        directive.push_str(&format!(",{target}={level}"));
    }
    directive
}

/// Initializes the global tracing subscriber.
///
/// This should be called once at startup, before any logging occurs.
///
/// The log level can be controlled via the `RUST_LOG` environment variable:
/// - `RUST_LOG=debug` - Show debug and above
/// - `RUST_LOG=termappchooser_lib=trace,warn` - Trace for the pipeline, warn for others
///
/// Default level is `info` for release builds and `debug` for debug builds.
pub fn init() {
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(default_level)));

    let subscriber = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(true)
        .compact();

    tracing_subscriber::registry().with(filter).with(subscriber).init();
}
