// SPDX-License-Identifier: MIT
//
// Log setup for the demo REPL.
//
// The terminal is in raw mode while a line is edited, so log lines written
// to stdout or stderr would land in the middle of the prompt. Logging is
// therefore file-only, and off unless a log directory is given.
//
// Filtering follows RUST_LOG, defaulting to `warn`:
//
//   RUST_LOG=debug                  every engine event
//   RUST_LOG=n_edit::render=trace   multi-line repaint geometry

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log file name inside the log directory.
pub const LOG_FILE: &str = "n-line.log";

/// Build the filter from RUST_LOG, or `warn` when unset or invalid.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install a file subscriber writing to `dir/n-line.log`.
///
/// Returns the guard that flushes pending lines on drop; keep it alive for
/// the life of the program. Returns `None` (and installs nothing) when no
/// directory is given.
pub fn init(dir: Option<&Path>) -> Option<WorkerGuard> {
    let dir = dir?;
    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .with_filter(env_filter());

    tracing_subscriber::registry().with(file_layer).init();
    Some(guard)
}

// ─── Tests ──────────────────────────────────────────────────────────────────
