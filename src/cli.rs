// SPDX-License-Identifier: MIT
//
// Command-line flags for the demo REPL.

use std::path::PathBuf;

use clap::Parser;
use n_edit::Config;

/// A line-editing REPL that echoes what you type
#[derive(Parser, Debug)]
#[command(name = "n-line", version, about = "A line-editing REPL that echoes what you type")]
pub struct CliArgs {
    /// Wrap long lines over several rows instead of scrolling
    #[arg(long)]
    pub multiline: bool,

    /// Print the bytes each key sends, until `quit` is typed
    #[arg(long)]
    pub keycodes: bool,

    /// History file, loaded at startup and rewritten after every line
    #[arg(long, value_name = "FILE", default_value = "history.txt")]
    pub history: PathBuf,

    /// Number of history entries to keep
    #[arg(long, value_name = "N", default_value_t = n_edit::config::DEFAULT_HISTORY_MAX_LEN)]
    pub history_len: usize,

    /// Prompt shown before each line
    #[arg(long, value_name = "TEXT", default_value = "> ")]
    pub prompt: String,

    /// Write logs to `n-line.log` in this directory (filtered by RUST_LOG)
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

impl CliArgs {
    /// Engine configuration for these flags.
    pub fn config(&self) -> Config {
        Config {
            multiline: self.multiline,
            history_max_len: self.history_len,
            ..Config::default()
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
