// SPDX-License-Identifier: MIT
//
// n-line: a demo REPL for the n-edit line-editing engine.
//
// This is the main binary that wires together the crates:
//
//   n-term → escape encoders, key decoding, raw mode, terminal width
//   n-edit → edit buffer, history, completion, hints, rendering, session
//
// Every line flows through:
//
//   stdin → decode → keymap → edit buffer → render → stdout
//   Enter → echo → history → history file
//
// Commands:
//
//   /exit            quit
//   /historylen N    keep at most N history entries
//
// Anything else starting with `/` is rejected; any other non-empty line is
// echoed back and remembered.

mod cli;
mod history_file;
mod logging;

use std::io::{self, Stderr, Stdin, Stdout};
use std::process;

use clap::Parser;
use n_edit::{Color, Hint, Interaction, Session};
use n_term::terminal::{self, RawMode};
use tracing::warn;

use crate::cli::CliArgs;

type Repl = Session<Stdin, Stdout, Stderr>;

// ─── Callbacks ──────────────────────────────────────────────────────────────

/// Tab completion: `hello` completes to `hello World`, anything else
/// starting with `h` to `hello`.
fn complete(line: &str) -> Vec<String> {
    if line.eq_ignore_ascii_case("hello") {
        vec!["hello World".to_string()]
    } else if line.starts_with('h') {
        vec!["hello".to_string()]
    } else {
        Vec::new()
    }
}

/// Hint ` World` after `hello`.
fn hint(line: &str) -> Option<Hint> {
    line.eq_ignore_ascii_case("hello")
        .then(|| Hint::new(" World").with_color(Color::Magenta))
}

// ─── Commands ───────────────────────────────────────────────────────────────

/// What to do with a submitted line.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    /// Echo and remember the line.
    Echo(&'a str),
    Exit,
    /// Change the history capacity. Unparseable lengths become 0 and are
    /// rejected by the engine.
    HistoryLen(usize),
    Unknown(&'a str),
    /// Empty line: nothing to do.
    Nothing,
}

fn parse_command(line: &str) -> Command<'_> {
    if line.is_empty() {
        Command::Nothing
    } else if !line.starts_with('/') {
        Command::Echo(line)
    } else if line.starts_with("/exit") {
        Command::Exit
    } else if let Some(rest) = line.strip_prefix("/historylen") {
        Command::HistoryLen(rest.trim().parse().unwrap_or(0))
    } else {
        Command::Unknown(line)
    }
}

// ─── REPL ───────────────────────────────────────────────────────────────────

fn session(args: &CliArgs) -> n_edit::Result<Repl> {
    let mut repl = Session::with_config(
        io::stdin(),
        io::stdout(),
        io::stderr(),
        args.prompt.clone(),
        &args.config(),
    )?;
    repl.set_interaction(Interaction::detect(
        terminal::is_tty(0),
        terminal::is_unsupported_term(),
    ));
    repl.set_mode_switch(RawMode::stdin());
    repl.set_auto_columns(true);
    Ok(repl)
}

fn run(args: &CliArgs) -> n_edit::Result<()> {
    let mut repl = session(args)?;

    if args.keycodes {
        return repl.print_key_codes();
    }
    if args.multiline {
        println!("Multi-line mode enabled.");
    }

    repl.set_completion_callback(complete);
    repl.set_hints_callback(hint);
    if let Err(e) = history_file::load(repl.history_mut(), &args.history) {
        warn!(path = %args.history.display(), error = %e, "could not load history");
    }

    while let Some(line) = repl.read_line()?.into_line() {
        match parse_command(&line) {
            Command::Echo(text) => {
                println!("echo: '{text}'");
                repl.history_mut().add(text);
                if let Err(e) = history_file::save(repl.history(), &args.history) {
                    warn!(path = %args.history.display(), error = %e, "could not save history");
                }
            }
            Command::Exit => break,
            Command::HistoryLen(len) => {
                if let Err(e) = repl.set_history_max_len(len) {
                    eprintln!("n-line: {e}");
                }
            }
            Command::Unknown(cmd) => println!("Unrecognized command: {cmd}"),
            Command::Nothing => {}
        }
    }
    Ok(())
}

fn main() {
    let args = CliArgs::parse();
    let _log_guard = logging::init(args.log_dir.as_deref());

    if let Err(e) = run(&args) {
        eprintln!("n-line: {e}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
