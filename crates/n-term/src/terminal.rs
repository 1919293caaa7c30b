// SPDX-License-Identifier: MIT
//
// Terminal control: raw mode, width discovery, and capability checks.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ) and isatty. These are the standard POSIX
// interfaces for terminal control and have no safe std counterpart. Each
// unsafe block is minimal.
#![allow(unsafe_code)]
//
// A line editor touches the terminal much less than a full-screen program.
// It never switches screens and never enables mouse or keyboard protocols.
// It needs three things:
//
// - Raw mode while a line is being edited, restored between lines so the
//   host program's own output behaves normally.
// - The column count, for wrapping and horizontal scrolling. The kernel
//   usually knows it (TIOCGWINSZ). When it doesn't (serial lines, some
//   multiplexers), we ask the terminal itself: park the cursor at the right
//   margin and request a position report.
// - Whether the terminal can be driven at all. `dumb`, `cons25` and `emacs`
//   terminals get a plain prompt-and-read fallback.
//
// The panic hook restores the saved termios before the original handler
// prints, so a panic while editing never leaves the shell without echo.

use std::io::{self, Read, Write};
use std::sync::{Mutex, Once};

use crate::ansi;
use crate::input::read_byte;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Column count used when neither the kernel nor the terminal will say.
pub const DEFAULT_COLUMNS: usize = 80;

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// File descriptor of standard output, the usual place to ask for the size.
pub const STDOUT_FD: i32 = 1;

/// Query the terminal size of stdout.
#[must_use]
pub fn get_size() -> Option<Size> {
    get_size_of(STDOUT_FD)
}

/// Query the terminal size of `fd` via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if `fd` is not a terminal or the query fails.
#[cfg(unix)]
#[must_use]
pub fn get_size_of(fd: i32) -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size_of(_fd: i32) -> Option<Size> {
    None
}

/// Check whether `fd` is connected to a terminal.
#[cfg(unix)]
#[must_use]
pub fn is_tty(fd: i32) -> bool {
    unsafe { libc::isatty(fd) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty(_fd: i32) -> bool {
    false
}

/// Terminals known not to understand the escape sequences we emit.
const UNSUPPORTED_TERMS: [&str; 3] = ["dumb", "cons25", "emacs"];

/// Whether a `TERM` value names a terminal that cannot be driven.
#[must_use]
pub fn is_unsupported(term: &str) -> bool {
    UNSUPPORTED_TERMS
        .iter()
        .any(|name| name.eq_ignore_ascii_case(term))
}

/// Whether the `TERM` environment variable names an unsupported terminal.
///
/// An unset `TERM` is treated as supported.
#[must_use]
pub fn is_unsupported_term() -> bool {
    std::env::var("TERM").is_ok_and(|term| is_unsupported(&term))
}

// ─── Width Discovery ────────────────────────────────────────────────────────

/// Longest position report we are willing to read.
const MAX_REPORT_LEN: usize = 31;

/// Ask the terminal for the cursor column (1-based) with a DSR request.
///
/// Reads the `ESC [ row ; col R` reply from `input`. Returns `None` on any
/// malformed or truncated reply.
pub fn cursor_column(input: &mut impl Read, output: &mut impl Write) -> Option<usize> {
    ansi::query_cursor_position(output).ok()?;
    output.flush().ok()?;

    let mut reply = Vec::with_capacity(MAX_REPORT_LEN);
    while reply.len() < MAX_REPORT_LEN {
        match read_byte(input).ok()? {
            Some(b'R') => break,
            Some(b) => reply.push(b),
            None => return None,
        }
    }
    parse_position_report(&reply).map(|(_row, col)| col)
}

/// Parse the body of a cursor position report: `ESC [ row ; col`.
fn parse_position_report(reply: &[u8]) -> Option<(usize, usize)> {
    let body = reply.strip_prefix(b"\x1b[")?;
    let text = std::str::from_utf8(body).ok()?;
    let (row, col) = text.split_once(';')?;
    Some((row.parse().ok()?, col.parse().ok()?))
}

/// Discover the width by moving to the right margin and asking where the
/// cursor landed. The cursor is moved back to where it started.
pub fn probe_columns(input: &mut impl Read, output: &mut impl Write) -> Option<usize> {
    let start = cursor_column(input, output)?;

    ansi::cursor_to_right_margin(output).ok()?;
    output.flush().ok()?;
    let cols = cursor_column(input, output)?;

    if cols > start {
        ansi::cursor_back(output, cols - start).ok()?;
        output.flush().ok()?;
    }
    Some(cols)
}

/// The terminal width in columns.
///
/// Asks the kernel about `fd` first (the descriptor behind `output`), then
/// the terminal itself through `input` and `output`, and falls back to
/// [`DEFAULT_COLUMNS`].
pub fn columns(fd: i32, input: &mut impl Read, output: &mut impl Write) -> usize {
    get_size_of(fd)
        .map(|size| usize::from(size.cols))
        .or_else(|| probe_columns(input, output))
        .unwrap_or(DEFAULT_COLUMNS)
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Global backup of the original termios for panic recovery.
///
/// [`RawMode`] owns its own copy, but the panic hook can't reach it. This
/// global backup, behind a [`Mutex`], lets the hook restore cooked mode.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<(i32, libc::termios)>> = Mutex::new(None);

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some((fd, ref original)) = *guard {
            unsafe {
                let _ = libc::tcsetattr(fd, libc::TCSAFLUSH, original);
            }
        }
    }
}

/// Panic hook guard. The hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the error.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

// ─── RawMode ────────────────────────────────────────────────────────────────

/// Raw-mode switch for one terminal file descriptor.
///
/// [`enable`](Self::enable) saves the current termios and switches to raw
/// mode; [`disable`](Self::disable) puts the saved settings back. Both are
/// idempotent. Dropping an enabled handle restores the terminal.
///
/// # Example
///
/// ```no_run
/// use n_term::terminal::RawMode;
///
/// let mut raw = RawMode::stdin();
/// raw.enable()?;
/// // ... read keys byte by byte ...
/// raw.disable()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct RawMode {
    fd: i32,

    /// Settings saved by `enable`, present while raw mode is active.
    #[cfg(unix)]
    original: Option<libc::termios>,
}

impl RawMode {
    /// A switch for the given file descriptor. Does not touch the terminal.
    #[must_use]
    pub const fn new(fd: i32) -> Self {
        Self {
            fd,
            #[cfg(unix)]
            original: None,
        }
    }

    /// A switch for standard input.
    #[must_use]
    pub const fn stdin() -> Self {
        Self::new(0)
    }

    /// Whether raw mode is currently active.
    #[inline]
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        #[cfg(unix)]
        {
            self.original.is_some()
        }
        #[cfg(not(unix))]
        {
            false
        }
    }

    /// Switch the terminal to raw mode.
    ///
    /// # Errors
    ///
    /// Fails with `ENOTTY` when the descriptor is not a terminal, or with the
    /// OS error from `tcgetattr` / `tcsetattr`.
    #[cfg(unix)]
    pub fn enable(&mut self) -> io::Result<()> {
        if self.original.is_some() {
            return Ok(());
        }
        if !is_tty(self.fd) {
            return Err(io::Error::from_raw_os_error(libc::ENOTTY));
        }

        install_panic_hook();

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(self.fd, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }
            let original = termios;

            // Input: no break signal, no CR-to-NL, no parity check, no
            // stripping of the 8th bit, no flow control.
            termios.c_iflag &=
                !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
            // Output: no post-processing.
            termios.c_oflag &= !libc::OPOST;
            termios.c_cflag |= libc::CS8;
            // Local: no echo, no canonical mode, no extended functions, no
            // signal characters (Ctrl-C arrives as a byte).
            termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);

            // VMIN=1, VTIME=0: read() blocks until at least 1 byte available.
            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;

            if libc::tcsetattr(self.fd, libc::TCSAFLUSH, &raw const termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            self.original = Some(original);
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some((self.fd, original));
            }
        }

        Ok(())
    }

    #[cfg(not(unix))]
    pub fn enable(&mut self) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "raw mode requires a unix terminal",
        ))
    }

    /// Restore the settings saved by [`enable`](Self::enable).
    ///
    /// # Errors
    ///
    /// Returns the OS error from `tcsetattr`.
    #[cfg(unix)]
    pub fn disable(&mut self) -> io::Result<()> {
        if let Some(ref original) = self.original {
            unsafe {
                if libc::tcsetattr(self.fd, libc::TCSAFLUSH, original) != 0 {
                    return Err(io::Error::last_os_error());
                }
            }

            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }
            self.original = None;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    pub fn disable(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = self.disable();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── Capability checks ───────────────────────────────────────────

    #[test]
    fn unsupported_terms() {
        assert!(is_unsupported("dumb"));
        assert!(is_unsupported("cons25"));
        assert!(is_unsupported("emacs"));
    }

    #[test]
    fn unsupported_match_ignores_case() {
        assert!(is_unsupported("DUMB"));
        assert!(is_unsupported("Emacs"));
    }

    #[test]
    fn common_terms_are_supported() {
        assert!(!is_unsupported("xterm-256color"));
        assert!(!is_unsupported("screen"));
        assert!(!is_unsupported(""));
    }

    #[test]
    fn is_tty_rejects_bad_fd() {
        assert!(!is_tty(-1));
    }

    #[test]
    fn get_size_does_not_panic() {
        let _ = get_size();
    }

    #[test]
    fn get_size_of_bad_fd_is_none() {
        assert_eq!(get_size_of(-1), None);
    }

    // ── Position reports ────────────────────────────────────────────

    #[test]
    fn parse_report() {
        assert_eq!(parse_position_report(b"\x1b[12;40"), Some((12, 40)));
    }

    #[test]
    fn parse_report_rejects_garbage() {
        assert_eq!(parse_position_report(b"12;40"), None);
        assert_eq!(parse_position_report(b"\x1b[12"), None);
        assert_eq!(parse_position_report(b"\x1b[a;b"), None);
    }

    #[test]
    fn cursor_column_sends_dsr_and_reads_reply() {
        let mut input: &[u8] = b"\x1b[3;17R";
        let mut output = Vec::new();
        assert_eq!(cursor_column(&mut input, &mut output), Some(17));
        assert_eq!(output, b"\x1b[6n");
    }

    #[test]
    fn cursor_column_truncated_reply() {
        let mut input: &[u8] = b"\x1b[3;1";
        let mut output = Vec::new();
        assert_eq!(cursor_column(&mut input, &mut output), None);
    }

    // ── Width probe ─────────────────────────────────────────────────

    #[test]
    fn probe_moves_back_to_start() {
        let mut input: &[u8] = b"\x1b[5;3R\x1b[5;120R";
        let mut output = Vec::new();
        assert_eq!(probe_columns(&mut input, &mut output), Some(120));
        assert_eq!(output, b"\x1b[6n\x1b[999C\x1b[6n\x1b[117D");
    }

    #[test]
    fn probe_at_margin_needs_no_move() {
        let mut input: &[u8] = b"\x1b[1;80R\x1b[1;80R";
        let mut output = Vec::new();
        assert_eq!(probe_columns(&mut input, &mut output), Some(80));
        assert_eq!(output, b"\x1b[6n\x1b[999C\x1b[6n");
    }

    #[test]
    fn probe_without_reply_fails() {
        let mut input: &[u8] = b"";
        let mut output = Vec::new();
        assert_eq!(probe_columns(&mut input, &mut output), None);
    }

    #[test]
    fn columns_is_never_zero() {
        let mut input: &[u8] = b"";
        let mut output = Vec::new();
        assert_eq!(columns(-1, &mut input, &mut output), DEFAULT_COLUMNS);
    }

    #[test]
    fn columns_probes_when_fd_has_no_size() {
        let mut input: &[u8] = b"\x1b[1;1R\x1b[1;132R";
        let mut output = Vec::new();
        assert_eq!(columns(-1, &mut input, &mut output), 132);
        assert_eq!(output, b"\x1b[6n\x1b[999C\x1b[6n\x1b[131D");
    }

    // ── RawMode ─────────────────────────────────────────────────────

    #[test]
    fn raw_mode_on_non_tty_fails() {
        let mut raw = RawMode::new(-1);
        assert!(raw.enable().is_err());
        assert!(!raw.is_enabled());
    }

    #[test]
    fn raw_mode_disable_without_enable() {
        let mut raw = RawMode::new(-1);
        raw.disable().unwrap();
        assert!(!raw.is_enabled());
    }
}
