// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit; that is the render engine's job. This
// module just knows the byte-level encoding of the handful of commands a
// line editor needs:
//
//   EL  (Erase Line)       ESC [ 0 K   clear from cursor to end of line
//   CUF (Cursor Forward)   ESC [ n C
//   CUB (Cursor Backward)  ESC [ n D
//   CUU (Cursor Up)        ESC [ n A   multi-line mode only
//   CUD (Cursor Down)      ESC [ n B   multi-line mode only
//   DSR (Status Report)    ESC [ 6 n   width probe fallback
//   CUP + ED               ESC [ H ESC [ 2 J   clear screen (Ctrl-L)
//
// Fewer sequences means more terminals understand us. We may flicker a
// little on slow links; the output buffer batches every repaint into a
// single write to keep that to a minimum.
//
// All functions return `io::Result` propagated from the underlying writer.
// In practice they never fail when writing to `OutputBuffer` (backed by a Vec).

use std::io::{self, Write};

use bitflags::bitflags;

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Return the cursor to column 0 of the current row.
#[inline]
pub fn carriage_return(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\r")
}

/// Move the cursor forward `n` columns (CUF).
///
/// Terminals treat a parameter of 0 as 1, so `n == 0` emits nothing.
#[inline]
pub fn cursor_forward(w: &mut impl Write, n: usize) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{n}C")
}

/// Move the cursor backward `n` columns (CUB). `n == 0` emits nothing.
#[inline]
pub fn cursor_back(w: &mut impl Write, n: usize) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{n}D")
}

/// Move the cursor up `n` rows (CUU). `n == 0` emits nothing.
#[inline]
pub fn cursor_up(w: &mut impl Write, n: usize) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{n}A")
}

/// Move the cursor down `n` rows (CUD). `n == 0` emits nothing.
#[inline]
pub fn cursor_down(w: &mut impl Write, n: usize) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{n}B")
}

/// Put the cursor at column `col` (0-indexed) of the current row.
///
/// Encoded as `\r` followed by a forward move, which every VT100-ish
/// terminal understands (unlike CHA, which some old consoles lack).
#[inline]
pub fn cursor_to_column(w: &mut impl Write, col: usize) -> io::Result<()> {
    carriage_return(w)?;
    cursor_forward(w, col)
}

/// Move the cursor as far right as the terminal allows.
///
/// Used by the width probe: the terminal clamps at the right margin, so a
/// subsequent position report tells us the column count.
#[inline]
pub fn cursor_to_right_margin(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[999C")
}

/// Ask the terminal to report the cursor position (DSR 6).
///
/// The reply arrives on the input stream as `ESC [ row ; col R`.
#[inline]
pub fn query_cursor_position(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[6n")
}

// ─── Erase ───────────────────────────────────────────────────────────────────

/// Erase from the cursor to the end of the line (EL 0).
#[inline]
pub fn erase_line_end(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0K")
}

/// Home the cursor and clear the whole screen (CUP + ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[H\x1b[2J")
}

/// Ring the terminal bell.
#[inline]
pub fn beep(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x07")
}

// ─── Hint Styling ────────────────────────────────────────────────────────────

/// The eight standard ANSI foreground colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Color {
    /// SGR foreground code (30–37).
    #[must_use]
    pub const fn fg_code(self) -> u8 {
        match self {
            Self::Black => 30,
            Self::Red => 31,
            Self::Green => 32,
            Self::Yellow => 33,
            Self::Blue => 34,
            Self::Magenta => 35,
            Self::Cyan => 36,
            Self::White => 37,
        }
    }
}

bitflags! {
    /// Text attributes applicable to inline hints.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        const BOLD      = 0b0001;
        const DIM       = 0b0010;
        const ITALIC    = 0b0100;
        const UNDERLINE = 0b1000;
    }
}

/// Emit the SGR sequence that opens a styled hint.
///
/// Format is `ESC [ {attrs} ; {fg} ; 49 m`, where `{attrs}` is the
/// semicolon-joined attribute codes (or `0` when none) and `49` keeps the
/// terminal's default background. Bold with no color falls back to white
/// so the hint is visible on both dark and light themes.
///
/// Emits nothing when neither a color nor an attribute is set; callers
/// should then also skip [`reset`].
pub fn hint_style(w: &mut impl Write, color: Option<Color>, attr: Attr) -> io::Result<()> {
    if color.is_none() && attr.is_empty() {
        return Ok(());
    }
    let color = match color {
        None if attr.contains(Attr::BOLD) => Some(Color::White),
        other => other,
    };

    w.write_all(b"\x1b[")?;
    if attr.is_empty() {
        w.write_all(b"0")?;
    } else {
        let mut first = true;
        for (flag, code) in [
            (Attr::BOLD, b"1"),
            (Attr::DIM, b"2"),
            (Attr::ITALIC, b"3"),
            (Attr::UNDERLINE, b"4"),
        ] {
            if attr.contains(flag) {
                if !first {
                    w.write_all(b";")?;
                }
                w.write_all(code)?;
                first = false;
            }
        }
    }
    if let Some(color) = color {
        write!(w, ";{}", color.fg_code())?;
    }
    w.write_all(b";49m")
}

/// Reset all SGR attributes to terminal defaults (SGR 0).
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Helper: run an ANSI function and return its output as a string.
    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    // ── Cursor ──────────────────────────────────────────────────────────

    #[test]
    fn forward_move() {
        assert_eq!(emit(|w| cursor_forward(w, 7)), "\x1b[7C");
    }

    #[test]
    fn zero_moves_emit_nothing() {
        assert_eq!(emit(|w| cursor_forward(w, 0)), "");
        assert_eq!(emit(|w| cursor_back(w, 0)), "");
        assert_eq!(emit(|w| cursor_up(w, 0)), "");
        assert_eq!(emit(|w| cursor_down(w, 0)), "");
    }

    #[test]
    fn vertical_moves() {
        assert_eq!(emit(|w| cursor_up(w, 2)), "\x1b[2A");
        assert_eq!(emit(|w| cursor_down(w, 3)), "\x1b[3B");
        assert_eq!(emit(|w| cursor_back(w, 12)), "\x1b[12D");
    }

    #[test]
    fn column_set_is_cr_plus_forward() {
        assert_eq!(emit(|w| cursor_to_column(w, 5)), "\r\x1b[5C");
        assert_eq!(emit(|w| cursor_to_column(w, 0)), "\r");
    }

    #[test]
    fn probe_sequences() {
        assert_eq!(emit(|w| query_cursor_position(w)), "\x1b[6n");
        assert_eq!(emit(|w| cursor_to_right_margin(w)), "\x1b[999C");
    }

    // ── Erase ───────────────────────────────────────────────────────────

    #[test]
    fn erase_and_clear() {
        assert_eq!(emit(|w| erase_line_end(w)), "\x1b[0K");
        assert_eq!(emit(|w| clear_screen(w)), "\x1b[H\x1b[2J");
        assert_eq!(emit(|w| beep(w)), "\x07");
    }

    // ── Hint styling ────────────────────────────────────────────────────

    #[test]
    fn hint_plain_emits_nothing() {
        assert_eq!(emit(|w| hint_style(w, None, Attr::empty())), "");
    }

    #[test]
    fn hint_color_only() {
        assert_eq!(
            emit(|w| hint_style(w, Some(Color::Magenta), Attr::empty())),
            "\x1b[0;35;49m"
        );
    }

    #[test]
    fn hint_bold_without_color_is_white() {
        assert_eq!(
            emit(|w| hint_style(w, None, Attr::BOLD)),
            "\x1b[1;37;49m"
        );
    }

    #[test]
    fn hint_dim_without_color_keeps_default_fg() {
        assert_eq!(emit(|w| hint_style(w, None, Attr::DIM)), "\x1b[2;49m");
    }

    #[test]
    fn hint_combined_attrs() {
        assert_eq!(
            emit(|w| hint_style(w, Some(Color::Cyan), Attr::BOLD | Attr::UNDERLINE)),
            "\x1b[1;4;36;49m"
        );
    }

    #[test]
    fn color_codes_span_30_to_37() {
        assert_eq!(Color::Black.fg_code(), 30);
        assert_eq!(Color::White.fg_code(), 37);
    }

    #[test]
    fn reset_sequence() {
        assert_eq!(emit(|w| reset(w)), "\x1b[0m");
    }
}
