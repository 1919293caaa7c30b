//! Render engine: repaints the prompt and line with minimal escapes.
//!
//! Two strategies, picked by the multi-line flag:
//!
//! - **Single-line**: the line scrolls horizontally inside one terminal row.
//!   When the cursor would fall off the right edge, leading bytes are hidden;
//!   when the tail would, trailing bytes are. Every repaint is: carriage
//!   return, prompt, visible slice, hint, erase to end of line, cursor to
//!   column.
//! - **Multi-line**: the line wraps over as many rows as it needs. The
//!   renderer remembers the tallest the line has been (`maxrows`) and where
//!   the cursor was after the last repaint (`oldpos`), walks down to the last
//!   row it ever used, clears upward, and redraws from the top row.
//!
//! Each refresh is assembled in an [`OutputBuffer`] and reaches the terminal
//! in one write.
//!
//! Column arithmetic counts bytes: one byte, one column.

use std::io::{self, Write};

use n_term::ansi;
use n_term::output::OutputBuffer;
use tracing::trace;

use crate::completion::Hint;

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// Everything one repaint draws.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub prompt: &'a [u8],
    /// Bytes shown as the line. During completion this is the previewed
    /// candidate, not the edit buffer.
    pub line: &'a [u8],
    /// Cursor offset into `line`.
    pub pos: usize,
    /// Terminal width.
    pub cols: usize,
    pub hint: Option<&'a Hint>,
}

/// Rows a line occupies in multi-line mode: `ceil((plen + len) / cols)`.
#[must_use]
pub const fn rows_used(plen: usize, len: usize, cols: usize) -> usize {
    (plen + len).div_ceil(cols)
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Repaint state carried between refreshes of one line.
#[derive(Default)]
pub struct Renderer {
    multiline: bool,
    /// Most rows the line has occupied since editing began.
    maxrows: usize,
    /// Cursor offset after the previous refresh.
    oldpos: usize,
    out: OutputBuffer,
}

impl Renderer {
    #[must_use]
    pub fn new(multiline: bool) -> Self {
        Self {
            multiline,
            ..Self::default()
        }
    }

    /// Whether multi-line mode is on.
    #[must_use]
    pub const fn multiline(&self) -> bool {
        self.multiline
    }

    /// Switch modes. Forgets the row bookkeeping of the old mode.
    pub fn set_multiline(&mut self, multiline: bool) {
        self.multiline = multiline;
        self.reset();
    }

    /// Forget row bookkeeping before editing a new line.
    pub fn reset(&mut self) {
        self.maxrows = 0;
        self.oldpos = 0;
    }

    /// Most rows used so far (multi-line mode).
    #[must_use]
    pub const fn maxrows(&self) -> usize {
        self.maxrows
    }

    /// Repaint `frame` and write it to `w` in one call.
    ///
    /// # Errors
    ///
    /// Returns the error from writing to `w`.
    pub fn refresh(&mut self, w: &mut impl Write, frame: &Frame<'_>) -> io::Result<()> {
        let cols = frame.cols.max(1);
        if self.multiline {
            self.compose_multi_line(frame, cols)?;
        } else {
            self.compose_single_line(frame, cols)?;
        }
        self.out.flush_to(w)
    }

    // -- Single-line --------------------------------------------------------

    fn compose_single_line(&mut self, frame: &Frame<'_>, cols: usize) -> io::Result<()> {
        let plen = frame.prompt.len();
        let mut start = 0;
        let mut len = frame.line.len();
        let mut pos = frame.pos;

        while plen + pos >= cols && pos > 0 {
            start += 1;
            len -= 1;
            pos -= 1;
        }
        while plen + len > cols && len > 0 {
            len -= 1;
        }

        let out = &mut self.out;
        ansi::carriage_return(out)?;
        out.push_bytes(frame.prompt);
        out.push_bytes(&frame.line[start..start + len]);
        write_hint(out, frame, cols)?;
        ansi::erase_line_end(out)?;
        ansi::cursor_to_column(out, plen + pos)
    }

    // -- Multi-line ---------------------------------------------------------

    fn compose_multi_line(&mut self, frame: &Frame<'_>, cols: usize) -> io::Result<()> {
        let plen = frame.prompt.len();
        let len = frame.line.len();
        let pos = frame.pos;

        let mut rows = rows_used(plen, len, cols);
        let rpos = (plen + self.oldpos + cols) / cols;
        let old_rows = self.maxrows;
        self.maxrows = self.maxrows.max(rows);

        let out = &mut self.out;

        // Clear every row used before, bottom up.
        ansi::cursor_down(out, old_rows.saturating_sub(rpos))?;
        for _ in 1..old_rows {
            ansi::carriage_return(out)?;
            ansi::erase_line_end(out)?;
            ansi::cursor_up(out, 1)?;
        }
        ansi::carriage_return(out)?;
        ansi::erase_line_end(out)?;

        out.push_bytes(frame.prompt);
        out.push_bytes(frame.line);
        write_hint(out, frame, cols)?;

        // Cursor at the very end of a full row: the terminal leaves it past
        // the margin, so open the next row explicitly.
        if pos > 0 && pos == len && (pos + plen) % cols == 0 {
            out.push_bytes(b"\n");
            ansi::carriage_return(out)?;
            rows += 1;
            self.maxrows = self.maxrows.max(rows);
        }

        let rpos2 = (plen + pos + cols) / cols;
        ansi::cursor_up(out, rows.saturating_sub(rpos2))?;
        let col = (plen + pos) % cols;
        ansi::cursor_to_column(out, col)?;

        trace!(
            len,
            pos,
            oldpos = self.oldpos,
            plen,
            rows,
            rpos,
            rpos2,
            maxrows = self.maxrows,
            old_rows,
            "multi-line refresh"
        );
        self.oldpos = pos;
        Ok(())
    }
}

/// Append the hint when the line leaves room for it.
fn write_hint(out: &mut OutputBuffer, frame: &Frame<'_>, cols: usize) -> io::Result<()> {
    let used = frame.prompt.len() + frame.line.len();
    match frame.hint {
        Some(hint) if used < cols => hint.write_to(out, cols - used),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
