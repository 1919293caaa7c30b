//! Tab completion and inline hints.
//!
//! Both are driven by callbacks owned by the session:
//!
//! - A **completion** callback maps the current line to candidate lines.
//!   Tab cycles through them, previewing each in place of the line, with one
//!   extra stop that shows the original line again.
//! - A **hints** callback maps the current line to an optional [`Hint`],
//!   drawn dimmed or colored to the right of the cursor and never part of
//!   the line itself.
//!
//! This module holds the data types and the cycling state machine. Reading
//! keys and repainting happen in [`session`](crate::session).

use std::io::{self, Write};

use n_term::ansi;

pub use n_term::ansi::{Attr as HintAttr, Color};

// ---------------------------------------------------------------------------
// Callbacks
// ---------------------------------------------------------------------------

/// Produces completion candidates for a line.
pub type CompletionCallback = Box<dyn FnMut(&str) -> Vec<String>>;

/// Produces an optional hint for a line.
pub type HintsCallback = Box<dyn FnMut(&str) -> Option<Hint>>;

/// Receives each hint once it has been drawn.
pub type FreeHintsCallback = Box<dyn FnMut(Hint)>;

// ---------------------------------------------------------------------------
// Hint
// ---------------------------------------------------------------------------

/// Text shown after the line, with optional styling.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Hint {
    pub text: String,
    pub color: Option<Color>,
    pub attrs: HintAttr,
}

impl Hint {
    /// An unstyled hint.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            attrs: HintAttr::empty(),
        }
    }

    /// Set the foreground color.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Set text attributes.
    #[must_use]
    pub fn with_attrs(mut self, attrs: HintAttr) -> Self {
        self.attrs = attrs;
        self
    }

    /// Whether the hint carries any styling.
    #[must_use]
    pub fn is_styled(&self) -> bool {
        self.color.is_some() || !self.attrs.is_empty()
    }

    /// Write the hint, cut to `room` bytes, wrapped in its style.
    ///
    /// # Errors
    ///
    /// Propagates write errors from `w`.
    pub fn write_to(&self, w: &mut impl Write, room: usize) -> io::Result<()> {
        let text = self.text.as_bytes();
        let text = &text[..text.len().min(room)];
        if text.is_empty() {
            return Ok(());
        }
        let styled = self.is_styled();
        if styled {
            ansi::hint_style(w, self.color, self.attrs)?;
        }
        w.write_all(text)?;
        if styled {
            ansi::reset(w)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Completions
// ---------------------------------------------------------------------------

/// Candidate cycling state for one Tab interaction.
///
/// Positions `0..len` preview a candidate; position `len` shows the
/// original line. Tab moves `(index + 1) % (len + 1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completions {
    candidates: Vec<String>,
    index: usize,
}

impl Completions {
    /// Start cycling at the first candidate. `None` for an empty set.
    #[must_use]
    pub fn new(candidates: Vec<String>) -> Option<Self> {
        if candidates.is_empty() {
            None
        } else {
            Some(Self {
                candidates,
                index: 0,
            })
        }
    }

    /// Number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Always false: an empty set never becomes a `Completions`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Current position, `0..=len`.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// The candidate being previewed, or `None` on the original-line stop.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.candidates.get(self.index).map(String::as_str)
    }

    /// Move to the next stop. Returns `true` when the new stop is the
    /// original line, which callers signal with an alert.
    pub fn advance(&mut self) -> bool {
        self.index = (self.index + 1) % (self.candidates.len() + 1);
        self.index == self.candidates.len()
    }

    /// The candidate to commit, or `None` on the original-line stop.
    #[must_use]
    pub fn into_selected(mut self) -> Option<String> {
        if self.index < self.candidates.len() {
            Some(self.candidates.swap_remove(self.index))
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(hint: &Hint, room: usize) -> String {
        let mut out = Vec::new();
        hint.write_to(&mut out, room).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn set(items: &[&str]) -> Completions {
        Completions::new(items.iter().map(ToString::to_string).collect()).unwrap()
    }

    // -- Hint ---------------------------------------------------------------

    #[test]
    fn plain_hint_has_no_escapes() {
        assert_eq!(render(&Hint::new(" World"), 80), " World");
    }

    #[test]
    fn colored_hint_is_wrapped() {
        let hint = Hint::new(" World").with_color(Color::Magenta);
        assert_eq!(render(&hint, 80), "\x1b[0;35;49m World\x1b[0m");
    }

    #[test]
    fn bold_hint_defaults_to_white() {
        let hint = Hint::new("x").with_attrs(HintAttr::BOLD);
        assert_eq!(render(&hint, 80), "\x1b[1;37;49mx\x1b[0m");
    }

    #[test]
    fn hint_truncated_to_room() {
        assert_eq!(render(&Hint::new("abcdef"), 3), "abc");
    }

    #[test]
    fn hint_with_no_room_emits_nothing() {
        let hint = Hint::new("abc").with_color(Color::Red);
        assert_eq!(render(&hint, 0), "");
    }

    // -- Completions --------------------------------------------------------

    #[test]
    fn empty_set_is_none() {
        assert!(Completions::new(Vec::new()).is_none());
    }

    #[test]
    fn tab_cycles_through_original_stop() {
        let mut c = set(&["a", "b", "c"]);
        let mut seen = vec![c.index()];
        let mut alerts = Vec::new();
        for _ in 0..5 {
            alerts.push(c.advance());
            seen.push(c.index());
        }
        assert_eq!(seen, [0, 1, 2, 3, 0, 1]);
        assert_eq!(alerts, [false, false, true, false, false]);
    }

    #[test]
    fn original_stop_previews_nothing() {
        let mut c = set(&["only"]);
        assert_eq!(c.current(), Some("only"));
        assert!(c.advance());
        assert_eq!(c.current(), None);
        assert_eq!(c.into_selected(), None);
    }

    #[test]
    fn selected_candidate_is_returned() {
        let mut c = set(&["a", "b", "c"]);
        c.advance();
        assert_eq!(c.into_selected(), Some("b".to_string()));
    }
}
