//! Command history: a bounded list of past lines with a live editing slot.
//!
//! Entries are ordered oldest first. While a line is being edited the last
//! slot holds a *live placeholder* that mirrors it, so that walking up into
//! history and back down again returns to what was typed:
//!
//! ```text
//! entries:  ["ls", "cd src", "make", <live>]
//! index:      3       2        1       0
//! ```
//!
//! `index` counts from the end. Before moving, [`History::navigate`] stores
//! the current buffer into the slot being left, so edits made to a recalled
//! entry survive moving away and back. Only the placeholder is popped when
//! the edit ends; recalled entries keep whatever was typed into them.
//!
//! The placeholder sits one slot beyond the capacity, so a full history
//! loses nothing to an edit that ends without adding a line.
//!
//! # Usage
//!
//! ```text
//! history.begin_edit();
//! // Up arrow:
//! if let Some(line) = history.navigate(Direction::Prev, current) { load(line) }
//! history.end_edit();
//! history.add(submitted);
//! ```

use tracing::debug;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Which way to walk through history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward older entries (Up, Ctrl-P).
    Prev,
    /// Toward newer entries (Down, Ctrl-N).
    Next,
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Bounded history of submitted lines.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<String>,
    max_len: usize,
    /// Offset from the end of the entry currently shown. 0 = live line.
    index: usize,
    /// Whether the live placeholder is present.
    editing: bool,
}

impl History {
    /// Empty history keeping at most `max_len` entries.
    #[must_use]
    pub const fn new(max_len: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_len,
            index: 0,
            editing: false,
        }
    }

    /// Number of entries, including the live placeholder while editing.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Capacity.
    #[must_use]
    pub const fn max_len(&self) -> usize {
        self.max_len
    }

    /// All entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// The most recent entry.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    /// Append a copy of `line`.
    ///
    /// Does nothing when the capacity is zero or `line` repeats the most
    /// recent entry. Evicts the oldest entry when full. Returns whether the
    /// line was stored.
    pub fn add(&mut self, line: &str) -> bool {
        if self.max_len == 0 || self.last() == Some(line) {
            return false;
        }
        self.push(line.to_owned());
        true
    }

    /// Append, evicting the oldest entries beyond capacity.
    fn push(&mut self, line: String) {
        let keep = self.max_len.saturating_sub(1);
        if self.entries.len() > keep {
            self.entries.drain(..self.entries.len() - keep);
        }
        self.entries.push(line);
    }

    /// Change the capacity, dropping the oldest entries that no longer fit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when `max_len` is zero. The history
    /// is unchanged in that case.
    pub fn set_max_len(&mut self, max_len: usize) -> Result<()> {
        if max_len < 1 {
            return Err(Error::InvalidConfig(
                "history length must be at least 1".into(),
            ));
        }
        let len = self.entries.len();
        if len > max_len {
            self.entries.drain(..len - max_len);
        }
        self.index = self.index.min(self.entries.len().saturating_sub(1));
        debug!(
            from = self.max_len,
            to = max_len,
            kept = self.entries.len(),
            "history capacity changed"
        );
        self.max_len = max_len;
        Ok(())
    }

    // -- Editing slot -------------------------------------------------------

    /// Push the live placeholder and point at it.
    ///
    /// The placeholder is never rejected as a duplicate and never evicts:
    /// while editing, a full history holds `max_len + 1` entries.
    pub fn begin_edit(&mut self) {
        self.index = 0;
        if self.editing || self.max_len == 0 {
            return;
        }
        self.entries.push(String::new());
        self.editing = true;
    }

    /// Pop the live placeholder. Safe to call more than once.
    pub fn end_edit(&mut self) {
        if self.editing {
            self.entries.pop();
            self.editing = false;
        }
        self.index = 0;
    }

    /// Whether the live placeholder is present.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.editing
    }

    /// Offset from the end of the entry currently shown.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Step through history.
    ///
    /// Saves `current` into the slot being left, then moves one entry in
    /// `direction`. Returns the entry to load, or `None` when there is
    /// nothing to walk through or the move would go past either end.
    pub fn navigate(&mut self, direction: Direction, current: &str) -> Option<&str> {
        let len = self.entries.len();
        if len <= 1 {
            return None;
        }

        let slot = len - 1 - self.index;
        current.clone_into(&mut self.entries[slot]);

        match direction {
            Direction::Prev if self.index + 1 < len => self.index += 1,
            Direction::Next if self.index > 0 => self.index -= 1,
            _ => return None,
        }
        Some(&self.entries[len - 1 - self.index])
    }

    // -- Persistence --------------------------------------------------------

    /// Entries in save order, oldest first.
    #[must_use]
    pub fn serialize(&self) -> Vec<String> {
        self.entries.clone()
    }

    /// Append each line in order, exactly as saved.
    ///
    /// Unlike [`History::add`], repeated lines are kept: recalled entries
    /// edited in place can leave neighbours equal, and a reload must give
    /// back the same list. Only the capacity is enforced.
    pub fn deserialize<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.max_len == 0 {
            return;
        }
        for line in lines {
            self.push(line.as_ref().to_owned());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
