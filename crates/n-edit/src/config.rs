//! Session configuration.
//!
//! A plain value type with sane defaults. [`Config::validate`] is the only
//! gate: a session built from a validated config never sees a zero width or
//! a zero-capacity history.

use crate::error::{Error, Result};

/// Default history capacity.
pub const DEFAULT_HISTORY_MAX_LEN: usize = 100;

/// Default maximum line length in bytes.
pub const DEFAULT_MAX_LINE_LEN: usize = 4095;

/// Default terminal width, used until the caller reports the real one.
pub const DEFAULT_COLUMNS: usize = 80;

/// Tunables for a [`Session`](crate::session::Session).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Wrap long lines over several rows instead of scrolling horizontally.
    pub multiline: bool,
    /// Maximum number of history entries kept.
    pub history_max_len: usize,
    /// Maximum line length in bytes. Input beyond this is dropped.
    pub max_line_len: usize,
    /// Terminal width in columns.
    pub columns: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            multiline: false,
            history_max_len: DEFAULT_HISTORY_MAX_LEN,
            max_line_len: DEFAULT_MAX_LINE_LEN,
            columns: DEFAULT_COLUMNS,
        }
    }
}

impl Config {
    /// Check that every value is in range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.history_max_len < 1 {
            return Err(Error::InvalidConfig(
                "history length must be at least 1".into(),
            ));
        }
        if self.max_line_len < 1 {
            return Err(Error::InvalidConfig(
                "maximum line length must be at least 1".into(),
            ));
        }
        if self.columns < 1 {
            return Err(Error::InvalidConfig("columns must be at least 1".into()));
        }
        Ok(())
    }
}
