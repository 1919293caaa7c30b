//! Edit buffer: the line being edited and its cursor.
//!
//! A byte vector plus a cursor offset and a hard capacity. One byte is one
//! column: multi-byte UTF-8 passes through unmodified but the cursor moves
//! over it a byte at a time.
//!
//! # Invariants
//!
//! `pos <= len <= max_len` after every operation. Inserting into a full
//! buffer is a silent no-op, the same policy a fixed-size line buffer has,
//! without the fixed allocation.
//!
//! Every mutating operation reports whether anything changed so the session
//! can skip repaints that would draw the same thing.

use std::borrow::Cow;

use crate::error::{Error, Result};
use crate::word;

// ---------------------------------------------------------------------------
// EditBuffer
// ---------------------------------------------------------------------------

/// The line under edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    bytes: Vec<u8>,
    pos: usize,
    max_len: usize,
}

impl EditBuffer {
    /// An empty buffer holding at most `max_len` bytes.
    #[must_use]
    pub const fn new(max_len: usize) -> Self {
        Self {
            bytes: Vec::new(),
            pos: 0,
            max_len,
        }
    }

    // -- Accessors ----------------------------------------------------------

    /// The line contents.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The line contents as text, with invalid UTF-8 replaced.
    #[must_use]
    pub fn to_str_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// Length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the line is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Cursor offset, `0..=len`.
    #[inline]
    #[must_use]
    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// Capacity in bytes.
    #[inline]
    #[must_use]
    pub const fn max_len(&self) -> usize {
        self.max_len
    }

    /// Whether the cursor sits after the last byte.
    #[inline]
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.pos == self.bytes.len()
    }

    // -- Whole-line operations ----------------------------------------------

    /// Empty the buffer and move the cursor home. Keeps the allocation.
    pub fn clear(&mut self) {
        self.bytes.clear();
        self.pos = 0;
    }

    /// Replace the contents, truncated to capacity, cursor at the end.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationExhausted`] if growing fails. The buffer
    /// is left empty in that case.
    pub fn replace(&mut self, text: &[u8]) -> Result<()> {
        let text = &text[..text.len().min(self.max_len)];
        self.clear();
        self.bytes
            .try_reserve(text.len())
            .map_err(|_| Error::AllocationExhausted)?;
        self.bytes.extend_from_slice(text);
        self.pos = self.bytes.len();
        Ok(())
    }

    // -- Insertion and deletion ---------------------------------------------

    /// Insert `byte` at the cursor and advance.
    ///
    /// Returns `Ok(false)` when the buffer is full.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationExhausted`] if growing fails.
    pub fn insert(&mut self, byte: u8) -> Result<bool> {
        if self.bytes.len() >= self.max_len {
            return Ok(false);
        }
        self.bytes
            .try_reserve(1)
            .map_err(|_| Error::AllocationExhausted)?;
        self.bytes.insert(self.pos, byte);
        self.pos += 1;
        Ok(true)
    }

    /// Remove the byte left of the cursor.
    pub fn backspace(&mut self) -> bool {
        if self.pos == 0 {
            return false;
        }
        self.pos -= 1;
        self.bytes.remove(self.pos);
        true
    }

    /// Remove the byte under the cursor.
    pub fn delete(&mut self) -> bool {
        if self.pos >= self.bytes.len() {
            return false;
        }
        self.bytes.remove(self.pos);
        true
    }

    /// Swap the byte under the cursor with the one before it.
    ///
    /// The cursor advances unless it is on the last byte, so repeated
    /// presses drag a character rightward.
    pub fn transpose(&mut self) -> bool {
        let len = self.bytes.len();
        if self.pos == 0 || self.pos >= len {
            return false;
        }
        self.bytes.swap(self.pos - 1, self.pos);
        if self.pos != len - 1 {
            self.pos += 1;
        }
        true
    }

    /// Delete from the cursor to the end of the line.
    pub fn kill_to_end(&mut self) -> bool {
        if self.pos >= self.bytes.len() {
            return false;
        }
        self.bytes.truncate(self.pos);
        true
    }

    /// Delete the whole line.
    pub fn kill_line(&mut self) -> bool {
        if self.bytes.is_empty() {
            return false;
        }
        self.clear();
        true
    }

    /// Delete the word before the cursor (see [`word::prev_word_start`]).
    pub fn delete_prev_word(&mut self) -> bool {
        let start = word::prev_word_start(&self.bytes, self.pos);
        if start == self.pos {
            return false;
        }
        self.bytes.drain(start..self.pos);
        self.pos = start;
        true
    }

    // -- Cursor movement ----------------------------------------------------

    /// Move one byte left.
    pub fn move_left(&mut self) -> bool {
        if self.pos == 0 {
            return false;
        }
        self.pos -= 1;
        true
    }

    /// Move one byte right.
    pub fn move_right(&mut self) -> bool {
        if self.pos >= self.bytes.len() {
            return false;
        }
        self.pos += 1;
        true
    }

    /// Move to the start of the line.
    pub fn move_home(&mut self) -> bool {
        if self.pos == 0 {
            return false;
        }
        self.pos = 0;
        true
    }

    /// Move past the last byte.
    pub fn move_end(&mut self) -> bool {
        if self.pos == self.bytes.len() {
            return false;
        }
        self.pos = self.bytes.len();
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn buf(text: &str) -> EditBuffer {
        let mut b = EditBuffer::new(64);
        b.replace(text.as_bytes()).unwrap();
        b
    }

    fn check(b: &EditBuffer) {
        assert!(b.pos() <= b.len());
        assert!(b.len() <= b.max_len());
    }

    // -- Insert -------------------------------------------------------------

    #[test]
    fn insert_appends_and_advances() {
        let mut b = EditBuffer::new(8);
        for &c in b"abc" {
            assert!(b.insert(c).unwrap());
        }
        assert_eq!(b.as_bytes(), b"abc");
        assert_eq!(b.pos(), 3);
    }

    #[test]
    fn insert_in_middle_shifts_tail() {
        let mut b = buf("ac");
        b.move_left();
        b.insert(b'b').unwrap();
        assert_eq!(b.as_bytes(), b"abc");
        assert_eq!(b.pos(), 2);
    }

    #[test]
    fn insert_at_capacity_is_noop() {
        let mut b = EditBuffer::new(2);
        b.insert(b'a').unwrap();
        b.insert(b'b').unwrap();
        assert!(!b.insert(b'c').unwrap());
        assert_eq!(b.as_bytes(), b"ab");
        assert_eq!(b.pos(), 2);
    }

    #[test]
    fn high_bytes_are_stored_verbatim() {
        let mut b = EditBuffer::new(8);
        for &c in "é".as_bytes() {
            b.insert(c).unwrap();
        }
        assert_eq!(b.len(), 2);
        assert_eq!(b.to_str_lossy(), "é");
    }

    // -- Delete -------------------------------------------------------------

    #[test]
    fn backspace_at_start_is_noop() {
        let mut b = buf("abc");
        b.move_home();
        assert!(!b.backspace());
        assert_eq!(b.as_bytes(), b"abc");
    }

    #[test]
    fn backspace_removes_left() {
        let mut b = buf("abc");
        assert!(b.backspace());
        assert_eq!(b.as_bytes(), b"ab");
        assert_eq!(b.pos(), 2);
    }

    #[test]
    fn delete_at_end_is_noop() {
        let mut b = buf("abc");
        assert!(!b.delete());
    }

    #[test]
    fn delete_removes_under_cursor() {
        let mut b = buf("abc");
        b.move_home();
        assert!(b.delete());
        assert_eq!(b.as_bytes(), b"bc");
        assert_eq!(b.pos(), 0);
    }

    #[test]
    fn random_edits_keep_invariants() {
        let mut b = EditBuffer::new(5);
        let ops = b"iiiiiiibdlibiiidrrbbhdddiiiiii";
        for (n, &op) in ops.iter().enumerate() {
            match op {
                b'i' => {
                    b.insert(b'a' + u8::try_from(n % 26).unwrap()).unwrap();
                }
                b'b' => {
                    b.backspace();
                }
                b'd' => {
                    b.delete();
                }
                b'l' => {
                    b.move_left();
                }
                b'r' => {
                    b.move_right();
                }
                b'h' => {
                    b.move_home();
                }
                _ => unreachable!(),
            }
            check(&b);
        }
    }

    // -- Transpose ----------------------------------------------------------

    #[test]
    fn transpose_mid_line_advances() {
        let mut b = buf("abcd");
        b.move_home();
        b.move_right();
        assert!(b.transpose());
        assert_eq!(b.as_bytes(), b"bacd");
        assert_eq!(b.pos(), 2);
    }

    #[test]
    fn transpose_on_last_byte_stays() {
        let mut b = buf("abcd");
        b.move_left();
        assert!(b.transpose());
        assert_eq!(b.as_bytes(), b"abdc");
        assert_eq!(b.pos(), 3);
    }

    #[test]
    fn transpose_at_edges_is_noop() {
        let mut b = buf("ab");
        assert!(!b.transpose());
        b.move_home();
        assert!(!b.transpose());
        assert_eq!(b.as_bytes(), b"ab");
    }

    // -- Kill ---------------------------------------------------------------

    #[test]
    fn kill_to_end_truncates() {
        let mut b = buf("hello world");
        for _ in 0..6 {
            b.move_left();
        }
        assert!(b.kill_to_end());
        assert_eq!(b.as_bytes(), b"hello");
        assert_eq!(b.pos(), 5);
    }

    #[test]
    fn kill_line_empties() {
        let mut b = buf("hello");
        assert!(b.kill_line());
        assert!(b.is_empty());
        assert_eq!(b.pos(), 0);
    }

    #[test]
    fn delete_prev_word_skips_trailing_space() {
        let mut b = buf("foo bar ");
        assert!(b.delete_prev_word());
        assert_eq!(b.as_bytes(), b"foo ");
        assert_eq!(b.pos(), 4);
    }

    #[test]
    fn delete_prev_word_keeps_tail() {
        let mut b = buf("one two three");
        for _ in 0..6 {
            b.move_left();
        }
        assert!(b.delete_prev_word());
        assert_eq!(b.as_bytes(), b"one  three");
        assert_eq!(b.pos(), 4);
    }

    #[test]
    fn delete_prev_word_at_start_is_noop() {
        let mut b = buf("abc");
        b.move_home();
        assert!(!b.delete_prev_word());
    }

    // -- Movement -----------------------------------------------------------

    #[test]
    fn movement_clamps() {
        let mut b = buf("ab");
        assert!(!b.move_right());
        assert!(!b.move_end());
        assert!(b.move_home());
        assert!(!b.move_left());
        assert!(!b.move_home());
        assert!(b.move_end());
        assert!(b.at_end());
    }

    // -- Replace ------------------------------------------------------------

    #[test]
    fn replace_truncates_to_capacity() {
        let mut b = EditBuffer::new(4);
        b.replace(b"abcdef").unwrap();
        assert_eq!(b.as_bytes(), b"abcd");
        assert_eq!(b.pos(), 4);
    }
}
