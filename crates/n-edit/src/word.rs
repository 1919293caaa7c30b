//! Word boundaries for line editing.
//!
//! Line editors use the simplest possible notion of a word: a run of
//! non-space bytes. Only the ASCII space separates words, so `foo.bar` and
//! `a\tb` are each a single word. This matches what users expect from
//! Ctrl-W in a shell.

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Start of the word that ends at or before `pos`.
///
/// Skips spaces leftward from `pos`, then non-spaces. The returned offset is
/// where a Ctrl-W deletion starts; `pos` is where it ends.
#[must_use]
pub fn prev_word_start(bytes: &[u8], pos: usize) -> usize {
    let mut start = pos.min(bytes.len());
    while start > 0 && bytes[start - 1] == b' ' {
        start -= 1;
    }
    while start > 0 && bytes[start - 1] != b' ' {
        start -= 1;
    }
    start
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_space_is_skipped() {
        assert_eq!(prev_word_start(b"foo bar ", 8), 4);
    }

    #[test]
    fn mid_word() {
        assert_eq!(prev_word_start(b"foo bar", 6), 4);
    }

    #[test]
    fn single_word() {
        assert_eq!(prev_word_start(b"hello", 5), 0);
    }

    #[test]
    fn only_spaces() {
        assert_eq!(prev_word_start(b"   ", 3), 0);
    }

    #[test]
    fn at_start() {
        assert_eq!(prev_word_start(b"foo", 0), 0);
    }

    #[test]
    fn punctuation_is_part_of_word() {
        assert_eq!(prev_word_start(b"cd ../src", 9), 3);
    }

    #[test]
    fn multiple_spaces_between_words() {
        assert_eq!(prev_word_start(b"a   b   ", 8), 4);
    }

    #[test]
    fn pos_past_end_is_clamped() {
        assert_eq!(prev_word_start(b"ab", 10), 0);
    }
}
