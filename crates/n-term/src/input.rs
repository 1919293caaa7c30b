// SPDX-License-Identifier: MIT
//
// Terminal input decoder.
//
// Turns raw stdin bytes into keys. A line editor only needs a small slice of
// what terminals can send:
//
// - Control characters (Ctrl-A .. Ctrl-Z, Enter, Tab, Backspace)
// - Printable bytes, passed through untouched (UTF-8 lead and continuation
//   bytes included: one byte is one column here)
// - A handful of CSI (`ESC [`) and SS3 (`ESC O`) sequences for arrows,
//   Home/End and Delete
//
// # Design
//
// Decoding is pull-based: the caller reads the first byte, and only when it
// is ESC does the decoder read further. Exactly two more bytes are read to
// pick CSI vs SS3 and the final byte; a CSI sequence whose second byte is a
// digit (e.g. Delete, `ESC [ 3 ~`) takes one more. The bytes read are then
// looked up in [`SEQUENCES`]. Anything not in the table decodes to
// [`Key::Unknown`] and the caller drops it without complaint.
//
// Reading two bytes after ESC with no timeout means a lone Escape press
// waits for the next two keystrokes. That is the classic trade-off of
// synchronous line editors: no timers, no threads, and sequences split
// across slow links still decode correctly.

use std::io::{self, Read};

// ─── Key ────────────────────────────────────────────────────────────────────

/// A decoded key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable byte (0x20–0x7E, or any byte ≥ 0x80).
    Char(u8),
    /// A control character, named by its lowercase letter (`Ctrl(b'c')` is
    /// 0x03). Bytes 0x1C–0x1F and 0x00 use their punctuation names.
    Ctrl(u8),
    // ── Named keys ──────────────────────────────────────────────
    Enter,
    Tab,
    Backspace,
    Delete,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    /// An escape sequence we do not recognize.
    Unknown,
}

// ─── Sequence Table ─────────────────────────────────────────────────────────

/// Escape sequences, minus the leading ESC, and the keys they encode.
pub const SEQUENCES: [(&[u8], Key); 9] = [
    (b"[A", Key::Up),
    (b"[B", Key::Down),
    (b"[C", Key::Right),
    (b"[D", Key::Left),
    (b"[H", Key::Home),
    (b"[F", Key::End),
    (b"OH", Key::Home),
    (b"OF", Key::End),
    (b"[3~", Key::Delete),
];

/// ESC byte.
pub const ESC: u8 = 0x1B;

/// Look up an escape sequence body (the bytes after ESC).
#[must_use]
pub fn lookup(seq: &[u8]) -> Key {
    SEQUENCES
        .iter()
        .find(|(body, _)| *body == seq)
        .map_or(Key::Unknown, |&(_, key)| key)
}

// ─── Decoding ───────────────────────────────────────────────────────────────

/// Read a single byte, retrying on `EINTR`.
///
/// Returns `Ok(None)` at end of stream.
///
/// # Errors
///
/// Propagates any read error other than `Interrupted`.
pub fn read_byte(input: &mut impl Read) -> io::Result<Option<u8>> {
    let mut byte = [0u8; 1];
    loop {
        match input.read(&mut byte) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(byte[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
}

/// Read a byte that must be there: end of stream mid-sequence is an error.
fn next_byte(input: &mut impl Read) -> io::Result<u8> {
    read_byte(input)?.ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed inside an escape sequence",
        )
    })
}

/// Decode one key whose first byte has already been read.
///
/// Reads more bytes from `input` only when `first` is ESC.
///
/// # Errors
///
/// Returns an error if the stream fails or closes in the middle of an
/// escape sequence.
pub fn decode(first: u8, input: &mut impl Read) -> io::Result<Key> {
    let key = match first {
        ESC => return decode_escape(input),
        0x0D => Key::Enter,
        0x09 => Key::Tab,
        0x08 | 0x7F => Key::Backspace,
        b @ 0x00..=0x1F => Key::Ctrl((b | 0x40).to_ascii_lowercase()),
        b => Key::Char(b),
    };
    Ok(key)
}

fn decode_escape(input: &mut impl Read) -> io::Result<Key> {
    let mut seq = [0u8; 3];
    seq[0] = next_byte(input)?;
    seq[1] = next_byte(input)?;

    // Extended CSI: `ESC [ <digit> <final>`.
    let len = if seq[0] == b'[' && seq[1].is_ascii_digit() {
        seq[2] = next_byte(input)?;
        3
    } else {
        2
    };

    Ok(lookup(&seq[..len]))
}

/// Describe a raw byte for the key-code diagnostic mode.
///
/// Format: `'c' hh (d)`, with `?` standing in for non-printable bytes.
#[must_use]
pub fn describe(byte: u8) -> String {
    let shown = if byte.is_ascii_graphic() || byte == b' ' {
        char::from(byte)
    } else {
        '?'
    };
    format!("'{shown}' {byte:02x} ({byte})")
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Helper: decode `first` with `rest` as the remaining stream.
    fn key(first: u8, rest: &[u8]) -> Key {
        let mut input = rest;
        decode(first, &mut input).unwrap()
    }

    /// Helper: decode a full escape sequence given as bytes after ESC.
    fn esc(rest: &[u8]) -> Key {
        key(ESC, rest)
    }

    // ── Single bytes ────────────────────────────────────────────────────

    #[test]
    fn printable_ascii() {
        assert_eq!(key(b'a', b""), Key::Char(b'a'));
        assert_eq!(key(b' ', b""), Key::Char(b' '));
        assert_eq!(key(b'~', b""), Key::Char(b'~'));
    }

    #[test]
    fn high_bytes_pass_through() {
        assert_eq!(key(0xC3, b""), Key::Char(0xC3));
        assert_eq!(key(0xA9, b""), Key::Char(0xA9));
    }

    #[test]
    fn named_controls() {
        assert_eq!(key(0x0D, b""), Key::Enter);
        assert_eq!(key(0x09, b""), Key::Tab);
        assert_eq!(key(0x7F, b""), Key::Backspace);
        assert_eq!(key(0x08, b""), Key::Backspace);
    }

    #[test]
    fn ctrl_letters() {
        assert_eq!(key(0x01, b""), Key::Ctrl(b'a'));
        assert_eq!(key(0x03, b""), Key::Ctrl(b'c'));
        assert_eq!(key(0x17, b""), Key::Ctrl(b'w'));
        assert_eq!(key(0x1A, b""), Key::Ctrl(b'z'));
    }

    #[test]
    fn ctrl_punctuation() {
        assert_eq!(key(0x00, b""), Key::Ctrl(b'@'));
        assert_eq!(key(0x1C, b""), Key::Ctrl(b'\\'));
        assert_eq!(key(0x0A, b""), Key::Ctrl(b'j'));
    }

    #[test]
    fn single_byte_does_not_read_further() {
        let mut input: &[u8] = b"xyz";
        decode(b'a', &mut input).unwrap();
        assert_eq!(input, b"xyz");
    }

    // ── Escape sequences ────────────────────────────────────────────────

    #[test]
    fn csi_arrows() {
        assert_eq!(esc(b"[A"), Key::Up);
        assert_eq!(esc(b"[B"), Key::Down);
        assert_eq!(esc(b"[C"), Key::Right);
        assert_eq!(esc(b"[D"), Key::Left);
    }

    #[test]
    fn home_end_both_encodings() {
        assert_eq!(esc(b"[H"), Key::Home);
        assert_eq!(esc(b"[F"), Key::End);
        assert_eq!(esc(b"OH"), Key::Home);
        assert_eq!(esc(b"OF"), Key::End);
    }

    #[test]
    fn delete_key() {
        assert_eq!(esc(b"[3~"), Key::Delete);
    }

    #[test]
    fn unknown_csi_is_discarded() {
        assert_eq!(esc(b"[Z"), Key::Unknown);
        assert_eq!(esc(b"OA"), Key::Unknown);
        assert_eq!(esc(b"[2~"), Key::Unknown);
        assert_eq!(esc(b"xy"), Key::Unknown);
    }

    #[test]
    fn extended_csi_reads_exactly_three_bytes() {
        let mut input: &[u8] = b"[5~rest";
        assert_eq!(decode(ESC, &mut input).unwrap(), Key::Unknown);
        assert_eq!(input, b"rest");
    }

    #[test]
    fn plain_csi_reads_exactly_two_bytes() {
        let mut input: &[u8] = b"[Dabc";
        assert_eq!(decode(ESC, &mut input).unwrap(), Key::Left);
        assert_eq!(input, b"abc");
    }

    #[test]
    fn truncated_sequence_is_an_error() {
        let mut input: &[u8] = b"[";
        let err = decode(ESC, &mut input).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn truncated_extended_sequence_is_an_error() {
        let mut input: &[u8] = b"[3";
        assert!(decode(ESC, &mut input).is_err());
    }

    // ── read_byte ───────────────────────────────────────────────────────

    #[test]
    fn read_byte_eof() {
        let mut input: &[u8] = b"";
        assert_eq!(read_byte(&mut input).unwrap(), None);
    }

    #[test]
    fn read_byte_sequence() {
        let mut input: &[u8] = b"ab";
        assert_eq!(read_byte(&mut input).unwrap(), Some(b'a'));
        assert_eq!(read_byte(&mut input).unwrap(), Some(b'b'));
        assert_eq!(read_byte(&mut input).unwrap(), None);
    }

    // ── Lookup / describe ───────────────────────────────────────────────

    #[test]
    fn lookup_every_table_entry() {
        for (body, expected) in SEQUENCES {
            assert_eq!(lookup(body), expected);
        }
    }

    #[test]
    fn describe_printable() {
        assert_eq!(describe(b'q'), "'q' 71 (113)");
    }

    #[test]
    fn describe_control() {
        assert_eq!(describe(0x1B), "'?' 1b (27)");
        assert_eq!(describe(0x7F), "'?' 7f (127)");
    }
}
