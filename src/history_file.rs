// SPDX-License-Identifier: MIT
//
// History persistence: one entry per line in a plain text file.
//
// The file is private to the user (mode 0600 on Unix): shells and REPLs
// routinely see passwords typed at the wrong prompt. Entries that contain a
// line break cannot round-trip through a line-per-entry format and are not
// written.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use n_edit::history::History;
use tracing::debug;

/// Add every line of `path` to `history`, oldest first.
///
/// A missing file is not an error: there is simply no history yet. Each
/// line is cut at its first `\r` or `\n`, and lines are kept exactly as
/// saved, repeats included.
///
/// # Errors
///
/// Returns any other error from opening or reading the file.
pub fn load(history: &mut History, path: &Path) -> io::Result<()> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    let mut lines = Vec::new();
    for line in BufReader::new(file).split(b'\n') {
        let line = line?;
        let end = line
            .iter()
            .position(|&b| b == b'\r' || b == b'\n')
            .unwrap_or(line.len());
        lines.push(String::from_utf8_lossy(&line[..end]).into_owned());
    }
    debug!(path = %path.display(), count = lines.len(), "history loaded");
    history.deserialize(lines);
    Ok(())
}

/// Write `history` to `path`, replacing its contents.
///
/// # Errors
///
/// Returns any error from creating or writing the file.
pub fn save(history: &History, path: &Path) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let file = options.open(path)?;

    // The mode above only applies to new files.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }

    let mut w = BufWriter::new(file);
    for entry in history.serialize() {
        if entry.contains(['\r', '\n']) {
            continue;
        }
        writeln!(w, "{entry}")?;
    }
    w.flush()
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn history(lines: &[&str]) -> History {
        let mut h = History::new(100);
        h.deserialize(lines);
        h
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.txt");

        save(&history(&["ls", "cd src", "make"]), &path).unwrap();

        let mut loaded = History::new(100);
        load(&mut loaded, &path).unwrap();
        assert_eq!(loaded.entries(), ["ls", "cd src", "make"]);
    }

    #[test]
    fn file_format_is_line_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("h");
        save(&history(&["a", "b"]), &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nb\n");
    }

    #[test]
    fn entries_with_line_breaks_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("h");
        save(&history(&["ok", "bad\nline", "cr\r"]), &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "ok\n");
    }

    #[test]
    fn adjacent_repeats_survive_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("h");
        save(&history(&["a", "a", "b"]), &path).unwrap();

        let mut loaded = History::new(100);
        load(&mut loaded, &path).unwrap();
        assert_eq!(loaded.entries(), ["a", "a", "b"]);
    }

    #[test]
    fn load_cuts_at_carriage_return() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("h");
        std::fs::write(&path, "dos\r\nunix\n").unwrap();

        let mut h = History::new(100);
        load(&mut h, &path).unwrap();
        assert_eq!(h.entries(), ["dos", "unix"]);
    }

    #[test]
    fn load_respects_capacity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("h");
        std::fs::write(&path, "1\n2\n3\n").unwrap();

        let mut h = History::new(2);
        load(&mut h, &path).unwrap();
        assert_eq!(h.entries(), ["2", "3"]);
    }

    #[test]
    fn missing_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut h = History::new(10);
        load(&mut h, &dir.path().join("absent")).unwrap();
        assert!(h.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("h");
        std::fs::write(&path, "").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        save(&history(&["secret"]), &path).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
