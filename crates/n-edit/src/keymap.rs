//! Key bindings: decoded keys to editing commands.
//!
//! Emacs-style bindings, the set every readline-alike shares. Two bindings
//! depend on editor state and are resolved by the caller-supplied
//! [`KeyContext`]:
//!
//! | Key | Condition | Command |
//! |-----|-----------|---------|
//! | Ctrl-D | line non-empty | [`EditCommand::DeleteForward`] |
//! | Ctrl-D | line empty | [`EditCommand::Eof`] |
//! | Tab | completion callback set | [`EditCommand::Complete`] |
//! | Tab | otherwise | `InsertChar(b'\t')` |
//!
//! Control keys with no binding map to `None` and are ignored.

use n_term::input::Key;

// ---------------------------------------------------------------------------
// EditCommand
// ---------------------------------------------------------------------------

/// A logical editing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCommand {
    InsertChar(u8),
    Submit,
    Abort,
    Eof,
    Backspace,
    DeleteForward,
    MoveHome,
    MoveEnd,
    MoveLeft,
    MoveRight,
    HistoryPrev,
    HistoryNext,
    TransposeChars,
    KillToEnd,
    KillWholeLine,
    DeletePrevWord,
    ClearScreen,
    Complete,
}

/// Editor state that changes what a key means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyContext {
    pub line_empty: bool,
    pub has_completion: bool,
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Map a key to a command, or `None` if the key is not bound.
#[must_use]
pub const fn command_for(key: Key, ctx: KeyContext) -> Option<EditCommand> {
    use EditCommand as C;

    let cmd = match key {
        Key::Char(b) => C::InsertChar(b),
        Key::Enter => C::Submit,
        Key::Backspace => C::Backspace,
        Key::Delete => C::DeleteForward,
        Key::Tab if ctx.has_completion => C::Complete,
        Key::Tab => C::InsertChar(b'\t'),
        Key::Home | Key::Ctrl(b'a') => C::MoveHome,
        Key::End | Key::Ctrl(b'e') => C::MoveEnd,
        Key::Left | Key::Ctrl(b'b') => C::MoveLeft,
        Key::Right | Key::Ctrl(b'f') => C::MoveRight,
        Key::Up | Key::Ctrl(b'p') => C::HistoryPrev,
        Key::Down | Key::Ctrl(b'n') => C::HistoryNext,
        Key::Ctrl(b'c') => C::Abort,
        Key::Ctrl(b'd') if ctx.line_empty => C::Eof,
        Key::Ctrl(b'd') => C::DeleteForward,
        Key::Ctrl(b't') => C::TransposeChars,
        Key::Ctrl(b'k') => C::KillToEnd,
        Key::Ctrl(b'u') => C::KillWholeLine,
        Key::Ctrl(b'w') => C::DeletePrevWord,
        Key::Ctrl(b'l') => C::ClearScreen,
        Key::Ctrl(_) | Key::Unknown => return None,
    };
    Some(cmd)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
