//! Error type for the editing engine.
//!
//! Only I/O failures on the input stream end a `read_line` with an error.
//! Ctrl-C and Ctrl-D are ordinary outcomes, reported through
//! [`ReadlineEvent`](crate::session::ReadlineEvent); the matching variants
//! here exist for callers that prefer `?` over matching on the event.

use std::io;

/// Errors produced by the editing engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading the input stream or writing the output stream failed.
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),

    /// The user pressed Ctrl-C.
    #[error("interrupted")]
    Interrupted,

    /// The user pressed Ctrl-D on an empty line, or input ended.
    #[error("end of input")]
    Eof,

    /// A configuration value was out of range. Prior state is unchanged.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Growing the edit buffer failed.
    #[error("line buffer allocation failed")]
    AllocationExhausted,
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn io_errors_convert() {
        let err: Error = io::Error::new(io::ErrorKind::UnexpectedEof, "gone").into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "terminal i/o failed: gone");
    }

    #[test]
    fn config_message_is_kept() {
        let err = Error::InvalidConfig("history length must be at least 1".into());
        assert_eq!(
            err.to_string(),
            "invalid configuration: history length must be at least 1"
        );
    }
}
