//! # n-edit: line-editing engine for n-line
//!
//! Everything between raw keystrokes and a submitted line:
//!
//! - **[`buffer`]** - `EditBuffer`, the line under edit with its cursor and capacity
//! - **[`word`]** - word boundaries for Ctrl-W
//! - **[`history`]** - bounded history with a live editing slot
//! - **[`completion`]** - Tab-completion cycling and inline hints
//! - **[`keymap`]** - decoded keys to `EditCommand`s
//! - **[`render`]** - single-line and multi-line repaint
//! - **[`session`]** - `Session`, the edit loop tying it all together
//!
//! Terminal I/O primitives (escape encoders, key decoding, raw mode) live in
//! `n-term`.

pub mod buffer;
pub mod completion;
pub mod config;
pub mod error;
pub mod history;
pub mod keymap;
pub mod render;
pub mod session;
pub mod word;

pub use completion::{Color, Hint, HintAttr};
pub use config::Config;
pub use error::{Error, Result};
pub use session::{AlreadyRaw, Interaction, ModeSwitch, ReadlineEvent, Session};
