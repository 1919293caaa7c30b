// SPDX-License-Identifier: MIT
//
// n-term: terminal layer for the n-line editor.
//
// Everything a line editor needs from a VT100-style terminal and nothing
// more: encoders for the few escape sequences it emits, a buffer that turns
// each repaint into a single write, a decoder from raw input bytes to keys,
// and raw-mode/width/capability queries.
//
// This crate intentionally avoids external terminal frameworks in favor of
// direct control via ANSI escape sequences and raw termios. Every byte sent
// to the terminal is accounted for.

pub mod ansi;
pub mod input;
pub mod output;
pub mod terminal;
