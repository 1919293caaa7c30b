//! Edit session: reads keys, edits the line, drives the renderer.
//!
//! A [`Session`] owns everything one prompt needs: the input and output
//! streams, the edit buffer, the history, the completion and hint callbacks,
//! and the renderer's row bookkeeping. [`Session::read_line`] runs one
//! complete edit and reports how it ended.
//!
//! # Interaction kinds
//!
//! | Kind | When | Behavior |
//! |------|------|----------|
//! | [`Interaction::Edit`] | stdin is a capable terminal | raw mode, full editing |
//! | [`Interaction::Plain`] | terminal can't take escapes | print prompt, read a line |
//! | [`Interaction::Pipe`] | stdin is a file or pipe | read a line, no prompt |
//!
//! # Edit loop
//!
//! ```text
//! enable raw ─▶ push live history slot ─▶ prompt
//!      │
//!      ▼
//!   read byte ─▶ decode ─▶ keymap ─▶ apply ─▶ repaint
//!      ▲                                 │
//!      └─────────────────────────────────┘ until Submit / Abort / Eof
//!      │
//!      ▼
//! pop live history slot ─▶ disable raw ─▶ "\r\n"
//! ```
//!
//! Write failures while repainting are logged and otherwise ignored: the
//! next repaint redraws everything anyway. Read failures end the edit with
//! [`Error::Io`].

use std::io::{self, Read, Write};

use n_term::ansi;
use n_term::input::{ESC, decode, describe, read_byte};
use n_term::terminal::{self, RawMode};
use tracing::debug;

use crate::buffer::EditBuffer;
use crate::completion::{CompletionCallback, Completions, FreeHintsCallback, Hint, HintsCallback};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::history::{Direction, History};
use crate::keymap::{EditCommand, KeyContext, command_for};
use crate::render::{Frame, Renderer};

// ---------------------------------------------------------------------------
// ReadlineEvent
// ---------------------------------------------------------------------------

/// How one call to [`Session::read_line`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadlineEvent {
    /// The user submitted a line (possibly empty).
    Line(String),
    /// Ctrl-D on an empty line, or input ended with nothing typed.
    Eof,
    /// Ctrl-C.
    Interrupted,
}

impl ReadlineEvent {
    /// The submitted line, or `None` on abort and end of input.
    #[must_use]
    pub fn into_line(self) -> Option<String> {
        match self {
            Self::Line(line) => Some(line),
            Self::Eof | Self::Interrupted => None,
        }
    }

    /// The submitted line, with abort and end of input as errors.
    ///
    /// # Errors
    ///
    /// [`Error::Interrupted`] for Ctrl-C, [`Error::Eof`] for end of input.
    pub fn into_result(self) -> Result<String> {
        match self {
            Self::Line(line) => Ok(line),
            Self::Eof => Err(Error::Eof),
            Self::Interrupted => Err(Error::Interrupted),
        }
    }
}

// ---------------------------------------------------------------------------
// Interaction
// ---------------------------------------------------------------------------

/// How lines are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interaction {
    /// Raw-mode editing.
    #[default]
    Edit,
    /// Prompt, then a cooked line read. For terminals that can't take
    /// escape sequences.
    Plain,
    /// Newline-delimited reads of any length. No prompt.
    Pipe,
}

impl Interaction {
    /// Pick the interaction for an input stream.
    #[must_use]
    pub const fn detect(input_is_tty: bool, unsupported_term: bool) -> Self {
        if !input_is_tty {
            Self::Pipe
        } else if unsupported_term {
            Self::Plain
        } else {
            Self::Edit
        }
    }
}

// ---------------------------------------------------------------------------
// ModeSwitch
// ---------------------------------------------------------------------------

/// Turns terminal raw mode on and off around each edit.
pub trait ModeSwitch {
    /// Enter raw mode.
    ///
    /// # Errors
    ///
    /// Returns the error that prevented switching.
    fn enable_raw(&mut self) -> io::Result<()>;

    /// Leave raw mode.
    ///
    /// # Errors
    ///
    /// Returns the error that prevented restoring.
    fn disable_raw(&mut self) -> io::Result<()>;
}

/// For streams that need no switching: in-memory buffers, or a terminal the
/// host program already put in raw mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlreadyRaw;

impl ModeSwitch for AlreadyRaw {
    fn enable_raw(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn disable_raw(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ModeSwitch for RawMode {
    fn enable_raw(&mut self) -> io::Result<()> {
        self.enable()
    }

    fn disable_raw(&mut self) -> io::Result<()> {
        self.disable()
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// What the edit loop does after one command.
enum Step {
    Continue,
    /// Feed this byte back through the decoder.
    Redispatch(u8),
    Done(ReadlineEvent),
}

/// A line-editing session over an input stream and two output streams.
///
/// `output` receives the prompt and every repaint; `error` receives alerts
/// (the terminal bell).
pub struct Session<R, W, E> {
    input: R,
    output: W,
    error: E,
    prompt: String,
    buffer: EditBuffer,
    cols: usize,
    auto_columns: bool,
    size_fd: i32,
    renderer: Renderer,
    history: History,
    completion: Option<CompletionCallback>,
    hints: Option<HintsCallback>,
    free_hints: Option<FreeHintsCallback>,
    interaction: Interaction,
    mode: Box<dyn ModeSwitch>,
}

impl<R: Read, W: Write, E: Write> Session<R, W, E> {
    /// A session with default configuration.
    pub fn new(input: R, output: W, error: E, prompt: impl Into<String>) -> Self {
        let config = Config::default();
        Self {
            input,
            output,
            error,
            prompt: prompt.into(),
            buffer: EditBuffer::new(config.max_line_len),
            cols: config.columns,
            auto_columns: false,
            size_fd: terminal::STDOUT_FD,
            renderer: Renderer::new(config.multiline),
            history: History::new(config.history_max_len),
            completion: None,
            hints: None,
            free_hints: None,
            interaction: Interaction::Edit,
            mode: Box::new(AlreadyRaw),
        }
    }

    /// A session with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `config` fails validation.
    pub fn with_config(
        input: R,
        output: W,
        error: E,
        prompt: impl Into<String>,
        config: &Config,
    ) -> Result<Self> {
        config.validate()?;
        let mut session = Self::new(input, output, error, prompt);
        session.buffer = EditBuffer::new(config.max_line_len);
        session.cols = config.columns;
        session.renderer = Renderer::new(config.multiline);
        session.history = History::new(config.history_max_len);
        Ok(session)
    }

    // -- Configuration ------------------------------------------------------

    /// Switch between single-line and multi-line rendering.
    pub fn set_multiline(&mut self, multiline: bool) {
        self.renderer.set_multiline(multiline);
    }

    /// Whether multi-line rendering is on.
    #[must_use]
    pub const fn multiline(&self) -> bool {
        self.renderer.multiline()
    }

    /// Change the history capacity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when `max_len` is zero.
    pub fn set_history_max_len(&mut self, max_len: usize) -> Result<()> {
        self.history.set_max_len(max_len)
    }

    /// Set the terminal width. Zero is treated as one.
    pub fn set_columns(&mut self, cols: usize) {
        self.cols = cols.max(1);
    }

    /// The terminal width used for layout.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.cols
    }

    /// Ask the terminal for its width at the start of every edit, once raw
    /// mode is on (see [`terminal::columns`]).
    pub fn set_auto_columns(&mut self, auto: bool) {
        self.auto_columns = auto;
    }

    /// The descriptor whose window size the width query asks about. Stdout
    /// unless `output` is some other terminal.
    pub fn set_size_fd(&mut self, fd: i32) {
        self.size_fd = fd;
    }

    /// Replace the prompt.
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// The prompt.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Choose how lines are read.
    pub fn set_interaction(&mut self, interaction: Interaction) {
        self.interaction = interaction;
    }

    /// How lines are read.
    #[must_use]
    pub const fn interaction(&self) -> Interaction {
        self.interaction
    }

    /// Install the raw-mode switch used around each edit.
    pub fn set_mode_switch(&mut self, mode: impl ModeSwitch + 'static) {
        self.mode = Box::new(mode);
    }

    // -- Callbacks ----------------------------------------------------------

    /// Complete the line on Tab.
    pub fn set_completion_callback(&mut self, f: impl FnMut(&str) -> Vec<String> + 'static) {
        self.completion = Some(Box::new(f));
    }

    /// Show a hint after the line.
    pub fn set_hints_callback(&mut self, f: impl FnMut(&str) -> Option<Hint> + 'static) {
        self.hints = Some(Box::new(f));
    }

    /// Receive each hint after it has been drawn.
    pub fn set_free_hints_callback(&mut self, f: impl FnMut(Hint) + 'static) {
        self.free_hints = Some(Box::new(f));
    }

    // -- Accessors ----------------------------------------------------------

    /// The history.
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// The history, for adding submitted lines and loading saved ones.
    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    /// The output stream.
    #[must_use]
    pub const fn output(&self) -> &W {
        &self.output
    }

    /// The alert stream.
    #[must_use]
    pub const fn error_output(&self) -> &E {
        &self.error
    }

    /// Take the streams back.
    pub fn into_parts(self) -> (R, W, E) {
        (self.input, self.output, self.error)
    }

    // -- Screen -------------------------------------------------------------

    /// Clear the screen and home the cursor.
    ///
    /// # Errors
    ///
    /// Returns the error from writing to the output stream.
    pub fn clear_screen(&mut self) -> Result<()> {
        ansi::clear_screen(&mut self.output)?;
        self.output.flush()?;
        Ok(())
    }

    /// Echo raw input bytes as `'c' hh (d)` until `quit` is typed or input
    /// ends. A diagnostic for finding out what a terminal sends.
    ///
    /// # Errors
    ///
    /// Returns read and write errors, and the error from enabling raw mode.
    pub fn print_key_codes(&mut self) -> Result<()> {
        self.output.write_all(
            b"Key codes debugging mode.\n\
              Press keys to see scan codes. Type 'quit' at any time to exit.\n",
        )?;
        self.output.flush()?;

        self.mode.enable_raw()?;
        let result = self.echo_key_codes();
        let restored = self.mode.disable_raw();
        result?;
        restored?;
        Ok(())
    }

    fn echo_key_codes(&mut self) -> Result<()> {
        let mut window = *b"    ";
        while let Some(byte) = read_byte(&mut self.input)? {
            window.rotate_left(1);
            window[3] = byte;
            if &window == b"quit" {
                break;
            }
            write!(self.output, "{} (type quit to exit)\n\r", describe(byte))?;
            self.output.flush()?;
        }
        Ok(())
    }

    // -- Reading ------------------------------------------------------------

    /// Read one line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the input stream fails, or when switching
    /// raw mode fails.
    pub fn read_line(&mut self) -> Result<ReadlineEvent> {
        let event = match self.interaction {
            Interaction::Edit => self.read_edited()?,
            Interaction::Plain => self.read_plain()?,
            Interaction::Pipe => self.read_piped()?,
        };
        let (kind, len) = match &event {
            ReadlineEvent::Line(line) => ("line", line.len()),
            ReadlineEvent::Eof => ("eof", 0),
            ReadlineEvent::Interrupted => ("interrupted", 0),
        };
        debug!(kind, len, interaction = ?self.interaction, "read_line finished");
        Ok(event)
    }

    fn read_edited(&mut self) -> Result<ReadlineEvent> {
        self.mode.enable_raw()?;
        if self.auto_columns {
            self.cols = terminal::columns(self.size_fd, &mut self.input, &mut self.output);
        }

        let result = self.edit();
        self.history.end_edit();
        let restored = self.mode.disable_raw();

        let event = result?;
        restored?;
        self.output.write_all(b"\r\n")?;
        self.output.flush()?;
        Ok(event)
    }

    fn read_plain(&mut self) -> Result<ReadlineEvent> {
        self.output.write_all(self.prompt.as_bytes())?;
        self.output.flush()?;

        let Some(mut line) = self.read_raw_line()? else {
            return Ok(ReadlineEvent::Eof);
        };
        while matches!(line.last(), Some(b'\r' | b'\n')) {
            line.pop();
        }
        line.truncate(self.buffer.max_len());
        Ok(ReadlineEvent::Line(String::from_utf8_lossy(&line).into_owned()))
    }

    fn read_piped(&mut self) -> Result<ReadlineEvent> {
        let Some(mut line) = self.read_raw_line()? else {
            return Ok(ReadlineEvent::Eof);
        };
        if line.last() == Some(&b'\n') {
            line.pop();
        }
        Ok(ReadlineEvent::Line(String::from_utf8_lossy(&line).into_owned()))
    }

    /// Read through the next `\n` (kept). `None` when input ended first
    /// with nothing read.
    fn read_raw_line(&mut self) -> Result<Option<Vec<u8>>> {
        let mut line = Vec::new();
        while let Some(byte) = read_byte(&mut self.input)? {
            line.try_reserve(1).map_err(|_| Error::AllocationExhausted)?;
            line.push(byte);
            if byte == b'\n' {
                break;
            }
        }
        Ok(if line.is_empty() { None } else { Some(line) })
    }

    // -- Edit loop ----------------------------------------------------------

    fn edit(&mut self) -> Result<ReadlineEvent> {
        self.buffer.clear();
        self.renderer.reset();
        self.history.begin_edit();

        self.output.write_all(self.prompt.as_bytes())?;
        self.output.flush()?;

        let mut pending = None;
        loop {
            let byte = match pending.take() {
                Some(byte) => byte,
                None => match read_byte(&mut self.input)? {
                    Some(byte) => byte,
                    None => return Ok(self.input_ended()),
                },
            };

            let key = decode(byte, &mut self.input)?;
            let ctx = KeyContext {
                line_empty: self.buffer.is_empty(),
                has_completion: self.completion.is_some(),
            };
            let Some(cmd) = command_for(key, ctx) else {
                continue;
            };

            match self.apply(cmd)? {
                Step::Continue => {}
                Step::Redispatch(byte) => pending = Some(byte),
                Step::Done(event) => return Ok(event),
            }
        }
    }

    /// Input closed while waiting for a key: hand back what was typed.
    fn input_ended(&mut self) -> ReadlineEvent {
        self.history.end_edit();
        if self.buffer.is_empty() {
            ReadlineEvent::Eof
        } else {
            ReadlineEvent::Line(self.buffer.to_str_lossy().into_owned())
        }
    }

    fn apply(&mut self, cmd: EditCommand) -> Result<Step> {
        use EditCommand as C;

        let changed = match cmd {
            C::InsertChar(byte) => return self.insert(byte).map(|()| Step::Continue),
            C::Submit => return Ok(Step::Done(self.submit())),
            C::Abort => {
                self.history.end_edit();
                return Ok(Step::Done(ReadlineEvent::Interrupted));
            }
            C::Eof => {
                self.history.end_edit();
                return Ok(Step::Done(ReadlineEvent::Eof));
            }
            C::Complete => return self.complete(),
            C::HistoryPrev => self.step_history(Direction::Prev)?,
            C::HistoryNext => self.step_history(Direction::Next)?,
            C::ClearScreen => {
                if let Err(err) = self.clear_screen() {
                    debug!(%err, "clear screen failed");
                }
                true
            }
            C::Backspace => self.buffer.backspace(),
            C::DeleteForward => self.buffer.delete(),
            C::MoveHome => self.buffer.move_home(),
            C::MoveEnd => self.buffer.move_end(),
            C::MoveLeft => self.buffer.move_left(),
            C::MoveRight => self.buffer.move_right(),
            C::TransposeChars => self.buffer.transpose(),
            C::KillToEnd => self.buffer.kill_to_end(),
            C::KillWholeLine => self.buffer.kill_line(),
            C::DeletePrevWord => self.buffer.delete_prev_word(),
        };
        if changed {
            self.refresh();
        }
        Ok(Step::Continue)
    }

    fn insert(&mut self, byte: u8) -> Result<()> {
        if !self.buffer.insert(byte)? {
            return Ok(());
        }

        // Appending with room to spare: the terminal echo is the repaint.
        let fits = self.prompt.len() + self.buffer.len() < self.cols;
        if self.buffer.at_end() && fits && !self.renderer.multiline() && self.hints.is_none() {
            if let Err(err) = self
                .output
                .write_all(&[byte])
                .and_then(|()| self.output.flush())
            {
                debug!(%err, "echo failed");
            }
        } else {
            self.refresh();
        }
        Ok(())
    }

    fn submit(&mut self) -> ReadlineEvent {
        self.history.end_edit();
        if self.renderer.multiline() && self.buffer.move_end() {
            self.refresh();
        }
        if self.hints.is_some() {
            // Leave the committed line on screen without its hint.
            self.repaint(None, false);
        }
        ReadlineEvent::Line(self.buffer.to_str_lossy().into_owned())
    }

    fn step_history(&mut self, direction: Direction) -> Result<bool> {
        let current = self.buffer.to_str_lossy().into_owned();
        match self.history.navigate(direction, &current) {
            Some(entry) => {
                self.buffer.replace(entry.as_bytes())?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // -- Completion ---------------------------------------------------------

    /// Cycle through completions until a non-Tab key arrives.
    fn complete(&mut self) -> Result<Step> {
        let line = self.buffer.to_str_lossy().into_owned();
        let candidates = self
            .completion
            .as_mut()
            .map(|f| f(line.as_str()))
            .unwrap_or_default();
        let Some(mut set) = Completions::new(candidates) else {
            self.beep();
            return Ok(Step::Continue);
        };

        loop {
            self.repaint(set.current(), true);

            let Some(byte) = read_byte(&mut self.input)? else {
                return Ok(Step::Done(self.input_ended()));
            };
            match byte {
                b'\t' => {
                    if set.advance() {
                        self.beep();
                    }
                }
                ESC => {
                    if set.current().is_some() {
                        self.refresh();
                    }
                    return Ok(Step::Redispatch(byte));
                }
                _ => {
                    if let Some(chosen) = set.into_selected() {
                        self.buffer.replace(chosen.as_bytes())?;
                    }
                    return Ok(Step::Redispatch(byte));
                }
            }
        }
    }

    // -- Output -------------------------------------------------------------

    /// Repaint the edit buffer with its hint.
    fn refresh(&mut self) {
        self.repaint(None, true);
    }

    /// Repaint `preview` (a completion candidate, cursor at its end) or the
    /// edit buffer.
    fn repaint(&mut self, preview: Option<&str>, with_hints: bool) {
        let (line, pos) = match preview {
            Some(candidate) => (candidate.as_bytes(), candidate.len()),
            None => (self.buffer.as_bytes(), self.buffer.pos()),
        };

        let fits = self.prompt.len() + line.len() < self.cols;
        let hint = match self.hints.as_mut() {
            Some(f) if with_hints && fits => f(String::from_utf8_lossy(line).as_ref()),
            _ => None,
        };

        let frame = Frame {
            prompt: self.prompt.as_bytes(),
            line,
            pos,
            cols: self.cols,
            hint: hint.as_ref(),
        };
        if let Err(err) = self.renderer.refresh(&mut self.output, &frame) {
            debug!(%err, "refresh failed");
        }

        if let (Some(hint), Some(free)) = (hint, self.free_hints.as_mut()) {
            free(hint);
        }
    }

    /// Ring the bell on the alert stream.
    fn beep(&mut self) {
        if let Err(err) = ansi::beep(&mut self.error).and_then(|()| self.error.flush()) {
            debug!(%err, "beep failed");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
