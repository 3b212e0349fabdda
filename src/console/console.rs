//! Console engine: input state machine and line editor.
//!
//! Bytes arrive one at a time, in whatever chunks the transport delivers
//! them. Escape sequences may be split across polls; the state survives
//! between calls.

use core::fmt::Write;

use super::completion::{self, Completion};
use super::history::{Direction, Recall, Recorded};
use super::{
    command_names, execute, parse_line, Command, ConsoleError, History, LineBuffer,
    HISTORY_SIZE, LINE_SIZE,
};
use crate::config::PROMPT;
use crate::logging::Logger;
use crate::{console_debug, console_info, console_trace, console_warn};

/// Erase one column: back, blank, back.
const ERASE: &str = "\x08 \x08";

const ESC: u8 = 0x1B;
const CTRL_C: u8 = 0x03;
const CTRL_U: u8 = 0x15;

/// Escape sequence progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeState {
    Normal,
    /// Got ESC
    Escape,
    /// Got ESC [
    Bracket,
}

/// Counters for input the console chose not to act on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsoleStats {
    /// Bytes not added to the line: full buffer, control or non-ASCII bytes.
    pub dropped_bytes: u32,
    /// Escape sequences abandoned or not recognized.
    pub discarded_escapes: u32,
    pub unknown_commands: u32,
    /// Non-empty lines handed to the dispatcher.
    pub lines_submitted: u32,
    pub history_evictions: u32,
}

/// Console state machine
pub struct Console<'a, const N: usize = LINE_SIZE, const H: usize = HISTORY_SIZE> {
    commands: &'a [Command<'a>],
    prompt: &'a str,
    line: LineBuffer<N>,
    history: History<H, N>,
    escape_state: EscapeState,
    stats: ConsoleStats,
    logger: Option<Logger<'a>>,
}

impl<'a, const N: usize, const H: usize> Console<'a, N, H> {
    /// Create new console over an immutable command table.
    pub const fn new(commands: &'a [Command<'a>]) -> Self {
        Self {
            commands,
            prompt: PROMPT,
            line: LineBuffer::new(),
            history: History::new(),
            escape_state: EscapeState::Normal,
            stats: ConsoleStats {
                dropped_bytes: 0,
                discarded_escapes: 0,
                unknown_commands: 0,
                lines_submitted: 0,
                history_evictions: 0,
            },
            logger: None,
        }
    }

    pub fn with_prompt(mut self, prompt: &'a str) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn with_logger(mut self, logger: Logger<'a>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Process a single input byte
    ///
    /// Returns `Some(result)` when a non-empty line was dispatched, `None`
    /// otherwise.
    pub fn process_byte(&mut self, byte: u8, out: &mut dyn Write) -> Option<Result<(), ConsoleError>> {
        match self.escape_state {
            EscapeState::Normal => self.process_normal(byte, out),
            EscapeState::Escape => {
                if byte == b'[' {
                    self.escape_state = EscapeState::Bracket;
                } else {
                    self.escape_state = EscapeState::Normal;
                    self.stats.discarded_escapes += 1;
                    console_trace!(self.logger, "abandoned ESC before 0x{:02x}", byte);
                }
                None
            }
            EscapeState::Bracket => {
                self.escape_state = EscapeState::Normal;
                match byte {
                    b'A' => self.recall(Direction::Older, out), // Up arrow
                    b'B' => self.recall(Direction::Newer, out), // Down arrow
                    _ => {
                        self.stats.discarded_escapes += 1;
                        console_trace!(self.logger, "ignored ESC [ 0x{:02x}", byte);
                    }
                }
                None
            }
        }
    }

    fn process_normal(&mut self, byte: u8, out: &mut dyn Write) -> Option<Result<(), ConsoleError>> {
        match byte {
            // Enter
            b'\r' | b'\n' => self.submit(out),

            // Backspace
            0x7F | 0x08 => {
                if self.line.backspace() {
                    let _ = out.write_str(ERASE);
                }
                None
            }

            // Tab
            b'\t' => {
                self.complete(out);
                None
            }

            // Escape
            ESC => {
                self.escape_state = EscapeState::Escape;
                None
            }

            // Ctrl+C: abandon the line
            CTRL_C => {
                let _ = write!(out, "^C\r\n");
                self.line.clear();
                self.history.reset_browse();
                self.print_prompt(out);
                None
            }

            // Ctrl+U: clear the line
            CTRL_U => {
                self.erase_displayed(out);
                self.line.clear();
                None
            }

            // Printable character
            0x20..=0x7E => {
                if self.line.push(byte) {
                    let _ = out.write_char(byte as char);
                } else {
                    self.drop_byte(byte);
                }
                None
            }

            _ => {
                self.drop_byte(byte);
                None
            }
        }
    }

    fn drop_byte(&mut self, byte: u8) {
        self.stats.dropped_bytes += 1;
        console_debug!(self.logger, "dropped byte 0x{:02x} at len {}", byte, self.line.len());
    }

    /// Finish the line: record, dispatch, start a new prompt.
    fn submit(&mut self, out: &mut dyn Write) -> Option<Result<(), ConsoleError>> {
        let _ = write!(out, "\r\n");
        self.escape_state = EscapeState::Normal;

        let mut result = None;
        if !self.line.is_empty() {
            let line = self.line.as_str();

            if self.history.record(line) == Recorded::Evicted {
                self.stats.history_evictions += 1;
                console_debug!(self.logger, "history full, oldest entry evicted");
            }

            let cmd = parse_line(line);
            let outcome = execute(self.commands, &cmd, out);
            self.stats.lines_submitted += 1;

            match outcome {
                Ok(()) => {
                    console_info!(self.logger, "ran '{}' argc={}", cmd.command(), cmd.argc());
                }
                Err(ConsoleError::UnknownCommand) => {
                    self.stats.unknown_commands += 1;
                    console_warn!(self.logger, "unknown command '{}'", cmd.command());
                }
                Err(e) => {
                    let _ = write!(out, "Error {}\r\n", e);
                    console_warn!(self.logger, "'{}' failed: {}", cmd.command(), e);
                }
            }
            result = Some(outcome);
        }

        self.history.reset_browse();
        self.line.clear();
        self.print_prompt(out);
        result
    }

    fn recall(&mut self, direction: Direction, out: &mut dyn Write) {
        let shown = self.line.len();

        match self.history.recall(direction) {
            Recall::Unchanged => {}
            Recall::Entry(entry) => {
                for _ in 0..shown {
                    let _ = out.write_str(ERASE);
                }
                self.line.set(entry);
                let _ = out.write_str(self.line.as_str());
            }
            Recall::Fresh => {
                for _ in 0..shown {
                    let _ = out.write_str(ERASE);
                }
                self.line.clear();
            }
        }
    }

    fn complete(&mut self, out: &mut dyn Write) {
        let typed = self.line.len();

        match completion::complete(self.line.as_str(), command_names(self.commands)) {
            Completion::None | Completion::AlreadyComplete => {}

            Completion::Unique(name) => {
                for _ in 0..typed {
                    let _ = out.write_str(ERASE);
                }
                self.line.set(name);
                let _ = out.write_str(self.line.as_str());

                // The word is the whole line: leave room for an argument.
                if self.line.push(b' ') {
                    let _ = out.write_char(' ');
                }
            }

            Completion::Ambiguous { matches, common_len } => {
                let _ = write!(out, "\r\n");
                for (i, name) in matches.iter().enumerate() {
                    if i > 0 {
                        let _ = out.write_str("  ");
                    }
                    let _ = out.write_str(name);
                }
                let _ = write!(out, "\r\n");

                if common_len > typed {
                    self.line.set(&matches[0][..common_len]);
                }

                self.print_prompt(out);
                let _ = out.write_str(self.line.as_str());
            }
        }
    }

    /// Visually erase the current line, leaving the prompt.
    fn erase_displayed(&self, out: &mut dyn Write) {
        for _ in 0..self.line.len() {
            let _ = out.write_str(ERASE);
        }
    }

    /// Print the prompt
    pub fn print_prompt(&self, out: &mut dyn Write) {
        let _ = out.write_str(self.prompt);
    }

    /// Print welcome banner followed by the prompt.
    pub fn print_banner(&self, banner: &str, out: &mut dyn Write) {
        let _ = write!(out, "\r\n{}", banner);
        self.print_prompt(out);
    }

    /// Current line contents.
    pub fn line(&self) -> &str {
        self.line.as_str()
    }

    pub fn history(&self) -> &History<H, N> {
        &self.history
    }

    pub fn escape_state(&self) -> EscapeState {
        self.escape_state
    }

    pub fn stats(&self) -> ConsoleStats {
        self.stats
    }

    pub fn commands(&self) -> &'a [Command<'a>] {
        self.commands
    }
}
