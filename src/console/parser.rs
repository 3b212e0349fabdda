//! Command line tokenizer
//!
//! Splits on single spaces (runs collapse, no quoting), keeping at most
//! [`MAX_ARGS`] tokens. Token 0 is the command name.

use heapless::Vec;

/// Maximum tokens per line, command name included.
pub const MAX_ARGS: usize = 8;

/// Tokenized command line.
#[derive(Debug, Clone, Default)]
pub struct ParsedCommand<'a> {
    /// argv[0] is the command name.
    pub argv: Vec<&'a str, MAX_ARGS>,
}

impl<'a> ParsedCommand<'a> {
    /// Create empty command
    pub const fn empty() -> Self {
        Self { argv: Vec::new() }
    }

    /// The command name, `""` for a blank line.
    pub fn command(&self) -> &'a str {
        self.argv.first().copied().unwrap_or("")
    }

    /// Argument by index, 0 being the first token after the command name.
    pub fn arg(&self, idx: usize) -> Option<&'a str> {
        self.argv.get(idx + 1).copied()
    }

    /// Token count, command name included.
    pub fn argc(&self) -> usize {
        self.argv.len()
    }

    pub fn is_empty(&self) -> bool {
        self.argv.is_empty()
    }
}

/// Parse a command line into tokens. Tokens past [`MAX_ARGS`] are dropped.
pub fn parse_line(line: &str) -> ParsedCommand<'_> {
    let mut argv = Vec::new();

    for token in line.split(' ').filter(|t| !t.is_empty()) {
        if argv.push(token).is_err() {
            break;
        }
    }

    ParsedCommand { argv }
}
