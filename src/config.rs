//! Module: config
//!
//! Purpose: console sizing constants and the initialization contract.
//!
//! Sizes are compile-time (const generics with these defaults); the runtime
//! part is [`ConsoleConfig`], which names the command table and the two I/O
//! capabilities. A config missing either capability yields an inactive
//! console rather than an error.

use crate::console::Command;
use crate::logging::Logger;

pub use crate::console::{HISTORY_SIZE, LINE_SIZE, MAX_ARGS, MAX_MATCHES};

/// Prompt printed at the start of every input line.
pub const PROMPT: &str = "> ";

/// Version string (set by build.rs, includes git hash)
pub const VERSION: &str = env!("VERSION_STRING");

/// Default welcome text, printed once on activation.
pub const BANNER: &str = concat!(
    "========================================\r\n",
    "  ",
    env!("VERSION_STRING"),
    "\r\n",
    "========================================\r\n",
    "Type 'help' for commands\r\n",
    "Arrow keys: history | Tab: completion\r\n",
);

/// Everything needed to bring a console up.
pub struct ConsoleConfig<'a, I, O> {
    pub commands: &'a [Command<'a>],
    pub source: Option<I>,
    pub sink: Option<O>,
    pub prompt: &'a str,
    /// `None` skips the banner.
    pub banner: Option<&'a str>,
    pub logger: Option<Logger<'a>>,
}

impl<'a, I, O> ConsoleConfig<'a, I, O> {
    /// Config with no I/O attached yet.
    pub fn new(commands: &'a [Command<'a>]) -> Self {
        Self {
            commands,
            source: None,
            sink: None,
            prompt: PROMPT,
            banner: Some(BANNER),
            logger: None,
        }
    }

    pub fn source(mut self, source: I) -> Self {
        self.source = Some(source);
        self
    }

    pub fn sink(mut self, sink: O) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn prompt(mut self, prompt: &'a str) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn banner(mut self, banner: Option<&'a str>) -> Self {
        self.banner = banner;
        self
    }

    pub fn logger(mut self, logger: Logger<'a>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Both I/O capabilities present.
    pub fn is_complete(&self) -> bool {
        self.source.is_some() && self.sink.is_some()
    }
}
