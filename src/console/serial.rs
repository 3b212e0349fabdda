//! Console bound to its transport.
//!
//! Call [`SerialConsole::poll`] every pass of the main loop. It drains what
//! the source has right now and returns as soon as the source reports
//! nothing, so it never holds up the rest of the loop.

use super::{Console, ConsoleError, ConsoleStats, HISTORY_SIZE, LINE_SIZE};
use crate::config::ConsoleConfig;
use crate::console_error;
use crate::transport::{ByteSink, ByteSource, SinkWriter};

struct Port<I, O> {
    source: I,
    sink: O,
}

/// A [`Console`] plus the byte source and sink it was initialized with.
pub struct SerialConsole<'a, I, O, const N: usize = LINE_SIZE, const H: usize = HISTORY_SIZE> {
    console: Console<'a, N, H>,
    /// `None` when initialization was refused.
    port: Option<Port<I, O>>,
}

impl<'a, I, O, const N: usize, const H: usize> SerialConsole<'a, I, O, N, H>
where
    I: ByteSource,
    O: ByteSink,
{
    /// Bring the console up and print the banner and prompt.
    ///
    /// Without both a source and a sink the console stays inactive: every
    /// later call is a no-op.
    pub fn init(config: ConsoleConfig<'a, I, O>) -> Self {
        let mut console = Console::new(config.commands).with_prompt(config.prompt);
        if let Some(logger) = config.logger {
            console = console.with_logger(logger);
        }

        let port = match (config.source, config.sink) {
            (Some(source), Some(sink)) => Some(Port { source, sink }),
            _ => {
                console_error!(config.logger, "console inactive: {}", ConsoleError::NotConfigured);
                None
            }
        };

        let mut this = Self { console, port };
        if let Some(port) = this.port.as_mut() {
            let out = &mut SinkWriter(&mut port.sink);
            match config.banner {
                Some(banner) => this.console.print_banner(banner, out),
                None => this.console.print_prompt(out),
            }
        }
        this
    }

    pub fn is_active(&self) -> bool {
        self.port.is_some()
    }

    /// Process every byte currently available, then return.
    pub fn poll(&mut self) {
        let Some(port) = self.port.as_mut() else {
            return;
        };

        while let Some(byte) = port.source.read_byte() {
            self.console.process_byte(byte, &mut SinkWriter(&mut port.sink));
        }
    }

    /// Process one byte as if it had come from the source.
    pub fn feed(&mut self, byte: u8) -> Option<Result<(), ConsoleError>> {
        let port = self.port.as_mut()?;
        self.console.process_byte(byte, &mut SinkWriter(&mut port.sink))
    }

    pub fn console(&self) -> &Console<'a, N, H> {
        &self.console
    }

    pub fn stats(&self) -> ConsoleStats {
        self.console.stats()
    }

    pub fn source_mut(&mut self) -> Option<&mut I> {
        self.port.as_mut().map(|p| &mut p.source)
    }

    pub fn sink(&self) -> Option<&O> {
        self.port.as_ref().map(|p| &p.sink)
    }

    pub fn sink_mut(&mut self) -> Option<&mut O> {
        self.port.as_mut().map(|p| &mut p.sink)
    }
}
