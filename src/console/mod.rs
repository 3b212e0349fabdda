//! Serial console engine.
//!
//! Polled from the main loop, no dedicated task.
//! Zero heap allocation - all fixed-size buffers.

pub mod commands;
pub mod completion;
pub mod console;
pub mod error;
pub mod history;
pub mod line_buffer;
pub mod parser;
pub mod serial;

pub use commands::{command_names, execute, Command, CommandHandler};
pub use completion::{complete, Completion, MAX_MATCHES};
pub use console::{Console, ConsoleStats, EscapeState};
pub use error::ConsoleError;
pub use history::{Direction, History, Recall, Recorded, HISTORY_SIZE};
pub use line_buffer::{LineBuffer, LINE_SIZE};
pub use parser::{parse_line, ParsedCommand, MAX_ARGS};
pub use serial::SerialConsole;
