//! Command table and dispatcher

use core::fmt::Write;

use super::parser::ParsedCommand;
use super::ConsoleError;

/// Something a command name can be bound to.
///
/// `argv[0]` is the command name itself. Output goes to `out`; argument
/// checking is the handler's job.
pub trait CommandHandler {
    fn invoke(&self, argv: &[&str], out: &mut dyn Write) -> Result<(), ConsoleError>;
}

impl<F> CommandHandler for F
where
    F: Fn(&[&str], &mut dyn Write) -> Result<(), ConsoleError>,
{
    fn invoke(&self, argv: &[&str], out: &mut dyn Write) -> Result<(), ConsoleError> {
        self(argv, out)
    }
}

/// Command descriptor
#[derive(Clone, Copy)]
pub struct Command<'a> {
    pub name: &'a str,
    pub brief: &'a str,
    pub handler: &'a dyn CommandHandler,
}

impl<'a> Command<'a> {
    pub const fn new(name: &'a str, brief: &'a str, handler: &'a dyn CommandHandler) -> Self {
        Self { name, brief, handler }
    }
}

impl core::fmt::Debug for Command<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("brief", &self.brief)
            .finish_non_exhaustive()
    }
}

/// First command named exactly `name`, in table order.
pub fn find<'t, 'a>(commands: &'t [Command<'a>], name: &str) -> Option<&'t Command<'a>> {
    commands.iter().find(|c| c.name == name)
}

/// Execute a parsed command
///
/// A blank line does nothing. An unknown name is reported on `out` and
/// returned as [`ConsoleError::UnknownCommand`].
pub fn execute(
    commands: &[Command<'_>],
    cmd: &ParsedCommand<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    if cmd.is_empty() {
        return Ok(()); // Empty line, do nothing
    }

    let Some(command) = find(commands, cmd.command()) else {
        let _ = write!(out, "Unknown command: {}\r\n", cmd.command());
        let _ = write!(out, "Type 'help' for available commands.\r\n");
        return Err(ConsoleError::UnknownCommand);
    };

    command.handler.invoke(&cmd.argv, out)
}

/// Get all command names for completion
pub fn command_names<'t, 'a>(commands: &'t [Command<'a>]) -> impl Iterator<Item = &'a str> + Clone + 't {
    commands.iter().map(|c| c.name)
}
