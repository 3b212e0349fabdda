//! Application command handlers
//!
//! help, info, list/vars, get, set, status, reset over a [`Vars`] table.

use core::fmt::Write;

use super::vars::{Value, Var, Vars};
use crate::config::VERSION;
use crate::console::{Command, CommandHandler, ConsoleError};

/// Number of entries in [`AppCommands::table`].
pub const APP_COMMAND_COUNT: usize = 8;

/// Handler instances for the application command set.
pub struct AppCommands<'v> {
    help: Help,
    info: Info<'v>,
    list: List<'v>,
    get: Get<'v>,
    set: Set<'v>,
    status: Status<'v>,
    reset: Reset<'v>,
}

impl<'v> AppCommands<'v> {
    pub fn new(vars: &'v Vars) -> Self {
        Self {
            help: Help,
            info: Info(vars),
            list: List(vars),
            get: Get(vars),
            set: Set(vars),
            status: Status(vars),
            reset: Reset(vars),
        }
    }

    /// Command table, in completion order.
    pub fn table(&self) -> [Command<'_>; APP_COMMAND_COUNT] {
        [
            Command::new("help", "Show this help message", &self.help),
            Command::new("info", "Show firmware information", &self.info),
            Command::new("list", "List all variables with descriptions", &self.list),
            Command::new("vars", "Alias for list", &self.list),
            Command::new("get", "Get variable value", &self.get),
            Command::new("set", "Set variable value", &self.set),
            Command::new("status", "Show system status summary", &self.status),
            Command::new("reset", "Reset all variables to defaults", &self.reset),
        ]
    }
}

/// Value formatted then left-aligned to `width` (Display impls ignore width).
fn write_padded(out: &mut dyn Write, value: Value, width: usize) {
    let mut text: heapless::String<32> = heapless::String::new();
    let _ = write!(text, "{}", value);
    let _ = write!(out, "{:<width$}", text.as_str(), width = width);
}

fn write_assignment(out: &mut dyn Write, var: &Var) {
    let _ = write!(out, "{} = ", var.name);
    write_padded(out, var.get(), 12);
    let _ = write!(out, "\r\n");
}

fn on_off(out: &mut dyn Write, label: &str, state: bool, on: &str, off: &str) {
    let _ = write!(out, "{:<14}{}\r\n", label, if state { on } else { off });
}

struct Help;

impl CommandHandler for Help {
    fn invoke(&self, _argv: &[&str], out: &mut dyn Write) -> Result<(), ConsoleError> {
        let _ = write!(
            out,
            "=== CLI Help ===\r\n\
             Commands:\r\n\
             \x20 help              - Show this help message\r\n\
             \x20 list / vars       - List all variables with descriptions\r\n\
             \x20 get <var>         - Get variable value\r\n\
             \x20 set <var> <val>   - Set variable value\r\n\
             \x20 status            - Show system status summary\r\n\
             \x20 reset             - Reset all variables to defaults\r\n\
             \x20 info              - Show firmware information\r\n\
             \r\nNavigation:\r\n\
             \x20 Up/Down arrows    - Navigate command history\r\n\
             \x20 Tab               - Auto-complete commands\r\n\
             \x20 Backspace         - Delete character\r\n\
             \x20 Ctrl+C / Ctrl+U   - Cancel / clear the line\r\n\
             \r\nExamples:\r\n\
             \x20 > list            - Show all variables\r\n\
             \x20 > get debug       - Get debug variable\r\n\
             \x20 > set debug true  - Enable debug mode\r\n\
             \x20 > set rate 200    - Set sample rate to 200 Hz\r\n\
             \x20 > status          - Show system status\r\n"
        );
        Ok(())
    }
}

struct Info<'v>(&'v Vars);

impl CommandHandler for Info<'_> {
    fn invoke(&self, _argv: &[&str], out: &mut dyn Write) -> Result<(), ConsoleError> {
        let _ = write!(out, "=== System Information ===\r\n");
        let _ = write!(out, "Firmware:     Serial CLI Debug System\r\n");
        let _ = write!(out, "Version:      {}\r\n", VERSION);
        let _ = write!(out, "Variables:    {}\r\n", self.0.len());
        let _ = write!(out, "Commands:     help, list, get, set, status, reset, info\r\n");
        Ok(())
    }
}

struct List<'v>(&'v Vars);

impl CommandHandler for List<'_> {
    fn invoke(&self, _argv: &[&str], out: &mut dyn Write) -> Result<(), ConsoleError> {
        let _ = write!(out, "Variable Name    Type    Value       Description\r\n");
        let _ = write!(out, "==============================================================\r\n");

        for var in self.0.iter() {
            let _ = write!(out, "{:<17}{:<8}", var.name, var.kind().as_str());
            write_padded(out, var.get(), 12);
            let _ = write!(out, "{}\r\n", var.description);
        }
        Ok(())
    }
}

struct Get<'v>(&'v Vars);

impl CommandHandler for Get<'_> {
    fn invoke(&self, argv: &[&str], out: &mut dyn Write) -> Result<(), ConsoleError> {
        let [_, name, ..] = argv else {
            return Err(ConsoleError::Usage("get <var>"));
        };

        write_assignment(out, self.0.lookup(name)?);
        Ok(())
    }
}

struct Set<'v>(&'v Vars);

impl CommandHandler for Set<'_> {
    fn invoke(&self, argv: &[&str], out: &mut dyn Write) -> Result<(), ConsoleError> {
        let [_, name, value, ..] = argv else {
            return Err(ConsoleError::Usage("set <var> <value>"));
        };

        let var = self.0.lookup(name)?;
        var.set_from_str(value)?;
        write_assignment(out, var);
        Ok(())
    }
}

struct Status<'v>(&'v Vars);

impl CommandHandler for Status<'_> {
    fn invoke(&self, _argv: &[&str], out: &mut dyn Write) -> Result<(), ConsoleError> {
        let vars = self.0;

        let _ = write!(out, "=== System Status ===\r\n");
        on_off(out, "Debug Mode:", vars.flag("debug"), "ENABLED", "DISABLED");
        on_off(out, "Verbose Mode:", vars.flag("verbose"), "ENABLED", "DISABLED");
        on_off(out, "Test Mode:", vars.flag("test"), "ENABLED", "DISABLED");
        on_off(out, "LED State:", vars.flag("led"), "ON", "OFF");
        on_off(out, "Logging:", vars.flag("log"), "ACTIVE", "STOPPED");

        let _ = write!(out, "\r\n{:<14}{} Hz\r\n", "Sample Rate:", vars.int("rate").unwrap_or(0));
        let _ = write!(out, "{:<14}{}\r\n", "Log Level:", vars.int("loglevel").unwrap_or(0));
        let _ = write!(out, "{:<14}{:.1} C\r\n", "Temperature:", vars.float("temp").unwrap_or(0.0));
        let _ = write!(out, "{:<14}{:.2} V\r\n", "Voltage:", vars.float("vdd").unwrap_or(0.0));
        Ok(())
    }
}

struct Reset<'v>(&'v Vars);

impl CommandHandler for Reset<'_> {
    fn invoke(&self, _argv: &[&str], out: &mut dyn Write) -> Result<(), ConsoleError> {
        self.0.reset_all();
        let _ = write!(out, "All variables reset to defaults\r\n");
        Ok(())
    }
}
