//! Demonstration command set: a typed variable registry and the commands
//! that inspect and change it.

pub mod commands;
pub mod vars;

pub use commands::{AppCommands, APP_COMMAND_COUNT};
pub use vars::{Value, Var, VarKind, Vars, VAR_COUNT};
