//! # RustSerialCli
//!
//! Interactive line console for bare-metal main loops.
//!
//! ## Architecture
//!
//! ```text
//! ByteSource ──▶ Console (escape FSM, line editor) ──▶ dispatcher ──▶ handler
//!                   │        │            │                              │
//!                   │     History     completion                         │
//!                   └──────────────── ByteSink ◀─────────────────────────┘
//! ```
//!
//! - Non-blocking: [`SerialConsole::poll`] drains available bytes and returns
//! - No heap, no globals: the caller owns every console instance
//! - Overflow and unknown input are dropped, counted and optionally logged

#![cfg_attr(not(test), no_std)]

pub mod app;
pub mod config;
pub mod console;
pub mod log_drain;
pub mod logging;
pub mod transport;

pub use config::ConsoleConfig;
pub use console::{Command, CommandHandler, Console, ConsoleError, ConsoleStats, SerialConsole};
pub use logging::{LogLevel, LogStream, Logger};
pub use transport::{ByteSink, ByteSource, FnSink, FnSource};
