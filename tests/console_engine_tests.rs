//! Console state machine tests: editing, escapes, history recall, completion
//! and dispatch driven one byte at a time.

use core::fmt::Write;
use std::collections::VecDeque;

use rust_serial_cli::console::{Command, Console, ConsoleError, EscapeState};
use rust_serial_cli::{ByteSink, ByteSource, ConsoleConfig, LogLevel, LogStream, Logger, SerialConsole};

const ERASE: &str = "\x08 \x08";

fn echo(argv: &[&str], out: &mut dyn Write) -> Result<(), ConsoleError> {
    let _ = write!(out, "argc={}", argv.len());
    for arg in argv {
        let _ = write!(out, " [{}]", arg);
    }
    let _ = write!(out, "\r\n");
    Ok(())
}

fn fail(_argv: &[&str], _out: &mut dyn Write) -> Result<(), ConsoleError> {
    Err(ConsoleError::InvalidValue)
}

fn quiet(_argv: &[&str], _out: &mut dyn Write) -> Result<(), ConsoleError> {
    Ok(())
}

/// Feed `bytes`, returning the last dispatch result.
fn feed(console: &mut Console<'_>, out: &mut String, bytes: &[u8]) -> Option<Result<(), ConsoleError>> {
    let mut last = None;
    for &b in bytes {
        if let Some(result) = console.process_byte(b, out) {
            last = Some(result);
        }
    }
    last
}

#[test]
fn test_printable_bytes_echo() {
    let table = [Command::new("help", "", &quiet)];
    let mut console: Console = Console::new(&table);
    let mut out = String::new();

    assert_eq!(feed(&mut console, &mut out, b"get"), None);
    assert_eq!(console.line(), "get");
    assert_eq!(out, "get");
}

#[test]
fn test_backspace_and_delete() {
    let table = [Command::new("help", "", &quiet)];
    let mut console: Console = Console::new(&table);
    let mut out = String::new();

    feed(&mut console, &mut out, b"helx\x7f");
    assert_eq!(console.line(), "hel");
    feed(&mut console, &mut out, b"\x08");
    assert_eq!(console.line(), "he");
    assert_eq!(out, format!("helx{}{}", ERASE, ERASE));

    // Backspace on an empty line emits nothing
    let mut console: Console = Console::new(&table);
    let mut out = String::new();
    feed(&mut console, &mut out, b"\x7f");
    assert!(out.is_empty());
}

#[test]
fn test_empty_line_skips_dispatch_and_history() {
    let table = [Command::new("echo", "", &echo)];
    let mut console: Console = Console::new(&table);
    let mut out = String::new();

    assert_eq!(feed(&mut console, &mut out, b"\r"), None);
    assert_eq!(feed(&mut console, &mut out, b"\n"), None);
    assert_eq!(out, "\r\n> \r\n> ");
    assert!(console.history().is_empty());
    assert_eq!(console.stats().lines_submitted, 0);
}

#[test]
fn test_dispatch_argc_argv() {
    let table = [Command::new("echo", "", &echo)];
    let mut console: Console = Console::new(&table);
    let mut out = String::new();

    let result = feed(&mut console, &mut out, b"echo alpha  beta\r");
    assert_eq!(result, Some(Ok(())));
    assert!(out.contains("argc=3 [echo] [alpha] [beta]\r\n> "));
    assert_eq!(console.line(), "");
    assert_eq!(console.stats().lines_submitted, 1);
}

#[test]
fn test_dispatch_argv_capped() {
    let table = [Command::new("echo", "", &echo)];
    let mut console: Console = Console::new(&table);
    let mut out = String::new();

    feed(&mut console, &mut out, b"echo a b c d e f g h i\r");
    assert!(out.contains("argc=8 [echo] [a] [b] [c] [d] [e] [f] [g]\r\n"));
}

#[test]
fn test_unknown_command_is_reported() {
    let table = [Command::new("echo", "", &echo)];
    let mut console: Console = Console::new(&table);
    let mut out = String::new();

    let result = feed(&mut console, &mut out, b"bogus 1\r");
    assert_eq!(result, Some(Err(ConsoleError::UnknownCommand)));
    assert!(out.contains("Unknown command: bogus"));
    assert!(out.ends_with("> "));
    assert_eq!(console.stats().unknown_commands, 1);

    // Still recorded, and the console keeps working
    assert_eq!(console.history().newest(), Some("bogus 1"));
    assert_eq!(feed(&mut console, &mut out, b"echo\r"), Some(Ok(())));
}

#[test]
fn test_handler_error_is_printed() {
    let table = [Command::new("fail", "", &fail)];
    let mut console: Console = Console::new(&table);
    let mut out = String::new();

    let result = feed(&mut console, &mut out, b"fail\r");
    assert_eq!(result, Some(Err(ConsoleError::InvalidValue)));
    assert!(out.contains("Error E02: invalid value\r\n> "));
}

#[test]
fn test_spaces_only_line() {
    let table = [Command::new("echo", "", &echo)];
    let mut console: Console = Console::new(&table);
    let mut out = String::new();

    assert_eq!(feed(&mut console, &mut out, b"   \r"), Some(Ok(())));
    assert!(!out.contains("argc"));
}

#[test]
fn test_overflow_drops_and_counts() {
    let table = [Command::new("echo", "", &echo)];
    let mut console: Console = Console::new(&table);
    let mut out = String::new();

    feed(&mut console, &mut out, &[b'a'; 130]);
    assert_eq!(console.line().len(), 127);
    assert_eq!(out.len(), 127); // dropped bytes are not echoed
    assert_eq!(console.stats().dropped_bytes, 3);

    // Control and non-ASCII bytes never reach the line
    feed(&mut console, &mut out, b"\x7f\x01\x80\xff");
    assert_eq!(console.line().len(), 126);
    assert_eq!(console.stats().dropped_bytes, 6);
}

#[test]
fn test_recall_just_submitted() {
    let table = [Command::new("status", "", &quiet)];
    let mut console: Console = Console::new(&table);
    let mut out = String::new();

    feed(&mut console, &mut out, b"status\r");
    out.clear();

    feed(&mut console, &mut out, b"\x1b[A");
    assert_eq!(console.line(), "status");
    assert_eq!(out, "status");
}

#[test]
fn test_recall_erases_typed_text() {
    let table = [Command::new("status", "", &quiet)];
    let mut console: Console = Console::new(&table);
    let mut out = String::new();

    feed(&mut console, &mut out, b"status\rxy");
    out.clear();

    feed(&mut console, &mut out, b"\x1b[A");
    assert_eq!(out, format!("{}{}status", ERASE, ERASE));

    // Down past the newest entry: back to an empty line
    out.clear();
    feed(&mut console, &mut out, b"\x1b[B");
    assert_eq!(console.line(), "");
    assert_eq!(out, ERASE.repeat(6));
}

#[test]
fn test_recall_walks_history() {
    let table = [Command::new("echo", "", &echo)];
    let mut console: Console = Console::new(&table);
    let mut out = String::new();

    feed(&mut console, &mut out, b"echo 1\recho 2\recho 3\r");

    feed(&mut console, &mut out, b"\x1b[A\x1b[A");
    assert_eq!(console.line(), "echo 2");
    feed(&mut console, &mut out, b"\x1b[A\x1b[A\x1b[A");
    assert_eq!(console.line(), "echo 1");
    feed(&mut console, &mut out, b"\x1b[B");
    assert_eq!(console.line(), "echo 2");

    // Submitting a recalled line ends browsing
    feed(&mut console, &mut out, b"\r");
    assert_eq!(console.history().browse_position(), None);
    feed(&mut console, &mut out, b"\x1b[A");
    assert_eq!(console.line(), "echo 2");
}

#[test]
fn test_duplicate_submission_not_recorded() {
    let table = [Command::new("echo", "", &echo)];
    let mut console: Console = Console::new(&table);
    let mut out = String::new();

    feed(&mut console, &mut out, b"echo\recho\recho\r");
    assert_eq!(console.history().len(), 1);
    assert_eq!(console.stats().lines_submitted, 3);
}

#[test]
fn test_history_evicts_oldest() {
    let table = [Command::new("echo", "", &echo)];
    let mut console: Console = Console::new(&table);
    let mut out = String::new();

    for i in 0..15 {
        feed(&mut console, &mut out, format!("echo {}\r", i).as_bytes());
    }

    assert_eq!(console.history().len(), 10);
    assert_eq!(console.history().entry(0), Some("echo 5"));
    assert_eq!(console.stats().history_evictions, 5);

    // Recall more times than there are entries: stops at the oldest
    for _ in 0..15 {
        feed(&mut console, &mut out, b"\x1b[A");
    }
    assert_eq!(console.line(), "echo 5");

    // Down as many times: back to a fresh line once, then nothing happens
    for _ in 0..10 {
        feed(&mut console, &mut out, b"\x1b[B");
    }
    assert_eq!(console.line(), "");
    assert_eq!(console.history().browse_position(), None);

    out.clear();
    for _ in 0..5 {
        feed(&mut console, &mut out, b"\x1b[B");
    }
    assert_eq!(console.line(), "");
    assert!(out.is_empty());
}

#[test]
fn test_escape_split_across_calls() {
    let table = [Command::new("status", "", &quiet)];
    let mut console: Console = Console::new(&table);
    let mut out = String::new();

    feed(&mut console, &mut out, b"status\r");

    feed(&mut console, &mut out, b"\x1b");
    assert_eq!(console.escape_state(), EscapeState::Escape);
    feed(&mut console, &mut out, b"[");
    assert_eq!(console.escape_state(), EscapeState::Bracket);
    feed(&mut console, &mut out, b"A");
    assert_eq!(console.escape_state(), EscapeState::Normal);
    assert_eq!(console.line(), "status");
}

#[test]
fn test_malformed_escapes_are_swallowed() {
    let table = [Command::new("echo", "", &echo)];
    let mut console: Console = Console::new(&table);
    let mut out = String::new();

    feed(&mut console, &mut out, b"ab");
    out.clear();

    // ESC + non-bracket, ESC [ + unsupported final byte
    feed(&mut console, &mut out, b"\x1bx\x1b[C\x1b[D\x1bOA");
    assert_eq!(console.line(), "abA");
    assert_eq!(out, "A");
    assert_eq!(console.escape_state(), EscapeState::Normal);
    assert_eq!(console.stats().discarded_escapes, 4);
}

#[test]
fn test_enter_inside_escape_is_swallowed() {
    let table = [Command::new("echo", "", &echo)];
    let mut console: Console = Console::new(&table);
    let mut out = String::new();

    assert_eq!(feed(&mut console, &mut out, b"echo\x1b\r"), None);
    assert_eq!(console.line(), "echo");
    assert_eq!(feed(&mut console, &mut out, b"\r"), Some(Ok(())));
}

#[test]
fn test_tab_ambiguous_lists_candidates() {
    let table = [Command::new("help", "", &quiet), Command::new("history", "", &quiet)];
    let mut console: Console = Console::new(&table);
    let mut out = String::new();

    feed(&mut console, &mut out, b"h");
    out.clear();
    feed(&mut console, &mut out, b"\t");

    // Common prefix equals the typed word: buffer unchanged, list shown
    assert_eq!(console.line(), "h");
    assert_eq!(out, "\r\nhelp  history\r\n> h");
}

#[test]
fn test_tab_ambiguous_extends_common_prefix() {
    let table = [
        Command::new("status", "", &quiet),
        Command::new("stats", "", &quiet),
        Command::new("set", "", &quiet),
    ];
    let mut console: Console = Console::new(&table);
    let mut out = String::new();

    feed(&mut console, &mut out, b"st");
    out.clear();
    feed(&mut console, &mut out, b"\t");

    assert_eq!(console.line(), "stat");
    assert_eq!(out, "\r\nstatus  stats\r\n> stat");
}

#[test]
fn test_tab_common_prefix_inside_multibyte_char() {
    let table = [Command::new("aé", "", &quiet), Command::new("aè", "", &quiet)];
    let mut console: Console = Console::new(&table);
    let mut out = String::new();

    feed(&mut console, &mut out, b"a");
    out.clear();
    feed(&mut console, &mut out, b"\t");

    // The shared byte is only half of a character: the line stays "a"
    assert_eq!(console.line(), "a");
    assert_eq!(out, "\r\naé  aè\r\n> a");
}

#[test]
fn test_tab_extends_to_multibyte_common_prefix() {
    let table = [Command::new("aéx", "", &quiet), Command::new("aéy", "", &quiet)];
    let mut console: Console = Console::new(&table);
    let mut out = String::new();

    feed(&mut console, &mut out, b"a\t");
    assert_eq!(console.line(), "aé");
}

#[test]
fn test_tab_unique_appends_space() {
    let table = [Command::new("help", "", &quiet), Command::new("history", "", &quiet)];
    let mut console: Console = Console::new(&table);
    let mut out = String::new();

    feed(&mut console, &mut out, b"hel");
    out.clear();
    feed(&mut console, &mut out, b"\t");

    assert_eq!(console.line(), "help ");
    assert_eq!(out, format!("{}help ", ERASE.repeat(3)));

    // Same for a two-letter prefix that only one name shares
    let mut console: Console = Console::new(&table);
    feed(&mut console, &mut out, b"he\t");
    assert_eq!(console.line(), "help ");
}

#[test]
fn test_tab_is_idempotent() {
    let table = [Command::new("help", "", &quiet), Command::new("history", "", &quiet)];
    let mut console: Console = Console::new(&table);
    let mut out = String::new();

    feed(&mut console, &mut out, b"hel\t");
    let once = console.line().to_string();
    out.clear();
    feed(&mut console, &mut out, b"\t");

    assert_eq!(console.line(), once);
    assert!(out.is_empty());

    // A word that already equals the only match is left alone
    let mut console: Console = Console::new(&table);
    feed(&mut console, &mut out, b"help");
    out.clear();
    feed(&mut console, &mut out, b"\t");
    assert_eq!(console.line(), "help");
    assert!(out.is_empty());
}

#[test]
fn test_tab_without_match_is_silent() {
    let table = [Command::new("help", "", &quiet)];
    let mut console: Console = Console::new(&table);
    let mut out = String::new();

    feed(&mut console, &mut out, b"xyz");
    out.clear();
    feed(&mut console, &mut out, b"\t");
    assert_eq!(console.line(), "xyz");
    assert!(out.is_empty());

    // Empty line and argument position are not completed either
    let mut console: Console = Console::new(&table);
    feed(&mut console, &mut out, b"\t");
    feed(&mut console, &mut out, b"help he\t");
    assert_eq!(console.line(), "help he");
    assert_eq!(out, "help he");
}

#[test]
fn test_ctrl_c_and_ctrl_u() {
    let table = [Command::new("echo", "", &echo)];
    let mut console: Console = Console::new(&table);
    let mut out = String::new();

    feed(&mut console, &mut out, b"echo 1\x03");
    assert_eq!(console.line(), "");
    assert!(out.ends_with("^C\r\n> "));
    assert!(console.history().is_empty());

    out.clear();
    feed(&mut console, &mut out, b"abc\x15");
    assert_eq!(console.line(), "");
    assert_eq!(out, format!("abc{}", ERASE.repeat(3)));
}

#[test]
fn test_custom_prompt() {
    let table = [Command::new("echo", "", &echo)];
    let mut console: Console = Console::new(&table).with_prompt("cli$ ");
    let mut out = String::new();

    feed(&mut console, &mut out, b"\r");
    assert_eq!(out, "\r\ncli$ ");
}

#[test]
fn test_small_console_sizes() {
    let table = [Command::new("echo", "", &echo)];
    let mut console: Console<'_, 8, 2> = Console::new(&table);
    let mut out = String::new();

    for b in b"echo 1234567\r" {
        console.process_byte(*b, &mut out);
    }
    // Only 7 characters fit: "echo 12"
    assert!(out.contains("argc=2 [echo] [12]"));
    assert_eq!(console.stats().dropped_bytes, 5);
}

#[test]
fn test_logger_records_events() {
    let stream: LogStream = LogStream::new();
    fn clock() -> i64 {
        7
    }

    let table = [Command::new("echo", "", &echo)];
    let mut console: Console = Console::new(&table).with_logger(Logger::new(&stream, clock));
    let mut out = String::new();

    feed(&mut console, &mut out, b"nope\r");

    let mut found = false;
    while let Some(entry) = stream.drain() {
        if entry.level == LogLevel::Warn && entry.text().contains("unknown command 'nope'") {
            assert_eq!(entry.timestamp_us, 7);
            found = true;
        }
    }
    assert!(found);
}

// Transport-level tests

#[derive(Default)]
struct Capture(Vec<u8>);

impl Capture {
    fn text(&self) -> &str {
        core::str::from_utf8(&self.0).unwrap()
    }
}

impl ByteSink for Capture {
    fn write_byte(&mut self, byte: u8) {
        self.0.push(byte);
    }
}

#[derive(Default)]
struct Queue(VecDeque<u8>);

impl ByteSource for Queue {
    fn read_byte(&mut self) -> Option<u8> {
        self.0.pop_front()
    }
}

#[test]
fn test_serial_console_prints_banner() {
    let table = [Command::new("echo", "", &echo)];
    let console: SerialConsole<'_, Queue, Capture> =
        SerialConsole::init(ConsoleConfig::new(&table).source(Queue::default()).sink(Capture::default()));

    assert!(console.is_active());
    let text = console.sink().unwrap().text();
    assert!(text.starts_with("\r\n===="));
    assert!(text.contains("Type 'help' for commands"));
    assert!(text.ends_with("> "));
}

#[test]
fn test_serial_console_poll_drains_source() {
    let table = [Command::new("echo", "", &echo)];
    let mut console: SerialConsole<'_, Queue, Capture> = SerialConsole::init(
        ConsoleConfig::new(&table)
            .source(Queue::default())
            .sink(Capture::default())
            .banner(None),
    );
    assert_eq!(console.sink().unwrap().text(), "> ");

    // Nothing available: returns immediately
    console.poll();
    assert_eq!(console.sink().unwrap().text(), "> ");

    // A line split across two polls
    console.source_mut().unwrap().0.extend(b"echo h");
    console.poll();
    assert_eq!(console.console().line(), "echo h");

    console.source_mut().unwrap().0.extend(b"i\r\x1b[");
    console.poll();
    assert!(console.sink().unwrap().text().contains("argc=2 [echo] [hi]\r\n> "));
    assert_eq!(console.console().escape_state(), EscapeState::Bracket);

    console.source_mut().unwrap().0.extend(b"A");
    console.poll();
    assert_eq!(console.console().line(), "echo hi");
    assert!(console.source_mut().unwrap().0.is_empty());
}

#[test]
fn test_serial_console_feed() {
    let table = [Command::new("echo", "", &echo)];
    let mut console: SerialConsole<'_, Queue, Capture> = SerialConsole::init(
        ConsoleConfig::new(&table)
            .source(Queue::default())
            .sink(Capture::default())
            .banner(None),
    );

    for &b in b"echo" {
        assert_eq!(console.feed(b), None);
    }
    assert_eq!(console.feed(b'\r'), Some(Ok(())));
    assert_eq!(console.stats().lines_submitted, 1);
}

#[test]
fn test_serial_console_without_io_is_inactive() {
    let stream: LogStream = LogStream::new();
    fn clock() -> i64 {
        0
    }

    let table = [Command::new("echo", "", &echo)];
    let mut console: SerialConsole<'_, Queue, Capture> = SerialConsole::init(
        ConsoleConfig::new(&table)
            .sink(Capture::default())
            .logger(Logger::new(&stream, clock)),
    );

    assert!(!console.is_active());
    assert!(console.sink().is_none());
    console.poll();
    assert_eq!(console.feed(b'\r'), None);

    let entry = stream.drain().unwrap();
    assert_eq!(entry.level, LogLevel::Error);
    assert!(entry.text().contains("E05"));

    let config: ConsoleConfig<'_, Queue, Capture> = ConsoleConfig::new(&table).source(Queue::default());
    assert!(!config.is_complete());
    let console: SerialConsole<'_, Queue, Capture> = SerialConsole::init(config);
    assert!(!console.is_active());
}
