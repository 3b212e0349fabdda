//! Non-blocking diagnostic logging for the console.
//!
//! ```text
//! Console (superloop)     LogStream            Drain
//! ───────────────────     ─────────            ─────
//!
//! console_warn!() ─────▶ [L0][L1][L2] ──────▶ log UART / stderr
//! never blocks            fixed ring           whenever convenient
//! ```
//!
//! Entries are dropped (and counted) when the ring is full. Logging must never
//! stall input processing.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

/// Maximum message length in bytes.
pub const MAX_MSG_LEN: usize = 64;

/// Default ring size (number of entries).
pub const LOG_BUFFER_SIZE: usize = 32;

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    /// Fixed-width-friendly label.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }
}

/// A single log record.
#[derive(Clone, Copy)]
pub struct LogEntry {
    /// Timestamp from the caller-supplied clock (microseconds).
    pub timestamp_us: i64,
    pub level: LogLevel,
    len: u8,
    msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    const EMPTY: Self = Self {
        timestamp_us: 0,
        level: LogLevel::Info,
        len: 0,
        msg: [0; MAX_MSG_LEN],
    };

    /// Build an entry, truncating `msg` to [`MAX_MSG_LEN`].
    pub fn new(timestamp_us: i64, level: LogLevel, msg: &[u8]) -> Self {
        let mut entry = Self::EMPTY;
        let len = msg.len().min(MAX_MSG_LEN);
        entry.timestamp_us = timestamp_us;
        entry.level = level;
        entry.len = len as u8;
        entry.msg[..len].copy_from_slice(&msg[..len]);
        entry
    }

    /// Message bytes.
    pub fn message(&self) -> &[u8] {
        &self.msg[..self.len as usize]
    }

    /// Message as text (lossy: invalid UTF-8 yields a placeholder).
    pub fn text(&self) -> &str {
        core::str::from_utf8(self.message()).unwrap_or("<invalid utf8>")
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Single-producer / single-consumer log ring.
///
/// The console pushes from the superloop, the drain pops from wherever the
/// application chooses (same loop, another task, a host thread).
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    entries: UnsafeCell<[LogEntry; N]>,
    head: AtomicU32,
    tail: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: one producer writes slot `head` before publishing it with a Release
// store, one consumer reads slot `tail` after an Acquire load of `head`. A slot
// is never written while it is between tail and head.
unsafe impl<const N: usize> Sync for LogStream<N> {}
unsafe impl<const N: usize> Send for LogStream<N> {}

impl<const N: usize> LogStream<N> {
    const MASK: usize = N - 1;

    /// Create an empty stream. `N` must be a power of two.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "log ring size must be a power of 2");

        Self {
            entries: UnsafeCell::new([LogEntry::EMPTY; N]),
            head: AtomicU32::new(0),
            tail: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Queue a message. Returns `false` (and counts a drop) if the ring is full.
    #[inline]
    pub fn push(&self, timestamp_us: i64, level: LogLevel, msg: &[u8]) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);

        if head.wrapping_sub(tail) >= N as u32 {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let idx = (head as usize) & Self::MASK;

        // SAFETY: slot `idx` is outside [tail, head) so the consumer is not
        // reading it; single producer means no other writer.
        unsafe {
            (*self.entries.get())[idx] = LogEntry::new(timestamp_us, level, msg);
        }

        self.head.store(head.wrapping_add(1), Ordering::Release);
        true
    }

    /// Pop the oldest entry, if any.
    #[inline]
    pub fn drain(&self) -> Option<LogEntry> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        if tail == head {
            return None;
        }

        let idx = (tail as usize) & Self::MASK;

        // SAFETY: slot published by the Release store on `head`, single consumer.
        let entry = unsafe { (*self.entries.get())[idx] };

        self.tail.store(tail.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    /// Messages lost to a full ring since the last reset.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn reset_dropped(&self) {
        self.dropped.store(0, Ordering::Relaxed);
    }

    /// Read and zero the drop counter in one step, so drops counted while
    /// reporting are kept for the next report.
    #[inline]
    pub fn take_dropped(&self) -> u32 {
        self.dropped.swap(0, Ordering::Relaxed)
    }

    /// Number of entries waiting to be drained.
    #[inline]
    pub fn pending(&self) -> u32 {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);
        head.wrapping_sub(tail)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Log destination: a ring plus the external timekeeping function.
#[derive(Clone, Copy)]
pub struct Logger<'a> {
    pub stream: &'a LogStream,
    pub clock: fn() -> i64,
}

impl<'a> Logger<'a> {
    pub const fn new(stream: &'a LogStream, clock: fn() -> i64) -> Self {
        Self { stream, clock }
    }

    /// Format and queue one message.
    pub fn log(&self, level: LogLevel, args: core::fmt::Arguments<'_>) -> bool {
        let mut buf = [0u8; MAX_MSG_LEN];
        let len = format_to_buffer(&mut buf, args);
        self.stream.push((self.clock)(), level, &buf[..len])
    }
}

/// Format into `buf`, truncating silently. Returns bytes written.
#[inline]
pub fn format_to_buffer(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    use core::fmt::Write;

    struct Truncating<'a> {
        buf: &'a mut [u8],
        pos: usize,
    }

    impl Write for Truncating<'_> {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            let bytes = s.as_bytes();
            let to_write = bytes.len().min(self.buf.len() - self.pos);
            self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
            self.pos += to_write;
            Ok(())
        }
    }

    let mut writer = Truncating { buf, pos: 0 };
    let _ = core::fmt::write(&mut writer, args);
    writer.pos
}

/// Log through an `Option<Logger>`; a `None` logger costs one branch.
///
/// ```ignore
/// console_log!(LogLevel::Warn, self.logger, "unknown command '{}'", name);
/// ```
#[macro_export]
macro_rules! console_log {
    ($level:expr, $logger:expr, $($arg:tt)*) => {{
        if let Some(logger) = $logger {
            logger.log($level, format_args!($($arg)*));
        }
    }};
}

#[macro_export]
macro_rules! console_error {
    ($logger:expr, $($arg:tt)*) => {
        $crate::console_log!($crate::logging::LogLevel::Error, $logger, $($arg)*)
    };
}

#[macro_export]
macro_rules! console_warn {
    ($logger:expr, $($arg:tt)*) => {
        $crate::console_log!($crate::logging::LogLevel::Warn, $logger, $($arg)*)
    };
}

#[macro_export]
macro_rules! console_info {
    ($logger:expr, $($arg:tt)*) => {
        $crate::console_log!($crate::logging::LogLevel::Info, $logger, $($arg)*)
    };
}

#[macro_export]
macro_rules! console_debug {
    ($logger:expr, $($arg:tt)*) => {
        $crate::console_log!($crate::logging::LogLevel::Debug, $logger, $($arg)*)
    };
}

#[macro_export]
macro_rules! console_trace {
    ($logger:expr, $($arg:tt)*) => {
        $crate::console_log!($crate::logging::LogLevel::Trace, $logger, $($arg)*)
    };
}
