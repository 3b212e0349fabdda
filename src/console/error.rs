//! Console error types

/// Console error with code and message.
///
/// None of these are fatal: the engine reports them on the console and keeps
/// reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError {
    /// E01: Unknown command
    UnknownCommand,
    /// E02: Invalid value format
    InvalidValue,
    /// E03: Wrong arguments, carries the usage line
    Usage(&'static str),
    /// E04: Unknown variable
    UnknownVariable,
    /// E05: Console started without a byte source or sink
    NotConfigured,
}

impl ConsoleError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "E01",
            Self::InvalidValue => "E02",
            Self::Usage(_) => "E03",
            Self::UnknownVariable => "E04",
            Self::NotConfigured => "E05",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "unknown command",
            Self::InvalidValue => "invalid value",
            Self::Usage(usage) => usage,
            Self::UnknownVariable => "unknown variable",
            Self::NotConfigured => "console I/O not configured",
        }
    }
}

impl core::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Usage(usage) => write!(f, "{}: usage: {}", self.code(), usage),
            _ => write!(f, "{}: {}", self.code(), self.message()),
        }
    }
}
