//! Line buffer for console input.
//!
//! Holds at most `N - 1` bytes so the line always fits a C-style terminated
//! copy. Every mutation goes through the capacity check here.

/// Default line capacity (including the terminator slot).
pub const LINE_SIZE: usize = 128;

/// Largest `idx' <= idx` that falls on a char boundary of `s`.
pub(crate) fn floor_char_boundary(s: &str, idx: usize) -> usize {
    let mut idx = idx.min(s.len());
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Fixed-capacity line input buffer. Editing happens at the tail only.
pub struct LineBuffer<const N: usize = LINE_SIZE> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> LineBuffer<N> {
    /// Create empty buffer.
    pub const fn new() -> Self {
        assert!(N > 1, "line buffer needs room for at least one character");

        Self {
            buf: [0u8; N],
            len: 0,
        }
    }

    /// Maximum number of characters the line can hold.
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Append a character. Returns `false` (buffer untouched) when full.
    pub fn push(&mut self, c: u8) -> bool {
        if self.len >= N - 1 {
            return false;
        }
        self.buf[self.len] = c;
        self.len += 1;
        true
    }

    /// Remove last character. Returns `false` if the line was already empty.
    pub fn backspace(&mut self) -> bool {
        if self.len == 0 {
            return false;
        }
        self.len -= 1;
        self.buf[self.len] = 0;
        true
    }

    /// Shorten the line to `len` characters (no-op if already shorter).
    pub fn truncate(&mut self, len: usize) {
        if len < self.len {
            self.buf[len..self.len].fill(0);
            self.len = len;
        }
    }

    /// Clear buffer.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Replace contents, keeping as much of `s` as fits.
    ///
    /// Returns the number of bytes stored.
    pub fn set(&mut self, s: &str) -> usize {
        self.clear();
        self.extend(s)
    }

    /// Append as much of `s` as fits without splitting a character.
    /// Returns the number of bytes stored.
    pub fn extend(&mut self, s: &str) -> usize {
        let bytes = s.as_bytes();
        let copy_len = floor_char_boundary(s, N - 1 - self.len);
        self.buf[self.len..self.len + copy_len].copy_from_slice(&bytes[..copy_len]);
        self.len += copy_len;
        copy_len
    }

    /// Get buffer as string slice.
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(self.as_bytes()).unwrap_or("")
    }

    /// Get buffer length.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == N - 1
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Contents followed by the terminating zero.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.buf[..=self.len]
    }
}

impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
