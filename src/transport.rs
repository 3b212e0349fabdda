//! Byte transport boundary.
//!
//! The console only ever sees two capabilities: a sink it can push bytes into
//! and a source it can poll. A source that has nothing returns `None`
//! immediately; it must never wait for the wire.

use core::fmt;

/// Non-blocking byte input.
pub trait ByteSource {
    /// Next received byte, or `None` if nothing is available right now.
    fn read_byte(&mut self) -> Option<u8>;
}

/// Byte output.
pub trait ByteSink {
    fn write_byte(&mut self, byte: u8);

    fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.write_byte(b);
        }
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> Option<u8> {
        (**self).read_byte()
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    fn write_byte(&mut self, byte: u8) {
        (**self).write_byte(byte)
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        (**self).write_bytes(bytes)
    }
}

/// getchar-style adapter: wraps `FnMut() -> Option<u8>`.
pub struct FnSource<F>(pub F);

impl<F: FnMut() -> Option<u8>> ByteSource for FnSource<F> {
    fn read_byte(&mut self) -> Option<u8> {
        (self.0)()
    }
}

/// putchar-style adapter: wraps `FnMut(u8)`.
pub struct FnSink<F>(pub F);

impl<F: FnMut(u8)> ByteSink for FnSink<F> {
    fn write_byte(&mut self, byte: u8) {
        (self.0)(byte)
    }
}

/// `fmt::Write` view of a sink, so output can be produced with `write!`.
pub struct SinkWriter<'a, O: ?Sized>(pub &'a mut O);

impl<O: ByteSink + ?Sized> fmt::Write for SinkWriter<'_, O> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_bytes(s.as_bytes());
        Ok(())
    }
}

/// Receive side of a circular DMA transfer.
///
/// The DMA engine writes into `buffer` and counts *down* the transfers left
/// before it wraps. The write position is therefore `len - remaining`; every
/// byte between our read index and that position is fresh.
pub struct DmaRing {
    buffer: *const u8,
    len: usize,
    remaining: *const u32,
    read_idx: usize,
}

impl DmaRing {
    /// Attach to a running circular DMA channel.
    ///
    /// # Safety
    ///
    /// `buffer` must point to `len` bytes and `remaining` to the channel's
    /// remaining-count register (or a word mirroring it). Both must stay valid
    /// for the lifetime of the ring. They are only ever read, with volatile
    /// loads, so concurrent hardware writes are fine.
    pub unsafe fn new(buffer: *const u8, len: usize, remaining: *const u32) -> Self {
        Self {
            buffer,
            len,
            remaining,
            read_idx: 0,
        }
    }

    /// Bytes waiting between the read index and the DMA write position.
    pub fn available(&self) -> usize {
        let write_idx = self.write_idx();
        (write_idx + self.len - self.read_idx) % self.len.max(1)
    }

    fn write_idx(&self) -> usize {
        if self.len == 0 {
            return 0;
        }
        // SAFETY: pointer validity is the caller's contract in `new`.
        let remaining = unsafe { core::ptr::read_volatile(self.remaining) } as usize;
        // A counter that has just reloaded reads as `len`; treat it as zero.
        self.len.saturating_sub(remaining) % self.len
    }
}

impl ByteSource for DmaRing {
    fn read_byte(&mut self) -> Option<u8> {
        if self.read_idx == self.write_idx() {
            return None;
        }

        // SAFETY: read_idx < len, buffer valid for len bytes (see `new`).
        let byte = unsafe { core::ptr::read_volatile(self.buffer.add(self.read_idx)) };
        self.read_idx = (self.read_idx + 1) % self.len;
        Some(byte)
    }
}

#[cfg(target_os = "espidf")]
pub use uart::UartPort;

#[cfg(target_os = "espidf")]
mod uart {
    use super::{ByteSink, ByteSource};
    use esp_idf_svc::hal::delay::NON_BLOCK;
    use esp_idf_svc::hal::uart::UartDriver;

    /// Console transport over an ESP-IDF UART driver.
    ///
    /// Reads never wait (zero-tick timeout). Writes block until the driver
    /// has queued the bytes, same as a polled putchar. The driver only needs
    /// `&self`, so `&UartPort` serves as both source and sink of one console.
    pub struct UartPort<'d> {
        driver: UartDriver<'d>,
    }

    impl<'d> UartPort<'d> {
        pub fn new(driver: UartDriver<'d>) -> Self {
            Self { driver }
        }

        fn read_one(&self) -> Option<u8> {
            let mut byte = [0u8; 1];
            match self.driver.read(&mut byte, NON_BLOCK) {
                Ok(1) => Some(byte[0]),
                _ => None,
            }
        }

        fn write_all(&self, bytes: &[u8]) {
            let _ = self.driver.write(bytes);
        }
    }

    impl ByteSource for &UartPort<'_> {
        fn read_byte(&mut self) -> Option<u8> {
            self.read_one()
        }
    }

    impl ByteSink for &UartPort<'_> {
        fn write_byte(&mut self, byte: u8) {
            self.write_all(&[byte]);
        }

        fn write_bytes(&mut self, bytes: &[u8]) {
            self.write_all(bytes);
        }
    }
}
