//! Log output: drains a [`LogStream`] into a text sink.
//!
//! On the device the sink is a TX-only UART kept apart from the console port,
//! so diagnostics never interleave with the operator's line.
//!
//! ```text
//! ESP32-S3 GPIO6 (TX) ──────▶ USB-UART RX
//!                              └─▶ PC Serial Monitor
//! ```

use core::fmt::Write;

use crate::logging::{LogEntry, LogStream};

/// Write one entry as `[timestamp_us] LEVEL: message\r\n`.
pub fn write_entry(entry: &LogEntry, out: &mut dyn Write) -> core::fmt::Result {
    write!(
        out,
        "[{:10}] {}: {}\r\n",
        entry.timestamp_us,
        entry.level.as_str(),
        entry.text()
    )
}

/// Drain every pending entry into `out`, then report and zero the drop
/// counter if anything was lost. Returns the number of entries written.
pub fn drain_to<const N: usize>(stream: &LogStream<N>, out: &mut dyn Write) -> usize {
    let mut written = 0;

    while let Some(entry) = stream.drain() {
        let _ = write_entry(&entry, out);
        written += 1;
    }

    let dropped = stream.take_dropped();
    if dropped > 0 {
        let _ = write!(out, "[WARN] Dropped: {}\r\n", dropped);
    }

    written
}

#[cfg(target_os = "espidf")]
pub use device::*;

#[cfg(target_os = "espidf")]
mod device {
    use esp_idf_svc::hal::gpio;
    use esp_idf_svc::hal::peripheral::Peripheral;
    use esp_idf_svc::hal::uart::{self, UartTxDriver};

    /// UART configuration for the log port.
    pub struct LogUartConfig {
        pub baud_rate: u32,
        pub tx_pin: u8,
    }

    impl Default for LogUartConfig {
        fn default() -> Self {
            Self {
                baud_rate: 115200,
                tx_pin: 6,
            }
        }
    }

    /// Initialize UART1 TX-only for log output.
    pub fn init_log_uart<'d>(
        uart: impl Peripheral<P = uart::UART1> + 'd,
        tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
        config: &LogUartConfig,
    ) -> Result<UartTxDriver<'d>, esp_idf_svc::sys::EspError> {
        let uart_config = uart::config::Config::default()
            .baudrate(esp_idf_svc::hal::units::Hertz(config.baud_rate));

        UartTxDriver::new(
            uart,
            tx_pin,
            Option::<gpio::AnyIOPin>::None, // CTS
            Option::<gpio::AnyIOPin>::None, // RTS
            &uart_config,
        )
    }

    /// `fmt::Write` over a TX driver; write errors are swallowed.
    pub struct UartText<'a, 'd>(pub &'a mut UartTxDriver<'d>);

    impl core::fmt::Write for UartText<'_, '_> {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            let _ = self.0.write(s.as_bytes());
            Ok(())
        }
    }
}
