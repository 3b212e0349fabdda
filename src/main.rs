//! RustSerialCli - Main entry point
//!
//! On ESP-IDF:
//! 1. Console on UART0 (GPIO43 TX / GPIO44 RX)
//! 2. Diagnostic log on UART1 TX (GPIO6)
//! 3. Superloop: poll console, drain log, yield one tick
//!
//! On a host the same console runs over stdin/stdout with the log on stderr.

#![cfg_attr(target_os = "espidf", no_std)]
#![cfg_attr(target_os = "espidf", no_main)]

#[cfg(target_os = "espidf")]
mod device {
    use esp_idf_svc::hal::gpio;
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::uart::{config::Config, UartDriver};
    use esp_idf_svc::hal::units::Hertz;
    use esp_idf_svc::sys as esp_idf_sys;

    use rust_serial_cli::app::{AppCommands, Vars};
    use rust_serial_cli::log_drain::{self, init_log_uart, LogUartConfig, UartText};
    use rust_serial_cli::transport::UartPort;
    use rust_serial_cli::{ConsoleConfig, LogStream, Logger, SerialConsole};

    static LOG_STREAM: LogStream = LogStream::new();

    fn timestamp_us() -> i64 {
        unsafe { esp_idf_sys::esp_timer_get_time() }
    }

    #[no_mangle]
    fn main() {
        // Initialize ESP-IDF
        esp_idf_sys::link_patches();

        let Ok(peripherals) = Peripherals::take() else {
            return;
        };
        let pins = peripherals.pins;

        let Ok(console_uart) = UartDriver::new(
            peripherals.uart0,
            pins.gpio43,
            pins.gpio44,
            Option::<gpio::AnyIOPin>::None,
            Option::<gpio::AnyIOPin>::None,
            &Config::default().baudrate(Hertz(115_200)),
        ) else {
            return;
        };

        // Logging is optional: without the second UART the console still runs.
        let mut log_uart = init_log_uart(peripherals.uart1, pins.gpio6, &LogUartConfig::default()).ok();

        let vars = Vars::new();
        let app = AppCommands::new(&vars);
        let table = app.table();
        let port = UartPort::new(console_uart);

        let mut console: SerialConsole<'_, _, _> = SerialConsole::init(
            ConsoleConfig::new(&table)
                .source(&port)
                .sink(&port)
                .logger(Logger::new(&LOG_STREAM, timestamp_us)),
        );

        loop {
            console.poll();

            if let Some(uart) = log_uart.as_mut() {
                log_drain::drain_to(&LOG_STREAM, &mut UartText(uart));
            }

            unsafe {
                esp_idf_sys::vTaskDelay(1);
            }
        }
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    use std::io::{Read, Write};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{mpsc, Arc};
    use std::time::{Duration, Instant};

    use rust_serial_cli::app::{AppCommands, Vars};
    use rust_serial_cli::{log_drain, ConsoleConfig, FnSink, FnSource, LogStream, Logger, SerialConsole};

    static LOG_STREAM: LogStream = LogStream::new();
    static START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

    fn timestamp_us() -> i64 {
        START.get_or_init(Instant::now).elapsed().as_micros() as i64
    }

    struct StderrText;

    impl core::fmt::Write for StderrText {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            std::io::stderr().write_all(s.as_bytes()).map_err(|_| core::fmt::Error)
        }
    }

    timestamp_us();

    // The reader thread plays the UART receive buffer.
    let (tx, rx) = mpsc::channel::<u8>();
    let eof = Arc::new(AtomicBool::new(false));
    {
        let eof = Arc::clone(&eof);
        std::thread::spawn(move || {
            for byte in std::io::stdin().lock().bytes() {
                match byte {
                    Ok(b) if tx.send(b).is_ok() => {}
                    _ => break,
                }
            }
            eof.store(true, Ordering::Release);
        });
    }

    let vars = Vars::new();
    let app = AppCommands::new(&vars);
    let table = app.table();
    let stdout = std::io::stdout();

    let mut console: SerialConsole<'_, _, _> = SerialConsole::init(
        ConsoleConfig::new(&table)
            .source(FnSource(|| rx.try_recv().ok()))
            .sink(FnSink(|b: u8| {
                let _ = stdout.lock().write_all(&[b]);
            }))
            .logger(Logger::new(&LOG_STREAM, timestamp_us)),
    );

    loop {
        let done = eof.load(Ordering::Acquire);
        console.poll();
        let _ = stdout.lock().flush();
        log_drain::drain_to(&LOG_STREAM, &mut StderrText);

        if done {
            break;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
}
