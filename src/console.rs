//! The diagnostic console and a [log] backend on top of it.
//!
//! A firmware image picks its serial port at start-up and installs it exactly once with
//! [install]. From then on [print] (and the [ConsoleLogger]) write to that port. Output issued
//! before a port is installed is discarded.
//!
//! The console translates `\n` into `\r\n`, so callers only ever write `\n`.

use crate::{Error, Result};
use core::cell::RefCell;
use core::fmt::Write;
use critical_section::Mutex;
use log::LevelFilter;

/// A byte-oriented serial transmitter.
pub trait SerialPort {
    /// Blocks until `byte` has been handed to the transmitter.
    fn send_byte(&mut self, byte: u8);
}

impl<S: SerialPort + ?Sized> SerialPort for &mut S {
    fn send_byte(&mut self, byte: u8) {
        (**self).send_byte(byte)
    }
}

/// A [core::fmt::Write] adapter performing the newline translation.
pub struct Console<S>(pub S);

impl<S: SerialPort> Write for Console<S> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for byte in s.bytes() {
            if byte == b'\n' {
                self.0.send_byte(b'\r');
            }
            self.0.send_byte(byte);
        }
        Ok(())
    }
}

type Port = &'static mut (dyn SerialPort + Send);

static CONSOLE: Mutex<RefCell<Option<Port>>> = Mutex::new(RefCell::new(None));

/// Installs the port all console output goes to.
///
/// The console can only be installed once per boot. An [Error::ConsoleAlreadyInstalled] is
/// returned on any further attempt, and the originally installed port stays in place.
pub fn install(port: Port) -> Result<()> {
    critical_section::with(|cs| {
        let mut console = CONSOLE.borrow_ref_mut(cs);
        match *console {
            Some(_) => Err(Error::ConsoleAlreadyInstalled),
            None => {
                *console = Some(port);
                Ok(())
            }
        }
    })
}

pub fn is_installed() -> bool {
    critical_section::with(|cs| CONSOLE.borrow_ref(cs).is_some())
}

/// Runs `f` on the installed port. Does nothing if no port is installed, or if the port is
/// already in use further up the stack (e.g. when panicking while printing).
fn with_port<F: FnOnce(&mut Console<&mut (dyn SerialPort + Send + 'static)>)>(f: F) {
    critical_section::with(|cs| {
        if let Ok(mut console) = CONSOLE.borrow(cs).try_borrow_mut() {
            if let Some(port) = console.as_mut() {
                f(&mut Console(&mut **port));
            }
        }
    })
}

/// Writes formatted output to the installed console.
pub fn print(args: core::fmt::Arguments<'_>) {
    // Writing to a serial port cannot fail.
    with_port(|console| {
        let _ = console.write_fmt(args);
    });
}

/// Prints to the installed console.
#[macro_export]
macro_rules! console_print {
    ($($arg:tt)*) => {
        $crate::console::print(format_args!($($arg)*))
    };
}

/// Prints to the installed console, followed by a newline.
#[macro_export]
macro_rules! console_println {
    () => {
        $crate::console::print(format_args!("\n"))
    };
    ($($arg:tt)*) => {{
        $crate::console::print(format_args!($($arg)*));
        $crate::console::print(format_args!("\n"));
    }};
}

/// A [log::Log] implementation writing one line per record to the installed console.
///
/// Records at or above `display_level` are prefixed with `"<LEVEL> | "`. Less severe records, such
/// as the per-job trace lines, are printed bare.
pub struct ConsoleLogger {
    pub display_level: LevelFilter,
}

impl ConsoleLogger {
    pub const fn new(display_level: LevelFilter) -> ConsoleLogger {
        ConsoleLogger { display_level }
    }

    /// Writes `record` as a single line to `w`.
    pub fn write_record<W: Write>(&self, w: &mut W, record: &log::Record) -> core::fmt::Result {
        if record.level() <= self.display_level {
            write!(w, "{} | ", record.level())?;
        }
        writeln!(w, "{}", record.args())
    }
}

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        with_port(|console| {
            let _ = self.write_record(console, record);
        });
    }

    fn flush(&self) {}
}
