//! Support code for running the firmware on the SP core itself.
//!
//! [SpCore] issues the custom instructions described by [prism::insn]. The remaining modules
//! drive the few peripherals the firmware touches outside of the SP: the two UARTs that can carry
//! the console, and the interconnect's snoop control.
#![no_std]

pub mod insn;
pub mod mmio;
mod panic_handler;
pub mod uart;
pub mod uartlite;

pub use insn::SpCore;

// Provides the critical-section implementation.
use riscv as _;

use log::LevelFilter;
use prism::console::{self, ConsoleLogger, SerialPort};

/// Installs `port` as the console and routes [log] records at or below `max_level` to it through
/// `logger`.
///
/// Must be called once, before anything is printed.
pub fn init_console(
    port: &'static mut (dyn SerialPort + Send),
    logger: &'static ConsoleLogger,
    max_level: LevelFilter,
) -> prism::Result<()> {
    console::install(port)?;
    // The SP has a single hart and no interrupts are enabled, so nothing can race with this.
    unsafe {
        // Only fails if a logger is already set, which the install above rules out.
        log::set_logger_racy(logger).ok();
        log::set_max_level_racy(max_level);
    }
    Ok(())
}
