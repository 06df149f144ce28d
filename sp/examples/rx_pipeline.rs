//! The RX firmware image: forwards the job cookies of received frames from puzzle FIFO 1 to
//! puzzle FIFO 2, printing a trace line for each.
//!
//! The RX core prints to the UART Lite next to it in the programmable logic.

#![no_std]
#![no_main]

use core::ptr::addr_of_mut;
use log::{info, LevelFilter};
use prism::console::ConsoleLogger;
use prism::pipeline::{log_banner, Rx, RxPipeline};
use prism::sp::StreamProcessor;
use prism_sp::uartlite::{UartLite, UARTLITE0_BASE};
use prism_sp::{mmio, SpCore};
use riscv_rt::entry;

// Only warnings and errors are prefixed with their level, so the per-job trace lines are printed
// as-is.
static LOGGER: ConsoleLogger = ConsoleLogger::new(LevelFilter::Warn);

static mut UART: UartLite = unsafe { UartLite::new(UARTLITE0_BASE) };

#[entry]
fn main() -> ! {
    let Some(core) = SpCore::take() else {
        unreachable!("the entry point only runs once");
    };
    let mut sp = StreamProcessor::new(core);

    // SAFETY: this is the only place the UART is referenced.
    let uart = unsafe { &mut *addr_of_mut!(UART) };
    uart.init();
    if let Err(err) = prism_sp::init_console(uart, &LOGGER, LevelFilter::Info) {
        panic!("Could not set up the console: {err}");
    }
    info!("Uartlite serial connection initialized to 8N1.");

    log_banner::<Rx>(sp.core_info());
    mmio::enable_snoops();

    RxPipeline::new(sp).run()
}
