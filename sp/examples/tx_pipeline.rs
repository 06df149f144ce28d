//! The TX firmware image: forwards the job cookies of frames to be sent from puzzle FIFO 0 to
//! puzzle FIFO 1, printing a trace line for each.
//!
//! The TX core has no UART of its own in the programmable logic and prints to the PS's UART1
//! instead.

#![no_std]
#![no_main]

use core::ptr::addr_of_mut;
use log::{info, LevelFilter};
use prism::console::ConsoleLogger;
use prism::pipeline::{log_banner, Tx, TxPipeline};
use prism::sp::StreamProcessor;
use prism_sp::uart::{Uart, UART1_BASE};
use prism_sp::{mmio, SpCore};
use riscv_rt::entry;

static LOGGER: ConsoleLogger = ConsoleLogger::new(LevelFilter::Warn);

static mut UART: Uart = unsafe { Uart::new(UART1_BASE) };

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
    info!("Serial connection initialized to 8N1.");

    log_banner::<Tx>(sp.core_info());
    mmio::enable_snoops();

    TxPipeline::new(sp).run()
}
