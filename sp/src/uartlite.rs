//! A driver for the transmit side of an AXI UART Lite soft core.
//!
//! The UART Lite has a fixed line configuration (set when the bitstream is built), so all there is
//! to initialize is its FIFOs.

use crate::mmio;
use prism::console::SerialPort;

/// The base address of the UART Lite instance next to the RX SP core.
pub const UARTLITE0_BASE: usize = 0xa100_0000;

const TX_FIFO_OFFSET: usize = 0x04;
const STAT_REG_OFFSET: usize = 0x08;
const CTRL_REG_OFFSET: usize = 0x0c;

const STAT_TXFULL: u32 = 1 << 3;

const CTRL_RSTTXFIFO: u32 = 1 << 0;
const CTRL_RSTRXFIFO: u32 = 1 << 1;

pub struct UartLite {
    base: usize,
}

impl UartLite {
    /// # Safety
    ///
    /// `base` must be the base address of an AXI UART Lite, and the returned instance must be the
    /// only user of it.
    pub const unsafe fn new(base: usize) -> UartLite {
        UartLite { base }
    }

    /// Resets both FIFOs, which also leaves interrupts disabled.
    pub fn init(&mut self) {
        unsafe {
            mmio::write(
                self.base,
                CTRL_REG_OFFSET,
                CTRL_RSTTXFIFO | CTRL_RSTRXFIFO,
            )
        };
    }

    fn tx_full(&self) -> bool {
        unsafe { mmio::read(self.base, STAT_REG_OFFSET) & STAT_TXFULL != 0 }
    }
}

impl SerialPort for UartLite {
    fn send_byte(&mut self, byte: u8) {
        while self.tx_full() {}
        unsafe { mmio::write(self.base, TX_FIFO_OFFSET, byte as u32) };
    }
}
