//! A transmit-only driver for the Cadence UART controller of the Zynq UltraScale+ PS.
//!
//! UART0 is configured by the boot firmware running on the APU. The SP borrows UART1, which
//! nobody else has set up, so [Uart::init] starts from a copy of UART0's configuration and then
//! overrides what matters for transmitting at 115200 8N1. See UG1085, "UART Controller", and the
//! `uartps` standalone driver for the register semantics.

use crate::mmio;
use prism::console::SerialPort;

pub const UART0_BASE: usize = 0xff00_0000;
pub const UART1_BASE: usize = 0xff01_0000;

/// The size of the register block copied from UART0.
const CONFIG_BLOCK_SIZE: usize = 0x80;

const CR_OFFSET: usize = 0x00;
const MR_OFFSET: usize = 0x04;
const IDR_OFFSET: usize = 0x0c;
const SR_OFFSET: usize = 0x2c;
const FIFO_OFFSET: usize = 0x30;
const BAUDDIV_OFFSET: usize = 0x34;

const CR_TXEN: u32 = 1 << 4;

const MR_DATABITS_8: u32 = 0x0 << 1;
const MR_PARITY_NONE: u32 = 0x4 << 3;
const MR_STOPBITS_1: u32 = 0x0 << 6;
const MR_WSIZE_1: u32 = 0x1 << 12;

const IDR_ALL: u32 = 0x3fff;

const SR_TXFULL: u32 = 1 << 4;

const BAUDDIV: u32 = 6;

const CRL_APB_BASE: usize = 0xff5e_0000;
const UART1_REF_CTRL_OFFSET: usize = 0x78;
/// DIVISOR0 = 0xf, DIVISOR1 = 0x1, CLKACT = 1.
const UART1_REF_CTRL: u32 = 0x0101_0f00;

pub struct Uart {
    base: usize,
}

impl Uart {
    /// # Safety
    ///
    /// `base` must be the base address of a PS UART controller, and the returned instance must be
    /// the only user of it.
    pub const unsafe fn new(base: usize) -> Uart {
        Uart { base }
    }

    /// Configures the controller for 8N1 transmission with interrupts disabled and its reference
    /// clock enabled.
    pub fn init(&mut self) {
        unsafe {
            for offset in (0..CONFIG_BLOCK_SIZE).step_by(4) {
                mmio::write(self.base, offset, mmio::read(UART0_BASE, offset));
            }
            mmio::write(
                self.base,
                MR_OFFSET,
                MR_DATABITS_8 | MR_PARITY_NONE | MR_STOPBITS_1 | MR_WSIZE_1,
            );
            mmio::write(self.base, CR_OFFSET, CR_TXEN);
            // Nobody would handle them.
            mmio::write(self.base, IDR_OFFSET, IDR_ALL);
            mmio::write(self.base, BAUDDIV_OFFSET, BAUDDIV);
            mmio::write(CRL_APB_BASE, UART1_REF_CTRL_OFFSET, UART1_REF_CTRL);
        }
    }

    fn tx_full(&self) -> bool {
        unsafe { mmio::read(self.base, SR_OFFSET) & SR_TXFULL != 0 }
    }
}

impl SerialPort for Uart {
    fn send_byte(&mut self, byte: u8) {
        while self.tx_full() {}
        unsafe { mmio::write(self.base, FIFO_OFFSET, byte as u32) };
    }
}
