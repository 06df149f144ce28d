//! Hardware-independent support code for the Stream Processor (SP) firmware.
//!
//! The SP is a RISC-V core whose FIFOs, DMA engines, coherent-memory port and configuration
//! registers are only reachable through custom instructions. This crate contains everything that
//! does not need to actually issue those instructions: the instruction catalogue ([insn]), a typed
//! facade over it ([sp]), the register map ([regs]), the bit-field codecs for job cookies
//! ([cookie]) and GEM DMA descriptors ([descriptor]), and the RX/TX hand-off state machine
//! ([pipeline]). The `prism_sp` crate provides the instruction backend for the real core, while
//! [sim] provides one for host-side tests.
#![cfg_attr(not(test), no_std)]

pub mod console;
pub mod cookie;
pub mod debug_util;
pub mod descriptor;
mod error;
pub mod example_data;
pub mod insn;
pub mod pipeline;
pub mod regs;
pub mod sim;
pub mod sp;

pub use error::{Error, Result};
