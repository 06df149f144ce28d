//! A typed facade over the SP instruction set.

use crate::insn::{AcpWidth, FifoId, Op, RemoteLanes, Transact, WstrbLane};
use crate::regs::{CachingConfig, CoreInfo, Reg, SpConfig, CONTROL_ENABLE_BIT};
use crate::{Error, Result};
use log::warn;

/// The Stream Processor unit, driven through a [Transact] backend.
///
/// Each method issues exactly the instruction(s) its name suggests, with the operand arity of that
/// instruction. Methods that wait for hardware state are not provided; the pipeline decides how
/// to poll.
pub struct StreamProcessor<T> {
    transport: T,
}

impl<T: Transact> StreamProcessor<T> {
    pub const fn new(transport: T) -> StreamProcessor<T> {
        StreamProcessor { transport }
    }

    /// Returns the instruction backend, e.g. to inspect a simulated unit in tests.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    fn out(&mut self, op: Op) -> u32 {
        self.transport.transact(op, 0, 0)
    }

    pub fn puzzle_fifo_empty(&mut self, fifo: FifoId) -> bool {
        self.out(Op::PuzzleFifoEmpty(fifo)) != 0
    }

    pub fn puzzle_fifo_pop(&mut self, fifo: FifoId) -> u32 {
        self.out(Op::PuzzleFifoPop(fifo))
    }

    pub fn puzzle_fifo_full(&mut self, fifo: FifoId) -> bool {
        self.out(Op::PuzzleFifoFull(fifo)) != 0
    }

    pub fn puzzle_fifo_push(&mut self, fifo: FifoId, word: u32) {
        self.transport.transact(Op::PuzzleFifoPush(fifo), word, 0);
    }

    /// The number of words in the RX meta FIFO. Not supported by the current hardware; use
    /// [StreamProcessor::rx_meta_empty] instead.
    pub fn rx_meta_nelems(&mut self) -> u32 {
        self.out(Op::RxMetaNelems)
    }

    pub fn rx_meta_pop(&mut self) -> u32 {
        self.out(Op::RxMetaPop)
    }

    pub fn rx_meta_empty(&mut self) -> bool {
        self.out(Op::RxMetaEmpty) != 0
    }

    /// Starts moving `length` bytes from the RX data FIFO to `addr`.
    pub fn rx_data_dma_start(&mut self, addr: u32, length: u32) {
        self.transport.transact(Op::RxDataDmaStart, addr, length);
    }

    pub fn rx_data_dma_status(&mut self) -> u32 {
        self.out(Op::RxDataDmaStatus)
    }

    /// The number of free slots in the TX meta FIFO. Not supported by the current hardware; use
    /// [StreamProcessor::tx_meta_full] instead.
    pub fn tx_meta_nfree(&mut self) -> u32 {
        self.out(Op::TxMetaNfree)
    }

    pub fn tx_meta_push(&mut self, word: u32) {
        self.transport.transact(Op::TxMetaPush, word, 0);
    }

    pub fn tx_meta_full(&mut self) -> bool {
        self.out(Op::TxMetaFull) != 0
    }

    pub fn tx_data_count(&mut self) -> u32 {
        self.out(Op::TxDataCount)
    }

    /// Starts moving `length` bytes from `addr` into the TX data FIFO.
    pub fn tx_data_dma_start(&mut self, addr: u32, length: u32) {
        self.transport.transact(Op::TxDataDmaStart, addr, length);
    }

    pub fn tx_data_dma_status(&mut self) -> u32 {
        self.out(Op::TxDataDmaStatus)
    }

    pub fn load_reg(&mut self, reg: Reg) -> u32 {
        self.transport.transact(Op::LoadReg, reg.id(), 0)
    }

    /// Stores `value` to `reg`. Registers that are read-only to firmware are rejected without
    /// issuing an instruction.
    pub fn store_reg(&mut self, reg: Reg, value: u32) -> Result<()> {
        if reg.is_read_only() {
            warn!("Refusing to store {value:#x} to read-only register {reg:?}");
            return Err(Error::ReadOnlyRegister(reg));
        }
        self.transport.transact(Op::StoreReg, reg.id(), value);
        Ok(())
    }

    pub fn read_trigger(&mut self) -> bool {
        self.out(Op::ReadTrigger) != 0
    }

    pub fn intr(&mut self, bits: u32) {
        self.transport.transact(Op::Intr, 0, bits);
    }

    /// Starts a coherent read of `width` bytes from `ext_addr` into local memory at `int_addr`.
    pub fn acp_read_start(&mut self, width: AcpWidth, int_addr: u32, ext_addr: u32) {
        self.transport
            .transact(Op::AcpReadStart(width), int_addr, ext_addr);
    }

    pub fn acp_read_status(&mut self) -> u32 {
        self.out(Op::AcpReadStatus)
    }

    /// Starts a coherent write of `width` bytes from local memory at `int_addr` to `ext_addr`.
    pub fn acp_write_start(&mut self, width: AcpWidth, int_addr: u32, ext_addr: u32) {
        self.transport
            .transact(Op::AcpWriteStart(width), int_addr, ext_addr);
    }

    pub fn acp_write_status(&mut self) -> u32 {
        self.out(Op::AcpWriteStatus)
    }

    /// Whether a coherent write is still in flight.
    pub fn acp_busy(&mut self) -> bool {
        self.acp_write_status() != 0
    }

    pub fn acp_set_local_wstrb(&mut self, lane: WstrbLane, strobe: u16) {
        self.transport
            .transact(Op::AcpSetLocalWstrb(lane), strobe as u32, 0);
    }

    pub fn acp_set_remote_wstrb(&mut self, lanes: RemoteLanes, strobe: u16) {
        self.transport
            .transact(Op::AcpSetRemoteWstrb(lanes), strobe as u32, 0);
    }

    /// Whether the driver has set the enable bit in the control register.
    pub fn enabled(&mut self) -> bool {
        self.load_reg(Reg::Control) & CONTROL_ENABLE_BIT == CONTROL_ENABLE_BIT
    }

    /// Disables the AXI caching attributes of both the I/O and the DMA port. The firmware does not
    /// rely on coherency shortcuts through either.
    pub fn set_caching(&mut self) -> Result<()> {
        self.store_reg(Reg::IoAxiAxcache, 0)?;
        self.store_reg(Reg::DmaAxiAxcache, 0)
    }

    pub fn caching(&mut self) -> CachingConfig {
        CachingConfig {
            io_axcache: self.load_reg(Reg::IoAxiAxcache),
            dma_axcache: self.load_reg(Reg::DmaAxiAxcache),
        }
    }

    pub fn load_config(&mut self) -> SpConfig {
        SpConfig {
            data_fifo_size: self.load_reg(Reg::DataFifoSize),
            data_fifo_width: self.load_reg(Reg::DataFifoWidth),
        }
    }

    pub fn core_info(&mut self) -> CoreInfo {
        CoreInfo::from_info(self.load_reg(Reg::Info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimSp;

    #[test]
    fn store_to_read_only_register_is_rejected() {
        let mut sp = StreamProcessor::new(SimSp::new());
        sp.transport_mut().set_reg(Reg::DataFifoSize, 512);
        assert_eq!(
            sp.store_reg(Reg::DataFifoSize, 0),
            Err(Error::ReadOnlyRegister(Reg::DataFifoSize))
        );
        assert_eq!(sp.load_reg(Reg::DataFifoSize), 512);
        assert_eq!(sp.transport().stores(), 0);
    }

    #[test]
    fn set_caching_zeroes_both_ports() {
        let mut sp = StreamProcessor::new(SimSp::new());
        sp.transport_mut().set_reg(Reg::IoAxiAxcache, 0xf);
        sp.transport_mut().set_reg(Reg::DmaAxiAxcache, 0x3);
        sp.set_caching().unwrap();
        assert_eq!(sp.caching(), CachingConfig::default());
        assert_eq!(sp.transport().stores(), 2);
    }

    #[test]
    fn enable_bit_only() {
        let mut sp = StreamProcessor::new(SimSp::new());
        sp.transport_mut().set_reg(Reg::Control, 0x2);
        assert!(!sp.enabled());
        sp.transport_mut().set_reg(Reg::Control, 0x3);
        assert!(sp.enabled());
    }

    #[test]
    fn fifo_round_trip() {
        let mut sp = StreamProcessor::new(SimSp::new());
        assert!(sp.puzzle_fifo_empty(FifoId::Fifo3));
        sp.puzzle_fifo_push(FifoId::Fifo3, 0xdead_beef);
        assert!(!sp.puzzle_fifo_empty(FifoId::Fifo3));
        assert!(sp.puzzle_fifo_empty(FifoId::Fifo2));
        assert_eq!(sp.puzzle_fifo_pop(FifoId::Fifo3), 0xdead_beef);
    }

    #[test]
    fn dma_start_passes_both_operands() {
        let mut sp = StreamProcessor::new(SimSp::new());
        sp.rx_data_dma_start(0x8000_0000, 1514);
        assert_eq!(
            sp.transport().last_request(),
            Some((Op::RxDataDmaStart, 0x8000_0000, 1514))
        );
        sp.acp_write_start(AcpWidth::Bytes64, 0x100, 0x2000);
        assert_eq!(
            sp.transport().last_request(),
            Some((Op::AcpWriteStart(AcpWidth::Bytes64), 0x100, 0x2000))
        );
    }

    #[test]
    fn config_and_identity() {
        let mut sp = StreamProcessor::new(SimSp::new());
        sp.transport_mut().set_reg(Reg::DataFifoSize, 1024);
        sp.transport_mut().set_reg(Reg::DataFifoWidth, 128);
        sp.transport_mut().set_reg(Reg::Info, 0x31);
        assert_eq!(
            sp.load_config(),
            SpConfig {
                data_fifo_size: 1024,
                data_fifo_width: 128
            }
        );
        assert_eq!(sp.core_info().index, 1);
    }
}
