//! The catalogue of custom instructions understood by the SP core.
//!
//! Every hardware capability of the SP (puzzle FIFOs, meta FIFOs, data DMA, register file, ACP
//! coherent-memory port) is exposed as an R-type instruction on the CUSTOM-0 major opcode. The
//! instruction's `funct7` field selects the operation class and its `funct3` field selects a
//! variant within that class, e.g. which of the four puzzle FIFOs is addressed. [Op] is the closed
//! set of those instructions. A [Transact] implementation executes them, either by emitting the
//! actual instruction (see the `prism_sp` crate) or by modelling its effect (see [crate::sim]).

/// The CUSTOM-0 major opcode (`0b0001011`).
pub const OPCODE_CUSTOM_0: u32 = 0x0b;

/// The `funct7` selectors of the SP instructions.
pub mod funct7 {
    pub const PUZZLE_FIFO_R_EMPTY: u32 = 0x00;
    pub const PUZZLE_FIFO_R_POP: u32 = 0x01;
    pub const PUZZLE_FIFO_W_FULL: u32 = 0x04;
    pub const PUZZLE_FIFO_W_PUSH: u32 = 0x05;

    pub const RX_META_NELEMS: u32 = 0x08;
    pub const RX_META_POP: u32 = 0x09;
    pub const RX_META_EMPTY: u32 = 0x0a;
    pub const RX_DATA_DMA_START: u32 = 0x0d;
    pub const RX_DATA_DMA_STATUS: u32 = 0x0e;

    // The TX core reuses the meta FIFO selectors of the RX core.
    pub const TX_META_NFREE: u32 = 0x08;
    pub const TX_META_PUSH: u32 = 0x09;
    pub const TX_META_FULL: u32 = 0x0a;
    pub const TX_DATA_COUNT: u32 = 0x0c;
    pub const TX_DATA_DMA_START: u32 = 0x0e;
    pub const TX_DATA_DMA_STATUS: u32 = 0x0f;

    pub const COMMON_LOAD_REG: u32 = 0x10;
    pub const COMMON_STORE_REG: u32 = 0x11;
    pub const COMMON_READ_TRIGGER: u32 = 0x12;
    pub const COMMON_INTR: u32 = 0x13;

    pub const ACP_READ_START: u32 = 0x18;
    pub const ACP_READ_STATUS: u32 = 0x19;
    pub const ACP_WRITE_START: u32 = 0x1a;
    pub const ACP_WRITE_STATUS: u32 = 0x1b;
    pub const ACP_SET_LOCAL_WSTRB: u32 = 0x1c;
    pub const ACP_SET_REMOTE_WSTRB: u32 = 0x1d;
}

/// One of the four puzzle FIFOs. The index ends up in the instruction's `funct3` field, so it is
/// fixed in the instruction stream rather than passed in a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FifoId {
    Fifo0 = 0,
    Fifo1 = 1,
    Fifo2 = 2,
    Fifo3 = 3,
}

impl FifoId {
    /// All puzzle FIFOs, in index order.
    pub const ALL: [FifoId; 4] = [FifoId::Fifo0, FifoId::Fifo1, FifoId::Fifo2, FifoId::Fifo3];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// The burst size of an ACP transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AcpWidth {
    Bytes16 = 0,
    Bytes64 = 1,
}

/// One of the four local write-strobe lanes of the ACP port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WstrbLane {
    Lane0 = 0,
    Lane1 = 1,
    Lane2 = 2,
    Lane3 = 3,
}

/// Which remote write-strobe lanes an [Op::AcpSetRemoteWstrb] configures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteLanes {
    Lane0 = 0,
    AllLanes = 1,
}

/// The operand/result arity of an instruction. `rs1`/`rs2` are the input operands, `rd` the
/// result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// No inputs, no result.
    Unit,
    /// `rs1` only.
    In1,
    /// `rs1` and `rs2`.
    In2,
    /// `rd` only.
    Out,
    /// `rs1` in, `rd` out.
    In1Out,
    /// `rs1` and `rs2` in, `rd` out.
    In2Out,
}

impl Shape {
    /// The number of input operands.
    pub const fn inputs(self) -> u32 {
        match self {
            Shape::Unit | Shape::Out => 0,
            Shape::In1 | Shape::In1Out => 1,
            Shape::In2 | Shape::In2Out => 2,
        }
    }

    /// Whether the instruction writes a result register.
    pub const fn has_result(self) -> bool {
        matches!(self, Shape::Out | Shape::In1Out | Shape::In2Out)
    }
}

/// A single SP hardware transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    PuzzleFifoEmpty(FifoId),
    PuzzleFifoPop(FifoId),
    PuzzleFifoFull(FifoId),
    PuzzleFifoPush(FifoId),
    /// Not implemented by the current hardware, use [Op::RxMetaEmpty].
    RxMetaNelems,
    RxMetaPop,
    RxMetaEmpty,
    /// Starts a transfer from the RX data FIFO to memory: `rs1` = address, `rs2` = length.
    RxDataDmaStart,
    RxDataDmaStatus,
    /// Not implemented by the current hardware, use [Op::TxMetaFull].
    TxMetaNfree,
    TxMetaPush,
    TxMetaFull,
    TxDataCount,
    /// Starts a transfer from memory to the TX data FIFO: `rs1` = address, `rs2` = length.
    TxDataDmaStart,
    TxDataDmaStatus,
    /// `rs1` = register id, result = register value.
    LoadReg,
    /// `rs1` = register id, `rs2` = value.
    StoreReg,
    ReadTrigger,
    /// `rs1` is always zero, `rs2` carries the interrupt bits.
    Intr,
    /// `rs1` = local address, `rs2` = system address.
    AcpReadStart(AcpWidth),
    AcpReadStatus,
    /// `rs1` = local address, `rs2` = system address.
    AcpWriteStart(AcpWidth),
    AcpWriteStatus,
    AcpSetLocalWstrb(WstrbLane),
    AcpSetRemoteWstrb(RemoteLanes),
}

impl Op {
    /// The operation class selector.
    pub const fn funct7(self) -> u32 {
        use funct7::*;
        match self {
            Op::PuzzleFifoEmpty(_) => PUZZLE_FIFO_R_EMPTY,
            Op::PuzzleFifoPop(_) => PUZZLE_FIFO_R_POP,
            Op::PuzzleFifoFull(_) => PUZZLE_FIFO_W_FULL,
            Op::PuzzleFifoPush(_) => PUZZLE_FIFO_W_PUSH,
            Op::RxMetaNelems => RX_META_NELEMS,
            Op::RxMetaPop => RX_META_POP,
            Op::RxMetaEmpty => RX_META_EMPTY,
            Op::RxDataDmaStart => RX_DATA_DMA_START,
            Op::RxDataDmaStatus => RX_DATA_DMA_STATUS,
            Op::TxMetaNfree => TX_META_NFREE,
            Op::TxMetaPush => TX_META_PUSH,
            Op::TxMetaFull => TX_META_FULL,
            Op::TxDataCount => TX_DATA_COUNT,
            Op::TxDataDmaStart => TX_DATA_DMA_START,
            Op::TxDataDmaStatus => TX_DATA_DMA_STATUS,
            Op::LoadReg => COMMON_LOAD_REG,
            Op::StoreReg => COMMON_STORE_REG,
            Op::ReadTrigger => COMMON_READ_TRIGGER,
            Op::Intr => COMMON_INTR,
            Op::AcpReadStart(_) => ACP_READ_START,
            Op::AcpReadStatus => ACP_READ_STATUS,
            Op::AcpWriteStart(_) => ACP_WRITE_START,
            Op::AcpWriteStatus => ACP_WRITE_STATUS,
            Op::AcpSetLocalWstrb(_) => ACP_SET_LOCAL_WSTRB,
            Op::AcpSetRemoteWstrb(_) => ACP_SET_REMOTE_WSTRB,
        }
    }

    /// The variant selector within the operation class.
    pub const fn funct3(self) -> u32 {
        match self {
            Op::PuzzleFifoEmpty(fifo)
            | Op::PuzzleFifoPop(fifo)
            | Op::PuzzleFifoFull(fifo)
            | Op::PuzzleFifoPush(fifo) => fifo as u32,
            Op::AcpReadStart(width) | Op::AcpWriteStart(width) => width as u32,
            Op::AcpSetLocalWstrb(lane) => lane as u32,
            Op::AcpSetRemoteWstrb(lanes) => lanes as u32,
            _ => 0,
        }
    }

    pub const fn shape(self) -> Shape {
        match self {
            Op::PuzzleFifoEmpty(_)
            | Op::PuzzleFifoPop(_)
            | Op::PuzzleFifoFull(_)
            | Op::RxMetaNelems
            | Op::RxMetaPop
            | Op::RxMetaEmpty
            | Op::RxDataDmaStatus
            | Op::TxMetaNfree
            | Op::TxMetaFull
            | Op::TxDataCount
            | Op::TxDataDmaStatus
            | Op::ReadTrigger
            | Op::AcpReadStatus
            | Op::AcpWriteStatus => Shape::Out,
            Op::PuzzleFifoPush(_)
            | Op::TxMetaPush
            | Op::AcpSetLocalWstrb(_)
            | Op::AcpSetRemoteWstrb(_) => Shape::In1,
            Op::RxDataDmaStart
            | Op::TxDataDmaStart
            | Op::StoreReg
            | Op::Intr
            | Op::AcpReadStart(_)
            | Op::AcpWriteStart(_) => Shape::In2,
            Op::LoadReg => Shape::In1Out,
        }
    }

    /// Encodes this operation as a 32-bit R-type instruction word using the given register
    /// numbers. Register numbers are masked to 5 bits.
    pub const fn encode(self, rd: u32, rs1: u32, rs2: u32) -> u32 {
        (self.funct7() & 0x7f) << 25
            | (rs2 & 0x1f) << 20
            | (rs1 & 0x1f) << 15
            | (self.funct3() & 0x7) << 12
            | (rd & 0x1f) << 7
            | OPCODE_CUSTOM_0
    }
}

/// Executes SP instructions.
///
/// Every call is exactly one synchronous hardware transaction; there is no queueing or batching.
/// Transactions cannot fail. Misuse, such as popping an empty FIFO, is a contract violation on the
/// caller's side and is not reported.
pub trait Transact {
    /// Executes `op`. Operands the instruction's [Shape] does not consume are ignored, and the
    /// return value is meaningless for shapes without a result.
    fn transact(&mut self, op: Op, rs1: u32, rs2: u32) -> u32;
}

impl<T: Transact + ?Sized> Transact for &mut T {
    fn transact(&mut self, op: Op, rs1: u32, rs2: u32) -> u32 {
        (**self).transact(op, rs1, rs2)
    }
}
