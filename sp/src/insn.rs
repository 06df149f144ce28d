//! Issues the SP custom instructions on the actual core.
//!
//! Every instruction is emitted with `.insn r`, with its `funct3` and `funct7` selectors baked into
//! the instruction stream as `const` operands. Operations that are parameterized at the type level
//! (e.g. which puzzle FIFO to access) are expanded into one instruction per variant, and the
//! matching one is selected with a `match`. When the [Op] is a constant at the call site, as it is
//! for the pipelines, the `match` is folded away and only the single instruction remains.

use core::arch::asm;
use core::cell::Cell;
use critical_section::Mutex;
use prism::insn::{AcpWidth, FifoId, Op, RemoteLanes, Transact, WstrbLane, OPCODE_CUSTOM_0};

/// Emits the instruction `$op`, which must be a constant expression, with the given operand shape.
macro_rules! insn {
    (out, $op:expr) => {{
        let rd: u32;
        unsafe {
            asm!(
                ".insn r {opcode}, {funct3}, {funct7}, {rd}, x0, x0",
                opcode = const OPCODE_CUSTOM_0,
                funct3 = const $op.funct3(),
                funct7 = const $op.funct7(),
                rd = out(reg) rd,
                options(nostack),
            );
        }
        rd
    }};
    (in1, $op:expr, $rs1:expr) => {{
        unsafe {
            asm!(
                ".insn r {opcode}, {funct3}, {funct7}, x0, {rs1}, x0",
                opcode = const OPCODE_CUSTOM_0,
                funct3 = const $op.funct3(),
                funct7 = const $op.funct7(),
                rs1 = in(reg) $rs1,
                options(nostack),
            );
        }
        0
    }};
    (in2, $op:expr, $rs1:expr, $rs2:expr) => {{
        unsafe {
            asm!(
                ".insn r {opcode}, {funct3}, {funct7}, x0, {rs1}, {rs2}",
                opcode = const OPCODE_CUSTOM_0,
                funct3 = const $op.funct3(),
                funct7 = const $op.funct7(),
                rs1 = in(reg) $rs1,
                rs2 = in(reg) $rs2,
                options(nostack),
            );
        }
        0
    }};
    (in1_out, $op:expr, $rs1:expr) => {{
        let rd: u32;
        unsafe {
            asm!(
                ".insn r {opcode}, {funct3}, {funct7}, {rd}, {rs1}, x0",
                opcode = const OPCODE_CUSTOM_0,
                funct3 = const $op.funct3(),
                funct7 = const $op.funct7(),
                rd = out(reg) rd,
                rs1 = in(reg) $rs1,
                options(nostack),
            );
        }
        rd
    }};
}

/// Expands `Op::$variant($param)` for every value of a four-valued parameter.
macro_rules! insn_by_fifo {
    ($fifo:expr, $shape:ident, $variant:ident $(, $arg:expr)*) => {
        match $fifo {
            FifoId::Fifo0 => insn!($shape, Op::$variant(FifoId::Fifo0) $(, $arg)*),
            FifoId::Fifo1 => insn!($shape, Op::$variant(FifoId::Fifo1) $(, $arg)*),
            FifoId::Fifo2 => insn!($shape, Op::$variant(FifoId::Fifo2) $(, $arg)*),
            FifoId::Fifo3 => insn!($shape, Op::$variant(FifoId::Fifo3) $(, $arg)*),
        }
    };
}

macro_rules! insn_by_width {
    ($width:expr, $variant:ident, $rs1:expr, $rs2:expr) => {
        match $width {
            AcpWidth::Bytes16 => insn!(in2, Op::$variant(AcpWidth::Bytes16), $rs1, $rs2),
            AcpWidth::Bytes64 => insn!(in2, Op::$variant(AcpWidth::Bytes64), $rs1, $rs2),
        }
    };
}

static TAKEN: Mutex<Cell<bool>> = Mutex::new(Cell::new(false));

/// The SP instruction set of the running core.
pub struct SpCore {
    _private: (),
}

impl SpCore {
    /// Returns the core's instruction backend the first time it is called, and `None` afterwards.
    pub fn take() -> Option<SpCore> {
        critical_section::with(|cs| {
            let taken = TAKEN.borrow(cs);
            if taken.replace(true) {
                None
            } else {
                Some(SpCore { _private: () })
            }
        })
    }
}

impl Transact for SpCore {
    #[inline(always)]
    fn transact(&mut self, op: Op, rs1: u32, rs2: u32) -> u32 {
        match op {
            Op::PuzzleFifoEmpty(fifo) => insn_by_fifo!(fifo, out, PuzzleFifoEmpty),
            Op::PuzzleFifoPop(fifo) => insn_by_fifo!(fifo, out, PuzzleFifoPop),
            Op::PuzzleFifoFull(fifo) => insn_by_fifo!(fifo, out, PuzzleFifoFull),
            Op::PuzzleFifoPush(fifo) => insn_by_fifo!(fifo, in1, PuzzleFifoPush, rs1),
            Op::RxMetaNelems => insn!(out, Op::RxMetaNelems),
            Op::RxMetaPop => insn!(out, Op::RxMetaPop),
            Op::RxMetaEmpty => insn!(out, Op::RxMetaEmpty),
            Op::RxDataDmaStart => insn!(in2, Op::RxDataDmaStart, rs1, rs2),
            Op::RxDataDmaStatus => insn!(out, Op::RxDataDmaStatus),
            Op::TxMetaNfree => insn!(out, Op::TxMetaNfree),
            Op::TxMetaPush => insn!(in1, Op::TxMetaPush, rs1),
            Op::TxMetaFull => insn!(out, Op::TxMetaFull),
            Op::TxDataCount => insn!(out, Op::TxDataCount),
            Op::TxDataDmaStart => insn!(in2, Op::TxDataDmaStart, rs1, rs2),
            Op::TxDataDmaStatus => insn!(out, Op::TxDataDmaStatus),
            Op::LoadReg => insn!(in1_out, Op::LoadReg, rs1),
            Op::StoreReg => insn!(in2, Op::StoreReg, rs1, rs2),
            Op::ReadTrigger => insn!(out, Op::ReadTrigger),
            Op::Intr => insn!(in2, Op::Intr, rs1, rs2),
            Op::AcpReadStart(width) => insn_by_width!(width, AcpReadStart, rs1, rs2),
            Op::AcpReadStatus => insn!(out, Op::AcpReadStatus),
            Op::AcpWriteStart(width) => insn_by_width!(width, AcpWriteStart, rs1, rs2),
            Op::AcpWriteStatus => insn!(out, Op::AcpWriteStatus),
            Op::AcpSetLocalWstrb(lane) => match lane {
                WstrbLane::Lane0 => insn!(in1, Op::AcpSetLocalWstrb(WstrbLane::Lane0), rs1),
                WstrbLane::Lane1 => insn!(in1, Op::AcpSetLocalWstrb(WstrbLane::Lane1), rs1),
                WstrbLane::Lane2 => insn!(in1, Op::AcpSetLocalWstrb(WstrbLane::Lane2), rs1),
                WstrbLane::Lane3 => insn!(in1, Op::AcpSetLocalWstrb(WstrbLane::Lane3), rs1),
            },
            Op::AcpSetRemoteWstrb(lanes) => match lanes {
                RemoteLanes::Lane0 => {
                    insn!(in1, Op::AcpSetRemoteWstrb(RemoteLanes::Lane0), rs1)
                }
                RemoteLanes::AllLanes => {
                    insn!(in1, Op::AcpSetRemoteWstrb(RemoteLanes::AllLanes), rs1)
                }
            },
        }
    }
}
