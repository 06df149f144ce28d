//! A simulated SP unit for running the firmware logic on the host.
//!
//! [SimSp] models the four puzzle FIFOs and the register file closely enough to drive the
//! pipelines in tests. All other instructions are recorded (see [SimSp::last_request]) and return
//! a configurable status word.

use crate::insn::{FifoId, Op, Transact};
use crate::regs::Reg;
use heapless::Deque;
use log::trace;

/// The default depth of each simulated puzzle FIFO, in words.
pub const DEFAULT_FIFO_DEPTH: usize = 64;

const REG_COUNT: usize = Reg::ALL.len();

pub struct SimSp<const DEPTH: usize = DEFAULT_FIFO_DEPTH> {
    fifos: [Deque<u32, DEPTH>; 4],
    /// The number of words at which each FIFO reports full. Never more than `DEPTH`.
    capacity: [usize; 4],
    regs: [u32; REG_COUNT],
    pops: [u32; 4],
    pushes: [u32; 4],
    underflows: u32,
    overflows: u32,
    stores: u32,
    status: u32,
    last_request: Option<(Op, u32, u32)>,
}

impl SimSp {
    pub const fn new() -> SimSp {
        SimSp::with_depth()
    }
}

impl<const DEPTH: usize> SimSp<DEPTH> {
    /// Creates a unit whose puzzle FIFOs hold up to `DEPTH` words each.
    pub const fn with_depth() -> SimSp<DEPTH> {
        SimSp {
            fifos: [Deque::new(), Deque::new(), Deque::new(), Deque::new()],
            capacity: [DEPTH; 4],
            regs: [0; REG_COUNT],
            pops: [0; 4],
            pushes: [0; 4],
            underflows: 0,
            overflows: 0,
            stores: 0,
            status: 0,
            last_request: None,
        }
    }

    fn reg_slot(id: u32) -> Option<usize> {
        Reg::ALL.iter().position(|reg| reg.id() == id)
    }

    /// Sets a register as the hardware or the driver would, bypassing the read-only check.
    pub fn set_reg(&mut self, reg: Reg, value: u32) {
        if let Some(slot) = Self::reg_slot(reg.id()) {
            self.regs[slot] = value;
        }
    }

    pub fn reg(&self, reg: Reg) -> u32 {
        Self::reg_slot(reg.id()).map_or(0, |slot| self.regs[slot])
    }

    /// Limits the number of words `fifo` holds before it reports full.
    pub fn set_capacity(&mut self, fifo: FifoId, words: usize) {
        self.capacity[fifo.index()] = words.min(DEPTH);
    }

    /// Enqueues words on behalf of the hardware producer of `fifo`. Returns the number of words
    /// that fit.
    pub fn feed(&mut self, fifo: FifoId, words: &[u32]) -> usize {
        let mut fed = 0;
        for &word in words {
            if self.fifos[fifo.index()].len() >= self.capacity[fifo.index()]
                || self.fifos[fifo.index()].push_back(word).is_err()
            {
                break;
            }
            fed += 1;
        }
        fed
    }

    /// Dequeues a word on behalf of the hardware consumer of `fifo`.
    pub fn take(&mut self, fifo: FifoId) -> Option<u32> {
        self.fifos[fifo.index()].pop_front()
    }

    /// The words currently queued in `fifo`, oldest first.
    pub fn queued(&self, fifo: FifoId) -> impl Iterator<Item = u32> + '_ {
        self.fifos[fifo.index()].iter().copied()
    }

    pub fn queued_len(&self, fifo: FifoId) -> usize {
        self.fifos[fifo.index()].len()
    }

    /// The number of words firmware popped from `fifo`.
    pub fn pops(&self, fifo: FifoId) -> u32 {
        self.pops[fifo.index()]
    }

    /// The number of words firmware pushed to `fifo`.
    pub fn pushes(&self, fifo: FifoId) -> u32 {
        self.pushes[fifo.index()]
    }

    /// Pops issued against an empty FIFO.
    pub fn underflows(&self) -> u32 {
        self.underflows
    }

    /// Pushes issued against a full FIFO. The pushed word is dropped.
    pub fn overflows(&self) -> u32 {
        self.overflows
    }

    /// The number of register stores that reached the register file.
    pub fn stores(&self) -> u32 {
        self.stores
    }

    /// Sets the value returned by status, count and trigger instructions.
    pub fn set_status(&mut self, status: u32) {
        self.status = status;
    }

    /// The most recent instruction that is neither a puzzle FIFO nor a register access.
    pub fn last_request(&self) -> Option<(Op, u32, u32)> {
        self.last_request
    }
}

impl<const DEPTH: usize> Default for SimSp<DEPTH> {
    fn default() -> Self {
        Self::with_depth()
    }
}

impl<const DEPTH: usize> Transact for SimSp<DEPTH> {
    fn transact(&mut self, op: Op, rs1: u32, rs2: u32) -> u32 {
        match op {
            Op::PuzzleFifoEmpty(fifo) => self.fifos[fifo.index()].is_empty() as u32,
            Op::PuzzleFifoFull(fifo) => {
                (self.fifos[fifo.index()].len() >= self.capacity[fifo.index()]) as u32
            }
            Op::PuzzleFifoPop(fifo) => match self.fifos[fifo.index()].pop_front() {
                Some(word) => {
                    self.pops[fifo.index()] += 1;
                    word
                }
                None => {
                    self.underflows += 1;
                    0
                }
            },
            Op::PuzzleFifoPush(fifo) => {
                let queue = &mut self.fifos[fifo.index()];
                if queue.len() >= self.capacity[fifo.index()] || queue.push_back(rs1).is_err() {
                    self.overflows += 1;
                } else {
                    self.pushes[fifo.index()] += 1;
                }
                0
            }
            Op::LoadReg => Self::reg_slot(rs1).map_or(0, |slot| self.regs[slot]),
            Op::StoreReg => {
                if let Some(slot) = Self::reg_slot(rs1) {
                    self.regs[slot] = rs2;
                    self.stores += 1;
                }
                0
            }
            _ => {
                trace!("sim: {op:?} rs1={rs1:#x} rs2={rs2:#x}");
                self.last_request = Some((op, rs1, rs2));
                self.status
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_limits_full_flag() {
        let mut sim = SimSp::<8>::with_depth();
        sim.set_capacity(FifoId::Fifo2, 2);
        assert_eq!(sim.feed(FifoId::Fifo2, &[1, 2, 3]), 2);
        assert_eq!(sim.transact(Op::PuzzleFifoFull(FifoId::Fifo2), 0, 0), 1);
        assert_eq!(sim.take(FifoId::Fifo2), Some(1));
        assert_eq!(sim.transact(Op::PuzzleFifoFull(FifoId::Fifo2), 0, 0), 0);
    }

    #[test]
    fn pop_on_empty_counts_underflow() {
        let mut sim = SimSp::new();
        assert_eq!(sim.transact(Op::PuzzleFifoPop(FifoId::Fifo0), 0, 0), 0);
        assert_eq!(sim.underflows(), 1);
        assert_eq!(sim.pops(FifoId::Fifo0), 0);
    }

    #[test]
    fn push_on_full_counts_overflow() {
        let mut sim = SimSp::<2>::with_depth();
        sim.transact(Op::PuzzleFifoPush(FifoId::Fifo1), 7, 0);
        sim.transact(Op::PuzzleFifoPush(FifoId::Fifo1), 8, 0);
        sim.transact(Op::PuzzleFifoPush(FifoId::Fifo1), 9, 0);
        assert_eq!(sim.overflows(), 1);
        assert_eq!(sim.queued(FifoId::Fifo1).collect::<Vec<_>>(), [7, 8]);
    }

    #[test]
    fn unknown_register_reads_zero() {
        let mut sim = SimSp::new();
        assert_eq!(sim.transact(Op::LoadReg, 0x1ff, 0), 0);
        sim.transact(Op::StoreReg, 0x1ff, 5);
        assert_eq!(sim.stores(), 0);
    }
}
