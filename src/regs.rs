//! The SP register file, reachable through the load/store register instructions.

/// Set in the identifier of every register in the private register bank.
pub const PRIVATE_BANK_BIT: u32 = 1 << 8;

/// The bit in [Reg::Control] that the driver sets once it has finished initializing.
pub const CONTROL_ENABLE_BIT: u32 = 1 << 0;

/// The [Reg::Info] bits identifying which of the parallel SP instances is running.
pub const INFO_CORE_INDEX_MASK: u32 = 0xf;

/// A register identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg {
    Control = 0,
    /// AXI cache attributes for I/O transactions.
    IoAxiAxcache = (PRIVATE_BANK_BIT | 0) as isize,
    /// AXI cache attributes for DMA transactions.
    DmaAxiAxcache = (PRIVATE_BANK_BIT | 1) as isize,
    Reserved0 = (PRIVATE_BANK_BIT | 2) as isize,
    Reserved1 = (PRIVATE_BANK_BIT | 3) as isize,
    QpLsb = (PRIVATE_BANK_BIT | 4) as isize,
    QpMsb = (PRIVATE_BANK_BIT | 5) as isize,
    DataFifoSize = (PRIVATE_BANK_BIT | 6) as isize,
    DataFifoWidth = (PRIVATE_BANK_BIT | 7) as isize,
    Info = (PRIVATE_BANK_BIT | 8) as isize,
}

impl Reg {
    pub const ALL: [Reg; 10] = [
        Reg::Control,
        Reg::IoAxiAxcache,
        Reg::DmaAxiAxcache,
        Reg::Reserved0,
        Reg::Reserved1,
        Reg::QpLsb,
        Reg::QpMsb,
        Reg::DataFifoSize,
        Reg::DataFifoWidth,
        Reg::Info,
    ];

    /// The identifier passed in `rs1` of the load/store register instructions.
    pub const fn id(self) -> u32 {
        self as u32
    }

    pub fn from_id(id: u32) -> Option<Reg> {
        Reg::ALL.into_iter().find(|reg| reg.id() == id)
    }

    /// Whether firmware must never store to this register. Only the two cache attribute registers
    /// are writable; the enable bit in [Reg::Control] is owned by the driver.
    pub const fn is_read_only(self) -> bool {
        !matches!(self, Reg::IoAxiAxcache | Reg::DmaAxiAxcache)
    }
}

/// The AXI cache attributes used by the SP's own bus transactions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CachingConfig {
    pub io_axcache: u32,
    pub dma_axcache: u32,
}

/// The data FIFO geometry, read once after start-up.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SpConfig {
    pub data_fifo_size: u32,
    pub data_fifo_width: u32,
}

/// Identity of the running SP instance.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CoreInfo {
    pub index: u8,
}

impl CoreInfo {
    pub const fn from_info(info: u32) -> CoreInfo {
        CoreInfo {
            index: (info & INFO_CORE_INDEX_MASK) as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_bank_ids() {
        assert_eq!(Reg::Control.id(), 0);
        assert_eq!(Reg::IoAxiAxcache.id(), 0x100);
        assert_eq!(Reg::DataFifoSize.id(), 0x106);
        assert_eq!(Reg::DataFifoWidth.id(), 0x107);
        assert_eq!(Reg::Info.id(), 0x108);
    }

    #[test]
    fn id_round_trip() {
        for reg in Reg::ALL {
            assert_eq!(Reg::from_id(reg.id()), Some(reg));
        }
        assert_eq!(Reg::from_id(0x109), None);
        assert_eq!(Reg::from_id(1), None);
    }

    #[test]
    fn only_cache_registers_are_writable() {
        let writable: Vec<Reg> = Reg::ALL
            .into_iter()
            .filter(|reg| !reg.is_read_only())
            .collect();
        assert_eq!(writable, [Reg::IoAxiAxcache, Reg::DmaAxiAxcache]);
    }

    #[test]
    fn core_index_uses_low_nibble() {
        assert_eq!(CoreInfo::from_info(0xabcd_1235).index, 5);
    }
}
