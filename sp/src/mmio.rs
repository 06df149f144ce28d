//! Volatile access to memory-mapped peripherals outside of the SP.

/// Reads the 32-bit register at `base + offset`.
///
/// # Safety
///
/// `base + offset` must be the address of a readable 32-bit device register.
#[inline]
pub unsafe fn read(base: usize, offset: usize) -> u32 {
    ((base + offset) as *const u32).read_volatile()
}

/// Writes the 32-bit register at `base + offset`.
///
/// # Safety
///
/// `base + offset` must be the address of a writable 32-bit device register, and writing `value`
/// to it must not break any other owner of the device.
#[inline]
pub unsafe fn write(base: usize, offset: usize, value: u32) {
    ((base + offset) as *mut u32).write_volatile(value)
}

/// The CCI-400 interconnect's register block.
const CCI_BASE: usize = 0xfd6e_0000;
/// Snoop_Control_Register_S3, for the slave interface the SP's ACP traffic enters through.
const CCI_SNOOP_CONTROL_S3_OFFSET: usize = 0x4000;
const CCI_SNOOP_CONTROL_ENABLE_SNOOPS: u32 = 1 << 0;

/// Enables snooping for the SP's coherent transactions in the CCI.
pub fn enable_snoops() {
    unsafe {
        write(
            CCI_BASE,
            CCI_SNOOP_CONTROL_S3_OFFSET,
            CCI_SNOOP_CONTROL_ENABLE_SNOOPS,
        )
    };
}
