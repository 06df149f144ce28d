use crate::regs::Reg;

/// Errors reported by the encoding paths and the register accessor.
///
/// Decoding never fails: every 32-bit input pattern has a defined interpretation. Encoding fails
/// whenever a value does not fit into its bit field, since truncating it would silently corrupt
/// what the DMA hardware sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A payload or buffer length does not fit into its length field.
    SizeOutOfRange { size: u32, max: u32 },
    /// An address does not fit into its `bits`-wide address field.
    AddressOutOfRange { addr: u64, bits: u32 },
    /// The match rank of an RX cookie is a 2-bit field.
    MatchRankOutOfRange(u8),
    /// A [crate::cookie::ChecksumEncoding::Unknown] value cannot be written back into a cookie.
    UnrepresentableChecksum(u8),
    /// An attempt to store to a register that is read-only to firmware.
    ReadOnlyRegister(Reg),
    /// A console transport was already installed.
    ConsoleAlreadyInstalled,
}

pub type Result<T> = core::result::Result<T, Error>;

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::SizeOutOfRange { size, max } => {
                write!(f, "size {size} exceeds the maximum of {max}")
            }
            Error::AddressOutOfRange { addr, bits } => {
                write!(f, "address {addr:#x} does not fit into {bits} bits")
            }
            Error::MatchRankOutOfRange(rank) => write!(f, "match rank {rank} exceeds 3"),
            Error::UnrepresentableChecksum(raw) => {
                write!(f, "checksum encoding {raw} cannot be encoded")
            }
            Error::ReadOnlyRegister(reg) => write!(f, "register {reg:?} is read-only"),
            Error::ConsoleAlreadyInstalled => write!(f, "a console is already installed"),
        }
    }
}

impl core::error::Error for Error {}
