//! Pack/unpack routines for the 4-word job cookies exchanged between pipeline stages.
//!
//! A cookie is 128 bits of wire data, transferred as four 32-bit words (word 0 first). Bit `n` of
//! the cookie is bit `n % 32` of word `n / 32`. The layout shared by both directions is:
//!
//! | bits     | width | field                                   |
//! |----------|-------|-----------------------------------------|
//! | 0..40    | 40    | system address                          |
//! | 40..80   | 40    | local data buffer address               |
//! | 80..94   | 14    | payload size                            |
//! | 94..     |       | direction-specific flags ([CookieFlags]) |
//!
//! Decoding is total: bits outside of every field are ignored. Encoding zero-fills those bits and
//! rejects values that do not fit into their fields, since a truncated field would shift the
//! meaning of what the DMA hardware reads.

use crate::{Error, Result};
use bitvec::prelude::*;

/// The cookie bits, with bit 0 being the LSB of word 0.
pub type CookieBits = BitSlice<u32, Lsb0>;

/// The width of the system and local address fields.
pub const ADDR_WIDTH: usize = 40;
pub const SYS_ADDR_BITN: usize = 0;
pub const DATA_ADDR_BITN: usize = SYS_ADDR_BITN + ADDR_WIDTH;
pub const SIZE_BITN: usize = DATA_ADDR_BITN + ADDR_WIDTH;
pub const SIZE_WIDTH: usize = 14;
/// The first flag bit. Both directions place `wrap` here, followed by `fcs`/`eof`.
pub const FLAGS_BITN: usize = SIZE_BITN + SIZE_WIDTH;
/// The first bit of word 3.
pub const WORD3_BITN: usize = 96;

/// The largest payload size a cookie can carry.
pub const MAX_SIZE: u16 = (1 << SIZE_WIDTH) - 1;
/// The largest address a cookie can carry.
pub const MAX_ADDR: u64 = (1 << ADDR_WIDTH) - 1;

/// How the GEM should treat or has treated the frame checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChecksumEncoding {
    #[default]
    None,
    Ip,
    Tcp,
    Udp,
    /// A raw value outside of the 2-bit encoding. Never produced from a cookie, but from wider
    /// status fields.
    Unknown(u8),
}

impl ChecksumEncoding {
    pub const fn from_raw(raw: u8) -> ChecksumEncoding {
        match raw {
            0 => ChecksumEncoding::None,
            1 => ChecksumEncoding::Ip,
            2 => ChecksumEncoding::Tcp,
            3 => ChecksumEncoding::Udp,
            other => ChecksumEncoding::Unknown(other),
        }
    }

    /// The 2-bit field value.
    pub const fn to_raw(self) -> Result<u8> {
        match self {
            ChecksumEncoding::None => Ok(0),
            ChecksumEncoding::Ip => Ok(1),
            ChecksumEncoding::Tcp => Ok(2),
            ChecksumEncoding::Udp => Ok(3),
            ChecksumEncoding::Unknown(raw) => Err(Error::UnrepresentableChecksum(raw)),
        }
    }

    /// The mnemonic used in the trace output.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            ChecksumEncoding::None => "-",
            ChecksumEncoding::Ip => "IP",
            ChecksumEncoding::Tcp => "TCP",
            ChecksumEncoding::Udp => "UDP",
            ChecksumEncoding::Unknown(_) => "?",
        }
    }
}

impl core::fmt::Display for ChecksumEncoding {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// The direction-specific flag set of a cookie, stored from [FLAGS_BITN] onwards.
///
/// The [core::fmt::Display] implementation renders the flags the way the trace line shows them:
/// one space-prefixed mnemonic per flag.
pub trait CookieFlags: Copy + core::fmt::Debug + core::fmt::Display + PartialEq {
    /// The bits of each word covered by a field. Bits outside the mask are zero after encoding.
    const DEFINED_MASK: [u32; 4];

    fn decode(bits: &CookieBits) -> Self;

    /// Writes the flags into `bits`, which the caller has zero-filled.
    fn encode(&self, bits: &mut CookieBits) -> Result<()>;
}

/// A decoded job cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobCookie<F> {
    /// The (up to 40-bit) system address of the packet buffer.
    pub sys_addr: u64,
    /// The 40-bit address of the local data buffer.
    pub data_addr: u64,
    /// The payload size in bytes.
    pub size: u16,
    pub flags: F,
}

pub type RxCookie = JobCookie<RxFlags>;
pub type TxCookie = JobCookie<TxFlags>;

impl<F: CookieFlags> JobCookie<F> {
    pub fn decode(words: [u32; 4]) -> JobCookie<F> {
        let bits = BitArray::<[u32; 4], Lsb0>::new(words);
        JobCookie {
            sys_addr: bits[SYS_ADDR_BITN..DATA_ADDR_BITN].load_le::<u64>(),
            data_addr: bits[DATA_ADDR_BITN..SIZE_BITN].load_le::<u64>(),
            size: bits[SIZE_BITN..FLAGS_BITN].load_le::<u16>(),
            flags: F::decode(&bits),
        }
    }

    pub fn encode(&self) -> Result<[u32; 4]> {
        check_addr(self.sys_addr)?;
        check_addr(self.data_addr)?;
        if self.size > MAX_SIZE {
            return Err(Error::SizeOutOfRange {
                size: self.size as u32,
                max: MAX_SIZE as u32,
            });
        }
        let mut bits = BitArray::<[u32; 4], Lsb0>::ZERO;
        bits[SYS_ADDR_BITN..DATA_ADDR_BITN].store_le(self.sys_addr);
        bits[DATA_ADDR_BITN..SIZE_BITN].store_le(self.data_addr);
        bits[SIZE_BITN..FLAGS_BITN].store_le(self.size);
        self.flags.encode(&mut bits)?;
        Ok(bits.into_inner())
    }
}

fn check_addr(addr: u64) -> Result<()> {
    if addr > MAX_ADDR {
        return Err(Error::AddressOutOfRange {
            addr,
            bits: ADDR_WIDTH as u32,
        });
    }
    Ok(())
}

/// Flags of a received frame, as reported by the GEM RX path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RxFlags {
    /// The descriptor is the last one in the ring.
    pub wrap: bool,
    /// The frame still carries its FCS.
    pub fcs: bool,
    /// Start of frame.
    pub sof: bool,
    /// End of frame.
    pub eof: bool,
    /// VLAN canonical format indicator.
    pub cfi: bool,
    /// Priority tagged.
    pub prty: bool,
    /// VLAN tagged.
    pub vlan: bool,
    pub checksum: ChecksumEncoding,
    /// Zero-based index of the specific address register that matched. The trace shows it
    /// one-based.
    pub match_rank: u8,
    /// The destination matched a specific address register.
    pub add_match: bool,
    /// The external address match signal was asserted.
    pub ext_match: bool,
    pub uni_hash_match: bool,
    pub mult_hash_match: bool,
    pub broadcast: bool,
}

mod rx_bits {
    use super::{FLAGS_BITN, WORD3_BITN};

    pub const WRAP: usize = FLAGS_BITN;
    pub const FCS: usize = FLAGS_BITN + 1;
    pub const SOF: usize = WORD3_BITN;
    pub const EOF: usize = WORD3_BITN + 1;
    pub const CFI: usize = WORD3_BITN + 2;
    pub const PRTY: usize = WORD3_BITN + 3;
    pub const VLAN: usize = WORD3_BITN + 4;
    pub const CHKSUM: usize = WORD3_BITN + 5;
    pub const CHKSUM_WIDTH: usize = 2;
    pub const MATCH: usize = CHKSUM + CHKSUM_WIDTH;
    pub const MATCH_WIDTH: usize = 2;
    pub const ADD_MATCH: usize = MATCH + MATCH_WIDTH;
    pub const EXT_MATCH: usize = ADD_MATCH + 1;
    pub const UNI_HASH_MATCH: usize = ADD_MATCH + 2;
    pub const MULT_HASH_MATCH: usize = ADD_MATCH + 3;
    pub const BROADCAST: usize = ADD_MATCH + 4;
    pub const END: usize = BROADCAST + 1;
}

impl CookieFlags for RxFlags {
    const DEFINED_MASK: [u32; 4] = [
        u32::MAX,
        u32::MAX,
        u32::MAX,
        (1 << (rx_bits::END - WORD3_BITN)) - 1,
    ];

    fn decode(bits: &CookieBits) -> RxFlags {
        use rx_bits::*;
        RxFlags {
            wrap: bits[WRAP],
            fcs: bits[FCS],
            sof: bits[SOF],
            eof: bits[EOF],
            cfi: bits[CFI],
            prty: bits[PRTY],
            vlan: bits[VLAN],
            checksum: ChecksumEncoding::from_raw(bits[CHKSUM..MATCH].load_le::<u8>()),
            match_rank: bits[MATCH..ADD_MATCH].load_le::<u8>(),
            add_match: bits[ADD_MATCH],
            ext_match: bits[EXT_MATCH],
            uni_hash_match: bits[UNI_HASH_MATCH],
            mult_hash_match: bits[MULT_HASH_MATCH],
            broadcast: bits[BROADCAST],
        }
    }

    fn encode(&self, bits: &mut CookieBits) -> Result<()> {
        use rx_bits::*;
        if self.match_rank > 3 {
            return Err(Error::MatchRankOutOfRange(self.match_rank));
        }
        bits.set(WRAP, self.wrap);
        bits.set(FCS, self.fcs);
        bits.set(SOF, self.sof);
        bits.set(EOF, self.eof);
        bits.set(CFI, self.cfi);
        bits.set(PRTY, self.prty);
        bits.set(VLAN, self.vlan);
        bits[CHKSUM..MATCH].store_le(self.checksum.to_raw()?);
        bits[MATCH..ADD_MATCH].store_le(self.match_rank);
        bits.set(ADD_MATCH, self.add_match);
        bits.set(EXT_MATCH, self.ext_match);
        bits.set(UNI_HASH_MATCH, self.uni_hash_match);
        bits.set(MULT_HASH_MATCH, self.mult_hash_match);
        bits.set(BROADCAST, self.broadcast);
        Ok(())
    }
}

/// Writes `" <name>"` when `set`.
fn flag(f: &mut core::fmt::Formatter<'_>, set: bool, name: &str) -> core::fmt::Result {
    if set {
        write!(f, " {name}")?;
    }
    Ok(())
}

impl core::fmt::Display for RxFlags {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        flag(f, self.wrap, "wrap")?;
        flag(f, self.fcs, "fcs")?;
        flag(f, self.sof, "sof")?;
        flag(f, self.eof, "eof")?;
        flag(f, self.cfi, "cfi")?;
        flag(f, self.prty, "prty")?;
        flag(f, self.vlan, "vlan")?;
        write!(f, " chksum={}", self.checksum)?;
        write!(f, " match={}", self.match_rank as u32 + 1)?;
        flag(f, self.add_match, "add_match")?;
        flag(f, self.ext_match, "ext_match")?;
        flag(f, self.uni_hash_match, "uni_hash_match")?;
        flag(f, self.mult_hash_match, "mult_hash_match")?;
        flag(f, self.broadcast, "broadcast")
    }
}

/// Flags of a frame to transmit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TxFlags {
    /// The descriptor is the last one in the ring.
    pub wrap: bool,
    /// Last buffer of the frame.
    pub eof: bool,
    /// The GEM must not append a CRC.
    pub nocrc: bool,
}

mod tx_bits {
    use super::{FLAGS_BITN, WORD3_BITN};

    pub const WRAP: usize = FLAGS_BITN;
    pub const EOF: usize = WRAP + 1;
    pub const NOCRC: usize = WORD3_BITN;
}

impl CookieFlags for TxFlags {
    const DEFINED_MASK: [u32; 4] = [u32::MAX, u32::MAX, u32::MAX, 1];

    fn decode(bits: &CookieBits) -> TxFlags {
        TxFlags {
            wrap: bits[tx_bits::WRAP],
            eof: bits[tx_bits::EOF],
            nocrc: bits[tx_bits::NOCRC],
        }
    }

    fn encode(&self, bits: &mut CookieBits) -> Result<()> {
        bits.set(tx_bits::WRAP, self.wrap);
        bits.set(tx_bits::EOF, self.eof);
        bits.set(tx_bits::NOCRC, self.nocrc);
        Ok(())
    }
}

impl core::fmt::Display for TxFlags {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        flag(f, self.wrap, "wrap")?;
        flag(f, self.eof, "eof")?;
        flag(f, self.nocrc, "nocrc")
    }
}
