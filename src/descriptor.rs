//! Field extraction for the GEM DMA ring descriptors and the GEM's wide RX status word.
//!
//! The GEM (the Cadence Gigabit Ethernet MAC in the Zynq UltraScale+) walks rings of two-word
//! descriptors. The firmware never owns descriptor memory; it only derives fields from descriptor
//! words it has been handed, and builds the TX words the SP forwards to the MAC. See the Zynq
//! UltraScale+ TRM (UG1085), "Gigabit Ethernet MAC", for the authoritative layouts.

use crate::cookie::ChecksumEncoding;
use crate::{Error, Result};
use bitvec::prelude::*;

const fn bit(word: u32, bitn: u32) -> bool {
    (word >> bitn) & 1 == 1
}

const fn field(word: u32, bitn: u32, width: u32) -> u32 {
    (word >> bitn) & ((1 << width) - 1)
}

mod rx_dd {
    pub const VALID_BITN: u32 = 0;
    pub const WRAP_BITN: u32 = 1;
    pub const ADDR_MASK: u32 = !0x3;

    pub const FRAME_LENGTH_BITN: u32 = 0;
    pub const FRAME_LENGTH_WIDTH: u32 = 13;
    pub const SOF_BITN: u32 = 14;
    pub const EOF_BITN: u32 = 15;
    pub const CFI_BITN: u32 = 16;
    pub const TCI_BITN: u32 = 17;
    pub const TCI_WIDTH: u32 = 3;
    pub const PRTY_TAGGED_BITN: u32 = 20;
    pub const VLAN_TAGGED_BITN: u32 = 21;
    pub const TYPEID_BITN: u32 = 22;
    pub const TYPEID_WIDTH: u32 = 2;
    pub const TYPEID_MATCH_BITN: u32 = 24;
    pub const SA_MATCH_BITN: u32 = 25;
    pub const SA_MATCH_WIDTH: u32 = 2;
    pub const SA_MATCH_VALID_BITN: u32 = 27;
    pub const EXT_MATCH_BITN: u32 = 28;
    pub const UNI_HASH_MATCH_BITN: u32 = 29;
    pub const MULT_HASH_MATCH_BITN: u32 = 30;
    pub const BROADCAST_BITN: u32 = 31;
}

/// An RX ring descriptor, as written back by the GEM after receiving into its buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RxDescriptor {
    pub word0: u32,
    pub word1: u32,
}

impl RxDescriptor {
    pub const fn from_words(words: [u32; 2]) -> RxDescriptor {
        RxDescriptor {
            word0: words[0],
            word1: words[1],
        }
    }

    /// The buffer address. Its two low bits are taken by [RxDescriptor::valid] and
    /// [RxDescriptor::wrap], so buffers are always 4-byte aligned.
    pub const fn addr(&self) -> u32 {
        self.word0 & rx_dd::ADDR_MASK
    }

    /// Set by the GEM once the buffer has been filled (the "used" bit in the TRM).
    pub const fn valid(&self) -> bool {
        bit(self.word0, rx_dd::VALID_BITN)
    }

    /// The descriptor is the last one in the ring.
    pub const fn wrap(&self) -> bool {
        bit(self.word0, rx_dd::WRAP_BITN)
    }

    pub const fn frame_length(&self) -> u32 {
        field(
            self.word1,
            rx_dd::FRAME_LENGTH_BITN,
            rx_dd::FRAME_LENGTH_WIDTH,
        )
    }

    pub const fn sof(&self) -> bool {
        bit(self.word1, rx_dd::SOF_BITN)
    }

    pub const fn eof(&self) -> bool {
        bit(self.word1, rx_dd::EOF_BITN)
    }

    pub const fn cfi(&self) -> bool {
        bit(self.word1, rx_dd::CFI_BITN)
    }

    /// The VLAN priority of a tagged frame.
    pub const fn vlan_priority(&self) -> u8 {
        field(self.word1, rx_dd::TCI_BITN, rx_dd::TCI_WIDTH) as u8
    }

    pub const fn prty_tagged(&self) -> bool {
        bit(self.word1, rx_dd::PRTY_TAGGED_BITN)
    }

    pub const fn vlan_tagged(&self) -> bool {
        bit(self.word1, rx_dd::VLAN_TAGGED_BITN)
    }

    /// When receive checksum offload is enabled, the type-id field reports the checksum the GEM
    /// verified. Otherwise it holds the index of the matching type-id register.
    pub const fn checksum(&self) -> ChecksumEncoding {
        ChecksumEncoding::from_raw(
            field(self.word1, rx_dd::TYPEID_BITN, rx_dd::TYPEID_WIDTH) as u8,
        )
    }

    pub const fn typeid_match(&self) -> bool {
        bit(self.word1, rx_dd::TYPEID_MATCH_BITN)
    }

    /// The zero-based index of the specific address register that matched, if any did.
    pub const fn specific_address_match(&self) -> Option<u8> {
        if bit(self.word1, rx_dd::SA_MATCH_VALID_BITN) {
            Some(field(self.word1, rx_dd::SA_MATCH_BITN, rx_dd::SA_MATCH_WIDTH) as u8)
        } else {
            None
        }
    }

    pub const fn ext_match(&self) -> bool {
        bit(self.word1, rx_dd::EXT_MATCH_BITN)
    }

    pub const fn uni_hash_match(&self) -> bool {
        bit(self.word1, rx_dd::UNI_HASH_MATCH_BITN)
    }

    pub const fn mult_hash_match(&self) -> bool {
        bit(self.word1, rx_dd::MULT_HASH_MATCH_BITN)
    }

    pub const fn broadcast(&self) -> bool {
        bit(self.word1, rx_dd::BROADCAST_BITN)
    }
}

mod tx_dd {
    pub const LENGTH_MASK: u32 = 0x3fff;
    pub const EOF_BITN: u32 = 15;
    pub const NOCRC_BITN: u32 = 16;
    pub const WRAP_BITN: u32 = 30;
    pub const USED_BITN: u32 = 31;
}

/// The largest buffer a TX descriptor can describe.
pub const TX_MAX_LENGTH: u32 = tx_dd::LENGTH_MASK;

/// A TX ring descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TxDescriptor {
    pub word0: u32,
    pub word1: u32,
}

impl TxDescriptor {
    /// Builds a descriptor that is still owned by the GEM, i.e. with the used bit clear.
    pub fn new(addr: u32, length: u32, eof: bool, nocrc: bool, wrap: bool) -> Result<TxDescriptor> {
        if length > TX_MAX_LENGTH {
            return Err(Error::SizeOutOfRange {
                size: length,
                max: TX_MAX_LENGTH,
            });
        }
        Ok(TxDescriptor {
            word0: addr,
            word1: length
                | (eof as u32) << tx_dd::EOF_BITN
                | (nocrc as u32) << tx_dd::NOCRC_BITN
                | (wrap as u32) << tx_dd::WRAP_BITN,
        })
    }

    pub const fn from_words(words: [u32; 2]) -> TxDescriptor {
        TxDescriptor {
            word0: words[0],
            word1: words[1],
        }
    }

    pub const fn to_words(&self) -> [u32; 2] {
        [self.word0, self.word1]
    }

    pub const fn addr(&self) -> u32 {
        self.word0
    }

    pub const fn length(&self) -> u32 {
        self.word1 & tx_dd::LENGTH_MASK
    }

    /// Last buffer of the frame.
    pub const fn eof(&self) -> bool {
        bit(self.word1, tx_dd::EOF_BITN)
    }

    pub const fn nocrc(&self) -> bool {
        bit(self.word1, tx_dd::NOCRC_BITN)
    }

    pub const fn wrap(&self) -> bool {
        bit(self.word1, tx_dd::WRAP_BITN)
    }

    /// Set by the GEM once the buffer has been transmitted.
    pub const fn used(&self) -> bool {
        bit(self.word1, tx_dd::USED_BITN)
    }
}

/// The length of a frame in an RX meta FIFO word.
pub const fn rx_meta_length(desc: u32) -> u32 {
    desc & 0x1fff
}

/// The checksum the GEM verified for the frame of an RX meta FIFO word.
pub const fn rx_meta_checksum(desc: u32) -> ChecksumEncoding {
    ChecksumEncoding::from_raw(field(desc, 22, 2) as u8)
}

const TX_META_NOCRC_BITN: u32 = 31;

/// Builds the word pushed to the TX meta FIFO for a frame of `length` bytes.
pub fn tx_meta_descriptor(length: u32, nocrc: bool) -> Result<u32> {
    if length > TX_MAX_LENGTH {
        return Err(Error::SizeOutOfRange {
            size: length,
            max: TX_MAX_LENGTH,
        });
    }
    Ok(length | (nocrc as u32) << TX_META_NOCRC_BITN)
}

/// The GEM's 45-bit wide RX status, delivered alongside each frame on the external FIFO interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RxStatus(pub u64);

impl RxStatus {
    pub const WIDTH: usize = 45;

    const FRAME_LENGTH: core::ops::Range<usize> = 0..14;
    const BAD_FRAME: usize = 14;
    const VLAN_TAGGED: usize = 15;
    const TCI: core::ops::Range<usize> = 16..20;
    const PRTY_TAGGED: usize = 20;
    const BROADCAST: usize = 21;
    const MULT_HASH_MATCH: usize = 22;
    const UNI_HASH_MATCH: usize = 23;
    const EXT_MATCH: core::ops::Range<usize> = 24..28;
    const ADD_MATCH: core::ops::Range<usize> = 28..32;
    const TYPE_MATCH: core::ops::Range<usize> = 32..36;
    const CHECKSUM: core::ops::Range<usize> = 36..39;
    const SNAP_MATCH: usize = 39;
    const LENGTH_ERROR: usize = 40;
    const CRC_ERROR: usize = 41;
    const TOO_SHORT: usize = 42;
    const TOO_LONG: usize = 43;
    const CODE_ERROR: usize = 44;

    fn bits(&self) -> &BitSlice<u64, Lsb0> {
        &self.0.view_bits::<Lsb0>()[..Self::WIDTH]
    }

    pub fn frame_length(&self) -> u16 {
        self.bits()[Self::FRAME_LENGTH].load_le()
    }

    pub fn bad_frame(&self) -> bool {
        self.bits()[Self::BAD_FRAME]
    }

    pub fn vlan_tagged(&self) -> bool {
        self.bits()[Self::VLAN_TAGGED]
    }

    pub fn tci(&self) -> u8 {
        self.bits()[Self::TCI].load_le()
    }

    pub fn prty_tagged(&self) -> bool {
        self.bits()[Self::PRTY_TAGGED]
    }

    pub fn broadcast(&self) -> bool {
        self.bits()[Self::BROADCAST]
    }

    pub fn mult_hash_match(&self) -> bool {
        self.bits()[Self::MULT_HASH_MATCH]
    }

    pub fn uni_hash_match(&self) -> bool {
        self.bits()[Self::UNI_HASH_MATCH]
    }

    /// One bit per external match input, bit 0 being input 1.
    pub fn ext_match(&self) -> u8 {
        self.bits()[Self::EXT_MATCH].load_le()
    }

    /// One bit per specific address register, bit 0 being register 1.
    pub fn add_match(&self) -> u8 {
        self.bits()[Self::ADD_MATCH].load_le()
    }

    /// One bit per type-id register, bit 0 being register 1.
    pub fn type_match(&self) -> u8 {
        self.bits()[Self::TYPE_MATCH].load_le()
    }

    /// The verified checksum. The GEM sets at most one of the IP/TCP/UDP bits; any other
    /// combination is reported as [ChecksumEncoding::Unknown] carrying the raw 3-bit field.
    pub fn checksum(&self) -> ChecksumEncoding {
        let raw: u8 = self.bits()[Self::CHECKSUM].load_le();
        match raw {
            0b000 => ChecksumEncoding::None,
            0b001 => ChecksumEncoding::Ip,
            0b010 => ChecksumEncoding::Tcp,
            0b100 => ChecksumEncoding::Udp,
            other => ChecksumEncoding::Unknown(other),
        }
    }

    pub fn snap_match(&self) -> bool {
        self.bits()[Self::SNAP_MATCH]
    }

    pub fn length_error(&self) -> bool {
        self.bits()[Self::LENGTH_ERROR]
    }

    pub fn crc_error(&self) -> bool {
        self.bits()[Self::CRC_ERROR]
    }

    pub fn too_short(&self) -> bool {
        self.bits()[Self::TOO_SHORT]
    }

    pub fn too_long(&self) -> bool {
        self.bits()[Self::TOO_LONG]
    }

    pub fn code_error(&self) -> bool {
        self.bits()[Self::CODE_ERROR]
    }

    /// Whether any of the receive error bits is set.
    pub fn has_error(&self) -> bool {
        self.bad_frame()
            || self.length_error()
            || self.crc_error()
            || self.too_short()
            || self.too_long()
            || self.code_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::example_data::{GEM_RX_DESCRIPTOR, GEM_TX_DESCRIPTOR};

    #[test]
    fn rx_descriptor_fields() {
        let desc = RxDescriptor::from_words(GEM_RX_DESCRIPTOR);
        assert_eq!(desc.addr(), 0x4000_0000);
        assert!(desc.valid());
        assert!(desc.wrap());
        assert_eq!(desc.frame_length(), 64);
        assert!(desc.sof() && desc.eof());
        assert!(desc.broadcast());
        assert!(!desc.vlan_tagged() && !desc.cfi());
        assert_eq!(desc.specific_address_match(), None);
        assert_eq!(desc.checksum(), ChecksumEncoding::None);
    }

    #[test]
    fn rx_descriptor_vlan_and_match() {
        // VLAN priority 5, tagged, TCP checksum, specific address register 3 matched.
        let word1 = 5 << 17 | 1 << 21 | 2 << 22 | 2 << 25 | 1 << 27;
        let desc = RxDescriptor::from_words([0x1000, word1]);
        assert_eq!(desc.vlan_priority(), 5);
        assert!(desc.vlan_tagged());
        assert!(!desc.prty_tagged());
        assert_eq!(desc.checksum(), ChecksumEncoding::Tcp);
        assert_eq!(desc.specific_address_match(), Some(2));
        assert!(!desc.ext_match() && !desc.uni_hash_match() && !desc.mult_hash_match());
        assert!(!desc.valid());
    }

    #[test]
    fn rx_descriptor_length_is_13_bits() {
        let desc = RxDescriptor::from_words([0, 0xffff_ffff]);
        assert_eq!(desc.frame_length(), 0x1fff);
    }

    #[test]
    fn tx_descriptor_fields() {
        let desc = TxDescriptor::from_words(GEM_TX_DESCRIPTOR);
        assert_eq!(desc.addr(), 0x4000_1000);
        assert_eq!(desc.length(), 1514);
        assert!(desc.eof());
        assert!(desc.used());
        assert!(!desc.nocrc() && !desc.wrap());
    }

    #[test]
    fn tx_descriptor_new() {
        let desc = TxDescriptor::new(0x8000, 60, true, true, true).unwrap();
        assert_eq!(desc.to_words(), [0x8000, 0x4001_803c]);
        assert!(!desc.used());
        assert_eq!(
            TxDescriptor::new(0, 0x4000, true, false, false),
            Err(Error::SizeOutOfRange {
                size: 0x4000,
                max: 0x3fff
            })
        );
    }

    #[test]
    fn meta_words() {
        assert_eq!(rx_meta_length(0x00c0_05ea), 1514);
        assert_eq!(rx_meta_checksum(0x00c0_05ea), ChecksumEncoding::Udp);
        assert_eq!(rx_meta_checksum(0x0040_0000), ChecksumEncoding::Ip);
        assert_eq!(tx_meta_descriptor(64, true), Ok(0x8000_0040));
        assert!(tx_meta_descriptor(0x4000, false).is_err());
    }

    #[test]
    fn rx_status_fields() {
        let status = RxStatus(
            1514 | 1 << 21 | 0b0100 << 28 | 1 << 37 | 1 << 41 | 1 << 50,
        );
        assert_eq!(status.frame_length(), 1514);
        assert!(status.broadcast());
        assert_eq!(status.add_match(), 0b0100);
        assert_eq!(status.ext_match(), 0);
        assert_eq!(status.checksum(), ChecksumEncoding::Tcp);
        assert!(status.crc_error());
        assert!(status.has_error());
        assert!(!status.code_error());
    }

    #[test]
    fn rx_status_conflicting_checksum_bits() {
        let status = RxStatus(0b011 << 36);
        assert_eq!(status.checksum(), ChecksumEncoding::Unknown(0b011));
        assert!(!status.has_error());
    }
}
