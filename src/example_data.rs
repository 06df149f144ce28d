//! Provides fake job cookies and descriptors for use in tests or example binaries.

/// An RX cookie for a single-buffer frame: low address bits set, `sof` and `eof` set, a payload
/// size of 6 bytes and no other flags.
pub const RX_SOF_EOF_COOKIE: [u32; 4] = [0x0000_0001, 0x0000_0203, 0x0006_0004, 0x0000_0003];

/// The RX cookie following [RX_SOF_EOF_COOKIE] in the same ring: the last descriptor (`wrap`), a
/// 60-byte broadcast frame whose FCS was kept and whose IP checksum was verified.
pub const RX_BROADCAST_WRAP_COOKIE: [u32; 4] = [
    0x0010_0040,
    0x0001_0000,
    0xc03c_0000,
    0x0000_2000 | 0x0000_0020 | 0x0000_0003,
];

/// A TX cookie whose only set flag is `nocrc`.
pub const TX_NOCRC_COOKIE: [u32; 4] = [0x0000_1000, 0x0000_4000, 0x0040_0000, 0x0000_0001];

/// A TX cookie for the last buffer of a 1514-byte frame in the last ring slot.
pub const TX_EOF_WRAP_COOKIE: [u32; 4] = [0x0020_0000, 0x0001_8000, 0xc5ea_0000, 0x0000_0000];

/// GEM RX descriptor words as written back by the MAC: a 64-byte broadcast frame with SOF and EOF,
/// in the last (`wrap`) slot of a ring at 0x4000_0000.
pub const GEM_RX_DESCRIPTOR: [u32; 2] = [0x4000_0000 | 0b11, 0x8000_c040];

/// GEM TX descriptor words for a 1514-byte single-buffer frame that has been sent.
pub const GEM_TX_DESCRIPTOR: [u32; 2] = [0x4000_1000, 0x8000_85ea];
