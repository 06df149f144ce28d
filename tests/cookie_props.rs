use proptest::prelude::*;
use test_strategy::proptest;

use prism::cookie::*;
use prism::descriptor::TxDescriptor;
use prism::Error;

fn masked<F: CookieFlags>(words: [u32; 4]) -> [u32; 4] {
    let mut masked = words;
    for (word, mask) in masked.iter_mut().zip(F::DEFINED_MASK) {
        *word &= mask;
    }
    masked
}

#[proptest]
fn rx_round_trip_keeps_defined_bits(words: [u32; 4]) {
    let encoded = RxCookie::decode(words).encode();
    prop_assert_eq!(encoded, Ok(masked::<RxFlags>(words)));
}

#[proptest]
fn tx_round_trip_keeps_defined_bits(words: [u32; 4]) {
    let encoded = TxCookie::decode(words).encode();
    prop_assert_eq!(encoded, Ok(masked::<TxFlags>(words)));
}

#[proptest]
fn fields_round_trip(
    #[strategy(0..=MAX_ADDR)] sys_addr: u64,
    #[strategy(0..=MAX_ADDR)] data_addr: u64,
    #[strategy(0..=MAX_SIZE)] size: u16,
    wrap: bool,
    eof: bool,
    nocrc: bool,
) {
    let cookie = TxCookie {
        sys_addr,
        data_addr,
        size,
        flags: TxFlags { wrap, eof, nocrc },
    };
    let words = cookie.encode().unwrap();
    prop_assert_eq!(TxCookie::decode(words), cookie);
}

// A size must never leak into the flag bits above it.
#[proptest]
fn size_does_not_touch_flags(#[strategy(0..=MAX_SIZE)] size: u16) {
    let cookie = RxCookie {
        sys_addr: 0,
        data_addr: 0,
        size,
        flags: RxFlags::default(),
    };
    let words = cookie.encode().unwrap();
    prop_assert_eq!(words, [0, 0, (size as u32) << 16, 0]);
}

#[proptest]
fn oversized_size_is_rejected(#[strategy(MAX_SIZE + 1..=u16::MAX)] size: u16) {
    let cookie = TxCookie {
        sys_addr: 0,
        data_addr: 0,
        size,
        flags: TxFlags::default(),
    };
    prop_assert_eq!(
        cookie.encode(),
        Err(Error::SizeOutOfRange {
            size: size as u32,
            max: MAX_SIZE as u32
        })
    );
}

#[proptest]
fn oversized_address_is_rejected(#[strategy(MAX_ADDR + 1..)] addr: u64, data: bool) {
    let mut cookie = RxCookie::decode([0; 4]);
    if data {
        cookie.data_addr = addr;
    } else {
        cookie.sys_addr = addr;
    }
    prop_assert_eq!(
        cookie.encode(),
        Err(Error::AddressOutOfRange { addr, bits: 40 })
    );
}

#[proptest]
fn tx_descriptor_round_trip(
    addr: u32,
    #[strategy(0..=0x3fffu32)] length: u32,
    eof: bool,
    nocrc: bool,
    wrap: bool,
) {
    let desc = TxDescriptor::new(addr, length, eof, nocrc, wrap).unwrap();
    let desc = TxDescriptor::from_words(desc.to_words());
    prop_assert_eq!(desc.addr(), addr);
    prop_assert_eq!(desc.length(), length);
    prop_assert_eq!((desc.eof(), desc.nocrc(), desc.wrap()), (eof, nocrc, wrap));
    prop_assert!(!desc.used());
}
