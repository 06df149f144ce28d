//! Contains the formatting helpers behind the firmware's diagnostic console output.

use crate::cookie::{CookieFlags, JobCookie};
use byteorder::{ByteOrder, LittleEndian};

/// A wrapper struct whose [core::fmt::Display] implementation prints the provided data in rows,
/// with each row containing 16 bytes of data in up to two groups of up to 8 bytes each, with each
/// byte printed in hexadecimal.
pub struct FormatHexDump<'a>(pub &'a [u8]);
impl<'a> core::fmt::Display for FormatHexDump<'a> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (row_idx, row_values) in self.0.chunks(16).enumerate() {
            if row_idx > 0 {
                writeln!(f)?;
            }
            let offset = row_idx * 16;
            write!(f, "{offset:04x}: ")?;

            // Print values in groups of 8, each group separated by two spaces, and each element
            // within a group separated by a space.
            for (group_idx, group_values) in row_values.chunks(8).enumerate() {
                if group_idx > 0 {
                    write!(f, "  ")?;
                }
                for (elem_idx, elem) in group_values.iter().enumerate() {
                    if elem_idx > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{elem:02x}")?;
                }
            }
        }
        Ok(())
    }
}

/// Logs the given cookie words as a hex dump of the bytes the FIFO transfers, word 0 first and
/// each word in little-endian byte order.
pub fn log_words_hex(log_level: log::Level, words: &[u32; 4]) {
    if !log::log_enabled!(log_level) {
        return;
    }
    let mut bytes = [0u8; 16];
    LittleEndian::write_u32_into(words, &mut bytes);
    log::log!(
        log_level,
        "Length: {} bytes\n{}",
        bytes.len(),
        FormatHexDump(&bytes)
    );
}

/// Prints the lowest `n` bits of a value in binary, most significant bit first. `n` is clamped
/// to 32.
pub struct FormatBinary {
    pub value: u32,
    pub n: u32,
}
impl core::fmt::Display for FormatBinary {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let n = self.n.min(u32::BITS);
        for i in (0..n).rev() {
            write!(f, "{}", (self.value >> i) & 1)?;
        }
        Ok(())
    }
}

/// Prints the four raw words of a cookie, word 3 first, as `[0x<w3> <w2> <w1> <w0>]`.
pub struct FormatWords<'a>(pub &'a [u32; 4]);
impl<'a> core::fmt::Display for FormatWords<'a> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let [x0, x1, x2, x3] = *self.0;
        write!(f, "[0x{x3:08x} {x2:08x} {x1:08x} {x0:08x}]")
    }
}

/// Prints the per-job trace line, e.g.
/// `RX job 000000: addr[0300000001] data_addr[0004000002] size[006] sof eof chksum=- match=1`.
pub struct FormatJob<'a, F> {
    /// `RX` or `TX`.
    pub direction: &'a str,
    pub pkt: u32,
    pub cookie: &'a JobCookie<F>,
}
impl<'a, F: CookieFlags> core::fmt::Display for FormatJob<'a, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} job {:06}: addr[{:010x}] data_addr[{:010x}] size[{:03}]{}",
            self.direction,
            self.pkt,
            self.cookie.sys_addr,
            self.cookie.data_addr,
            self.cookie.size,
            self.cookie.flags
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookie::{RxCookie, TxCookie};
    use crate::example_data::{RX_BROADCAST_WRAP_COOKIE, RX_SOF_EOF_COOKIE, TX_EOF_WRAP_COOKIE};

    // Tests the hexadecimal output format.
    #[test]
    fn format_hex_two_rows_four_groups() {
        let test_data = [
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d,
            0x0e, 0x0f, 0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1a, 0x1b,
            0x1c, 0x1d, 0x1e, 0x1f,
        ];
        assert_eq!(
            "0000: 00 01 02 03 04 05 06 07  08 09 0a 0b 0c 0d 0e 0f\n\
             0010: 10 11 12 13 14 15 16 17  18 19 1a 1b 1c 1d 1e 1f",
            FormatHexDump(&test_data).to_string()
        );
    }

    // Tests that a cookie dumps as a single row with each word's bytes in little-endian order.
    #[test]
    fn format_cookie_bytes() {
        let mut bytes = [0u8; 16];
        LittleEndian::write_u32_into(&RX_SOF_EOF_COOKIE, &mut bytes);
        assert_eq!(
            "0000: 01 00 00 00 03 02 00 00  04 00 06 00 03 00 00 00",
            FormatHexDump(&bytes).to_string()
        );
    }

    #[test]
    fn format_binary() {
        assert_eq!(FormatBinary { value: 0xf, n: 4 }.to_string(), "1111");
        assert_eq!(FormatBinary { value: 0x12, n: 4 }.to_string(), "0010");
        assert_eq!(FormatBinary { value: 0x5, n: 0 }.to_string(), "");
        assert_eq!(
            FormatBinary { value: 1 << 31, n: 40 }.to_string(),
            "10000000000000000000000000000000"
        );
    }

    #[test]
    fn format_words_in_reverse_order() {
        assert_eq!(
            FormatWords(&RX_SOF_EOF_COOKIE).to_string(),
            "[0x00000003 00060004 00000203 00000001]"
        );
    }

    #[test]
    fn format_rx_job() {
        let cookie = RxCookie::decode(RX_SOF_EOF_COOKIE);
        assert_eq!(
            FormatJob {
                direction: "RX",
                pkt: 0,
                cookie: &cookie
            }
            .to_string(),
            "RX job 000000: addr[0300000001] data_addr[0004000002] size[006] sof eof chksum=- \
             match=1"
        );

        let cookie = RxCookie::decode(RX_BROADCAST_WRAP_COOKIE);
        assert_eq!(
            FormatJob {
                direction: "RX",
                pkt: 1234567,
                cookie: &cookie
            }
            .to_string(),
            "RX job 1234567: addr[0000100040] data_addr[0000000100] size[060] wrap fcs sof eof \
             chksum=IP match=1 broadcast"
        );
    }

    #[test]
    fn format_tx_job() {
        let cookie = TxCookie::decode(TX_EOF_WRAP_COOKIE);
        assert_eq!(
            FormatJob {
                direction: "TX",
                pkt: 42,
                cookie: &cookie
            }
            .to_string(),
            "TX job 000042: addr[0000200000] data_addr[0000000180] size[1514] wrap eof"
        );
    }
}
