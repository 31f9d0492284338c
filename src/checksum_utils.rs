//! RFC 1071 one's-complement summation primitives.
//!
//! The functions here produce checksums *without* the final complement so
//! that partial sums (pseudo-header, header, payload) can be combined
//! before the caller inverts the result.

use byteorder::{ByteOrder, NetworkEndian};

/// Sum a byte slice as big-endian 16-bit words, folding carries.
///
/// A trailing odd byte is treated as the high octet of a zero-padded word.
pub fn from_slice(data: &[u8]) -> u16 {
    let mut accum: u32 = 0;

    let mut words = data.chunks_exact(2);
    for word in words.by_ref() {
        accum += NetworkEndian::read_u16(word) as u32;
    }
    if let Some(&byte) = words.remainder().first() {
        accum += (byte as u32) << 8;
    }

    propagate_carries(accum)
}

/// Combine several partial checksums into one.
pub fn combine(checksums: &[u16]) -> u16 {
    let mut accum: u32 = 0;
    for &word in checksums {
        accum += word as u32;
    }
    propagate_carries(accum)
}

/// Fold the carry bits of a 32-bit accumulator back into 16 bits.
///
/// Two folds are enough for any sum of 16-bit words that fits in 32 bits.
fn propagate_carries(accum: u32) -> u16 {
    let sum = (accum >> 16) + (accum & 0xffff);
    ((sum >> 16) as u16) + (sum as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slice_sums_to_zero() {
        assert_eq!(from_slice(&[]), 0);
    }

    #[test]
    fn odd_tail_byte_is_high_octet() {
        // 0x1200 + 0x34 padded as 0x3400
        assert_eq!(from_slice(&[0x12, 0x00, 0x34]), 0x4600);
    }

    #[test]
    fn carries_fold_back_in() {
        // 0xffff + 0x0001 wraps to 0x0001 under end-around carry
        assert_eq!(from_slice(&[0xff, 0xff, 0x00, 0x01]), 0x0001);
        assert_eq!(combine(&[0xffff, 0x0001]), 0x0001);
    }

    #[test]
    fn combine_matches_single_pass() {
        let data = [0xde, 0xad, 0xbe, 0xef, 0x01, 0x02, 0x03, 0x04];
        let split = combine(&[from_slice(&data[..4]), from_slice(&data[4..])]);
        assert_eq!(split, from_slice(&data));
    }

    #[test]
    fn rfc1071_worked_example() {
        // The example sequence from RFC 1071 section 3.
        let data = [0x00, 0x01, 0xf2, 0x03, 0xf4, 0xf5, 0xf6, 0xf7];
        assert_eq!(from_slice(&data), 0xddf2);
    }
}
