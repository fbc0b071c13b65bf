//! CRC-64 change fingerprints.
//!
//! Dependent views store the fingerprint of the data they were built from,
//! recompute it on demand, and rebuild when the value differs. The value is a
//! change-detection token only, never a security or deduplication key.
//!
//! # Parameterization
//!
//! CRC-64/XZ: the ECMA-182 polynomial in reflected form (`0xC96C5795D7870F42`)
//! with the running value inverted on entry and exit of every update. Updates
//! chain, so folding fields one call at a time equals a single checksum over
//! their concatenated encodings. Numbers are folded as 8-byte little-endian
//! two's complement, strings as their UTF-8 bytes.

use crate::fxp::Fxp;

/// Reflected ECMA-182 polynomial.
pub const POLY_ECMA: u64 = 0xC96C_5795_D787_0F42;

static TABLE: [u64; 256] = make_table(POLY_ECMA);

const fn make_table(poly: u64) -> [u64; 256] {
    let mut table = [0u64; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u64;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 == 1 { (crc >> 1) ^ poly } else { crc >> 1 };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Folds raw bytes into `crc`.
pub fn bytes(crc: u64, data: &[u8]) -> u64 {
    let mut crc = !crc;
    for &b in data {
        crc = TABLE[((crc as u8) ^ b) as usize] ^ (crc >> 8);
    }
    !crc
}

/// Folds a string's UTF-8 bytes into `crc`.
pub fn string(crc: u64, data: &str) -> u64 {
    bytes(crc, data.as_bytes())
}

/// Folds an integer into `crc`.
pub fn number(crc: u64, value: i64) -> u64 {
    bytes(crc, &value.to_le_bytes())
}

/// Folds a fixed-point value (its raw representation) into `crc`.
pub fn fxp(crc: u64, value: Fxp) -> u64 {
    number(crc, value.raw())
}

/// Folds a boolean into `crc`.
pub fn boolean(crc: u64, value: bool) -> u64 {
    bytes(crc, &[value as u8])
}

/// Types that contribute their semantically relevant fields to a fingerprint.
///
/// Collections fold their element count first, then each element in their
/// stable order (never map iteration order).
pub trait Fingerprint {
    /// Folds this value into a running checksum.
    fn crc64(&self, crc: u64) -> u64;

    /// Fingerprint starting from a zero accumulator.
    fn fingerprint(&self) -> u64 {
        self.crc64(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_crc64_xz_check_value() {
        assert_eq!(bytes(0, b"123456789"), 0x995D_C9BB_DF19_39FA);
    }

    #[test]
    fn updates_chain() {
        let whole = bytes(0, b"strength");
        let split = bytes(bytes(0, b"stren"), b"gth");
        assert_eq!(whole, split);
    }

    #[test]
    fn order_sensitive() {
        let ab = string(string(0, "a"), "b");
        let ba = string(string(0, "b"), "a");
        assert_ne!(ab, ba);
        assert_ne!(number(0, 1), number(0, 2));
        assert_ne!(boolean(0, true), boolean(0, false));
    }
}
