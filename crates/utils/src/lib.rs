mod logger;

pub use logger::setup_logger;

/// Returns the number of bits needed to write `n` in binary, i.e. `ceil(log2(n + 1))`.
///
/// `bit_length(0)` is zero: a single address needs no selection bits.
#[inline]
#[must_use]
pub const fn bit_length(n: u64) -> usize {
    (u64::BITS - n.leading_zeros()) as usize
}

/// Little-endian bit decomposition of `value` into exactly `width` bits.
#[track_caller]
#[must_use]
pub fn bits_le(value: u64, width: usize) -> Vec<bool> {
    assert!(
        width >= bit_length(value),
        "value {} does not fit in {} bits",
        value,
        width
    );
    (0..width).map(|i| i < 64 && (value >> i) & 1 == 1).collect()
}

/// Inverse of [`bits_le`].
#[track_caller]
#[must_use]
pub fn from_bits_le(bits: &[bool]) -> u64 {
    assert!(bits.iter().skip(64).all(|b| !b), "bit string does not fit in a u64");
    bits.iter().take(64).enumerate().fold(0, |acc, (i, &b)| acc | (u64::from(b) << i))
}

/// `2^exponent`, or `None` if it does not fit in a `usize`.
#[inline]
#[must_use]
pub const fn checked_pow2(exponent: usize) -> Option<usize> {
    if exponent < usize::BITS as usize {
        Some(1 << exponent)
    } else {
        None
    }
}

/// Formats a bit slice as a `0`/`1` string, lowest index first.
#[must_use]
pub fn bit_string(bits: &[bool]) -> String {
    bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
}
