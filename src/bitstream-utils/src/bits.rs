//! Single-bit access on primitive integers.
//!
//! Positions count from the LSB, so position `0` is the least
//! significant bit and `I::BITS - 1` is the sign bit of signed
//! types.

use funty::Integral;

/// Tests whether the bit at `pos` is set in `value`.
///
/// # Panics
///
/// Panics in debug mode when `pos` is out of range for `I`.
#[inline]
pub fn get_bit<I: Integral>(value: I, pos: u32) -> bool {
    debug_assert!(pos < I::BITS, "bit position out of range for type");

    let mask = I::ONE << pos;
    (value & mask) == mask
}

/// Returns `value` with the bit at `pos` set to `flag`.
///
/// # Panics
///
/// Panics in debug mode when `pos` is out of range for `I`.
#[inline]
pub fn set_bit<I: Integral>(value: I, pos: u32, flag: bool) -> I {
    debug_assert!(pos < I::BITS, "bit position out of range for type");

    let mask = I::ONE << pos;
    if flag {
        value | mask
    } else {
        value & !mask
    }
}

/// Computes the number of bits needed to encode `range` distinct
/// values, i.e. the smallest `b >= 1` with `2^b >= range`.
///
/// A value of `0` or `1` still yields a single bit.
pub fn bits_needed(range: u64) -> u32 {
    let mut bits = 1;
    while bits < u64::BITS && (1 << bits) < range {
        bits += 1;
    }

    bits
}

/// Sign-extends an `nbits` wide two's complement value to [`i64`].
///
/// # Panics
///
/// Panics in debug mode when `nbits` is not in `1..=64`.
#[inline]
pub fn sign_extend(value: u64, nbits: u32) -> i64 {
    debug_assert!(0 < nbits && nbits <= u64::BITS);

    let shift = u64::BITS - nbits;
    (value << shift) as i64 >> shift
}
