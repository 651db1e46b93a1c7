//! Field layout rules shared by [`BitReader`] and [`BitWriter`].
//!
//! [`BitReader`]: crate::BitReader
//! [`BitWriter`]: crate::BitWriter

use std::f64::consts::TAU;

use bitstream_utils::{bits::bits_needed, funty::Integral};

use crate::{Error, Result};

/// Exponent width of a native [`f32`].
pub const F32_EXPONENT_BITS: u32 = 8;
/// Mantissa width of a native [`f32`].
pub const F32_MANTISSA_BITS: u32 = 23;

/// Exponent width of a native [`f64`].
pub const F64_EXPONENT_BITS: u32 = 11;
/// Mantissa width of a native [`f64`].
pub const F64_MANTISSA_BITS: u32 = 52;

/// Maximum magnitude width of a signed integer field.
pub const SIGNED_INT_BITS: u32 = i32::BITS;

/// Maximum width of a positive-only integer field.
pub const POSITIVE_INT_BITS: u32 = i32::BITS - 1;

/// Maximum group size of a variable-length integer.
pub const MAX_GROUP_SIZE: u32 = u64::BITS;

#[inline]
pub(crate) fn check_width(width: u32, max: u32) -> Result<()> {
    if 0 < width && width <= max {
        Ok(())
    } else {
        Err(Error::InvalidFieldWidth { width, max })
    }
}

#[inline]
pub(crate) fn check_group_size(group_size: u32) -> Result<()> {
    if 0 < group_size && group_size <= MAX_GROUP_SIZE {
        Ok(())
    } else {
        Err(Error::InvalidGroupSize(group_size))
    }
}

/// A floating point type with an IEEE-754 shaped bit pattern.
///
/// The sign bit is the top bit of [`FloatLayout::Bits`], the exponent
/// starts right above the mantissa and the mantissa occupies the low
/// bits.
pub(crate) trait FloatLayout: Copy {
    type Bits: Integral;

    const EXPONENT_BITS: u32;
    const MANTISSA_BITS: u32;

    fn to_raw(self) -> Self::Bits;

    fn from_raw(raw: Self::Bits) -> Self;

    /// Validates a custom layout and returns the number of bits it
    /// occupies on the wire.
    fn check(has_sign: bool, exponent_bits: u32, mantissa_bits: u32) -> Result<u32> {
        if exponent_bits > Self::EXPONENT_BITS {
            return Err(Error::InvalidFieldWidth {
                width: exponent_bits,
                max: Self::EXPONENT_BITS,
            });
        }
        if mantissa_bits > Self::MANTISSA_BITS {
            return Err(Error::InvalidFieldWidth {
                width: mantissa_bits,
                max: Self::MANTISSA_BITS,
            });
        }

        Ok(has_sign as u32 + exponent_bits + mantissa_bits)
    }
}

impl FloatLayout for f32 {
    type Bits = u32;

    const EXPONENT_BITS: u32 = F32_EXPONENT_BITS;
    const MANTISSA_BITS: u32 = F32_MANTISSA_BITS;

    #[inline]
    fn to_raw(self) -> u32 {
        self.to_bits()
    }

    #[inline]
    fn from_raw(raw: u32) -> Self {
        f32::from_bits(raw)
    }
}

impl FloatLayout for f64 {
    type Bits = u64;

    const EXPONENT_BITS: u32 = F64_EXPONENT_BITS;
    const MANTISSA_BITS: u32 = F64_MANTISSA_BITS;

    #[inline]
    fn to_raw(self) -> u64 {
        self.to_bits()
    }

    #[inline]
    fn from_raw(raw: u64) -> Self {
        f64::from_bits(raw)
    }
}

/// Field widths of a fixed-point decimal, also known as a split double.
///
/// The value is stored as a sign bit, followed by its integral part and
/// its fractional part scaled up by `10^decimal_places`, both as unsigned
/// integers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedPoint {
    /// Bits used by the integral part.
    pub integral_bits: u32,
    /// Bits used by the scaled fractional part.
    pub decimal_bits: u32,
    /// The scale factor of the fractional part.
    pub multiplier: u64,
}

impl FixedPoint {
    /// Computes the layout for values whose integral part lies in
    /// `-max_abs_integer..=max_abs_integer`, preserving `decimal_places`
    /// digits after the point.
    pub fn new(max_abs_integer: u32, decimal_places: u32) -> Result<Self> {
        if max_abs_integer == 0 {
            return Err(Error::InvalidRange("maximum integral part must be positive"));
        }

        let multiplier = 10u64
            .checked_pow(decimal_places)
            .ok_or(Error::InvalidRange("too many decimal places"))?;

        Ok(Self {
            integral_bits: bits_needed(max_abs_integer as u64),
            decimal_bits: bits_needed(multiplier),
            multiplier,
        })
    }

    /// Gets the total number of bits a value occupies, sign included.
    #[inline]
    pub const fn total_bits(&self) -> u32 {
        1 + self.integral_bits + self.decimal_bits
    }

    /// Splits `value` into its sign, integral part and scaled fraction.
    pub(crate) fn split(&self, value: f64) -> (bool, u64, u64) {
        let abs = value.abs();
        let integral = abs.floor();
        let scaled = ((abs - integral) * self.multiplier as f64).round();

        (value < 0.0, integral as u64, scaled as u64)
    }

    /// Reassembles a value from its parts.
    pub(crate) fn join(&self, negative: bool, integral: u64, scaled: u64) -> f64 {
        let sign = if negative { -1.0 } else { 1.0 };
        sign * (integral as f64 + scaled as f64 / self.multiplier as f64)
    }
}

/// Computes the bits needed by an index into `count` variants.
pub(crate) fn variant_bits(count: u32) -> Result<u32> {
    if count == 0 {
        Err(Error::InvalidRange("variant set must not be empty"))
    } else {
        Ok(bits_needed(count as u64))
    }
}

/// Wraps an angle in radians into a single positive turn.
pub fn normalize_angle(angle: f64) -> f64 {
    let angle = angle % TAU;
    if angle < 0.0 {
        angle + TAU
    } else {
        angle
    }
}
