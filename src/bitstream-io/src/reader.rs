use bitstream_utils::{
    bits::{get_bit, set_bit, sign_extend},
    funty::Integral,
};

use crate::{
    layout::{self, FixedPoint, FloatLayout},
    Error, ReaderFlags, Result,
};

macro_rules! impl_read_literal {
    ($($(#[$doc:meta])* $read_fn:ident() -> $ty:ty),* $(,)?) => {
        $(
            $(#[$doc])*
            #[inline]
            pub fn $read_fn(&mut self) -> Result<$ty> {
                self.read_bitint::<$ty>(<$ty>::BITS)
            }
        )*
    };
}

/// A buffer which enables bit-based deserialization of data.
///
/// Individual bit reading starts at the LSB of the byte, working
/// towards the MSB. Multi-bit fields are assembled LSB first.
///
/// By default, reading past the end of the buffer is not an error and
/// yields zero bits instead. [`ReaderFlags::STRICT_BOUNDS`] turns this
/// into [`Error::UnexpectedEof`].
#[derive(Clone, Debug)]
pub struct BitReader<'a> {
    data: &'a [u8],

    // The logical length of `data` in bits.
    len: usize,

    // Bits consumed so far, including zero-filled ones past the end.
    pos: usize,

    // Bits consumed by checked field operations.
    compressed: usize,

    flags: ReaderFlags,
    overrun: bool,
}

impl<'a> BitReader<'a> {
    /// Constructs a new [`BitReader`] over a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_flags(data, ReaderFlags::empty())
    }

    /// Constructs a new [`BitReader`] over a byte slice with custom
    /// configuration.
    pub fn with_flags(data: &'a [u8], flags: ReaderFlags) -> Self {
        Self {
            data,
            len: data.len() << 3,
            pos: 0,
            compressed: 0,
            flags,
            overrun: false,
        }
    }

    /// Constructs a new [`BitReader`] which treats only the first `nbits`
    /// bits of `data` as valid input.
    ///
    /// `nbits` is clamped to the size of `data`.
    pub fn with_bit_len(data: &'a [u8], nbits: usize, flags: ReaderFlags) -> Self {
        let mut reader = Self::with_flags(data, flags);
        reader.len = reader.len.min(nbits);
        reader
    }

    /// Gets the number of bits consumed so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Gets the remaining bits available in the buffer.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.len.saturating_sub(self.pos)
    }

    /// Gets the number of bits consumed by checked field operations.
    ///
    /// Bits consumed through [`BitReader::read_bit`] are not counted,
    /// while zero bits yielded past the end of the buffer are.
    #[inline]
    pub fn compressed_bits(&self) -> usize {
        self.compressed
    }

    // In strict mode, makes sure `nbits` more bits are available so that
    // a field is never consumed halfway.
    #[inline]
    fn ensure(&self, nbits: usize) -> Result<()> {
        let remaining = self.remaining();
        if self.flags.contains(ReaderFlags::STRICT_BOUNDS) && nbits > remaining {
            Err(Error::UnexpectedEof {
                requested: nbits,
                remaining,
            })
        } else {
            Ok(())
        }
    }

    // Runs `f` and rewinds the cursor when it fails, so that a rejected
    // field leaves no trace.
    fn checkpoint<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let saved = self.clone();
        match f(self) {
            Ok(value) => Ok(value),
            Err(e) => {
                *self = saved;
                Err(e)
            }
        }
    }

    #[cold]
    #[inline(never)]
    fn read_past_end(&mut self) -> Result<bool> {
        self.ensure(1)?;

        if !self.overrun {
            log::debug!("Reading past the end of input at bit {}; yielding zeroes", self.pos);
            self.overrun = true;
        }

        self.pos += 1;
        Ok(false)
    }

    /// Reads a single bit from the buffer.
    ///
    /// This is the raw primitive every other operation is built upon and
    /// does not contribute to [`BitReader::compressed_bits`].
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.pos >= self.len {
            return self.read_past_end();
        }

        let bit = get_bit(self.data[self.pos >> 3], (self.pos & 7) as u32);
        self.pos += 1;

        Ok(bit)
    }

    // Reads `nbits` bits into the low end of an integer without any
    // validation or accounting.
    #[inline]
    fn read_raw<I: Integral>(&mut self, nbits: u32) -> Result<I> {
        let mut value = I::ZERO;
        for x in 0..nbits {
            value = set_bit(value, x, self.read_bit()?);
        }

        Ok(value)
    }

    /// Reads a [`bool`] value from the buffer as a single bit.
    #[inline]
    pub fn bool(&mut self) -> Result<bool> {
        self.ensure(1)?;

        let value = self.read_bit()?;
        self.compressed += 1;

        Ok(value)
    }

    /// Reads an integer of `nbits` bits from the buffer.
    ///
    /// The value is zero-extended into `I`; `nbits` must be between 1
    /// and the bit width of `I`.
    pub fn read_bitint<I: Integral>(&mut self, nbits: u32) -> Result<I> {
        layout::check_width(nbits, I::BITS)?;
        self.ensure(nbits as usize)?;

        log::trace!("Reading {nbits}-bit integer at bit {}", self.pos);

        let value = self.read_raw(nbits)?;
        self.compressed += nbits as usize;

        Ok(value)
    }

    /// Reads a non-negative [`i32`] of up to 31 bits from the buffer.
    #[inline]
    pub fn read_positive_int(&mut self, nbits: u32) -> Result<i32> {
        layout::check_width(nbits, layout::POSITIVE_INT_BITS)?;
        self.read_bitint(nbits)
    }

    /// Reads a signed [`i32`] of `nbits` magnitude bits from the buffer.
    ///
    /// With `has_sign` set, one more bit follows the magnitude bits. It
    /// always lands on bit 31 and, when set, is extended down to bit
    /// `nbits`. Otherwise, this behaves like [`BitReader::read_bitint`].
    pub fn read_signed_int(&mut self, nbits: u32, has_sign: bool) -> Result<i32> {
        layout::check_width(nbits, layout::SIGNED_INT_BITS)?;
        self.ensure(nbits as usize + has_sign as usize)?;

        log::trace!("Reading {nbits}-bit signed integer (sign bit: {has_sign})");

        let magnitude: u32 = self.read_raw(nbits)?;
        let value = if has_sign {
            let negative = self.read_bit()?;
            let raw = magnitude as u64 | (negative as u64) << nbits;
            set_bit(sign_extend(raw, nbits + 1) as i32, i32::BITS - 1, negative)
        } else {
            magnitude as i32
        };
        self.compressed += nbits as usize;

        Ok(value)
    }

    fn read_ieee<F: FloatLayout>(
        &mut self,
        has_sign: bool,
        exponent_bits: u32,
        mantissa_bits: u32,
    ) -> Result<F> {
        let nbits = F::check(has_sign, exponent_bits, mantissa_bits)?;
        self.ensure(nbits as usize)?;

        log::trace!(
            "Reading float with {exponent_bits} exponent and {mantissa_bits} mantissa bits (sign bit: {has_sign})"
        );

        let mut raw = F::Bits::ZERO;
        if has_sign {
            raw = set_bit(raw, F::Bits::BITS - 1, self.read_bit()?);
        }
        for x in 0..exponent_bits {
            raw = set_bit(raw, F::MANTISSA_BITS + x, self.read_bit()?);
        }
        for x in 0..mantissa_bits {
            raw = set_bit(raw, x, self.read_bit()?);
        }
        self.compressed += nbits as usize;

        Ok(F::from_raw(raw))
    }

    /// Reads an [`f32`] with a custom layout from the buffer.
    ///
    /// Exponent and mantissa bits left out by the layout are zero, with
    /// the mantissa filling up from the low end. The resulting bit
    /// pattern is taken as-is and may well be a NaN or an infinity.
    #[inline]
    pub fn read_float(
        &mut self,
        has_sign: bool,
        exponent_bits: u32,
        mantissa_bits: u32,
    ) -> Result<f32> {
        self.read_ieee(has_sign, exponent_bits, mantissa_bits)
    }

    /// Reads an [`f64`] with a custom layout from the buffer.
    ///
    /// See [`BitReader::read_float`] for details.
    #[inline]
    pub fn read_double(
        &mut self,
        has_sign: bool,
        exponent_bits: u32,
        mantissa_bits: u32,
    ) -> Result<f64> {
        self.read_ieee(has_sign, exponent_bits, mantissa_bits)
    }

    /// Reads a variable-length integer made of `group_size` bit groups.
    ///
    /// Groups which would land beyond bit 63 of the result are consumed
    /// but discarded. A strict reader which runs out of input midway is
    /// rewound to where the integer started.
    pub fn read_varint(&mut self, group_size: u32) -> Result<i64> {
        layout::check_group_size(group_size)?;
        self.ensure(group_size as usize + 1)?;

        self.checkpoint(|this| this.read_varint_groups(group_size))
    }

    fn read_varint_groups(&mut self, group_size: u32) -> Result<i64> {
        let start = self.pos;
        let mut value = 0u64;
        let mut shift = 0u32;
        loop {
            for x in 0..group_size {
                let bit = self.read_bit()?;
                if let Some(pos) = shift.checked_add(x).filter(|&p| p < u64::BITS) {
                    value = set_bit(value, pos, bit);
                }
            }
            shift = shift.saturating_add(group_size);

            if !self.read_bit()? {
                break;
            }
        }

        let nbits = self.pos - start;
        log::trace!("Read {nbits}-bit varint with group size {group_size}");
        self.compressed += nbits;

        Ok(value as i64)
    }

    /// Reads a fixed-point decimal value from the buffer.
    ///
    /// See [`FixedPoint`] for the layout.
    pub fn read_fixed_point(&mut self, max_abs_integer: u32, decimal_places: u32) -> Result<f64> {
        let layout = FixedPoint::new(max_abs_integer, decimal_places)?;
        self.ensure(layout.total_bits() as usize)?;

        log::trace!("Reading fixed-point decimal with layout {layout:?}");

        let negative = self.read_bit()?;
        let integral = self.read_raw(layout.integral_bits)?;
        let scaled = self.read_raw(layout.decimal_bits)?;
        self.compressed += layout.total_bits() as usize;

        Ok(layout.join(negative, integral, scaled))
    }

    /// Reads an index into a set of `count` variants.
    ///
    /// Fails if the decoded index does not name one of the variants, in
    /// which case nothing is consumed.
    pub fn read_variant(&mut self, count: u32) -> Result<u32> {
        let nbits = layout::variant_bits(count)?;

        self.checkpoint(|this| {
            let index = this.read_bitint::<u32>(nbits)?;
            if index < count {
                Ok(index)
            } else {
                Err(Error::InvalidRange("variant index out of range"))
            }
        })
    }

    /// Reads an angle in radians, stored as an unsigned [`f32`].
    #[inline]
    pub fn read_angle(&mut self) -> Result<f64> {
        self.read_float(false, layout::F32_EXPONENT_BITS, layout::F32_MANTISSA_BITS)
            .map(f64::from)
    }

    // fn $read_fn(&mut self) -> Result<$ty>
    impl_read_literal! {
        /// Reads a full-width [`u8`] value from the buffer.
        u8() -> u8,
        /// Reads a full-width [`i8`] value from the buffer.
        i8() -> i8,

        /// Reads a full-width [`u16`] value from the buffer.
        u16() -> u16,
        /// Reads a full-width [`i16`] value from the buffer.
        i16() -> i16,

        /// Reads a full-width [`u32`] value from the buffer.
        u32() -> u32,
        /// Reads a full-width [`i32`] value from the buffer.
        i32() -> i32,

        /// Reads a full-width [`u64`] value from the buffer.
        u64() -> u64,
        /// Reads a full-width [`i64`] value from the buffer.
        i64() -> i64,
    }

    /// Reads an [`f32`] value in its native layout from the buffer.
    #[inline]
    pub fn f32(&mut self) -> Result<f32> {
        self.read_float(true, layout::F32_EXPONENT_BITS, layout::F32_MANTISSA_BITS)
    }

    /// Reads an [`f64`] value in its native layout from the buffer.
    #[inline]
    pub fn f64(&mut self) -> Result<f64> {
        self.read_double(true, layout::F64_EXPONENT_BITS, layout::F64_MANTISSA_BITS)
    }
}
