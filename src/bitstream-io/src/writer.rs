use bitstream_utils::{
    bits::{get_bit, set_bit},
    funty::Integral,
};

use crate::{
    layout::{self, FixedPoint, FloatLayout},
    Error, Result, WriterFlags,
};

macro_rules! impl_write_literal {
    ($($(#[$doc:meta])* $write_fn:ident($ty:ty)),* $(,)?) => {
        $(
            $(#[$doc])*
            #[inline]
            pub fn $write_fn(&mut self, value: $ty) -> Result<()> {
                self.write_bitint(value, <$ty>::BITS)
            }
        )*
    };
}

/// A buffer which enables bit-based serialization of data.
///
/// Individual bit writing starts at the LSB of the byte, working
/// towards the MSB. Multi-bit fields are emitted LSB first.
#[derive(Debug)]
pub struct BitWriter {
    // The inner buffer where data is being written to.
    inner: Vec<u8>,

    // A partial byte which is not committed to the data buffer yet.
    buf: u8,

    // How many bits in `buf` are currently filled.
    count: u32,

    // Bits produced by checked field operations.
    compressed: usize,

    flags: WriterFlags,
    sealed: bool,
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BitWriter {
    /// Creates an empty [`BitWriter`].
    pub const fn new() -> Self {
        Self::with_flags(WriterFlags::empty())
    }

    /// Creates an empty [`BitWriter`] with custom configuration.
    pub const fn with_flags(flags: WriterFlags) -> Self {
        Self::from_vec(Vec::new(), flags)
    }

    /// Creates a [`BitWriter`] which appends to a given output vector.
    ///
    /// This is useful if you want to reuse existing buffer allocations.
    pub const fn from_vec(vec: Vec<u8>, flags: WriterFlags) -> Self {
        Self {
            inner: vec,
            buf: 0,
            count: 0,
            compressed: 0,
            flags,
            sealed: false,
        }
    }

    /// Gets the number of bits currently in the buffer.
    ///
    /// This includes the padding of a partial byte flushed by
    /// [`BitWriter::finish`].
    #[inline]
    pub fn written_bits(&self) -> usize {
        (self.inner.len() << 3) + self.count as usize
    }

    /// Gets the number of bits produced by checked field operations.
    ///
    /// Bits written through [`BitWriter::write_bit`] are not counted.
    #[inline]
    pub fn compressed_bits(&self) -> usize {
        self.compressed
    }

    /// Gets a view of the completed bytes in the buffer.
    ///
    /// A trailing partial byte only shows up after [`BitWriter::finish`].
    #[inline]
    pub fn view(&self) -> &[u8] {
        &self.inner
    }

    /// Reserves capacity for at least `nbytes` more bytes in the
    /// output buffer.
    ///
    /// When the data format allows making educated guesses about
    /// size consumption, use this to optimize memory allocation.
    #[inline]
    pub fn reserve(&mut self, nbytes: usize) {
        self.inner.reserve(nbytes);
    }

    /// Flushes a trailing partial byte, zero-padded in its unused high
    /// bits, and returns the finished buffer.
    ///
    /// Calling this repeatedly is harmless. Unless the writer was
    /// configured with [`WriterFlags::SEAL_ON_FINISH`], writing may
    /// continue afterwards, starting at the next byte boundary.
    pub fn finish(&mut self) -> &[u8] {
        if self.count != 0 {
            self.commit();
        }
        if self.flags.contains(WriterFlags::SEAL_ON_FINISH) {
            self.sealed = true;
        }

        log::debug!(
            "Finished stream with {} bytes ({} compressed bits)",
            self.inner.len(),
            self.compressed
        );

        &self.inner
    }

    /// Finishes the [`BitWriter`] and returns the byte buffer.
    #[inline]
    pub fn into_inner(mut self) -> Vec<u8> {
        self.finish();
        self.inner
    }

    #[inline]
    fn check_open(&self) -> Result<()> {
        if self.sealed {
            Err(Error::Finalized)
        } else {
            Ok(())
        }
    }

    // Moves the buffered byte into the data buffer.
    #[inline]
    fn commit(&mut self) {
        self.inner.push(self.buf);
        self.buf = 0;
        self.count = 0;
    }

    #[inline]
    fn push_bit(&mut self, bit: bool) {
        self.buf = set_bit(self.buf, self.count, bit);
        self.count += 1;

        if self.count == u8::BITS {
            self.commit();
        }
    }

    // Writes the low `nbits` bits of `value` without any validation
    // or accounting.
    #[inline]
    fn write_raw<I: Integral>(&mut self, value: I, nbits: u32) {
        for x in 0..nbits {
            self.push_bit(get_bit(value, x));
        }
    }

    /// Writes a single bit to the buffer.
    ///
    /// This is the raw primitive every other operation is built upon and
    /// does not contribute to [`BitWriter::compressed_bits`].
    #[inline]
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.check_open()?;
        self.push_bit(bit);

        Ok(())
    }

    /// Writes a [`bool`] value to the buffer as a single bit.
    #[inline]
    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_bit(value)?;
        self.compressed += 1;

        Ok(())
    }

    /// Writes the low `nbits` bits of an integer to the buffer.
    ///
    /// `nbits` must be between 1 and the bit width of `I`.
    pub fn write_bitint<I: Integral>(&mut self, value: I, nbits: u32) -> Result<()> {
        layout::check_width(nbits, I::BITS)?;
        self.check_open()?;

        log::trace!("Writing {nbits}-bit integer at bit {}", self.written_bits());

        self.write_raw(value, nbits);
        self.compressed += nbits as usize;

        Ok(())
    }

    /// Writes a non-negative [`i32`] of up to 31 bits to the buffer.
    pub fn write_positive_int(&mut self, value: i32, nbits: u32) -> Result<()> {
        layout::check_width(nbits, layout::POSITIVE_INT_BITS)?;
        if value < 0 {
            return Err(Error::NegativeValue(value as i64));
        }

        self.write_bitint(value, nbits)
    }

    /// Writes a signed [`i32`] as `nbits` magnitude bits to the buffer.
    ///
    /// With `has_sign` set, bit 31 of `value` follows as the sign bit.
    pub fn write_signed_int(&mut self, value: i32, nbits: u32, has_sign: bool) -> Result<()> {
        layout::check_width(nbits, layout::SIGNED_INT_BITS)?;
        self.check_open()?;

        log::trace!("Writing {nbits}-bit signed integer (sign bit: {has_sign})");

        self.write_raw(value, nbits);
        if has_sign {
            self.push_bit(get_bit(value, i32::BITS - 1));
        }
        self.compressed += nbits as usize;

        Ok(())
    }

    fn write_ieee<F: FloatLayout>(
        &mut self,
        value: F,
        has_sign: bool,
        exponent_bits: u32,
        mantissa_bits: u32,
    ) -> Result<()> {
        let nbits = F::check(has_sign, exponent_bits, mantissa_bits)?;
        self.check_open()?;

        log::trace!(
            "Writing float with {exponent_bits} exponent and {mantissa_bits} mantissa bits (sign bit: {has_sign})"
        );

        let raw = value.to_raw();
        if has_sign {
            self.push_bit(get_bit(raw, F::Bits::BITS - 1));
        }
        for x in 0..exponent_bits {
            self.push_bit(get_bit(raw, F::MANTISSA_BITS + x));
        }
        self.write_raw(raw, mantissa_bits);
        self.compressed += nbits as usize;

        Ok(())
    }

    /// Writes an [`f32`] with a custom layout to the buffer.
    ///
    /// Only the low `exponent_bits` of the exponent and the low
    /// `mantissa_bits` of the mantissa are kept.
    #[inline]
    pub fn write_float(
        &mut self,
        value: f32,
        has_sign: bool,
        exponent_bits: u32,
        mantissa_bits: u32,
    ) -> Result<()> {
        self.write_ieee(value, has_sign, exponent_bits, mantissa_bits)
    }

    /// Writes an [`f64`] with a custom layout to the buffer.
    ///
    /// See [`BitWriter::write_float`] for details.
    #[inline]
    pub fn write_double(
        &mut self,
        value: f64,
        has_sign: bool,
        exponent_bits: u32,
        mantissa_bits: u32,
    ) -> Result<()> {
        self.write_ieee(value, has_sign, exponent_bits, mantissa_bits)
    }

    /// Writes a variable-length integer in groups of `group_size` bits.
    ///
    /// The bit pattern of `value` is treated as unsigned, so negative
    /// values always take up all 64 bits. At least one group is written,
    /// even for `0`.
    pub fn write_varint(&mut self, value: i64, group_size: u32) -> Result<()> {
        layout::check_group_size(group_size)?;
        self.check_open()?;

        let start = self.written_bits();
        let mut rest = value as u64;
        loop {
            self.write_raw(rest, group_size);
            rest = rest.checked_shr(group_size).unwrap_or(0);

            let more = rest != 0;
            self.push_bit(more);
            if !more {
                break;
            }
        }

        let nbits = self.written_bits() - start;
        log::trace!("Wrote {nbits}-bit varint with group size {group_size}");
        self.compressed += nbits;

        Ok(())
    }

    /// Writes a fixed-point decimal value to the buffer.
    ///
    /// Digits beyond `decimal_places` are rounded away and an integral
    /// part beyond `max_abs_integer` silently loses its high bits. See
    /// [`FixedPoint`] for the layout.
    pub fn write_fixed_point(
        &mut self,
        value: f64,
        max_abs_integer: u32,
        decimal_places: u32,
    ) -> Result<()> {
        let layout = FixedPoint::new(max_abs_integer, decimal_places)?;
        self.check_open()?;

        log::trace!("Writing fixed-point decimal with layout {layout:?}");

        let (negative, integral, scaled) = layout.split(value);
        self.push_bit(negative);
        self.write_raw(integral, layout.integral_bits);
        self.write_raw(scaled, layout.decimal_bits);
        self.compressed += layout.total_bits() as usize;

        Ok(())
    }

    /// Writes `index` into a set of `count` variants, using as few bits
    /// as the set needs.
    pub fn write_variant(&mut self, index: u32, count: u32) -> Result<()> {
        let nbits = layout::variant_bits(count)?;
        if index >= count {
            return Err(Error::InvalidRange("variant index out of range"));
        }

        self.write_bitint(index, nbits)
    }

    /// Writes an angle in radians as an unsigned [`f32`], after wrapping
    /// it into a single positive turn.
    #[inline]
    pub fn write_angle(&mut self, angle: f64) -> Result<()> {
        let angle = layout::normalize_angle(angle) as f32;
        self.write_float(
            angle,
            false,
            layout::F32_EXPONENT_BITS,
            layout::F32_MANTISSA_BITS,
        )
    }

    // fn $write_fn(&mut self, value: $ty) -> Result<()>
    impl_write_literal! {
        /// Writes a full-width [`u8`] value to the buffer.
        write_u8(u8),
        /// Writes a full-width [`i8`] value to the buffer.
        write_i8(i8),

        /// Writes a full-width [`u16`] value to the buffer.
        write_u16(u16),
        /// Writes a full-width [`i16`] value to the buffer.
        write_i16(i16),

        /// Writes a full-width [`u32`] value to the buffer.
        write_u32(u32),
        /// Writes a full-width [`i32`] value to the buffer.
        write_i32(i32),

        /// Writes a full-width [`u64`] value to the buffer.
        write_u64(u64),
        /// Writes a full-width [`i64`] value to the buffer.
        write_i64(i64),
    }

    /// Writes an [`f32`] value in its native layout to the buffer.
    #[inline]
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.write_float(
            value,
            true,
            layout::F32_EXPONENT_BITS,
            layout::F32_MANTISSA_BITS,
        )
    }

    /// Writes an [`f64`] value in its native layout to the buffer.
    #[inline]
    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        self.write_double(
            value,
            true,
            layout::F64_EXPONENT_BITS,
            layout::F64_MANTISSA_BITS,
        )
    }
}
