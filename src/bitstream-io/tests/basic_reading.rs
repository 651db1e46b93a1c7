use bitstream_io::{BitReader, BitWriter, Error, ReaderFlags, Result};

#[test]
fn read_primitives() -> Result<()> {
    let mut buf = BitReader::new(&[0xDE, 0xC0, 0xAD, 0xDE]);

    assert_eq!(buf.remaining(), 32);

    assert_eq!(buf.u16()?, 0xC0DE);
    assert_eq!(buf.remaining(), 16);

    assert_eq!(buf.u8()?, 0xAD);
    assert_eq!(buf.i8()?, 0xDEu8 as i8);

    assert_eq!(buf.remaining(), 0);
    assert_eq!(buf.compressed_bits(), 32);

    Ok(())
}

#[test]
fn read_unaligned_fields() -> Result<()> {
    let mut buf = BitReader::new(&[0b1011_0101, 0b0000_0011]);

    assert!(buf.bool()?);
    assert_eq!(buf.read_bitint::<u8>(3)?, 0b010);
    assert_eq!(buf.read_bitint::<u16>(6)?, 0b11_1011);

    assert_eq!(buf.position(), 10);
    assert_eq!(buf.remaining(), 6);
    assert_eq!(buf.compressed_bits(), 10);

    Ok(())
}

#[test]
fn read_raw_bits_uncounted() -> Result<()> {
    let mut buf = BitReader::new(&[0b10]);

    assert!(!buf.read_bit()?);
    assert!(buf.read_bit()?);

    assert_eq!(buf.position(), 2);
    assert_eq!(buf.compressed_bits(), 0);

    Ok(())
}

#[test]
fn read_past_end_yields_zeroes() -> Result<()> {
    let mut buf = BitReader::new(&[0xFF]);

    assert_eq!(buf.read_bitint::<u16>(12)?, 0xFF);
    assert_eq!(buf.read_bitint::<u32>(32)?, 0);
    assert!(!buf.read_bit()?);

    assert_eq!(buf.position(), 45);
    assert_eq!(buf.remaining(), 0);
    assert_eq!(buf.compressed_bits(), 44);

    let mut empty = BitReader::new(&[]);
    assert_eq!(empty.read_varint(8)?, 0);
    assert_eq!(empty.f64()?, 0.0);

    Ok(())
}

#[test]
fn strict_bounds_reject_overruns() -> Result<()> {
    let mut buf = BitReader::with_flags(&[0xFF], ReaderFlags::STRICT_BOUNDS);

    assert_eq!(buf.read_bitint::<u8>(4)?, 0xF);
    assert_eq!(
        buf.read_bitint::<u8>(5),
        Err(Error::UnexpectedEof {
            requested: 5,
            remaining: 4
        })
    );

    // The rejected field must not have consumed anything.
    assert_eq!(buf.position(), 4);
    assert_eq!(buf.compressed_bits(), 4);

    assert_eq!(buf.read_bitint::<u8>(4)?, 0xF);
    assert_eq!(
        buf.read_bit(),
        Err(Error::UnexpectedEof {
            requested: 1,
            remaining: 0
        })
    );
    assert!(buf.bool().is_err());

    Ok(())
}

#[test]
fn bit_length_limits_input() -> Result<()> {
    let mut buf = BitReader::with_bit_len(&[0xFF, 0xFF], 3, ReaderFlags::empty());

    assert_eq!(buf.remaining(), 3);
    assert_eq!(buf.u8()?, 0b111);

    let clamped = BitReader::with_bit_len(&[0xFF], 100, ReaderFlags::empty());
    assert_eq!(clamped.remaining(), 8);

    Ok(())
}

#[test]
fn read_signed_int_places_sign_last() -> Result<()> {
    // Magnitude bits 0b1011, followed by a set sign bit.
    let mut buf = BitReader::new(&[0b1_1011, 0b0_0101]);

    assert_eq!(buf.read_signed_int(4, true)?, -5);
    assert_eq!(buf.position(), 5);
    assert_eq!(buf.compressed_bits(), 4);

    // Skip to the second byte, which holds a positive value.
    buf.read_bitint::<u8>(3)?;
    assert_eq!(buf.read_signed_int(4, true)?, 5);

    Ok(())
}

#[test]
fn read_custom_float_layouts() -> Result<()> {
    // Three mantissa bits only, no sign and no exponent.
    let mut buf = BitReader::new(&[0b101]);
    assert_eq!(buf.read_float(false, 0, 3)?.to_bits(), 0b101);

    // A sign bit and a full exponent of ones decode to negative infinity.
    let mut buf = BitReader::new(&[0xFF, 0x01]);
    assert_eq!(buf.read_float(true, 8, 0)?, f32::NEG_INFINITY);
    assert_eq!(buf.compressed_bits(), 9);

    // Arbitrary bit patterns are accepted, even when they form a NaN.
    let mut buf = BitReader::new(&[0xFF, 0xFF]);
    assert!(buf.read_double(false, 11, 1)?.is_nan());

    Ok(())
}

#[test]
fn read_varint_groups() -> Result<()> {
    let mut buf = BitReader::new(&[0xAC, 0x02]);

    assert_eq!(buf.read_varint(7)?, 300);
    assert_eq!(buf.position(), 16);
    assert_eq!(buf.compressed_bits(), 16);

    Ok(())
}

#[test]
fn read_fixed_point_parts() -> Result<()> {
    let mut buf = BitReader::new(&[0x27, 0x03]);

    assert_eq!(buf.read_fixed_point(10, 2)?, -3.25);
    assert_eq!(buf.position(), 12);
    assert_eq!(buf.compressed_bits(), 12);

    Ok(())
}

#[test]
fn strict_truncated_varint_consumes_nothing() -> Result<()> {
    // 21 significant bits need six 4-bit groups, 30 bits in total.
    let mut writer = BitWriter::new();
    writer.write_varint(1 << 20, 4)?;
    let data = writer.into_inner();

    let mut buf = BitReader::with_bit_len(&data, 12, ReaderFlags::STRICT_BOUNDS);
    assert_eq!(
        buf.read_varint(4),
        Err(Error::UnexpectedEof {
            requested: 1,
            remaining: 0
        })
    );
    assert_eq!(buf.position(), 0);
    assert_eq!(buf.compressed_bits(), 0);
    assert_eq!(buf.remaining(), 12);

    let mut buf = BitReader::with_flags(&data, ReaderFlags::STRICT_BOUNDS);
    assert_eq!(buf.read_varint(4)?, 1 << 20);

    Ok(())
}

#[test]
fn compressed_bits_include_zero_fill() -> Result<()> {
    let mut buf = BitReader::new(&[]);

    assert_eq!(buf.read_bitint::<u32>(32)?, 0);
    assert_eq!(buf.compressed_bits(), 32);

    Ok(())
}
