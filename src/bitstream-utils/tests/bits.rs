use bitstream_utils::bits::*;

#[test]
fn get_and_set_bits() {
    let v = set_bit(0u8, 3, true);
    assert_eq!(v, 0b1000);
    assert!(get_bit(v, 3));
    assert!(!get_bit(v, 2));

    assert_eq!(set_bit(v, 3, false), 0);
    assert_eq!(set_bit(0xFFu8, 0, false), 0xFE);
}

#[test]
fn sign_bit_positions() {
    assert_eq!(set_bit(0i32, 31, true), i32::MIN);
    assert!(get_bit(-1i64, 63));
    assert!(!get_bit(i16::MAX, 15));
    assert_eq!(set_bit(-1i8, 7, false), i8::MAX);
}

#[test]
fn bits_needed_for_ranges() {
    assert_eq!(bits_needed(0), 1);
    assert_eq!(bits_needed(1), 1);
    assert_eq!(bits_needed(2), 1);
    assert_eq!(bits_needed(3), 2);
    assert_eq!(bits_needed(4), 2);
    assert_eq!(bits_needed(5), 3);
    assert_eq!(bits_needed(100), 7);
    assert_eq!(bits_needed(1 << 32), 32);
    assert_eq!(bits_needed((1 << 32) + 1), 33);
    assert_eq!(bits_needed(u64::MAX), 64);
}

#[test]
fn sign_extension() {
    assert_eq!(sign_extend(0b1_1011, 5), -5);
    assert_eq!(sign_extend(0b0_1011, 5), 11);
    assert_eq!(sign_extend(1, 1), -1);
    assert_eq!(sign_extend(u64::MAX, 64), -1);
    assert_eq!(sign_extend(1 << 32, 33), -(1 << 32));
}
