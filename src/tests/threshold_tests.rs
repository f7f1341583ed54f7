// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::bitpack::threshold::{RawBool, ThresholdPolicy, BOOL_FALSE_BIT, BOOL_TRUE_BIT};

#[test]
fn test_float_sign_rule() {
    assert!((-1.0f32).to_bit(0.0));
    assert!((-0.3f32).to_bit(0.0));
    assert!(!(0.5f32).to_bit(0.0));
    assert!(!(2.0f32).to_bit(0.0));
    // Equal to the threshold is not below it.
    assert!(!(0.0f32).to_bit(0.0));
}

#[test]
fn test_float_edge_values() {
    assert!(!(-0.0f32).to_bit(0.0));
    assert!(!f32::NAN.to_bit(0.0));
    assert!(f32::NEG_INFINITY.to_bit(0.0));
    assert!(!f32::INFINITY.to_bit(0.0));
}

#[test]
fn test_float_custom_threshold() {
    assert!(0.4f32.to_bit(0.5));
    assert!(!0.6f32.to_bit(0.5));
}

#[test]
fn test_int8_zero_point_rule() {
    assert!((-1i8).to_bit(0));
    assert!(!(0i8).to_bit(0));
    assert!(!(1i8).to_bit(0));

    // Relative to a non-zero zero point.
    assert!((9i8).to_bit(10));
    assert!(!(10i8).to_bit(10));
    assert!(!(-128i8).to_bit(-128));
    assert!((127i8).to_bit(200));
}

#[test]
fn test_bool_is_inverted() {
    // false (all-zero pattern) packs to 1, true packs to 0.
    assert_eq!(false.to_bit(()), BOOL_FALSE_BIT);
    assert_eq!(true.to_bit(()), BOOL_TRUE_BIT);
    assert!(false.to_bit(()));
    assert!(!true.to_bit(()));
}

#[test]
fn test_raw_bool_pattern_matching() {
    assert_eq!(RawBool(0).to_bit(()), BOOL_FALSE_BIT);
    for byte in [1u8, 2, 0x80, 0xFF] {
        assert_eq!(RawBool(byte).to_bit(()), BOOL_TRUE_BIT, "byte {:#x}", byte);
    }
}
