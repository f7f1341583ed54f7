// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Value to bit rules used when packing.
//!
//! Numeric inputs set the bit when the value is below the threshold, so
//! negative activations map to bit 1. Booleans are matched on their bit
//! pattern instead: the all-zero pattern (`false`) maps to bit 1 and every
//! other pattern maps to bit 0.

/// Bit written for a `false` (all-zero pattern) boolean.
pub const BOOL_FALSE_BIT: bool = true;

/// Bit written for every other boolean pattern.
pub const BOOL_TRUE_BIT: bool = false;

/// Underlying byte pattern of `false`.
pub const BOOL_FALSE_PATTERN: u8 = 0;

pub trait ThresholdPolicy: Copy {
    /// Parameter the comparison is made against.
    type Threshold: Copy;

    /// Returns `true` when the element packs to bit 1.
    fn to_bit(self, threshold: Self::Threshold) -> bool;
}

impl ThresholdPolicy for f32 {
    type Threshold = f32;

    #[inline]
    fn to_bit(self, threshold: f32) -> bool {
        // NaN compares false and packs to 0, as does -0.0 against 0.0.
        self < threshold
    }
}

impl ThresholdPolicy for i8 {
    /// Zero point of the source tensor. Kept wide so out-of-range zero
    /// points still compare correctly.
    type Threshold = i32;

    #[inline]
    fn to_bit(self, zero_point: i32) -> bool {
        (self as i32) < zero_point
    }
}

impl ThresholdPolicy for bool {
    type Threshold = ();

    #[inline]
    fn to_bit(self, _: ()) -> bool {
        RawBool(self as u8).to_bit(())
    }
}

/// A boolean as raw host bytes, where any non-zero byte means `true`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct RawBool(pub u8);

impl ThresholdPolicy for RawBool {
    type Threshold = ();

    #[inline]
    fn to_bit(self, _: ()) -> bool {
        if self.0 == BOOL_FALSE_PATTERN {
            BOOL_FALSE_BIT
        } else {
            BOOL_TRUE_BIT
        }
    }
}
