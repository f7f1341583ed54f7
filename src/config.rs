// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Configuration constants.

/// Width in bits of the storage word packed buffers are made of.
pub const STORAGE_WORD_BITS: usize = 32;

/// Default number of elements packed into each storage word.
pub const DEFAULT_WORD_BITS: usize = STORAGE_WORD_BITS;

/// Threshold the Quantize operator uses for f32 input.
pub const FLOAT_THRESHOLD: f32 = 0.0;

/// Representable range of the int8 reconstruction.
pub const INT8_MIN: i32 = i8::MIN as i32;
pub const INT8_MAX: i32 = i8::MAX as i32;
