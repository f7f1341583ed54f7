// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Bit to value rules used when unpacking.

use crate::config::{INT8_MAX, INT8_MIN};
use crate::error::{KernelError, Result};
use crate::types::quant::QuantParams;

/// Output values for bit 0 and bit 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReconstructionPair<T> {
    pub zero_bit: T,
    pub one_bit: T,
}

impl<T: Copy> ReconstructionPair<T> {
    pub fn new(zero_bit: T, one_bit: T) -> Self {
        Self { zero_bit, one_bit }
    }

    #[inline]
    pub fn value(&self, bit: bool) -> T {
        if bit {
            self.one_bit
        } else {
            self.zero_bit
        }
    }
}

pub trait ReconstructionPolicy: Copy + Sized {
    type Params: Copy;

    fn reconstruction_pair(params: Self::Params) -> Result<ReconstructionPair<Self>>;
}

impl ReconstructionPolicy for f32 {
    type Params = ();

    /// Canonical ±1 binary activations.
    fn reconstruction_pair(_: ()) -> Result<ReconstructionPair<f32>> {
        Ok(ReconstructionPair::new(1.0, -1.0))
    }
}

impl ReconstructionPolicy for i8 {
    type Params = QuantParams;

    /// Affine-quantized ±1: `zero_point ± round(1 / scale)`, saturated to
    /// the int8 range.
    fn reconstruction_pair(params: QuantParams) -> Result<ReconstructionPair<i8>> {
        if !params.scale.is_finite() || params.scale <= 0.0 {
            return Err(KernelError::InvalidScale(params.scale));
        }
        // Float to int casts saturate, so a tiny scale cannot wrap.
        let offset = (1.0 / params.scale).round() as i32;
        let zero_bit = params.zero_point.saturating_add(offset).clamp(INT8_MIN, INT8_MAX);
        let one_bit = params.zero_point.saturating_sub(offset).clamp(INT8_MIN, INT8_MAX);
        Ok(ReconstructionPair::new(zero_bit as i8, one_bit as i8))
    }
}

impl ReconstructionPolicy for bool {
    type Params = ();

    /// Inverse of the boolean packing rule: bit 1 came from `false`.
    fn reconstruction_pair(_: ()) -> Result<ReconstructionPair<bool>> {
        Ok(ReconstructionPair::new(true, false))
    }
}
