// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Packed/unpacked shape relationship.
//!
//! Only the last dimension is packed. The unpacked size cannot be recovered
//! from a packed size (the last word may be partly filled), so the unpack
//! direction validates a caller-declared shape and never infers one.

use crate::bitpack::layout::WordLayout;
use crate::error::{KernelError, Result};

impl WordLayout {
    /// `ceil(unpacked_size / W)`.
    #[inline]
    pub fn packed_size(&self, unpacked_size: usize) -> usize {
        unpacked_size.div_ceil(self.bits())
    }

    pub fn validate_unpack(&self, packed_size: usize, claimed_unpacked_size: usize) -> bool {
        self.packed_size(claimed_unpacked_size) == packed_size
    }

    /// Shape of the packed form of a tensor with dims `unpacked`.
    pub fn packed_shape(&self, unpacked: &[usize]) -> Result<Vec<usize>> {
        let (last, _) = unpacked.split_last().ok_or(KernelError::RankMismatch {
            expected: 1,
            found: 0,
        })?;
        let mut packed = unpacked.to_vec();
        let n = packed.len();
        packed[n - 1] = self.packed_size(*last);
        Ok(packed)
    }

    /// Checks that `unpacked` is a valid destination shape for `packed`.
    pub fn check_unpacked_shape(&self, packed: &[usize], unpacked: &[usize]) -> Result<()> {
        if packed.is_empty() || packed.len() != unpacked.len() {
            return Err(KernelError::RankMismatch {
                expected: packed.len(),
                found: unpacked.len(),
            });
        }
        let last = packed.len() - 1;
        let leading_match = packed[..last] == unpacked[..last];
        if !leading_match || !self.validate_unpack(packed[last], unpacked[last]) {
            return Err(KernelError::ShapeMismatch {
                expected: packed.to_vec(),
                found: self.packed_shape(unpacked)?,
            });
        }
        Ok(())
    }
}

/// Splits a shape into `(rows, cols)`: cols is the last dimension, rows the
/// product of all others.
pub fn rows_and_cols(shape: &[usize]) -> Result<(usize, usize)> {
    match shape.split_last() {
        Some((cols, leading)) => Ok((leading.iter().product(), *cols)),
        None => Err(KernelError::RankMismatch {
            expected: 1,
            found: 0,
        }),
    }
}
