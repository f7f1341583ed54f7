// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Packed word layout.
//!
//! A packed word holds `W` one-bit elements in a 32-bit storage word. Bit
//! order is least-significant-bit first: element `word_index * W + i` lives
//! in bit `i`. Storage bits at or above `W` are always zero.

use crate::config::{DEFAULT_WORD_BITS, STORAGE_WORD_BITS};
use crate::error::{KernelError, Result};

/// Storage type of one packed word.
pub type Word = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WordLayout {
    bits: usize,
}

impl WordLayout {
    /// Full 32-bit words.
    pub const DEFAULT: WordLayout = WordLayout {
        bits: DEFAULT_WORD_BITS,
    };

    /// `bits` must be non-zero and divide the storage word width.
    pub fn new(bits: usize) -> Result<Self> {
        if bits == 0 || bits > STORAGE_WORD_BITS || STORAGE_WORD_BITS % bits != 0 {
            return Err(KernelError::InvalidWordWidth(bits));
        }
        Ok(Self { bits })
    }

    /// Elements per word (`W`).
    #[inline]
    pub fn bits(&self) -> usize {
        self.bits
    }

    #[inline]
    pub fn bit_index_to_word_and_offset(&self, flat_index: usize) -> (usize, u32) {
        (flat_index / self.bits, (flat_index % self.bits) as u32)
    }

    /// Mask selecting the bits of a storage word that carry elements.
    #[inline]
    pub fn used_mask(&self) -> Word {
        if self.bits == STORAGE_WORD_BITS {
            Word::MAX
        } else {
            (1 << self.bits) - 1
        }
    }
}

impl Default for WordLayout {
    fn default() -> Self {
        Self::DEFAULT
    }
}
