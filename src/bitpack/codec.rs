// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Pack and unpack whole buffers.
//!
//! Both directions work on a row-major 2-D view: `cols` is the unpacked last
//! dimension, `rows` the product of all other dimensions. Each row starts on
//! a fresh word, so a packed row is `layout.packed_size(cols)` words long.
//! All sizes are checked before the output is touched.

use crate::bitpack::layout::{Word, WordLayout};
use crate::bitpack::reconstruct::ReconstructionPair;
use crate::bitpack::threshold::ThresholdPolicy;
use crate::error::{KernelError, Result};

fn checked_len(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols).ok_or(KernelError::Overflow)
}

fn expect_len(expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(KernelError::BufferSize { expected, found });
    }
    Ok(())
}

/// Packs up to `W` elements into one word. Unused bits stay zero.
#[inline]
fn pack_word<T: ThresholdPolicy>(chunk: &[T], threshold: T::Threshold) -> Word {
    chunk
        .iter()
        .enumerate()
        .fold(0, |word, (i, &value)| {
            if value.to_bit(threshold) {
                word | (1 << i)
            } else {
                word
            }
        })
}

/// Packs a single row of `src.len()` elements.
pub fn pack<T: ThresholdPolicy>(
    src: &[T],
    threshold: T::Threshold,
    layout: WordLayout,
    out: &mut [Word],
) -> Result<()> {
    pack_matrix(src, 1, src.len(), threshold, layout, out)
}

/// Packs `rows` rows of `cols` elements into `rows * packed_size(cols)` words.
///
/// Every output word is overwritten, so stale bits in `out` never survive in
/// the padding.
pub fn pack_matrix<T: ThresholdPolicy>(
    src: &[T],
    rows: usize,
    cols: usize,
    threshold: T::Threshold,
    layout: WordLayout,
    out: &mut [Word],
) -> Result<()> {
    let packed_cols = layout.packed_size(cols);
    expect_len(checked_len(rows, cols)?, src.len())?;
    expect_len(checked_len(rows, packed_cols)?, out.len())?;

    if cols == 0 {
        return Ok(());
    }

    for (src_row, out_row) in src.chunks_exact(cols).zip(out.chunks_exact_mut(packed_cols)) {
        for (chunk, word) in src_row.chunks(layout.bits()).zip(out_row.iter_mut()) {
            *word = pack_word(chunk, threshold);
        }
    }
    Ok(())
}

pub fn pack_to_vec<T: ThresholdPolicy>(
    src: &[T],
    rows: usize,
    cols: usize,
    threshold: T::Threshold,
    layout: WordLayout,
) -> Result<Vec<Word>> {
    let mut out = vec![0; checked_len(rows, layout.packed_size(cols))?];
    pack_matrix(src, rows, cols, threshold, layout, &mut out)?;
    Ok(out)
}

/// Unpacks `rows * packed_size(cols)` words into `rows * cols` values.
pub fn unpack_matrix<T: Copy>(
    packed: &[Word],
    rows: usize,
    cols: usize,
    pair: ReconstructionPair<T>,
    layout: WordLayout,
    out: &mut [T],
) -> Result<()> {
    let packed_cols = layout.packed_size(cols);
    expect_len(checked_len(rows, packed_cols)?, packed.len())?;
    expect_len(checked_len(rows, cols)?, out.len())?;

    if cols == 0 {
        return Ok(());
    }

    for (words, out_row) in packed.chunks_exact(packed_cols).zip(out.chunks_exact_mut(cols)) {
        for (col, value) in out_row.iter_mut().enumerate() {
            let (word_index, offset) = layout.bit_index_to_word_and_offset(col);
            let bit = (words[word_index] >> offset) & 1 == 1;
            *value = pair.value(bit);
        }
    }
    Ok(())
}

pub fn unpack_to_vec<T: Copy>(
    packed: &[Word],
    rows: usize,
    cols: usize,
    pair: ReconstructionPair<T>,
    layout: WordLayout,
) -> Result<Vec<T>> {
    let len = checked_len(rows, cols)?;
    let mut out = vec![pair.zero_bit; len];
    unpack_matrix(packed, rows, cols, pair, layout, &mut out)?;
    Ok(out)
}
