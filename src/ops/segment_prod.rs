// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! UnsortedSegmentProd: product of data rows grouped by segment id.
//!
//! Inputs are `data` (int32 or f32), `segment_ids` (int32, one per data row)
//! and `num_segments` (int32 scalar or shape `[1]`). Output row `s` is the
//! elementwise product of every data row whose id is `s`; rows no id points
//! at hold 1. Negative ids are skipped.

use crate::error::{KernelError, Result};
use crate::ops::{ensure_arity, tensor, tensor_mut, Node};
use crate::types::dtype::DType;
use crate::types::tensor::{Tensor, TensorElement};

const DATA: usize = 0;
const SEGMENT_IDS: usize = 1;
const NUM_SEGMENTS: usize = 2;

pub trait SegmentElement: TensorElement {
    const ONE: Self;

    fn product(self, other: Self) -> Self;
}

impl SegmentElement for i32 {
    const ONE: i32 = 1;

    fn product(self, other: i32) -> i32 {
        self.wrapping_mul(other)
    }
}

impl SegmentElement for f32 {
    const ONE: f32 = 1.0;

    fn product(self, other: f32) -> f32 {
        self * other
    }
}

/// Reads the segment count from a scalar or single-element tensor.
fn segment_count(num_segments: &Tensor) -> Result<i32> {
    let scalar = num_segments.rank() == 0 || (num_segments.rank() == 1 && num_segments.dim(0) == 1);
    if !scalar {
        return Err(KernelError::InvalidSegmentCount(format!(
            "expected a scalar or shape [1], found {:?}",
            num_segments.shape()
        )));
    }
    let count = num_segments.values::<i32>()?[0];
    if count < 0 {
        return Err(KernelError::InvalidSegmentCount(format!(
            "negative count {}",
            count
        )));
    }
    Ok(count)
}

/// Output shape `[num_segments, data.dims[1..]]`, after checking every id.
pub fn output_shape(data: &Tensor, segment_ids: &Tensor, num_segments: &Tensor) -> Result<Vec<usize>> {
    let count = segment_count(num_segments)?;

    if data.rank() == 0 || segment_ids.rank() == 0 {
        return Err(KernelError::RankMismatch {
            expected: 1,
            found: 0,
        });
    }
    if segment_ids.dim(0) != data.dim(0) {
        return Err(KernelError::ShapeMismatch {
            expected: vec![data.dim(0)],
            found: segment_ids.shape().to_vec(),
        });
    }

    let max_id = segment_ids.values::<i32>()?.iter().copied().max().unwrap_or(-1);
    if max_id >= count {
        return Err(KernelError::SegmentIdOutOfRange {
            id: max_id,
            num_segments: count,
        });
    }

    let mut shape = data.shape().to_vec();
    shape[0] = count as usize;
    Ok(shape)
}

/// Multiplies rows of `data` (each `row_len` long) into the
/// `num_segments` rows of `out` by segment id.
pub fn unsorted_segment_prod<T: SegmentElement>(
    data: &[T],
    row_len: usize,
    segment_ids: &[i32],
    num_segments: usize,
    out: &mut [T],
) -> Result<()> {
    let expected = segment_ids.len() * row_len;
    if data.len() != expected {
        return Err(KernelError::BufferSize {
            expected,
            found: data.len(),
        });
    }
    let expected = num_segments * row_len;
    if out.len() != expected {
        return Err(KernelError::BufferSize {
            expected,
            found: out.len(),
        });
    }
    if let Some(&id) = segment_ids.iter().find(|&&id| id >= 0 && id as usize >= num_segments) {
        return Err(KernelError::SegmentIdOutOfRange {
            id,
            num_segments: num_segments as i32,
        });
    }

    out.fill(T::ONE);
    if row_len == 0 {
        return Ok(());
    }

    for (row, &id) in data.chunks_exact(row_len).zip(segment_ids) {
        if id < 0 {
            continue;
        }
        let start = id as usize * row_len;
        for (acc, &value) in out[start..start + row_len].iter_mut().zip(row) {
            *acc = acc.product(value);
        }
    }
    Ok(())
}

pub fn prepare(tensors: &mut [Tensor], node: &Node) -> Result<()> {
    ensure_arity(node, 3, 1)?;
    let data = tensor(tensors, node.inputs[DATA])?;
    let segment_ids = tensor(tensors, node.inputs[SEGMENT_IDS])?;
    let num_segments = tensor(tensors, node.inputs[NUM_SEGMENTS])?;
    let output = tensor(tensors, node.outputs[0])?;

    if !matches!(data.dtype(), DType::Int32 | DType::Float32) {
        return Err(KernelError::UnsupportedType(data.dtype()));
    }
    if segment_ids.dtype() != DType::Int32 {
        return Err(KernelError::UnsupportedType(segment_ids.dtype()));
    }
    if num_segments.dtype() != DType::Int32 {
        return Err(KernelError::UnsupportedType(num_segments.dtype()));
    }
    if output.dtype() != data.dtype() {
        return Err(KernelError::UnsupportedType(output.dtype()));
    }

    if data.is_dynamic() || !segment_ids.is_constant() || !num_segments.is_constant() {
        tracing::debug!("segment_prod: output shape deferred to eval");
        tensor_mut(tensors, node.outputs[0])?.set_dynamic();
        return Ok(());
    }

    let shape = output_shape(data, segment_ids, num_segments)?;
    tracing::debug!("segment_prod: resizing output to {:?}", shape);
    tensor_mut(tensors, node.outputs[0])?.resize(&shape);
    Ok(())
}

fn compute<T: SegmentElement>(data: &Tensor, segment_ids: &Tensor, num_segments: usize) -> Result<Vec<T>> {
    let row_len: usize = data.shape()[1..].iter().product();
    let mut out = vec![T::ONE; num_segments * row_len];
    unsorted_segment_prod(
        data.values::<T>()?,
        row_len,
        segment_ids.values::<i32>()?,
        num_segments,
        &mut out,
    )?;
    Ok(out)
}

pub fn eval(tensors: &mut [Tensor], node: &Node) -> Result<()> {
    ensure_arity(node, 3, 1)?;
    let data = tensor(tensors, node.inputs[DATA])?;
    let segment_ids = tensor(tensors, node.inputs[SEGMENT_IDS])?;
    let num_segments = tensor(tensors, node.inputs[NUM_SEGMENTS])?;
    let output = tensor(tensors, node.outputs[0])?;

    if output.dtype() != data.dtype() {
        return Err(KernelError::UnsupportedType(output.dtype()));
    }
    let shape = output_shape(data, segment_ids, num_segments)?;
    if !output.is_dynamic() && output.shape() != shape.as_slice() {
        return Err(KernelError::ShapeMismatch {
            expected: shape,
            found: output.shape().to_vec(),
        });
    }

    let num_segments = shape[0];
    match data.dtype() {
        DType::Int32 => {
            let values = compute::<i32>(data, segment_ids, num_segments)?;
            write_output(tensors, node, &shape, |out: &mut [i32]| out.copy_from_slice(&values))
        }
        DType::Float32 => {
            let values = compute::<f32>(data, segment_ids, num_segments)?;
            write_output(tensors, node, &shape, |out: &mut [f32]| out.copy_from_slice(&values))
        }
        other => Err(KernelError::UnsupportedType(other)),
    }
}

fn write_output<T: TensorElement>(
    tensors: &mut [Tensor],
    node: &Node,
    shape: &[usize],
    fill: impl FnOnce(&mut [T]),
) -> Result<()> {
    let output = tensor_mut(tensors, node.outputs[0])?;
    if output.shape() != shape {
        output.resize(shape);
    }
    fill(output.values_mut::<T>()?);
    Ok(())
}
