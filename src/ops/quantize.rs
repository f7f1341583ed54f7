// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Quantize: dense f32/int8/bool tensor to packed int32 words.

use crate::bitpack::codec::pack_to_vec;
use crate::bitpack::layout::{Word, WordLayout};
use crate::bitpack::shape::rows_and_cols;
use crate::error::{KernelError, Result};
use crate::ops::{ensure_arity, input_output, Node};
use crate::types::dtype::DType;
use crate::types::tensor::Tensor;

fn check_types(input: &Tensor, output: &Tensor) -> Result<()> {
    if !input.dtype().is_binarizable() {
        return Err(KernelError::UnsupportedType(input.dtype()));
    }
    if output.dtype() != DType::Int32 {
        return Err(KernelError::UnsupportedType(output.dtype()));
    }
    if input.rank() == 0 || input.rank() != output.rank() {
        return Err(KernelError::RankMismatch {
            expected: input.rank(),
            found: output.rank(),
        });
    }
    Ok(())
}

/// Validates the node and resizes the output to the packed shape.
pub fn prepare(layout: WordLayout, tensors: &mut [Tensor], node: &Node) -> Result<()> {
    ensure_arity(node, 1, 1)?;
    let (input, output) = input_output(tensors, node.inputs[0], node.outputs[0])?;
    check_types(input, output)?;

    let packed = layout.packed_shape(input.shape())?;
    tracing::debug!("quantize: resizing output {:?} -> {:?}", output.shape(), packed);
    output.resize(&packed);
    Ok(())
}

pub fn eval(
    layout: WordLayout,
    float_threshold: f32,
    tensors: &mut [Tensor],
    node: &Node,
) -> Result<()> {
    ensure_arity(node, 1, 1)?;
    let (input, output) = input_output(tensors, node.inputs[0], node.outputs[0])?;
    check_types(input, output)?;

    let packed_shape = layout.packed_shape(input.shape())?;
    if output.shape() != packed_shape.as_slice() {
        return Err(KernelError::ShapeMismatch {
            expected: packed_shape,
            found: output.shape().to_vec(),
        });
    }

    let (rows, cols) = rows_and_cols(input.shape())?;
    tracing::trace!("quantize: {} rows x {} cols of {}", rows, cols, input.dtype());

    let words: Vec<Word> = match input.dtype() {
        DType::Float32 => pack_to_vec(input.values::<f32>()?, rows, cols, float_threshold, layout)?,
        DType::Int8 => {
            // An int8 tensor without parameters is read with zero point 0.
            let zero_point = input.quant.map(|q| q.zero_point).unwrap_or(0);
            pack_to_vec(input.values::<i8>()?, rows, cols, zero_point, layout)?
        }
        DType::Bool => pack_to_vec(input.values::<bool>()?, rows, cols, (), layout)?,
        other => return Err(KernelError::UnsupportedType(other)),
    };

    let out = output.values_mut::<i32>()?;
    for (dst, word) in out.iter_mut().zip(words) {
        *dst = word as i32;
    }
    Ok(())
}
