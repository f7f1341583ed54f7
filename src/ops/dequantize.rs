// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Dequantize: packed int32 words to dense f32/int8/bool.
//!
//! The destination shape is supplied by the host. It is validated against the
//! packed shape and never resized, since a packed last dimension does not
//! determine the unpacked one.

use crate::bitpack::codec::unpack_matrix;
use crate::bitpack::layout::{Word, WordLayout};
use crate::bitpack::reconstruct::ReconstructionPolicy;
use crate::bitpack::shape::rows_and_cols;
use crate::error::{KernelError, Result};
use crate::ops::{ensure_arity, input_output, Node};
use crate::types::dtype::DType;
use crate::types::tensor::Tensor;

fn check(layout: WordLayout, input: &Tensor, output: &Tensor) -> Result<()> {
    if input.dtype() != DType::Int32 {
        return Err(KernelError::UnsupportedType(input.dtype()));
    }
    if !output.dtype().is_binarizable() {
        return Err(KernelError::UnsupportedType(output.dtype()));
    }
    layout.check_unpacked_shape(input.shape(), output.shape())
}

pub fn prepare(layout: WordLayout, tensors: &mut [Tensor], node: &Node) -> Result<()> {
    ensure_arity(node, 1, 1)?;
    let (input, output) = input_output(tensors, node.inputs[0], node.outputs[0])?;
    check(layout, input, output)
}

pub fn eval(layout: WordLayout, tensors: &mut [Tensor], node: &Node) -> Result<()> {
    ensure_arity(node, 1, 1)?;
    let (input, output) = input_output(tensors, node.inputs[0], node.outputs[0])?;
    check(layout, input, output)?;

    let (rows, cols) = rows_and_cols(output.shape())?;
    tracing::trace!("dequantize: {} rows x {} cols to {}", rows, cols, output.dtype());

    let words: Vec<Word> = input.values::<i32>()?.iter().map(|&w| w as Word).collect();

    match output.dtype() {
        DType::Float32 => {
            let pair = f32::reconstruction_pair(())?;
            unpack_matrix(&words, rows, cols, pair, layout, output.values_mut::<f32>()?)
        }
        DType::Int8 => {
            let quant = output.quant.ok_or(KernelError::MissingQuantization(DType::Int8))?;
            let pair = i8::reconstruction_pair(quant)?;
            unpack_matrix(&words, rows, cols, pair, layout, output.values_mut::<i8>()?)
        }
        DType::Bool => {
            let pair = bool::reconstruction_pair(())?;
            unpack_matrix(&words, rows, cols, pair, layout, output.values_mut::<bool>()?)
        }
        other => Err(KernelError::UnsupportedType(other)),
    }
}
