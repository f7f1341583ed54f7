// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Operator adapters: the boundary to the host runtime.
//!
//! Each operator validates the host's tensors in `prepare` (sizing outputs
//! where its contract allows) and computes in `eval`. Failures are logged
//! through `tracing` and returned; nothing is written to an output before
//! validation has passed.

pub mod dequantize;
pub mod quantize;
pub mod segment_prod;

use crate::bitpack::layout::WordLayout;
use crate::config::FLOAT_THRESHOLD;
use crate::error::{KernelError, Result};
use crate::types::tensor::Tensor;

pub const OP_QUANTIZE: u8 = 1;
pub const OP_DEQUANTIZE: u8 = 2;
pub const OP_UNSORTED_SEGMENT_PROD: u8 = 3;

/// Tensor indices an operator node reads and writes.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Node {
    pub inputs: Vec<usize>,
    pub outputs: Vec<usize>,
}

impl Node {
    pub fn new(inputs: &[usize], outputs: &[usize]) -> Self {
        Self {
            inputs: inputs.to_vec(),
            outputs: outputs.to_vec(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operator {
    /// Binarizes f32, int8 or bool input into packed int32 words.
    Quantize {
        layout: WordLayout,
        float_threshold: f32,
    },
    /// Reconstructs f32, int8 or bool output from packed int32 words.
    Dequantize { layout: WordLayout },
    /// Product of data rows grouped by segment id.
    UnsortedSegmentProd,
}

impl Operator {
    pub fn quantize() -> Self {
        Operator::Quantize {
            layout: WordLayout::DEFAULT,
            float_threshold: FLOAT_THRESHOLD,
        }
    }

    pub fn dequantize() -> Self {
        Operator::Dequantize {
            layout: WordLayout::DEFAULT,
        }
    }

    pub fn from_u8(code: u8) -> Option<Self> {
        match code {
            OP_QUANTIZE => Some(Self::quantize()),
            OP_DEQUANTIZE => Some(Self::dequantize()),
            OP_UNSORTED_SEGMENT_PROD => Some(Operator::UnsortedSegmentProd),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "LceQuantize" => Some(Self::quantize()),
            "LceDequantize" => Some(Self::dequantize()),
            "UnsortedSegmentProd" => Some(Operator::UnsortedSegmentProd),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Operator::Quantize { .. } => OP_QUANTIZE,
            Operator::Dequantize { .. } => OP_DEQUANTIZE,
            Operator::UnsortedSegmentProd => OP_UNSORTED_SEGMENT_PROD,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operator::Quantize { .. } => "LceQuantize",
            Operator::Dequantize { .. } => "LceDequantize",
            Operator::UnsortedSegmentProd => "UnsortedSegmentProd",
        }
    }

    pub fn prepare(&self, tensors: &mut [Tensor], node: &Node) -> Result<()> {
        let result = match *self {
            Operator::Quantize { layout, .. } => quantize::prepare(layout, tensors, node),
            Operator::Dequantize { layout } => dequantize::prepare(layout, tensors, node),
            Operator::UnsortedSegmentProd => segment_prod::prepare(tensors, node),
        };
        if let Err(e) = &result {
            tracing::error!("{}: prepare failed: {}", self.name(), e);
        }
        result
    }

    pub fn eval(&self, tensors: &mut [Tensor], node: &Node) -> Result<()> {
        let result = match *self {
            Operator::Quantize {
                layout,
                float_threshold,
            } => quantize::eval(layout, float_threshold, tensors, node),
            Operator::Dequantize { layout } => dequantize::eval(layout, tensors, node),
            Operator::UnsortedSegmentProd => segment_prod::eval(tensors, node),
        };
        if let Err(e) = &result {
            tracing::error!("{}: eval failed: {}", self.name(), e);
        }
        result
    }

    /// `prepare` followed by `eval`.
    pub fn invoke(&self, tensors: &mut [Tensor], node: &Node) -> Result<()> {
        self.prepare(tensors, node)?;
        self.eval(tensors, node)
    }
}

pub(crate) fn ensure_arity(node: &Node, inputs: usize, outputs: usize) -> Result<()> {
    if node.inputs.len() != inputs {
        return Err(KernelError::Arity {
            kind: "inputs",
            expected: inputs,
            found: node.inputs.len(),
        });
    }
    if node.outputs.len() != outputs {
        return Err(KernelError::Arity {
            kind: "outputs",
            expected: outputs,
            found: node.outputs.len(),
        });
    }
    Ok(())
}

pub(crate) fn tensor(tensors: &[Tensor], index: usize) -> Result<&Tensor> {
    tensors.get(index).ok_or(KernelError::TensorIndex(index))
}

pub(crate) fn tensor_mut(tensors: &mut [Tensor], index: usize) -> Result<&mut Tensor> {
    tensors.get_mut(index).ok_or(KernelError::TensorIndex(index))
}

/// Borrows one input immutably and one output mutably from the same arena.
pub(crate) fn input_output(
    tensors: &mut [Tensor],
    input: usize,
    output: usize,
) -> Result<(&Tensor, &mut Tensor)> {
    let len = tensors.len();
    if input >= len {
        return Err(KernelError::TensorIndex(input));
    }
    if output >= len {
        return Err(KernelError::TensorIndex(output));
    }
    if input == output {
        return Err(KernelError::AliasedTensor(output));
    }

    if input < output {
        let (lo, hi) = tensors.split_at_mut(output);
        Ok((&lo[input], &mut hi[0]))
    } else {
        let (lo, hi) = tensors.split_at_mut(input);
        Ok((&hi[0], &mut lo[output]))
    }
}
