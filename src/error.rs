// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use crate::types::dtype::DType;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    /// Packed and unpacked shapes disagree, or a resize target has the wrong rank.
    #[error("Shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch { expected: Vec<usize>, found: Vec<usize> },

    #[error("Rank mismatch: expected {expected}, found {found}")]
    RankMismatch { expected: usize, found: usize },

    #[error("Unsupported datatype: {0:?}")]
    UnsupportedType(DType),

    #[error("Wrong number of {kind}: expected {expected}, found {found}")]
    Arity {
        kind: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Buffer size mismatch: expected {expected} elements, found {found}")]
    BufferSize { expected: usize, found: usize },

    #[error("Element count overflows usize")]
    Overflow,

    #[error("Invalid word width {0}: must be in 1..=32 and divide 32")]
    InvalidWordWidth(usize),

    #[error("Invalid quantization scale: {0}")]
    InvalidScale(f32),

    #[error("Missing quantization parameters for {0:?} tensor")]
    MissingQuantization(DType),

    #[error("Segment id {id} out of range for {num_segments} segments")]
    SegmentIdOutOfRange { id: i32, num_segments: i32 },

    #[error("Invalid segment count tensor: {0}")]
    InvalidSegmentCount(String),

    #[error("Tensor index {0} out of range")]
    TensorIndex(usize),

    #[error("Tensor {0} is both an input and an output")]
    AliasedTensor(usize),
}

pub type KernelResult<T> = core::result::Result<T, KernelError>;
pub type Result<T> = KernelResult<T>;
