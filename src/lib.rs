// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! binq-kernel: one-bit quantization codec for binarized inference.
//!
//! Dense f32, int8 and bool tensors are packed to one bit per element along
//! their last dimension, and packed words are reconstructed into dense
//! tensors. `bitpack` holds the codec, `ops` the host-facing operators.

pub mod config;
pub mod error;
pub mod types;
pub mod bitpack;
pub mod ops;

pub use bitpack::WordLayout;
pub use error::{KernelError, Result};
pub use ops::{Node, Operator};
pub use types::{DType, QuantParams, Tensor, TensorData};

#[cfg(test)]
pub mod tests;
