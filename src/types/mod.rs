// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod dtype;
pub mod quant;
pub mod tensor;

pub use dtype::DType;
pub use quant::QuantParams;
pub use tensor::{Allocation, Tensor, TensorData, TensorElement};
