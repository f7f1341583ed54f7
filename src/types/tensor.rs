// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Host-side tensor descriptor.
//!
//! Stands in for the runtime that owns tensors: it holds the shape, the
//! element buffer and the quantization parameters. Operators only read and
//! write through it, and only resize where their contract allows.

use crate::error::{KernelError, Result};
use crate::types::dtype::DType;
use crate::types::quant::QuantParams;

#[derive(Clone, Debug, PartialEq)]
pub enum TensorData {
    Float32(Vec<f32>),
    Int8(Vec<i8>),
    Bool(Vec<bool>),
    Int32(Vec<i32>),
}

impl TensorData {
    pub fn zeros(dtype: DType, len: usize) -> Self {
        match dtype {
            DType::Float32 => TensorData::Float32(vec![0.0; len]),
            DType::Int8 => TensorData::Int8(vec![0; len]),
            DType::Bool => TensorData::Bool(vec![false; len]),
            DType::Int32 => TensorData::Int32(vec![0; len]),
        }
    }

    pub fn dtype(&self) -> DType {
        match self {
            TensorData::Float32(_) => DType::Float32,
            TensorData::Int8(_) => DType::Int8,
            TensorData::Bool(_) => DType::Bool,
            TensorData::Int32(_) => DType::Int32,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TensorData::Float32(v) => v.len(),
            TensorData::Int8(v) => v.len(),
            TensorData::Bool(v) => v.len(),
            TensorData::Int32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// How the host allocated a tensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Allocation {
    /// Planned ahead of execution; shape fixed after `prepare`.
    #[default]
    Arena,
    /// Read-only data known before execution.
    Constant,
    /// Shape only known at `eval` time.
    Dynamic,
}

/// Maps a Rust element type to its tensor buffer variant.
pub trait TensorElement: Copy + Sized {
    const DTYPE: DType;

    fn view(data: &TensorData) -> Option<&[Self]>;
    fn view_mut(data: &mut TensorData) -> Option<&mut [Self]>;
}

macro_rules! impl_tensor_element {
    ($ty:ty, $variant:ident) => {
        impl TensorElement for $ty {
            const DTYPE: DType = DType::$variant;

            fn view(data: &TensorData) -> Option<&[Self]> {
                match data {
                    TensorData::$variant(v) => Some(v.as_slice()),
                    _ => None,
                }
            }

            fn view_mut(data: &mut TensorData) -> Option<&mut [Self]> {
                match data {
                    TensorData::$variant(v) => Some(v.as_mut_slice()),
                    _ => None,
                }
            }
        }
    };
}

impl_tensor_element!(f32, Float32);
impl_tensor_element!(i8, Int8);
impl_tensor_element!(bool, Bool);
impl_tensor_element!(i32, Int32);

#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    shape: Vec<usize>,
    data: TensorData,
    pub quant: Option<QuantParams>,
    pub allocation: Allocation,
}

impl Tensor {
    /// Creates a zero-filled tensor.
    pub fn new(dtype: DType, shape: &[usize]) -> Self {
        let len = flat_size(shape);
        Self {
            shape: shape.to_vec(),
            data: TensorData::zeros(dtype, len),
            quant: None,
            allocation: Allocation::Arena,
        }
    }

    /// Wraps an existing buffer. The buffer length must match the shape.
    pub fn from_data(shape: &[usize], data: TensorData) -> Result<Self> {
        let expected = flat_size(shape);
        if data.len() != expected {
            return Err(KernelError::BufferSize {
                expected,
                found: data.len(),
            });
        }
        Ok(Self {
            shape: shape.to_vec(),
            data,
            quant: None,
            allocation: Allocation::Arena,
        })
    }

    pub fn with_quant(mut self, quant: QuantParams) -> Self {
        self.quant = Some(quant);
        self
    }

    pub fn with_allocation(mut self, allocation: Allocation) -> Self {
        self.allocation = allocation;
        self
    }

    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn dim(&self, i: usize) -> usize {
        self.shape[i]
    }

    pub fn flat_size(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &TensorData {
        &self.data
    }

    pub fn is_constant(&self) -> bool {
        self.allocation == Allocation::Constant
    }

    pub fn is_dynamic(&self) -> bool {
        self.allocation == Allocation::Dynamic
    }

    pub fn set_dynamic(&mut self) {
        self.allocation = Allocation::Dynamic;
    }

    /// Reallocates the buffer for a new shape. Contents are zeroed.
    pub fn resize(&mut self, shape: &[usize]) {
        let dtype = self.dtype();
        self.data = TensorData::zeros(dtype, flat_size(shape));
        self.shape = shape.to_vec();
    }

    pub fn values<T: TensorElement>(&self) -> Result<&[T]> {
        T::view(&self.data).ok_or(KernelError::UnsupportedType(self.dtype()))
    }

    pub fn values_mut<T: TensorElement>(&mut self) -> Result<&mut [T]> {
        let dtype = self.dtype();
        T::view_mut(&mut self.data).ok_or(KernelError::UnsupportedType(dtype))
    }
}

/// Product of all dimensions. A rank-0 shape has one element.
pub fn flat_size(shape: &[usize]) -> usize {
    shape.iter().product()
}
