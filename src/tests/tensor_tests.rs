// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::error::KernelError;
use crate::types::dtype::DType;
use crate::types::quant::QuantParams;
use crate::types::tensor::{Allocation, Tensor, TensorData};

#[test]
fn test_new_is_zero_filled() {
    let t = Tensor::new(DType::Int8, &[2, 3]);
    assert_eq!(t.dtype(), DType::Int8);
    assert_eq!(t.shape(), &[2, 3]);
    assert_eq!(t.rank(), 2);
    assert_eq!(t.flat_size(), 6);
    assert_eq!(t.values::<i8>().unwrap(), &[0; 6]);
    assert_eq!(t.allocation, Allocation::Arena);
    assert!(t.quant.is_none());
}

#[test]
fn test_scalar_has_one_element() {
    let t = Tensor::new(DType::Int32, &[]);
    assert_eq!(t.rank(), 0);
    assert_eq!(t.flat_size(), 1);
}

#[test]
fn test_from_data_checks_length() {
    let t = Tensor::from_data(&[2, 2], TensorData::Float32(vec![1.0, 2.0, 3.0, 4.0])).unwrap();
    assert_eq!(t.values::<f32>().unwrap()[3], 4.0);

    let err = Tensor::from_data(&[2, 2], TensorData::Bool(vec![true])).unwrap_err();
    assert_eq!(err, KernelError::BufferSize { expected: 4, found: 1 });
}

#[test]
fn test_typed_access_rejects_wrong_type() {
    let mut t = Tensor::new(DType::Bool, &[3]);
    assert_eq!(t.values::<f32>().unwrap_err(), KernelError::UnsupportedType(DType::Bool));
    assert!(t.values_mut::<i32>().is_err());
    t.values_mut::<bool>().unwrap()[1] = true;
    assert_eq!(t.values::<bool>().unwrap(), &[false, true, false]);
}

#[test]
fn test_resize_keeps_dtype() {
    let mut t = Tensor::new(DType::Int32, &[1]).with_quant(QuantParams::new(0.5, 3));
    t.resize(&[4, 2]);
    assert_eq!(t.dtype(), DType::Int32);
    assert_eq!(t.shape(), &[4, 2]);
    assert_eq!(t.flat_size(), 8);
    assert_eq!(t.quant, Some(QuantParams::new(0.5, 3)));
}

#[test]
fn test_allocation_flags() {
    let mut t = Tensor::new(DType::Float32, &[1]).with_allocation(Allocation::Constant);
    assert!(t.is_constant());
    assert!(!t.is_dynamic());
    t.set_dynamic();
    assert!(t.is_dynamic());
}

#[test]
fn test_dtype_codes() {
    for dtype in [DType::Float32, DType::Int8, DType::Bool, DType::Int32] {
        assert_eq!(DType::from_u8(dtype as u8), Some(dtype));
    }
    assert_eq!(DType::from_u8(42), None);
    assert!(DType::Bool.is_binarizable());
    assert!(!DType::Int32.is_binarizable());
    assert_eq!(DType::Int8.to_string(), "int8");
}
