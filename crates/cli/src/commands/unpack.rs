use crate::tensor_file;
use anyhow::bail;
use binq_kernel::types::{DType, QuantParams, Tensor};
use binq_kernel::{Node, Operator};
use binq_persistence::container;
use std::path::Path;

/// Target datatype and quantization for reconstruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnpackOptions {
    /// Defaults to the container's source dtype.
    pub dtype: Option<DType>,
    pub scale: Option<f32>,
    pub zero_point: Option<i32>,
}

pub fn run(input: &Path, output: &Path, options: UnpackOptions) -> anyhow::Result<Tensor> {
    let packed = container::read_file(input)?;
    let dtype = options.dtype.unwrap_or(packed.header.source_dtype);
    if !dtype.is_binarizable() {
        bail!("cannot reconstruct into {}", dtype);
    }

    let mut dense = Tensor::new(dtype, &packed.header.shape);
    if dtype == DType::Int8 {
        let defaults = QuantParams::default();
        dense = dense.with_quant(QuantParams::new(
            options.scale.unwrap_or(defaults.scale),
            options.zero_point.unwrap_or(defaults.zero_point),
        ));
    }
    tracing::info!("Unpacking {:?} into {}", packed.header.shape, dtype);

    let op = Operator::Dequantize {
        layout: packed.header.layout()?,
    };
    let mut tensors = vec![packed.to_tensor()?, dense];
    op.invoke(&mut tensors, &Node::new(&[0], &[1]))?;

    let dense = tensors.pop().ok_or_else(|| anyhow::anyhow!("dequantize produced no output"))?;
    tensor_file::write(output, &dense)?;
    println!("Unpacked {} elements to {}", dense.flat_size(), output.display());
    Ok(dense)
}
