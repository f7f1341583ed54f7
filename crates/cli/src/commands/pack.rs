use crate::config::CodecConfig;
use crate::tensor_file;
use binq_kernel::types::{DType, Tensor};
use binq_kernel::Node;
use binq_persistence::{container, PackedTensor};
use std::path::Path;

/// Packs a dense JSON tensor into a container file.
pub fn run(input: &Path, output: &Path, config: CodecConfig) -> anyhow::Result<PackedTensor> {
    let dense = tensor_file::read(input)?;
    let dtype = dense.dtype();
    let shape = dense.shape().to_vec();
    tracing::info!("Packing {} tensor {:?} with {}-bit words", dtype, shape, config.word_bits);

    let op = config.quantize()?;
    let mut tensors = vec![dense, Tensor::new(DType::Int32, &vec![0; shape.len()])];
    op.invoke(&mut tensors, &Node::new(&[0], &[1]))?;

    let packed = PackedTensor::from_tensor(config.layout()?, dtype, &shape, &tensors[1])?;
    container::write_file(output, &packed)?;

    println!(
        "Packed {:?} {} -> {:?} ({} words, crc64 {:016x})",
        shape,
        dtype,
        packed.header.packed_shape()?,
        packed.words.len(),
        packed.header.checksum
    );
    Ok(packed)
}
