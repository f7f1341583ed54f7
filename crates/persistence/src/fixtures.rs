use crate::container::{self, PackedTensor};
use crate::error::Result;

use binq_kernel::types::{DType, QuantParams, Tensor, TensorData};
use binq_kernel::{Node, Operator, WordLayout};
use std::fs;
use std::path::{Path, PathBuf};

pub struct TestPaths {
    pub float: PathBuf,
    pub int8: PathBuf,
    pub bool: PathBuf,
    pub corrupt: PathBuf,
}

/// Quantizes `input` with the default operator and wraps the words.
pub fn pack_tensor(input: Tensor, layout: WordLayout) -> Result<PackedTensor> {
    let dtype = input.dtype();
    let shape = input.shape().to_vec();
    let op = Operator::Quantize {
        layout,
        float_threshold: binq_kernel::config::FLOAT_THRESHOLD,
    };
    // Same rank as the input; prepare sizes it.
    let output = Tensor::new(DType::Int32, &vec![0; shape.len()]);
    let mut tensors = vec![input, output];
    let node = Node::new(&[0], &[1]);
    op.invoke(&mut tensors, &node)?;
    PackedTensor::from_tensor(layout, dtype, &shape, &tensors[1])
}

/// Writes one container per source dtype plus a corrupted copy of the float one.
pub fn generate_test_scenario(dir: &Path) -> Result<TestPaths> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    // 2 x 40 floats alternating sign, so each row spills into a second word.
    let floats: Vec<f32> = (0..80).map(|i| if i % 2 == 0 { 1.5 } else { -0.5 }).collect();
    let float = Tensor::from_data(&[2, 40], TensorData::Float32(floats))?;
    let float_packed = pack_tensor(float, WordLayout::DEFAULT)?;
    let float_path = dir.join("float.binq");
    container::write_file(&float_path, &float_packed)?;

    let bytes: Vec<i8> = vec![-3, 7, 2, 2, -128, 127, 0, 1, 5];
    let int8 = Tensor::from_data(&[3, 3], TensorData::Int8(bytes))?.with_quant(QuantParams::new(0.5, 2));
    let int8_path = dir.join("int8.binq");
    container::write_file(&int8_path, &pack_tensor(int8, WordLayout::new(8)?)?)?;

    let flags = vec![true, false, false, true, true, false];
    let flags = Tensor::from_data(&[6], TensorData::Bool(flags))?;
    let bool_path = dir.join("bool.binq");
    container::write_file(&bool_path, &pack_tensor(flags, WordLayout::DEFAULT)?)?;

    let corrupt_path = dir.join("corrupt.binq");
    let mut corrupted = float_packed;
    corrupted.words[0] ^= 0x10;
    container::write_file(&corrupt_path, &corrupted)?;

    Ok(TestPaths {
        float: float_path,
        int8: int8_path,
        bool: bool_path,
        corrupt: corrupt_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_scenario_files_load() {
        let dir = tempdir().unwrap();
        let paths = generate_test_scenario(dir.path()).unwrap();

        let float = container::read_file(&paths.float).unwrap();
        assert_eq!(float.header.shape, vec![2, 40]);
        assert_eq!(float.header.source_dtype, DType::Float32);
        // Negative values sit at odd positions.
        assert_eq!(float.words, vec![0xAAAA_AAAA, 0xAA, 0xAAAA_AAAA, 0xAA]);

        let int8 = container::read_file(&paths.int8).unwrap();
        assert_eq!(int8.header.word_bits, 8);
        assert_eq!(int8.header.packed_shape().unwrap(), vec![3, 1]);
        // Row bits, zero point 2: [-3,7,2] -> 001, [2,-128,127] -> 010, [0,1,5] -> 011
        assert_eq!(int8.words, vec![0b001, 0b010, 0b011]);

        let flags = container::read_file(&paths.bool).unwrap();
        assert_eq!(flags.words, vec![0b100110]);

        assert!(container::read_file(&paths.corrupt).is_err());
    }
}
