//! On-disk container for one packed tensor.
//!
//! Layout (little-endian):
//!
//! ```text
//! magic "BINQ" | version u32 | word_bits u8 | source dtype u8 | reserved u16
//! rank u32 | dims u64 * rank (unpacked shape) | word_count u64 | checksum u64
//! words u32 * word_count
//! ```
//!
//! The unpacked shape is stored because it cannot be recovered from the
//! packed words alone. The checksum is CRC64 over the word payload.

use crate::error::{PersistenceError, Result};
use binq_kernel::bitpack::{rows_and_cols, Word, WordLayout};
use binq_kernel::types::{DType, Tensor, TensorData};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use crc64fast::Digest;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Upper bound on stored rank, to reject garbage before allocating.
pub const MAX_RANK: u32 = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    pub magic: [u8; 4],
    pub version: u32,
    pub word_bits: u8,
    pub source_dtype: DType,
    pub shape: Vec<usize>,
    pub word_count: u64,
    pub checksum: u64,
}

impl ContainerHeader {
    pub const MAGIC: [u8; 4] = *b"BINQ";
    pub const VERSION: u32 = 1;

    pub fn layout(&self) -> Result<WordLayout> {
        Ok(WordLayout::new(self.word_bits as usize)?)
    }

    /// Shape of the packed words as an int32 tensor.
    pub fn packed_shape(&self) -> Result<Vec<usize>> {
        Ok(self.layout()?.packed_shape(&self.shape)?)
    }

    /// Number of words the stored shape requires.
    pub fn expected_word_count(&self) -> Result<u64> {
        let layout = self.layout()?;
        let (rows, cols) = rows_and_cols(&self.shape)?;
        rows.checked_mul(layout.packed_size(cols))
            .map(|n| n as u64)
            .ok_or_else(|| PersistenceError::InvalidFormat("packed size overflows".to_string()))
    }

    pub fn size(&self) -> usize {
        4 + 4 + 1 + 1 + 2 + 4 + 8 * self.shape.len() + 8 + 8
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.magic)?;
        writer.write_u32::<LittleEndian>(self.version)?;
        writer.write_u8(self.word_bits)?;
        writer.write_u8(self.source_dtype as u8)?;
        writer.write_u16::<LittleEndian>(0)?;
        writer.write_u32::<LittleEndian>(self.shape.len() as u32)?;
        for &dim in &self.shape {
            writer.write_u64::<LittleEndian>(dim as u64)?;
        }
        writer.write_u64::<LittleEndian>(self.word_count)?;
        writer.write_u64::<LittleEndian>(self.checksum)?;
        Ok(())
    }

    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != Self::MAGIC {
            return Err(PersistenceError::InvalidMagic);
        }

        let version = reader.read_u32::<LittleEndian>()?;
        if version != Self::VERSION {
            return Err(PersistenceError::UnsupportedVersion(version));
        }

        let word_bits = reader.read_u8()?;
        let dtype_code = reader.read_u8()?;
        let source_dtype = DType::from_u8(dtype_code)
            .ok_or_else(|| PersistenceError::InvalidFormat(format!("unknown dtype code {}", dtype_code)))?;
        let _reserved = reader.read_u16::<LittleEndian>()?;

        let rank = reader.read_u32::<LittleEndian>()?;
        if rank == 0 || rank > MAX_RANK {
            return Err(PersistenceError::InvalidFormat(format!("invalid rank {}", rank)));
        }
        let mut shape = Vec::with_capacity(rank as usize);
        for _ in 0..rank {
            let dim = reader.read_u64::<LittleEndian>()?;
            let dim = usize::try_from(dim)
                .map_err(|_| PersistenceError::InvalidFormat(format!("dimension {} too large", dim)))?;
            shape.push(dim);
        }

        let word_count = reader.read_u64::<LittleEndian>()?;
        let checksum = reader.read_u64::<LittleEndian>()?;

        let header = Self {
            magic,
            version,
            word_bits,
            source_dtype,
            shape,
            word_count,
            checksum,
        };

        let expected = header.expected_word_count()?;
        if expected != word_count {
            return Err(PersistenceError::InvalidFormat(format!(
                "shape {:?} needs {} words, header declares {}",
                header.shape, expected, word_count
            )));
        }
        Ok(header)
    }
}

/// CRC64 over the little-endian word payload.
pub fn compute_checksum(words: &[Word]) -> u64 {
    let mut digest = Digest::new();
    for word in words {
        digest.write(&word.to_le_bytes());
    }
    digest.sum64()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedTensor {
    pub header: ContainerHeader,
    pub words: Vec<Word>,
}

impl PackedTensor {
    /// `shape` is the unpacked shape the words were packed from.
    pub fn new(layout: WordLayout, source_dtype: DType, shape: &[usize], words: Vec<Word>) -> Result<Self> {
        let header = ContainerHeader {
            magic: ContainerHeader::MAGIC,
            version: ContainerHeader::VERSION,
            word_bits: layout.bits() as u8,
            source_dtype,
            shape: shape.to_vec(),
            word_count: words.len() as u64,
            checksum: compute_checksum(&words),
        };
        let expected = header.expected_word_count()?;
        if expected != header.word_count {
            return Err(PersistenceError::InvalidFormat(format!(
                "shape {:?} needs {} words, got {}",
                shape, expected, header.word_count
            )));
        }
        Ok(Self { header, words })
    }

    /// Wraps the output of a Quantize operator.
    pub fn from_tensor(layout: WordLayout, source_dtype: DType, shape: &[usize], packed: &Tensor) -> Result<Self> {
        let words = packed.values::<i32>()?.iter().map(|&w| w as Word).collect();
        Self::new(layout, source_dtype, shape, words)
    }

    /// The words as an int32 tensor of the packed shape.
    pub fn to_tensor(&self) -> Result<Tensor> {
        let data = TensorData::Int32(self.words.iter().map(|&w| w as i32).collect());
        Ok(Tensor::from_data(&self.header.packed_shape()?, data)?)
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        self.header.write_to(&mut writer)?;
        for &word in &self.words {
            writer.write_u32::<LittleEndian>(word)?;
        }
        Ok(())
    }

    /// Reads header and payload without checking the checksum.
    pub fn read_unverified<R: Read>(mut reader: R) -> Result<Self> {
        let header = ContainerHeader::read_from(&mut reader)?;
        let mut words = Vec::with_capacity(header.word_count.min(1 << 20) as usize);
        for _ in 0..header.word_count {
            words.push(reader.read_u32::<LittleEndian>()?);
        }
        Ok(Self { header, words })
    }

    pub fn read_from<R: Read>(reader: R) -> Result<Self> {
        let packed = Self::read_unverified(reader)?;
        packed.verify()?;
        Ok(packed)
    }

    pub fn verify(&self) -> Result<()> {
        let found = compute_checksum(&self.words);
        if found != self.header.checksum {
            return Err(PersistenceError::ChecksumMismatch {
                expected: self.header.checksum,
                found,
            });
        }
        let mask = self.header.layout()?.used_mask();
        if let Some(word) = self.words.iter().find(|&&w| w & !mask != 0) {
            return Err(PersistenceError::InvalidFormat(format!(
                "word {:08x} sets bits above width {}",
                word, self.header.word_bits
            )));
        }
        Ok(())
    }
}

pub fn write_file(path: impl AsRef<Path>, packed: &PackedTensor) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    packed.write_to(&mut writer)?;
    writer.flush()?;
    writer.get_ref().sync_data()?;
    tracing::debug!(
        "Wrote {} words ({:?}) to {:?}",
        packed.words.len(),
        packed.header.shape,
        path.as_ref()
    );
    Ok(())
}

pub fn read_header(path: impl AsRef<Path>) -> Result<ContainerHeader> {
    let file = File::open(path)?;
    ContainerHeader::read_from(BufReader::new(file))
}

pub fn read_file(path: impl AsRef<Path>) -> Result<PackedTensor> {
    let file = File::open(path)?;
    PackedTensor::read_from(BufReader::new(file))
}

pub fn read_file_unverified(path: impl AsRef<Path>) -> Result<PackedTensor> {
    let file = File::open(path)?;
    PackedTensor::read_unverified(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PackedTensor {
        PackedTensor::new(WordLayout::DEFAULT, DType::Float32, &[2, 40], vec![1, 2, 0x8000_0000, 4]).unwrap()
    }

    #[test]
    fn test_header_serialization() {
        let packed = sample();
        let mut bytes = Vec::new();
        packed.header.write_to(&mut bytes).unwrap();
        assert_eq!(bytes.len(), packed.header.size());

        let mut reader = &bytes[..];
        let decoded = ContainerHeader::read_from(&mut reader).unwrap();
        assert_eq!(packed.header, decoded);
        assert_eq!(decoded.packed_shape().unwrap(), vec![2, 2]);
    }

    #[test]
    fn test_payload_roundtrip() {
        let packed = sample();
        let mut bytes = Vec::new();
        packed.write_to(&mut bytes).unwrap();

        let decoded = PackedTensor::read_from(&bytes[..]).unwrap();
        assert_eq!(decoded, packed);

        let tensor = decoded.to_tensor().unwrap();
        assert_eq!(tensor.shape(), &[2, 2]);
        assert_eq!(tensor.values::<i32>().unwrap(), &[1, 2, i32::MIN, 4]);
    }

    #[test]
    fn test_invalid_magic() {
        let mut bytes = Vec::new();
        sample().write_to(&mut bytes).unwrap();
        bytes[0..4].copy_from_slice(b"BADM");
        let result = PackedTensor::read_from(&bytes[..]);
        assert!(matches!(result, Err(PersistenceError::InvalidMagic)));
    }

    #[test]
    fn test_corrupt_payload_detected() {
        let packed = sample();
        let mut bytes = Vec::new();
        packed.write_to(&mut bytes).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;

        let result = PackedTensor::read_from(&bytes[..]);
        assert!(matches!(result, Err(PersistenceError::ChecksumMismatch { .. })));

        // The unverified path still loads it.
        let raw = PackedTensor::read_unverified(&bytes[..]).unwrap();
        assert!(raw.verify().is_err());
    }

    #[test]
    fn test_word_count_must_match_shape() {
        let result = PackedTensor::new(WordLayout::DEFAULT, DType::Bool, &[2, 40], vec![0; 3]);
        assert!(matches!(result, Err(PersistenceError::InvalidFormat(_))));

        let narrow = WordLayout::new(8).unwrap();
        assert!(PackedTensor::new(narrow, DType::Bool, &[2, 9], vec![0; 4]).is_ok());
    }

    #[test]
    fn test_bits_above_word_width_rejected() {
        let narrow = WordLayout::new(4).unwrap();
        let packed = PackedTensor::new(narrow, DType::Float32, &[1, 6], vec![0b1111, 0b0011]).unwrap();
        assert!(packed.verify().is_ok());

        let packed = PackedTensor::new(narrow, DType::Float32, &[1, 6], vec![0b1_0000, 0]).unwrap();
        assert!(matches!(packed.verify(), Err(PersistenceError::InvalidFormat(_))));
    }

    #[test]
    fn test_truncated_payload() {
        let mut bytes = Vec::new();
        sample().write_to(&mut bytes).unwrap();
        bytes.truncate(bytes.len() - 2);
        let result = PackedTensor::read_from(&bytes[..]);
        assert!(matches!(result, Err(PersistenceError::IoError(_))));
    }
}
