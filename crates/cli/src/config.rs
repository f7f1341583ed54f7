use binq_kernel::config::{DEFAULT_WORD_BITS, FLOAT_THRESHOLD};
use binq_kernel::{Operator, WordLayout};

/// Codec settings shared by the pack and unpack commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodecConfig {
    pub word_bits: usize,
    pub float_threshold: f32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            word_bits: DEFAULT_WORD_BITS,
            float_threshold: FLOAT_THRESHOLD,
        }
    }
}

impl CodecConfig {
    pub fn layout(&self) -> anyhow::Result<WordLayout> {
        Ok(WordLayout::new(self.word_bits)?)
    }

    pub fn quantize(&self) -> anyhow::Result<Operator> {
        Ok(Operator::Quantize {
            layout: self.layout()?,
            float_threshold: self.float_threshold,
        })
    }
}
