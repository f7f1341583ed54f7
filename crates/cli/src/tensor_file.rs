//! Dense tensors as JSON, the CLI's exchange format.
//!
//! ```json
//! { "dtype": "int8", "shape": [2, 3], "data": [1, -2, 3, 0, 5, -6],
//!   "quant": { "scale": 0.5, "zero_point": 0 } }
//! ```

use anyhow::{bail, Context};
use binq_kernel::types::{DType, QuantParams, Tensor, TensorData};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Values {
    // Tried first, so an empty array is numeric.
    Numbers(Vec<f64>),
    Bools(Vec<bool>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorFile {
    pub dtype: DType,
    pub shape: Vec<usize>,
    pub data: Values,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quant: Option<QuantParams>,
}

impl TensorFile {
    pub fn into_tensor(self) -> anyhow::Result<Tensor> {
        let data = match (self.dtype, self.data) {
            (DType::Float32, Values::Numbers(v)) => TensorData::Float32(v.into_iter().map(|x| x as f32).collect()),
            (DType::Int8, Values::Numbers(v)) => TensorData::Int8(
                v.into_iter()
                    .map(|x| {
                        if x.fract() != 0.0 || x < i8::MIN as f64 || x > i8::MAX as f64 {
                            bail!("{} is not an int8 value", x);
                        }
                        Ok(x as i8)
                    })
                    .collect::<anyhow::Result<_>>()?,
            ),
            (DType::Bool, Values::Bools(v)) => TensorData::Bool(v),
            (DType::Bool, Values::Numbers(v)) if v.is_empty() => TensorData::Bool(Vec::new()),
            (dtype, _) => bail!("data does not match dtype {}", dtype),
        };
        let mut tensor = Tensor::from_data(&self.shape, data)?;
        tensor.quant = self.quant;
        Ok(tensor)
    }

    pub fn from_tensor(tensor: &Tensor) -> anyhow::Result<Self> {
        let data = match tensor.data() {
            TensorData::Float32(v) => Values::Numbers(v.iter().map(|&x| x as f64).collect()),
            TensorData::Int8(v) => Values::Numbers(v.iter().map(|&x| x as f64).collect()),
            TensorData::Bool(v) => Values::Bools(v.clone()),
            TensorData::Int32(_) => bail!("int32 tensors are not written as dense files"),
        };
        Ok(Self {
            dtype: tensor.dtype(),
            shape: tensor.shape().to_vec(),
            data,
            quant: tensor.quant,
        })
    }
}

pub fn read(path: impl AsRef<Path>) -> anyhow::Result<Tensor> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let parsed: TensorFile =
        serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parsing {}", path.display()))?;
    parsed.into_tensor()
}

pub fn write(path: impl AsRef<Path>, tensor: &Tensor) -> anyhow::Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &TensorFile::from_tensor(tensor)?)?;
    writer.flush()?;
    Ok(())
}
