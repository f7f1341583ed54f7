// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Element datatype tags.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum DType {
    Float32 = 0,
    Int8 = 1,
    Bool = 2,
    /// Storage type of packed tensors at the operator boundary.
    Int32 = 3,
}

impl DType {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(DType::Float32),
            1 => Some(DType::Int8),
            2 => Some(DType::Bool),
            3 => Some(DType::Int32),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DType::Float32 => "float32",
            DType::Int8 => "int8",
            DType::Bool => "bool",
            DType::Int32 => "int32",
        }
    }

    /// Datatypes the codec can binarize from and reconstruct into.
    pub fn is_binarizable(&self) -> bool {
        matches!(self, DType::Float32 | DType::Int8 | DType::Bool)
    }
}

impl Default for DType {
    fn default() -> Self {
        DType::Float32
    }
}

impl core::fmt::Display for DType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
