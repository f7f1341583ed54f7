// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! One-bit packing codec.

pub mod codec;
pub mod layout;
pub mod reconstruct;
pub mod shape;
pub mod threshold;

pub use codec::{pack, pack_matrix, pack_to_vec, unpack_matrix, unpack_to_vec};
pub use layout::{Word, WordLayout};
pub use reconstruct::{ReconstructionPair, ReconstructionPolicy};
pub use shape::rows_and_cols;
pub use threshold::{RawBool, ThresholdPolicy};
