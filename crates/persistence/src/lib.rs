pub mod error;
pub mod container;
pub mod fixtures;

pub use container::{ContainerHeader, PackedTensor};
pub use error::{PersistenceError, Result};
