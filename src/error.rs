//! Error types for the mapper.

use thiserror::Error;

use crate::backend::BackendError;

/// Errors raised while building buffers or issuing draws.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapperError {
    /// A backend call failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// A cell referenced a point the mesh does not have.
    #[error("point index {index} out of range (mesh has {count} points)")]
    PointIndexOutOfRange { index: u32, count: usize },

    /// A per-point or per-cell attribute array is shorter than required.
    #[error("attribute '{name}' has {actual} tuples, expected at least {expected}")]
    AttributeLength {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// An interleaved layout is malformed.
    #[error("invalid vertex layout: {0}")]
    InvalidLayout(String),

    /// A color array does not use 1 to 4 components.
    #[error("color arrays need 1 to 4 components, got {0}")]
    InvalidColorComponents(usize),
}

/// Result alias for mapper operations.
pub type MapperResult<T> = Result<T, MapperError>;
