//! Backend error types.

use thiserror::Error;

/// Errors that can occur in backend operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Failed to create a buffer.
    #[error("failed to create buffer: {0}")]
    BufferCreationFailed(String),
    /// Failed to upload data into a buffer.
    #[error("failed to upload buffer data: {0}")]
    UploadFailed(String),
    /// Failed to compile or link a shader program.
    #[error("failed to compile shader program: {0}")]
    ShaderCompilationFailed(String),
    /// Failed to create a vertex array object.
    #[error("failed to create vertex array: {0}")]
    VertexArrayCreationFailed(String),
    /// A handle did not name a live resource.
    #[error("invalid handle: {0}")]
    InvalidHandle(String),
    /// Out of GPU memory.
    #[error("out of GPU memory")]
    OutOfMemory,
    /// The device was lost.
    #[error("GPU device lost")]
    DeviceLost,
}

/// Result alias for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;
