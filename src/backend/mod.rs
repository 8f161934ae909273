//! GPU backend abstraction layer.
//!
//! The mapper never talks to a graphics API directly. Every buffer upload,
//! program link, uniform write and draw call goes through the [`GpuBackend`]
//! trait, so the decision engine can run against a real driver or against the
//! recording [`DummyBackend`] used in tests.
//!
//! # Architecture
//!
//! A backend provides:
//! - Buffer creation and upload (one interleaved vertex buffer, one index
//!   buffer per primitive bucket)
//! - Program compilation from a vertex/fragment [`ShaderSource`] pair
//! - Vertex array objects with per-attribute pointers
//! - Uniform writes addressed by name
//! - Indexed range draws and multi-draws

pub mod dummy;
mod error;

pub use dummy::{BackendCommand, DummyBackend};
pub use error::{BackendError, BackendResult};

use glam::{Mat3, Mat4, Vec3};

use crate::mesh::{SubDraw, VertexAttributeFormat};
use crate::shader::ShaderSource;

macro_rules! gpu_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw backend identifier.
            pub const fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            /// The raw backend identifier.
            pub const fn raw(&self) -> u64 {
                self.0
            }
        }
    };
}

gpu_handle!(
    /// Handle to a GPU buffer.
    BufferHandle
);
gpu_handle!(
    /// Handle to a linked shader program.
    ProgramHandle
);
gpu_handle!(
    /// Handle to a vertex array object.
    VertexArrayHandle
);
gpu_handle!(
    /// Handle to a texture owned by an external collaborator.
    TextureHandle
);

/// What a buffer is bound as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// Interleaved vertex data.
    Vertex,
    /// 32-bit element indices.
    Index,
}

/// Primitive assembly mode for a draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveMode {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    Triangles,
    TriangleStrip,
}

/// Where a vertex attribute reads its data from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributePointer {
    /// Source vertex buffer.
    pub buffer: BufferHandle,
    /// Byte offset of the first element.
    pub offset: u32,
    /// Byte distance between consecutive vertices.
    pub stride: u32,
    /// Component type, count and normalization.
    pub format: VertexAttributeFormat,
}

/// A value written to a named program uniform.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec3(Vec3),
    Mat3(Mat3),
    Mat4(Mat4),
    IntArray(Vec<i32>),
    FloatArray(Vec<f32>),
    Vec3Array(Vec<Vec3>),
}

/// Interface implemented by every GPU backend.
///
/// All calls happen on the thread that owns the graphics context and are
/// assumed to complete (or be queued) in program order.
pub trait GpuBackend {
    /// Human readable backend name.
    fn name(&self) -> &'static str;

    /// Create an empty buffer.
    fn create_buffer(&mut self, kind: BufferKind) -> BackendResult<BufferHandle>;

    /// Replace the full contents of a buffer.
    fn upload_buffer(&mut self, buffer: BufferHandle, data: &[u8]) -> BackendResult<()>;

    /// Destroy a buffer.
    fn delete_buffer(&mut self, buffer: BufferHandle);

    /// Bind a buffer to its target.
    fn bind_buffer(&mut self, buffer: BufferHandle);

    /// Unbind a buffer from its target.
    fn release_buffer(&mut self, buffer: BufferHandle);

    /// Compile and link a vertex/fragment program.
    fn compile_program(&mut self, source: &ShaderSource) -> BackendResult<ProgramHandle>;

    /// Destroy a program.
    fn delete_program(&mut self, program: ProgramHandle);

    /// Make a program current.
    fn use_program(&mut self, program: ProgramHandle);

    /// Location of a named vertex attribute in a linked program.
    ///
    /// Returns `None` if the program does not expose the attribute.
    fn attribute_location(&self, program: ProgramHandle, name: &str) -> Option<u32>;

    /// Write a uniform of the given program. Unknown names are ignored.
    fn set_uniform(&mut self, program: ProgramHandle, name: &str, value: &UniformValue);

    /// Create an empty vertex array object.
    fn create_vertex_array(&mut self) -> BackendResult<VertexArrayHandle>;

    /// Drop every attribute binding of a vertex array.
    fn reset_vertex_array(&mut self, vao: VertexArrayHandle);

    /// Destroy a vertex array object.
    fn delete_vertex_array(&mut self, vao: VertexArrayHandle);

    /// Bind a vertex array object.
    fn bind_vertex_array(&mut self, vao: VertexArrayHandle);

    /// Unbind a vertex array object.
    fn release_vertex_array(&mut self, vao: VertexArrayHandle);

    /// Point an attribute location of a vertex array at buffer data.
    fn set_vertex_attribute(
        &mut self,
        vao: VertexArrayHandle,
        location: u32,
        pointer: &AttributePointer,
    );

    /// Bind a texture and return the texture unit it was bound to.
    fn bind_texture(&mut self, texture: TextureHandle) -> u32;

    /// Rasterized point size.
    fn set_point_size(&mut self, size: f32);

    /// Rasterized line width.
    fn set_line_width(&mut self, width: f32);

    /// Enable polygon offset with `(factor, units)`, or disable it with `None`.
    fn set_polygon_offset(&mut self, offset: Option<(f32, f32)>);

    /// Draw `count` indices from the bound index buffer, starting at
    /// `byte_offset`, referencing vertices in `[start, end]`.
    fn draw_range_elements(
        &mut self,
        mode: PrimitiveMode,
        start: u32,
        end: u32,
        count: u32,
        byte_offset: u64,
    );

    /// Draw `count` indices from the bound index buffer at `byte_offset`.
    fn draw_elements(&mut self, mode: PrimitiveMode, count: u32, byte_offset: u64);

    /// Issue several independent indexed draws in one call.
    fn multi_draw_elements(&mut self, mode: PrimitiveMode, draws: &[SubDraw]);
}
