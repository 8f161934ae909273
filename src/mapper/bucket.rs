//! Per-primitive-type draw state.

use crate::backend::{BufferHandle, ProgramHandle, VertexArrayHandle};
use crate::mesh::SubDraw;
use crate::shader::ShaderVariant;
use crate::time_stamp::TimeStamp;

/// The four primitive collections of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Points,
    Lines,
    Triangles,
    Strips,
}

impl PrimitiveKind {
    /// Draw order.
    pub const ALL: [PrimitiveKind; 4] = [Self::Points, Self::Lines, Self::Triangles, Self::Strips];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Self::Points => 0,
            Self::Lines => 1,
            Self::Triangles => 2,
            Self::Strips => 3,
        }
    }

    /// Triangles and strips, which are lit regardless of interpolation.
    pub fn is_surface(self) -> bool {
        matches!(self, Self::Triangles | Self::Strips)
    }
}

/// Index data, program and attribute bindings for one primitive kind.
#[derive(Debug)]
pub struct DrawBucket {
    pub(crate) kind: PrimitiveKind,
    pub(crate) ibo: Option<BufferHandle>,
    pub(crate) index_count: usize,
    pub(crate) sub_draws: Vec<SubDraw>,
    pub(crate) program: Option<ProgramHandle>,
    pub(crate) variant: Option<ShaderVariant>,
    pub(crate) vao: Option<VertexArrayHandle>,
    pub(crate) shader_source_time: TimeStamp,
    pub(crate) attribute_update_time: TimeStamp,
}

impl DrawBucket {
    pub fn new(kind: PrimitiveKind) -> Self {
        Self {
            kind,
            ibo: None,
            index_count: 0,
            sub_draws: Vec::new(),
            program: None,
            variant: None,
            vao: None,
            shader_source_time: TimeStamp::NEVER,
            attribute_update_time: TimeStamp::NEVER,
        }
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// Number of indices uploaded for this bucket.
    pub fn index_count(&self) -> usize {
        self.index_count
    }

    /// A bucket without indices is skipped entirely.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.index_count > 0
    }

    /// Per-run table for multi-draw buckets, empty otherwise.
    pub fn sub_draws(&self) -> &[SubDraw] {
        &self.sub_draws
    }

    /// Program last readied for this bucket.
    pub fn program(&self) -> Option<ProgramHandle> {
        self.program
    }

    /// Variant the program was built from.
    pub fn variant(&self) -> Option<&ShaderVariant> {
        self.variant.as_ref()
    }

    pub fn shader_source_time(&self) -> TimeStamp {
        self.shader_source_time
    }

    pub fn attribute_update_time(&self) -> TimeStamp {
        self.attribute_update_time
    }
}
