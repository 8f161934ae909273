//! Interleaved vertex layout.
//!
//! Every vertex record starts with a position. Normal, texture coordinate and
//! color follow in that order when present:
//!
//! ```text
//! | vertexMC f32x3 | normalMC f32x3 | tcoordMC f32x1|2 | scalarColor u8xN | pad |
//! ```
//!
//! An attribute that is absent has no entry in the layout, so its component
//! count reads as 0. The stride is padded to a multiple of 4 bytes.

use crate::error::{MapperError, MapperResult};

/// Semantic meaning of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttributeSemantic {
    /// Model-space position.
    Position,
    /// Model-space normal.
    Normal,
    /// Texture coordinate (1 or 2 components).
    TCoord,
    /// Normalized unsigned-byte color.
    Color,
}

impl VertexAttributeSemantic {
    /// Name of the shader attribute fed by this semantic.
    pub fn attribute_name(&self) -> &'static str {
        match self {
            Self::Position => "vertexMC",
            Self::Normal => "normalMC",
            Self::TCoord => "tcoordMC",
            Self::Color => "scalarColor",
        }
    }
}

/// Format of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttributeFormat {
    /// Single 32-bit float.
    Float,
    /// Two 32-bit floats.
    Float2,
    /// Three 32-bit floats.
    Float3,
    /// One 8-bit unsigned integer (normalized to 0.0-1.0).
    Unorm8,
    /// Two 8-bit unsigned integers (normalized to 0.0-1.0).
    Unorm8x2,
    /// Three 8-bit unsigned integers (normalized to 0.0-1.0).
    Unorm8x3,
    /// Four 8-bit unsigned integers (normalized to 0.0-1.0).
    Unorm8x4,
}

impl VertexAttributeFormat {
    /// Unsigned-byte format with the given component count.
    pub fn unorm8(components: usize) -> Option<Self> {
        match components {
            1 => Some(Self::Unorm8),
            2 => Some(Self::Unorm8x2),
            3 => Some(Self::Unorm8x3),
            4 => Some(Self::Unorm8x4),
            _ => None,
        }
    }

    /// Get the size in bytes of this format.
    pub fn size(&self) -> usize {
        match self {
            Self::Float => 4,
            Self::Float2 => 8,
            Self::Float3 => 12,
            Self::Unorm8 => 1,
            Self::Unorm8x2 => 2,
            Self::Unorm8x3 => 3,
            Self::Unorm8x4 => 4,
        }
    }

    /// Number of components.
    pub fn components(&self) -> usize {
        match self {
            Self::Float | Self::Unorm8 => 1,
            Self::Float2 | Self::Unorm8x2 => 2,
            Self::Float3 | Self::Unorm8x3 => 3,
            Self::Unorm8x4 => 4,
        }
    }
}

/// A single vertex attribute description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    /// Semantic meaning of this attribute.
    pub semantic: VertexAttributeSemantic,
    /// Data format of this attribute.
    pub format: VertexAttributeFormat,
    /// Byte offset within a vertex record.
    pub offset: u32,
}

impl VertexAttribute {
    /// Create a new vertex attribute.
    pub fn new(semantic: VertexAttributeSemantic, format: VertexAttributeFormat, offset: u32) -> Self {
        Self {
            semantic,
            format,
            offset,
        }
    }

    /// Create a position attribute (float3).
    pub fn position(offset: u32) -> Self {
        Self::new(
            VertexAttributeSemantic::Position,
            VertexAttributeFormat::Float3,
            offset,
        )
    }

    /// Create a normal attribute (float3).
    pub fn normal(offset: u32) -> Self {
        Self::new(
            VertexAttributeSemantic::Normal,
            VertexAttributeFormat::Float3,
            offset,
        )
    }

    /// Byte offset just past this attribute.
    pub fn end(&self) -> u32 {
        self.offset + self.format.size() as u32
    }
}

/// Layout of one interleaved vertex buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct VertexLayout {
    /// Attributes in record order.
    pub attributes: Vec<VertexAttribute>,
    /// Bytes between consecutive vertex records.
    pub stride: u32,
    /// Number of vertex records in the buffer.
    pub vertex_count: usize,
}

impl VertexLayout {
    /// Create an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attribute and grow the stride to fit it, padded to 4 bytes.
    pub fn with_attribute(mut self, attribute: VertexAttribute) -> Self {
        self.stride = self.stride.max(attribute.end().next_multiple_of(4));
        self.attributes.push(attribute);
        self
    }

    /// Set the vertex count.
    pub fn with_vertex_count(mut self, vertex_count: usize) -> Self {
        self.vertex_count = vertex_count;
        self
    }

    /// Get the attribute for a semantic.
    pub fn get_attribute(&self, semantic: VertexAttributeSemantic) -> Option<&VertexAttribute> {
        self.attributes.iter().find(|a| a.semantic == semantic)
    }

    /// Byte offset of the normal, if present.
    pub fn normal_offset(&self) -> Option<u32> {
        self.get_attribute(VertexAttributeSemantic::Normal)
            .map(|a| a.offset)
    }

    /// Texture-coordinate components, 0 if absent.
    pub fn tcoord_components(&self) -> usize {
        self.components(VertexAttributeSemantic::TCoord)
    }

    /// Color components, 0 if absent.
    pub fn color_components(&self) -> usize {
        self.components(VertexAttributeSemantic::Color)
    }

    fn components(&self, semantic: VertexAttributeSemantic) -> usize {
        self.get_attribute(semantic)
            .map(|a| a.format.components())
            .unwrap_or(0)
    }

    /// Validate the layout.
    ///
    /// Checks that the position comes first, no semantic repeats, and every
    /// attribute fits inside the stride.
    pub fn validate(&self) -> MapperResult<()> {
        match self.attributes.first() {
            Some(first) if first.semantic == VertexAttributeSemantic::Position => {}
            _ => {
                return Err(MapperError::InvalidLayout(
                    "layout must start with a position attribute".to_string(),
                ))
            }
        }
        for (i, attr) in self.attributes.iter().enumerate() {
            if self.attributes[..i].iter().any(|a| a.semantic == attr.semantic) {
                return Err(MapperError::InvalidLayout(format!(
                    "duplicate attribute {:?}",
                    attr.semantic
                )));
            }
            if attr.end() > self.stride {
                return Err(MapperError::InvalidLayout(format!(
                    "attribute {:?} ends at {} past stride {}",
                    attr.semantic,
                    attr.end(),
                    self.stride
                )));
            }
        }
        Ok(())
    }
}
