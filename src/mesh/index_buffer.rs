//! Index buffer construction for the four primitive buckets.
//!
//! Primitive restart is not assumed, so polylines, strips and wireframe
//! polygons are written as independent runs with a sub-draw table describing
//! where each run starts.

use super::cell_array::CellArray;

/// Size of one index in bytes.
pub const INDEX_SIZE: u64 = std::mem::size_of::<u32>() as u64;

/// One independent run inside an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubDraw {
    /// Number of indices in the run.
    pub count: u32,
    /// Byte offset of the first index.
    pub byte_offset: u64,
}

/// Index data for one bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexBuffer {
    pub indices: Vec<u32>,
    /// Empty for single-draw buffers.
    pub sub_draws: Vec<SubDraw>,
}

impl IndexBuffer {
    /// Number of indices.
    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Indices as raw bytes for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Largest referenced vertex, used as the upper end of range draws.
    pub fn max_index(&self) -> u32 {
        self.indices.iter().copied().max().unwrap_or(0)
    }
}

/// Every point of every cell, in order, for a single point draw.
pub fn point_index_buffer(cells: &CellArray) -> IndexBuffer {
    IndexBuffer {
        indices: cells.connectivity().to_vec(),
        sub_draws: Vec::new(),
    }
}

/// Fan-triangulate polygons into a flat triangle list.
///
/// Cells with fewer than three points produce nothing.
pub fn triangle_index_buffer(polys: &CellArray) -> IndexBuffer {
    let mut indices = Vec::with_capacity(polys.connectivity_len() * 3);
    for cell in polys.iter() {
        if let Some((&apex, rest)) = cell.split_first() {
            for edge in rest.windows(2) {
                indices.extend_from_slice(&[apex, edge[0], edge[1]]);
            }
        }
    }
    IndexBuffer {
        indices,
        sub_draws: Vec::new(),
    }
}

/// One run per cell, recorded in the sub-draw table.
pub fn multi_index_buffer(cells: &CellArray) -> IndexBuffer {
    let mut indices = Vec::with_capacity(cells.connectivity_len());
    let mut sub_draws = Vec::with_capacity(cells.num_cells());
    for cell in cells.iter() {
        sub_draws.push(SubDraw {
            count: cell.len() as u32,
            byte_offset: indices.len() as u64 * INDEX_SIZE,
        });
        indices.extend_from_slice(cell);
    }
    IndexBuffer { indices, sub_draws }
}
