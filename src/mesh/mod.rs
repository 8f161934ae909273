//! Mesh container and GPU buffer construction.

mod cell_array;
mod data_array;
mod index_buffer;
mod layout;
mod polydata;
mod vertex_buffer;

pub use cell_array::CellArray;
pub use data_array::{CellData, ColorArray, DataArray, PointData, Scalars, TCoords};
pub use index_buffer::{
    multi_index_buffer, point_index_buffer, triangle_index_buffer, IndexBuffer, SubDraw,
    INDEX_SIZE,
};
pub use layout::{VertexAttribute, VertexAttributeFormat, VertexAttributeSemantic, VertexLayout};
pub use polydata::PolyData;
pub use vertex_buffer::{
    build_vertex_buffer, explode_cells, CellExplosion, ColorSource, ExplodedCells, TCoordSlice,
    VertexBuffer, VertexBufferInput,
};
