//! Interleaved vertex buffer construction.
//!
//! Shared-vertex meshes are written one record per point. When an attribute
//! lives on cells (per-cell colors), every cell first gets private copies of
//! its points ("explosion") so a single vertex never has to carry two cell
//! values.

use glam::{Vec2, Vec3};

use super::cell_array::CellArray;
use super::layout::{VertexAttribute, VertexAttributeFormat, VertexAttributeSemantic, VertexLayout};
use super::polydata::PolyData;
use crate::error::{MapperError, MapperResult};

/// Vertex duplication maps produced by exploding a mesh's cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellExplosion {
    /// Exploded vertex → source point.
    pub cell_point_map: Vec<u32>,
    /// Exploded vertex → owning cell (global cell id).
    pub point_cell_map: Vec<u32>,
}

impl CellExplosion {
    /// Number of exploded vertices.
    pub fn len(&self) -> usize {
        self.cell_point_map.len()
    }

    /// Returns `true` if no vertex was produced.
    pub fn is_empty(&self) -> bool {
        self.cell_point_map.is_empty()
    }
}

/// Cell arrays renumbered to exploded vertices, plus the maps back.
#[derive(Debug, Clone, Default)]
pub struct ExplodedCells {
    pub explosion: CellExplosion,
    /// Verts, lines, polys and strips in global cell order.
    pub cells: [CellArray; 4],
}

/// Give every cell instance its own vertex records.
///
/// Cells are visited in global order (verts, lines, polys, strips); each point
/// reference becomes a new vertex.
pub fn explode_cells(mesh: &PolyData) -> MapperResult<ExplodedCells> {
    let num_points = mesh.num_points();
    let total: usize = mesh.cell_arrays().iter().map(|c| c.connectivity_len()).sum();

    let mut explosion = CellExplosion {
        cell_point_map: Vec::with_capacity(total),
        point_cell_map: Vec::with_capacity(total),
    };
    let mut cells: [CellArray; 4] = Default::default();
    let mut cell_id = 0u32;
    let mut renumbered = Vec::new();

    for (source, target) in mesh.cell_arrays().into_iter().zip(cells.iter_mut()) {
        for cell in source.iter() {
            renumbered.clear();
            for &point in cell {
                if point as usize >= num_points {
                    return Err(MapperError::PointIndexOutOfRange {
                        index: point,
                        count: num_points,
                    });
                }
                renumbered.push(explosion.cell_point_map.len() as u32);
                explosion.cell_point_map.push(point);
                explosion.point_cell_map.push(cell_id);
            }
            target.push_cell(&renumbered);
            cell_id += 1;
        }
    }

    Ok(ExplodedCells { explosion, cells })
}

/// Texture coordinates borrowed from the mesh.
#[derive(Debug, Clone, Copy)]
pub enum TCoordSlice<'a> {
    One(&'a [f32]),
    Two(&'a [Vec2]),
}

impl TCoordSlice<'_> {
    fn len(&self) -> usize {
        match self {
            Self::One(t) => t.len(),
            Self::Two(t) => t.len(),
        }
    }

    fn format(&self) -> VertexAttributeFormat {
        match self {
            Self::One(_) => VertexAttributeFormat::Float,
            Self::Two(_) => VertexAttributeFormat::Float2,
        }
    }
}

/// Colors to interleave, with N unsigned-byte components per tuple.
#[derive(Debug, Clone, Copy)]
pub struct ColorSource<'a> {
    pub data: &'a [u8],
    pub components: usize,
    /// Tuples are indexed by cell instead of by point.
    pub per_cell: bool,
}

/// Everything the builder reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct VertexBufferInput<'a> {
    pub points: &'a [Vec3],
    pub normals: Option<&'a [Vec3]>,
    pub tcoords: Option<TCoordSlice<'a>>,
    pub colors: Option<ColorSource<'a>>,
    /// When set, one record is written per exploded vertex.
    pub explosion: Option<&'a CellExplosion>,
}

/// A built interleaved vertex buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexBuffer {
    pub layout: VertexLayout,
    pub data: Vec<u8>,
}

/// Interleave positions and optional attributes into one buffer.
pub fn build_vertex_buffer(input: &VertexBufferInput<'_>) -> MapperResult<VertexBuffer> {
    let num_points = input.points.len();
    let vertex_count = input.explosion.map_or(num_points, CellExplosion::len);

    let mut layout = VertexLayout::new().with_attribute(VertexAttribute::position(0));
    let mut next_offset = 12;

    if let Some(normals) = input.normals {
        check_length("normals", num_points, normals.len())?;
        layout = layout.with_attribute(VertexAttribute::normal(next_offset));
        next_offset += 12;
    }
    if let Some(tcoords) = input.tcoords {
        check_length("tcoords", num_points, tcoords.len())?;
        let format = tcoords.format();
        layout = layout.with_attribute(VertexAttribute::new(
            VertexAttributeSemantic::TCoord,
            format,
            next_offset,
        ));
        next_offset += format.size() as u32;
    }
    if let Some(colors) = input.colors {
        let format = VertexAttributeFormat::unorm8(colors.components)
            .ok_or(MapperError::InvalidColorComponents(colors.components))?;
        let required = if colors.per_cell {
            input
                .explosion
                .and_then(|e| e.point_cell_map.iter().max())
                .map_or(0, |&max| max as usize + 1)
        } else {
            num_points
        };
        check_length("colors", required, colors.data.len() / colors.components)?;
        layout = layout.with_attribute(VertexAttribute::new(
            VertexAttributeSemantic::Color,
            format,
            next_offset,
        ));
    }
    let layout = layout.with_vertex_count(vertex_count);
    layout.validate()?;

    let stride = layout.stride as usize;
    let mut data = vec![0u8; stride * vertex_count];

    for (vertex, record) in data.chunks_exact_mut(stride).enumerate() {
        let (point, cell) = match input.explosion {
            Some(e) => (
                e.cell_point_map[vertex] as usize,
                e.point_cell_map[vertex] as usize,
            ),
            None => (vertex, vertex),
        };
        if point >= num_points {
            return Err(MapperError::PointIndexOutOfRange {
                index: point as u32,
                count: num_points,
            });
        }

        for attribute in &layout.attributes {
            let at = attribute.offset as usize;
            let bytes: &[u8] = match attribute.semantic {
                VertexAttributeSemantic::Position => {
                    bytemuck::bytes_of(&input.points[point])
                }
                VertexAttributeSemantic::Normal => match input.normals {
                    Some(normals) => bytemuck::bytes_of(&normals[point]),
                    None => continue,
                },
                VertexAttributeSemantic::TCoord => match input.tcoords {
                    Some(TCoordSlice::One(t)) => bytemuck::bytes_of(&t[point]),
                    Some(TCoordSlice::Two(t)) => bytemuck::bytes_of(&t[point]),
                    None => continue,
                },
                VertexAttributeSemantic::Color => match input.colors {
                    Some(colors) => {
                        let tuple = if colors.per_cell { cell } else { point };
                        let start = tuple * colors.components;
                        &colors.data[start..start + colors.components]
                    }
                    None => continue,
                },
            };
            record[at..at + bytes.len()].copy_from_slice(bytes);
        }
    }

    Ok(VertexBuffer { layout, data })
}

fn check_length(name: &'static str, expected: usize, actual: usize) -> MapperResult<()> {
    if actual < expected {
        return Err(MapperError::AttributeLength {
            name,
            expected,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> PolyData {
        PolyData::new()
            .with_points(vec![Vec3::ZERO, Vec3::X, Vec3::Y])
            .with_polys(CellArray::from_cells([[0u32, 1, 2]]))
    }

    fn read_vec3(data: &[u8], offset: usize) -> Vec3 {
        bytemuck::pod_read_unaligned::<Vec3>(&data[offset..offset + 12])
    }

    #[test]
    fn test_positions_only() {
        let mesh = triangle();
        let vbo = build_vertex_buffer(&VertexBufferInput {
            points: mesh.points.values(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(vbo.layout.stride, 12);
        assert_eq!(vbo.layout.vertex_count, 3);
        assert_eq!(vbo.data.len(), 36);
        assert_eq!(read_vec3(&vbo.data, 12), Vec3::X);
    }

    #[test]
    fn test_interleaved_order() {
        let points = [Vec3::ZERO, Vec3::X];
        let normals = [Vec3::Z, Vec3::Z];
        let tcoords = [0.25f32, 0.75];
        let colors = [10u8, 20, 30, 40, 50, 60];
        let vbo = build_vertex_buffer(&VertexBufferInput {
            points: &points,
            normals: Some(&normals),
            tcoords: Some(TCoordSlice::One(&tcoords)),
            colors: Some(ColorSource {
                data: &colors,
                components: 3,
                per_cell: false,
            }),
            explosion: None,
        })
        .unwrap();

        let layout = &vbo.layout;
        assert_eq!(layout.normal_offset(), Some(12));
        assert_eq!(layout.tcoord_components(), 1);
        assert_eq!(layout.color_components(), 3);
        // 12 + 12 + 4 + 3 = 31, padded to 32
        assert_eq!(layout.stride, 32);
        assert_eq!(layout.validate(), Ok(()));

        let second = &vbo.data[32..64];
        assert_eq!(read_vec3(second, 0), Vec3::X);
        assert_eq!(read_vec3(second, 12), Vec3::Z);
        assert_eq!(bytemuck::pod_read_unaligned::<f32>(&second[24..28]), 0.75);
        assert_eq!(&second[28..31], &[40, 50, 60]);
    }

    #[test]
    fn test_explode_cells() {
        let mesh = PolyData::new()
            .with_points(vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ONE])
            .with_verts(CellArray::from_cells([[3u32]]))
            .with_polys(CellArray::from_cells([[0u32, 1, 2], [2, 1, 3]]));
        let exploded = explode_cells(&mesh).unwrap();

        assert_eq!(exploded.explosion.cell_point_map, vec![3, 0, 1, 2, 2, 1, 3]);
        assert_eq!(exploded.explosion.point_cell_map, vec![0, 1, 1, 1, 2, 2, 2]);
        assert_eq!(exploded.cells[0].cell(0), Some(&[0][..]));
        assert_eq!(exploded.cells[2].cell(1), Some(&[4, 5, 6][..]));
    }

    #[test]
    fn test_explode_rejects_bad_index() {
        let mesh = PolyData::new()
            .with_points(vec![Vec3::ZERO])
            .with_lines(CellArray::from_cells([[0u32, 5]]));
        assert_eq!(
            explode_cells(&mesh).unwrap_err(),
            MapperError::PointIndexOutOfRange { index: 5, count: 1 }
        );
    }

    #[test]
    fn test_per_cell_colors_are_exploded() {
        let mesh = triangle();
        let exploded = explode_cells(&mesh).unwrap();
        let colors = [200u8, 100, 50, 255];
        let vbo = build_vertex_buffer(&VertexBufferInput {
            points: mesh.points.values(),
            colors: Some(ColorSource {
                data: &colors,
                components: 4,
                per_cell: true,
            }),
            explosion: Some(&exploded.explosion),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(vbo.layout.vertex_count, 3);
        assert_eq!(vbo.layout.stride, 16);
        for record in vbo.data.chunks_exact(16) {
            assert_eq!(&record[12..16], &colors);
        }
    }

    #[test]
    fn test_short_normals_are_rejected() {
        let points = [Vec3::ZERO, Vec3::X];
        let normals = [Vec3::Z];
        let err = build_vertex_buffer(&VertexBufferInput {
            points: &points,
            normals: Some(&normals),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(
            err,
            MapperError::AttributeLength {
                name: "normals",
                expected: 2,
                actual: 1
            }
        );
    }
}
