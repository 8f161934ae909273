//! Polygonal mesh container.

use glam::Vec3;

use super::cell_array::CellArray;
use super::data_array::{CellData, DataArray, PointData};
use crate::time_stamp::TimeStamp;

/// Points plus four cell collections: vertices, polylines, polygons and
/// triangle strips.
///
/// Cells are numbered globally in the order verts, lines, polys, strips, which
/// is the order per-cell attributes are indexed in.
///
/// Every array tracks its own modification time; [`PolyData::mtime`] is the
/// latest of them. Replacing an attribute wholesale (or removing one) should
/// be followed by [`PolyData::modified`].
#[derive(Debug, Clone, Default)]
pub struct PolyData {
    pub points: DataArray<Vec3>,
    pub verts: CellArray,
    pub lines: CellArray,
    pub polys: CellArray,
    pub strips: CellArray,
    pub point_data: PointData,
    pub cell_data: CellData,
    mtime: TimeStamp,
}

impl PolyData {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self {
            mtime: TimeStamp::now(),
            ..Default::default()
        }
    }

    /// Set the points.
    pub fn with_points(mut self, points: Vec<Vec3>) -> Self {
        self.points = DataArray::new(points);
        self
    }

    /// Set the vertex cells.
    pub fn with_verts(mut self, verts: CellArray) -> Self {
        self.verts = verts;
        self
    }

    /// Set the polyline cells.
    pub fn with_lines(mut self, lines: CellArray) -> Self {
        self.lines = lines;
        self
    }

    /// Set the polygon cells.
    pub fn with_polys(mut self, polys: CellArray) -> Self {
        self.polys = polys;
        self
    }

    /// Set the triangle-strip cells.
    pub fn with_strips(mut self, strips: CellArray) -> Self {
        self.strips = strips;
        self
    }

    /// Number of points.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Number of cells over all four collections.
    pub fn num_cells(&self) -> usize {
        self.cell_arrays().iter().map(|c| c.num_cells()).sum()
    }

    /// The four cell collections in global cell order.
    pub fn cell_arrays(&self) -> [&CellArray; 4] {
        [&self.verts, &self.lines, &self.polys, &self.strips]
    }

    /// Axis-aligned bounds of the points, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self.points.values().iter();
        let first = *points.next()?;
        Some(points.fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))))
    }

    /// Mark the mesh itself as modified.
    pub fn modified(&mut self) {
        self.mtime.modified();
    }

    /// Latest modification time of the mesh or any of its arrays.
    pub fn mtime(&self) -> TimeStamp {
        TimeStamp::latest([
            self.mtime,
            self.points.mtime(),
            self.verts.mtime(),
            self.lines.mtime(),
            self.polys.mtime(),
            self.strips.mtime(),
            self.point_data.mtime(),
            self.cell_data.mtime(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let mesh = PolyData::new().with_points(vec![
            Vec3::new(1.0, -2.0, 0.0),
            Vec3::new(-1.0, 3.0, 0.5),
        ]);
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(max, Vec3::new(1.0, 3.0, 0.5));
        assert!(PolyData::new().bounds().is_none());
    }

    #[test]
    fn test_num_cells() {
        let mesh = PolyData::new()
            .with_points(vec![Vec3::ZERO; 4])
            .with_verts(CellArray::from_cells([[0u32]]))
            .with_polys(CellArray::from_cells([[0u32, 1, 2], [1, 2, 3]]));
        assert_eq!(mesh.num_cells(), 3);
    }

    #[test]
    fn test_mtime_follows_arrays() {
        let mut mesh = PolyData::new().with_points(vec![Vec3::ZERO]);
        let before = mesh.mtime();
        mesh.points.values_mut()[0] = Vec3::ONE;
        assert!(mesh.mtime() > before);

        let before = mesh.mtime();
        mesh.polys.push_cell(&[0]);
        assert!(mesh.mtime() > before);
    }
}
