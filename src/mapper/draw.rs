//! Primitive mode selection and draw submission for one bucket.

use super::bucket::{DrawBucket, PrimitiveKind};
use crate::backend::{GpuBackend, PrimitiveMode};
use crate::scene::Representation;

/// How a bucket's index buffer is laid out for a representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexLayout {
    /// Every point of every cell, drawn as points.
    Points,
    /// Fan-triangulated triangle list.
    Triangles,
    /// One run per cell with a sub-draw table.
    Runs,
}

impl IndexLayout {
    /// Index layout a bucket needs under `representation`.
    pub fn for_bucket(kind: PrimitiveKind, representation: Representation) -> Self {
        match (kind, representation) {
            (PrimitiveKind::Points, _) | (_, Representation::Points) => Self::Points,
            (PrimitiveKind::Triangles, Representation::Surface) => Self::Triangles,
            _ => Self::Runs,
        }
    }
}

/// Issue the draw calls for an active bucket whose index buffer is bound.
///
/// Returns the number of draw calls issued.
pub fn draw_bucket<B: GpuBackend + ?Sized>(
    backend: &mut B,
    bucket: &DrawBucket,
    representation: Representation,
    vertex_count: usize,
) -> u32 {
    let count = bucket.index_count() as u32;
    let end = (vertex_count as u32).saturating_sub(1);

    match IndexLayout::for_bucket(bucket.kind(), representation) {
        IndexLayout::Points => {
            backend.draw_range_elements(PrimitiveMode::Points, 0, end, count, 0);
            1
        }
        IndexLayout::Triangles => {
            backend.draw_range_elements(PrimitiveMode::Triangles, 0, end, count, 0);
            1
        }
        IndexLayout::Runs => {
            let mode = run_mode(bucket.kind(), representation);
            if mode == PrimitiveMode::LineLoop {
                backend.multi_draw_elements(mode, bucket.sub_draws());
                return 1;
            }
            for run in bucket.sub_draws() {
                backend.draw_elements(mode, run.count, run.byte_offset);
            }
            bucket.sub_draws().len() as u32
        }
    }
}

fn run_mode(kind: PrimitiveKind, representation: Representation) -> PrimitiveMode {
    match (kind, representation) {
        (PrimitiveKind::Triangles, _) => PrimitiveMode::LineLoop,
        (PrimitiveKind::Strips, Representation::Surface) => PrimitiveMode::TriangleStrip,
        _ => PrimitiveMode::LineStrip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendCommand, DummyBackend};
    use crate::mesh::SubDraw;
    use rstest::rstest;

    fn bucket(kind: PrimitiveKind, index_count: usize, runs: &[u32]) -> DrawBucket {
        let mut bucket = DrawBucket::new(kind);
        bucket.index_count = index_count;
        let mut offset = 0;
        for &count in runs {
            bucket.sub_draws.push(SubDraw {
                count,
                byte_offset: offset,
            });
            offset += count as u64 * 4;
        }
        bucket
    }

    #[rstest]
    #[case::points_bucket(PrimitiveKind::Points, Representation::Surface, IndexLayout::Points)]
    #[case::points_rep(PrimitiveKind::Triangles, Representation::Points, IndexLayout::Points)]
    #[case::surface_tris(PrimitiveKind::Triangles, Representation::Surface, IndexLayout::Triangles)]
    #[case::wire_tris(PrimitiveKind::Triangles, Representation::Wireframe, IndexLayout::Runs)]
    #[case::surface_lines(PrimitiveKind::Lines, Representation::Surface, IndexLayout::Runs)]
    #[case::surface_strips(PrimitiveKind::Strips, Representation::Surface, IndexLayout::Runs)]
    fn test_index_layout(
        #[case] kind: PrimitiveKind,
        #[case] representation: Representation,
        #[case] expected: IndexLayout,
    ) {
        assert_eq!(IndexLayout::for_bucket(kind, representation), expected);
    }

    #[test]
    fn test_surface_triangles_single_range_draw() {
        let mut backend = DummyBackend::new();
        let draws = draw_bucket(
            &mut backend,
            &bucket(PrimitiveKind::Triangles, 6, &[]),
            Representation::Surface,
            4,
        );
        assert_eq!(draws, 1);
        assert_eq!(
            backend.draw_commands(),
            vec![&BackendCommand::DrawRangeElements {
                mode: PrimitiveMode::Triangles,
                start: 0,
                end: 3,
                count: 6,
                byte_offset: 0,
            }]
        );
    }

    #[test]
    fn test_wireframe_polygons_multi_draw() {
        let mut backend = DummyBackend::new();
        let bucket = bucket(PrimitiveKind::Triangles, 7, &[4, 3]);
        assert_eq!(draw_bucket(&mut backend, &bucket, Representation::Wireframe, 7), 1);
        match backend.draw_commands()[0] {
            BackendCommand::MultiDrawElements { mode, draws } => {
                assert_eq!(*mode, PrimitiveMode::LineLoop);
                assert_eq!(draws.len(), 2);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[rstest]
    #[case::lines(PrimitiveKind::Lines, Representation::Surface, PrimitiveMode::LineStrip)]
    #[case::wire_strips(PrimitiveKind::Strips, Representation::Wireframe, PrimitiveMode::LineStrip)]
    #[case::surface_strips(PrimitiveKind::Strips, Representation::Surface, PrimitiveMode::TriangleStrip)]
    fn test_runs_draw_per_sub_draw(
        #[case] kind: PrimitiveKind,
        #[case] representation: Representation,
        #[case] expected: PrimitiveMode,
    ) {
        let mut backend = DummyBackend::new();
        let bucket = bucket(kind, 7, &[4, 3]);
        assert_eq!(draw_bucket(&mut backend, &bucket, representation, 7), 2);
        let draws = backend.draw_commands();
        assert_eq!(
            draws[1],
            &BackendCommand::DrawElements {
                mode: expected,
                count: 3,
                byte_offset: 16,
            }
        );
    }
}
