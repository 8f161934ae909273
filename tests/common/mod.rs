//! Shared fixtures for mapper integration tests.
//!
//! Every test drives a [`PolyDataMapper`] against the recording
//! [`DummyBackend`] and asserts on the commands it issued.

#![allow(dead_code)]

use glam::Vec3;

use redlilium_mapper::backend::{BackendCommand, PrimitiveMode};
use redlilium_mapper::{
    Actor, CellArray, DummyBackend, GraphicsContext, PolyData, PolyDataMapper, Renderer,
};

/// Install a test logger once per process.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Fixtures
// ============================================================================

/// A single triangle in the z = 0 plane.
pub fn triangle() -> PolyData {
    PolyData::new()
        .with_points(vec![Vec3::ZERO, Vec3::X, Vec3::Y])
        .with_polys(CellArray::from_cells([[0u32, 1, 2]]))
}

/// A unit quad as one four-point polygon.
pub fn quad() -> PolyData {
    PolyData::new()
        .with_points(vec![
            Vec3::ZERO,
            Vec3::X,
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::Y,
        ])
        .with_polys(CellArray::from_cells([[0u32, 1, 2, 3]]))
}

/// Two polylines with 4 and 3 points.
pub fn polylines() -> PolyData {
    PolyData::new()
        .with_points((0..7).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect())
        .with_lines(CellArray::from_cells([vec![0u32, 1, 2, 3], vec![4, 5, 6]]))
}

/// One mesh with a cell of every kind.
pub fn mixed() -> PolyData {
    PolyData::new()
        .with_points((0..8).map(|i| Vec3::new(i as f32, (i % 2) as f32, 0.0)).collect())
        .with_verts(CellArray::from_cells([[0u32]]))
        .with_lines(CellArray::from_cells([[0u32, 1]]))
        .with_polys(CellArray::from_cells([[0u32, 1, 2]]))
        .with_strips(CellArray::from_cells([[2u32, 3, 4, 5, 6, 7]]))
}

/// A renderer with default camera and no lights.
pub fn renderer() -> Renderer {
    Renderer::new()
}

/// An actor with lighting switched off.
pub fn unlit_actor() -> Actor {
    let mut actor = Actor::new();
    actor.property_mut().set_lighting(false);
    actor
}

/// Fresh context on the dummy backend.
pub fn context() -> GraphicsContext<DummyBackend> {
    init_logging();
    GraphicsContext::new(DummyBackend::new())
}

// ============================================================================
// Helpers
// ============================================================================

/// Render once and panic on error.
pub fn render(
    mapper: &mut PolyDataMapper,
    ctx: &mut GraphicsContext<DummyBackend>,
    renderer: &mut Renderer,
    actor: &Actor,
    mesh: &PolyData,
) {
    mapper
        .render_piece(ctx, renderer, actor, Some(mesh))
        .expect("render_piece failed");
}

/// Primitive modes of every recorded draw.
pub fn draw_modes(backend: &DummyBackend) -> Vec<PrimitiveMode> {
    backend
        .draw_commands()
        .into_iter()
        .map(|c| match c {
            BackendCommand::DrawRangeElements { mode, .. }
            | BackendCommand::DrawElements { mode, .. }
            | BackendCommand::MultiDrawElements { mode, .. } => *mode,
            other => panic!("not a draw command: {other:?}"),
        })
        .collect()
}
