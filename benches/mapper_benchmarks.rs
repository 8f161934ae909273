use criterion::{Criterion, black_box, criterion_group, criterion_main};
use glam::Vec3;

use redlilium_mapper::mesh::{
    CellArray, PolyData, VertexBufferInput, build_vertex_buffer, explode_cells,
    triangle_index_buffer,
};
use redlilium_mapper::scene::Representation;
use redlilium_mapper::shader::{
    LightComplexity, RenderState, ShaderVariant, VertexColorMode,
};

/// A `size` x `size` grid of quads with per-point normals.
fn grid(size: u32) -> PolyData {
    let row = size + 1;
    let points = (0..row * row)
        .map(|i| Vec3::new((i % row) as f32, (i / row) as f32, 0.0))
        .collect();
    let quads = (0..size * size).map(|q| {
        let (x, y) = (q % size, q / size);
        let base = y * row + x;
        [base, base + 1, base + row + 1, base + row]
    });
    let mut mesh = PolyData::new()
        .with_points(points)
        .with_polys(CellArray::from_cells(quads));
    mesh.point_data.normals = Some(vec![Vec3::Z; (row * row) as usize].into());
    mesh
}

// ---------------------------------------------------------------------------
// Buffer construction
// ---------------------------------------------------------------------------

fn bench_vertex_buffer(c: &mut Criterion) {
    let mesh = grid(128);
    c.bench_function("vertex_buffer_grid_128", |b| {
        b.iter(|| {
            let input = VertexBufferInput {
                points: mesh.points.values(),
                normals: mesh.point_data.normals.as_ref().map(|n| n.values()),
                ..Default::default()
            };
            black_box(build_vertex_buffer(&input).ok());
        });
    });
}

fn bench_explode_cells(c: &mut Criterion) {
    let mesh = grid(128);
    c.bench_function("explode_cells_grid_128", |b| {
        b.iter(|| black_box(explode_cells(&mesh).ok()));
    });
}

fn bench_triangle_indices(c: &mut Criterion) {
    let mesh = grid(128);
    c.bench_function("triangle_index_buffer_grid_128", |b| {
        b.iter(|| black_box(triangle_index_buffer(&mesh.polys)));
    });
}

// ---------------------------------------------------------------------------
// Shader variants
// ---------------------------------------------------------------------------

fn bench_variant_build(c: &mut Criterion) {
    let state = RenderState {
        light_complexity: LightComplexity::Positional,
        picking_active: true,
        depth_peeling_active: true,
        has_vertex_colors: true,
        has_normals: true,
        texture_components: 2,
    };
    let variant = ShaderVariant::from_state(
        &state,
        Representation::Surface,
        VertexColorMode::AmbientAndDiffuse,
    );
    c.bench_function("shader_variant_build_positional", |b| {
        b.iter(|| black_box(variant.build()));
    });
}

criterion_group!(
    benches,
    bench_vertex_buffer,
    bench_explode_cells,
    bench_triangle_indices,
    bench_variant_build,
);
criterion_main!(benches);
