//! Polygon mesh mapper.
//!
//! [`PolyDataMapper`] turns a [`PolyData`] into GPU draw calls. It owns one
//! interleaved vertex buffer shared by four [`DrawBucket`]s (points, lines,
//! triangles, strips), each with its own index buffer, program and vertex
//! array. Every frame it decides from modification stamps what must be
//! rebuilt, so an unchanged mesh under an unchanged renderer costs only
//! uniform writes and draw calls.
//!
//! # Render phases
//!
//! ```text
//! start:  selection hooks -> rebuild buffers if stale -> bind VBO, point size,
//!         line width, polygon offset
//! draw:   for each active bucket: ready program, rebind attributes if stale,
//!         uniforms, bind IBO, draw, release IBO
//! finish: selection hooks -> release VAO, VBO, polygon offset
//! ```

mod bucket;
mod draw;
mod glyph;
mod lighting;
mod staleness;
mod uniforms;

pub use bucket::{DrawBucket, PrimitiveKind};
pub use draw::{draw_bucket, IndexLayout};
pub use glyph::GlyphSession;
pub use lighting::{bucket_light_complexity, light_complexity, needs_lighting};
pub use staleness::{RenderStateTracker, Staleness, StalenessInputs};
pub use uniforms::{
    normal_matrix, picking_color, set_camera_uniforms, set_lighting_uniforms,
    set_property_uniforms, MAX_LIGHTS,
};

use std::borrow::Cow;

use glam::{Mat4, Vec3};

use crate::backend::{
    AttributePointer, BackendError, BufferHandle, BufferKind, GpuBackend, UniformValue,
    VertexArrayHandle,
};
use crate::color::LookupTable;
use crate::config::{CoincidentTopology, MapperConfig};
use crate::context::GraphicsContext;
use crate::error::{MapperError, MapperResult};
use crate::mesh::{
    build_vertex_buffer, explode_cells, multi_index_buffer, point_index_buffer,
    triangle_index_buffer, CellArray, ColorArray, ColorSource, IndexBuffer, PolyData, Scalars,
    TCoordSlice, TCoords, VertexBufferInput, VertexLayout,
};
use crate::scene::{Actor, Interpolation, RenderView};
use crate::selection::SelectionPass;
use crate::shader::{
    RenderState, ScalarMaterialMode, ShaderCache, ShaderFeatures, ShaderVariant,
};
use crate::time_stamp::TimeStamp;

/// Which scalars color the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScalarMode {
    /// Point scalars if present, otherwise cell scalars.
    #[default]
    Default,
    /// Point scalars only.
    UsePointData,
    /// Cell scalars only.
    UseCellData,
}

/// Cumulative work counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapperStats {
    /// Vertex/index buffer rebuilds.
    pub buffer_builds: u64,
    /// Shader variant source generations.
    pub shader_builds: u64,
    /// Attribute pointer rebinds, counted per bucket.
    pub attribute_binds: u64,
    /// Draw calls issued.
    pub draw_calls: u64,
}

/// Colors resolved for the current mesh.
struct ResolvedColors<'a> {
    colors: Cow<'a, ColorArray>,
    per_cell: bool,
}

/// Maps a polygon mesh to GPU draws.
#[derive(Debug)]
pub struct PolyDataMapper {
    config: MapperConfig,
    scalar_visibility: bool,
    scalar_mode: ScalarMode,
    scalar_material_mode: ScalarMaterialMode,
    lookup_table: LookupTable,
    model_transform: Option<Mat4>,
    model_color: Option<[u8; 4]>,
    mtime: TimeStamp,

    vbo: Option<BufferHandle>,
    layout: VertexLayout,
    vbo_update_time: TimeStamp,
    buckets: [DrawBucket; 4],
    trackers: [RenderStateTracker; 4],
    last_bound: Option<VertexArrayHandle>,
    polygon_offset: bool,
    stats: MapperStats,
}

impl Default for PolyDataMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl PolyDataMapper {
    pub fn new() -> Self {
        Self::with_config(MapperConfig::default())
    }

    pub fn with_config(config: MapperConfig) -> Self {
        Self {
            config,
            scalar_visibility: true,
            scalar_mode: ScalarMode::Default,
            scalar_material_mode: ScalarMaterialMode::Default,
            lookup_table: LookupTable::new(),
            model_transform: None,
            model_color: None,
            mtime: TimeStamp::now(),
            vbo: None,
            layout: VertexLayout::new(),
            vbo_update_time: TimeStamp::NEVER,
            buckets: PrimitiveKind::ALL.map(DrawBucket::new),
            trackers: Default::default(),
            last_bound: None,
            polygon_offset: false,
            stats: MapperStats::default(),
        }
    }

    // ---- Configuration ----

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: MapperConfig) {
        if self.config != config {
            self.config = config;
            self.mtime.modified();
        }
    }

    pub fn scalar_visibility(&self) -> bool {
        self.scalar_visibility
    }

    pub fn set_scalar_visibility(&mut self, visible: bool) {
        if self.scalar_visibility != visible {
            self.scalar_visibility = visible;
            self.mtime.modified();
        }
    }

    pub fn scalar_mode(&self) -> ScalarMode {
        self.scalar_mode
    }

    pub fn set_scalar_mode(&mut self, mode: ScalarMode) {
        if self.scalar_mode != mode {
            self.scalar_mode = mode;
            self.mtime.modified();
        }
    }

    pub fn scalar_material_mode(&self) -> ScalarMaterialMode {
        self.scalar_material_mode
    }

    pub fn set_scalar_material_mode(&mut self, mode: ScalarMaterialMode) {
        if self.scalar_material_mode != mode {
            self.scalar_material_mode = mode;
            self.mtime.modified();
        }
    }

    pub fn lookup_table(&self) -> &LookupTable {
        &self.lookup_table
    }

    /// The table tracks its own modification time.
    pub fn lookup_table_mut(&mut self) -> &mut LookupTable {
        &mut self.lookup_table
    }

    pub fn model_transform(&self) -> Option<Mat4> {
        self.model_transform
    }

    /// Extra transform applied after the actor matrix. Uniform-only.
    pub fn set_model_transform(&mut self, transform: Option<Mat4>) {
        self.model_transform = transform;
    }

    pub fn model_color(&self) -> Option<[u8; 4]> {
        self.model_color
    }

    /// RGBA overriding the property's diffuse color and opacity. Uniform-only.
    pub fn set_model_color(&mut self, color: Option<[u8; 4]>) {
        self.model_color = color;
    }

    pub fn modified(&mut self) {
        self.mtime.modified();
    }

    /// Latest of the mapper's own stamp and its lookup table.
    pub fn mtime(&self) -> TimeStamp {
        self.mtime.max(self.lookup_table.mtime())
    }

    // ---- Queries ----

    pub fn stats(&self) -> MapperStats {
        self.stats
    }

    pub fn bucket(&self, kind: PrimitiveKind) -> &DrawBucket {
        &self.buckets[kind.index()]
    }

    /// Layout of the current vertex buffer.
    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    pub fn vertex_buffer(&self) -> Option<BufferHandle> {
        self.vbo
    }

    /// Bounding box of the input.
    pub fn bounds(&self, input: Option<&PolyData>) -> Option<(Vec3, Vec3)> {
        input.and_then(PolyData::bounds)
    }

    /// Whether the actor draws without translucency.
    ///
    /// Direct RGBA or luminance-alpha colors with any alpha below 255 make the
    /// result translucent; otherwise the property opacity decides.
    pub fn is_opaque(&self, actor: &Actor, input: Option<&PolyData>) -> bool {
        if let Some(mesh) = input {
            if let Some(Scalars::Colors(colors)) = self.active_scalars(mesh).map(|(s, _)| s) {
                if colors.has_translucency() {
                    return false;
                }
            }
        }
        actor.property().opacity() >= 1.0
    }

    // ---- Rendering ----

    /// Draw `input` for `actor` into `view`.
    ///
    /// A missing mesh is logged and skipped, as is a mesh without points.
    pub fn render_piece<B: GpuBackend>(
        &mut self,
        ctx: &mut GraphicsContext<B>,
        view: &mut dyn RenderView,
        actor: &Actor,
        input: Option<&PolyData>,
    ) -> MapperResult<()> {
        let Some(mesh) = input else {
            log::error!("PolyDataMapper: no input mesh");
            return Ok(());
        };
        if mesh.num_points() == 0 {
            log::debug!("PolyDataMapper: input has no points, nothing to draw");
            return Ok(());
        }

        let (backend, cache) = ctx.split_mut();
        let result = self
            .render_start(backend, view, actor, mesh)
            .and_then(|()| self.render_draw(backend, cache, view, actor, mesh));
        self.render_finish(backend, view);
        result
    }

    /// Delete buffers and vertex arrays. Programs stay with the context cache.
    pub fn release_graphics_resources<B: GpuBackend>(&mut self, ctx: &mut GraphicsContext<B>) {
        let backend = ctx.backend_mut();
        if let Some(vbo) = self.vbo.take() {
            backend.delete_buffer(vbo);
        }
        for bucket in &mut self.buckets {
            if let Some(ibo) = bucket.ibo.take() {
                backend.delete_buffer(ibo);
            }
            if let Some(vao) = bucket.vao.take() {
                backend.delete_vertex_array(vao);
            }
            *bucket = DrawBucket::new(bucket.kind);
        }
        self.layout = VertexLayout::new();
        self.vbo_update_time = TimeStamp::NEVER;
        self.last_bound = None;
        log::debug!("PolyDataMapper: released graphics resources");
    }

    fn staleness_inputs(&self, actor: &Actor, mesh: &PolyData) -> StalenessInputs {
        StalenessInputs {
            mapper: self.mtime(),
            actor: actor.mtime(),
            input: mesh.mtime(),
            vbo_update: self.vbo_update_time,
        }
    }

    fn render_start<B: GpuBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        view: &mut dyn RenderView,
        actor: &Actor,
        mesh: &PolyData,
    ) -> MapperResult<()> {
        if self.config.populate_selection_settings {
            if let Some(selector) = view.selector_mut() {
                selector.begin_render_prop();
                match selector.current_pass() {
                    SelectionPass::CompositeIndexPass => selector.render_composite_index(1),
                    pass if pass.is_id_pass() => selector.render_attribute_id(0),
                    _ => {}
                }
            }
        }

        if Staleness::buffers_stale(&self.staleness_inputs(actor, mesh)) {
            self.update_buffers(backend, actor, mesh)?;
            self.vbo_update_time.modified();
            self.stats.buffer_builds += 1;
        }

        if let Some(vbo) = self.vbo {
            backend.bind_buffer(vbo);
        }
        let property = actor.property();
        backend.set_point_size(property.point_size());
        backend.set_line_width(property.line_width());

        let offset = self.config.coincident_topology.polygon_offset();
        if let CoincidentTopology::ShiftZBuffer { shift } = self.config.coincident_topology {
            log::warn!(
                "PolyDataMapper: z-buffer shift {} approximated with polygon offset",
                shift
            );
        }
        if offset.is_some() {
            backend.set_polygon_offset(offset);
            self.polygon_offset = true;
        }
        Ok(())
    }

    fn render_draw<B: GpuBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        cache: &mut ShaderCache,
        view: &dyn RenderView,
        actor: &Actor,
        mesh: &PolyData,
    ) -> MapperResult<()> {
        let representation = actor.property().representation();
        for kind in PrimitiveKind::ALL {
            if !self.buckets[kind.index()].is_active() {
                continue;
            }
            self.update_shader(backend, cache, kind, view, actor, mesh)?;

            let bucket = &self.buckets[kind.index()];
            let Some(ibo) = bucket.ibo else {
                continue;
            };
            backend.bind_buffer(ibo);
            let draws = draw_bucket(backend, bucket, representation, self.layout.vertex_count);
            backend.release_buffer(ibo);
            self.stats.draw_calls += draws as u64;
        }
        Ok(())
    }

    fn render_finish<B: GpuBackend + ?Sized>(&mut self, backend: &mut B, view: &mut dyn RenderView) {
        if self.config.populate_selection_settings {
            if let Some(selector) = view.selector_mut() {
                selector.end_render_prop();
            }
        }
        if let Some(vao) = self.last_bound.take() {
            backend.release_vertex_array(vao);
        }
        if let Some(vbo) = self.vbo {
            backend.release_buffer(vbo);
        }
        if self.polygon_offset {
            backend.set_polygon_offset(None);
            self.polygon_offset = false;
        }
    }

    /// Scalars selected by the scalar mode, with whether they live on cells.
    fn active_scalars<'m>(&self, mesh: &'m PolyData) -> Option<(&'m Scalars, bool)> {
        if !self.scalar_visibility {
            return None;
        }
        let point = mesh.point_data.scalars.as_ref();
        let cell = mesh.cell_data.scalars.as_ref();
        let prefer_cells = self.scalar_mode == ScalarMode::UseCellData || point.is_none();
        match cell {
            Some(cell) if prefer_cells && self.scalar_mode != ScalarMode::UsePointData => {
                Some((cell, true))
            }
            _ if self.scalar_mode != ScalarMode::UseCellData => point.map(|s| (s, false)),
            _ => None,
        }
    }

    fn resolve_colors<'m>(&self, mesh: &'m PolyData, opacity: f32) -> Option<ResolvedColors<'m>> {
        let (scalars, per_cell) = self.active_scalars(mesh)?;
        let colors = match scalars {
            Scalars::Colors(colors) => Cow::Borrowed(colors),
            Scalars::Values(values) => {
                Cow::Owned(self.lookup_table.map_scalars(values.values(), opacity))
            }
        };
        Some(ResolvedColors { colors, per_cell })
    }

    fn update_buffers<B: GpuBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        actor: &Actor,
        mesh: &PolyData,
    ) -> MapperResult<()> {
        let property = actor.property();
        let representation = property.representation();
        let colors = self.resolve_colors(mesh, property.opacity());
        let per_cell = colors.as_ref().is_some_and(|c| c.per_cell);

        let normals = match property.interpolation() {
            Interpolation::Flat => None,
            _ => mesh.point_data.normals.as_ref().map(|n| n.values()),
        };
        let tcoords = match (&mesh.point_data.tcoords, actor.active_texture()) {
            (Some(TCoords::One(t)), Some(_)) => Some(TCoordSlice::One(t.values())),
            (Some(TCoords::Two(t)), Some(_)) => Some(TCoordSlice::Two(t.values())),
            _ => None,
        };

        let exploded = if per_cell {
            Some(explode_cells(mesh)?)
        } else {
            None
        };
        let cells: [&CellArray; 4] = match &exploded {
            Some(exploded) => [
                &exploded.cells[0],
                &exploded.cells[1],
                &exploded.cells[2],
                &exploded.cells[3],
            ],
            None => mesh.cell_arrays(),
        };

        let vertex_buffer = build_vertex_buffer(&VertexBufferInput {
            points: mesh.points.values(),
            normals,
            tcoords,
            colors: colors.as_ref().map(|c| ColorSource {
                data: c.colors.bytes(),
                components: c.colors.components(),
                per_cell: c.per_cell,
            }),
            explosion: exploded.as_ref().map(|e| &e.explosion),
        })?;
        let vertex_count = vertex_buffer.layout.vertex_count;

        let vbo = match self.vbo {
            Some(vbo) => vbo,
            None => {
                let vbo = backend.create_buffer(BufferKind::Vertex)?;
                self.vbo = Some(vbo);
                vbo
            }
        };
        backend.upload_buffer(vbo, &vertex_buffer.data)?;

        for (bucket, cells) in self.buckets.iter_mut().zip(cells) {
            let indices = match IndexLayout::for_bucket(bucket.kind, representation) {
                IndexLayout::Points => point_index_buffer(cells),
                IndexLayout::Triangles => triangle_index_buffer(cells),
                IndexLayout::Runs => multi_index_buffer(cells),
            };
            upload_indices(backend, bucket, indices, vertex_count)?;
        }

        log::debug!(
            "PolyDataMapper: rebuilt buffers ({} vertices, stride {}, exploded: {})",
            vertex_count,
            vertex_buffer.layout.stride,
            per_cell
        );
        self.layout = vertex_buffer.layout;
        Ok(())
    }

    /// Make the bucket's program current, rebind attributes if needed and
    /// write every uniform.
    fn update_shader<B: GpuBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        cache: &mut ShaderCache,
        kind: PrimitiveKind,
        view: &dyn RenderView,
        actor: &Actor,
        mesh: &PolyData,
    ) -> MapperResult<()> {
        let property = actor.property();
        let has_normals = self.layout.normal_offset().is_some();
        let complexity = bucket_light_complexity(kind, property, has_normals, view.lights());
        let picking = view.selector().is_some() || view.is_picking();
        let depth_peeling = view.depth_peeling().is_some();

        let inputs = self.staleness_inputs(actor, mesh);
        let tracker = &mut self.trackers[kind.index()];
        tracker.observe(complexity, picking, depth_peeling);

        let bucket = &mut self.buckets[kind.index()];
        let program_cached = bucket.program.is_some_and(|p| cache.contains_program(p));
        let staleness = Staleness::evaluate(bucket, &inputs, tracker, program_cached);
        debug_assert!(!staleness.buffers, "buffers are rebuilt in the start phase");

        let current = bucket.program;
        let program = match current {
            Some(program) if !staleness.shader && cache.ready_program(backend, program) => program,
            _ => {
                let state = RenderState {
                    light_complexity: complexity,
                    picking_active: picking,
                    depth_peeling_active: depth_peeling,
                    has_vertex_colors: self.layout.color_components() > 0,
                    has_normals,
                    texture_components: self.layout.tcoord_components() as u8,
                };
                let color_mode = self
                    .scalar_material_mode
                    .resolve(property.ambient(), property.diffuse());
                let variant =
                    ShaderVariant::from_state(&state, property.representation(), color_mode);

                let reused = match current {
                    Some(program) if program_cached && bucket.variant == Some(variant) => {
                        cache.ready_program(backend, program).then_some(program)
                    }
                    _ => None,
                };
                let program = match reused {
                    Some(program) => program,
                    None => {
                        let source = variant.build();
                        self.stats.shader_builds += 1;
                        let program = cache.ready_shader(backend, &source)?;
                        log::debug!(
                            "PolyDataMapper: {:?} bucket uses {:?} for {:?}",
                            kind,
                            program,
                            variant
                        );
                        if bucket.program != Some(program) {
                            if let Some(vao) = bucket.vao {
                                backend.reset_vertex_array(vao);
                            }
                            bucket.attribute_update_time = TimeStamp::NEVER;
                        }
                        bucket.program = Some(program);
                        bucket.variant = Some(variant);
                        program
                    }
                };
                bucket.shader_source_time.modified();
                program
            }
        };

        // A program change resets the vertex array, so ask again.
        let rebind = staleness.bindings || Staleness::bindings_stale(bucket, &inputs);
        let vao = match bucket.vao {
            Some(vao) => vao,
            None => {
                let vao = backend.create_vertex_array()?;
                bucket.vao = Some(vao);
                bucket.attribute_update_time = TimeStamp::NEVER;
                vao
            }
        };

        if rebind {
            let vbo = self
                .vbo
                .ok_or_else(|| BackendError::InvalidHandle("vertex buffer not created".to_string()))?;
            for attribute in &self.layout.attributes {
                let name = attribute.semantic.attribute_name();
                match backend.attribute_location(program, name) {
                    Some(location) => backend.set_vertex_attribute(
                        vao,
                        location,
                        &AttributePointer {
                            buffer: vbo,
                            offset: attribute.offset,
                            stride: self.layout.stride,
                            format: attribute.format,
                        },
                    ),
                    None => log::error!(
                        "PolyDataMapper: program {:?} has no attribute '{}', left unbound",
                        program,
                        name
                    ),
                }
            }
            bucket.attribute_update_time.modified();
            self.stats.attribute_binds += 1;
        }

        let variant_has_normals = bucket
            .variant
            .is_some_and(|v| v.features.contains(ShaderFeatures::NORMALS));

        if self.layout.tcoord_components() > 0 {
            if let Some(texture) = actor.active_texture() {
                let unit = backend.bind_texture(texture);
                backend.set_uniform(program, "texture1", &UniformValue::Int(unit as i32));
            }
        }
        if let Some(peeling) = view.depth_peeling() {
            let opaque = backend.bind_texture(peeling.opaque_z_texture());
            let translucent = backend.bind_texture(peeling.translucent_z_texture());
            backend.set_uniform(program, "opaqueZTexture", &UniformValue::Int(opaque as i32));
            backend.set_uniform(
                program,
                "translucentZTexture",
                &UniformValue::Int(translucent as i32),
            );
        }
        if picking {
            backend.set_uniform(program, "mapperIndex", &UniformValue::Vec3(picking_color(view)));
        }

        set_property_uniforms(backend, program, property, self.model_color, complexity);
        set_camera_uniforms(
            backend,
            program,
            view.camera(),
            view.aspect_ratio(),
            actor.matrix() * self.model_transform.unwrap_or(Mat4::IDENTITY),
            complexity,
            variant_has_normals,
        );
        set_lighting_uniforms(
            backend,
            program,
            view.lights(),
            view.camera(),
            complexity,
            self.config.max_lights,
        );

        backend.bind_vertex_array(vao);
        self.last_bound = Some(vao);
        Ok(())
    }
}

fn upload_indices<B: GpuBackend + ?Sized>(
    backend: &mut B,
    bucket: &mut DrawBucket,
    indices: IndexBuffer,
    vertex_count: usize,
) -> MapperResult<()> {
    let max = indices.max_index();
    if indices.index_count() > 0 && max as usize >= vertex_count {
        return Err(MapperError::PointIndexOutOfRange {
            index: max,
            count: vertex_count,
        });
    }

    bucket.index_count = indices.index_count();
    if indices.index_count() > 0 {
        let ibo = match bucket.ibo {
            Some(ibo) => ibo,
            None => {
                let ibo = backend.create_buffer(BufferKind::Index)?;
                bucket.ibo = Some(ibo);
                ibo
            }
        };
        backend.upload_buffer(ibo, indices.as_bytes())?;
    }
    bucket.sub_draws = indices.sub_draws;
    Ok(())
}
