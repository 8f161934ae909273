//! Instanced drawing of one source mesh at many transforms.
//!
//! A glyph session readies buffers and the triangle program once, then each
//! instance only writes its transform, color and pick color before drawing.

use glam::{Mat4, Vec3};

use super::bucket::PrimitiveKind;
use super::draw::draw_bucket;
use super::uniforms::normal_matrix;
use super::PolyDataMapper;
use crate::backend::{BufferHandle, GpuBackend, ProgramHandle, UniformValue};
use crate::context::GraphicsContext;
use crate::error::MapperResult;
use crate::mesh::PolyData;
use crate::scene::{Actor, RenderView};
use crate::selection::encode_pick_id;
use crate::shader::{LightComplexity, ShaderFeatures};

/// An open instanced draw of a mapper's triangles.
///
/// Ends with [`GlyphSession::finish`], or on drop.
pub struct GlyphSession<'a, B: GpuBackend> {
    mapper: &'a mut PolyDataMapper,
    backend: &'a mut B,
    view: &'a mut dyn RenderView,
    actor: &'a Actor,
    program: Option<ProgramHandle>,
    ibo: Option<BufferHandle>,
    writes_normals: bool,
    instances: u32,
    finished: bool,
}

impl PolyDataMapper {
    /// Run the start phase and ready the triangle program for instancing.
    ///
    /// If the source mesh has no triangles the session draws nothing.
    pub fn begin_glyph_render<'a, B: GpuBackend>(
        &'a mut self,
        ctx: &'a mut GraphicsContext<B>,
        view: &'a mut dyn RenderView,
        actor: &'a Actor,
        source: &PolyData,
    ) -> MapperResult<GlyphSession<'a, B>> {
        let (backend, cache) = ctx.split_mut();

        let ready = self.render_start(backend, view, actor, source).and_then(|()| {
            if self.buckets[PrimitiveKind::Triangles.index()].is_active() {
                self.update_shader(backend, cache, PrimitiveKind::Triangles, view, actor, source)
            } else {
                Ok(())
            }
        });
        if let Err(err) = ready {
            self.render_finish(backend, view);
            return Err(err);
        }

        let bucket = &self.buckets[PrimitiveKind::Triangles.index()];
        let (program, ibo) = if bucket.is_active() {
            (bucket.program, bucket.ibo)
        } else {
            log::debug!("PolyDataMapper: glyph source has no triangles");
            (None, None)
        };
        let writes_normals = bucket.variant.is_some_and(|v| {
            v.light_complexity != LightComplexity::Unlit
                || v.features.contains(ShaderFeatures::NORMALS)
        });
        if let Some(ibo) = ibo {
            backend.bind_buffer(ibo);
        }

        Ok(GlyphSession {
            mapper: self,
            backend,
            view,
            actor,
            program,
            ibo,
            writes_normals,
            instances: 0,
            finished: false,
        })
    }
}

impl<'a, B: GpuBackend> GlyphSession<'a, B> {
    /// Draw one instance with its own color and model transform.
    ///
    /// Returns the number of draw calls issued.
    pub fn draw(&mut self, rgba: [u8; 4], transform: Mat4) -> u32 {
        let Some(program) = self.program else {
            return 0;
        };

        let model_view = self.view.camera().view_matrix() * self.actor.matrix() * transform;
        self.backend
            .set_uniform(program, "MCVCMatrix", &UniformValue::Mat4(model_view));
        if self.writes_normals {
            self.backend.set_uniform(
                program,
                "normalMatrix",
                &UniformValue::Mat3(normal_matrix(model_view)),
            );
        }

        let color = Vec3::new(rgba[0] as f32, rgba[1] as f32, rgba[2] as f32) / 255.0;
        self.backend.set_uniform(
            program,
            "opacityUniform",
            &UniformValue::Float(rgba[3] as f32 / 255.0),
        );
        self.backend
            .set_uniform(program, "diffuseColorUniform", &UniformValue::Vec3(color));

        let pick_color = match self.view.selector() {
            Some(selector) => {
                let color = selector.prop_color();
                debug_assert!(
                    color != Vec3::ZERO,
                    "glyph pick color collides with the primitive-id sentinel"
                );
                Some(color)
            }
            None if self.view.is_picking() => Some(encode_pick_id(self.view.current_pick_id())),
            None => None,
        };
        if let Some(pick_color) = pick_color {
            self.backend
                .set_uniform(program, "mapperIndex", &UniformValue::Vec3(pick_color));
        }

        let bucket = &self.mapper.buckets[PrimitiveKind::Triangles.index()];
        let draws = draw_bucket(
            &mut *self.backend,
            bucket,
            self.actor.property().representation(),
            self.mapper.layout.vertex_count,
        );
        self.mapper.stats.draw_calls += draws as u64;
        self.instances += 1;
        draws
    }

    /// Instances drawn so far.
    pub fn instances(&self) -> u32 {
        self.instances
    }

    /// Run the finish phase.
    pub fn finish(mut self) {
        self.end();
    }

    fn end(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        if let Some(ibo) = self.ibo {
            self.backend.release_buffer(ibo);
        }
        log::trace!("PolyDataMapper: glyph session drew {} instances", self.instances);
        self.mapper.render_finish(&mut *self.backend, &mut *self.view);
    }
}

impl<B: GpuBackend> Drop for GlyphSession<'_, B> {
    fn drop(&mut self) {
        self.end();
    }
}
