//! Dummy GPU backend for testing and headless use.
//!
//! This backend performs no GPU work. It hands out fresh handles, keeps the
//! uploaded bytes and compiled sources around, and records every call as a
//! [`BackendCommand`] so tests can assert on exactly what the mapper issued.

use std::collections::{HashMap, HashSet};

use crate::mesh::SubDraw;
use crate::shader::ShaderSource;

use super::{
    AttributePointer, BackendResult, BufferHandle, BufferKind, GpuBackend, PrimitiveMode,
    ProgramHandle, TextureHandle, UniformValue, VertexArrayHandle,
};

/// A single recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    CreateBuffer {
        buffer: BufferHandle,
        kind: BufferKind,
    },
    UploadBuffer {
        buffer: BufferHandle,
        len: usize,
    },
    DeleteBuffer(BufferHandle),
    BindBuffer(BufferHandle),
    ReleaseBuffer(BufferHandle),
    CompileProgram(ProgramHandle),
    DeleteProgram(ProgramHandle),
    UseProgram(ProgramHandle),
    SetUniform {
        program: ProgramHandle,
        name: String,
        value: UniformValue,
    },
    CreateVertexArray(VertexArrayHandle),
    ResetVertexArray(VertexArrayHandle),
    DeleteVertexArray(VertexArrayHandle),
    BindVertexArray(VertexArrayHandle),
    ReleaseVertexArray(VertexArrayHandle),
    SetVertexAttribute {
        vao: VertexArrayHandle,
        location: u32,
        pointer: AttributePointer,
    },
    BindTexture {
        texture: TextureHandle,
        unit: u32,
    },
    PointSize(f32),
    LineWidth(f32),
    PolygonOffset(Option<(f32, f32)>),
    DrawRangeElements {
        mode: PrimitiveMode,
        start: u32,
        end: u32,
        count: u32,
        byte_offset: u64,
    },
    DrawElements {
        mode: PrimitiveMode,
        count: u32,
        byte_offset: u64,
    },
    MultiDrawElements {
        mode: PrimitiveMode,
        draws: Vec<SubDraw>,
    },
}

impl BackendCommand {
    /// Returns `true` for commands that rasterize primitives.
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            Self::DrawRangeElements { .. } | Self::DrawElements { .. } | Self::MultiDrawElements { .. }
        )
    }
}

/// Recording GPU backend.
#[derive(Debug, Default)]
pub struct DummyBackend {
    next_handle: u64,
    commands: Vec<BackendCommand>,
    buffers: HashMap<BufferHandle, Vec<u8>>,
    programs: HashMap<ProgramHandle, ShaderSource>,
    texture_units: HashMap<TextureHandle, u32>,
    hidden_attributes: HashSet<String>,
}

impl DummyBackend {
    /// Create a new dummy backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    /// Report `name` as absent from every program, like a driver that
    /// optimized the attribute out.
    pub fn hide_attribute(&mut self, name: &str) {
        self.hidden_attributes.insert(name.to_string());
    }

    /// Every command recorded since creation or the last [`Self::clear_commands`].
    pub fn commands(&self) -> &[BackendCommand] {
        &self.commands
    }

    /// Forget recorded commands. Resources stay alive.
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Recorded draw commands, in issue order.
    pub fn draw_commands(&self) -> Vec<&BackendCommand> {
        self.commands.iter().filter(|c| c.is_draw()).collect()
    }

    /// Number of programs compiled so far (including deleted ones).
    pub fn compile_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, BackendCommand::CompileProgram(_)))
            .count()
    }

    /// Number of live programs.
    pub fn live_program_count(&self) -> usize {
        self.programs.len()
    }

    /// Source a live program was compiled from.
    pub fn program_source(&self, program: ProgramHandle) -> Option<&ShaderSource> {
        self.programs.get(&program)
    }

    /// Last bytes uploaded into a live buffer.
    pub fn buffer_data(&self, buffer: BufferHandle) -> Option<&[u8]> {
        self.buffers.get(&buffer).map(Vec::as_slice)
    }

    /// The last value written to a uniform of `program`.
    pub fn uniform(&self, program: ProgramHandle, name: &str) -> Option<&UniformValue> {
        self.commands.iter().rev().find_map(|c| match c {
            BackendCommand::SetUniform {
                program: p,
                name: n,
                value,
            } if *p == program && n == name => Some(value),
            _ => None,
        })
    }
}

/// Attribute names in declaration order, used as their locations.
fn declared_attributes(vertex_source: &str) -> impl Iterator<Item = &str> {
    vertex_source.lines().filter_map(|line| {
        let line = line.trim();
        let rest = line.strip_prefix("attribute ")?;
        let name = rest.split_whitespace().nth(1)?;
        Some(name.trim_end_matches(';'))
    })
}

impl GpuBackend for DummyBackend {
    fn name(&self) -> &'static str {
        "Dummy Backend"
    }

    fn create_buffer(&mut self, kind: BufferKind) -> BackendResult<BufferHandle> {
        let buffer = BufferHandle::from_raw(self.next());
        log::trace!("DummyBackend: creating {:?} buffer {:?}", kind, buffer);
        self.buffers.insert(buffer, Vec::new());
        self.commands.push(BackendCommand::CreateBuffer { buffer, kind });
        Ok(buffer)
    }

    fn upload_buffer(&mut self, buffer: BufferHandle, data: &[u8]) -> BackendResult<()> {
        log::trace!("DummyBackend: uploading {} bytes to {:?}", data.len(), buffer);
        self.buffers.insert(buffer, data.to_vec());
        self.commands.push(BackendCommand::UploadBuffer {
            buffer,
            len: data.len(),
        });
        Ok(())
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        log::trace!("DummyBackend: deleting buffer {:?}", buffer);
        self.buffers.remove(&buffer);
        self.commands.push(BackendCommand::DeleteBuffer(buffer));
    }

    fn bind_buffer(&mut self, buffer: BufferHandle) {
        self.commands.push(BackendCommand::BindBuffer(buffer));
    }

    fn release_buffer(&mut self, buffer: BufferHandle) {
        self.commands.push(BackendCommand::ReleaseBuffer(buffer));
    }

    fn compile_program(&mut self, source: &ShaderSource) -> BackendResult<ProgramHandle> {
        let program = ProgramHandle::from_raw(self.next());
        log::trace!(
            "DummyBackend: compiling program {:?} ({} + {} bytes)",
            program,
            source.vertex.len(),
            source.fragment.len()
        );
        self.programs.insert(program, source.clone());
        self.commands.push(BackendCommand::CompileProgram(program));
        Ok(program)
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        log::trace!("DummyBackend: deleting program {:?}", program);
        self.programs.remove(&program);
        self.commands.push(BackendCommand::DeleteProgram(program));
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.commands.push(BackendCommand::UseProgram(program));
    }

    fn attribute_location(&self, program: ProgramHandle, name: &str) -> Option<u32> {
        if self.hidden_attributes.contains(name) {
            return None;
        }
        let source = self.programs.get(&program)?;
        declared_attributes(&source.vertex)
            .position(|declared| declared == name)
            .map(|index| index as u32)
    }

    fn set_uniform(&mut self, program: ProgramHandle, name: &str, value: &UniformValue) {
        self.commands.push(BackendCommand::SetUniform {
            program,
            name: name.to_string(),
            value: value.clone(),
        });
    }

    fn create_vertex_array(&mut self) -> BackendResult<VertexArrayHandle> {
        let vao = VertexArrayHandle::from_raw(self.next());
        log::trace!("DummyBackend: creating vertex array {:?}", vao);
        self.commands.push(BackendCommand::CreateVertexArray(vao));
        Ok(vao)
    }

    fn reset_vertex_array(&mut self, vao: VertexArrayHandle) {
        self.commands.push(BackendCommand::ResetVertexArray(vao));
    }

    fn delete_vertex_array(&mut self, vao: VertexArrayHandle) {
        self.commands.push(BackendCommand::DeleteVertexArray(vao));
    }

    fn bind_vertex_array(&mut self, vao: VertexArrayHandle) {
        self.commands.push(BackendCommand::BindVertexArray(vao));
    }

    fn release_vertex_array(&mut self, vao: VertexArrayHandle) {
        self.commands.push(BackendCommand::ReleaseVertexArray(vao));
    }

    fn set_vertex_attribute(
        &mut self,
        vao: VertexArrayHandle,
        location: u32,
        pointer: &AttributePointer,
    ) {
        self.commands.push(BackendCommand::SetVertexAttribute {
            vao,
            location,
            pointer: *pointer,
        });
    }

    fn bind_texture(&mut self, texture: TextureHandle) -> u32 {
        let next_unit = self.texture_units.len() as u32;
        let unit = *self.texture_units.entry(texture).or_insert(next_unit);
        self.commands.push(BackendCommand::BindTexture { texture, unit });
        unit
    }

    fn set_point_size(&mut self, size: f32) {
        self.commands.push(BackendCommand::PointSize(size));
    }

    fn set_line_width(&mut self, width: f32) {
        self.commands.push(BackendCommand::LineWidth(width));
    }

    fn set_polygon_offset(&mut self, offset: Option<(f32, f32)>) {
        self.commands.push(BackendCommand::PolygonOffset(offset));
    }

    fn draw_range_elements(
        &mut self,
        mode: PrimitiveMode,
        start: u32,
        end: u32,
        count: u32,
        byte_offset: u64,
    ) {
        log::trace!(
            "DummyBackend: draw {:?} range [{}, {}] count {} at {}",
            mode,
            start,
            end,
            count,
            byte_offset
        );
        self.commands.push(BackendCommand::DrawRangeElements {
            mode,
            start,
            end,
            count,
            byte_offset,
        });
    }

    fn draw_elements(&mut self, mode: PrimitiveMode, count: u32, byte_offset: u64) {
        log::trace!(
            "DummyBackend: draw {:?} count {} at {}",
            mode,
            count,
            byte_offset
        );
        self.commands.push(BackendCommand::DrawElements {
            mode,
            count,
            byte_offset,
        });
    }

    fn multi_draw_elements(&mut self, mode: PrimitiveMode, draws: &[SubDraw]) {
        log::trace!("DummyBackend: multi-draw {:?} x{}", mode, draws.len());
        self.commands.push(BackendCommand::MultiDrawElements {
            mode,
            draws: draws.to_vec(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(vertex: &str) -> ShaderSource {
        ShaderSource {
            vertex: vertex.to_string(),
            fragment: "void main() {}".to_string(),
        }
    }

    #[test]
    fn test_dummy_backend_name() {
        let backend = DummyBackend::new();
        assert_eq!(backend.name(), "Dummy Backend");
    }

    #[test]
    fn test_handles_are_unique() {
        let mut backend = DummyBackend::new();
        let a = backend.create_buffer(BufferKind::Vertex).unwrap();
        let b = backend.create_buffer(BufferKind::Index).unwrap();
        let vao = backend.create_vertex_array().unwrap();
        assert_ne!(a, b);
        assert_ne!(a.raw(), vao.raw());
    }

    #[test]
    fn test_upload_keeps_data() {
        let mut backend = DummyBackend::new();
        let buffer = backend.create_buffer(BufferKind::Index).unwrap();
        backend.upload_buffer(buffer, &[1, 2, 3]).unwrap();
        assert_eq!(backend.buffer_data(buffer), Some(&[1u8, 2, 3][..]));
        backend.delete_buffer(buffer);
        assert_eq!(backend.buffer_data(buffer), None);
    }

    #[test]
    fn test_attribute_locations_follow_declarations() {
        let mut backend = DummyBackend::new();
        let program = backend
            .compile_program(&source(
                "attribute vec4 vertexMC;\nattribute vec3 normalMC;\nvoid main() {}",
            ))
            .unwrap();
        assert_eq!(backend.attribute_location(program, "vertexMC"), Some(0));
        assert_eq!(backend.attribute_location(program, "normalMC"), Some(1));
        assert_eq!(backend.attribute_location(program, "scalarColor"), None);

        backend.hide_attribute("normalMC");
        assert_eq!(backend.attribute_location(program, "normalMC"), None);
        assert_eq!(backend.attribute_location(program, "vertexMC"), Some(0));
    }

    #[test]
    fn test_texture_units_are_stable() {
        let mut backend = DummyBackend::new();
        let a = TextureHandle::from_raw(10);
        let b = TextureHandle::from_raw(11);
        assert_eq!(backend.bind_texture(a), 0);
        assert_eq!(backend.bind_texture(b), 1);
        assert_eq!(backend.bind_texture(a), 0);
    }

    #[test]
    fn test_last_uniform_value_wins() {
        let mut backend = DummyBackend::new();
        let program = backend.compile_program(&source("void main() {}")).unwrap();
        backend.set_uniform(program, "opacityUniform", &UniformValue::Float(0.5));
        backend.set_uniform(program, "opacityUniform", &UniformValue::Float(1.0));
        assert_eq!(
            backend.uniform(program, "opacityUniform"),
            Some(&UniformValue::Float(1.0))
        );
        assert_eq!(backend.draw_commands().len(), 0);
    }
}
