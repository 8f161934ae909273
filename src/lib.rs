//! RedLilium Mapper - polygon mesh rendering with cached shader variants
//!
//! The mapper turns a [`PolyData`] mesh into GPU draw calls through a
//! backend-agnostic [`GpuBackend`] trait. It decides lazily, from modification
//! stamps, when vertex and index buffers must be rebuilt, when a shader variant
//! must be regenerated and when attribute bindings must be refreshed.
//!
//! # Features
//! - Interleaved vertex buffers with optional normals, texture coordinates and
//!   per-point or per-cell colors
//! - Index buffers for points, lines, polygons and triangle strips in point,
//!   wireframe and surface representations
//! - GLSL programs assembled from templates by marker substitution, shared
//!   across mappers through an LRU [`ShaderCache`]
//! - Unlit, headlight, light-kit and positional lighting
//! - Hardware picking and depth peeling hooks
//! - Instanced glyph drawing
//!
//! # Example
//!
//! ```
//! use redlilium_mapper::{
//!     Actor, CellArray, DummyBackend, GraphicsContext, PolyData, PolyDataMapper, Renderer,
//! };
//! use glam::Vec3;
//!
//! let mesh = PolyData::new()
//!     .with_points(vec![Vec3::ZERO, Vec3::X, Vec3::Y])
//!     .with_polys(CellArray::from_cells([[0u32, 1, 2]]));
//!
//! let mut ctx = GraphicsContext::new(DummyBackend::new());
//! let mut renderer = Renderer::new();
//! let mut mapper = PolyDataMapper::new();
//! mapper
//!     .render_piece(&mut ctx, &mut renderer, &Actor::new(), Some(&mesh))
//!     .unwrap();
//! assert_eq!(ctx.backend().draw_commands().len(), 1);
//! ```

pub mod backend;
pub mod color;
pub mod config;
pub mod context;
pub mod error;
pub mod mapper;
pub mod mesh;
pub mod scene;
pub mod selection;
pub mod shader;
pub mod time_stamp;

pub use backend::{BackendError, BackendResult, DummyBackend, GpuBackend};
pub use color::LookupTable;
pub use config::{CoincidentTopology, ContextConfig, MapperConfig};
pub use context::GraphicsContext;
pub use error::{MapperError, MapperResult};
pub use mapper::{GlyphSession, MapperStats, PolyDataMapper, PrimitiveKind, ScalarMode};
pub use mesh::{CellArray, ColorArray, DataArray, PolyData, Scalars, TCoords};
pub use scene::{Actor, Camera, Light, LightKind, Property, RenderView, Renderer, Representation};
pub use selection::{HardwareSelector, Selection, SelectionPass};
pub use shader::{LightComplexity, ScalarMaterialMode, ShaderCache, ShaderSource, ShaderVariant};
pub use time_stamp::TimeStamp;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the crate version. Call once after installing a logger.
pub fn init() {
    log::info!("redlilium-mapper {}", VERSION);
}
