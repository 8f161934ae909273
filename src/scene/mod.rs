//! Scene inputs consumed by the mapper: camera, lights, actor and renderer.

mod actor;
mod camera;
mod light;
mod property;
mod renderer;

pub use actor::Actor;
pub use camera::{Camera, Projection};
pub use light::{Light, LightKind};
pub use property::{Interpolation, Property, Representation};
pub use renderer::{DepthPeeling, DepthPeelingTextures, RenderView, Renderer};
