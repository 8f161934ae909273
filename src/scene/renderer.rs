//! What a mapper needs to know about the renderer drawing it.

use crate::backend::TextureHandle;
use crate::selection::{HardwareSelector, Selection};

use super::camera::Camera;
use super::light::Light;

/// Capability of a renderer that peels translucent layers by depth.
pub trait DepthPeeling {
    /// Depth of the opaque geometry.
    fn opaque_z_texture(&self) -> TextureHandle;
    /// Depth of the previously peeled translucent layer.
    fn translucent_z_texture(&self) -> TextureHandle;
}

/// Read-mostly view of the renderer for one draw.
pub trait RenderView {
    fn camera(&self) -> &Camera;
    fn lights(&self) -> &[Light];
    /// Viewport width over height.
    fn aspect_ratio(&self) -> f32;
    /// The render window is in picking mode.
    fn is_picking(&self) -> bool;
    /// Id assigned to the prop being drawn while picking.
    fn current_pick_id(&self) -> u32;

    fn selector(&self) -> Option<&dyn Selection> {
        None
    }

    fn selector_mut(&mut self) -> Option<&mut dyn Selection> {
        None
    }

    /// Present only when the last rendering used depth peeling.
    fn depth_peeling(&self) -> Option<&dyn DepthPeeling> {
        None
    }
}

/// The pair of depth textures a peeling pass reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthPeelingTextures {
    pub opaque_z: TextureHandle,
    pub translucent_z: TextureHandle,
}

impl DepthPeeling for DepthPeelingTextures {
    fn opaque_z_texture(&self) -> TextureHandle {
        self.opaque_z
    }

    fn translucent_z_texture(&self) -> TextureHandle {
        self.translucent_z
    }
}

/// A plain renderer holding camera, lights and pass state.
#[derive(Debug, Clone)]
pub struct Renderer {
    pub camera: Camera,
    pub lights: Vec<Light>,
    pub aspect_ratio: f32,
    pub picking: bool,
    pub pick_id: u32,
    pub selector: Option<HardwareSelector>,
    pub depth_peeling: Option<DepthPeelingTextures>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            camera: Camera::default(),
            lights: Vec::new(),
            aspect_ratio: 1.0,
            picking: false,
            pick_id: 0,
            selector: None,
            depth_peeling: None,
        }
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_light(mut self, light: Light) -> Self {
        self.lights.push(light);
        self
    }
}

impl RenderView for Renderer {
    fn camera(&self) -> &Camera {
        &self.camera
    }

    fn lights(&self) -> &[Light] {
        &self.lights
    }

    fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    fn is_picking(&self) -> bool {
        self.picking
    }

    fn current_pick_id(&self) -> u32 {
        self.pick_id
    }

    fn selector(&self) -> Option<&dyn Selection> {
        self.selector.as_ref().map(|s| s as &dyn Selection)
    }

    fn selector_mut(&mut self) -> Option<&mut dyn Selection> {
        self.selector.as_mut().map(|s| s as &mut dyn Selection)
    }

    fn depth_peeling(&self) -> Option<&dyn DepthPeeling> {
        self.depth_peeling.as_ref().map(|d| d as &dyn DepthPeeling)
    }
}
