//! Surface appearance of an actor.

use glam::Vec3;

use crate::backend::TextureHandle;
use crate::time_stamp::TimeStamp;

/// How cells are rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Representation {
    Points,
    Wireframe,
    #[default]
    Surface,
}

/// How shading is interpolated across a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Interpolation {
    Flat,
    #[default]
    Gouraud,
    Phong,
}

macro_rules! property_accessors {
    ($($(#[$meta:meta])* $field:ident, $setter:ident: $ty:ty;)*) => {
        $(
            $(#[$meta])*
            #[inline]
            pub fn $field(&self) -> $ty {
                self.$field
            }

            #[doc = concat!("Set `", stringify!($field), "`, marking the property modified on change.")]
            pub fn $setter(&mut self, value: $ty) {
                if self.$field != value {
                    self.$field = value;
                    self.mtime.modified();
                }
            }
        )*
    };
}

/// Material and rasterization settings.
///
/// Every setter that changes a value advances the modification time, which
/// the mapper compares against its cached buffers and shaders.
#[derive(Debug, Clone)]
pub struct Property {
    representation: Representation,
    interpolation: Interpolation,
    lighting: bool,
    ambient: f32,
    diffuse: f32,
    specular: f32,
    ambient_color: Vec3,
    diffuse_color: Vec3,
    specular_color: Vec3,
    specular_power: f32,
    opacity: f32,
    point_size: f32,
    line_width: f32,
    textures: Vec<TextureHandle>,
    mtime: TimeStamp,
}

impl Default for Property {
    fn default() -> Self {
        Self {
            representation: Representation::Surface,
            interpolation: Interpolation::Gouraud,
            lighting: true,
            ambient: 0.0,
            diffuse: 1.0,
            specular: 0.0,
            ambient_color: Vec3::ONE,
            diffuse_color: Vec3::ONE,
            specular_color: Vec3::ONE,
            specular_power: 1.0,
            opacity: 1.0,
            point_size: 1.0,
            line_width: 1.0,
            textures: Vec::new(),
            mtime: TimeStamp::now(),
        }
    }
}

impl Property {
    pub fn new() -> Self {
        Self::default()
    }

    property_accessors! {
        representation, set_representation: Representation;
        interpolation, set_interpolation: Interpolation;
        /// Whether lighting applies at all.
        lighting, set_lighting: bool;
        /// Ambient coefficient.
        ambient, set_ambient: f32;
        /// Diffuse coefficient.
        diffuse, set_diffuse: f32;
        /// Specular coefficient.
        specular, set_specular: f32;
        ambient_color, set_ambient_color: Vec3;
        diffuse_color, set_diffuse_color: Vec3;
        specular_color, set_specular_color: Vec3;
        specular_power, set_specular_power: f32;
        opacity, set_opacity: f32;
        point_size, set_point_size: f32;
        line_width, set_line_width: f32;
    }

    /// Set ambient and diffuse color together.
    pub fn set_color(&mut self, color: Vec3) {
        self.set_ambient_color(color);
        self.set_diffuse_color(color);
    }

    /// Textures attached to the property.
    pub fn textures(&self) -> &[TextureHandle] {
        &self.textures
    }

    /// Attach a texture.
    pub fn add_texture(&mut self, texture: TextureHandle) {
        self.textures.push(texture);
        self.mtime.modified();
    }

    /// Detach every texture.
    pub fn clear_textures(&mut self) {
        if !self.textures.is_empty() {
            self.textures.clear();
            self.mtime.modified();
        }
    }

    /// Last modification time.
    pub fn mtime(&self) -> TimeStamp {
        self.mtime
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let property = Property::new();
        assert_eq!(property.representation(), Representation::Surface);
        assert_eq!(property.interpolation(), Interpolation::Gouraud);
        assert!(property.lighting());
        assert_eq!(property.opacity(), 1.0);
    }

    #[test]
    fn test_setter_bumps_mtime_only_on_change() {
        let mut property = Property::new();
        let before = property.mtime();
        property.set_opacity(1.0);
        assert_eq!(property.mtime(), before);
        property.set_opacity(0.5);
        assert!(property.mtime() > before);
    }

    #[test]
    fn test_textures() {
        let mut property = Property::new();
        property.add_texture(TextureHandle::from_raw(3));
        assert_eq!(property.textures(), &[TextureHandle::from_raw(3)]);
        property.clear_textures();
        assert!(property.textures().is_empty());
    }
}
