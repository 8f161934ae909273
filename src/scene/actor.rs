//! A placed, styled instance of a mesh.

use glam::Mat4;

use super::property::Property;
use crate::backend::TextureHandle;
use crate::time_stamp::TimeStamp;

/// Transform, appearance and optional texture for one drawn mesh.
#[derive(Debug, Clone)]
pub struct Actor {
    property: Property,
    matrix: Mat4,
    texture: Option<TextureHandle>,
    mtime: TimeStamp,
}

impl Default for Actor {
    fn default() -> Self {
        Self {
            property: Property::default(),
            matrix: Mat4::IDENTITY,
            texture: None,
            mtime: TimeStamp::now(),
        }
    }
}

impl Actor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.property = property;
        self.mtime.modified();
        self
    }

    pub fn property(&self) -> &Property {
        &self.property
    }

    /// Mutable property access. Property setters track their own changes.
    pub fn property_mut(&mut self) -> &mut Property {
        &mut self.property
    }

    /// Model to world matrix.
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    pub fn set_matrix(&mut self, matrix: Mat4) {
        if self.matrix != matrix {
            self.matrix = matrix;
            self.mtime.modified();
        }
    }

    pub fn is_identity(&self) -> bool {
        self.matrix == Mat4::IDENTITY
    }

    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    pub fn set_texture(&mut self, texture: Option<TextureHandle>) {
        if self.texture != texture {
            self.texture = texture;
            self.mtime.modified();
        }
    }

    /// The texture to sample: the actor's own, else the property's first.
    pub fn active_texture(&self) -> Option<TextureHandle> {
        self.texture
            .or_else(|| self.property.textures().first().copied())
    }

    /// Latest modification time of the actor or its property.
    pub fn mtime(&self) -> TimeStamp {
        self.mtime.max(self.property.mtime())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mtime_includes_property() {
        let mut actor = Actor::new();
        let before = actor.mtime();
        actor.property_mut().set_line_width(3.0);
        assert!(actor.mtime() > before);
    }

    #[test]
    fn test_active_texture_prefers_actor() {
        let mut actor = Actor::new();
        assert_eq!(actor.active_texture(), None);
        actor.property_mut().add_texture(TextureHandle::from_raw(1));
        assert_eq!(actor.active_texture(), Some(TextureHandle::from_raw(1)));
        actor.set_texture(Some(TextureHandle::from_raw(2)));
        assert_eq!(actor.active_texture(), Some(TextureHandle::from_raw(2)));
    }
}
