//! Light sources

use glam::{Mat4, Vec3};

use super::camera::Camera;

/// Which frame a light's position and focal point are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightKind {
    /// Follows the camera: positioned at the eye, looking at the focal point.
    #[default]
    Headlight,
    /// Position and focal point are in view coordinates.
    CameraLight,
    /// Position and focal point are in world coordinates.
    SceneLight,
}

/// A light source
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
    pub focal_point: Vec3,
    /// Positional (point/spot) instead of directional.
    pub positional: bool,
    /// Constant, linear and quadratic attenuation.
    pub attenuation: Vec3,
    /// Spot exponent.
    pub exponent: f32,
    /// Spot cone angle in degrees.
    pub cone_angle: f32,
    /// Switched-off lights are ignored.
    pub switch: bool,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            kind: LightKind::Headlight,
            color: Vec3::ONE,
            intensity: 1.0,
            position: Vec3::new(0.0, 0.0, 1.0),
            focal_point: Vec3::ZERO,
            positional: false,
            attenuation: Vec3::new(1.0, 0.0, 0.0),
            exponent: 1.0,
            cone_angle: 30.0,
            switch: true,
        }
    }
}

impl Light {
    pub fn headlight() -> Self {
        Self::default()
    }

    pub fn scene_light(position: Vec3, focal_point: Vec3) -> Self {
        Self {
            kind: LightKind::SceneLight,
            position,
            focal_point,
            ..Default::default()
        }
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    pub fn with_positional(mut self, positional: bool) -> Self {
        self.positional = positional;
        self
    }

    pub fn with_switch(mut self, on: bool) -> Self {
        self.switch = on;
        self
    }

    /// Diffuse color scaled by intensity
    pub fn scaled_color(&self) -> Vec3 {
        self.color * self.intensity
    }

    fn to_world(&self, camera: &Camera) -> Mat4 {
        match self.kind {
            LightKind::CameraLight => camera.view_matrix().inverse(),
            LightKind::Headlight | LightKind::SceneLight => Mat4::IDENTITY,
        }
    }

    /// Position in world coordinates
    pub fn world_position(&self, camera: &Camera) -> Vec3 {
        match self.kind {
            LightKind::Headlight => camera.position,
            _ => self.to_world(camera).transform_point3(self.position),
        }
    }

    /// Focal point in world coordinates
    pub fn world_focal_point(&self, camera: &Camera) -> Vec3 {
        match self.kind {
            LightKind::Headlight => camera.target,
            _ => self.to_world(camera).transform_point3(self.focal_point),
        }
    }

    /// Direction the light shines in, in view coordinates
    pub fn direction_vc(&self, camera: &Camera) -> Vec3 {
        let dir = (self.world_focal_point(camera) - self.world_position(camera)).normalize_or_zero();
        camera.view_matrix().transform_vector3(dir).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headlight_points_down_view_axis() {
        let camera = Camera::new(Vec3::new(3.0, 1.0, 4.0), Vec3::new(0.0, 0.5, 0.0));
        let dir = Light::headlight().direction_vc(&camera);
        assert!((dir - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_camera_light_follows_camera() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let light = Light {
            kind: LightKind::CameraLight,
            position: Vec3::ZERO,
            ..Default::default()
        };
        assert!((light.world_position(&camera) - camera.position).length() < 1e-5);
    }

    #[test]
    fn test_scaled_color() {
        let light = Light::headlight().with_intensity(0.5);
        assert_eq!(light.scaled_color(), Vec3::splat(0.5));
    }
}
