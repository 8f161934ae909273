//! Lighting need and light complexity.

use super::bucket::PrimitiveKind;
use crate::scene::{Interpolation, Light, LightKind, Property, Representation};
use crate::shader::LightComplexity;

/// Whether primitives of `kind` are shaded with lights.
///
/// Point representation is lit only for smooth interpolation with normals.
/// Otherwise triangles and strips are always lit, while points and lines
/// follow the same smooth-with-normals rule.
pub fn needs_lighting(kind: PrimitiveKind, property: &Property, has_normals: bool) -> bool {
    let smooth_with_normals = property.interpolation() != Interpolation::Flat && has_normals;
    match property.representation() {
        Representation::Points => smooth_with_normals,
        Representation::Wireframe | Representation::Surface => {
            kind.is_surface() || smooth_with_normals
        }
    }
}

/// Complexity tier for a lit primitive under the given lights.
///
/// Only switched-on lights count towards the number of lights, but the kind,
/// intensity and positional checks apply to every light in the list.
pub fn light_complexity(lights: &[Light]) -> LightComplexity {
    let mut complexity = LightComplexity::Headlight;
    let mut active = 0;
    for light in lights {
        if light.switch {
            active += 1;
        }
        if complexity == LightComplexity::Headlight
            && (active > 1 || light.intensity != 1.0 || light.kind != LightKind::Headlight)
        {
            complexity = LightComplexity::LightKit;
        }
        if light.positional {
            return LightComplexity::Positional;
        }
    }
    complexity
}

/// Complexity for one bucket, or `Unlit` when lighting does not apply.
pub fn bucket_light_complexity(
    kind: PrimitiveKind,
    property: &Property,
    has_normals: bool,
    lights: &[Light],
) -> LightComplexity {
    if property.lighting() && needs_lighting(kind, property, has_normals) {
        light_complexity(lights)
    } else {
        LightComplexity::Unlit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use rstest::rstest;

    fn property(representation: Representation, interpolation: Interpolation) -> Property {
        let mut property = Property::new();
        property.set_representation(representation);
        property.set_interpolation(interpolation);
        property
    }

    #[rstest]
    #[case::points_rep_flat(Representation::Points, Interpolation::Flat, PrimitiveKind::Triangles, true, false)]
    #[case::points_rep_smooth(Representation::Points, Interpolation::Gouraud, PrimitiveKind::Triangles, true, true)]
    #[case::points_rep_no_normals(Representation::Points, Interpolation::Gouraud, PrimitiveKind::Triangles, false, false)]
    #[case::surface_tris_flat(Representation::Surface, Interpolation::Flat, PrimitiveKind::Triangles, false, true)]
    #[case::surface_strips_flat(Representation::Surface, Interpolation::Flat, PrimitiveKind::Strips, false, true)]
    #[case::surface_lines_flat(Representation::Surface, Interpolation::Flat, PrimitiveKind::Lines, true, false)]
    #[case::wire_lines_smooth(Representation::Wireframe, Interpolation::Phong, PrimitiveKind::Lines, true, true)]
    #[case::wire_points_no_normals(Representation::Wireframe, Interpolation::Gouraud, PrimitiveKind::Points, false, false)]
    fn test_needs_lighting(
        #[case] representation: Representation,
        #[case] interpolation: Interpolation,
        #[case] kind: PrimitiveKind,
        #[case] has_normals: bool,
        #[case] expected: bool,
    ) {
        let property = property(representation, interpolation);
        assert_eq!(needs_lighting(kind, &property, has_normals), expected);
    }

    #[test]
    fn test_single_headlight() {
        assert_eq!(light_complexity(&[Light::headlight()]), LightComplexity::Headlight);
        assert_eq!(light_complexity(&[]), LightComplexity::Headlight);
    }

    #[test]
    fn test_light_kit() {
        let two = [Light::headlight(), Light::headlight()];
        assert_eq!(light_complexity(&two), LightComplexity::LightKit);
        let dim = [Light::headlight().with_intensity(0.5)];
        assert_eq!(light_complexity(&dim), LightComplexity::LightKit);
        let scene = [Light::scene_light(Vec3::ONE, Vec3::ZERO)];
        assert_eq!(light_complexity(&scene), LightComplexity::LightKit);
    }

    #[test]
    fn test_positional() {
        let lights = [Light::headlight().with_positional(true)];
        assert_eq!(light_complexity(&lights), LightComplexity::Positional);
        let lights = [Light::headlight(), Light::scene_light(Vec3::ONE, Vec3::ZERO).with_positional(true)];
        assert_eq!(light_complexity(&lights), LightComplexity::Positional);
    }

    #[test]
    fn test_switched_off_lights_do_not_count() {
        let lights = [Light::headlight(), Light::headlight().with_switch(false)];
        assert_eq!(light_complexity(&lights), LightComplexity::Headlight);
    }

    #[test]
    fn test_switched_off_lights_still_raise_complexity() {
        let lights = [
            Light::headlight(),
            Light::headlight().with_positional(true).with_switch(false),
        ];
        assert_eq!(light_complexity(&lights), LightComplexity::Positional);
        let lights = [Light::scene_light(Vec3::ONE, Vec3::ZERO).with_switch(false)];
        assert_eq!(light_complexity(&lights), LightComplexity::LightKit);
    }

    #[test]
    fn test_lighting_off() {
        let mut property = Property::new();
        property.set_lighting(false);
        assert_eq!(
            bucket_light_complexity(PrimitiveKind::Triangles, &property, true, &[Light::headlight()]),
            LightComplexity::Unlit
        );
    }
}
