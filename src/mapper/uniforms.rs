//! Uniform upload for property, camera, lighting and picking state.

use glam::{Mat3, Mat4, Vec3};

use crate::backend::{GpuBackend, ProgramHandle, UniformValue};
use crate::scene::{Camera, Light, Property, RenderView};
use crate::selection::{encode_pick_id, SelectionPass};
use crate::shader::LightComplexity;

/// Size of the light arrays in the lit templates.
pub const MAX_LIGHTS: usize = 6;

/// Inverse-transpose of the upper 3x3 of a model-view matrix.
pub fn normal_matrix(model_view: Mat4) -> Mat3 {
    Mat3::from_mat4(model_view).inverse().transpose()
}

/// Color written to `mapperIndex`.
///
/// The low-24 id pass uses the zero sentinel so the shader encodes primitive
/// ids; other selector passes use the prop color; plain picking encodes the
/// renderer's current pick id.
pub fn picking_color(view: &dyn RenderView) -> Vec3 {
    match view.selector() {
        Some(selector) if selector.current_pass() == SelectionPass::IdLow24 => Vec3::ZERO,
        Some(selector) => selector.prop_color(),
        None => encode_pick_id(view.current_pick_id()),
    }
}

/// Opacity and material colors. Specular terms are only sent to lit programs.
pub fn set_property_uniforms<B: GpuBackend + ?Sized>(
    backend: &mut B,
    program: ProgramHandle,
    property: &Property,
    model_color: Option<[u8; 4]>,
    complexity: LightComplexity,
) {
    let mut opacity = property.opacity();
    let ambient = property.ambient_color() * property.ambient();
    let mut diffuse = property.diffuse_color() * property.diffuse();
    if let Some(rgba) = model_color {
        diffuse = Vec3::new(rgba[0] as f32, rgba[1] as f32, rgba[2] as f32) / 255.0;
        opacity = rgba[3] as f32 / 255.0;
    }

    backend.set_uniform(program, "opacityUniform", &UniformValue::Float(opacity));
    backend.set_uniform(program, "ambientColorUniform", &UniformValue::Vec3(ambient));
    backend.set_uniform(program, "diffuseColorUniform", &UniformValue::Vec3(diffuse));
    if complexity == LightComplexity::Unlit {
        return;
    }
    let specular = property.specular_color() * property.specular();
    backend.set_uniform(program, "specularColor", &UniformValue::Vec3(specular));
    backend.set_uniform(
        program,
        "specularPower",
        &UniformValue::Float(property.specular_power()),
    );
}

/// Model-view, projection and normal matrices.
///
/// `model_to_world` already includes any extra model transform.
#[allow(clippy::too_many_arguments)]
pub fn set_camera_uniforms<B: GpuBackend + ?Sized>(
    backend: &mut B,
    program: ProgramHandle,
    camera: &Camera,
    aspect_ratio: f32,
    model_to_world: Mat4,
    complexity: LightComplexity,
    has_normals: bool,
) {
    let view = camera.view_matrix();
    if complexity == LightComplexity::Positional {
        backend.set_uniform(program, "WCVCMatrix", &UniformValue::Mat4(view));
    }

    let model_view = view * model_to_world;
    backend.set_uniform(program, "MCVCMatrix", &UniformValue::Mat4(model_view));
    if complexity > LightComplexity::Unlit || has_normals {
        backend.set_uniform(
            program,
            "normalMatrix",
            &UniformValue::Mat3(normal_matrix(model_view)),
        );
    }
    backend.set_uniform(
        program,
        "VCDCMatrix",
        &UniformValue::Mat4(camera.projection_matrix(aspect_ratio)),
    );
}

/// Light arrays for light-kit and positional programs.
pub fn set_lighting_uniforms<B: GpuBackend + ?Sized>(
    backend: &mut B,
    program: ProgramHandle,
    lights: &[Light],
    camera: &Camera,
    complexity: LightComplexity,
    max_lights: usize,
) {
    if complexity < LightComplexity::LightKit {
        return;
    }

    let limit = max_lights.min(MAX_LIGHTS);
    let active: Vec<&Light> = lights.iter().filter(|l| l.switch).collect();
    if active.len() > limit {
        log::warn!(
            "PolyDataMapper: {} lights are on, only the first {} are used",
            active.len(),
            limit
        );
    }
    let active = &active[..active.len().min(limit)];

    let colors = active.iter().map(|l| l.scaled_color()).collect();
    let directions = active.iter().map(|l| l.direction_vc(camera)).collect();
    backend.set_uniform(program, "lightColor", &UniformValue::Vec3Array(colors));
    backend.set_uniform(
        program,
        "lightDirectionVC",
        &UniformValue::Vec3Array(directions),
    );
    backend.set_uniform(
        program,
        "numberOfLights",
        &UniformValue::Int(active.len() as i32),
    );

    if complexity < LightComplexity::Positional {
        return;
    }

    let attenuation = active.iter().map(|l| l.attenuation).collect();
    let positional = active.iter().map(|l| l.positional as i32).collect();
    let positions = active.iter().map(|l| l.world_position(camera)).collect();
    let exponents = active.iter().map(|l| l.exponent).collect();
    let cone_angles = active.iter().map(|l| l.cone_angle).collect();
    backend.set_uniform(
        program,
        "lightAttenuation",
        &UniformValue::Vec3Array(attenuation),
    );
    backend.set_uniform(program, "lightPositional", &UniformValue::IntArray(positional));
    backend.set_uniform(program, "lightPositionWC", &UniformValue::Vec3Array(positions));
    backend.set_uniform(program, "lightExponent", &UniformValue::FloatArray(exponents));
    backend.set_uniform(program, "lightConeAngle", &UniformValue::FloatArray(cone_angles));
}
