//! Render-state driven shader variants.

use bitflags::bitflags;

use super::{substitute, template_pair, ShaderMarker, ShaderSource};
use crate::scene::Representation;

/// How elaborate the lighting shader must be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum LightComplexity {
    /// No lighting.
    #[default]
    Unlit,
    /// A single white unit-intensity headlight.
    Headlight,
    /// Several directional lights.
    LightKit,
    /// At least one positional light.
    Positional,
}

/// Which material terms scalar colors replace, as configured on the mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScalarMaterialMode {
    /// Pick ambient or diffuse from the property coefficients.
    #[default]
    Default,
    Ambient,
    Diffuse,
    AmbientAndDiffuse,
}

/// Which material terms the vertex color feeds in the shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexColorMode {
    /// Ambient from the vertex color, diffuse from the uniform.
    AmbientDominant,
    /// Diffuse from the vertex color, ambient from the uniform.
    DiffuseDominant,
    /// Both ambient and diffuse from the vertex color.
    AmbientAndDiffuse,
}

impl ScalarMaterialMode {
    /// Resolve against the property's ambient and diffuse coefficients.
    pub fn resolve(&self, ambient: f32, diffuse: f32) -> VertexColorMode {
        match self {
            Self::Ambient => VertexColorMode::AmbientDominant,
            Self::Diffuse => VertexColorMode::DiffuseDominant,
            Self::AmbientAndDiffuse => VertexColorMode::AmbientAndDiffuse,
            Self::Default if ambient > diffuse => VertexColorMode::AmbientDominant,
            Self::Default => VertexColorMode::DiffuseDominant,
        }
    }
}

/// Per-bucket, per-frame inputs to shader selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RenderState {
    pub light_complexity: LightComplexity,
    pub picking_active: bool,
    pub depth_peeling_active: bool,
    pub has_vertex_colors: bool,
    pub has_normals: bool,
    /// 0 (none), 1 or 2.
    pub texture_components: u8,
}

bitflags! {
    /// Optional blocks injected into the templates.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShaderFeatures: u8 {
        /// Per-vertex color attribute.
        const VERTEX_COLORS = 1 << 0;
        /// Per-vertex normal attribute.
        const NORMALS = 1 << 1;
        /// Screen-space line normals for wireframe without normals.
        const WIREFRAME_NORMALS = 1 << 2;
        /// One-component texture coordinates.
        const TCOORD_1D = 1 << 3;
        /// Two-component texture coordinates.
        const TCOORD_2D = 1 << 4;
        /// Primitive id encoding for hardware picking.
        const PICKING = 1 << 5;
        /// Depth-peeling discard against two depth layers.
        const DEPTH_PEELING = 1 << 6;
    }
}

impl Default for ShaderFeatures {
    fn default() -> Self {
        Self::empty()
    }
}

/// A fully resolved shader variant.
///
/// Two render states that differ only in inputs the generated source does not
/// depend on produce equal variants, so the variant doubles as a cheap
/// fingerprint of the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ShaderVariant {
    pub light_complexity: LightComplexity,
    pub features: ShaderFeatures,
    /// Set iff `features` contains `VERTEX_COLORS`.
    pub color_mode: Option<VertexColorMode>,
}

const COLOR_VS_DEC: &str = "attribute vec4 scalarColor;\nvarying vec4 vertexColor;";
const COLOR_VS_IMPL: &str = "vertexColor = scalarColor;";
const COLOR_FS_DEC: &str = "varying vec4 vertexColor;";
const COLOR_FS_AMBIENT: &str = "vec3 ambientColor = vertexColor.rgb;\n  vec3 diffuseColor = diffuseColorUniform;\n  float opacity = vertexColor.a;";
const COLOR_FS_DIFFUSE: &str = "vec3 diffuseColor = vertexColor.rgb;\n  vec3 ambientColor = ambientColorUniform;\n  float opacity = vertexColor.a;";
const COLOR_FS_BOTH: &str = "vec3 diffuseColor = vertexColor.rgb;\n  vec3 ambientColor = vertexColor.rgb;\n  float opacity = vertexColor.a;";
const COLOR_FS_UNIFORM: &str = "vec3 ambientColor = ambientColorUniform;\n  vec3 diffuseColor = diffuseColorUniform;\n  float opacity = opacityUniform;";

const NORMAL_VS_DEC: &str =
    "attribute vec3 normalMC;\nuniform mat3 normalMatrix;\nvarying vec3 normalVCVarying;";
const NORMAL_VS_IMPL: &str = "normalVCVarying = normalMatrix * normalMC;";
const NORMAL_FS_DEC: &str = "varying vec3 normalVCVarying;";
const NORMAL_FS_IMPL: &str =
    "vec3 normalVC = normalize(gl_FrontFacing ? normalVCVarying : -normalVCVarying);";
// perpendicular to the line, leaning towards the viewer
const NORMAL_FS_WIREFRAME: &str = "vec3 dx = dFdx(vertexVC.xyz);\n  vec3 dy = dFdy(vertexVC.xyz);\n  vec3 lineDir = abs(dot(dx, vec3(1.0))) > abs(dot(dy, vec3(1.0))) ? dx : dy;\n  vec3 normalVC = normalize(cross(cross(lineDir, vec3(0.0, 0.0, 1.0)), lineDir));";
const NORMAL_FS_FACETED: &str =
    "vec3 normalVC = normalize(cross(dFdx(vertexVC.xyz), dFdy(vertexVC.xyz)));";

const TCOORD1_VS_DEC: &str = "attribute float tcoordMC;\nvarying float tcoordVC;";
const TCOORD2_VS_DEC: &str = "attribute vec2 tcoordMC;\nvarying vec2 tcoordVC;";
const TCOORD_VS_IMPL: &str = "tcoordVC = tcoordMC;";
const TCOORD1_FS_DEC: &str = "varying float tcoordVC;\nuniform sampler2D texture1;";
const TCOORD2_FS_DEC: &str = "varying vec2 tcoordVC;\nuniform sampler2D texture1;";
const TCOORD1_FS_IMPL: &str = "gl_FragColor = gl_FragColor * texture2D(texture1, vec2(tcoordVC, 0.0));";
const TCOORD2_FS_IMPL: &str = "gl_FragColor = gl_FragColor * texture2D(texture1, tcoordVC.st);";

// gl_PrimitiveID needs the extension in GLSL 1.20; the marker sits right
// after the version line so the directive precedes every declaration.
const PICKING_FS_DEC: &str = "#extension GL_EXT_gpu_shader4 : enable\nuniform vec3 mapperIndex;";
const PICKING_FS_IMPL: &str = "if (mapperIndex == vec3(0.0))\n  {\n    int idx = gl_PrimitiveID + 1;\n    gl_FragColor = vec4(float(idx % 256) / 255.0, float((idx / 256) % 256) / 255.0, float(idx / 65536) / 255.0, 1.0);\n  }\n  else\n  {\n    gl_FragColor = vec4(mapperIndex, 1.0);\n  }";

const DEPTH_PEELING_FS_DEC: &str =
    "uniform sampler2DRect opaqueZTexture;\nuniform sampler2DRect translucentZTexture;";
const DEPTH_PEELING_FS_IMPL: &str = "float odepth = texture2DRect(opaqueZTexture, gl_FragCoord.xy).r;\n  if (gl_FragCoord.z >= odepth) { discard; }\n  float tdepth = texture2DRect(translucentZTexture, gl_FragCoord.xy).r;\n  if (gl_FragCoord.z <= tdepth) { discard; }";

impl ShaderVariant {
    /// Resolve the variant for a render state.
    ///
    /// `color_mode` is only kept when the state has vertex colors;
    /// `representation` only matters when the state has no normals.
    pub fn from_state(
        state: &RenderState,
        representation: Representation,
        color_mode: VertexColorMode,
    ) -> Self {
        let mut features = ShaderFeatures::empty();
        features.set(ShaderFeatures::VERTEX_COLORS, state.has_vertex_colors);
        features.set(ShaderFeatures::NORMALS, state.has_normals);
        features.set(
            ShaderFeatures::WIREFRAME_NORMALS,
            !state.has_normals && representation == Representation::Wireframe,
        );
        features.set(ShaderFeatures::TCOORD_1D, state.texture_components == 1);
        features.set(ShaderFeatures::TCOORD_2D, state.texture_components >= 2);
        features.set(ShaderFeatures::PICKING, state.picking_active);
        features.set(ShaderFeatures::DEPTH_PEELING, state.depth_peeling_active);

        Self {
            light_complexity: state.light_complexity,
            features,
            color_mode: state.has_vertex_colors.then_some(color_mode),
        }
    }

    /// Texture-coordinate components the program reads.
    pub fn tcoord_components(&self) -> usize {
        if self.features.contains(ShaderFeatures::TCOORD_2D) {
            2
        } else if self.features.contains(ShaderFeatures::TCOORD_1D) {
            1
        } else {
            0
        }
    }

    /// Generate the vertex and fragment source.
    pub fn build(&self) -> ShaderSource {
        let (vs_template, fs_template) = template_pair(self.light_complexity);
        let f = self.features;

        let color_fs_impl = match self.color_mode {
            Some(VertexColorMode::AmbientDominant) => COLOR_FS_AMBIENT,
            Some(VertexColorMode::DiffuseDominant) => COLOR_FS_DIFFUSE,
            Some(VertexColorMode::AmbientAndDiffuse) => COLOR_FS_BOTH,
            None => COLOR_FS_UNIFORM,
        };
        let with_colors = f.contains(ShaderFeatures::VERTEX_COLORS);
        let with_normals = f.contains(ShaderFeatures::NORMALS);
        let normal_fs_impl = if with_normals {
            NORMAL_FS_IMPL
        } else if f.contains(ShaderFeatures::WIREFRAME_NORMALS) {
            NORMAL_FS_WIREFRAME
        } else {
            NORMAL_FS_FACETED
        };
        let (tcoord_vs_dec, tcoord_fs_dec, tcoord_fs_impl) = match self.tcoord_components() {
            1 => (TCOORD1_VS_DEC, TCOORD1_FS_DEC, TCOORD1_FS_IMPL),
            2 => (TCOORD2_VS_DEC, TCOORD2_FS_DEC, TCOORD2_FS_IMPL),
            _ => ("", "", ""),
        };
        let with_tcoords = self.tcoord_components() > 0;
        let picking = f.contains(ShaderFeatures::PICKING);
        let peeling = f.contains(ShaderFeatures::DEPTH_PEELING);

        let pick = |on: bool, snippet: &'static str| if on { snippet } else { "" };

        let vertex_snippets = |marker: ShaderMarker| -> &'static str {
            match marker {
                ShaderMarker::ColorDec => pick(with_colors, COLOR_VS_DEC),
                ShaderMarker::ColorImpl => pick(with_colors, COLOR_VS_IMPL),
                ShaderMarker::NormalDec => pick(with_normals, NORMAL_VS_DEC),
                ShaderMarker::NormalImpl => pick(with_normals, NORMAL_VS_IMPL),
                ShaderMarker::TCoordDec => tcoord_vs_dec,
                ShaderMarker::TCoordImpl => pick(with_tcoords, TCOORD_VS_IMPL),
                _ => "",
            }
        };
        let fragment_snippets = |marker: ShaderMarker| -> &'static str {
            match marker {
                ShaderMarker::ColorDec => pick(with_colors, COLOR_FS_DEC),
                ShaderMarker::ColorImpl => color_fs_impl,
                ShaderMarker::NormalDec => pick(with_normals, NORMAL_FS_DEC),
                ShaderMarker::NormalImpl => normal_fs_impl,
                ShaderMarker::TCoordDec => tcoord_fs_dec,
                ShaderMarker::TCoordImpl => tcoord_fs_impl,
                ShaderMarker::PickingDec => pick(picking, PICKING_FS_DEC),
                ShaderMarker::PickingImpl => pick(picking, PICKING_FS_IMPL),
                ShaderMarker::DepthPeelingDec => pick(peeling, DEPTH_PEELING_FS_DEC),
                ShaderMarker::DepthPeelingImpl => pick(peeling, DEPTH_PEELING_FS_IMPL),
            }
        };

        let vertex = ShaderMarker::ALL
            .iter()
            .fold(vs_template.to_string(), |src, &m| {
                substitute(&src, m, vertex_snippets(m))
            });
        let fragment = ShaderMarker::ALL
            .iter()
            .fold(fs_template.to_string(), |src, &m| {
                substitute(&src, m, fragment_snippets(m))
            });

        ShaderSource { vertex, fragment }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::has_markers;

    fn state() -> RenderState {
        RenderState::default()
    }

    #[test]
    fn test_material_mode_resolution() {
        assert_eq!(
            ScalarMaterialMode::Default.resolve(0.6, 0.4),
            VertexColorMode::AmbientDominant
        );
        assert_eq!(
            ScalarMaterialMode::Default.resolve(0.4, 0.4),
            VertexColorMode::DiffuseDominant
        );
        assert_eq!(
            ScalarMaterialMode::AmbientAndDiffuse.resolve(0.0, 1.0),
            VertexColorMode::AmbientAndDiffuse
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let mut s = state();
        s.light_complexity = LightComplexity::LightKit;
        s.has_vertex_colors = true;
        s.picking_active = true;
        let variant =
            ShaderVariant::from_state(&s, Representation::Surface, VertexColorMode::DiffuseDominant);
        assert_eq!(variant.build(), variant.build());
    }

    #[test]
    fn test_no_markers_survive() {
        for bits in 0..=ShaderFeatures::all().bits() {
            let features = ShaderFeatures::from_bits_truncate(bits);
            let variant = ShaderVariant {
                light_complexity: LightComplexity::Positional,
                features,
                color_mode: features
                    .contains(ShaderFeatures::VERTEX_COLORS)
                    .then_some(VertexColorMode::AmbientAndDiffuse),
            };
            let source = variant.build();
            assert!(!has_markers(&source.vertex));
            assert!(!has_markers(&source.fragment));
        }
    }

    #[test]
    fn test_unlit_plain_source() {
        let variant =
            ShaderVariant::from_state(&state(), Representation::Surface, VertexColorMode::DiffuseDominant);
        let source = variant.build();
        assert!(source.fragment.contains("float opacity = opacityUniform;"));
        assert!(!source.vertex.contains("scalarColor"));
        assert!(!source.fragment.contains("mapperIndex"));
        assert!(!source.fragment.contains("lightColor"));
        assert!(source.fragment.contains("cross(dFdx(vertexVC.xyz), dFdy(vertexVC.xyz))"));
    }

    #[test]
    fn test_color_modes() {
        let mut s = state();
        s.has_vertex_colors = true;
        let ambient =
            ShaderVariant::from_state(&s, Representation::Surface, VertexColorMode::AmbientDominant)
                .build();
        assert!(ambient.vertex.contains("attribute vec4 scalarColor;"));
        assert!(ambient.fragment.contains("vec3 ambientColor = vertexColor.rgb;"));
        assert!(ambient.fragment.contains("vec3 diffuseColor = diffuseColorUniform;"));

        let diffuse =
            ShaderVariant::from_state(&s, Representation::Surface, VertexColorMode::DiffuseDominant)
                .build();
        assert!(diffuse.fragment.contains("vec3 diffuseColor = vertexColor.rgb;"));
        assert!(diffuse.fragment.contains("vec3 ambientColor = ambientColorUniform;"));
    }

    #[test]
    fn test_color_mode_ignored_without_colors() {
        let a = ShaderVariant::from_state(&state(), Representation::Surface, VertexColorMode::AmbientDominant);
        let b = ShaderVariant::from_state(&state(), Representation::Surface, VertexColorMode::DiffuseDominant);
        assert_eq!(a, b);
    }

    #[test]
    fn test_normals() {
        let mut s = state();
        s.light_complexity = LightComplexity::Headlight;
        s.has_normals = true;
        let source = ShaderVariant::from_state(&s, Representation::Wireframe, VertexColorMode::DiffuseDominant).build();
        assert!(source.vertex.contains("normalVCVarying = normalMatrix * normalMC;"));
        assert!(source.fragment.contains("gl_FrontFacing"));

        s.has_normals = false;
        let wire = ShaderVariant::from_state(&s, Representation::Wireframe, VertexColorMode::DiffuseDominant);
        assert!(wire.features.contains(ShaderFeatures::WIREFRAME_NORMALS));
        assert!(wire.build().fragment.contains("lineDir"));
    }

    #[test]
    fn test_tcoords() {
        let mut s = state();
        s.texture_components = 1;
        let one = ShaderVariant::from_state(&s, Representation::Surface, VertexColorMode::DiffuseDominant).build();
        assert!(one.vertex.contains("attribute float tcoordMC;"));
        assert!(one.fragment.contains("vec2(tcoordVC, 0.0)"));

        s.texture_components = 2;
        let two = ShaderVariant::from_state(&s, Representation::Surface, VertexColorMode::DiffuseDominant).build();
        assert!(two.vertex.contains("attribute vec2 tcoordMC;"));
        assert!(two.fragment.contains("tcoordVC.st"));
    }

    #[test]
    fn test_picking_and_depth_peeling() {
        let mut s = state();
        s.picking_active = true;
        s.depth_peeling_active = true;
        let source = ShaderVariant::from_state(&s, Representation::Surface, VertexColorMode::DiffuseDominant).build();
        assert!(source.fragment.contains("uniform vec3 mapperIndex;"));
        assert!(source.fragment.contains("gl_PrimitiveID + 1"));
        assert!(source
            .fragment
            .starts_with("#version 120\n#extension GL_EXT_gpu_shader4 : enable\n"));
        assert!(source.fragment.contains("uniform sampler2DRect opaqueZTexture;"));
        assert!(source.fragment.contains("discard"));
    }

    #[test]
    fn test_template_selection() {
        let mut s = state();
        for (complexity, needle) in [
            (LightComplexity::Headlight, "normalVC.z"),
            (LightComplexity::LightKit, "lightDirectionVC"),
            (LightComplexity::Positional, "lightPositionWC"),
        ] {
            s.light_complexity = complexity;
            let source = ShaderVariant::from_state(&s, Representation::Surface, VertexColorMode::DiffuseDominant).build();
            assert!(source.fragment.contains(needle));
        }
    }
}
