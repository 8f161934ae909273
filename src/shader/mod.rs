//! Shader variant assembly and program caching.
//!
//! Shader source is produced from one of four template pairs, chosen by
//! [`LightComplexity`], by replacing every [`ShaderMarker`] in the template
//! with a feature snippet or with nothing. Assembly is a pure function of the
//! [`ShaderVariant`], so equal variants always give byte-identical source and
//! the [`ShaderCache`] can key programs by source text.
//!
//! # Markers
//!
//! Each injection point appears once per stage as a line comment:
//!
//! ```glsl
//! //@Color::Dec
//! //@Color::Impl
//! ```

mod cache;
mod variant;

pub use cache::ShaderCache;
pub use variant::{
    LightComplexity, RenderState, ScalarMaterialMode, ShaderFeatures, ShaderVariant,
    VertexColorMode,
};

const VS_UNLIT: &str = include_str!("../../shaders/polydata/vs_unlit.glsl");
const VS_LIT: &str = include_str!("../../shaders/polydata/vs_lit.glsl");
const FS_UNLIT: &str = include_str!("../../shaders/polydata/fs_unlit.glsl");
const FS_HEADLIGHT: &str = include_str!("../../shaders/polydata/fs_headlight.glsl");
const FS_LIGHTKIT: &str = include_str!("../../shaders/polydata/fs_lightkit.glsl");
const FS_POSITIONAL: &str = include_str!("../../shaders/polydata/fs_positional.glsl");

/// Linked program source: one vertex and one fragment stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

/// A named injection point in the shader templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderMarker {
    ColorDec,
    ColorImpl,
    NormalDec,
    NormalImpl,
    TCoordDec,
    TCoordImpl,
    PickingDec,
    PickingImpl,
    DepthPeelingDec,
    DepthPeelingImpl,
}

impl ShaderMarker {
    /// Every marker, in substitution order.
    pub const ALL: [ShaderMarker; 10] = [
        Self::ColorDec,
        Self::ColorImpl,
        Self::NormalDec,
        Self::NormalImpl,
        Self::TCoordDec,
        Self::TCoordImpl,
        Self::PickingDec,
        Self::PickingImpl,
        Self::DepthPeelingDec,
        Self::DepthPeelingImpl,
    ];

    /// Text of the marker as it appears in templates.
    pub fn token(&self) -> &'static str {
        match self {
            Self::ColorDec => "//@Color::Dec",
            Self::ColorImpl => "//@Color::Impl",
            Self::NormalDec => "//@Normal::Dec",
            Self::NormalImpl => "//@Normal::Impl",
            Self::TCoordDec => "//@TCoord::Dec",
            Self::TCoordImpl => "//@TCoord::Impl",
            Self::PickingDec => "//@Picking::Dec",
            Self::PickingImpl => "//@Picking::Impl",
            Self::DepthPeelingDec => "//@DepthPeeling::Dec",
            Self::DepthPeelingImpl => "//@DepthPeeling::Impl",
        }
    }
}

/// Replace every occurrence of `marker` in `source` with `snippet`.
pub fn substitute(source: &str, marker: ShaderMarker, snippet: &str) -> String {
    source.replace(marker.token(), snippet)
}

/// Returns `true` if any marker text is left in `source`.
pub fn has_markers(source: &str) -> bool {
    ShaderMarker::ALL.iter().any(|m| source.contains(m.token()))
}

/// The untouched template pair for a light complexity.
pub fn template_pair(complexity: LightComplexity) -> (&'static str, &'static str) {
    match complexity {
        LightComplexity::Unlit => (VS_UNLIT, FS_UNLIT),
        LightComplexity::Headlight => (VS_LIT, FS_HEADLIGHT),
        LightComplexity::LightKit => (VS_LIT, FS_LIGHTKIT),
        LightComplexity::Positional => (VS_LIT, FS_POSITIONAL),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_share_markers() {
        for complexity in [
            LightComplexity::Unlit,
            LightComplexity::Headlight,
            LightComplexity::LightKit,
            LightComplexity::Positional,
        ] {
            let (vs, fs) = template_pair(complexity);
            for marker in ShaderMarker::ALL {
                assert!(fs.contains(marker.token()), "{:?} missing {:?}", complexity, marker);
            }
            for marker in [
                ShaderMarker::ColorDec,
                ShaderMarker::NormalDec,
                ShaderMarker::TCoordImpl,
            ] {
                assert!(vs.contains(marker.token()));
            }
        }
    }

    #[test]
    fn test_substitute() {
        let out = substitute("a\n//@Color::Dec\nb", ShaderMarker::ColorDec, "uniform x;");
        assert_eq!(out, "a\nuniform x;\nb");
        assert!(!has_markers(&out));
        assert!(has_markers("//@Picking::Impl"));
    }
}
