//! Mapper and context configuration.

/// How coincident lines/points are pushed in front of surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CoincidentTopology {
    /// No offset.
    #[default]
    Off,
    /// Depth offset with `(factor, units)` applied to filled polygons.
    PolygonOffset { factor: f32, units: f32 },
    /// Constant depth shift. Approximated with a polygon offset of
    /// `(0, shift * 20)`.
    ShiftZBuffer { shift: f32 },
}

impl CoincidentTopology {
    /// The polygon offset `(factor, units)` to apply, if any.
    pub fn polygon_offset(&self) -> Option<(f32, f32)> {
        match *self {
            Self::Off => None,
            Self::PolygonOffset { factor, units } => Some((factor, units)),
            Self::ShiftZBuffer { shift } => Some((0.0, shift * 20.0)),
        }
    }
}

/// Per-mapper configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MapperConfig {
    /// Coincident topology resolution mode
    pub coincident_topology: CoincidentTopology,
    /// Forward selection passes to the renderer's hardware selector
    pub populate_selection_settings: bool,
    /// Maximum number of lights passed to lit shaders
    pub max_lights: usize,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            coincident_topology: CoincidentTopology::Off,
            populate_selection_settings: true,
            max_lights: 6,
        }
    }
}

/// Configuration of the graphics context shared by all mappers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextConfig {
    /// Maximum number of linked programs kept by the shader cache
    pub shader_cache_capacity: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            shader_cache_capacity: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MapperConfig::default();
        assert_eq!(config.coincident_topology, CoincidentTopology::Off);
        assert_eq!(config.max_lights, 6);
        assert_eq!(ContextConfig::default().shader_cache_capacity, 64);
    }

    #[test]
    fn test_polygon_offset() {
        assert_eq!(CoincidentTopology::Off.polygon_offset(), None);
        assert_eq!(
            CoincidentTopology::PolygonOffset {
                factor: 1.0,
                units: 2.0
            }
            .polygon_offset(),
            Some((1.0, 2.0))
        );
        assert_eq!(
            CoincidentTopology::ShiftZBuffer { shift: 0.5 }.polygon_offset(),
            Some((0.0, 10.0))
        );
    }
}
