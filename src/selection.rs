//! Hardware picking support.
//!
//! Picking renders every primitive in a flat color that encodes an id, then
//! reads pixels back. Ids are packed little end first into the red, green and
//! blue channels, 24 bits in total.

use glam::Vec3;

/// The pass a hardware selector is currently rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectionPass {
    /// Each prop is drawn in its own color.
    #[default]
    ActorPass,
    /// Composite-dataset block indices.
    CompositeIndexPass,
    /// Low 24 bits of the primitive id.
    IdLow24,
    /// Middle 24 bits of the primitive id.
    IdMid24,
    /// High 16 bits of the primitive id.
    IdHigh16,
}

impl SelectionPass {
    /// Returns `true` for the three primitive-id passes.
    pub fn is_id_pass(&self) -> bool {
        matches!(self, Self::IdLow24 | Self::IdMid24 | Self::IdHigh16)
    }
}

/// Capability of a renderer that performs hardware selection.
pub trait Selection {
    /// Pass being rendered.
    fn current_pass(&self) -> SelectionPass;

    /// Called before a prop draws anything.
    fn begin_render_prop(&mut self);

    /// Called after a prop finished drawing.
    fn end_render_prop(&mut self);

    /// Record the composite index drawn next.
    fn render_composite_index(&mut self, index: u32);

    /// Record the attribute id drawn next.
    fn render_attribute_id(&mut self, id: u32);

    /// Color identifying the current prop.
    fn prop_color(&self) -> Vec3;
}

/// Encode an id into a normalized RGB color.
pub fn encode_pick_id(id: u32) -> Vec3 {
    Vec3::new(
        (id & 0xff) as f32 / 255.0,
        ((id >> 8) & 0xff) as f32 / 255.0,
        ((id >> 16) & 0xff) as f32 / 255.0,
    )
}

/// Decode an id from a read-back RGB pixel.
pub fn decode_pick_color(rgb: [u8; 3]) -> u32 {
    rgb[0] as u32 | (rgb[1] as u32) << 8 | (rgb[2] as u32) << 16
}

/// Bookkeeping selector that records the hooks it receives.
#[derive(Debug, Clone, Default)]
pub struct HardwareSelector {
    pass: SelectionPass,
    prop_id: u32,
    rendering_prop: bool,
    props_rendered: u32,
    composite_indices: Vec<u32>,
    attribute_ids: Vec<u32>,
}

impl HardwareSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_current_pass(&mut self, pass: SelectionPass) {
        self.pass = pass;
    }

    /// Id of the prop drawn next; its color is `encode_pick_id(id + 1)`.
    pub fn set_prop_id(&mut self, id: u32) {
        self.prop_id = id;
    }

    /// Whether a prop is between begin and end hooks.
    pub fn is_rendering_prop(&self) -> bool {
        self.rendering_prop
    }

    /// Number of completed begin/end pairs.
    pub fn props_rendered(&self) -> u32 {
        self.props_rendered
    }

    pub fn composite_indices(&self) -> &[u32] {
        &self.composite_indices
    }

    pub fn attribute_ids(&self) -> &[u32] {
        &self.attribute_ids
    }
}

impl Selection for HardwareSelector {
    fn current_pass(&self) -> SelectionPass {
        self.pass
    }

    fn begin_render_prop(&mut self) {
        self.rendering_prop = true;
    }

    fn end_render_prop(&mut self) {
        if self.rendering_prop {
            self.rendering_prop = false;
            self.props_rendered += 1;
        }
    }

    fn render_composite_index(&mut self, index: u32) {
        self.composite_indices.push(index);
    }

    fn render_attribute_id(&mut self, id: u32) {
        self.attribute_ids.push(id);
    }

    fn prop_color(&self) -> Vec3 {
        encode_pick_id(self.prop_id + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_pick_id() {
        assert_eq!(encode_pick_id(0), Vec3::ZERO);
        assert_eq!(encode_pick_id(1), Vec3::new(1.0 / 255.0, 0.0, 0.0));
        assert_eq!(encode_pick_id(0x0001_0200), Vec3::new(0.0, 2.0 / 255.0, 1.0 / 255.0));
    }

    #[test]
    fn test_decode_inverts_encode() {
        for id in [1u32, 255, 256, 65_535, 0x00ab_cdef] {
            let c = encode_pick_id(id) * 255.0;
            let rgb = [c.x.round() as u8, c.y.round() as u8, c.z.round() as u8];
            assert_eq!(decode_pick_color(rgb), id);
        }
    }

    #[test]
    fn test_selector_hooks() {
        let mut selector = HardwareSelector::new();
        selector.begin_render_prop();
        assert!(selector.is_rendering_prop());
        selector.render_attribute_id(0);
        selector.end_render_prop();
        assert_eq!(selector.props_rendered(), 1);
        assert_eq!(selector.attribute_ids(), &[0]);
        assert!(SelectionPass::IdMid24.is_id_pass());
        assert!(!SelectionPass::CompositeIndexPass.is_id_pass());
    }

    #[test]
    fn test_prop_color_is_never_zero() {
        let selector = HardwareSelector::new();
        assert_ne!(selector.prop_color(), Vec3::ZERO);
    }
}
