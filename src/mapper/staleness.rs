//! Staleness decisions for buffers, programs and attribute bindings.
//!
//! Everything is decided by comparing modification stamps: a cached product
//! is stale when any of its inputs was modified after it was built.

use super::bucket::DrawBucket;
use crate::shader::LightComplexity;
use crate::time_stamp::TimeStamp;

/// Modification times the decisions depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StalenessInputs {
    pub mapper: TimeStamp,
    pub actor: TimeStamp,
    pub input: TimeStamp,
    /// When the shared vertex buffer was last rebuilt.
    pub vbo_update: TimeStamp,
}

/// Last seen lighting, selection and depth-peeling state, each with the time
/// it last changed.
#[derive(Debug, Clone, Default)]
pub struct RenderStateTracker {
    light_complexity: Option<LightComplexity>,
    light_complexity_changed: TimeStamp,
    selection: Option<bool>,
    selection_changed: TimeStamp,
    depth_peeling: Option<bool>,
    depth_peeling_changed: TimeStamp,
}

fn track<T: PartialEq + Copy>(last: &mut Option<T>, changed: &mut TimeStamp, value: T) {
    if *last != Some(value) {
        *last = Some(value);
        changed.modified();
    }
}

impl RenderStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current state, bumping the stamp of whatever changed.
    pub fn observe(&mut self, light_complexity: LightComplexity, selection: bool, depth_peeling: bool) {
        track(
            &mut self.light_complexity,
            &mut self.light_complexity_changed,
            light_complexity,
        );
        track(&mut self.selection, &mut self.selection_changed, selection);
        track(
            &mut self.depth_peeling,
            &mut self.depth_peeling_changed,
            depth_peeling,
        );
    }

    /// Latest of the three change stamps.
    pub fn latest_change(&self) -> TimeStamp {
        TimeStamp::latest([
            self.light_complexity_changed,
            self.selection_changed,
            self.depth_peeling_changed,
        ])
    }
}

/// Which cached products must be refreshed for one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Staleness {
    /// Vertex and index buffers must be rebuilt.
    pub buffers: bool,
    /// The bucket's program must be re-resolved.
    pub shader: bool,
    /// The bucket's attribute pointers must be re-bound.
    pub bindings: bool,
}

impl Staleness {
    /// Decide for a bucket.
    ///
    /// `program_cached` tells whether the bucket's program is still held by the
    /// shader cache; an evicted program always makes the shader stale.
    pub fn evaluate(
        bucket: &DrawBucket,
        inputs: &StalenessInputs,
        tracker: &RenderStateTracker,
        program_cached: bool,
    ) -> Self {
        let built = bucket.shader_source_time;
        let shader = !program_cached
            || built < inputs.mapper
            || built < inputs.actor
            || built < inputs.input
            || built < tracker.latest_change();

        Self {
            buffers: Self::buffers_stale(inputs),
            shader,
            bindings: Self::bindings_stale(bucket, inputs),
        }
    }

    /// The vertex and index buffers predate the mapper, actor or mesh.
    ///
    /// Shared by every bucket, so the mapper asks once per frame before any
    /// bucket is drawn.
    pub fn buffers_stale(inputs: &StalenessInputs) -> bool {
        inputs.vbo_update < inputs.mapper
            || inputs.vbo_update < inputs.actor
            || inputs.vbo_update < inputs.input
    }

    /// The bucket has no vertex array, or its attribute pointers predate the
    /// current vertex buffer.
    pub fn bindings_stale(bucket: &DrawBucket, inputs: &StalenessInputs) -> bool {
        bucket.vao.is_none() || bucket.attribute_update_time < inputs.vbo_update
    }
}
