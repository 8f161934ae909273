//! Scalar-to-color mapping.

use glam::Vec3;

use crate::mesh::ColorArray;
use crate::time_stamp::TimeStamp;

/// Maps scalar values onto an HSV color ramp.
///
/// The default ramp runs from blue (hue 0.6667) at the low end of the range to
/// red (hue 0) at the high end, fully saturated and opaque.
#[derive(Debug, Clone)]
pub struct LookupTable {
    range: (f32, f32),
    hue_range: (f32, f32),
    saturation_range: (f32, f32),
    value_range: (f32, f32),
    alpha_range: (f32, f32),
    number_of_colors: usize,
    mtime: TimeStamp,
}

impl Default for LookupTable {
    fn default() -> Self {
        Self {
            range: (0.0, 1.0),
            hue_range: (0.6667, 0.0),
            saturation_range: (1.0, 1.0),
            value_range: (1.0, 1.0),
            alpha_range: (1.0, 1.0),
            number_of_colors: 256,
            mtime: TimeStamp::now(),
        }
    }
}

impl LookupTable {
    /// Create the default blue-to-red table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scalar range mapped onto the ramp.
    pub fn range(&self) -> (f32, f32) {
        self.range
    }

    /// Set the scalar range.
    pub fn set_range(&mut self, min: f32, max: f32) {
        if self.range != (min, max) {
            self.range = (min, max);
            self.mtime.modified();
        }
    }

    /// Set the hue range.
    pub fn set_hue_range(&mut self, start: f32, end: f32) {
        self.hue_range = (start, end);
        self.mtime.modified();
    }

    /// Set the alpha range.
    pub fn set_alpha_range(&mut self, start: f32, end: f32) {
        self.alpha_range = (start, end);
        self.mtime.modified();
    }

    /// Set the number of distinct colors in the table.
    pub fn set_number_of_colors(&mut self, count: usize) {
        self.number_of_colors = count.max(1);
        self.mtime.modified();
    }

    /// Last modification time.
    pub fn mtime(&self) -> TimeStamp {
        self.mtime
    }

    /// Table entry index for a scalar value.
    fn index(&self, value: f32) -> usize {
        let (min, max) = self.range;
        let n = self.number_of_colors;
        if max <= min || value.is_nan() {
            return 0;
        }
        let t = (value - min) / (max - min);
        ((t * n as f32).floor().max(0.0) as usize).min(n - 1)
    }

    /// RGBA color of a scalar value, with `alpha` scaling the table alpha.
    pub fn map_value(&self, value: f32, alpha: f32) -> [u8; 4] {
        let n = self.number_of_colors;
        let t = if n > 1 {
            self.index(value) as f32 / (n - 1) as f32
        } else {
            0.0
        };
        let lerp = |(a, b): (f32, f32)| a + (b - a) * t;
        let rgb = hsv_to_rgb(
            lerp(self.hue_range),
            lerp(self.saturation_range),
            lerp(self.value_range),
        );
        let a = lerp(self.alpha_range) * alpha;
        [to_byte(rgb.x), to_byte(rgb.y), to_byte(rgb.z), to_byte(a)]
    }

    /// Map every value to RGBA.
    pub fn map_scalars(&self, values: &[f32], alpha: f32) -> ColorArray {
        let colors: Vec<[u8; 4]> = values.iter().map(|&v| self.map_value(v, alpha)).collect();
        ColorArray::from_rgba(&colors)
    }
}

fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

/// Convert HSV (all components in `[0, 1]`) to RGB.
pub fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> Vec3 {
    let h = (hue.rem_euclid(1.0)) * 6.0;
    let sector = h.floor();
    let f = h - sector;
    let p = value * (1.0 - saturation);
    let q = value * (1.0 - saturation * f);
    let t = value * (1.0 - saturation * (1.0 - f));
    match sector as u32 {
        0 => Vec3::new(value, t, p),
        1 => Vec3::new(q, value, p),
        2 => Vec3::new(p, value, t),
        3 => Vec3::new(p, q, value),
        4 => Vec3::new(t, p, value),
        _ => Vec3::new(value, p, q),
    }
}
