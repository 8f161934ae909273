//! Attribute arrays with their own modification time.

use glam::{Vec2, Vec3};

use crate::error::{MapperError, MapperResult};
use crate::time_stamp::TimeStamp;

/// A typed array that remembers when it was last modified.
///
/// Reading through [`DataArray::values`] never touches the stamp; every
/// mutable access through [`DataArray::values_mut`] advances it.
#[derive(Debug, Clone)]
pub struct DataArray<T> {
    values: Vec<T>,
    mtime: TimeStamp,
}

impl<T> DataArray<T> {
    /// Wrap a vector of values, stamped as modified now.
    pub fn new(values: Vec<T>) -> Self {
        Self {
            values,
            mtime: TimeStamp::now(),
        }
    }

    /// Read-only view of the values.
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Mutable access to the values. Marks the array as modified.
    pub fn values_mut(&mut self) -> &mut Vec<T> {
        self.mtime.modified();
        &mut self.values
    }

    /// Number of tuples.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the array holds no tuples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Mark the array as modified without touching the values.
    pub fn modified(&mut self) {
        self.mtime.modified();
    }

    /// Last modification time.
    #[inline]
    pub fn mtime(&self) -> TimeStamp {
        self.mtime
    }
}

impl<T> Default for DataArray<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> From<Vec<T>> for DataArray<T> {
    fn from(values: Vec<T>) -> Self {
        Self::new(values)
    }
}

/// Unsigned-byte colors with 1 to 4 components per tuple
/// (luminance, luminance-alpha, RGB or RGBA).
#[derive(Debug, Clone)]
pub struct ColorArray {
    components: usize,
    data: DataArray<u8>,
}

impl ColorArray {
    /// Create a color array from packed tuples.
    pub fn new(components: usize, data: Vec<u8>) -> MapperResult<Self> {
        if !(1..=4).contains(&components) {
            return Err(MapperError::InvalidColorComponents(components));
        }
        Ok(Self {
            components,
            data: DataArray::new(data),
        })
    }

    /// Create an RGBA color array.
    pub fn from_rgba(colors: &[[u8; 4]]) -> Self {
        Self {
            components: 4,
            data: DataArray::new(colors.iter().flatten().copied().collect()),
        }
    }

    /// Components per tuple.
    #[inline]
    pub fn components(&self) -> usize {
        self.components
    }

    /// Number of complete tuples.
    pub fn num_tuples(&self) -> usize {
        self.data.len() / self.components
    }

    /// Packed bytes.
    pub fn bytes(&self) -> &[u8] {
        self.data.values()
    }

    /// Mutable packed bytes. Marks the array as modified.
    pub fn bytes_mut(&mut self) -> &mut Vec<u8> {
        self.data.values_mut()
    }

    /// Returns `true` if any tuple carries an alpha below 255.
    ///
    /// Only luminance-alpha and RGBA arrays have an alpha channel.
    pub fn has_translucency(&self) -> bool {
        match self.components {
            2 | 4 => self
                .bytes()
                .chunks_exact(self.components)
                .any(|tuple| tuple[self.components - 1] < 255),
            _ => false,
        }
    }

    /// Mark the array as modified.
    pub fn modified(&mut self) {
        self.data.modified();
    }

    /// Last modification time.
    pub fn mtime(&self) -> TimeStamp {
        self.data.mtime()
    }
}

/// Texture coordinates with one or two components.
#[derive(Debug, Clone)]
pub enum TCoords {
    One(DataArray<f32>),
    Two(DataArray<Vec2>),
}

impl TCoords {
    /// Components per tuple.
    pub fn components(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Two(_) => 2,
        }
    }

    /// Number of tuples.
    pub fn len(&self) -> usize {
        match self {
            Self::One(a) => a.len(),
            Self::Two(a) => a.len(),
        }
    }

    /// Returns `true` if there are no tuples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Last modification time.
    pub fn mtime(&self) -> TimeStamp {
        match self {
            Self::One(a) => a.mtime(),
            Self::Two(a) => a.mtime(),
        }
    }
}

/// Scalars attached to points or cells.
#[derive(Debug, Clone)]
pub enum Scalars {
    /// Colors used directly.
    Colors(ColorArray),
    /// Values mapped through a lookup table.
    Values(DataArray<f32>),
}

impl Scalars {
    /// Number of tuples.
    pub fn num_tuples(&self) -> usize {
        match self {
            Self::Colors(c) => c.num_tuples(),
            Self::Values(v) => v.len(),
        }
    }

    /// Last modification time.
    pub fn mtime(&self) -> TimeStamp {
        match self {
            Self::Colors(c) => c.mtime(),
            Self::Values(v) => v.mtime(),
        }
    }
}

/// Attributes attached to points.
#[derive(Debug, Clone, Default)]
pub struct PointData {
    pub normals: Option<DataArray<Vec3>>,
    pub tcoords: Option<TCoords>,
    pub scalars: Option<Scalars>,
}

impl PointData {
    /// Latest modification time over every present array.
    pub fn mtime(&self) -> TimeStamp {
        TimeStamp::latest(
            [
                self.normals.as_ref().map(DataArray::mtime),
                self.tcoords.as_ref().map(TCoords::mtime),
                self.scalars.as_ref().map(Scalars::mtime),
            ]
            .into_iter()
            .flatten(),
        )
    }
}

/// Attributes attached to cells.
#[derive(Debug, Clone, Default)]
pub struct CellData {
    pub scalars: Option<Scalars>,
}

impl CellData {
    /// Latest modification time over every present array.
    pub fn mtime(&self) -> TimeStamp {
        self.scalars
            .as_ref()
            .map(Scalars::mtime)
            .unwrap_or(TimeStamp::NEVER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_mut_bumps_mtime() {
        let mut array = DataArray::new(vec![1.0f32, 2.0]);
        let before = array.mtime();
        let _ = array.values();
        assert_eq!(array.mtime(), before);
        array.values_mut()[0] = 3.0;
        assert!(array.mtime() > before);
        assert_eq!(array.values(), &[3.0, 2.0]);
    }

    #[test]
    fn test_color_array_components() {
        assert!(ColorArray::new(0, vec![]).is_err());
        assert!(ColorArray::new(5, vec![]).is_err());
        let colors = ColorArray::new(3, vec![255, 0, 0, 0, 255, 0, 1]).unwrap();
        assert_eq!(colors.num_tuples(), 2);
    }

    #[test]
    fn test_color_array_translucency() {
        let opaque = ColorArray::from_rgba(&[[255, 0, 0, 255]]);
        assert!(!opaque.has_translucency());
        let translucent = ColorArray::from_rgba(&[[255, 0, 0, 255], [0, 0, 0, 128]]);
        assert!(translucent.has_translucency());
        let rgb = ColorArray::new(3, vec![0, 0, 0]).unwrap();
        assert!(!rgb.has_translucency());
    }

    #[test]
    fn test_point_data_mtime() {
        let mut data = PointData::default();
        assert!(data.mtime().is_never());
        data.normals = Some(DataArray::new(vec![Vec3::Z]));
        let stamp = data.mtime();
        assert!(!stamp.is_never());
        data.tcoords = Some(TCoords::One(DataArray::new(vec![0.5])));
        assert!(data.mtime() > stamp);
    }
}
