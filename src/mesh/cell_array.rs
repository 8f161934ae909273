//! Variable-length cell connectivity.

use crate::time_stamp::TimeStamp;

/// A list of cells, each an ordered list of point ids.
///
/// Stored as a flat connectivity list plus offsets; `offsets` always starts
/// with 0 and has one more entry than there are cells.
#[derive(Debug, Clone)]
pub struct CellArray {
    offsets: Vec<usize>,
    connectivity: Vec<u32>,
    mtime: TimeStamp,
}

impl CellArray {
    /// Create an empty cell array.
    pub fn new() -> Self {
        Self {
            offsets: vec![0],
            connectivity: Vec::new(),
            mtime: TimeStamp::now(),
        }
    }

    /// Build a cell array from a list of cells.
    pub fn from_cells<I, C>(cells: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[u32]>,
    {
        let mut array = Self::new();
        for cell in cells {
            array.push_cell(cell.as_ref());
        }
        array
    }

    /// Append a cell.
    pub fn push_cell(&mut self, point_ids: &[u32]) {
        self.connectivity.extend_from_slice(point_ids);
        self.offsets.push(self.connectivity.len());
        self.mtime.modified();
    }

    /// Number of cells.
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Returns `true` if there are no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_cells() == 0
    }

    /// Total number of point ids over all cells.
    #[inline]
    pub fn connectivity_len(&self) -> usize {
        self.connectivity.len()
    }

    /// Point ids of a cell.
    pub fn cell(&self, index: usize) -> Option<&[u32]> {
        let start = *self.offsets.get(index)?;
        let end = *self.offsets.get(index + 1)?;
        Some(&self.connectivity[start..end])
    }

    /// Iterate over cells in order.
    pub fn iter(&self) -> impl Iterator<Item = &[u32]> + '_ {
        self.offsets
            .windows(2)
            .map(move |w| &self.connectivity[w[0]..w[1]])
    }

    /// Flat connectivity list.
    pub fn connectivity(&self) -> &[u32] {
        &self.connectivity
    }

    /// Mark the array as modified.
    pub fn modified(&mut self) {
        self.mtime.modified();
    }

    /// Last modification time.
    #[inline]
    pub fn mtime(&self) -> TimeStamp {
        self.mtime
    }
}

impl Default for CellArray {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cells() {
        let cells = CellArray::from_cells([vec![0, 1, 2, 3], vec![4, 5, 6]]);
        assert_eq!(cells.num_cells(), 2);
        assert_eq!(cells.connectivity_len(), 7);
        assert_eq!(cells.cell(0), Some(&[0, 1, 2, 3][..]));
        assert_eq!(cells.cell(1), Some(&[4, 5, 6][..]));
        assert_eq!(cells.cell(2), None);
    }

    #[test]
    fn test_iter_matches_cells() {
        let cells = CellArray::from_cells([[0u32, 1], [1, 2]]);
        let collected: Vec<&[u32]> = cells.iter().collect();
        assert_eq!(collected, vec![&[0, 1][..], &[1, 2][..]]);
    }

    #[test]
    fn test_empty() {
        let cells = CellArray::new();
        assert!(cells.is_empty());
        assert_eq!(cells.iter().count(), 0);
    }

    #[test]
    fn test_push_bumps_mtime() {
        let mut cells = CellArray::new();
        let before = cells.mtime();
        cells.push_cell(&[0]);
        assert!(cells.mtime() > before);
    }
}
