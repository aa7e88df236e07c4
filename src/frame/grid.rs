//! Macroblock-grid scratch arrays with a one-unit halo

use crate::domain::model::{Dimension, MbMode, ModeCounts};
use crate::error::{AnalyzerError, AnalyzerResult};

/// Macroblock edge length in luma pixels
pub const MB_WIDTH: usize = 16;
/// Halo width around the macroblock grid, in macroblocks
pub const MB_GRID_MARGIN: usize = 1;

/// 2D grid indexed by signed (row, col).
///
/// Interior cells are `0..rows` x `0..cols`; the halo is reachable at row or
/// column `-1` and `rows` / `cols`.
#[derive(Debug, Clone)]
pub struct MacroblockGrid<T> {
    rows: usize,
    cols: usize,
    stride: usize,
    cells: Vec<T>,
}

impl<T: Copy + Default> MacroblockGrid<T> {
    pub fn new(rows: usize, cols: usize, purpose: &str) -> AnalyzerResult<Self> {
        let stride = cols + 2 * MB_GRID_MARGIN;
        let count = stride
            .checked_mul(rows + 2 * MB_GRID_MARGIN)
            .ok_or_else(|| AnalyzerError::Allocation {
                bytes: usize::MAX,
                purpose: purpose.to_string(),
            })?;

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(count)
            .map_err(|_| AnalyzerError::Allocation {
                bytes: count * std::mem::size_of::<T>(),
                purpose: purpose.to_string(),
            })?;
        cells.resize(count, T::default());

        Ok(Self {
            rows,
            cols,
            stride,
            cells,
        })
    }

    /// Grid covering every (possibly partial) macroblock of `dim`
    pub fn for_dimension(dim: Dimension, purpose: &str) -> AnalyzerResult<Self> {
        Self::new(dim.height.div_ceil(MB_WIDTH), dim.width.div_ceil(MB_WIDTH), purpose)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn index(&self, row: isize, col: isize) -> usize {
        let margin = MB_GRID_MARGIN as isize;
        assert!(
            row >= -margin
                && row < self.rows as isize + margin
                && col >= -margin
                && col < self.cols as isize + margin,
            "macroblock ({}, {}) outside {}x{} grid",
            row,
            col,
            self.rows,
            self.cols
        );
        ((row + margin) as usize) * self.stride + (col + margin) as usize
    }

    pub fn get(&self, row: isize, col: isize) -> T {
        self.cells[self.index(row, col)]
    }

    pub fn set(&mut self, row: isize, col: isize, value: T) {
        let idx = self.index(row, col);
        self.cells[idx] = value;
    }

    /// Overwrite every cell, halo included
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }

    /// Interior cells in raster order
    pub fn interior(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.rows).flat_map(move |r| {
            let start = (r + MB_GRID_MARGIN) * self.stride + MB_GRID_MARGIN;
            self.cells[start..start + self.cols].iter().copied()
        })
    }
}

/// Per-call error and mode grids written by the prediction engine
#[derive(Debug, Clone)]
pub struct PredictionScratch {
    pub errors: MacroblockGrid<u32>,
    pub modes: MacroblockGrid<MbMode>,
}

impl PredictionScratch {
    pub fn new(dim: Dimension) -> AnalyzerResult<Self> {
        Ok(Self {
            errors: MacroblockGrid::for_dimension(dim, "macroblock errors")?,
            modes: MacroblockGrid::for_dimension(dim, "macroblock modes")?,
        })
    }

    /// Clear both grids before a prediction call
    pub fn clear(&mut self) {
        self.errors.fill(0);
        self.modes.fill(MbMode::Unset);
    }

    /// Sum of interior macroblock errors
    pub fn total_error(&self) -> u64 {
        self.errors.interior().map(u64::from).sum()
    }

    /// Mode tallies over the interior
    pub fn mode_counts(&self) -> ModeCounts {
        let mut counts = ModeCounts::default();
        for mode in self.modes.interior() {
            counts.record(mode);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_covers_partial_macroblocks() {
        let dim = Dimension::new(40, 17).unwrap();
        let grid: MacroblockGrid<u32> = MacroblockGrid::for_dimension(dim, "test").unwrap();
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.rows(), 2);
    }

    #[test]
    fn test_halo_is_addressable_and_separate() {
        let mut grid: MacroblockGrid<u32> = MacroblockGrid::new(2, 3, "test").unwrap();
        grid.set(-1, -1, 7);
        grid.set(2, 3, 9);
        grid.set(0, 0, 1);
        grid.set(1, 2, 2);

        assert_eq!(grid.get(-1, -1), 7);
        assert_eq!(grid.get(2, 3), 9);
        let interior: Vec<u32> = grid.interior().collect();
        assert_eq!(interior, vec![1, 0, 0, 0, 0, 2]);
    }

    #[test]
    #[should_panic]
    fn test_outside_halo_panics() {
        let grid: MacroblockGrid<u32> = MacroblockGrid::new(2, 2, "test").unwrap();
        grid.get(-2, 0);
    }

    #[test]
    fn test_scratch_totals() {
        let dim = Dimension::new(32, 16).unwrap();
        let mut scratch = PredictionScratch::new(dim).unwrap();
        scratch.errors.set(0, 0, 100);
        scratch.errors.set(0, 1, 50);
        scratch.errors.set(-1, 0, 1000);
        scratch.modes.set(0, 0, MbMode::Intra);
        scratch.modes.set(0, 1, MbMode::Inter);

        assert_eq!(scratch.total_error(), 150);
        let counts = scratch.mode_counts();
        assert_eq!(counts.intra, 1);
        assert_eq!(counts.inter, 1);

        scratch.clear();
        assert_eq!(scratch.total_error(), 0);
        assert_eq!(scratch.mode_counts().total(), 0);
    }
}
