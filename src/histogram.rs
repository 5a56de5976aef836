use ndarray::{Array1, ArrayView2};
use ndarray_stats::QuantileExt;
use num_traits::ToPrimitive;

use crate::error::GridError;
use crate::grid::{intensity, pixel_count};

/// Number of intensity levels of an 8-bit channel.
pub const LEVELS: usize = 256;

/// Pixel count per intensity of one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: Array1<u64>,
    total: u64,
}

impl Histogram {
    /// Counts every cell of `grid`. Values outside `0..=255` fail before the
    /// table is touched.
    pub fn build<I: ToPrimitive>(grid: &ArrayView2<I>) -> Result<Self, GridError> {
        let total = pixel_count(grid)?;
        let mut counts: Array1<u64> = Array1::zeros((LEVELS,));
        for (pos, v) in grid.indexed_iter() {
            counts[usize::from(intensity(v, pos)?)] += 1;
        }
        Ok(Histogram { counts, total: total as u64 })
    }

    /// Wraps precomputed counts, e.g. a histogram merged from several grids.
    pub fn from_counts(counts: [u64; LEVELS]) -> Result<Self, GridError> {
        let total = counts
            .iter()
            .try_fold(0u64, |acc, &c| acc.checked_add(c))
            .ok_or_else(|| GridError::InvalidGridShape("histogram counts overflow u64".to_string()))?;
        if total == 0 {
            return Err(GridError::ZeroPixelCount);
        }
        Ok(Histogram { counts: Array1::from(counts.to_vec()), total })
    }

    pub fn counts(&self) -> &Array1<u64> {
        &self.counts
    }

    /// Sum of all bins, equal to the pixel count of the source grid.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Tallest bin.
    pub fn peak(&self) -> u64 {
        self.counts.max().copied().unwrap_or(0)
    }

    /// Number of intensities that occur at least once.
    pub fn occupied_levels(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }
}

impl std::ops::Index<usize> for Histogram {
    type Output = u64;

    fn index(&self, level: usize) -> &u64 {
        &self.counts[level]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn sum_matches_pixel_count() {
        let grid = Array2::from_shape_fn((7, 13), |(y, x)| ((y * 31 + x * 17) % 256) as u8);
        let hist = Histogram::build(&grid.view()).unwrap();
        assert_eq!(hist.counts().sum(), 7 * 13);
        assert_eq!(hist.total(), 7 * 13);
    }

    #[test]
    fn flat_grid_fills_single_bin() {
        let grid = Array2::from_elem((4, 4), 100u8);
        let hist = Histogram::build(&grid.view()).unwrap();
        assert_eq!(hist[100], 16);
        assert_eq!(hist.occupied_levels(), 1);
        assert_eq!(hist.peak(), 16);
    }

    #[test]
    fn wide_integer_input_is_accepted_in_range() {
        let grid = array![[0i32, 255], [128, 128]];
        let hist = Histogram::build(&grid.view()).unwrap();
        assert_eq!(hist[0], 1);
        assert_eq!(hist[128], 2);
        assert_eq!(hist[255], 1);
    }

    #[test]
    fn negative_intensity_is_rejected() {
        let grid = array![[0i32, 1], [-1, 3]];
        assert_eq!(
            Histogram::build(&grid.view()),
            Err(GridError::OutOfRangeIntensity { value: -1, row: 1, col: 0 })
        );
    }

    #[test]
    fn intensity_above_255_is_rejected() {
        let grid = array![[256u16, 1]];
        assert_eq!(
            Histogram::build(&grid.view()),
            Err(GridError::OutOfRangeIntensity { value: 256, row: 0, col: 0 })
        );
    }

    #[test]
    fn overflowing_counts_are_rejected() {
        let mut counts = [0u64; LEVELS];
        counts[0] = u64::MAX;
        counts[1] = 1;
        assert!(matches!(Histogram::from_counts(counts), Err(GridError::InvalidGridShape(_))));
    }

    #[test]
    fn empty_grid_is_rejected() {
        let grid: Array2<u8> = Array2::zeros((0, 0));
        assert_eq!(Histogram::build(&grid.view()), Err(GridError::ZeroPixelCount));
        assert_eq!(Histogram::from_counts([0; LEVELS]), Err(GridError::ZeroPixelCount));
    }
}
