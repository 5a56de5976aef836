use itertools::Itertools;
use ndarray::{Array2, Array3, ArrayView2};
use num_traits::ToPrimitive;

use crate::error::GridError;

/// Builds a dense grid out of nested rows, rejecting ragged input.
pub fn grid_from_rows<I: Copy>(rows: &[Vec<I>]) -> Result<Array2<I>, GridError> {
    if !rows.iter().map(Vec::len).all_equal() {
        let (shortest, longest) = rows
            .iter()
            .map(Vec::len)
            .minmax()
            .into_option()
            .unwrap_or_default();
        return Err(GridError::InvalidGridShape(format!(
            "ragged rows, lengths range from {shortest} to {longest}"
        )));
    }
    let cols = rows.first().map_or(0, Vec::len);
    let flat = rows.iter().flatten().copied().collect::<Vec<I>>();
    grid_from_vec(rows.len(), cols, flat)
}

/// Builds a `rows × cols` grid from a row-major buffer.
pub fn grid_from_vec<I>(rows: usize, cols: usize, data: Vec<I>) -> Result<Array2<I>, GridError> {
    let len = data.len();
    Array2::from_shape_vec((rows, cols), data).map_err(|_| {
        GridError::InvalidGridShape(format!("{len} values do not fill a {rows}x{cols} grid"))
    })
}

/// Builds a `rows × cols × channels` image from an interleaved buffer.
pub fn image_from_vec<I>(
    rows: usize,
    cols: usize,
    channels: usize,
    data: Vec<I>,
) -> Result<Array3<I>, GridError> {
    let len = data.len();
    Array3::from_shape_vec((rows, cols, channels), data).map_err(|_| {
        GridError::InvalidGridShape(format!(
            "{len} values do not fill a {rows}x{cols} grid of {channels} channels"
        ))
    })
}

/// Total pixel count, failing for grids with no cells.
pub(crate) fn pixel_count<I>(grid: &ArrayView2<I>) -> Result<usize, GridError> {
    match grid.len() {
        0 => Err(GridError::ZeroPixelCount),
        n => Ok(n),
    }
}

/// Converts one cell to a histogram index.
#[inline]
pub(crate) fn intensity<I: ToPrimitive>(value: &I, (row, col): (usize, usize)) -> Result<u8, GridError> {
    value.to_u8().ok_or_else(|| GridError::OutOfRangeIntensity {
        value: value.to_i128().unwrap_or(i128::MAX),
        row,
        col,
    })
}
