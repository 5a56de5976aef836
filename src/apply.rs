use ndarray::{Array2, ArrayView2};
use num_traits::ToPrimitive;

use crate::error::GridError;
use crate::grid::intensity;
use crate::mapping::MappingTable;

/// How a mapped real value becomes an 8-bit intensity.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
pub enum Quantize {
    /// Truncate: a value drawn from `[l_c, r_c)` stays below `r_c`.
    #[default]
    Floor,
    Round,
}

impl Quantize {
    #[inline]
    pub fn apply(self, value: f32) -> u8 {
        let v = match self {
            Quantize::Floor => value.floor(),
            Quantize::Round => value.round(),
        };
        v.clamp(0.0, 255.0) as u8
    }
}

/// Replaces every cell of `grid` with its entry in `table`.
pub fn apply_mapping<I: ToPrimitive>(
    grid: &ArrayView2<I>,
    table: &MappingTable,
    quantize: Quantize,
) -> Result<Array2<u8>, GridError> {
    let lut: Vec<u8> = table.levels().iter().map(|&v| quantize.apply(v)).collect();
    let mut out = Array2::zeros(grid.raw_dim());
    for (pos, v) in grid.indexed_iter() {
        out[pos] = lut[usize::from(intensity(v, pos)?)];
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::Histogram;
    use crate::mapping::{build_mapping, MidpointDither, NoDither, RandomDither};
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn quantize_modes() {
        assert_eq!(Quantize::Floor.apply(63.5), 63);
        assert_eq!(Quantize::Round.apply(63.5), 64);
        assert_eq!(Quantize::Round.apply(254.7), 255);
        assert_eq!(Quantize::Floor.apply(-0.2), 0);
    }

    #[test]
    fn flat_grid_stays_uniform() {
        let grid = Array2::from_elem((4, 4), 100u8);
        let hist = Histogram::build(&grid.view()).unwrap();
        let table = build_mapping(&hist, &mut RandomDither::new(StdRng::seed_from_u64(1)));
        let out = apply_mapping(&grid.view(), &table, Quantize::Floor).unwrap();
        let first = out[[0, 0]];
        assert!(out.iter().all(|&v| v == first));
        assert!(first < 255);
    }

    #[test]
    fn applying_twice_is_identical() {
        let grid = Array2::from_shape_fn((9, 11), |(y, x)| (y * 20 + x) as u8);
        let hist = Histogram::build(&grid.view()).unwrap();
        let table = build_mapping(&hist, &mut RandomDither::new(StdRng::seed_from_u64(5)));
        let a = apply_mapping(&grid.view(), &table, Quantize::Round).unwrap();
        let b = apply_mapping(&grid.view(), &table, Quantize::Round).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn lookup_uses_table_entries() {
        let grid = array![[0u8, 0], [255, 255]];
        let hist = Histogram::build(&grid.view()).unwrap();
        let table = build_mapping(&hist, &mut MidpointDither);
        let out = apply_mapping(&grid.view(), &table, Quantize::Floor).unwrap();
        assert_eq!(out, array![[63, 63], [191, 191]]);

        let table = build_mapping(&hist, &mut NoDither);
        let out = apply_mapping(&grid.view(), &table, Quantize::Floor).unwrap();
        assert_eq!(out, array![[0, 0], [127, 127]]);
    }

    #[test]
    fn out_of_range_cell_is_reported() {
        let ok = array![[1u8]];
        let table = build_mapping(&Histogram::build(&ok.view()).unwrap(), &mut NoDither);
        let bad = array![[1i32, 300]];
        assert_eq!(
            apply_mapping(&bad.view(), &table, Quantize::Floor),
            Err(GridError::OutOfRangeIntensity { value: 300, row: 0, col: 1 })
        );
    }
}
