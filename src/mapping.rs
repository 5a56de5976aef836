//! Histogram → intensity mapping with randomized intra-bin dithering.
//!
//! The cumulative pixel mass is cut into 256 buckets of `total / 256` pixels
//! each. An input level whose mass crosses bucket borders `l_c..r_c` is mapped
//! to a value drawn from `[l_c, r_c)`, so pixels sharing an input intensity
//! get spread over the output levels they cover instead of piling into one.

use rand::Rng;
use tracing::debug;

use crate::histogram::{Histogram, LEVELS};

/// Output bucket range covered by one input level.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LevelBounds {
    /// Output level at entry to this input level (`l_c`).
    pub lower: u32,
    /// Output level after absorbing this input level's mass (`r_c`).
    pub upper: u32,
}

impl LevelBounds {
    pub fn is_empty(&self) -> bool {
        self.upper == self.lower
    }

    /// Number of output levels the input level spans.
    pub fn width(&self) -> u32 {
        self.upper - self.lower
    }

    pub fn contains(&self, value: f32) -> bool {
        if self.is_empty() {
            value == self.lower as f32
        } else {
            value >= self.lower as f32 && value < self.upper as f32
        }
    }
}

/// Where a value inside `[lower, upper)` comes from.
///
/// `draw` is only called with `upper > lower` and must return a value in
/// `[lower, upper)`.
pub trait DitherSource {
    fn draw(&mut self, lower: u32, upper: u32) -> f32;
}

impl<D: DitherSource + ?Sized> DitherSource for &mut D {
    fn draw(&mut self, lower: u32, upper: u32) -> f32 {
        (**self).draw(lower, upper)
    }
}

/// Uniform draw from any `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomDither<R> {
    rng: R,
}

impl<R: Rng> RandomDither<R> {
    pub fn new(rng: R) -> Self {
        RandomDither { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> DitherSource for RandomDither<R> {
    fn draw(&mut self, lower: u32, upper: u32) -> f32 {
        // f32 rounding can land exactly on the excluded bound, draw again
        loop {
            let value = self.rng.random_range(lower as f32..upper as f32);
            if value < upper as f32 {
                return value;
            }
        }
    }
}

/// Always the lower bound: plain, reproducible equalization.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoDither;

impl DitherSource for NoDither {
    fn draw(&mut self, lower: u32, _upper: u32) -> f32 {
        lower as f32
    }
}

/// Centre of the interval.
#[derive(Debug, Default, Copy, Clone)]
pub struct MidpointDither;

impl DitherSource for MidpointDither {
    fn draw(&mut self, lower: u32, upper: u32) -> f32 {
        lower as f32 + (upper - lower) as f32 / 2.0
    }
}

/// Replacement value for each of the 256 input intensities.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingTable {
    levels: [f32; LEVELS],
    bounds: [LevelBounds; LEVELS],
}

impl MappingTable {
    #[inline]
    pub fn get(&self, level: u8) -> f32 {
        self.levels[usize::from(level)]
    }

    pub fn levels(&self) -> &[f32; LEVELS] {
        &self.levels
    }

    pub fn bounds(&self) -> &[LevelBounds; LEVELS] {
        &self.bounds
    }
}

/// Cuts the cumulative mass of `hist` into 256 equal buckets and records which
/// buckets every input level spans.
///
/// Mass is tracked in 1/256 pixel units so the bucket size `total / 256` is an
/// exact integer and the final upper bound never exceeds 255.
pub fn partition(hist: &Histogram) -> [LevelBounds; LEVELS] {
    let bucket = hist.total();
    let mut h_sum: u64 = 0;
    let mut r_ver: u32 = 0;
    let mut bounds = [LevelBounds { lower: 0, upper: 0 }; LEVELS];

    for (i, bound) in bounds.iter_mut().enumerate() {
        let l_c = r_ver;
        h_sum += hist[i] * LEVELS as u64;
        // a heavy level may advance past several buckets at once
        while h_sum > bucket {
            h_sum -= bucket;
            r_ver += 1;
        }
        *bound = LevelBounds { lower: l_c, upper: r_ver };
    }
    bounds
}

/// Builds the mapping table of `hist`, drawing intra-bucket values from
/// `dither`.
pub fn build_mapping<D: DitherSource + ?Sized>(hist: &Histogram, dither: &mut D) -> MappingTable {
    let bounds = partition(hist);
    let mut levels = [0.0f32; LEVELS];
    for (value, bound) in levels.iter_mut().zip(bounds.iter()) {
        *value = if bound.is_empty() {
            bound.lower as f32
        } else {
            dither.draw(bound.lower, bound.upper)
        };
    }

    let skipping = bounds.iter().filter(|b| b.width() > 1).count();
    if skipping > 0 {
        let widest = bounds.iter().map(LevelBounds::width).max().unwrap_or(0);
        debug!(skipping, widest, "input levels span more than one output bucket");
    }

    MappingTable { levels, bounds }
}
