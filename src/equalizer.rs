use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis};
use num_traits::ToPrimitive;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::apply::{apply_mapping, Quantize};
use crate::error::GridError;
use crate::histogram::Histogram;
use crate::mapping::{build_mapping, DitherSource, MidpointDither, NoDither, RandomDither};

/// Value drawn for input levels that span several output buckets.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
pub enum DitherMode {
    /// Uniform random value inside the bucket range.
    #[default]
    Random,
    /// Lower bound of the range, no randomness.
    Off,
    /// Centre of the range.
    Midpoint,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EqualizeParams {
    pub dither: DitherMode,
    pub quantize: Quantize,
    /// Base seed; channel `c` uses `seed + c`. Seeded from the OS when unset.
    pub seed: Option<u64>,
    /// Also equalize the alpha channel instead of copying it.
    pub equalize_alpha: bool,
}

impl EqualizeParams {
    /// Independent dither source for one channel.
    pub fn dither_source(&self, channel: usize) -> Box<dyn DitherSource> {
        match self.dither {
            DitherMode::Random => {
                let rng = match self.seed {
                    Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(channel as u64)),
                    None => StdRng::from_os_rng(),
                };
                Box::new(RandomDither::new(rng))
            }
            DitherMode::Off => Box::new(NoDither),
            DitherMode::Midpoint => Box::new(MidpointDither),
        }
    }
}

/// Histogram → mapping → lookup for a single channel, whatever the channel is.
#[derive(Debug, Default, Copy, Clone)]
pub struct ChannelEqualizer {
    quantize: Quantize,
}

impl ChannelEqualizer {
    pub fn new(quantize: Quantize) -> Self {
        ChannelEqualizer { quantize }
    }

    pub fn equalize<I, D>(&self, grid: &ArrayView2<I>, dither: &mut D) -> Result<Array2<u8>, GridError>
    where
        I: ToPrimitive,
        D: DitherSource + ?Sized,
    {
        let hist = Histogram::build(grid)?;
        let table = build_mapping(&hist, dither);
        debug!(
            pixels = hist.total(),
            occupied = hist.occupied_levels(),
            top = table.bounds()[255].upper,
            "built mapping table"
        );
        apply_mapping(grid, &table, self.quantize)
    }
}

/// Equalizes every channel of a `rows × cols × channels` image independently.
///
/// With `has_alpha` the last channel is copied through unless
/// `params.equalize_alpha` is set.
pub fn equalize_image(
    image: &ArrayView3<u8>,
    has_alpha: bool,
    params: &EqualizeParams,
) -> Result<Array3<u8>, GridError> {
    if image.is_empty() {
        return Err(GridError::ZeroPixelCount);
    }
    let channels = image.len_of(Axis(2));
    let equalizer = ChannelEqualizer::new(params.quantize);
    let mut result = Array3::zeros(image.raw_dim());

    for (c, (src, mut dst)) in image
        .axis_iter(Axis(2))
        .zip(result.axis_iter_mut(Axis(2)))
        .enumerate()
    {
        if has_alpha && c == channels - 1 && !params.equalize_alpha {
            debug!(channel = c, "copying alpha channel");
            dst.assign(&src);
            continue;
        }
        debug!(channel = c, "equalizing channel");
        let mut dither = params.dither_source(c);
        let equalized = equalizer.equalize(&src, dither.as_mut())?;
        dst.assign(&equalized);
    }
    Ok(result)
}
