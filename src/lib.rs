use std::path::Path;

use tracing::info;

pub mod apply;
pub mod equalizer;
pub mod error;
pub mod grid;
pub mod histogram;
pub mod image_io;
pub mod mapping;
pub mod plot_histogram;

pub use apply::{apply_mapping, Quantize};
pub use equalizer::{equalize_image, ChannelEqualizer, DitherMode, EqualizeParams};
pub use error::{Error, GridError, Result};
pub use grid::{grid_from_rows, grid_from_vec, image_from_vec};
pub use histogram::{Histogram, LEVELS};
pub use image_io::DecodedImage;
pub use mapping::{build_mapping, partition, DitherSource, LevelBounds, MappingTable, MidpointDither, NoDither, RandomDither};

/// Decodes `filename_in`, equalizes every color channel and writes the result
/// to `filename_out`.
///
/// Once equalization succeeded, a failure to save or plot comes back as
/// [`Error::Persist`], which still carries the equalized pixels.
pub fn transform_any_8bit_image(
    filename_in: &Path,
    filename_out: &Path,
    params: &EqualizeParams,
    plot_dir: Option<&Path>,
) -> Result<DecodedImage> {
    let decoded = image_io::load_8bit_image(filename_in)?;
    let equalized = equalize_decoded(&decoded, params)?;

    let persisted = image_io::save_8bit_image(&equalized, filename_out).and_then(|_| match plot_dir {
        Some(dir) => plot_channel_histograms(dir, &decoded, &equalized),
        None => Ok(()),
    });
    if let Err(source) = persisted {
        return Err(Error::Persist { source: Box::new(source), image: Box::new(equalized) });
    }
    info!(
        input = %filename_in.display(),
        output = %filename_out.display(),
        "equalized image saved"
    );
    Ok(equalized)
}

pub fn equalize_decoded(image: &DecodedImage, params: &EqualizeParams) -> Result<DecodedImage> {
    let pixels = equalize_image(&image.pixels.view(), image.has_alpha, params)?;
    Ok(DecodedImage { pixels, has_alpha: image.has_alpha })
}

/// Writes `channel_<c>_before.png` / `channel_<c>_after.png` for every channel.
fn plot_channel_histograms(dir: &Path, before: &DecodedImage, after: &DecodedImage) -> Result<()> {
    use ndarray::Axis;

    for (c, (src, dst)) in before
        .pixels
        .axis_iter(Axis(2))
        .zip(after.pixels.axis_iter(Axis(2)))
        .enumerate()
    {
        let hist_before = Histogram::build(&src)?;
        let hist_after = Histogram::build(&dst)?;
        plot_histogram::plot(&dir.join(format!("channel_{c}_before.png")), &hist_before)?;
        plot_histogram::plot(&dir.join(format!("channel_{c}_after.png")), &hist_after)?;
        info!(
            channel = c,
            levels_before = hist_before.occupied_levels(),
            levels_after = hist_after.occupied_levels(),
            "histograms plotted"
        );
    }
    Ok(())
}
