use std::path::Path;

use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};
use ndarray::Array3;
use tracing::debug;

use crate::error::{Error, Result};
use crate::grid::image_from_vec;

/// An 8-bit image as `rows × cols × channels`.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub pixels: Array3<u8>,
    /// Last channel carries opacity.
    pub has_alpha: bool,
}

impl DecodedImage {
    pub fn channels(&self) -> usize {
        self.pixels.dim().2
    }
}

pub fn load_8bit_image(path: &Path) -> Result<DecodedImage> {
    let image = image::open(path).map_err(Error::Decode)?;
    let decoded = from_dynamic(image)?;
    debug!(
        path = %path.display(),
        shape = ?decoded.pixels.dim(),
        has_alpha = decoded.has_alpha,
        "decoded image"
    );
    Ok(decoded)
}

pub fn from_dynamic(image: DynamicImage) -> Result<DecodedImage> {
    let (h, w) = (image.height() as usize, image.width() as usize);
    let (raw, cc, has_alpha) = match image {
        DynamicImage::ImageLuma8(i) => (i.into_raw(), 1, false),
        DynamicImage::ImageLumaA8(i) => (i.into_raw(), 2, true),
        DynamicImage::ImageRgb8(i) => (i.into_raw(), 3, false),
        DynamicImage::ImageRgba8(i) => (i.into_raw(), 4, true),
        other => {
            return Err(Error::UnsupportedImage(format!(
                "expected 8 bits per channel, got {:?}",
                other.color()
            )))
        }
    };
    let pixels = image_from_vec(h, w, cc, raw)?;
    Ok(DecodedImage { pixels, has_alpha })
}

pub fn to_dynamic(image: &DecodedImage) -> Result<DynamicImage> {
    let (h, w, cc) = image.pixels.dim();
    let (w, h) = (w as u32, h as u32);
    let raw = image.pixels.iter().copied().collect::<Vec<u8>>();
    let mismatch = || Error::UnsupportedImage(format!("cannot pack {cc} channels into a {w}x{h} image"));
    let dynamic = match cc {
        1 => DynamicImage::ImageLuma8(GrayImage::from_raw(w, h, raw).ok_or_else(mismatch)?),
        2 => DynamicImage::ImageLumaA8(GrayAlphaImage::from_raw(w, h, raw).ok_or_else(mismatch)?),
        3 => DynamicImage::ImageRgb8(RgbImage::from_raw(w, h, raw).ok_or_else(mismatch)?),
        4 => DynamicImage::ImageRgba8(RgbaImage::from_raw(w, h, raw).ok_or_else(mismatch)?),
        _ => return Err(mismatch()),
    };
    Ok(dynamic)
}

pub fn save_8bit_image(image: &DecodedImage, path: &Path) -> Result<()> {
    to_dynamic(image)?.save(path).map_err(Error::Encode)?;
    debug!(path = %path.display(), "saved image");
    Ok(())
}
