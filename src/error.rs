use thiserror::Error;

use crate::image_io::DecodedImage;

/// Failures of the equalization core. Raised before anything is written into a
/// histogram or mapping table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("invalid grid shape: {0}")]
    InvalidGridShape(String),
    #[error("intensity {value} at ({row}, {col}) is outside 0..=255")]
    OutOfRangeIntensity { value: i128, row: usize, col: usize },
    #[error("grid has zero pixels")]
    ZeroPixelCount,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),
    #[error("failed to encode image: {0}")]
    Encode(image::ImageError),
    #[error("unsupported image: {0}")]
    UnsupportedImage(String),
    #[error("failed to plot histogram: {0}")]
    Plot(String),
    /// Equalization finished but writing its output did not.
    #[error("equalized image was not persisted: {source}")]
    Persist { source: Box<Error>, image: Box<DecodedImage> },
}

impl Error {
    /// Pixels that were computed before the failure, if any.
    pub fn into_equalized(self) -> Option<DecodedImage> {
        match self {
            Error::Persist { image, .. } => Some(*image),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
