//! Image decoding and exact-pixel color sampling.
//!
//! Accepts raw image bytes (PNG, JPEG, BMP, WebP), converts them to
//! 3-channel RGB once, and answers per-pixel color lookups. There is no
//! interpolation: a coordinate is truncated to the pixel that contains
//! it, so the vector file and the image must share a coordinate space.

use image::RgbImage;

use crate::types::{Dimensions, PipelineError, Rgb};

/// Read-only RGB view of the source image.
#[derive(Debug, Clone)]
pub struct ColorSampler {
    image: RgbImage,
}

impl ColorSampler {
    /// Decode raw image bytes into a sampler.
    ///
    /// Alpha and grayscale sources are converted to RGB; alpha is
    /// dropped, not blended.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyInput`] if `bytes` is empty.
    /// Returns [`PipelineError::ImageDecode`] if the image format is
    /// unrecognized or the data is corrupt.
    pub fn decode(bytes: &[u8]) -> Result<Self, PipelineError> {
        if bytes.is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let img = image::load_from_memory(bytes)?;
        Ok(Self::from_image(img.to_rgb8()))
    }

    /// Wrap an already decoded image.
    #[must_use]
    pub const fn from_image(image: RgbImage) -> Self {
        Self { image }
    }

    /// Dimensions of the sampled image.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        let (width, height) = self.image.dimensions();
        Dimensions { width, height }
    }

    /// Color of the pixel containing `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ImageBounds`] if the truncated coordinate
    /// falls outside the image or either coordinate is not finite.
    pub fn sample(&self, x: f64, y: f64) -> Result<Rgb, PipelineError> {
        let Dimensions { width, height } = self.dimensions();
        match (pixel_index(x, width), pixel_index(y, height)) {
            (Some(px), Some(py)) => Ok((*self.image.get_pixel(px, py)).into()),
            _ => Err(PipelineError::ImageBounds {
                x,
                y,
                width,
                height,
            }),
        }
    }
}

/// Truncate `coord` to a pixel index if it lies in `[0, extent)`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pixel_index(coord: f64, extent: u32) -> Option<u32> {
    let truncated = coord.trunc();
    // NaN fails the range check.
    (0.0..f64::from(extent))
        .contains(&truncated)
        .then_some(truncated as u32)
}
