//! pieart-pipeline: Pure circle-to-slice pipeline (sans-IO).
//!
//! Turns circle-packer SVG text plus the source image into pie-chart
//! slices through:
//! parse circle records -> sample center color -> generate slices ->
//! register slice colors in the palette.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! text and image bytes and returns structured data. Filesystem
//! interaction lives in the `pieart` binary; CSV formatting lives in
//! `pieart-export`.

pub mod jitter;
pub mod palette;
pub mod parse;
pub mod random;
pub mod sample;
pub mod slices;
pub mod types;

pub use palette::Palette;
pub use parse::parse_circles;
pub use random::{RandomSource, RngSource, SequenceSource};
pub use sample::ColorSampler;
pub use slices::SliceGenerator;
pub use types::{
    Circle, Dimensions, PipelineConfig, PipelineError, ProcessResult, Rgb, RgbImage, Slice,
};

/// Totals from a streaming run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSummary {
    /// Number of circle records processed.
    pub circle_count: usize,
    /// Number of slices emitted.
    pub slice_count: usize,
    /// All colors used, in first-seen order.
    pub palette: Palette,
}

/// Run the pipeline, handing each circle's slices to `emit` as soon as
/// they are generated.
///
/// Circles are processed in file order and `emit` receives one call per
/// circle. The palette is only complete once every circle has been
/// processed, so it is returned in the [`StreamSummary`] rather than
/// streamed.
///
/// # Errors
///
/// Returns the first error from config validation, record parsing,
/// pixel sampling, or `emit`, converted into `E`. Processing stops at
/// that point.
pub fn process_streaming<R, E, F>(
    svg_text: &str,
    sampler: &ColorSampler,
    config: &PipelineConfig,
    rng: R,
    mut emit: F,
) -> Result<StreamSummary, E>
where
    R: RandomSource,
    E: From<PipelineError>,
    F: FnMut(&[Slice]) -> Result<(), E>,
{
    let mut generator = SliceGenerator::new(config.clone(), rng)?;
    let mut circle_count = 0;
    let mut slice_count = 0;

    for record in parse_circles(svg_text) {
        let circle = record?;
        let base = sampler.sample(circle.center_x, circle.center_y)?;
        let slices = generator.generate(circle, base);
        emit(&slices)?;

        circle_count += 1;
        slice_count += slices.len();
    }

    let palette = generator.into_palette();
    tracing::debug!(circle_count, slice_count, colors = palette.len(), "pipeline finished");
    Ok(StreamSummary {
        circle_count,
        slice_count,
        palette,
    })
}

/// Run the full pipeline in memory.
///
/// Takes the SVG text, raw image bytes (PNG, JPEG, BMP, WebP), a
/// configuration, and a random source, and returns every slice together
/// with the palette they index into.
///
/// # Pipeline steps
///
/// 1. Decode the image to RGB
/// 2. Parse circle records from the SVG text
/// 3. Sample the color under each circle center
/// 4. Generate the base slice and jittered slices per circle
/// 5. Register every slice color in the palette
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfig`] if the config is invalid.
/// Returns [`PipelineError::EmptyInput`] if `image_bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is unrecognized.
/// Returns [`PipelineError::Format`] for a malformed circle record.
/// Returns [`PipelineError::ImageBounds`] if a circle center is outside the image.
pub fn process<R: RandomSource>(
    svg_text: &str,
    image_bytes: &[u8],
    config: &PipelineConfig,
    rng: R,
) -> Result<ProcessResult, PipelineError> {
    config.validate()?;
    let sampler = ColorSampler::decode(image_bytes)?;

    let mut slices = Vec::new();
    let summary = process_streaming(svg_text, &sampler, config, rng, |batch| {
        slices.extend_from_slice(batch);
        Ok::<(), PipelineError>(())
    })?;

    Ok(ProcessResult {
        slices,
        palette: summary.palette,
        circle_count: summary.circle_count,
        dimensions: sampler.dimensions(),
    })
}
