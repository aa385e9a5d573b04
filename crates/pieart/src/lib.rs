//! pieart: filesystem front end for the pie-art pipeline.
//!
//! Reads the circle-packer SVG and the source image, streams slice rows
//! into `Bubbles.csv` as circles are processed, then writes the palette
//! to `Colors.csv`. Both files land next to the SVG unless another
//! output directory is given.

pub mod error;
pub mod output;
pub mod resolve;

use std::fs;
use std::path::{Path, PathBuf};

use pieart_pipeline::{ColorSampler, PipelineConfig, RandomSource, RngSource, process_streaming};

pub use error::RunError;
pub use output::{OutputFiles, OutputPaths};
pub use resolve::{InputResolver, PromptResolver};

/// Everything a run needs besides its random source.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Circle-packer SVG file.
    pub vector_file: PathBuf,
    /// Source image the circles were packed from.
    pub image_file: PathBuf,
    /// Overrides the default output directory (the SVG's directory).
    pub output_dir: Option<PathBuf>,
    /// Slice generation tunables.
    pub config: PipelineConfig,
}

impl RunOptions {
    /// Directory the tables are written to.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| containing_dir(&self.vector_file))
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Directory holding both tables.
    pub output_dir: PathBuf,
    /// Where the tables were written.
    pub paths: OutputPaths,
    /// Circle records processed.
    pub circle_count: usize,
    /// Rows in `Bubbles.csv`, excluding the header.
    pub slice_count: usize,
    /// Rows in `Colors.csv`, excluding the header.
    pub color_count: usize,
}

/// Run with a generator seeded from `seed`.
///
/// # Errors
///
/// See [`run_with`].
pub fn run(options: &RunOptions, seed: u64) -> Result<RunReport, RunError> {
    tracing::info!(seed, "seeding slice generator");
    run_with(options, RngSource::seeded(seed))
}

/// Run the full pipeline against the filesystem.
///
/// Inputs are read first; the output files are then opened, filled
/// circle by circle, and only moved into place once everything has
/// succeeded.
///
/// # Errors
///
/// Returns [`RunError::Read`] if an input cannot be read,
/// [`RunError::Input`] if an input is rejected (undecodable image,
/// malformed circle record, circle outside the image),
/// [`RunError::Write`] if an output cannot be written, and
/// [`RunError::Pipeline`] for an invalid configuration.
#[tracing::instrument(skip_all, fields(vector = %options.vector_file.display()))]
pub fn run_with<R: RandomSource>(options: &RunOptions, rng: R) -> Result<RunReport, RunError> {
    options.config.validate()?;

    let svg_text = fs::read_to_string(&options.vector_file).map_err(|source| RunError::Read {
        path: options.vector_file.clone(),
        source,
    })?;
    let image_bytes = fs::read(&options.image_file).map_err(|source| RunError::Read {
        path: options.image_file.clone(),
        source,
    })?;
    let sampler = ColorSampler::decode(&image_bytes).map_err(|source| RunError::Input {
        path: options.image_file.clone(),
        source,
    })?;
    let dims = sampler.dimensions();
    tracing::info!(
        image = %options.image_file.display(),
        width = dims.width,
        height = dims.height,
        "loaded image"
    );

    let output_dir = options.output_dir();
    let mut output = OutputFiles::create(&output_dir)?;

    let summary = process_streaming(&svg_text, &sampler, &options.config, rng, |slices| {
        output.write_slices(slices)
    })
    .map_err(|err| err.in_file(&options.vector_file))?;
    debug_assert_eq!(output.bubble_rows(), summary.slice_count);

    tracing::info!(
        circles = summary.circle_count,
        slices = summary.slice_count,
        colors = summary.palette.len(),
        "processed circles"
    );

    let paths = output.commit(&summary.palette)?;
    tracing::info!(
        bubbles = %paths.bubbles.display(),
        colors = %paths.colors.display(),
        "wrote tables"
    );

    Ok(RunReport {
        output_dir,
        paths,
        circle_count: summary.circle_count,
        slice_count: summary.slice_count,
        color_count: summary.palette.len(),
    })
}

/// Parent directory of `file`, `.` for a bare file name.
fn containing_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_owned(),
        _ => PathBuf::from("."),
    }
}
