//! pieart: turn a circle-packed SVG and its source image into pie-chart
//! slice and palette tables for a charting tool.
//!
//! Circles come from the `<use>` records a circle packer emits. Each
//! circle takes the image color under its center and becomes several
//! pie slices in slightly varied shades.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin pieart -- [OPTIONS] [SVG_FILE] [IMAGE_FILE]
//! ```
//!
//! Paths left off the command line are prompted for on a terminal.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pieart::{InputResolver, PromptResolver, RunError, RunOptions};
use pieart_pipeline::PipelineConfig;
use tracing_subscriber::EnvFilter;

/// Convert circle-packer SVG output plus the original image into
/// `Bubbles.csv` (one row per pie slice) and `Colors.csv` (the palette).
#[derive(Parser)]
#[command(name = "pieart", version)]
struct Cli {
    /// Circle-packer SVG file. Prompted for when omitted.
    svg_file: Option<PathBuf>,

    /// Original image the circles were packed from (PNG, JPEG, BMP,
    /// WebP). Prompted for when omitted.
    image_file: Option<PathBuf>,

    /// Pie slices per circle, including the unvaried base slice.
    #[arg(
        long,
        default_value_t = PipelineConfig::DEFAULT_SLICE_COUNT,
        value_parser = clap::builder::RangedU64ValueParser::<u8>::new()
            .range(1..=u64::from(PipelineConfig::MAX_SLICE_COUNT)),
    )]
    slice_count: u8,

    /// Maximum per-channel color shift for varied slices.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_COLOR_VARIANCE)]
    color_variance: u8,

    /// Full pipeline config as a JSON string.
    ///
    /// When provided, `--slice-count` and `--color-variance` are
    /// ignored. Missing fields take their defaults.
    #[arg(long)]
    config_json: Option<String>,

    /// Seed for slice colors and sizes. Random when omitted; the seed
    /// used is logged so a run can be reproduced.
    #[arg(long)]
    seed: Option<u64>,

    /// Write the tables here instead of next to the SVG file.
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Build a [`PipelineConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual parameter flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<PipelineConfig, RunError> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json)
            .map_err(|e| RunError::Config(format!("error parsing --config-json: {e}")));
    }

    Ok(PipelineConfig {
        slice_count: cli.slice_count,
        color_variance: cli.color_variance,
    })
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn try_main(cli: Cli) -> Result<pieart::RunReport, RunError> {
    let config = config_from_cli(&cli)?;

    let mut resolver = PromptResolver::new(
        cli.svg_file,
        cli.image_file,
        io::stdin().is_terminal(),
        io::stdin().lock(),
        io::stderr(),
    );
    let vector_file = resolver.resolve_vector_file_path()?;
    let image_file = resolver.resolve_image_path()?;

    let options = RunOptions {
        vector_file,
        image_file,
        output_dir: cli.output_dir,
        config,
    };
    let seed = cli.seed.unwrap_or_else(rand::random);
    pieart::run(&options, seed)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match try_main(cli) {
        Ok(report) => {
            println!(
                "Output files {} and {} have been written to the following directory: {}",
                pieart_export::BUBBLES_FILE_NAME,
                pieart_export::COLORS_FILE_NAME,
                report.output_dir.display(),
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
