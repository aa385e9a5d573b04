//! Run-level errors. Every variant is fatal.

use std::io;
use std::path::{Path, PathBuf};

use pieart_pipeline::PipelineError;

/// Why a run failed.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The user declined to supply an input file.
    #[error("no {0} selected")]
    InputMissing(&'static str),

    /// An input file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// An output file could not be created, written, or finalized.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// File being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// An input file was read but its contents were rejected.
    #[error("{}: {source}", path.display())]
    Input {
        /// The offending input file.
        path: PathBuf,
        /// What the pipeline rejected.
        source: PipelineError,
    },

    /// A pipeline error not yet attributed to a file.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// The configuration could not be built.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl RunError {
    /// Attribute an unattributed pipeline error to `path`.
    #[must_use]
    pub fn in_file(self, path: &Path) -> Self {
        match self {
            Self::Pipeline(source) => Self::Input {
                path: path.to_owned(),
                source,
            },
            other => other,
        }
    }
}
