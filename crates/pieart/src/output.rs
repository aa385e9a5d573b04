//! Output files with all-or-nothing finalization.
//!
//! Both tables are streamed into `<name>.partial` files in the output
//! directory and renamed into place only by [`OutputFiles::commit`].
//! Dropping an uncommitted [`OutputFiles`] removes the partial files,
//! so a failed run leaves no finalized or half-written tables behind.

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use pieart_export::{BUBBLES_FILE_NAME, BubblesWriter, COLORS_FILE_NAME, ColorsWriter};
use pieart_pipeline::{Palette, Slice};

use crate::error::RunError;

/// Suffix of in-progress output files.
pub const PARTIAL_SUFFIX: &str = ".partial";

/// Final locations of a committed run's tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// `Bubbles.csv`.
    pub bubbles: PathBuf,
    /// `Colors.csv`.
    pub colors: PathBuf,
}

/// Both output tables, open and in progress.
#[derive(Debug)]
pub struct OutputFiles {
    bubbles: BubblesWriter<BufWriter<File>>,
    colors: ColorsWriter<BufWriter<File>>,
    bubbles_guard: PartialFile,
    colors_guard: PartialFile,
}

impl OutputFiles {
    /// Create both partial files in `dir` and write their headers.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Write`] if either file cannot be created or
    /// its header cannot be written.
    pub fn create(dir: &Path) -> Result<Self, RunError> {
        let (bubbles_file, bubbles_guard) = PartialFile::create(dir.join(BUBBLES_FILE_NAME))?;
        let (colors_file, colors_guard) = PartialFile::create(dir.join(COLORS_FILE_NAME))?;

        let bubbles = BubblesWriter::new(BufWriter::new(bubbles_file))
            .map_err(|source| bubbles_guard.write_error(source))?;
        let colors = ColorsWriter::new(BufWriter::new(colors_file))
            .map_err(|source| colors_guard.write_error(source))?;

        Ok(Self {
            bubbles,
            colors,
            bubbles_guard,
            colors_guard,
        })
    }

    /// Append one circle's slices to `Bubbles.csv`.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Write`] on any I/O failure.
    pub fn write_slices(&mut self, slices: &[Slice]) -> Result<(), RunError> {
        self.bubbles
            .write_slices(slices)
            .map_err(|source| self.bubbles_guard.write_error(source))
    }

    /// Rows written to `Bubbles.csv` so far.
    pub const fn bubble_rows(&self) -> usize {
        self.bubbles.rows()
    }

    /// Write the palette, flush both tables, and move them into place.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Write`] if flushing or renaming fails. The
    /// partial files are removed in that case.
    pub fn commit(self, palette: &Palette) -> Result<OutputPaths, RunError> {
        let Self {
            bubbles,
            colors,
            mut bubbles_guard,
            mut colors_guard,
        } = self;

        let bubbles_file = bubbles
            .finish()
            .and_then(into_file)
            .map_err(|source| bubbles_guard.write_error(source))?;
        let colors_file = colors
            .finish(palette)
            .and_then(into_file)
            .map_err(|source| colors_guard.write_error(source))?;
        drop((bubbles_file, colors_file));

        let bubbles = bubbles_guard.finalize()?;
        let colors = colors_guard.finalize().inspect_err(|_| {
            // Never leave one finalized table without the other.
            let _ = fs::remove_file(&bubbles);
        })?;
        Ok(OutputPaths { bubbles, colors })
    }
}

fn into_file(writer: BufWriter<File>) -> io::Result<File> {
    writer.into_inner().map_err(io::IntoInnerError::into_error)
}

/// Removes its partial file on drop unless finalized.
#[derive(Debug)]
struct PartialFile {
    partial: PathBuf,
    target: PathBuf,
    finalized: bool,
}

impl PartialFile {
    fn create(target: PathBuf) -> Result<(File, Self), RunError> {
        let mut partial = target.clone().into_os_string();
        partial.push(PARTIAL_SUFFIX);
        let partial = PathBuf::from(partial);

        let file = File::create(&partial).map_err(|source| RunError::Write {
            path: partial.clone(),
            source,
        })?;
        tracing::debug!(path = %partial.display(), "created partial output");
        Ok((
            file,
            Self {
                partial,
                target,
                finalized: false,
            },
        ))
    }

    fn write_error(&self, source: io::Error) -> RunError {
        RunError::Write {
            path: self.partial.clone(),
            source,
        }
    }

    fn finalize(&mut self) -> Result<PathBuf, RunError> {
        fs::rename(&self.partial, &self.target).map_err(|source| RunError::Write {
            path: self.target.clone(),
            source,
        })?;
        self.finalized = true;
        Ok(self.target.clone())
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if self.finalized {
            return;
        }
        if let Err(err) = fs::remove_file(&self.partial) {
            if err.kind() != io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %self.partial.display(),
                    %err,
                    "could not remove partial output"
                );
            }
        } else {
            tracing::debug!(path = %self.partial.display(), "removed partial output");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use pieart_pipeline::{Circle, Rgb};

    use super::*;

    fn slice(label: char) -> Slice {
        Slice {
            circle: Circle::new(1, 2.0, 3.0, 1.0),
            label,
            color: Rgb::new(0, 0, 0),
            color_index: 0,
            weight: 0.5,
        }
    }

    fn names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn files_are_partial_until_commit() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = OutputFiles::create(dir.path()).unwrap();
        out.write_slices(&[slice('A'), slice('B')]).unwrap();
        assert_eq!(out.bubble_rows(), 2);
        assert_eq!(names(dir.path()), ["Bubbles.csv.partial", "Colors.csv.partial"]);

        let mut palette = Palette::new();
        palette.register("000000");
        let paths = out.commit(&palette).unwrap();

        assert_eq!(names(dir.path()), ["Bubbles.csv", "Colors.csv"]);
        assert_eq!(paths.bubbles, dir.path().join("Bubbles.csv"));
        let bubbles = fs::read_to_string(&paths.bubbles).unwrap();
        assert_eq!(bubbles.lines().count(), 3);
        let colors = fs::read_to_string(&paths.colors).unwrap();
        assert_eq!(colors, "Color ID,Hex Color\n0,<color>#000000</color>\n");
    }

    #[test]
    fn dropping_uncommitted_output_removes_partials() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut out = OutputFiles::create(dir.path()).unwrap();
            out.write_slices(&[slice('A')]).unwrap();
        }
        assert!(names(dir.path()).is_empty());
    }

    #[test]
    fn missing_directory_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let result = OutputFiles::create(&missing);
        match result {
            Err(RunError::Write { path, .. }) => {
                assert_eq!(path, missing.join("Bubbles.csv.partial"));
            }
            other => panic!("expected write error, got {other:?}"),
        }
    }
}
