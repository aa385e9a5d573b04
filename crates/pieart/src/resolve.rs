//! Input file resolution.
//!
//! Paths given on the command line are used as-is. Missing ones are
//! prompted for on an interactive terminal; a blank answer, end of
//! input, or a non-interactive session means the user declined.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::error::RunError;

/// Supplies the two input paths for a run.
pub trait InputResolver {
    /// Path of the circle-packer SVG file.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::InputMissing`] if no file was supplied.
    fn resolve_vector_file_path(&mut self) -> Result<PathBuf, RunError>;

    /// Path of the source image.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::InputMissing`] if no file was supplied.
    fn resolve_image_path(&mut self) -> Result<PathBuf, RunError>;
}

/// Uses preset paths where available and prompts for the rest.
#[derive(Debug)]
pub struct PromptResolver<I, O> {
    vector_file: Option<PathBuf>,
    image_file: Option<PathBuf>,
    interactive: bool,
    input: I,
    output: O,
}

impl<I: BufRead, O: Write> PromptResolver<I, O> {
    /// Create a resolver.
    ///
    /// Prompts are written to `output` and answers read from `input`,
    /// only when `interactive` is set.
    pub const fn new(
        vector_file: Option<PathBuf>,
        image_file: Option<PathBuf>,
        interactive: bool,
        input: I,
        output: O,
    ) -> Self {
        Self {
            vector_file,
            image_file,
            interactive,
            input,
            output,
        }
    }

    fn prompt(&mut self, question: &str, what: &'static str) -> Result<PathBuf, RunError> {
        if !self.interactive {
            return Err(RunError::InputMissing(what));
        }

        // A prompt that cannot be shown or answered counts as declined.
        if write!(self.output, "{question}: ")
            .and_then(|()| self.output.flush())
            .is_err()
        {
            return Err(RunError::InputMissing(what));
        }
        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) | Err(_) => return Err(RunError::InputMissing(what)),
            Ok(_) => {}
        }

        let path = unquote(answer.trim());
        if path.is_empty() {
            return Err(RunError::InputMissing(what));
        }
        Ok(PathBuf::from(path))
    }
}

impl<I: BufRead, O: Write> InputResolver for PromptResolver<I, O> {
    fn resolve_vector_file_path(&mut self) -> Result<PathBuf, RunError> {
        match self.vector_file.take() {
            Some(path) => Ok(path),
            None => self.prompt("Select SVG file from packer", "SVG file"),
        }
    }

    fn resolve_image_path(&mut self) -> Result<PathBuf, RunError> {
        match self.image_file.take() {
            Some(path) => Ok(path),
            None => self.prompt("Select original image file", "image file"),
        }
    }
}

/// Strip one pair of matching quotes, as left by drag-and-drop into a
/// terminal.
fn unquote(text: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = text
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    text
}
