//! Circle record extraction from circle-packer SVG output.
//!
//! The packer writes one `<use>` element per circle, on its own line:
//!
//! ```text
//!  <use xlink:href="#c" transform="translate(100.5,200.25) scale(3.2)" />
//! ```
//!
//! This reader only understands that emitted pattern. It splits the line
//! around the literal `translate(`, `,`, `) scale(` and `)` markers
//! rather than parsing SVG, so any other producer is unsupported.

use std::iter::{Enumerate, FusedIterator};
use std::str::Lines;

use crate::types::{Circle, PipelineError};

/// Leading signature of a circle record.
///
/// The packer indents top-level `<use>` elements by exactly one space;
/// `<use>` elements at any other depth are not circles.
pub const RECORD_PREFIX: &str = " <use xlink:";

const TRANSLATE_MARKER: &str = "translate(";
const COORD_SEPARATOR: char = ',';
const SCALE_MARKER: &str = ") scale(";
const CLOSE_MARKER: char = ')';

/// Iterate the circle records in `text`, in file order.
///
/// Lines that are not circle records are skipped. Sequence ids start
/// at 1 and count qualifying lines only.
///
/// The iterator yields `Err` for the first malformed record and then
/// ends; callers are expected to abort on it.
///
/// # Examples
///
/// ```
/// use pieart_pipeline::parse::parse_circles;
///
/// let svg = "<svg>\n <use xlink:href=\"#c\" transform=\"translate(4,5) scale(2)\" />\n</svg>";
/// let circles: Vec<_> = parse_circles(svg).collect::<Result<_, _>>().unwrap();
/// assert_eq!(circles.len(), 1);
/// assert_eq!(circles[0].sequence_id, 1);
/// assert_eq!(circles[0].radius, 2.0);
/// ```
#[must_use = "the iterator is lazy and does nothing unless consumed"]
pub fn parse_circles(text: &str) -> CircleRecords<'_> {
    CircleRecords {
        lines: text.lines().enumerate(),
        next_id: 1,
        failed: false,
    }
}

/// Returns `true` if `line` is a circle record.
#[must_use]
pub fn is_circle_record(line: &str) -> bool {
    line.starts_with(RECORD_PREFIX)
}

/// Lazy iterator over the circle records of a vector file.
///
/// Created by [`parse_circles`].
#[derive(Debug, Clone)]
pub struct CircleRecords<'a> {
    lines: Enumerate<Lines<'a>>,
    next_id: u32,
    failed: bool,
}

impl Iterator for CircleRecords<'_> {
    type Item = Result<Circle, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        for (index, line) in self.lines.by_ref() {
            if !is_circle_record(line) {
                continue;
            }

            let result = parse_record(line, index + 1, self.next_id);
            match &result {
                Ok(circle) => {
                    tracing::trace!(?circle, "parsed circle record");
                    self.next_id += 1;
                }
                Err(_) => self.failed = true,
            }
            return Some(result);
        }
        None
    }
}

impl FusedIterator for CircleRecords<'_> {}

fn parse_record(line: &str, line_number: usize, sequence_id: u32) -> Result<Circle, PipelineError> {
    let missing = |marker: &str| PipelineError::Format {
        line: line_number,
        message: format!("missing {marker:?}"),
    };

    let (_, rest) = line
        .split_once(TRANSLATE_MARKER)
        .ok_or_else(|| missing(TRANSLATE_MARKER))?;
    let (x, rest) = rest
        .split_once(COORD_SEPARATOR)
        .ok_or_else(|| missing(","))?;
    let (y, rest) = rest
        .split_once(SCALE_MARKER)
        .ok_or_else(|| missing(SCALE_MARKER))?;
    let (radius, _) = rest
        .split_once(CLOSE_MARKER)
        .ok_or_else(|| missing(")"))?;

    Ok(Circle::new(
        sequence_id,
        number(x, "x offset", line_number)?,
        number(y, "y offset", line_number)?,
        number(radius, "scale", line_number)?,
    ))
}

fn number(token: &str, what: &str, line_number: usize) -> Result<f64, PipelineError> {
    let trimmed = token.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(PipelineError::Format {
            line: line_number,
            message: format!("{what} {trimmed:?} is not a finite number"),
        }),
    }
}
