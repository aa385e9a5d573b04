//! `Colors.csv` serializer.
//!
//! One row per palette entry, in registration order, with the hex color
//! wrapped in the `<color>` markup the charting tool's palette import
//! expects:
//!
//! ```text
//! Color ID,Hex Color
//! 0,<color>#0a141e</color>
//! ```

use std::fmt;
use std::io::{self, Write};

use pieart_pipeline::Palette;
use serde::{Serialize, Serializer};

/// File name of the palette table.
pub const COLORS_FILE_NAME: &str = "Colors.csv";

/// Column names of the palette table, in order.
pub const COLORS_HEADER: [&str; 2] = ["Color ID", "Hex Color"];

fn color_markup<S: Serializer>(hex: &&str, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("<color>#{hex}</color>"))
}

/// One `Colors.csv` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorRecord<'a> {
    /// Palette index.
    #[serde(rename = "Color ID")]
    pub color_id: usize,
    /// Six-digit hex color without `#`; written inside `<color>` markup.
    #[serde(rename = "Hex Color", serialize_with = "color_markup")]
    pub hex: &'a str,
}

/// Serialize a palette into a complete `Colors.csv` string.
///
/// # Errors
///
/// Returns an error only if a record fails to serialize.
pub fn to_colors_csv(palette: &Palette) -> io::Result<String> {
    crate::into_string(ColorsWriter::new(Vec::new())?.finish(palette)?)
}

/// Incremental `Colors.csv` writer.
///
/// The header goes out on construction, before any circle is processed;
/// the palette rows follow once the palette is complete.
pub struct ColorsWriter<W: Write> {
    out: csv::Writer<W>,
}

impl<W: Write> ColorsWriter<W> {
    /// Wrap `out` and write the header row.
    ///
    /// # Errors
    ///
    /// Returns any error from writing the header.
    pub fn new(out: W) -> io::Result<Self> {
        let mut out = crate::csv_writer(out);
        out.write_record(COLORS_HEADER)?;
        Ok(Self { out })
    }

    /// Write every palette entry, flush, and return the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns any error from writing or flushing.
    pub fn finish(mut self, palette: &Palette) -> io::Result<W> {
        for (color_id, hex) in palette.iter() {
            self.out.serialize(ColorRecord { color_id, hex })?;
        }
        crate::into_sink(self.out)
    }
}

impl<W: Write> fmt::Debug for ColorsWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorsWriter").finish_non_exhaustive()
    }
}
