//! `Bubbles.csv` serializer.
//!
//! One row per slice, grouped by circle:
//!
//! ```text
//! ID,X,Y,Size,Slice,Color ID,Slice Size
//! 1,100.5,200.25,32.169908772759484,A,0,0.4
//! 1,100.5,200.25,32.169908772759484,B,1,0.8
//! ```
//!
//! `Size` is the circle area, not the radius. Floats are written in
//! shortest round-trip decimal form and always carry a decimal point.

use std::fmt;
use std::io::{self, Write};

use pieart_pipeline::Slice;
use serde::{Serialize, Serializer};

/// File name of the slice table.
pub const BUBBLES_FILE_NAME: &str = "Bubbles.csv";

/// Column names of the slice table, in order.
pub const BUBBLES_HEADER: [&str; 7] = ["ID", "X", "Y", "Size", "Slice", "Color ID", "Slice Size"];

/// Format a float as shortest round-trip decimal with a decimal point.
///
/// ```
/// use pieart_export::bubbles::format_float;
///
/// assert_eq!(format_float(100.0), "100.0");
/// assert_eq!(format_float(200.25), "200.25");
/// assert_eq!(format_float(-0.5), "-0.5");
/// ```
#[must_use]
pub fn format_float(value: f64) -> String {
    let mut text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        text.push_str(".0");
    }
    text
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn decimal<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_float(*value))
}

/// One `Bubbles.csv` row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BubbleRecord {
    /// Circle sequence id.
    #[serde(rename = "ID")]
    pub id: u32,
    #[serde(rename = "X", serialize_with = "decimal")]
    pub x: f64,
    #[serde(rename = "Y", serialize_with = "decimal")]
    pub y: f64,
    /// Circle area.
    #[serde(rename = "Size", serialize_with = "decimal")]
    pub size: f64,
    #[serde(rename = "Slice")]
    pub slice: char,
    /// Palette index of the slice color.
    #[serde(rename = "Color ID")]
    pub color_id: usize,
    /// The slice's random weight.
    #[serde(rename = "Slice Size", serialize_with = "decimal")]
    pub slice_size: f64,
}

impl From<&Slice> for BubbleRecord {
    fn from(slice: &Slice) -> Self {
        let circle = &slice.circle;
        Self {
            id: circle.sequence_id,
            x: circle.center_x,
            y: circle.center_y,
            size: circle.area(),
            slice: slice.label,
            color_id: slice.color_index,
            slice_size: slice.weight,
        }
    }
}

/// Serialize slices into a complete `Bubbles.csv` string.
///
/// # Errors
///
/// Returns an error only if a record fails to serialize.
pub fn to_bubbles_csv(slices: &[Slice]) -> io::Result<String> {
    let mut writer = BubblesWriter::new(Vec::new())?;
    writer.write_slices(slices)?;
    crate::into_string(writer.finish()?)
}

/// Incremental `Bubbles.csv` writer.
///
/// The header is written on construction; rows are appended as each
/// circle's slices arrive.
pub struct BubblesWriter<W: Write> {
    out: csv::Writer<W>,
    rows: usize,
}

impl<W: Write> BubblesWriter<W> {
    /// Wrap `out` and write the header row.
    ///
    /// # Errors
    ///
    /// Returns any error from writing the header.
    pub fn new(out: W) -> io::Result<Self> {
        let mut out = crate::csv_writer(out);
        out.write_record(BUBBLES_HEADER)?;
        Ok(Self { out, rows: 0 })
    }

    /// Append one row per slice.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write_slices(&mut self, slices: &[Slice]) -> io::Result<()> {
        for slice in slices {
            self.out.serialize(BubbleRecord::from(slice))?;
            self.rows += 1;
        }
        Ok(())
    }

    /// Rows written so far, excluding the header.
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Flush and return the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns any error from flushing.
    pub fn finish(self) -> io::Result<W> {
        crate::into_sink(self.out)
    }
}

impl<W: Write> fmt::Debug for BubblesWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BubblesWriter")
            .field("rows", &self.rows)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pieart_pipeline::{Circle, Rgb};

    use super::*;

    fn slice(id: u32, label: char, color_index: usize, weight: f64) -> Slice {
        Slice {
            circle: Circle::new(id, 100.5, 200.25, 3.2),
            label,
            color: Rgb::new(10, 20, 30),
            color_index,
            weight,
        }
    }

    #[test]
    fn format_float_keeps_decimal_point() {
        assert_eq!(format_float(0.0), "0.0");
        assert_eq!(format_float(7.0), "7.0");
        assert_eq!(format_float(0.125), "0.125");
        assert_eq!(format_float(1e20), "100000000000000000000.0");
    }

    #[test]
    fn format_float_never_uses_exponent() {
        assert_eq!(format_float(1e16), "10000000000000000.0");
        assert_eq!(format_float(3e-5), "0.00003");
    }

    #[test]
    fn format_float_round_trips() {
        for value in [0.1, 1.0 / 3.0, 32.169_908_772_759_484, 0.000_012_34, 98_765.432_1] {
            assert_eq!(format_float(value).parse::<f64>().unwrap(), value);
        }
    }

    #[test]
    fn record_field_names_match_header() {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(true)
            .from_writer(Vec::new());
        writer.serialize(BubbleRecord::from(&slice(1, 'A', 0, 0.5))).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(text.lines().next().unwrap(), BUBBLES_HEADER.join(","));
    }

    #[test]
    fn row_columns_in_header_order() {
        let csv = to_bubbles_csv(&[slice(1, 'B', 3, 0.75)]).unwrap();
        let row = csv.lines().nth(1).unwrap();
        let columns: Vec<&str> = row.split(',').collect();
        assert_eq!(columns.len(), BUBBLES_HEADER.len());
        assert_eq!(columns[0], "1");
        assert_eq!(columns[1], "100.5");
        assert_eq!(columns[2], "200.25");
        let area: f64 = columns[3].parse().unwrap();
        assert!((area - std::f64::consts::PI * 3.2 * 3.2).abs() < 1e-9);
        assert_eq!(columns[4], "B");
        assert_eq!(columns[5], "3");
        assert_eq!(columns[6], "0.75");
    }

    #[test]
    fn integral_floats_keep_decimal_point_in_rows() {
        let mut whole = slice(2, 'A', 0, 0.0);
        whole.circle = Circle::new(2, 100.0, 7.0, 0.0);
        let csv = to_bubbles_csv(&[whole]).unwrap();
        assert_eq!(csv.lines().nth(1).unwrap(), "2,100.0,7.0,0.0,A,0,0.0");
    }

    #[test]
    fn empty_table_is_header_only() {
        assert_eq!(
            to_bubbles_csv(&[]).unwrap(),
            "ID,X,Y,Size,Slice,Color ID,Slice Size\n"
        );
    }

    #[test]
    fn chunked_writes_match_single_write() {
        let slices = [slice(1, 'A', 0, 0.5), slice(1, 'B', 1, 0.25), slice(2, 'A', 0, 0.0)];

        let mut writer = BubblesWriter::new(Vec::new()).unwrap();
        writer.write_slices(&slices[..2]).unwrap();
        writer.write_slices(&slices[2..]).unwrap();
        assert_eq!(writer.rows(), 3);
        let bytes = writer.finish().unwrap();

        assert_eq!(String::from_utf8(bytes).unwrap(), to_bubbles_csv(&slices).unwrap());
    }

    #[test]
    fn lines_end_with_newline_only() {
        let csv = to_bubbles_csv(&[slice(1, 'A', 0, 0.5)]).unwrap();
        assert!(!csv.contains('\r'));
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.ends_with('\n'));
    }
}
