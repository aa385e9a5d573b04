//! pieart-export: Pure CSV serializers (sans-IO)
//!
//! Converts slices and palettes into the two tables the charting tool
//! imports: `Bubbles.csv` and `Colors.csv`. Output is UTF-8,
//! comma-separated, with a header row and `\n` line endings.
//!
//! Each table has a serde record type, an incremental writer over any
//! [`std::io::Write`] for streaming runs, and a `to_*_csv` helper that
//! renders the whole table to a `String`.

pub mod bubbles;
pub mod colors;

use std::io;

pub use bubbles::{BUBBLES_FILE_NAME, BUBBLES_HEADER, BubbleRecord, BubblesWriter, to_bubbles_csv};
pub use colors::{COLORS_FILE_NAME, COLORS_HEADER, ColorRecord, ColorsWriter, to_colors_csv};

/// CSV writer with `\n` terminators.
///
/// Automatic headers are off; each table writes its header explicitly
/// so that a table with no rows still has one.
fn csv_writer<W: io::Write>(out: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out)
}

/// Flush `writer` and hand back the underlying sink.
fn into_sink<W: io::Write>(mut writer: csv::Writer<W>) -> io::Result<W> {
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|err| io::Error::new(err.error().kind(), err.to_string()))
}

fn into_string(bytes: Vec<u8>) -> io::Result<String> {
    String::from_utf8(bytes).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}
