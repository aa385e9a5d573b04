//! Shared types for the pieart pipeline.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Re-export `RgbImage` so downstream crates can hand a decoded image
/// to the sampler without depending on `image` directly.
pub use image::RgbImage;

/// One packed circle read from the vector file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// 1-based position of this record among all circle records.
    pub sequence_id: u32,
    /// Horizontal center (pixels from left edge).
    pub center_x: f64,
    /// Vertical center (pixels from top edge).
    pub center_y: f64,
    /// Radius, taken from the record's `scale(..)` factor.
    pub radius: f64,
}

impl Circle {
    /// Create a new circle record.
    #[must_use]
    pub const fn new(sequence_id: u32, center_x: f64, center_y: f64, radius: f64) -> Self {
        Self {
            sequence_id,
            center_x,
            center_y,
            radius,
        }
    }

    /// Area of the circle, `π · radius²`.
    #[must_use]
    pub fn area(&self) -> f64 {
        PI * self.radius.powi(2)
    }
}

/// An 8-bit RGB color.
///
/// The external form is six lowercase hex digits with no leading `#`,
/// e.g. `0a141e` for `(10, 20, 30)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    /// Create a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Red channel.
    #[must_use]
    pub const fn r(self) -> u8 {
        self.0[0]
    }

    /// Green channel.
    #[must_use]
    pub const fn g(self) -> u8 {
        self.0[1]
    }

    /// Blue channel.
    #[must_use]
    pub const fn b(self) -> u8 {
        self.0[2]
    }

    /// Lowercase, zero-padded hex form without a leading `#`.
    #[must_use]
    pub fn to_hex(self) -> String {
        self.to_string()
    }

    /// Parse six hex digits (either case), optionally prefixed by `#`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidHexColor`] if the input is not
    /// exactly six hex digits after the optional prefix.
    pub fn from_hex(hex: &str) -> Result<Self, PipelineError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(PipelineError::InvalidHexColor(hex.to_owned()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| PipelineError::InvalidHexColor(hex.to_owned()))
        };
        Ok(Self([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}{:02x}", self.0[0], self.0[1], self.0[2])
    }
}

impl FromStr for Rgb {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<image::Rgb<u8>> for Rgb {
    fn from(pixel: image::Rgb<u8>) -> Self {
        Self(pixel.0)
    }
}

/// One pie-chart wedge derived from a circle.
///
/// All slices of a circle share its position and size; they differ in
/// label, color, and weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slice {
    /// The circle this slice belongs to.
    pub circle: Circle,
    /// Slice letter, `'A'` for the sampled color, then `'B'`, `'C'`, ...
    pub label: char,
    /// The slice color.
    pub color: Rgb,
    /// Index of `color` in the run's [`Palette`](crate::Palette).
    pub color_index: usize,
    /// Independent random weight in `[0, 1)`. Not normalized per circle.
    pub weight: f64,
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Tunables for slice generation.
///
/// Missing fields deserialize to their defaults, so a partial JSON
/// object such as `{"slice_count": 6}` is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Slices generated per circle, including the unjittered `'A'` slice.
    ///
    /// Must be in `1..=`[`Self::MAX_SLICE_COUNT`] so every slice gets a
    /// single-letter label.
    pub slice_count: u8,

    /// Jitter magnitude. Each channel of a jittered slice moves by a
    /// random amount in `[0, color_variance)` before rounding.
    pub color_variance: u8,
}

impl PipelineConfig {
    /// Default number of slices per circle.
    pub const DEFAULT_SLICE_COUNT: u8 = 4;

    /// Default jitter magnitude.
    pub const DEFAULT_COLOR_VARIANCE: u8 = 10;

    /// One slice per letter `A`..=`Z`.
    pub const MAX_SLICE_COUNT: u8 = 26;

    /// Check the config invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if `slice_count` is zero
    /// or exceeds [`Self::MAX_SLICE_COUNT`].
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.slice_count == 0 || self.slice_count > Self::MAX_SLICE_COUNT {
            return Err(PipelineError::InvalidConfig(format!(
                "slice_count must be between 1 and {}, got {}",
                Self::MAX_SLICE_COUNT,
                self.slice_count,
            )));
        }
        Ok(())
    }

    /// Labels for one circle's slices, in output order.
    pub fn slice_labels(&self) -> impl Iterator<Item = char> + use<> {
        ('A'..='Z').take(usize::from(self.slice_count))
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            slice_count: Self::DEFAULT_SLICE_COUNT,
            color_variance: Self::DEFAULT_COLOR_VARIANCE,
        }
    }
}

/// Result of running the whole pipeline in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessResult {
    /// Every slice, grouped by circle, labels ascending within a circle.
    pub slices: Vec<Slice>,

    /// All colors used, in first-seen order.
    pub palette: crate::Palette,

    /// Number of circle records parsed.
    pub circle_count: usize,

    /// Dimensions of the sampled image.
    pub dimensions: Dimensions,
}

/// Errors that can occur during pipeline processing.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// A circle record in the vector file could not be read.
    #[error("malformed circle record on line {line}: {message}")]
    Format {
        /// 1-based line number in the vector file.
        line: usize,
        /// What was wrong with the record.
        message: String,
    },

    /// A circle center lies outside the sampled image.
    #[error("pixel ({x}, {y}) is outside the {width}x{height} image")]
    ImageBounds {
        /// Requested horizontal coordinate.
        x: f64,
        /// Requested vertical coordinate.
        y: f64,
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },

    /// A string was not a six-digit hex color.
    #[error("invalid hex color: {0:?}")]
    InvalidHexColor(String),

    /// Pipeline configuration is invalid.
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // --- Circle tests ---

    #[test]
    fn circle_area_is_pi_r_squared() {
        for radius in [0.0, 1.0, 3.2, 17.75, 1234.5] {
            let circle = Circle::new(1, 0.0, 0.0, radius);
            let expected = PI * radius * radius;
            assert!(
                (circle.area() - expected).abs() <= expected * 1e-12,
                "radius {radius}: {} != {expected}",
                circle.area(),
            );
        }
    }

    // --- Rgb tests ---

    #[test]
    fn hex_is_lowercase_and_zero_padded() {
        assert_eq!(Rgb::new(10, 20, 30).to_hex(), "0a141e");
        assert_eq!(Rgb::new(0, 0, 0).to_hex(), "000000");
        assert_eq!(Rgb::new(255, 171, 205).to_hex(), "ffabcd");
    }

    #[test]
    fn hex_round_trips_for_every_channel_value() {
        for v in 0..=255u8 {
            for c in [
                Rgb::new(v, 0, 0),
                Rgb::new(0, v, 0),
                Rgb::new(0, 0, v),
                Rgb::new(v, 255 - v, v / 2),
            ] {
                assert_eq!(Rgb::from_hex(&c.to_hex()).unwrap(), c);
            }
        }
    }

    #[test]
    fn from_hex_accepts_prefix_and_uppercase() {
        assert_eq!(Rgb::from_hex("#0A141E").unwrap(), Rgb::new(10, 20, 30));
        assert_eq!("ffffff".parse::<Rgb>().unwrap(), Rgb::new(255, 255, 255));
    }

    #[test]
    fn from_hex_rejects_malformed() {
        for bad in ["", "12345", "1234567", "gg0000", "+f0000", "#12 456"] {
            assert!(
                matches!(Rgb::from_hex(bad), Err(PipelineError::InvalidHexColor(_))),
                "expected {bad:?} to be rejected",
            );
        }
    }

    #[test]
    fn rgb_from_image_pixel() {
        let c: Rgb = image::Rgb([1, 2, 3]).into();
        assert_eq!((c.r(), c.g(), c.b()), (1, 2, 3));
    }

    // --- PipelineConfig tests ---

    #[test]
    fn default_config_matches_constants() {
        let config = PipelineConfig::default();
        assert_eq!(config.slice_count, 4);
        assert_eq!(config.color_variance, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn slice_count_out_of_range_is_invalid() {
        for slice_count in [0, 27, 255] {
            let config = PipelineConfig {
                slice_count,
                ..PipelineConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(PipelineError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn slice_labels_start_at_a() {
        let config = PipelineConfig {
            slice_count: 3,
            ..PipelineConfig::default()
        };
        assert_eq!(config.slice_labels().collect::<String>(), "ABC");

        let config = PipelineConfig {
            slice_count: PipelineConfig::MAX_SLICE_COUNT,
            ..PipelineConfig::default()
        };
        assert_eq!(config.slice_labels().last(), Some('Z'));
    }

    #[test]
    fn partial_config_json_uses_defaults() {
        let config: PipelineConfig = serde_json::from_str(r#"{"slice_count": 6}"#).unwrap();
        assert_eq!(config.slice_count, 6);
        assert_eq!(config.color_variance, PipelineConfig::DEFAULT_COLOR_VARIANCE);
    }

    #[test]
    fn config_serde_round_trip() {
        let config = PipelineConfig {
            slice_count: 7,
            color_variance: 25,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    // --- PipelineError tests ---

    #[test]
    fn format_error_names_the_line() {
        let err = PipelineError::Format {
            line: 12,
            message: "missing \"translate(\"".to_owned(),
        };
        assert!(err.to_string().contains("line 12"));
    }

    #[test]
    fn bounds_error_names_coordinate_and_size() {
        let err = PipelineError::ImageBounds {
            x: 40.5,
            y: 2.0,
            width: 10,
            height: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("40.5"), "{msg}");
        assert!(msg.contains("10x10"), "{msg}");
    }
}
