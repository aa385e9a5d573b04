//! Per-channel color jitter for the non-base slices of a circle.
//!
//! Each channel is perturbed on its own:
//!
//! 1. draw an offset `r` uniformly from `[0, magnitude)`;
//! 2. draw a direction, overridden to subtract when adding would pass
//!    255 and to add when subtracting would go below 0;
//! 3. apply `value ± r`;
//! 4. round to the nearest multiple of [`ROUNDING_STEP`];
//! 5. clamp to `[0, 255]`.
//!
//! The rounding keeps the palette small. Two samples are always drawn
//! per channel, even when the direction is forced.

use crate::random::RandomSource;
use crate::types::Rgb;

/// Jittered channels are always a multiple of this.
pub const ROUNDING_STEP: i32 = 5;

/// Jitter every channel of `color` independently, in R, G, B order.
pub fn jitter_color<R: RandomSource + ?Sized>(color: Rgb, magnitude: u8, rng: &mut R) -> Rgb {
    let r = jitter_channel(color.r(), magnitude, rng);
    let g = jitter_channel(color.g(), magnitude, rng);
    let b = jitter_channel(color.b(), magnitude, rng);
    Rgb::new(r, g, b)
}

/// Jitter a single channel value.
pub fn jitter_channel<R: RandomSource + ?Sized>(value: u8, magnitude: u8, rng: &mut R) -> u8 {
    let offset = offset_from_unit(rng.next_unit(), magnitude);
    let direction = rng.next_unit();

    let value = i32::from(value);
    let subtract = if value - offset < 0 {
        false
    } else if value + offset > 255 {
        true
    } else {
        direction < 0.5
    };

    let shifted = if subtract {
        value - offset
    } else {
        value + offset
    };
    let clamped = round_to_step(shifted).clamp(0, 255);
    u8::try_from(clamped).unwrap_or(u8::MAX)
}

/// Round to the nearest multiple of [`ROUNDING_STEP`].
///
/// An odd step never produces a tie, so the rounding direction for
/// halves does not matter.
#[must_use]
pub const fn round_to_step(value: i32) -> i32 {
    (value + ROUNDING_STEP / 2).div_euclid(ROUNDING_STEP) * ROUNDING_STEP
}

#[allow(clippy::cast_possible_truncation)]
fn offset_from_unit(unit: f64, magnitude: u8) -> i32 {
    let max = i32::from(magnitude.saturating_sub(1));
    ((unit * f64::from(magnitude)).floor() as i32).clamp(0, max)
}
