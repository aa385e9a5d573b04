//! Slice generation: one base slice plus jittered variants per circle.

use crate::jitter::jitter_color;
use crate::palette::Palette;
use crate::random::RandomSource;
use crate::types::{Circle, PipelineConfig, PipelineError, Rgb, Slice};

/// Turns sampled circles into slices, accumulating the run's palette.
///
/// Random samples are consumed per circle in this order: the weight of
/// slice `'A'`, then for each later slice its R, G and B jitter (two
/// samples each) followed by its weight.
#[derive(Debug, Clone)]
pub struct SliceGenerator<R> {
    config: PipelineConfig,
    rng: R,
    palette: Palette,
}

impl<R: RandomSource> SliceGenerator<R> {
    /// Create a generator with an empty palette.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if `config` fails
    /// [`PipelineConfig::validate`].
    pub fn new(config: PipelineConfig, rng: R) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            palette: Palette::new(),
        })
    }

    /// All slices for `circle`, labels ascending.
    ///
    /// Slice `'A'` carries `base` unchanged; each later slice gets its
    /// own independent jitter of `base`.
    pub fn generate(&mut self, circle: Circle, base: Rgb) -> Vec<Slice> {
        self.config
            .slice_labels()
            .map(|label| {
                let color = if label == 'A' {
                    base
                } else {
                    jitter_color(base, self.config.color_variance, &mut self.rng)
                };
                let color_index = self.palette.register_color(color);
                Slice {
                    circle,
                    label,
                    color,
                    color_index,
                    weight: self.rng.next_unit(),
                }
            })
            .collect()
    }

    /// Colors registered so far.
    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Consume the generator, keeping the palette.
    pub fn into_palette(self) -> Palette {
        self.palette
    }
}
