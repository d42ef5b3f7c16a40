//! Cyclic highlight intensity.

use sweepclean_core::Options;

/// Sawtooth generator for the intensity stored in highlight marks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    period: f32,
    min: f32,
    max: f32,
}

impl Default for Pulse {
    fn default() -> Self {
        Self {
            period: 1.0,
            min: 0.0,
            max: 1.0,
        }
    }
}

impl Pulse {
    /// Creates a pulse rising from `min` to `max` every `period` seconds.
    pub fn new(period: f32, min: f32, max: f32) -> Self {
        Self {
            period: if period > 0.0 { period } else { 1.0 },
            min: min.min(max),
            max: max.max(min),
        }
    }

    /// Creates a pulse from the configured period and range.
    pub fn from_options(options: &Options) -> Self {
        Self::new(options.pulse_period, options.pulse_min, options.pulse_max)
    }

    /// Intensity at `elapsed` seconds. Always within `[min, max]`.
    #[must_use]
    pub fn value_at(&self, elapsed: f32) -> f32 {
        let phase = (elapsed / self.period).rem_euclid(1.0);
        self.min + (self.max - self.min) * phase
    }

    /// Lower end of the range.
    #[must_use]
    pub fn min(&self) -> f32 {
        self.min
    }

    /// Upper end of the range.
    #[must_use]
    pub fn max(&self) -> f32 {
        self.max
    }
}
