//! Per-frame classification context.
//!
//! Classification passes receive everything they need from the caller through
//! a [`FrameContext`] instead of consulting process-wide state.

use serde::{Deserialize, Serialize};
use sweepclean_core::{Mark, Options};

use crate::pulse::Pulse;

/// What a hit does to a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SweepMode {
    /// Hits are highlighted for as long as they stay inside the probe.
    #[default]
    Preview,
    /// Hits are flagged for removal.
    Clear,
}

/// Inputs shared by every classification call in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// Frame counter, for logging.
    pub frame: u64,
    /// Whether hits flag or highlight.
    pub mode: SweepMode,
    /// Highlight intensity for this frame.
    pub pulse: f32,
    /// Whether the swept capsule test runs for moving probes.
    pub swept_capsule: bool,
}

impl Default for FrameContext {
    fn default() -> Self {
        Self {
            frame: 0,
            mode: SweepMode::Preview,
            pulse: 0.0,
            swept_capsule: true,
        }
    }
}

impl FrameContext {
    /// Builds the context for frame `frame` at `elapsed` seconds.
    pub fn new(frame: u64, mode: SweepMode, elapsed: f32, options: &Options) -> Self {
        Self {
            frame,
            mode,
            pulse: Pulse::from_options(options).value_at(elapsed),
            swept_capsule: options.swept_capsule,
        }
    }

    /// Returns a copy with a different mode.
    #[must_use]
    pub fn with_mode(mut self, mode: SweepMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns a copy with a different pulse value.
    #[must_use]
    pub fn with_pulse(mut self, pulse: f32) -> Self {
        self.pulse = pulse;
        self
    }
}

/// The mark a point should carry after a classification.
///
/// Flagged marks are never downgraded. A hit flags in [`SweepMode::Clear`] and
/// highlights otherwise; a miss clears a highlight.
#[must_use]
pub fn resolve_mark(hit: bool, existing: Mark, ctx: &FrameContext) -> Mark {
    match (hit, existing) {
        (_, Mark::Flagged) => Mark::Flagged,
        (true, _) => match ctx.mode {
            SweepMode::Clear => Mark::Flagged,
            SweepMode::Preview => Mark::Highlighted(ctx.pulse),
        },
        (false, Mark::Highlighted(_)) => Mark::Unmarked,
        (false, other) => other,
    }
}
