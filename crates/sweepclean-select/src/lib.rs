//! Point classification for sweepclean.
//!
//! Two classifiers write per-point [`Mark`](sweepclean_core::Mark)s:
//! - [`SweepClassifier`] tests points against moving spherical probes, using a
//!   swept capsule so fast motion never skips a point.
//! - [`Lasso`] tests projected points against a screen-space polygon whose edge
//!   coefficients are computed once per closed polygon.
//!
//! Both take a [`FrameContext`] carrying the frame's mode and pulse value.

#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod context;
pub mod lasso;
pub mod probe;
pub mod pulse;
pub mod sweep;

pub use context::{resolve_mark, FrameContext, SweepMode};
pub use lasso::{project_to_viewport, EdgeCoefficients, Lasso, LassoStats};
pub use probe::{ProbePose, ProbeSnapshot};
pub use pulse::Pulse;
pub use sweep::{
    classify, classify_world_point, MarkDecision, SweepClassifier, SweepHit, SweepStats,
};
