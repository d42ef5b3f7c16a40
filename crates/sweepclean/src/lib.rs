//! sweepclean-rs: interactive cleaning of large point clouds.
//!
//! Datasets in their native (often geo-referenced) coordinates are fitted into
//! a movable [`DataVolume`]. Points are then marked by dragging spherical
//! probes through the volume or by drawing a lasso on screen.
//!
//! # Quick Start
//!
//! ```no_run
//! use sweepclean_rs::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let mut session = CleaningSession::new(Options::default());
//!     let volume = session.add_default_volume();
//!     let survey = session.add_dataset(read_points_csv("survey", "survey.csv")?)?;
//!     session.attach(volume, survey)?;
//!
//!     // One frame with a probe that moved from the origin to (0, 0, 0.2).
//!     let probe = ProbeSnapshot::from_positions(Vec3::ZERO, Vec3::new(0.0, 0.0, 0.2), 0.05);
//!     session.step(SweepMode::Clear, 0.0, &[probe]);
//!
//!     if let Some(dataset) = session.dataset(survey) {
//!         write_marks_csv(dataset, "survey-cleaned.csv")?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Coordinate spaces
//!
//! - **raw domain**: dataset coordinates, `f64`
//! - **adjusted domain**: raw minus the domain center, scaled to fit the volume
//! - **world**: the adjusted domain posed by the volume, `f32`
//!
//! # Crates
//!
//! - `sweepclean-core`: datasets, marks, options, errors
//! - `sweepclean-volume`: [`DataVolume`] and the domain fit
//! - `sweepclean-select`: probe sweep and lasso classifiers

#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod init;
pub mod io;
pub mod session;

pub use init::init_logging;
pub use io::{read_points, read_points_csv, write_marks, write_marks_csv, CSV_HEADER};
pub use session::{CleaningSession, FrameReport, VolumeId};

// Re-export core types
pub use sweepclean_core::{
    Dataset, DatasetArena, DatasetHandle, DomainBounds, Mark, MarkCounts, MarkStore, Options,
    PointCloudDataset, Result, Snapshot, SweepcleanError,
};
pub use sweepclean_core::{DMat4, DQuat, DVec3, Mat4, Quat, Vec2, Vec3};

// Re-export volume types
pub use sweepclean_volume::{fit_domain, DataVolume, DomainFit, VolumeUniforms};

// Re-export classifiers
pub use sweepclean_select::{
    classify, classify_world_point, project_to_viewport, resolve_mark, FrameContext, Lasso,
    LassoStats, MarkDecision, ProbeSnapshot, Pulse, SweepClassifier, SweepHit, SweepMode,
    SweepStats,
};
