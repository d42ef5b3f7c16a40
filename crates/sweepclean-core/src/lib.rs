//! Core abstractions for sweepclean.
//!
//! This crate provides the types shared by the volume and the classifiers:
//! - [`Dataset`] trait for externally loaded point sets, and [`PointCloudDataset`]
//! - [`DatasetArena`] owning datasets, addressed by [`DatasetHandle`]
//! - [`Mark`] and [`MarkStore`] for per-point classification results
//! - [`Snapshot`] for current/previous value pairs
//! - Configuration [`Options`] and the error type

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod arena;
pub mod bounds;
pub mod dataset;
pub mod error;
pub mod mark;
pub mod options;
pub mod snapshot;

pub use arena::{DatasetArena, DatasetHandle};
pub use bounds::DomainBounds;
pub use dataset::{Dataset, PointCloudDataset};
pub use error::{Result, SweepcleanError};
pub use mark::{Mark, MarkCounts, MarkStore};
pub use options::Options;
pub use snapshot::Snapshot;

// Re-export glam types for convenience
pub use glam::{DMat4, DQuat, DVec3, Mat4, Quat, Vec2, Vec3};
