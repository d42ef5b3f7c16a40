//! Volume coordinate transforms for sweepclean.
//!
//! A [`DataVolume`] is a posed box in world space. Datasets attached to it are
//! fitted into the box with their X:Y aspect ratio preserved, and the volume
//! keeps the current and previous version of every transform involved.
//!
//! # Precision
//!
//! Raw domain math is `f64` ([`DMat4`](glam::DMat4), [`DVec3`](glam::DVec3)).
//! The adjusted domain and world space are `f32`. The only conversions between
//! the two are [`DataVolume::convert_to_world_coords`],
//! [`DataVolume::convert_raw_to_adjusted_domain_coords`] and
//! [`DataVolume::render_transform_for_dataset`].

#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod fit;
pub mod registry;
pub mod uniforms;
pub mod volume;

pub use fit::{fit_domain, DomainFit};
pub use registry::{AggregatedBounds, DatasetRegistry};
pub use uniforms::VolumeUniforms;
pub use volume::DataVolume;
