//! Probe snapshots refreshed once per frame by the input layer.

use glam::{Quat, Vec3};
use sweepclean_core::{Options, Snapshot};

/// World-space pose of a probe at one sample time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbePose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for ProbePose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

/// A spherical probe sampled at the current and previous frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeSnapshot {
    pose: Snapshot<ProbePose>,
    radius: f32,
}

impl ProbeSnapshot {
    /// Creates a probe that has not moved yet. A negative radius becomes 0.
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self {
            pose: Snapshot::new(ProbePose {
                position,
                orientation: Quat::IDENTITY,
            }),
            radius: radius.max(0.0),
        }
    }

    /// Creates a probe at `position` with the configured radius.
    pub fn from_options(position: Vec3, options: &Options) -> Self {
        Self::new(position, options.probe_radius)
    }

    /// Creates a probe from two explicit samples.
    pub fn from_positions(previous: Vec3, current: Vec3, radius: f32) -> Self {
        let mut probe = Self::new(previous, radius);
        probe.update(current, Quat::IDENTITY);
        probe
    }

    /// Records a new sample; the old current pose becomes the previous one.
    pub fn update(&mut self, position: Vec3, orientation: Quat) {
        self.pose.advance(ProbePose {
            position,
            orientation,
        });
    }

    /// Forgets the motion of the last sample, e.g. after a teleport.
    pub fn settle(&mut self) {
        self.pose.settle();
    }

    /// Position at the current sample.
    #[must_use]
    pub fn current_position(&self) -> Vec3 {
        self.pose.current.position
    }

    /// Position at the previous sample.
    #[must_use]
    pub fn previous_position(&self) -> Vec3 {
        self.pose.previous.position
    }

    /// Orientation at the current sample.
    #[must_use]
    pub fn current_orientation(&self) -> Quat {
        self.pose.current.orientation
    }

    /// Orientation at the previous sample.
    #[must_use]
    pub fn previous_orientation(&self) -> Quat {
        self.pose.previous.orientation
    }

    /// Returns true if the probe position changed between the two samples.
    #[must_use]
    pub fn moved(&self) -> bool {
        self.pose.current.position != self.pose.previous.position
    }

    /// Probe radius in world units.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Sets the probe radius.
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(0.0);
    }

    /// Axis-aligned box around both samples, grown by the radius.
    #[must_use]
    pub fn swept_bounds(&self) -> (Vec3, Vec3) {
        let current = self.current_position();
        let previous = self.previous_position();
        let r = Vec3::splat(self.radius);
        (current.min(previous) - r, current.max(previous) + r)
    }
}
