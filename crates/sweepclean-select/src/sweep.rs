//! Continuous-motion probe classification.
//!
//! A probe is sampled once per frame, so a fast probe can jump over a point
//! between two samples. Besides the sphere at the current sample, a moving
//! probe is tested as a capsule: the sphere swept along the segment from the
//! previous sample to the current one. Every point within the radius of that
//! path is caught.

use glam::{DMat4, DVec3, Vec3};
use sweepclean_core::{Dataset, DatasetArena, DatasetHandle};
use sweepclean_volume::DataVolume;

use crate::context::{resolve_mark, FrameContext};
use crate::probe::ProbeSnapshot;

/// Which test caught a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepHit {
    /// Inside the sphere at the current sample.
    Sphere,
    /// Outside the current sphere, but inside the swept capsule.
    Capsule,
}

/// Outcome of classifying one point against one probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkDecision {
    /// Outside the box around both samples; no distance test ran.
    Rejected,
    /// Inside the box, but outside the sphere and the capsule.
    Miss,
    /// Inside the probe.
    Hit(SweepHit),
}

impl MarkDecision {
    /// Returns true for [`MarkDecision::Hit`].
    #[must_use]
    pub fn is_hit(self) -> bool {
        matches!(self, MarkDecision::Hit(_))
    }

    /// Combines the decisions of two probes for the same point.
    #[must_use]
    pub fn strongest(self, other: MarkDecision) -> MarkDecision {
        match (self, other) {
            (MarkDecision::Hit(SweepHit::Sphere), _) | (_, MarkDecision::Hit(SweepHit::Sphere)) => {
                MarkDecision::Hit(SweepHit::Sphere)
            }
            (MarkDecision::Hit(hit), _) | (_, MarkDecision::Hit(hit)) => MarkDecision::Hit(hit),
            (MarkDecision::Miss, _) | (_, MarkDecision::Miss) => MarkDecision::Miss,
            _ => MarkDecision::Rejected,
        }
    }
}

/// Classifies a world-space point against a probe moving from `previous` to
/// `current`.
///
/// With `swept` false only the sphere at `current` is tested.
#[must_use]
pub fn classify_world_point(
    point: Vec3,
    current: Vec3,
    previous: Vec3,
    radius: f32,
    swept: bool,
) -> MarkDecision {
    let r = Vec3::splat(radius);
    let box_min = current.min(previous) - r;
    let box_max = current.max(previous) + r;
    if point.cmplt(box_min).any() || point.cmpgt(box_max).any() {
        return MarkDecision::Rejected;
    }

    let radius_sq = radius * radius;
    if point.distance_squared(current) <= radius_sq {
        return MarkDecision::Hit(SweepHit::Sphere);
    }

    if !swept || current == previous {
        return MarkDecision::Miss;
    }

    let segment = current - previous;
    let segment_len_sq = segment.length_squared();
    let to_point = point - previous;
    let t = to_point.dot(segment);
    if t < 0.0 || t > segment_len_sq {
        return MarkDecision::Miss;
    }

    let perpendicular_sq = to_point.length_squared() - t * t / segment_len_sq;
    if perpendicular_sq <= radius_sq {
        MarkDecision::Hit(SweepHit::Capsule)
    } else {
        MarkDecision::Miss
    }
}

/// Classifies a raw dataset point against a probe.
///
/// The point is placed in world space with the dataset's current transform.
#[must_use]
pub fn classify(
    point_raw: DVec3,
    dataset_transform: &DMat4,
    probe: &ProbeSnapshot,
    swept: bool,
) -> MarkDecision {
    let world = dataset_transform.transform_point3(point_raw).as_vec3();
    classify_world_point(
        world,
        probe.current_position(),
        probe.previous_position(),
        probe.radius(),
        swept,
    )
}

/// Counts from one classification pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepStats {
    pub points_tested: usize,
    pub rejected: usize,
    pub sphere_hits: usize,
    pub capsule_hits: usize,
    pub newly_flagged: usize,
    pub highlights_cleared: usize,
}

impl SweepStats {
    /// Total hits from either test.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.sphere_hits + self.capsule_hits
    }

    /// Adds another pass's counts to these.
    pub fn merge(&mut self, other: &SweepStats) {
        self.points_tested += other.points_tested;
        self.rejected += other.rejected;
        self.sphere_hits += other.sphere_hits;
        self.capsule_hits += other.capsule_hits;
        self.newly_flagged += other.newly_flagged;
        self.highlights_cleared += other.highlights_cleared;
    }
}

/// Runs probe classification over whole datasets and writes the marks.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepClassifier;

impl SweepClassifier {
    /// Creates a classifier.
    pub fn new() -> Self {
        Self
    }

    /// Classifies every point of `dataset` against `probes` and updates marks.
    ///
    /// A point is a hit if any probe hits it; its mark is written once, so one
    /// probe missing a point does not clear another probe's highlight. With no
    /// probes every point misses, which clears leftover highlights.
    pub fn sweep_dataset<D: Dataset>(
        &self,
        ctx: &FrameContext,
        dataset: &mut D,
        transform: &DMat4,
        probes: &[ProbeSnapshot],
    ) -> SweepStats {
        let mut stats = SweepStats::default();
        for index in 0..dataset.point_count() {
            let raw = dataset.raw_point_position(index);
            let decision = probes
                .iter()
                .map(|probe| classify(raw, transform, probe, ctx.swept_capsule))
                .fold(MarkDecision::Rejected, MarkDecision::strongest);

            stats.points_tested += 1;
            match decision {
                MarkDecision::Rejected => stats.rejected += 1,
                MarkDecision::Miss => {}
                MarkDecision::Hit(SweepHit::Sphere) => stats.sphere_hits += 1,
                MarkDecision::Hit(SweepHit::Capsule) => stats.capsule_hits += 1,
            }

            let existing = dataset.point_mark(index);
            let next = resolve_mark(decision.is_hit(), existing, ctx);
            if next != existing {
                if next.is_flagged() {
                    stats.newly_flagged += 1;
                } else if existing.is_highlighted() && next.is_unmarked() {
                    stats.highlights_cleared += 1;
                }
                dataset.set_point_mark(index, next);
            }
        }

        stats
    }

    /// Sweeps every dataset attached to `volume`.
    ///
    /// Datasets that have not been through a volume update yet are skipped.
    ///
    /// # Panics
    ///
    /// Panics if an attached dataset was removed from `arena` without being
    /// detached from `volume` first.
    pub fn sweep_volume<D: Dataset>(
        &self,
        ctx: &FrameContext,
        volume: &DataVolume,
        arena: &mut DatasetArena<D>,
        probes: &[ProbeSnapshot],
    ) -> SweepStats {
        let mut stats = SweepStats::default();
        for &handle in volume.datasets() {
            let Some(transform) = volume.transform_for_dataset(handle) else {
                continue;
            };
            let dataset = arena.dataset_mut(handle);
            if !dataset.is_loaded() {
                continue;
            }
            let pass = self.sweep_dataset(ctx, dataset, &transform, probes);
            log_pass(ctx, handle, &pass);
            stats.merge(&pass);
        }
        stats
    }
}

fn log_pass(ctx: &FrameContext, handle: DatasetHandle, stats: &SweepStats) {
    if stats.newly_flagged > 0 {
        log::debug!(
            "frame {}: flagged {} point(s) in dataset {handle} ({} sphere, {} capsule hits)",
            ctx.frame,
            stats.newly_flagged,
            stats.sphere_hits,
            stats.capsule_hits
        );
    }
}
