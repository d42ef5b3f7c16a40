//! Dataset trait and the in-memory point cloud implementation.
//!
//! A [`Dataset`] is owned by whatever loaded it. Volumes only ever hold a
//! [`DatasetHandle`](crate::DatasetHandle) into the owning
//! [`DatasetArena`](crate::DatasetArena).

use glam::DVec3;

use crate::bounds::DomainBounds;
use crate::error::{Result, SweepcleanError};
use crate::mark::{Mark, MarkStore};

/// A set of points in raw domain coordinates with a mark per point.
///
/// Point indices passed to the accessors must be below [`Dataset::point_count`];
/// implementations panic otherwise.
pub trait Dataset {
    /// Returns the name of this dataset.
    fn name(&self) -> &str;

    /// Returns the number of points.
    fn point_count(&self) -> usize;

    /// Returns the raw domain position of point `index`.
    fn raw_point_position(&self, index: usize) -> DVec3;

    /// Returns the mark of point `index`.
    fn point_mark(&self, index: usize) -> Mark;

    /// Sets the mark of point `index`.
    fn set_point_mark(&mut self, index: usize, mark: Mark);

    /// Minimum corner of the raw domain bounds.
    fn min_bounds(&self) -> DVec3;

    /// Maximum corner of the raw domain bounds.
    fn max_bounds(&self) -> DVec3;

    /// Returns false while point data is still being produced.
    fn is_loaded(&self) -> bool;

    /// Range of the per-point uncertainty values, if the dataset carries any.
    fn uncertainty_range(&self) -> Option<(f32, f32)> {
        None
    }

    /// Raw domain bounds as a box. Empty while the dataset is not loaded.
    fn bounds(&self) -> DomainBounds {
        if self.is_loaded() {
            DomainBounds::new(self.min_bounds(), self.max_bounds())
        } else {
            DomainBounds::empty()
        }
    }
}

/// A point cloud held entirely in memory.
#[derive(Debug, Clone)]
pub struct PointCloudDataset {
    name: String,
    points: Vec<DVec3>,
    marks: MarkStore,
    uncertainty: Option<Vec<f32>>,
    bounds: DomainBounds,
    loaded: bool,
}

impl PointCloudDataset {
    /// Creates a loaded dataset from raw domain positions.
    pub fn new(name: impl Into<String>, points: Vec<DVec3>) -> Self {
        let bounds = DomainBounds::from_points(&points);
        Self {
            name: name.into(),
            marks: MarkStore::new(points.len()),
            points,
            uncertainty: None,
            bounds,
            loaded: true,
        }
    }

    /// Creates a placeholder whose points have not arrived yet.
    pub fn unloaded(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
            marks: MarkStore::default(),
            uncertainty: None,
            bounds: DomainBounds::empty(),
            loaded: false,
        }
    }

    /// Replaces all points and marks the dataset loaded. Existing marks are reset.
    pub fn set_points(&mut self, points: Vec<DVec3>) {
        self.bounds = DomainBounds::from_points(&points);
        self.marks = MarkStore::new(points.len());
        self.points = points;
        self.uncertainty = None;
        self.loaded = true;
    }

    /// Attaches one uncertainty value per point.
    pub fn set_uncertainty(&mut self, values: Vec<f32>) -> Result<()> {
        if values.len() != self.points.len() {
            return Err(SweepcleanError::SizeMismatch {
                expected: self.points.len(),
                actual: values.len(),
            });
        }
        self.uncertainty = Some(values);
        Ok(())
    }

    /// Returns the uncertainty value of point `index`, if any are attached.
    #[must_use]
    pub fn uncertainty(&self, index: usize) -> Option<f32> {
        self.uncertainty.as_ref().map(|u| u[index])
    }

    /// Returns all raw positions.
    #[must_use]
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Returns the mark store.
    #[must_use]
    pub fn marks(&self) -> &MarkStore {
        &self.marks
    }

    /// Returns the mark store mutably.
    pub fn marks_mut(&mut self) -> &mut MarkStore {
        &mut self.marks
    }
}

impl Dataset for PointCloudDataset {
    fn name(&self) -> &str {
        &self.name
    }

    fn point_count(&self) -> usize {
        self.points.len()
    }

    fn raw_point_position(&self, index: usize) -> DVec3 {
        self.points[index]
    }

    fn point_mark(&self, index: usize) -> Mark {
        self.marks.get(index)
    }

    fn set_point_mark(&mut self, index: usize, mark: Mark) {
        self.marks.set(index, mark);
    }

    fn min_bounds(&self) -> DVec3 {
        self.bounds.min
    }

    fn max_bounds(&self) -> DVec3 {
        self.bounds.max
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn uncertainty_range(&self) -> Option<(f32, f32)> {
        let values = self.uncertainty.as_ref()?;
        values.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PointCloudDataset {
        PointCloudDataset::new(
            "sample",
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(10.0, 5.0, -2.0),
                DVec3::new(4.0, 1.0, 1.0),
            ],
        )
    }

    #[test]
    fn test_bounds_from_points() {
        let ds = sample();
        assert!(ds.is_loaded());
        assert_eq!(ds.point_count(), 3);
        assert_eq!(ds.min_bounds(), DVec3::new(0.0, 0.0, -2.0));
        assert_eq!(ds.max_bounds(), DVec3::new(10.0, 5.0, 1.0));
    }

    #[test]
    fn test_unloaded_has_empty_bounds() {
        let ds = PointCloudDataset::unloaded("pending");
        assert!(!ds.is_loaded());
        assert!(ds.bounds().is_empty());
        assert_eq!(ds.point_count(), 0);
    }

    #[test]
    fn test_set_points_loads() {
        let mut ds = PointCloudDataset::unloaded("pending");
        ds.set_points(vec![DVec3::ONE, DVec3::splat(2.0)]);
        assert!(ds.is_loaded());
        assert_eq!(ds.marks().len(), 2);
        assert_eq!(ds.bounds().extent(), DVec3::ONE);
    }

    #[test]
    fn test_marks() {
        let mut ds = sample();
        ds.set_point_mark(1, Mark::Flagged);
        assert_eq!(ds.point_mark(1), Mark::Flagged);
        assert_eq!(ds.marks().counts().flagged, 1);
    }

    #[test]
    fn test_uncertainty_range() {
        let mut ds = sample();
        assert!(ds.uncertainty_range().is_none());
        assert!(ds.set_uncertainty(vec![0.1]).is_err());
        ds.set_uncertainty(vec![0.3, 0.1, 0.7]).unwrap();
        assert_eq!(ds.uncertainty_range(), Some((0.1, 0.7)));
        assert_eq!(ds.uncertainty(2), Some(0.7));
    }
}
