//! The data volume: a posed box in world space that datasets are fitted into.
//!
//! Coordinate spaces, from the data outwards:
//!
//! - **raw domain**: the datasets' native coordinates (survey easting, northing,
//!   depth). Large magnitudes, so everything touching raw coordinates is `f64`.
//! - **adjusted domain**: raw coordinates recentred on the domain center and
//!   scaled by the aspect-preserving fit. Values are small, so this space and
//!   everything past it (world space) is `f32`.
//! - **custom domain**: an operator-selected sub-box of the raw domain that can
//!   replace the full domain when placing datasets.
//! - **world**: where probes and renderers live.
//!
//! Every cached transform is a [`Snapshot`] so consumers can see how the volume
//! moved since the previous recompute.

use std::collections::BTreeMap;

use glam::{DMat4, DVec3, Mat4, Quat, Vec3};
use sweepclean_core::{
    Dataset, DatasetArena, DatasetHandle, DomainBounds, Result, Snapshot, SweepcleanError,
};

use crate::fit::{fit_domain, DomainFit};
use crate::registry::DatasetRegistry;

#[derive(Debug, Clone, Copy)]
struct DatasetPlacement {
    transform: Snapshot<DMat4>,
    origin: DVec3,
}

/// A volume in world space and the transforms that place its datasets.
#[derive(Debug, Clone)]
pub struct DataVolume {
    position: Vec3,
    orientation: Quat,
    dimensions: Vec3,
    original_position: Vec3,
    original_orientation: Quat,

    registry: DatasetRegistry,

    volume_transform: Snapshot<Mat4>,
    raw_domain_to_volume: Snapshot<DMat4>,
    custom_domain_to_volume: Snapshot<DMat4>,
    adjusted_domain_to_volume: Snapshot<Mat4>,
    placements: BTreeMap<DatasetHandle, DatasetPlacement>,

    domain_bounds: DomainBounds,
    uncertainty_range: Option<(f32, f32)>,
    domain_fit: DomainFit,

    custom_bounds: Option<DomainBounds>,
    use_custom_bounds: bool,

    dirty: bool,
    first_run: bool,
}

impl DataVolume {
    /// Creates a volume with the given pose and size.
    ///
    /// A size with a non-positive component is replaced by a unit cube.
    pub fn new(position: Vec3, orientation: Quat, dimensions: Vec3) -> Self {
        let dimensions = if dimensions.cmple(Vec3::ZERO).any() {
            log::warn!("volume: non-positive dimensions {dimensions:?}, using a unit cube");
            Vec3::ONE
        } else {
            dimensions
        };
        Self {
            position,
            orientation,
            dimensions,
            original_position: position,
            original_orientation: orientation,
            registry: DatasetRegistry::new(),
            volume_transform: Snapshot::new(Mat4::IDENTITY),
            raw_domain_to_volume: Snapshot::new(DMat4::IDENTITY),
            custom_domain_to_volume: Snapshot::new(DMat4::IDENTITY),
            adjusted_domain_to_volume: Snapshot::new(Mat4::IDENTITY),
            placements: BTreeMap::new(),
            domain_bounds: DomainBounds::empty(),
            uncertainty_range: None,
            domain_fit: fit_domain(DVec3::ZERO, dimensions.as_dvec3()),
            custom_bounds: None,
            use_custom_bounds: false,
            dirty: true,
            first_run: true,
        }
    }

    // ---------------------------------------------------------------------
    // Datasets
    // ---------------------------------------------------------------------

    /// Attaches a dataset. No-op if it is already attached.
    pub fn add_dataset(&mut self, handle: DatasetHandle) {
        if self.registry.add(handle) {
            log::debug!("volume: attached dataset {handle}");
            self.dirty = true;
        }
    }

    /// Detaches a dataset. No-op if it is not attached.
    pub fn remove_dataset(&mut self, handle: DatasetHandle) {
        if self.registry.remove(handle) {
            log::debug!("volume: detached dataset {handle}");
            self.placements.remove(&handle);
            self.dirty = true;
        }
    }

    /// Checks if a dataset is attached.
    #[must_use]
    pub fn has_dataset(&self, handle: DatasetHandle) -> bool {
        self.registry.contains(handle)
    }

    /// Returns the attached datasets in attachment order.
    #[must_use]
    pub fn datasets(&self) -> &[DatasetHandle] {
        self.registry.handles()
    }

    /// Requests a recompute on the next [`DataVolume::update`], e.g. after an
    /// attached dataset received new points.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns true if the next [`DataVolume::update`] will recompute.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // ---------------------------------------------------------------------
    // Update
    // ---------------------------------------------------------------------

    /// Recomputes every cached transform if the volume is dirty.
    ///
    /// Current transforms move into the previous slots first. The dirty flag
    /// stays set while any attached dataset is still loading so the next call
    /// retries. On the first recompute previous and current are made equal so
    /// consumers see no motion before a real frame has passed.
    ///
    /// Returns true if anything was recomputed.
    ///
    /// # Panics
    ///
    /// Panics if an attached dataset was removed from `arena` without being
    /// detached from this volume first.
    pub fn update<D: Dataset>(&mut self, arena: &DatasetArena<D>) -> bool {
        if !self.dirty {
            return false;
        }

        let aggregated = self.registry.aggregate(arena);
        self.domain_bounds = aggregated.bounds;
        self.uncertainty_range = aggregated.uncertainty;

        self.recompute(arena);

        if self.first_run {
            self.settle();
        }

        if aggregated.all_loaded {
            self.dirty = false;
            self.first_run = false;
        } else {
            log::debug!("volume: waiting for datasets to finish loading");
        }

        true
    }

    fn recompute<D: Dataset>(&mut self, arena: &DatasetArena<D>) {
        let volume_dims = self.dimensions.as_dvec3();
        let position = self.position.as_dvec3();
        let orientation = self.orientation.as_dquat();

        self.volume_transform.advance(Mat4::from_scale_rotation_translation(
            self.dimensions,
            self.orientation,
            self.position,
        ));

        self.domain_fit = fit_domain(self.domain_bounds.extent(), volume_dims);
        self.raw_domain_to_volume.advance(
            DMat4::from_scale_rotation_translation(
                self.domain_fit.scaling_factors,
                orientation,
                position,
            ) * DMat4::from_translation(-self.domain_bounds.center()),
        );

        self.adjusted_domain_to_volume
            .advance(Mat4::from_rotation_translation(self.orientation, self.position));

        let custom = match self.custom_bounds {
            Some(bounds) => {
                let fit = fit_domain(bounds.extent(), volume_dims);
                DMat4::from_scale_rotation_translation(fit.scaling_factors, orientation, position)
                    * DMat4::from_translation(-bounds.center())
            }
            None => self.raw_domain_to_volume.current,
        };
        self.custom_domain_to_volume.advance(custom);

        let active = self.active_domain_to_volume();
        for &handle in self.registry.handles() {
            let bounds = arena.dataset(handle).bounds();
            let origin = if bounds.is_empty() {
                DVec3::ZERO
            } else {
                bounds.min
            };
            self.placements
                .entry(handle)
                .and_modify(|p| {
                    p.transform.advance(active);
                    p.origin = origin;
                })
                .or_insert(DatasetPlacement {
                    transform: Snapshot::new(active),
                    origin,
                });
        }

        log::debug!(
            "volume: recomputed transforms for {} dataset(s), domain {:?} .. {:?}",
            self.registry.len(),
            self.domain_bounds.min,
            self.domain_bounds.max
        );
    }

    fn settle(&mut self) {
        self.volume_transform.settle();
        self.raw_domain_to_volume.settle();
        self.custom_domain_to_volume.settle();
        self.adjusted_domain_to_volume.settle();
        for placement in self.placements.values_mut() {
            placement.transform.settle();
        }
    }

    fn active_domain_to_volume(&self) -> DMat4 {
        if self.custom_active() {
            self.custom_domain_to_volume.current
        } else {
            self.raw_domain_to_volume.current
        }
    }

    fn custom_active(&self) -> bool {
        self.use_custom_bounds && self.custom_bounds.is_some()
    }

    // ---------------------------------------------------------------------
    // Coordinate conversion
    // ---------------------------------------------------------------------

    /// Maps a world position into raw domain coordinates.
    ///
    /// Uses the custom domain transform while custom bounds are in use. Returns
    /// the origin when no dataset is attached.
    #[must_use]
    pub fn convert_to_raw_domain_coords(&self, world: Vec3) -> DVec3 {
        if self.registry.is_empty() {
            return DVec3::ZERO;
        }
        self.active_domain_to_volume()
            .inverse()
            .transform_point3(world.as_dvec3())
    }

    /// Maps a raw domain position into world space.
    #[must_use]
    pub fn convert_to_world_coords(&self, raw: DVec3) -> Vec3 {
        self.active_domain_to_volume().transform_point3(raw).as_vec3()
    }

    /// Maps a world position into the adjusted domain.
    #[must_use]
    pub fn convert_to_adjusted_domain_coords(&self, world: Vec3) -> Vec3 {
        self.adjusted_domain_to_volume
            .current
            .inverse()
            .transform_point3(world)
    }

    /// Maps an adjusted domain position into world space.
    #[must_use]
    pub fn convert_adjusted_domain_to_world_coords(&self, adjusted: Vec3) -> Vec3 {
        self.adjusted_domain_to_volume
            .current
            .transform_point3(adjusted)
    }

    /// Maps a raw domain position into the adjusted domain.
    ///
    /// This is the one seam where `f64` data becomes `f32`.
    #[must_use]
    pub fn convert_raw_to_adjusted_domain_coords(&self, raw: DVec3) -> Vec3 {
        ((raw - self.domain_bounds.center()) * self.domain_fit.scaling_factors).as_vec3()
    }

    /// Checks if a world position falls inside the active domain bounds.
    ///
    /// With `check_z` false only X and Y are compared. Always false when no
    /// dataset is attached.
    #[must_use]
    pub fn is_world_coord_point_in_domain_bounds(&self, world: Vec3, check_z: bool) -> bool {
        if self.registry.is_empty() {
            return false;
        }
        let raw = self.convert_to_raw_domain_coords(world);
        self.active_bounds().contains(raw, check_z)
    }

    /// Checks if a world position falls inside the volume box itself.
    #[must_use]
    pub fn is_world_coord_point_in_volume(&self, world: Vec3) -> bool {
        let local = self.volume_transform.current.inverse().transform_point3(world);
        local.abs().cmple(Vec3::splat(0.5)).all()
    }

    // ---------------------------------------------------------------------
    // Custom bounds
    // ---------------------------------------------------------------------

    /// Sets the custom sub-region of the raw domain.
    ///
    /// The full-domain transform is kept; [`DataVolume::use_custom_bounds`]
    /// selects which one places datasets.
    pub fn set_custom_bounds(&mut self, min: DVec3, max: DVec3) -> Result<()> {
        if min.cmpgt(max).any() {
            log::warn!("volume: rejected custom bounds {min:?} .. {max:?}");
            return Err(SweepcleanError::InvalidBounds {
                min: format!("{min:?}"),
                max: format!("{max:?}"),
            });
        }
        self.custom_bounds = Some(DomainBounds::new(min, max));
        self.dirty = true;
        Ok(())
    }

    /// Forgets the custom sub-region.
    pub fn clear_custom_bounds(&mut self) {
        if self.custom_bounds.take().is_some() {
            self.dirty = true;
        }
    }

    /// Selects whether datasets are placed by the custom sub-region.
    pub fn use_custom_bounds(&mut self, use_custom: bool) {
        if self.use_custom_bounds != use_custom {
            self.use_custom_bounds = use_custom;
            self.dirty = true;
        }
    }

    /// Returns true if the custom sub-region is selected.
    #[must_use]
    pub fn is_using_custom_bounds(&self) -> bool {
        self.use_custom_bounds
    }

    /// Minimum corner of the custom sub-region, if set.
    #[must_use]
    pub fn custom_min_bound(&self) -> Option<DVec3> {
        self.custom_bounds.map(|b| b.min)
    }

    /// Maximum corner of the custom sub-region, if set.
    #[must_use]
    pub fn custom_max_bound(&self) -> Option<DVec3> {
        self.custom_bounds.map(|b| b.max)
    }

    fn active_bounds(&self) -> DomainBounds {
        match self.custom_bounds {
            Some(bounds) if self.use_custom_bounds => bounds,
            _ => self.domain_bounds,
        }
    }

    // ---------------------------------------------------------------------
    // Pose
    // ---------------------------------------------------------------------

    /// Returns the world position of the volume center.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Moves the volume.
    pub fn set_position(&mut self, position: Vec3) {
        if self.position != position {
            self.position = position;
            self.dirty = true;
        }
    }

    /// Returns the orientation of the volume.
    #[must_use]
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Rotates the volume.
    pub fn set_orientation(&mut self, orientation: Quat) {
        if self.orientation != orientation {
            self.orientation = orientation;
            self.dirty = true;
        }
    }

    /// Returns the size of the volume box.
    #[must_use]
    pub fn dimensions(&self) -> Vec3 {
        self.dimensions
    }

    /// Resizes the volume box. Non-positive sizes are ignored.
    pub fn set_dimensions(&mut self, dimensions: Vec3) {
        if dimensions.cmple(Vec3::ZERO).any() {
            log::warn!("volume: ignoring non-positive dimensions {dimensions:?}");
            return;
        }
        if self.dimensions != dimensions {
            self.dimensions = dimensions;
            self.dirty = true;
        }
    }

    /// Returns to the pose the volume was created with.
    pub fn reset_pose(&mut self) {
        self.set_position(self.original_position);
        self.set_orientation(self.original_orientation);
    }

    /// Makes the current pose the one [`DataVolume::reset_pose`] returns to.
    pub fn save_pose(&mut self) {
        self.original_position = self.position;
        self.original_orientation = self.orientation;
    }

    // ---------------------------------------------------------------------
    // Cached transforms
    // ---------------------------------------------------------------------

    /// Unit cube to world: the volume's backing box.
    #[must_use]
    pub fn volume_transform(&self) -> Mat4 {
        self.volume_transform.current
    }

    /// [`DataVolume::volume_transform`] before the last recompute.
    #[must_use]
    pub fn volume_transform_previous(&self) -> Mat4 {
        self.volume_transform.previous
    }

    /// Full raw domain to world.
    #[must_use]
    pub fn raw_domain_to_volume_transform(&self) -> DMat4 {
        self.raw_domain_to_volume.current
    }

    /// [`DataVolume::raw_domain_to_volume_transform`] before the last recompute.
    #[must_use]
    pub fn raw_domain_to_volume_transform_previous(&self) -> DMat4 {
        self.raw_domain_to_volume.previous
    }

    /// Custom sub-region to world. Equals the full-domain transform when no
    /// custom bounds are set.
    #[must_use]
    pub fn custom_domain_to_volume_transform(&self) -> DMat4 {
        self.custom_domain_to_volume.current
    }

    /// [`DataVolume::custom_domain_to_volume_transform`] before the last recompute.
    #[must_use]
    pub fn custom_domain_to_volume_transform_previous(&self) -> DMat4 {
        self.custom_domain_to_volume.previous
    }

    /// Adjusted domain to world.
    #[must_use]
    pub fn adjusted_domain_to_volume_transform(&self) -> Mat4 {
        self.adjusted_domain_to_volume.current
    }

    /// [`DataVolume::adjusted_domain_to_volume_transform`] before the last recompute.
    #[must_use]
    pub fn adjusted_domain_to_volume_transform_previous(&self) -> Mat4 {
        self.adjusted_domain_to_volume.previous
    }

    /// Raw positions of `handle` to world, honoring custom bounds.
    ///
    /// `None` until the dataset has been through an update.
    #[must_use]
    pub fn transform_for_dataset(&self, handle: DatasetHandle) -> Option<DMat4> {
        self.placements.get(&handle).map(|p| p.transform.current)
    }

    /// [`DataVolume::transform_for_dataset`] before the last recompute.
    #[must_use]
    pub fn transform_for_dataset_previous(&self, handle: DatasetHandle) -> Option<DMat4> {
        self.placements.get(&handle).map(|p| p.transform.previous)
    }

    /// Single-precision transform for positions stored relative to the
    /// dataset's minimum bound, for renderers uploading `f32` vertices.
    #[must_use]
    pub fn render_transform_for_dataset(&self, handle: DatasetHandle) -> Option<Mat4> {
        self.placements
            .get(&handle)
            .map(|p| (p.transform.current * DMat4::from_translation(p.origin)).as_mat4())
    }

    /// The offset subtracted from raw positions before rendering with
    /// [`DataVolume::render_transform_for_dataset`].
    #[must_use]
    pub fn render_origin_for_dataset(&self, handle: DatasetHandle) -> Option<DVec3> {
        self.placements.get(&handle).map(|p| p.origin)
    }

    // ---------------------------------------------------------------------
    // Domain
    // ---------------------------------------------------------------------

    /// Minimum corner of the aggregated raw domain; `+inf` when empty.
    #[must_use]
    pub fn min_data_bound(&self) -> DVec3 {
        self.domain_bounds.min
    }

    /// Maximum corner of the aggregated raw domain; `-inf` when empty.
    #[must_use]
    pub fn max_data_bound(&self) -> DVec3 {
        self.domain_bounds.max
    }

    /// Size of the aggregated raw domain.
    #[must_use]
    pub fn data_dimensions(&self) -> DVec3 {
        self.domain_bounds.extent()
    }

    /// Center of the aggregated raw domain.
    #[must_use]
    pub fn data_center(&self) -> DVec3 {
        self.domain_bounds.center()
    }

    /// Union of the datasets' uncertainty ranges.
    #[must_use]
    pub fn uncertainty_range(&self) -> Option<(f32, f32)> {
        self.uncertainty_range
    }

    /// Per-axis raw-to-adjusted scale from the last recompute.
    #[must_use]
    pub fn scaling_factors(&self) -> DVec3 {
        self.domain_fit.scaling_factors
    }

    /// Size of the fitted domain inside the volume.
    #[must_use]
    pub fn adjusted_dimensions(&self) -> DVec3 {
        self.domain_fit.adjusted_dimensions
    }
}

impl Default for DataVolume {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweepclean_core::PointCloudDataset;

    fn arena_with(points: Vec<DVec3>) -> (DatasetArena, DatasetHandle) {
        let mut arena = DatasetArena::new();
        let handle = arena
            .insert(PointCloudDataset::new("survey", points))
            .unwrap();
        (arena, handle)
    }

    fn survey_points() -> Vec<DVec3> {
        vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(10.0, 5.0, 2.0),
            DVec3::new(3.0, 4.0, 1.0),
        ]
    }

    #[test]
    fn test_empty_volume_sentinels() {
        let volume = DataVolume::default();
        assert_eq!(volume.min_data_bound(), DVec3::splat(f64::INFINITY));
        assert_eq!(volume.max_data_bound(), DVec3::splat(f64::NEG_INFINITY));
        assert_eq!(volume.convert_to_raw_domain_coords(Vec3::ONE), DVec3::ZERO);
        assert!(!volume.is_world_coord_point_in_domain_bounds(Vec3::ZERO, true));
    }

    #[test]
    fn test_non_positive_size_falls_back_to_unit_cube() {
        let (arena, h) = arena_with(survey_points());
        let mut volume = DataVolume::new(Vec3::ZERO, Quat::IDENTITY, Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(volume.dimensions(), Vec3::ONE);
        volume.add_dataset(h);
        volume.update(&arena);

        assert!(volume.scaling_factors().cmpgt(DVec3::ZERO).all());
        let raw = volume.convert_to_raw_domain_coords(Vec3::new(0.1, 0.1, 0.1));
        assert!(raw.is_finite());
    }

    #[test]
    fn test_update_only_when_dirty() {
        let (arena, h) = arena_with(survey_points());
        let mut volume = DataVolume::default();
        volume.add_dataset(h);
        assert!(volume.update(&arena));
        assert!(!volume.is_dirty());
        assert!(!volume.update(&arena));

        volume.add_dataset(h);
        assert!(!volume.is_dirty(), "re-adding is a no-op");

        volume.mark_dirty();
        assert!(volume.update(&arena));
    }

    #[test]
    fn test_first_update_settles_previous() {
        let (arena, h) = arena_with(survey_points());
        let mut volume = DataVolume::new(Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY, Vec3::ONE);
        volume.add_dataset(h);
        volume.update(&arena);
        assert_eq!(volume.volume_transform(), volume.volume_transform_previous());
        assert_eq!(
            volume.raw_domain_to_volume_transform(),
            volume.raw_domain_to_volume_transform_previous()
        );
        assert_eq!(
            volume.transform_for_dataset(h),
            volume.transform_for_dataset_previous(h)
        );
    }

    #[test]
    fn test_move_shifts_previous() {
        let (arena, h) = arena_with(survey_points());
        let mut volume = DataVolume::default();
        volume.add_dataset(h);
        volume.update(&arena);
        let before = volume.transform_for_dataset(h).unwrap();

        volume.set_position(Vec3::new(0.0, 1.0, 0.0));
        volume.update(&arena);
        assert_eq!(volume.transform_for_dataset_previous(h), Some(before));
        assert_ne!(volume.transform_for_dataset(h), Some(before));
    }

    #[test]
    fn test_aspect_preserved() {
        let (arena, h) = arena_with(vec![DVec3::new(0.0, 0.0, 0.0), DVec3::new(10.0, 5.0, 0.0)]);
        let mut volume = DataVolume::default();
        volume.add_dataset(h);
        volume.update(&arena);
        let s = volume.scaling_factors();
        assert!((s.x - s.y).abs() < 1e-12);
        assert!((volume.adjusted_dimensions().y - 0.5).abs() < 1e-12);
        // Flat Z passes straight through.
        assert_eq!(s.z, 1.0);
    }

    #[test]
    fn test_domain_corners_land_on_fitted_box() {
        let (arena, h) = arena_with(survey_points());
        let mut volume = DataVolume::default();
        volume.add_dataset(h);
        volume.update(&arena);
        let max = volume.convert_to_world_coords(DVec3::new(10.0, 5.0, 2.0));
        assert!((max - Vec3::new(0.5, 0.25, 0.5)).length() < 1e-6);
        let min = volume.convert_to_world_coords(DVec3::ZERO);
        assert!((min - Vec3::new(-0.5, -0.25, -0.5)).length() < 1e-6);
    }

    #[test]
    fn test_in_domain_bounds() {
        let (arena, h) = arena_with(survey_points());
        let mut volume = DataVolume::default();
        volume.add_dataset(h);
        volume.update(&arena);
        assert!(volume.is_world_coord_point_in_domain_bounds(Vec3::ZERO, true));
        // Above the data but within its footprint.
        let above = Vec3::new(0.0, 0.0, 0.9);
        assert!(!volume.is_world_coord_point_in_domain_bounds(above, true));
        assert!(volume.is_world_coord_point_in_domain_bounds(above, false));
        assert!(volume.is_world_coord_point_in_volume(Vec3::new(0.4, 0.4, 0.4)));
        assert!(!volume.is_world_coord_point_in_volume(Vec3::new(0.6, 0.0, 0.0)));
    }

    #[test]
    fn test_unloaded_keeps_dirty() {
        let mut arena = DatasetArena::new();
        let pending = arena.insert(PointCloudDataset::unloaded("pending")).unwrap();
        let mut volume = DataVolume::default();
        volume.add_dataset(pending);
        assert!(volume.update(&arena));
        assert!(volume.is_dirty());
        assert_eq!(volume.scaling_factors(), DVec3::ONE);

        arena
            .get_mut(pending)
            .unwrap()
            .set_points(survey_points());
        assert!(volume.update(&arena));
        assert!(!volume.is_dirty());
        assert_eq!(volume.max_data_bound(), DVec3::new(10.0, 5.0, 2.0));
        // Still the first successful update, so no motion is reported.
        assert_eq!(
            volume.transform_for_dataset(pending),
            volume.transform_for_dataset_previous(pending)
        );
    }

    #[test]
    fn test_custom_bounds() {
        let (arena, h) = arena_with(survey_points());
        let mut volume = DataVolume::default();
        volume.add_dataset(h);
        volume.update(&arena);
        let full = volume.transform_for_dataset(h).unwrap();

        assert!(volume
            .set_custom_bounds(DVec3::splat(1.0), DVec3::splat(0.0))
            .is_err());
        volume
            .set_custom_bounds(DVec3::ZERO, DVec3::new(2.0, 2.0, 2.0))
            .unwrap();
        volume.update(&arena);
        // Not in use yet: datasets keep the full-domain transform.
        assert_eq!(volume.transform_for_dataset(h), Some(full));

        volume.use_custom_bounds(true);
        volume.update(&arena);
        let custom = volume.transform_for_dataset(h).unwrap();
        assert_eq!(custom, volume.custom_domain_to_volume_transform());
        assert_eq!(volume.raw_domain_to_volume_transform(), full);
        let corner = custom.transform_point3(DVec3::new(2.0, 2.0, 2.0));
        assert!((corner - DVec3::splat(0.5)).length() < 1e-12);
        assert!(!volume.is_world_coord_point_in_domain_bounds(Vec3::splat(0.6), true));
    }

    #[test]
    fn test_render_transform_matches_raw_transform() {
        let base = DVec3::new(500_000.0, 4_000_000.0, -30.0);
        let points = vec![base, base + DVec3::new(100.0, 50.0, 10.0)];
        let (arena, h) = arena_with(points.clone());
        let mut volume = DataVolume::default();
        volume.add_dataset(h);
        volume.update(&arena);

        let origin = volume.render_origin_for_dataset(h).unwrap();
        assert_eq!(origin, base);
        let render = volume.render_transform_for_dataset(h).unwrap();
        let local = (points[1] - origin).as_vec3();
        let via_render = render.transform_point3(local);
        let via_raw = volume.convert_to_world_coords(points[1]);
        assert!((via_render - via_raw).length() < 1e-5);
    }

    #[test]
    fn test_remove_dataset_drops_placement() {
        let (arena, h) = arena_with(survey_points());
        let mut volume = DataVolume::default();
        volume.add_dataset(h);
        volume.update(&arena);
        volume.remove_dataset(h);
        assert!(volume.is_dirty());
        assert!(volume.transform_for_dataset(h).is_none());
        volume.update(&arena);
        assert!(volume.min_data_bound().x.is_infinite());
    }

    #[test]
    fn test_reset_pose() {
        let mut volume = DataVolume::new(Vec3::X, Quat::IDENTITY, Vec3::ONE);
        volume.set_position(Vec3::Y);
        volume.set_orientation(Quat::from_rotation_z(1.0));
        volume.reset_pose();
        assert_eq!(volume.position(), Vec3::X);
        assert_eq!(volume.orientation(), Quat::IDENTITY);
        volume.set_dimensions(Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(volume.dimensions(), Vec3::ONE);
    }

    #[test]
    fn test_adjusted_domain_round_trip() {
        let (arena, h) = arena_with(survey_points());
        let mut volume = DataVolume::new(
            Vec3::new(0.2, 1.0, -0.5),
            Quat::from_rotation_y(0.4),
            Vec3::new(2.0, 1.0, 1.0),
        );
        volume.add_dataset(h);
        volume.update(&arena);

        let raw = DVec3::new(7.0, 2.0, 1.5);
        let adjusted = volume.convert_raw_to_adjusted_domain_coords(raw);
        let world = volume.convert_adjusted_domain_to_world_coords(adjusted);
        assert!((world - volume.convert_to_world_coords(raw)).length() < 1e-5);
        assert!((volume.convert_to_adjusted_domain_coords(world) - adjusted).length() < 1e-5);
    }
}
