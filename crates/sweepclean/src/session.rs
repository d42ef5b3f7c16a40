//! A cleaning session: datasets, volumes and classifiers driven once per frame.

use glam::{Mat4, Vec2, Vec3};
use sweepclean_core::{
    Dataset, DatasetArena, DatasetHandle, MarkCounts, Options, PointCloudDataset, Result,
    SweepcleanError,
};
use sweepclean_select::{
    FrameContext, Lasso, LassoStats, ProbeSnapshot, SweepClassifier, SweepMode, SweepStats,
};
use sweepclean_volume::DataVolume;

/// Index of a volume inside a [`CleaningSession`].
pub type VolumeId = usize;

/// What one call to [`CleaningSession::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Frame counter after the step.
    pub frame: u64,
    /// Volumes whose transforms were recomputed.
    pub volumes_updated: usize,
    /// Combined probe classification counts.
    pub sweep: SweepStats,
}

/// Owns the datasets and volumes of one cleaning task.
///
/// The session is the single owner of its datasets, so removing one detaches
/// it from every volume before it is dropped.
pub struct CleaningSession {
    options: Options,
    arena: DatasetArena<PointCloudDataset>,
    volumes: Vec<DataVolume>,
    sweep: SweepClassifier,
    lasso: Lasso,
    frame: u64,
}

impl CleaningSession {
    /// Creates an empty session.
    pub fn new(options: Options) -> Self {
        let lasso = Lasso::with_min_vertex_spacing(options.lasso_min_vertex_spacing);
        Self {
            options,
            arena: DatasetArena::new(),
            volumes: Vec::new(),
            sweep: SweepClassifier::new(),
            lasso,
            frame: 0,
        }
    }

    /// Returns the session options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Returns the number of frames stepped so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    // ---------------------------------------------------------------------
    // Datasets
    // ---------------------------------------------------------------------

    /// Takes ownership of a dataset.
    pub fn add_dataset(&mut self, dataset: PointCloudDataset) -> Result<DatasetHandle> {
        let handle = self.arena.insert(dataset)?;
        log::info!("session: added dataset {handle}");
        Ok(handle)
    }

    /// Detaches a dataset from every volume and returns it.
    pub fn remove_dataset(&mut self, handle: DatasetHandle) -> Option<PointCloudDataset> {
        for volume in &mut self.volumes {
            volume.remove_dataset(handle);
        }
        self.arena.remove(handle)
    }

    /// Returns a dataset, if the handle is live.
    pub fn dataset(&self, handle: DatasetHandle) -> Option<&PointCloudDataset> {
        self.arena.get(handle)
    }

    /// Returns a dataset mutably, if the handle is live.
    ///
    /// Call [`CleaningSession::notify_dataset_changed`] after replacing points.
    pub fn dataset_mut(&mut self, handle: DatasetHandle) -> Option<&mut PointCloudDataset> {
        self.arena.get_mut(handle)
    }

    /// Marks every volume holding `handle` dirty so its bounds are recomputed.
    pub fn notify_dataset_changed(&mut self, handle: DatasetHandle) {
        for volume in &mut self.volumes {
            if volume.has_dataset(handle) {
                volume.mark_dirty();
            }
        }
    }

    /// Returns the dataset arena.
    pub fn arena(&self) -> &DatasetArena<PointCloudDataset> {
        &self.arena
    }

    // ---------------------------------------------------------------------
    // Volumes
    // ---------------------------------------------------------------------

    /// Adds a volume and returns its id.
    pub fn add_volume(&mut self, volume: DataVolume) -> VolumeId {
        self.volumes.push(volume);
        self.volumes.len() - 1
    }

    /// Adds a volume at the origin with the configured default size.
    pub fn add_default_volume(&mut self) -> VolumeId {
        let mut volume = DataVolume::default();
        volume.set_dimensions(self.options.default_volume_dimensions);
        self.add_volume(volume)
    }

    /// Returns a volume.
    pub fn volume(&self, id: VolumeId) -> Option<&DataVolume> {
        self.volumes.get(id)
    }

    /// Returns a volume mutably, e.g. to move it.
    pub fn volume_mut(&mut self, id: VolumeId) -> Option<&mut DataVolume> {
        self.volumes.get_mut(id)
    }

    /// Attaches a dataset to a volume.
    pub fn attach(&mut self, id: VolumeId, handle: DatasetHandle) -> Result<()> {
        if !self.arena.contains(handle) {
            return Err(SweepcleanError::StaleHandle(handle.to_string()));
        }
        let volume = self
            .volumes
            .get_mut(id)
            .ok_or_else(|| SweepcleanError::StaleHandle(format!("volume {id}")))?;
        volume.add_dataset(handle);
        Ok(())
    }

    /// Detaches a dataset from a volume. The dataset stays in the session.
    pub fn detach(&mut self, id: VolumeId, handle: DatasetHandle) {
        if let Some(volume) = self.volumes.get_mut(id) {
            volume.remove_dataset(handle);
        }
    }

    // ---------------------------------------------------------------------
    // Frame
    // ---------------------------------------------------------------------

    /// Runs one frame: updates dirty volumes, then sweeps `probes` through
    /// every volume.
    pub fn step(
        &mut self,
        mode: SweepMode,
        elapsed: f32,
        probes: &[ProbeSnapshot],
    ) -> FrameReport {
        self.frame += 1;
        let ctx = FrameContext::new(self.frame, mode, elapsed, &self.options);

        let mut report = FrameReport {
            frame: self.frame,
            ..FrameReport::default()
        };

        for volume in &mut self.volumes {
            if volume.update(&self.arena) {
                report.volumes_updated += 1;
            }
        }

        for volume in &self.volumes {
            let stats = self.sweep.sweep_volume(&ctx, volume, &mut self.arena, probes);
            report.sweep.merge(&stats);
        }

        report
    }

    /// Creates a probe at `position` with the session's configured radius.
    pub fn probe_at(&self, position: Vec3) -> ProbeSnapshot {
        ProbeSnapshot::from_options(position, &self.options)
    }

    /// Returns the lasso for feeding pointer input.
    pub fn lasso_mut(&mut self) -> &mut Lasso {
        &mut self.lasso
    }

    /// Applies the closed lasso to every volume, then clears it.
    ///
    /// `elapsed` drives the highlight pulse in [`SweepMode::Preview`].
    pub fn apply_lasso(
        &mut self,
        mode: SweepMode,
        elapsed: f32,
        view_projection: &Mat4,
        viewport: Vec2,
    ) -> LassoStats {
        let ctx = FrameContext::new(self.frame, mode, elapsed, &self.options);
        let mut total = LassoStats::default();
        if !self.lasso.ready_to_check() {
            log::warn!("session: lasso applied before it was closed");
            return total;
        }
        for volume in &self.volumes {
            let stats =
                self.lasso
                    .select_volume(&ctx, volume, &mut self.arena, view_projection, viewport);
            total.points_tested += stats.points_tested;
            total.inside += stats.inside;
            total.newly_flagged += stats.newly_flagged;
        }
        self.lasso.reset();
        total
    }

    // ---------------------------------------------------------------------
    // Marks
    // ---------------------------------------------------------------------

    /// Counts marks over every dataset.
    pub fn mark_counts(&self) -> MarkCounts {
        self.arena
            .iter()
            .map(|(_, d)| d.marks().counts())
            .fold(MarkCounts::default(), |acc, c| MarkCounts {
                unmarked: acc.unmarked + c.unmarked,
                flagged: acc.flagged + c.flagged,
                highlighted: acc.highlighted + c.highlighted,
            })
    }

    /// Resets every mark of every dataset.
    pub fn reset_marks(&mut self) {
        let handles: Vec<_> = self.arena.iter().map(|(h, _)| h).collect();
        for handle in handles {
            if let Some(dataset) = self.arena.get_mut(handle) {
                dataset.marks_mut().reset_all();
                log::debug!("session: reset marks of '{}'", dataset.name());
            }
        }
    }
}

impl Default for CleaningSession {
    fn default() -> Self {
        Self::new(Options::default())
    }
}
