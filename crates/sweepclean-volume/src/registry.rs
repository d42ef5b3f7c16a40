//! Datasets attached to one volume.

use sweepclean_core::{Dataset, DatasetArena, DatasetHandle, DomainBounds};

/// Combined bounds of the datasets attached to a volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatedBounds {
    /// Union of the raw bounds of every loaded dataset.
    pub bounds: DomainBounds,
    /// Union of the uncertainty ranges of every loaded dataset that has one.
    pub uncertainty: Option<(f32, f32)>,
    /// False if any attached dataset is still loading.
    pub all_loaded: bool,
}

/// The set of dataset handles attached to one volume, in attachment order.
#[derive(Debug, Clone, Default)]
pub struct DatasetRegistry {
    handles: Vec<DatasetHandle>,
}

impl DatasetRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a dataset. Returns false if it was already attached.
    pub fn add(&mut self, handle: DatasetHandle) -> bool {
        if self.contains(handle) {
            return false;
        }
        self.handles.push(handle);
        true
    }

    /// Detaches a dataset. Returns false if it was not attached.
    pub fn remove(&mut self, handle: DatasetHandle) -> bool {
        let before = self.handles.len();
        self.handles.retain(|h| *h != handle);
        self.handles.len() != before
    }

    /// Checks if a dataset is attached.
    pub fn contains(&self, handle: DatasetHandle) -> bool {
        self.handles.contains(&handle)
    }

    /// Returns the attached handles.
    pub fn handles(&self) -> &[DatasetHandle] {
        &self.handles
    }

    /// Returns the number of attached datasets.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns true if no dataset is attached.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Aggregates bounds and uncertainty over the attached datasets.
    ///
    /// Datasets that are not loaded contribute nothing.
    ///
    /// # Panics
    ///
    /// Panics if an attached dataset was removed from the arena without being
    /// detached first.
    pub fn aggregate<D: Dataset>(&self, arena: &DatasetArena<D>) -> AggregatedBounds {
        let mut bounds = DomainBounds::empty();
        let mut uncertainty: Option<(f32, f32)> = None;
        let mut all_loaded = true;

        for &handle in &self.handles {
            let dataset = arena.dataset(handle);
            if !dataset.is_loaded() {
                all_loaded = false;
                continue;
            }
            bounds.include(&dataset.bounds());
            if let Some((lo, hi)) = dataset.uncertainty_range() {
                uncertainty = Some(match uncertainty {
                    Some((cur_lo, cur_hi)) => (cur_lo.min(lo), cur_hi.max(hi)),
                    None => (lo, hi),
                });
            }
        }

        AggregatedBounds {
            bounds,
            uncertainty,
            all_loaded,
        }
    }
}
