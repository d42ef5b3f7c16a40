//! Dataset arena with generational handles.
//!
//! The arena is the single owner of loaded datasets. Volumes and classifiers
//! refer to datasets by [`DatasetHandle`]; removing a dataset bumps its slot
//! generation, so any handle still pointing at it stops resolving.

use std::fmt;

use crate::dataset::{Dataset, PointCloudDataset};
use crate::error::{Result, SweepcleanError};

/// Non-owning reference to a dataset stored in a [`DatasetArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatasetHandle {
    index: u32,
    generation: u32,
}

impl DatasetHandle {
    /// Slot index inside the arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.index as usize
    }

    /// Generation of the slot when this handle was issued.
    #[must_use]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for DatasetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}@{}", self.index, self.generation)
    }
}

struct Slot<D> {
    generation: u32,
    dataset: Option<D>,
}

/// Owner of all datasets, addressed by [`DatasetHandle`].
pub struct DatasetArena<D: Dataset = PointCloudDataset> {
    slots: Vec<Slot<D>>,
    free: Vec<u32>,
}

impl<D: Dataset> Default for DatasetArena<D> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<D: Dataset> DatasetArena<D> {
    /// Creates a new empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a dataset and returns its handle.
    ///
    /// Returns an error if a dataset with the same name is already stored.
    #[allow(clippy::cast_possible_truncation)]
    pub fn insert(&mut self, dataset: D) -> Result<DatasetHandle> {
        if self.find_by_name(dataset.name()).is_some() {
            return Err(SweepcleanError::DatasetExists(dataset.name().to_string()));
        }

        log::debug!("arena: inserting dataset '{}'", dataset.name());

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.dataset = Some(dataset);
            return Ok(DatasetHandle {
                index,
                generation: slot.generation,
            });
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            dataset: Some(dataset),
        });
        Ok(DatasetHandle {
            index,
            generation: 0,
        })
    }

    /// Removes a dataset, invalidating every copy of its handle.
    ///
    /// Callers must detach the handle from every volume first.
    pub fn remove(&mut self, handle: DatasetHandle) -> Option<D> {
        let slot = self.slots.get_mut(handle.index())?;
        if slot.generation != handle.generation {
            return None;
        }
        let dataset = slot.dataset.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        log::debug!("arena: removed dataset '{}'", dataset.name());
        Some(dataset)
    }

    /// Returns the dataset behind `handle`, if it is still live.
    pub fn get(&self, handle: DatasetHandle) -> Option<&D> {
        self.slots
            .get(handle.index())
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.dataset.as_ref())
    }

    /// Returns the dataset behind `handle` mutably, if it is still live.
    pub fn get_mut(&mut self, handle: DatasetHandle) -> Option<&mut D> {
        self.slots
            .get_mut(handle.index())
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.dataset.as_mut())
    }

    /// Like [`DatasetArena::get`], but for handles that must be live.
    ///
    /// # Panics
    ///
    /// Panics if the dataset has been removed while still referenced.
    pub fn dataset(&self, handle: DatasetHandle) -> &D {
        match self.get(handle) {
            Some(dataset) => dataset,
            None => panic!("dataset {handle} was removed while still referenced"),
        }
    }

    /// Like [`DatasetArena::get_mut`], but for handles that must be live.
    ///
    /// # Panics
    ///
    /// Panics if the dataset has been removed while still referenced.
    pub fn dataset_mut(&mut self, handle: DatasetHandle) -> &mut D {
        match self.get_mut(handle) {
            Some(dataset) => dataset,
            None => panic!("dataset {handle} was removed while still referenced"),
        }
    }

    /// Checks if `handle` still resolves.
    pub fn contains(&self, handle: DatasetHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Looks a dataset up by name.
    #[allow(clippy::cast_possible_truncation)]
    pub fn find_by_name(&self, name: &str) -> Option<DatasetHandle> {
        self.slots.iter().enumerate().find_map(|(i, slot)| {
            slot.dataset
                .as_ref()
                .filter(|d| d.name() == name)
                .map(|_| DatasetHandle {
                    index: i as u32,
                    generation: slot.generation,
                })
        })
    }

    /// Returns an iterator over all live datasets.
    #[allow(clippy::cast_possible_truncation)]
    pub fn iter(&self) -> impl Iterator<Item = (DatasetHandle, &D)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.dataset.as_ref().map(|d| {
                (
                    DatasetHandle {
                        index: i as u32,
                        generation: slot.generation,
                    },
                    d,
                )
            })
        })
    }

    /// Returns the number of live datasets.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.dataset.is_some()).count()
    }

    /// Returns true if the arena holds no datasets.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
