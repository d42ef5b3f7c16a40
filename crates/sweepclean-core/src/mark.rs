//! Per-point marks and the store that holds them.
//!
//! A [`Mark`] is the classification result that renderers read to pick a draw
//! color. Flagged marks are sticky; highlights are transient and are cleared by
//! the classifiers as soon as a point leaves the probe.

use serde::{Deserialize, Serialize};

/// Offset added to a highlight intensity when packing a mark into a single float.
pub const HIGHLIGHT_SHADER_OFFSET: f32 = 100.0;

/// Classification state of a single point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Mark {
    /// Not selected.
    #[default]
    Unmarked,
    /// Flagged for removal. Persists until explicitly reset.
    Flagged,
    /// Currently inside a preview probe, with a pulse intensity for display.
    Highlighted(f32),
}

impl Mark {
    /// Returns true for [`Mark::Flagged`].
    #[must_use]
    pub fn is_flagged(self) -> bool {
        matches!(self, Mark::Flagged)
    }

    /// Returns true for [`Mark::Highlighted`].
    #[must_use]
    pub fn is_highlighted(self) -> bool {
        matches!(self, Mark::Highlighted(_))
    }

    /// Returns true for [`Mark::Unmarked`].
    #[must_use]
    pub fn is_unmarked(self) -> bool {
        matches!(self, Mark::Unmarked)
    }

    /// Packs the mark into one float for per-point GPU attributes.
    ///
    /// `0` is unmarked, `1` is flagged and highlights are encoded as
    /// `HIGHLIGHT_SHADER_OFFSET + intensity`.
    #[must_use]
    pub fn to_shader_value(self) -> f32 {
        match self {
            Mark::Unmarked => 0.0,
            Mark::Flagged => 1.0,
            Mark::Highlighted(t) => HIGHLIGHT_SHADER_OFFSET + t,
        }
    }

    /// Inverse of [`Mark::to_shader_value`].
    #[must_use]
    pub fn from_shader_value(value: f32) -> Self {
        if value >= HIGHLIGHT_SHADER_OFFSET {
            Mark::Highlighted(value - HIGHLIGHT_SHADER_OFFSET)
        } else if value >= 0.5 {
            Mark::Flagged
        } else {
            Mark::Unmarked
        }
    }

    /// The value written to the `flag` column of exported CSV files.
    #[must_use]
    pub fn flag_value(self) -> u8 {
        u8::from(self.is_flagged())
    }
}

/// Number of points in each mark state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MarkCounts {
    pub unmarked: usize,
    pub flagged: usize,
    pub highlighted: usize,
}

/// Dense per-point mark storage.
///
/// Indexing out of range panics; point indices come from the owning dataset
/// and an invalid one is a programming error.
#[derive(Debug, Clone, Default)]
pub struct MarkStore {
    marks: Vec<Mark>,
}

impl MarkStore {
    /// Creates a store with `len` unmarked points.
    pub fn new(len: usize) -> Self {
        Self {
            marks: vec![Mark::Unmarked; len],
        }
    }

    /// Returns the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Returns true if the store holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Returns the mark of point `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Mark {
        self.marks[index]
    }

    /// Sets the mark of point `index`.
    pub fn set(&mut self, index: usize, mark: Mark) {
        self.marks[index] = mark;
    }

    /// Grows or shrinks the store, filling new slots with [`Mark::Unmarked`].
    pub fn resize(&mut self, len: usize) {
        self.marks.resize(len, Mark::Unmarked);
    }

    /// Returns all marks.
    #[must_use]
    pub fn as_slice(&self) -> &[Mark] {
        &self.marks
    }

    /// Counts points per state.
    #[must_use]
    pub fn counts(&self) -> MarkCounts {
        let mut counts = MarkCounts::default();
        for mark in &self.marks {
            match mark {
                Mark::Unmarked => counts.unmarked += 1,
                Mark::Flagged => counts.flagged += 1,
                Mark::Highlighted(_) => counts.highlighted += 1,
            }
        }
        counts
    }

    /// Returns the indices of flagged points.
    pub fn flagged_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.marks
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_flagged())
            .map(|(i, _)| i)
    }

    /// Resets every highlight to unmarked. Returns how many were cleared.
    pub fn clear_highlights(&mut self) -> usize {
        let mut cleared = 0;
        for mark in &mut self.marks {
            if mark.is_highlighted() {
                *mark = Mark::Unmarked;
                cleared += 1;
            }
        }
        cleared
    }

    /// Resets every point, flagged ones included.
    pub fn reset_all(&mut self) {
        self.marks.fill(Mark::Unmarked);
    }

    /// Packs all marks for upload as a per-point float attribute.
    #[must_use]
    pub fn shader_values(&self) -> Vec<f32> {
        self.marks.iter().map(|m| m.to_shader_value()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_default_is_unmarked() {
        assert_eq!(Mark::default(), Mark::Unmarked);
        assert!(Mark::default().is_unmarked());
    }

    #[test]
    fn test_shader_value_encoding() {
        assert_eq!(Mark::Unmarked.to_shader_value(), 0.0);
        assert_eq!(Mark::Flagged.to_shader_value(), 1.0);
        assert_eq!(Mark::Highlighted(0.25).to_shader_value(), 100.25);
        assert_eq!(Mark::from_shader_value(100.25), Mark::Highlighted(0.25));
        assert_eq!(Mark::from_shader_value(1.0), Mark::Flagged);
        assert_eq!(Mark::from_shader_value(0.0), Mark::Unmarked);
    }

    #[test]
    fn test_flag_value() {
        assert_eq!(Mark::Flagged.flag_value(), 1);
        assert_eq!(Mark::Highlighted(0.5).flag_value(), 0);
        assert_eq!(Mark::Unmarked.flag_value(), 0);
    }

    #[test]
    fn test_store_counts() {
        let mut store = MarkStore::new(4);
        store.set(0, Mark::Flagged);
        store.set(2, Mark::Highlighted(0.1));
        let counts = store.counts();
        assert_eq!(counts.unmarked, 2);
        assert_eq!(counts.flagged, 1);
        assert_eq!(counts.highlighted, 1);
        assert_eq!(store.flagged_indices().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_clear_highlights_keeps_flags() {
        let mut store = MarkStore::new(3);
        store.set(0, Mark::Flagged);
        store.set(1, Mark::Highlighted(0.7));
        assert_eq!(store.clear_highlights(), 1);
        assert_eq!(store.get(0), Mark::Flagged);
        assert_eq!(store.get(1), Mark::Unmarked);

        store.reset_all();
        assert_eq!(store.counts().unmarked, 3);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_panics() {
        let store = MarkStore::new(2);
        let _ = store.get(2);
    }
}
