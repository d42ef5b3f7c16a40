//! Current/previous value pairs.

/// A value together with the value it had before the last recompute.
///
/// Consumers compare the two to detect motion between frames. Both halves are
/// replaced together by [`Snapshot::advance`], so a reader never sees a half
/// updated pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Snapshot<T> {
    pub current: T,
    pub previous: T,
}

impl<T: Copy> Snapshot<T> {
    /// Creates a snapshot whose previous value equals `value`.
    pub fn new(value: T) -> Self {
        Self {
            current: value,
            previous: value,
        }
    }

    /// Moves the current value into the previous slot and stores `next`.
    pub fn advance(&mut self, next: T) {
        self.previous = self.current;
        self.current = next;
    }

    /// Forces the previous value to equal the current one.
    pub fn settle(&mut self) {
        self.previous = self.current;
    }
}

impl<T: Copy + PartialEq> Snapshot<T> {
    /// Returns true if the value changed in the last advance.
    pub fn changed(&self) -> bool {
        self.current != self.previous
    }
}
