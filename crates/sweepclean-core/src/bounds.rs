//! Axis-aligned bounds in raw domain coordinates.

use glam::DVec3;

/// Axis-aligned bounds in double precision.
///
/// An empty box has `min = +inf` and `max = -inf` on every axis, so growing it
/// by any point or box yields that point or box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainBounds {
    pub min: DVec3,
    pub max: DVec3,
}

impl Default for DomainBounds {
    fn default() -> Self {
        Self::empty()
    }
}

impl DomainBounds {
    /// Creates bounds from explicit corners.
    #[must_use]
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// The empty box with sentinel extremes.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: DVec3::splat(f64::INFINITY),
            max: DVec3::splat(f64::NEG_INFINITY),
        }
    }

    /// Bounds of a set of points. Empty if `points` is empty.
    #[must_use]
    pub fn from_points(points: &[DVec3]) -> Self {
        points.iter().fold(Self::empty(), |mut b, p| {
            b.include_point(*p);
            b
        })
    }

    /// Returns true if no point has been included.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Grows the bounds to contain `p`.
    pub fn include_point(&mut self, p: DVec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Grows the bounds to contain `other`.
    pub fn include(&mut self, other: &DomainBounds) {
        if other.is_empty() {
            return;
        }
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Per-axis size. Zero for empty bounds.
    #[must_use]
    pub fn extent(&self) -> DVec3 {
        if self.is_empty() {
            DVec3::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Center of the box. Zero for empty bounds.
    #[must_use]
    pub fn center(&self) -> DVec3 {
        if self.is_empty() {
            DVec3::ZERO
        } else {
            (self.min + self.max) * 0.5
        }
    }

    /// Returns true if `p` lies inside the box (inclusive).
    ///
    /// With `check_z` false only X and Y are compared.
    #[must_use]
    pub fn contains(&self, p: DVec3, check_z: bool) -> bool {
        if self.is_empty() {
            return false;
        }
        let in_xy =
            p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y;
        in_xy && (!check_z || (p.z >= self.min.z && p.z <= self.max.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bounds_sentinels() {
        let b = DomainBounds::empty();
        assert!(b.is_empty());
        assert_eq!(b.min, DVec3::splat(f64::INFINITY));
        assert_eq!(b.max, DVec3::splat(f64::NEG_INFINITY));
        assert_eq!(b.extent(), DVec3::ZERO);
        assert!(!b.contains(DVec3::ZERO, true));
    }

    #[test]
    fn test_include() {
        let mut b = DomainBounds::empty();
        b.include(&DomainBounds::new(DVec3::ZERO, DVec3::ONE));
        b.include(&DomainBounds::new(DVec3::splat(-1.0), DVec3::splat(0.5)));
        b.include(&DomainBounds::empty());
        assert_eq!(b.min, DVec3::splat(-1.0));
        assert_eq!(b.max, DVec3::ONE);
        assert_eq!(b.center(), DVec3::ZERO);
    }

    #[test]
    fn test_contains_ignores_z_when_asked() {
        let b = DomainBounds::new(DVec3::ZERO, DVec3::ONE);
        let above = DVec3::new(0.5, 0.5, 4.0);
        assert!(!b.contains(above, true));
        assert!(b.contains(above, false));
    }

    #[test]
    fn test_single_point_has_zero_extent() {
        let b = DomainBounds::from_points(&[DVec3::new(3.0, 4.0, 5.0)]);
        assert!(!b.is_empty());
        assert_eq!(b.extent(), DVec3::ZERO);
    }

    proptest::proptest! {
        #[test]
        fn prop_bounds_contain_their_points(
            points in proptest::collection::vec(
                proptest::array::uniform3(-1.0e7f64..1.0e7),
                1..32,
            ),
        ) {
            let points: Vec<DVec3> = points.into_iter().map(DVec3::from_array).collect();
            let b = DomainBounds::from_points(&points);
            for p in &points {
                proptest::prop_assert!(b.contains(*p, true));
            }
            proptest::prop_assert!(b.extent().cmpge(DVec3::ZERO).all());
        }
    }
}
