//! Lasso selection with precomputed edge coefficients.
//!
//! The operator draws a closed polygon in screen space. Once drawing ends the
//! polygon is fixed, but it is queried once per point per frame, so each edge's
//! line equation `x = y * multiplicand + constant` is computed once and the
//! per-point test is an even-odd crossing count with only multiplies and
//! compares.

use glam::{Mat4, Vec2, Vec3};
use sweepclean_core::{Dataset, DatasetArena};
use sweepclean_volume::DataVolume;

use crate::context::{resolve_mark, FrameContext};

/// Line coefficients of one polygon edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeCoefficients {
    pub constant: f32,
    pub multiplicand: f32,
}

/// A screen-space lasso polygon.
#[derive(Debug, Clone, Default)]
pub struct Lasso {
    vertices: Vec<Vec2>,
    bbox_min: Vec2,
    bbox_max: Vec2,
    drawing: bool,
    coefficients: Vec<EdgeCoefficients>,
    min_vertex_spacing: f32,
}

/// Counts from one lasso marking pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LassoStats {
    pub points_tested: usize,
    pub inside: usize,
    pub newly_flagged: usize,
}

impl Lasso {
    /// Creates an empty lasso.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty lasso that drops vertices closer than `spacing` pixels
    /// to the previous one.
    pub fn with_min_vertex_spacing(spacing: f32) -> Self {
        Self {
            min_vertex_spacing: spacing.max(0.0),
            ..Self::default()
        }
    }

    /// Discards any previous polygon and starts drawing at `(x, y)`.
    pub fn start(&mut self, x: f32, y: f32) {
        self.reset();
        self.drawing = true;
        let p = Vec2::new(x, y);
        self.vertices.push(p);
        self.bbox_min = p;
        self.bbox_max = p;
    }

    /// Appends a vertex while drawing.
    ///
    /// A vertex equal to the last one is ignored, as is one closer than the
    /// configured minimum spacing.
    pub fn move_to(&mut self, x: f32, y: f32) {
        if !self.drawing {
            return;
        }
        let p = Vec2::new(x, y);
        if let Some(&last) = self.vertices.last() {
            if last == p || last.distance(p) < self.min_vertex_spacing {
                return;
            }
        }
        self.vertices.push(p);
        self.bbox_min = self.bbox_min.min(p);
        self.bbox_max = self.bbox_max.max(p);
    }

    /// Stops drawing and closes the polygon.
    pub fn end(&mut self) {
        self.drawing = false;
        self.coefficients.clear();
        log::debug!("lasso closed with {} vertices", self.vertices.len());
    }

    /// Returns true while vertices are being appended.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Returns the polygon vertices in drawing order.
    #[must_use]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Bounding box of the vertices, if there are any.
    #[must_use]
    pub fn bounding_box(&self) -> Option<(Vec2, Vec2)> {
        if self.vertices.is_empty() {
            None
        } else {
            Some((self.bbox_min, self.bbox_max))
        }
    }

    /// Returns the precomputed edge coefficients, empty until [`Lasso::precalc`].
    #[must_use]
    pub fn coefficients(&self) -> &[EdgeCoefficients] {
        &self.coefficients
    }

    /// Returns true once drawing has ended and the polygon has an area.
    #[must_use]
    pub fn ready_to_check(&self) -> bool {
        !self.drawing && self.vertices.len() >= 3
    }

    /// Computes the line coefficients of every edge.
    ///
    /// Edge `i` runs from vertex `i - 1` (wrapping) to vertex `i`. Horizontal
    /// edges store `constant = x_i` and a zero multiplicand.
    pub fn precalc(&mut self) {
        let n = self.vertices.len();
        self.coefficients.clear();
        self.coefficients.reserve(n);

        for i in 0..n {
            let j = if i == 0 { n - 1 } else { i - 1 };
            let vi = self.vertices[i];
            let vj = self.vertices[j];

            let edge = if vi.y == vj.y {
                EdgeCoefficients {
                    constant: vi.x,
                    multiplicand: 0.0,
                }
            } else {
                let dy = vj.y - vi.y;
                EdgeCoefficients {
                    constant: vi.x - (vi.y * vj.x) / dy + (vi.y * vi.x) / dy,
                    multiplicand: (vj.x - vi.x) / dy,
                }
            };
            self.coefficients.push(edge);
        }
    }

    fn ensure_precalc(&mut self) {
        if self.coefficients.len() != self.vertices.len() {
            self.precalc();
        }
    }

    /// Tests a screen-space point against the closed polygon.
    ///
    /// Always false while drawing or with fewer than three vertices.
    pub fn check_point(&mut self, pt: Vec2) -> bool {
        if !self.ready_to_check() {
            return false;
        }
        self.ensure_precalc();
        self.contains(pt)
    }

    fn contains(&self, pt: Vec2) -> bool {
        if pt.cmplt(self.bbox_min).any() || pt.cmpgt(self.bbox_max).any() {
            return false;
        }

        let n = self.vertices.len();
        let mut inside = false;
        for i in 0..n {
            let j = if i == 0 { n - 1 } else { i - 1 };
            let yi = self.vertices[i].y;
            let yj = self.vertices[j].y;
            let spans = (yi < pt.y && yj >= pt.y) || (yj < pt.y && yi >= pt.y);
            if spans {
                let edge = self.coefficients[i];
                if pt.x < pt.y * edge.multiplicand + edge.constant {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Tests a world-space point by projecting it into the viewport.
    ///
    /// Points behind the camera are outside.
    pub fn check_world_point(
        &mut self,
        world: Vec3,
        view_projection: &Mat4,
        viewport: Vec2,
    ) -> bool {
        match project_to_viewport(world, view_projection, viewport) {
            Some(pt) => self.check_point(pt),
            None => false,
        }
    }

    /// Clears vertices, bounding box and coefficients.
    pub fn reset(&mut self) {
        self.vertices.clear();
        self.coefficients.clear();
        self.bbox_min = Vec2::ZERO;
        self.bbox_max = Vec2::ZERO;
        self.drawing = false;
    }

    /// Marks every point of every dataset in `volume` against the lasso.
    ///
    /// Points projecting inside are flagged or highlighted per `ctx.mode`;
    /// highlights outside are cleared. Does nothing until the lasso is
    /// [ready](Lasso::ready_to_check).
    ///
    /// # Panics
    ///
    /// Panics if an attached dataset was removed from `arena` without being
    /// detached from `volume` first.
    pub fn select_volume<D: Dataset>(
        &mut self,
        ctx: &FrameContext,
        volume: &DataVolume,
        arena: &mut DatasetArena<D>,
        view_projection: &Mat4,
        viewport: Vec2,
    ) -> LassoStats {
        let mut stats = LassoStats::default();
        if !self.ready_to_check() {
            return stats;
        }
        self.ensure_precalc();

        for &handle in volume.datasets() {
            let Some(transform) = volume.transform_for_dataset(handle) else {
                continue;
            };
            let dataset = arena.dataset_mut(handle);
            for index in 0..dataset.point_count() {
                let world = transform
                    .transform_point3(dataset.raw_point_position(index))
                    .as_vec3();
                let hit = project_to_viewport(world, view_projection, viewport)
                    .is_some_and(|pt| self.contains(pt));

                stats.points_tested += 1;
                if hit {
                    stats.inside += 1;
                }

                let existing = dataset.point_mark(index);
                let next = resolve_mark(hit, existing, ctx);
                if next != existing {
                    if next.is_flagged() {
                        stats.newly_flagged += 1;
                    }
                    dataset.set_point_mark(index, next);
                }
            }
        }

        log::debug!(
            "frame {}: lasso enclosed {} of {} point(s)",
            ctx.frame,
            stats.inside,
            stats.points_tested
        );
        stats
    }
}

/// Projects a world point into viewport pixels, origin at the top left.
///
/// Returns `None` for points on or behind the camera plane.
#[must_use]
pub fn project_to_viewport(world: Vec3, view_projection: &Mat4, viewport: Vec2) -> Option<Vec2> {
    let clip = *view_projection * world.extend(1.0);
    if clip.w <= 0.0 {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    Some(Vec2::new(
        (ndc.x * 0.5 + 0.5) * viewport.x,
        (0.5 - ndc.y * 0.5) * viewport.y,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SweepMode;
    use glam::{DVec3, Quat};
    use sweepclean_core::{Mark, PointCloudDataset};

    fn square() -> Lasso {
        let mut lasso = Lasso::new();
        lasso.start(0.0, 0.0);
        lasso.move_to(10.0, 0.0);
        lasso.move_to(10.0, 10.0);
        lasso.move_to(0.0, 10.0);
        lasso.end();
        lasso
    }

    #[test]
    fn test_square_contains_center() {
        let mut lasso = square();
        assert!(lasso.ready_to_check());
        assert!(lasso.check_point(Vec2::new(5.0, 5.0)));
        assert_eq!(lasso.coefficients().len(), 4);
    }

    #[test]
    fn test_outside_bbox_rejected() {
        let mut lasso = square();
        assert!(!lasso.check_point(Vec2::new(15.0, 15.0)));
        assert!(!lasso.check_point(Vec2::new(-0.5, 5.0)));
    }

    #[test]
    fn test_horizontal_edges_use_constant() {
        let mut lasso = square();
        lasso.precalc();
        // Edge 1 runs (0,0) -> (10,0).
        assert_eq!(
            lasso.coefficients()[1],
            EdgeCoefficients {
                constant: 10.0,
                multiplicand: 0.0
            }
        );
    }

    #[test]
    fn test_concave_polygon() {
        // A "U" shape: the notch between the arms is outside.
        let mut lasso = Lasso::new();
        for (x, y) in [
            (0.0, 0.0),
            (9.0, 0.0),
            (9.0, 9.0),
            (6.0, 9.0),
            (6.0, 3.0),
            (3.0, 3.0),
            (3.0, 9.0),
            (0.0, 9.0),
        ] {
            if lasso.vertices().is_empty() {
                lasso.start(x, y);
            } else {
                lasso.move_to(x, y);
            }
        }
        lasso.end();
        assert!(lasso.check_point(Vec2::new(1.5, 6.0)));
        assert!(lasso.check_point(Vec2::new(7.5, 6.0)));
        assert!(lasso.check_point(Vec2::new(4.5, 1.5)));
        assert!(!lasso.check_point(Vec2::new(4.5, 6.0)));
    }

    #[test]
    fn test_duplicate_vertices_ignored() {
        let mut lasso = Lasso::new();
        lasso.start(1.0, 1.0);
        lasso.move_to(1.0, 1.0);
        lasso.move_to(2.0, 1.0);
        lasso.move_to(2.0, 1.0);
        assert_eq!(lasso.vertices().len(), 2);
        assert_eq!(lasso.bounding_box(), Some((Vec2::ONE, Vec2::new(2.0, 1.0))));
    }

    #[test]
    fn test_min_spacing() {
        let mut lasso = Lasso::with_min_vertex_spacing(2.0);
        lasso.start(0.0, 0.0);
        lasso.move_to(1.0, 0.0);
        lasso.move_to(3.0, 0.0);
        assert_eq!(lasso.vertices(), &[Vec2::ZERO, Vec2::new(3.0, 0.0)]);
    }

    #[test]
    fn test_not_ready_while_drawing() {
        let mut lasso = Lasso::new();
        lasso.start(0.0, 0.0);
        lasso.move_to(10.0, 0.0);
        lasso.move_to(10.0, 10.0);
        assert!(!lasso.ready_to_check());
        assert!(!lasso.check_point(Vec2::new(8.0, 2.0)));
        lasso.end();
        assert!(lasso.check_point(Vec2::new(8.0, 2.0)));
    }

    #[test]
    fn test_move_ignored_when_not_drawing() {
        let mut lasso = square();
        lasso.move_to(20.0, 20.0);
        assert_eq!(lasso.vertices().len(), 4);
    }

    #[test]
    fn test_reset() {
        let mut lasso = square();
        lasso.check_point(Vec2::new(5.0, 5.0));
        lasso.reset();
        assert!(lasso.vertices().is_empty());
        assert!(lasso.coefficients().is_empty());
        assert!(lasso.bounding_box().is_none());
        assert!(!lasso.ready_to_check());
    }

    #[test]
    fn test_projection() {
        let viewport = Vec2::new(100.0, 50.0);
        let center = project_to_viewport(Vec3::ZERO, &Mat4::IDENTITY, viewport).unwrap();
        assert_eq!(center, Vec2::new(50.0, 25.0));
        let top_left =
            project_to_viewport(Vec3::new(-1.0, 1.0, 0.0), &Mat4::IDENTITY, viewport).unwrap();
        assert_eq!(top_left, Vec2::ZERO);

        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(1.0, 2.0, 0.1, 100.0);
        assert!(project_to_viewport(Vec3::new(0.0, 0.0, 10.0), &(proj * view), viewport).is_none());
    }

    #[test]
    fn test_select_volume() {
        let mut arena = DatasetArena::new();
        let handle = arena
            .insert(PointCloudDataset::new(
                "grid",
                vec![
                    DVec3::new(0.0, 0.0, 0.0),
                    DVec3::new(10.0, 10.0, 0.0),
                    DVec3::new(5.0, 5.0, 0.0),
                ],
            ))
            .unwrap();
        let mut volume = DataVolume::new(Vec3::ZERO, Quat::IDENTITY, Vec3::splat(2.0));
        volume.add_dataset(handle);
        volume.update(&arena);

        // Identity camera: world x,y in [-1, 1] span the viewport.
        let viewport = Vec2::new(100.0, 100.0);
        let mut lasso = Lasso::new();
        lasso.start(40.0, 40.0);
        lasso.move_to(60.0, 40.0);
        lasso.move_to(60.0, 60.0);
        lasso.move_to(40.0, 60.0);
        lasso.end();

        let ctx = FrameContext::default().with_mode(SweepMode::Clear);
        let stats = lasso.select_volume(&ctx, &volume, &mut arena, &Mat4::IDENTITY, viewport);
        assert_eq!(stats.points_tested, 3);
        assert_eq!(stats.inside, 1);
        assert_eq!(stats.newly_flagged, 1);
        let dataset = arena.dataset(handle);
        assert_eq!(dataset.point_mark(2), Mark::Flagged);
        assert_eq!(dataset.point_mark(0), Mark::Unmarked);
    }

    #[test]
    fn test_check_world_point() {
        let mut lasso = Lasso::new();
        lasso.start(0.0, 0.0);
        lasso.move_to(100.0, 0.0);
        lasso.move_to(100.0, 50.0);
        lasso.move_to(0.0, 50.0);
        lasso.end();
        let viewport = Vec2::new(200.0, 100.0);
        // Upper-left quadrant of the viewport.
        assert!(lasso.check_world_point(Vec3::new(-0.5, 0.5, 0.0), &Mat4::IDENTITY, viewport));
        assert!(!lasso.check_world_point(Vec3::new(0.5, -0.5, 0.0), &Mat4::IDENTITY, viewport));
    }
}
