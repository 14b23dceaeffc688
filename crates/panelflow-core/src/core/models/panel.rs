use nalgebra::{Point2, Vector2};
use std::f64::consts::PI;

/// Which side of the airfoil a panel belongs to, judged from its outward normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceSide {
    /// Normal angle in `[0, π]`: the normal points upward.
    Upper,
    /// Normal angle in `(π, 2π)`: the normal points downward.
    Lower,
}

impl SurfaceSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            SurfaceSide::Upper => "upper",
            SurfaceSide::Lower => "lower",
        }
    }
}

/// A straight segment of the discretized airfoil contour.
///
/// Panels are immutable. Everything that changes between freestream cases (source strength,
/// tangential velocity, pressure coefficient) is kept in
/// [`SolutionState`](crate::engine::state::SolutionState), indexed by panel position.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    /// First end-point, in traversal order of the contour.
    pub start: Point2<f64>,
    /// Second end-point.
    pub end: Point2<f64>,
    /// Control point where the boundary conditions are enforced (the midpoint).
    pub center: Point2<f64>,
    /// Euclidean length of the segment.
    pub length: f64,
    /// Angle between the x-axis and the outward normal, in `[0, 2π)`.
    pub beta: f64,
    /// Upper or lower surface, derived from `beta`.
    pub side: SurfaceSide,
}

impl Panel {
    /// Creates a panel between two distinct points.
    ///
    /// The orientation follows a clockwise-outward convention: a contour traversed from the
    /// trailing edge over the upper surface, around the leading edge and back along the lower
    /// surface yields normals pointing away from the body.
    ///
    /// # Arguments
    ///
    /// * `start` - The first end-point.
    /// * `end` - The second end-point; must differ from `start`.
    pub fn new(start: Point2<f64>, end: Point2<f64>) -> Self {
        debug_assert!(start != end, "panel end-points must be distinct");

        let center = Point2::new(0.5 * (start.x + end.x), 0.5 * (start.y + end.y));
        let length = (end - start).norm();
        let dy = end.y - start.y;

        let beta = if end.x - start.x <= 0.0 {
            (dy / length).clamp(-1.0, 1.0).acos()
        } else {
            PI + (-dy / length).clamp(-1.0, 1.0).acos()
        };

        let side = if beta <= PI {
            SurfaceSide::Upper
        } else {
            SurfaceSide::Lower
        };

        Self {
            start,
            end,
            center,
            length,
            beta,
            side,
        }
    }

    /// Unit outward normal `(cos β, sin β)`.
    #[inline]
    pub fn normal(&self) -> Vector2<f64> {
        Vector2::new(self.beta.cos(), self.beta.sin())
    }

    /// Unit tangent `(-sin β, cos β)`, pointing from `start` to `end`.
    #[inline]
    pub fn tangent(&self) -> Vector2<f64> {
        Vector2::new(-self.beta.sin(), self.beta.cos())
    }

    /// Point at arc length `s` from `start` along the panel.
    #[inline]
    pub fn point_at(&self, s: f64) -> Point2<f64> {
        Point2::new(
            self.start.x - self.beta.sin() * s,
            self.start.y + self.beta.cos() * s,
        )
    }
}

/// Chord of a panel set: the x-extent of the panel start points.
pub fn chord_length(panels: &[Panel]) -> f64 {
    let (min, max) = panels
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.start.x), hi.max(p.start.x))
        });
    if panels.is_empty() { 0.0 } else { max - min }
}

/// Total contour length of a panel set.
pub fn perimeter(panels: &[Panel]) -> f64 {
    panels.iter().map(|p| p.length).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_4;

    const TOLERANCE: f64 = 1e-12;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn new_panel_computes_center_and_length() {
        let panel = Panel::new(Point2::new(1.0, 0.0), Point2::new(0.0, 1.0));
        assert_eq!(panel.center, Point2::new(0.5, 0.5));
        assert!(f64_approx_equal(panel.length, 2f64.sqrt()));
    }

    #[test]
    fn panel_traversed_leftward_on_top_faces_upward() {
        let panel = Panel::new(Point2::new(1.0, 0.0), Point2::new(0.0, 1.0));
        assert!(f64_approx_equal(panel.beta, FRAC_PI_4));
        assert_eq!(panel.side, SurfaceSide::Upper);
    }

    #[test]
    fn panel_traversed_rightward_on_bottom_faces_downward() {
        let panel = Panel::new(Point2::new(-1.0, 0.0), Point2::new(0.0, -1.0));
        assert!(f64_approx_equal(panel.beta, 5.0 * FRAC_PI_4));
        assert_eq!(panel.side, SurfaceSide::Lower);

        let panel = Panel::new(Point2::new(0.0, -1.0), Point2::new(1.0, 0.0));
        assert!(f64_approx_equal(panel.beta, 7.0 * FRAC_PI_4));
        assert_eq!(panel.side, SurfaceSide::Lower);
    }

    #[test]
    fn vertical_panel_at_leading_edge_faces_forward() {
        let panel = Panel::new(Point2::new(0.0, 0.1), Point2::new(0.0, -0.1));
        assert!(f64_approx_equal(panel.beta, PI));
        assert_eq!(panel.side, SurfaceSide::Upper);
    }

    #[test]
    fn beta_is_always_within_full_turn() {
        let points = [
            (Point2::new(1.0, 0.0), Point2::new(0.5, 0.3)),
            (Point2::new(0.5, 0.3), Point2::new(0.0, 0.0)),
            (Point2::new(0.0, 0.0), Point2::new(0.5, -0.3)),
            (Point2::new(0.5, -0.3), Point2::new(1.0, 0.0)),
        ];
        for (a, b) in points {
            let panel = Panel::new(a, b);
            assert!((0.0..2.0 * PI).contains(&panel.beta), "beta {}", panel.beta);
        }
    }

    #[test]
    fn normal_is_perpendicular_to_segment_and_tangent_follows_traversal() {
        let panel = Panel::new(Point2::new(0.8, 0.05), Point2::new(0.3, 0.08));
        let segment = (panel.end - panel.start) / panel.length;
        assert!(panel.normal().dot(&segment).abs() < TOLERANCE);
        assert!(f64_approx_equal(panel.tangent().dot(&segment), 1.0));
    }

    #[test]
    fn point_at_walks_from_start_to_end() {
        let panel = Panel::new(Point2::new(0.8, 0.05), Point2::new(0.3, 0.08));
        let start = panel.point_at(0.0);
        let end = panel.point_at(panel.length);
        assert!(f64_approx_equal(start.x, 0.8) && f64_approx_equal(start.y, 0.05));
        assert!((end - panel.end).norm() < 1e-12);
    }

    #[test]
    fn chord_and_perimeter_of_a_diamond() {
        let corners = [
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(-1.0, 0.0),
            Point2::new(0.0, -1.0),
        ];
        let panels: Vec<_> = (0..4)
            .map(|i| Panel::new(corners[i], corners[(i + 1) % 4]))
            .collect();
        assert!(f64_approx_equal(chord_length(&panels), 2.0));
        assert!(f64_approx_equal(perimeter(&panels), 4.0 * 2f64.sqrt()));
        assert_eq!(chord_length(&[]), 0.0);
    }

    #[test]
    fn surface_side_names_are_lowercase() {
        assert_eq!(SurfaceSide::Upper.as_str(), "upper");
        assert_eq!(SurfaceSide::Lower.as_str(), "lower");
    }
}
