use crate::geometry::distances2::{dist, segments_cross, signed_area};
use itertools::Itertools;
use ncollide2d::bounding_volume::AABB;
use ncollide2d::na::{Isometry2, Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Points closer than this are treated as the same point when no tolerance is given
pub const DEFAULT_MERGE_TOL: f64 = 1e-9;

/// Direction in which a closed sequence travels around its interior
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Winding {
    Clockwise,
    CounterClockwise,
}

/// An ordered sequence of 2D points describing either an open curve or a closed contour.
///
/// Two consecutive points never coincide. Closed sequences are closed implicitly: the last
/// point is never a repeat of the first, and the edge from the last point back to the first is
/// part of the contour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointSequence {
    #[serde(with = "crate::serialize::point_list")]
    points: Vec<Point2<f64>>,
    closed: bool,
}

impl PointSequence {
    /// Create a new point sequence. Adjacent points closer than `tol` are merged, and on a
    /// closed sequence a last point that repeats the first one is removed.
    pub fn new(points: Vec<Point2<f64>>, closed: bool, tol: f64) -> PointSequence {
        let mut vertices = points;
        vertices.dedup_by(|a, b| dist(a, b) <= tol);

        if closed && vertices.len() > 1 {
            let first = vertices[0];
            while vertices.len() > 1 && vertices.last().map_or(false, |l| dist(l, &first) <= tol) {
                vertices.pop();
            }
        }

        PointSequence {
            points: vertices,
            closed,
        }
    }

    pub fn open(points: Vec<Point2<f64>>) -> PointSequence {
        Self::new(points, false, DEFAULT_MERGE_TOL)
    }

    pub fn closed(points: Vec<Point2<f64>>) -> PointSequence {
        Self::new(points, true, DEFAULT_MERGE_TOL)
    }

    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point2<f64>> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point2<f64>> {
        self.points.iter()
    }

    /// Applies a point mapping, keeping the closure flag. The merge step is re-run with the
    /// default tolerance, so a transform that collapses points cannot break the invariant.
    pub fn map<F: Fn(&Point2<f64>) -> Point2<f64>>(&self, f: F) -> PointSequence {
        Self::new(self.points.iter().map(f).collect(), self.closed, DEFAULT_MERGE_TOL)
    }

    /// Uniform scale about the origin
    pub fn scaled(&self, factor: f64) -> PointSequence {
        self.map(|p| Point2::new(p.x * factor, p.y * factor))
    }

    pub fn scaled_xy(&self, sx: f64, sy: f64) -> PointSequence {
        self.map(|p| Point2::new(p.x * sx, p.y * sy))
    }

    /// Rotation by an angle in degrees about a center point, counter-clockwise positive
    pub fn rotated(&self, degrees: f64, center: &Point2<f64>) -> PointSequence {
        let iso = Isometry2::rotation(degrees.to_radians());
        self.map(|p| center + iso * (p - center))
    }

    pub fn translated(&self, offset: &Vector2<f64>) -> PointSequence {
        self.map(|p| p + offset)
    }

    /// Mirror across the x axis (y becomes -y). Reverses the winding of a closed sequence.
    pub fn mirrored_x(&self) -> PointSequence {
        self.map(|p| Point2::new(p.x, -p.y))
    }

    /// Mirror across the y axis (x becomes -x). Reverses the winding of a closed sequence.
    pub fn mirrored_y(&self) -> PointSequence {
        self.map(|p| Point2::new(-p.x, p.y))
    }

    pub fn reversed(&self) -> PointSequence {
        let mut points = self.points.clone();
        points.reverse();
        PointSequence {
            points,
            closed: self.closed,
        }
    }

    /// Axis aligned bounds of the points, None for an empty sequence
    pub fn bounds(&self) -> Option<AABB<f64>> {
        let first = self.points.first()?;
        let (mins, maxs) = self.points.iter().fold((*first, *first), |(lo, hi), p| {
            (
                Point2::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point2::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        });
        Some(AABB::new(mins, maxs))
    }

    /// The segments of the curve as point pairs, including the closing segment when closed
    pub fn edges(&self) -> Vec<(Point2<f64>, Point2<f64>)> {
        let mut edges: Vec<(Point2<f64>, Point2<f64>)> =
            self.points.iter().copied().tuple_windows().collect();
        if self.closed && self.points.len() > 2 {
            if let (Some(last), Some(first)) = (self.points.last(), self.points.first()) {
                edges.push((*last, *first));
            }
        }
        edges
    }

    /// Total length along the curve
    pub fn length(&self) -> f64 {
        self.edges().iter().map(|(a, b)| dist(a, b)).sum()
    }

    /// Signed area enclosed by the implied polygon, positive when counter-clockwise. Only
    /// meaningful for closed sequences.
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.points)
    }

    pub fn winding(&self) -> Option<Winding> {
        if !self.closed {
            return None;
        }
        let area = self.signed_area();
        if area > 0.0 {
            Some(Winding::CounterClockwise)
        } else if area < 0.0 {
            Some(Winding::Clockwise)
        } else {
            None
        }
    }

    /// True when all points fall within `tol` of a single point
    pub fn is_degenerate(&self, tol: f64) -> bool {
        match self.bounds() {
            Some(b) => {
                let extent = b.maxs - b.mins;
                extent.x <= tol && extent.y <= tol
            }
            None => true,
        }
    }

    /// Checks every pair of non-adjacent edges for a crossing
    pub fn self_intersects(&self) -> bool {
        let edges = self.edges();
        let n = edges.len();
        for i in 0..n {
            for j in (i + 2)..n {
                // On a closed contour the first and the last edge share a vertex
                if self.closed && i == 0 && j == n - 1 {
                    continue;
                }
                let (a0, a1) = &edges[i];
                let (b0, b1) = &edges[j];
                if segments_cross(a0, a1, b0, b1) {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square() -> PointSequence {
        PointSequence::closed(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ])
    }

    #[test]
    fn consecutive_duplicates_are_merged() {
        let s = PointSequence::open(vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1e-12),
            Point2::new(2.0, 0.0),
        ]);
        assert_eq!(3, s.len());
        assert!(s.points().iter().tuple_windows().all(|(a, b)| dist(a, b) > DEFAULT_MERGE_TOL));
    }

    #[test]
    fn explicit_closing_point_is_dropped() {
        let s = PointSequence::closed(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 0.0),
        ]);
        assert_eq!(3, s.len());
        assert_eq!(3, s.edges().len());
    }

    #[test]
    fn open_sequence_keeps_repeated_end() {
        let s = PointSequence::open(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 0.0),
        ]);
        assert_eq!(3, s.len());
        assert_eq!(2, s.edges().len());
    }

    #[test]
    fn rotation_about_origin_is_counter_clockwise() {
        let s = PointSequence::open(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]);
        let r = s.rotated(90.0, &Point2::origin());
        assert_relative_eq!(0.0, r.points()[1].x, epsilon = 1e-12);
        assert_relative_eq!(1.0, r.points()[1].y, epsilon = 1e-12);
    }

    #[test]
    fn rotation_about_center_keeps_center() {
        let r = square().rotated(33.0, &Point2::new(1.0, 1.0));
        assert_relative_eq!(1.0, r.points()[2].x, epsilon = 1e-12);
        assert_relative_eq!(1.0, r.points()[2].y, epsilon = 1e-12);
    }

    #[test]
    fn bounds_and_transforms() {
        let s = square().scaled_xy(2.0, 3.0).translated(&Vector2::new(-1.0, 0.5));
        let b = s.bounds().unwrap();
        assert_relative_eq!(-1.0, b.mins.x, epsilon = 1e-12);
        assert_relative_eq!(1.0, b.maxs.x, epsilon = 1e-12);
        assert_relative_eq!(0.5, b.mins.y, epsilon = 1e-12);
        assert_relative_eq!(3.5, b.maxs.y, epsilon = 1e-12);
    }

    #[test]
    fn mirroring_reverses_winding() {
        let s = square();
        assert_eq!(Some(Winding::CounterClockwise), s.winding());
        assert_eq!(Some(Winding::Clockwise), s.mirrored_x().winding());
        assert_eq!(Some(Winding::Clockwise), s.mirrored_y().winding());
        assert_eq!(Some(Winding::Clockwise), s.reversed().winding());
        assert_eq!(None, PointSequence::open(s.points().to_vec()).winding());
    }

    #[test]
    fn square_perimeter() {
        assert_relative_eq!(4.0, square().length(), epsilon = 1e-12);
    }

    #[test]
    fn degenerate_detection() {
        let tiny = PointSequence::closed(vec![
            Point2::new(5.0, 5.0),
            Point2::new(5.0 + 1e-8, 5.0),
            Point2::new(5.0, 5.0 + 1e-8),
        ]);
        assert!(tiny.is_degenerate(1e-6));
        assert!(!square().is_degenerate(1e-6));
        assert!(PointSequence::open(Vec::new()).is_degenerate(1e-6));
    }

    #[test]
    fn bow_tie_self_intersects() {
        let bow_tie = PointSequence::closed(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ]);
        assert!(bow_tie.self_intersects());
        assert!(!square().self_intersects());
    }
}
