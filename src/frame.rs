//! Fuselage frame cross-sections. A frame is a closed polygon inscribed in the ellipse of the
//! frame's width and height, with a fixed number of points so that consecutive frames can be
//! lofted into one fuselage skin.

use crate::errors::{require_positive, GenerationError};
use crate::geometry::PointSequence;
use ncollide2d::na::Point2;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use tracing::debug;

/// The allowed number of points on a frame
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum FramePoints {
    Eight,
    Twelve,
    Sixteen,
}

impl FramePoints {
    pub fn count(&self) -> usize {
        match self {
            FramePoints::Eight => 8,
            FramePoints::Twelve => 12,
            FramePoints::Sixteen => 16,
        }
    }
}

impl TryFrom<usize> for FramePoints {
    type Error = GenerationError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            8 => Ok(FramePoints::Eight),
            12 => Ok(FramePoints::Twelve),
            16 => Ok(FramePoints::Sixteen),
            _ => Err(GenerationError::InvalidPointCount(value)),
        }
    }
}

impl From<FramePoints> for usize {
    fn from(value: FramePoints) -> Self {
        value.count()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameSpec {
    /// Position of the frame plane along the fuselage axis
    pub station: f64,
    pub width: f64,
    pub height: f64,

    /// Vertical position of the frame centre
    #[serde(default)]
    pub z_offset: f64,

    pub point_count: FramePoints,

    /// When set, the frame touches the full width and height. Otherwise the points sit between
    /// the axes and the realised dimensions come out slightly smaller.
    pub constrained: bool,
}

impl FrameSpec {
    pub fn new(
        station: f64,
        width: f64,
        height: f64,
        point_count: FramePoints,
        constrained: bool,
    ) -> FrameSpec {
        FrameSpec {
            station,
            width,
            height,
            z_offset: 0.0,
            point_count,
            constrained,
        }
    }
}

/// Unit direction for vertex `i` of `n`, starting at the top and running clockwise. Vertices on
/// the axes get exact values so that the constrained extremes hit the requested dimensions.
fn vertex_direction(i: usize, n: usize, half_step: bool) -> (f64, f64) {
    if !half_step && (4 * i) % n == 0 {
        return match (4 * i) / n {
            0 => (0.0, 1.0),
            1 => (1.0, 0.0),
            2 => (0.0, -1.0),
            _ => (-1.0, 0.0),
        };
    }

    let step = if half_step { i as f64 + 0.5 } else { i as f64 };
    let angle = FRAC_PI_2 - TAU * step / n as f64;
    (angle.cos(), angle.sin())
}

/// Generates the closed frame polygon in the frame plane, x across and y up
pub fn generate(spec: &FrameSpec) -> Result<PointSequence, GenerationError> {
    require_positive("width", spec.width)?;
    require_positive("height", spec.height)?;
    if !spec.z_offset.is_finite() {
        return Err(GenerationError::invalid_parameter(
            "z_offset",
            format!("must be finite, got {}", spec.z_offset),
        ));
    }

    let n = spec.point_count.count();
    let a = spec.width / 2.0;
    let b = spec.height / 2.0;

    let points: Vec<Point2<f64>> = (0..n)
        .map(|i| {
            let (c, s) = vertex_direction(i, n, !spec.constrained);
            Point2::new(a * c, spec.z_offset + b * s)
        })
        .collect();

    // Neighbours closer than the merge tolerance would be merged away
    let sequence = PointSequence::closed(points);
    if sequence.len() != n {
        return Err(GenerationError::invalid_parameter(
            "size",
            format!(
                "a {} x {} frame is too small to keep {} distinct points",
                spec.width, spec.height, n
            ),
        ));
    }

    debug!(
        station = spec.station,
        points = n,
        constrained = spec.constrained,
        "generated frame"
    );
    Ok(sequence)
}

/// The width and height the generated frame actually spans
pub fn realised_dimensions(spec: &FrameSpec) -> (f64, f64) {
    if spec.constrained {
        (spec.width, spec.height)
    } else {
        let factor = (PI / spec.point_count.count() as f64).cos();
        (spec.width * factor, spec.height * factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Winding;
    use approx::assert_relative_eq;
    use test_case::test_case;

    fn extents(s: &PointSequence) -> (f64, f64) {
        let b = s.bounds().unwrap();
        (b.maxs.x - b.mins.x, b.maxs.y - b.mins.y)
    }

    #[test]
    fn eight_point_example() {
        let spec = FrameSpec::new(0.0, 2000.0, 1800.0, FramePoints::Eight, true);
        let s = generate(&spec).unwrap();
        assert_eq!(8, s.len());
        assert!(s.is_closed());

        let max_x = s.iter().map(|p| p.x.abs()).fold(0.0, f64::max);
        let max_y = s.iter().map(|p| p.y.abs()).fold(0.0, f64::max);
        assert_eq!(1000.0, max_x);
        assert_eq!(900.0, max_y);
    }

    #[test_case(FramePoints::Eight)]
    #[test_case(FramePoints::Twelve)]
    #[test_case(FramePoints::Sixteen)]
    fn constrained_bounding_box(count: FramePoints) {
        let spec = FrameSpec::new(10.0, 3.0, 2.0, count, true);
        let s = generate(&spec).unwrap();
        assert_eq!(count.count(), s.len());
        assert_eq!((3.0, 2.0), extents(&s));
    }

    #[test_case(FramePoints::Eight)]
    #[test_case(FramePoints::Twelve)]
    #[test_case(FramePoints::Sixteen)]
    fn free_frame_matches_realised_dimensions(count: FramePoints) {
        let spec = FrameSpec::new(0.0, 3.0, 2.0, count, false);
        let s = generate(&spec).unwrap();
        let (w, h) = extents(&s);
        let (ew, eh) = realised_dimensions(&spec);
        assert_relative_eq!(ew, w, epsilon = 1e-12);
        assert_relative_eq!(eh, h, epsilon = 1e-12);
        assert!(w < 3.0 && h < 2.0);
    }

    #[test_case(true)]
    #[test_case(false)]
    fn symmetric_about_both_axes(constrained: bool) {
        let spec = FrameSpec::new(0.0, 4.0, 2.0, FramePoints::Twelve, constrained);
        let s = generate(&spec).unwrap();
        for p in s.iter() {
            assert!(s.iter().any(|q| (q.x + p.x).abs() < 1e-12 && (q.y - p.y).abs() < 1e-12));
            assert!(s.iter().any(|q| (q.x - p.x).abs() < 1e-12 && (q.y + p.y).abs() < 1e-12));
        }
    }

    #[test]
    fn starts_at_top_and_runs_clockwise() {
        let spec = FrameSpec::new(0.0, 2.0, 2.0, FramePoints::Sixteen, true);
        let s = generate(&spec).unwrap();
        assert_eq!(Point2::new(0.0, 1.0), s.points()[0]);
        assert_eq!(Some(Winding::Clockwise), s.winding());
        assert!(!s.self_intersects());
    }

    #[test]
    fn vertical_offset_moves_the_centre() {
        let mut spec = FrameSpec::new(0.0, 2.0, 1.0, FramePoints::Eight, true);
        spec.z_offset = 5.0;
        let b = generate(&spec).unwrap().bounds().unwrap();
        assert_eq!(4.5, b.mins.y);
        assert_eq!(5.5, b.maxs.y);
    }

    #[test_case(8, true)]
    #[test_case(12, true)]
    #[test_case(16, true)]
    #[test_case(10, false)]
    #[test_case(0, false)]
    #[test_case(4, false)]
    fn point_count_enumeration(n: usize, ok: bool) {
        let r = FramePoints::try_from(n);
        assert_eq!(ok, r.is_ok());
        if let Err(e) = r {
            assert!(matches!(e, GenerationError::InvalidPointCount(c) if c == n));
        }
    }

    #[test_case(0.0, 1.0)]
    #[test_case(1.0, -1.0)]
    #[test_case(f64::NAN, 1.0)]
    fn invalid_dimensions(width: f64, height: f64) {
        let spec = FrameSpec::new(0.0, width, height, FramePoints::Eight, true);
        assert!(matches!(generate(&spec), Err(GenerationError::InvalidParameter { .. })));
    }

    #[test_case(1e-10, 1e-10, false)]
    #[test_case(1e-9, 1e-9, false)]
    #[test_case(1e-6, 1e-6, true)]
    fn tiny_frames_keep_every_point_or_fail(width: f64, height: f64, ok: bool) {
        for constrained in [true, false] {
            let spec = FrameSpec::new(0.0, width, height, FramePoints::Sixteen, constrained);
            match generate(&spec) {
                Ok(s) => {
                    assert!(ok);
                    assert_eq!(16, s.len());
                }
                Err(e) => {
                    assert!(!ok);
                    assert!(matches!(e, GenerationError::InvalidParameter { name: "size", .. }));
                }
            }
        }
    }

    #[test]
    fn point_count_serializes_as_number() {
        let spec = FrameSpec::new(1.0, 2.0, 3.0, FramePoints::Twelve, false);
        let text = serde_json::to_string(&spec).unwrap();
        assert!(text.contains("\"point_count\":12"));
        let back: FrameSpec = serde_json::from_str(&text).unwrap();
        assert_eq!(spec, back);

        let bad = text.replace("\"point_count\":12", "\"point_count\":9");
        assert!(serde_json::from_str::<FrameSpec>(&bad).is_err());
    }
}
