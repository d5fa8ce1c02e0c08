//! Fuselage outlines seen from the top and from the side, and the frames cut from them at evenly
//! spaced section planes. The x axis runs from the nose at 0 to the tail at the fuselage length.

use crate::algorithms::interpolate_linear;
use crate::errors::{require_positive, GenerationError};
use crate::frame::{FramePoints, FrameSpec};
use crate::geometry::PointSequence;
use ncollide2d::na::Point2;
use serde::{Deserialize, Serialize};
use tracing::debug;

const TAIL_POINTS: usize = 4;
const NOSE_POINTS: usize = 5;

// Side view nose, relative to the station of the maximum section (x) and to the height (z).
// From the top of the maximum section round the nose to the bottom.
const NOSE_X_REL: [f64; 9] = [0.90, 0.83, 0.53, 0.12, 0.00, 0.12, 0.50, 0.70, 0.90];
const NOSE_Z_REL: [f64; 9] = [0.97, 0.92, 0.70, 0.60, 0.50, 0.28, 0.10, 0.03, 0.01];

fn default_x_rel_max() -> f64 {
    0.33
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FuselageSpec {
    pub length: f64,
    pub width: f64,
    pub height: f64,

    /// Station of the largest cross-section as a fraction of the length
    #[serde(default = "default_x_rel_max")]
    pub x_rel_max: f64,

    /// Number of section planes between the nose and the tail
    pub section_count: usize,
    pub point_count: FramePoints,
    pub constrained: bool,
}

impl FuselageSpec {
    pub fn new(length: f64, width: f64, height: f64, section_count: usize) -> FuselageSpec {
        FuselageSpec {
            length,
            width,
            height,
            x_rel_max: default_x_rel_max(),
            section_count,
            point_count: FramePoints::Eight,
            constrained: true,
        }
    }

    fn validate(&self) -> Result<(), GenerationError> {
        require_positive("length", self.length)?;
        require_positive("width", self.width)?;
        require_positive("height", self.height)?;
        if !(self.x_rel_max > 0.0 && self.x_rel_max < 1.0) {
            return Err(GenerationError::invalid_parameter(
                "x_rel_max",
                format!("must lie strictly between 0 and 1, got {}", self.x_rel_max),
            ));
        }
        if self.section_count == 0 {
            return Err(GenerationError::invalid_parameter(
                "section_count",
                "at least one section plane is needed",
            ));
        }
        Ok(())
    }

    fn x_max(&self) -> f64 {
        self.x_rel_max * self.length
    }

    /// Stations of the straight run from the tail to the maximum section
    fn tail_stations(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        let step = (self.length - self.x_max()) / (TAIL_POINTS - 1) as f64;
        (0..TAIL_POINTS).map(move |i| {
            if i == TAIL_POINTS - 1 {
                (i, self.x_max())
            } else {
                (i, self.length - step * i as f64)
            }
        })
    }
}

/// Half of the top view from the tail to the nose, y >= 0
fn top_half(spec: &FuselageSpec) -> Vec<Point2<f64>> {
    let x_max = spec.x_max();
    let half_width = spec.width / 2.0;

    let mut points: Vec<Point2<f64>> = spec
        .tail_stations()
        .map(|(i, x)| Point2::new(x, half_width * i as f64 / (TAIL_POINTS - 1) as f64))
        .collect();

    points.extend((1..=NOSE_POINTS).map(|i| {
        let x = x_max * (1.0 - i as f64 / NOSE_POINTS as f64);
        let y = half_width * (2.0 * x * x_max - x * x).max(0.0).sqrt() / x_max;
        Point2::new(x, y)
    }));
    points
}

/// The top view outline, from the tail round the nose and back to the tail. The nose is at the
/// origin and the outline is symmetric about the x axis.
pub fn top_outline(spec: &FuselageSpec) -> Result<PointSequence, GenerationError> {
    spec.validate()?;
    let mut points = top_half(spec);
    let mirrored: Vec<Point2<f64>> = points
        .iter()
        .rev()
        .skip(1)
        .map(|p| Point2::new(p.x, -p.y))
        .collect();
    points.extend(mirrored);
    Ok(PointSequence::open(points))
}

/// Upper chain of the side view from the tail to the nose, then the lower chain from the nose to
/// the tail. The fuselage bottom is at z = 0.
fn side_chains(spec: &FuselageSpec) -> (Vec<Point2<f64>>, Vec<Point2<f64>>) {
    let x_max = spec.x_max();
    let h = spec.height;

    let tail: Vec<Point2<f64>> = spec
        .tail_stations()
        .map(|(i, x)| Point2::new(x, h / 2.0 * (1.0 + i as f64 / (TAIL_POINTS - 1) as f64)))
        .collect();
    let nose: Vec<Point2<f64>> = NOSE_X_REL
        .iter()
        .zip(NOSE_Z_REL.iter())
        .map(|(xr, zr)| Point2::new(xr * x_max, zr * h))
        .collect();
    let nose_tip = NOSE_POINTS - 1;

    let mut upper = tail.clone();
    upper.extend_from_slice(&nose[..=nose_tip]);

    let mut lower = nose[nose_tip..].to_vec();
    lower.extend(tail.iter().rev().map(|p| Point2::new(p.x, h - p.y)));
    (upper, lower)
}

/// The side view outline, from the tail at mid height over the top, round the nose and back
/// under the bottom to the tail
pub fn side_outline(spec: &FuselageSpec) -> Result<PointSequence, GenerationError> {
    spec.validate()?;
    let (upper, lower) = side_chains(spec);
    let mut points = upper;
    points.extend(lower.into_iter().skip(1));
    Ok(PointSequence::open(points))
}

/// Stations of the section planes, evenly spaced strictly between the nose and the tail
pub fn section_stations(spec: &FuselageSpec) -> Result<Vec<f64>, GenerationError> {
    spec.validate()?;
    let n = spec.section_count;
    Ok((1..=n)
        .map(|i| spec.length * i as f64 / (n + 1) as f64)
        .collect())
}

fn chain_at(chain: &[Point2<f64>], x: f64) -> f64 {
    let xs: Vec<f64> = chain.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = chain.iter().map(|p| p.y).collect();
    interpolate_linear(&xs, &ys, x)
}

/// One frame per section plane, sized where the plane cuts the top and side outlines. The
/// outlines are treated as polylines between their points.
pub fn frames(spec: &FuselageSpec) -> Result<Vec<FrameSpec>, GenerationError> {
    let stations = section_stations(spec)?;

    let mut half_width = top_half(spec);
    half_width.reverse();
    let (mut upper, lower) = side_chains(spec);
    upper.reverse();

    let frames: Vec<FrameSpec> = stations
        .into_iter()
        .map(|x| {
            let top = chain_at(&upper, x);
            let bottom = chain_at(&lower, x);
            FrameSpec {
                station: x,
                width: 2.0 * chain_at(&half_width, x),
                height: top - bottom,
                z_offset: (top + bottom) / 2.0,
                point_count: spec.point_count,
                constrained: spec.constrained,
            }
        })
        .collect();

    debug!(
        length = spec.length,
        sections = frames.len(),
        "derived fuselage frames"
    );
    Ok(frames)
}
