use ncollide2d::na::Point2;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Plain `{x, y}` mirror of a `Point2<f64>`, used to give the nalgebra point a stable,
/// human-readable serialized form
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Point2f64 {
    pub x: f64,
    pub y: f64,
}

impl From<&Point2<f64>> for Point2f64 {
    fn from(p: &Point2<f64>) -> Self {
        Point2f64 { x: p.x, y: p.y }
    }
}

impl From<Point2f64> for Point2<f64> {
    fn from(p: Point2f64) -> Self {
        Point2::new(p.x, p.y)
    }
}

/// For use with `#[serde(with = "crate::serialize::point_list")]` on a `Vec<Point2<f64>>`
pub mod point_list {
    use super::*;

    pub fn serialize<S: Serializer>(points: &[Point2<f64>], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(points.iter().map(Point2f64::from))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Point2<f64>>, D::Error> {
        let raw: Vec<Point2f64> = Vec::deserialize(d)?;
        Ok(raw.into_iter().map(Point2::from).collect())
    }
}
