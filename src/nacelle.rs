//! Nacelle revolve profiles. A profile is the open upper half of the nacelle outline, from the
//! nose to the tail, which the host revolves about the nacelle axis.

use crate::airfoil::generate::{naca_thickness, A4_CLOSED};
use crate::algorithms::{golden_section_max, linspace};
use crate::errors::{require_positive, GenerationError};
use crate::geometry::PointSequence;
use ncollide2d::na::Point2;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use tracing::debug;

/// A body of revolution shape law. The shape is given on the unit length and only needs to be
/// proportional to the radius, the profile generator normalizes it so that it reaches the
/// requested diameter at the maximum.
pub trait ShapingModel {
    /// Relative radius at a fraction of the length, zero at both ends
    fn shape(&self, u: f64) -> f64;

    /// Fraction of the length at which the shape is largest
    fn max_station(&self) -> f64;

    /// Radius as a fraction of the maximum radius
    fn radius_fraction(&self, u: f64) -> f64 {
        if u <= 0.0 || u >= 1.0 {
            return 0.0;
        }
        self.shape(u) / self.shape(self.max_station())
    }
}

/// Simplified Duhamel law, a parabolic nose with a linear run to the tail
pub struct Duhamel;

impl ShapingModel for Duhamel {
    fn shape(&self, u: f64) -> f64 {
        (1.0 - u) * u.sqrt()
    }

    fn max_station(&self) -> f64 {
        1.0 / 3.0
    }
}

/// Hoerner's body: an elliptical nose up to the maximum diameter followed by a cosine run to the
/// tail
pub struct Hoerner {
    pub fraction: f64,
}

impl ShapingModel for Hoerner {
    fn shape(&self, u: f64) -> f64 {
        let f = self.fraction;
        if u < f {
            (2.0 * u * f - u * u).max(0.0).sqrt() / f
        } else {
            (FRAC_PI_2 * (u - f) / (1.0 - f)).cos()
        }
    }

    fn max_station(&self) -> f64 {
        self.fraction
    }
}

/// Lyon's model A body
pub struct Lyon;

impl ShapingModel for Lyon {
    fn shape(&self, u: f64) -> f64 {
        // u - u^2 - u^3 + u^4 in factored form, which stays non-negative on [0, 1]
        (1.0 - u) * (u * (1.0 + u)).sqrt()
    }

    fn max_station(&self) -> f64 {
        (17.0_f64.sqrt() - 1.0) / 8.0
    }
}

/// Body of revolution following the NACA 4-digit thickness distribution
pub struct NacaBody;

impl ShapingModel for NacaBody {
    fn shape(&self, u: f64) -> f64 {
        naca_thickness(0.5, A4_CLOSED, u)
    }

    fn max_station(&self) -> f64 {
        golden_section_max(|u| self.shape(u), 0.0, 1.0, 1e-10)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NacelleModel {
    Duhamel,
    Hoerner,
    Lyon,
    Naca,
}

impl NacelleModel {
    pub fn name(&self) -> &'static str {
        match self {
            NacelleModel::Duhamel => "Duhamel",
            NacelleModel::Hoerner => "Hoerner",
            NacelleModel::Lyon => "Lyon",
            NacelleModel::Naca => "Naca",
        }
    }

    pub fn from_name(name: &str) -> Option<NacelleModel> {
        match name {
            "Duhamel" => Some(NacelleModel::Duhamel),
            "Hoerner" => Some(NacelleModel::Hoerner),
            "Lyon" => Some(NacelleModel::Lyon),
            "Naca" => Some(NacelleModel::Naca),
            _ => None,
        }
    }

    /// The shape law of the model. Only Hoerner's body uses the diameter max fraction.
    pub fn shaping(&self, max_fraction: f64) -> Box<dyn ShapingModel> {
        match self {
            NacelleModel::Duhamel => Box::new(Duhamel),
            NacelleModel::Hoerner => Box::new(Hoerner {
                fraction: max_fraction,
            }),
            NacelleModel::Lyon => Box::new(Lyon),
            NacelleModel::Naca => Box::new(NacaBody),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NacelleSpec {
    pub model: NacelleModel,
    pub length: f64,
    pub max_diameter: f64,

    /// Station of the maximum diameter as a fraction of the length
    pub max_fraction: f64,
    pub point_count: usize,

    /// Distance of the profile's axis of revolution from the sketch axis
    #[serde(default)]
    pub axis_offset: f64,
}

impl NacelleSpec {
    pub fn new(
        model: NacelleModel,
        length: f64,
        max_diameter: f64,
        max_fraction: f64,
        point_count: usize,
    ) -> NacelleSpec {
        NacelleSpec {
            model,
            length,
            max_diameter,
            max_fraction,
            point_count,
            axis_offset: 0.0,
        }
    }

    fn validate(&self) -> Result<(), GenerationError> {
        require_positive("length", self.length)?;
        require_positive("max_diameter", self.max_diameter)?;
        if !(self.max_fraction > 0.0 && self.max_fraction < 1.0) {
            return Err(GenerationError::invalid_parameter(
                "max_fraction",
                format!("must lie strictly between 0 and 1, got {}", self.max_fraction),
            ));
        }
        if self.point_count < 3 {
            return Err(GenerationError::invalid_parameter(
                "point_count",
                format!("at least 3 points are needed, got {}", self.point_count),
            ));
        }
        if !self.axis_offset.is_finite() {
            return Err(GenerationError::invalid_parameter(
                "axis_offset",
                format!("must be finite, got {}", self.axis_offset),
            ));
        }
        Ok(())
    }
}

/// The open revolve profile, `point_count` points evenly spaced from the nose at x = 0 to the
/// tail at x = length
pub fn generate(spec: &NacelleSpec) -> Result<PointSequence, GenerationError> {
    spec.validate()?;
    let model = spec.model.shaping(spec.max_fraction);
    let max_radius = spec.max_diameter / 2.0;

    let points: Vec<Point2<f64>> = linspace(0.0, spec.length, spec.point_count)
        .into_iter()
        .map(|x| {
            let r = max_radius * model.radius_fraction(x / spec.length);
            Point2::new(x, spec.axis_offset + r)
        })
        .collect();

    debug!(
        model = spec.model.name(),
        length = spec.length,
        max_diameter = spec.max_diameter,
        points = points.len(),
        "generated nacelle profile"
    );
    Ok(PointSequence::open(points))
}

/// Distance from the nose at which the profile reaches its maximum diameter
pub fn max_station(spec: &NacelleSpec) -> Result<f64, GenerationError> {
    spec.validate()?;
    Ok(spec.length * spec.model.shaping(spec.max_fraction).max_station())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use itertools::Itertools;
    use test_case::test_case;

    const MODELS: [NacelleModel; 4] = [
        NacelleModel::Duhamel,
        NacelleModel::Hoerner,
        NacelleModel::Lyon,
        NacelleModel::Naca,
    ];

    #[test]
    fn hoerner_example_rises_then_falls() {
        let spec = NacelleSpec::new(NacelleModel::Hoerner, 3000.0, 800.0, 0.4, 20);
        let s = generate(&spec).unwrap();
        assert_eq!(20, s.len());
        assert!(!s.is_closed());

        for (a, b) in s.iter().tuple_windows() {
            if b.x <= 1200.0 {
                assert!(b.y > a.y);
            } else if a.x >= 1200.0 {
                assert!(b.y <= a.y);
            }
        }
        assert_relative_eq!(1200.0, max_station(&spec).unwrap(), epsilon = 1e-9);
    }

    #[test]
    fn ends_are_on_the_axis() {
        for model in MODELS {
            let mut spec = NacelleSpec::new(model, 2.0, 0.5, 0.3, 31);
            spec.axis_offset = 0.25;
            let s = generate(&spec).unwrap();
            let first = s.points()[0];
            let last = s.points()[s.len() - 1];
            assert_eq!(Point2::new(0.0, 0.25), first);
            assert_eq!(Point2::new(2.0, 0.25), last);
        }
    }

    #[test]
    fn reaches_half_diameter_at_max_station() {
        for model in MODELS {
            for fraction in [0.2, 0.35, 0.6] {
                let shaping = model.shaping(fraction);
                let at_max = shaping.radius_fraction(shaping.max_station());
                assert_relative_eq!(1.0, at_max, epsilon = 1e-12);
            }
        }
    }

    #[test_case(NacelleModel::Duhamel)]
    #[test_case(NacelleModel::Hoerner)]
    #[test_case(NacelleModel::Lyon)]
    #[test_case(NacelleModel::Naca)]
    fn never_exceeds_half_diameter(model: NacelleModel) {
        let spec = NacelleSpec::new(model, 10.0, 4.0, 0.45, 401);
        let s = generate(&spec).unwrap();
        let peak = s.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        assert!(peak <= 2.0 + 1e-9);
        assert!(peak > 1.99);
    }

    #[test]
    fn intrinsic_maxima() {
        assert_relative_eq!(1.0 / 3.0, Duhamel.max_station(), epsilon = 1e-15);
        let u = Lyon.max_station();
        assert_relative_eq!(0.0, 4.0 * u * u + u - 1.0, epsilon = 1e-12);
        // The NACA thickness distribution peaks at about 30% of the length
        assert_relative_eq!(0.2998, NacaBody.max_station(), epsilon = 1e-3);
    }

    #[test]
    fn closed_forms_match_reference_coefficients() {
        // Coefficients quoted for the unnormalized laws, y = k * D * law(x). Model fidelity is
        // not verified against an external reference beyond these constants.
        let duhamel = 0.5 / Duhamel.shape(Duhamel.max_station());
        assert_relative_eq!(1.3, duhamel, epsilon = 2e-3);
        let lyon = 0.5 / Lyon.shape(Lyon.max_station());
        assert_relative_eq!(1.11326, lyon, epsilon = 1e-4);
    }

    #[test]
    fn fraction_only_moves_hoerner() {
        let a = NacelleSpec::new(NacelleModel::Lyon, 1.0, 1.0, 0.2, 11);
        let b = NacelleSpec::new(NacelleModel::Lyon, 1.0, 1.0, 0.7, 11);
        assert_eq!(generate(&a).unwrap(), generate(&b).unwrap());

        let c = NacelleSpec::new(NacelleModel::Hoerner, 1.0, 1.0, 0.2, 11);
        let d = NacelleSpec::new(NacelleModel::Hoerner, 1.0, 1.0, 0.7, 11);
        assert_ne!(generate(&c).unwrap(), generate(&d).unwrap());
    }

    #[test_case(0.0, 1.0, 0.5, 10, "length")]
    #[test_case(1.0, -1.0, 0.5, 10, "max_diameter")]
    #[test_case(1.0, 1.0, 0.0, 10, "max_fraction")]
    #[test_case(1.0, 1.0, 1.0, 10, "max_fraction")]
    #[test_case(1.0, 1.0, 0.5, 2, "point_count")]
    fn invalid_parameters(length: f64, diameter: f64, fraction: f64, count: usize, e: &str) {
        let spec = NacelleSpec::new(NacelleModel::Duhamel, length, diameter, fraction, count);
        match generate(&spec) {
            Err(GenerationError::InvalidParameter { name, .. }) => assert_eq!(e, name),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn model_names_round_trip() {
        for model in MODELS {
            assert_eq!(Some(model), NacelleModel::from_name(model.name()));
        }
        assert_eq!(None, NacelleModel::from_name("Sears-Haack"));
    }
}
