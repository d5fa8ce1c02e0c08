use crate::algorithms::{half_cosine_spacing, linspace};
use crate::config::GeneratorConfig;
use crate::errors::{require_positive, GenerationError};
use crate::geometry::PointSequence;
use generate::{AirfoilGenerator, Naca4Digit, Naca5Digit};
use ncollide2d::na::Point2;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

pub mod dat;
pub mod generate;

/// Where the section shape of a foil comes from
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AirfoilFamily {
    /// NACA 4 digit designation, e.g. "2412"
    Naca4 { code: String },

    /// NACA 5 digit designation, e.g. "23012"
    Naca5 { code: String },

    /// Coordinate file normalized to a unit chord
    Dat { path: PathBuf },
}

/// Parameters of one foil (rib) of a wing or stabilizer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AirfoilSpec {
    pub family: AirfoilFamily,
    pub chord: f64,

    /// Setting angle in degrees, counter-clockwise positive about the leading edge
    pub setting: f64,

    /// Spanwise position of the foil, used to order foils for a loft
    pub station: f64,

    /// Dihedral angle in degrees of the plane carrying the foil
    pub dihedral: f64,

    /// The host builds a sketch only and skips the extrusion. Does not affect the geometry.
    pub sketch_only: bool,
}

impl AirfoilSpec {
    pub fn naca4(code: &str, chord: f64, setting: f64) -> AirfoilSpec {
        Self::with_family(AirfoilFamily::Naca4 { code: code.to_string() }, chord, setting)
    }

    pub fn naca5(code: &str, chord: f64, setting: f64) -> AirfoilSpec {
        Self::with_family(AirfoilFamily::Naca5 { code: code.to_string() }, chord, setting)
    }

    pub fn dat(path: impl Into<PathBuf>, chord: f64, setting: f64) -> AirfoilSpec {
        Self::with_family(AirfoilFamily::Dat { path: path.into() }, chord, setting)
    }

    fn with_family(family: AirfoilFamily, chord: f64, setting: f64) -> AirfoilSpec {
        AirfoilSpec {
            family,
            chord,
            setting,
            station: 0.0,
            dihedral: 0.0,
            sketch_only: false,
        }
    }

    pub fn at_station(mut self, station: f64) -> AirfoilSpec {
        self.station = station;
        self
    }

    /// The external coordinate file, if the foil is read from one
    pub fn source_file(&self) -> Option<&PathBuf> {
        match &self.family {
            AirfoilFamily::Dat { path } => Some(path),
            _ => None,
        }
    }
}

pub struct CamberStation {
    pub camber: Point2<f64>,
    pub upper: Point2<f64>,
    pub lower: Point2<f64>,
}

impl CamberStation {
    pub fn new(camber: Point2<f64>, upper: Point2<f64>, lower: Point2<f64>) -> CamberStation {
        CamberStation {
            camber,
            upper,
            lower,
        }
    }
}

/// The camber line and surfaces of an airfoil, each ordered from the leading edge to the
/// trailing edge
pub struct Airfoil {
    pub camber: Vec<Point2<f64>>,
    pub upper: Vec<Point2<f64>>,
    pub lower: Vec<Point2<f64>>,
}

impl Airfoil {
    pub fn from_stations(stations: &[CamberStation]) -> Airfoil {
        Airfoil {
            camber: stations.iter().map(|s| s.camber).collect(),
            upper: stations.iter().map(|s| s.upper).collect(),
            lower: stations.iter().map(|s| s.lower).collect(),
        }
    }

    /// The closed outer contour starting at the trailing edge, running over the upper surface
    /// to the leading edge and back under the lower surface. The leading edge point is shared by
    /// both surfaces and appears once.
    pub fn to_outer_contour(&self) -> Vec<Point2<f64>> {
        let mut result = self.upper.to_vec();
        result.reverse();
        result.extend(self.lower.iter().skip(1));
        result
    }
}

/// Rescales a unit chord contour so that its x values span exactly [0, 1]. The surface offset
/// of a cambered section pushes the points near the leading edge slightly ahead of x = 0.
fn normalize_chord(points: Vec<Point2<f64>>) -> Vec<Point2<f64>> {
    let (x_min, x_max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.x), hi.max(p.x)));
    let span = x_max - x_min;
    if !(span > 0.0) {
        return points;
    }

    points
        .into_iter()
        .map(|p| Point2::new((p.x - x_min) / span, p.y / span))
        .collect()
}

fn chord_fractions(config: &GeneratorConfig) -> Vec<f64> {
    if config.half_cosine_spacing {
        half_cosine_spacing(config.naca_panels + 1)
    } else {
        linspace(0.0, 1.0, config.naca_panels + 1)
    }
}

fn formula_contour<G: AirfoilGenerator>(generator: &G, config: &GeneratorConfig) -> PointSequence {
    let airfoil = generator.generate(&chord_fractions(config));

    // Merged before normalizing, so the points setting the x-range are the ones kept
    let merged = PointSequence::new(airfoil.to_outer_contour(), true, config.merge_tolerance);
    PointSequence::new(normalize_chord(merged.into_points()), true, config.merge_tolerance)
}

/// The section at unit chord and zero setting, before any post-processing
pub fn unit_contour(
    spec: &AirfoilSpec,
    config: &GeneratorConfig,
) -> Result<PointSequence, GenerationError> {
    match &spec.family {
        AirfoilFamily::Naca4 { code } => {
            let naca = Naca4Digit::from_code(code, config.finite_trailing_edge)?;
            Ok(formula_contour(&naca, config))
        }
        AirfoilFamily::Naca5 { code } => {
            let naca = Naca5Digit::from_code(code, config.finite_trailing_edge)?;
            Ok(formula_contour(&naca, config))
        }
        AirfoilFamily::Dat { path } => {
            let profile = dat::load_dat(path)?;
            Ok(PointSequence::new(profile.points, true, config.merge_tolerance))
        }
    }
}

/// Generates the closed foil contour with the default configuration
pub fn generate(spec: &AirfoilSpec) -> Result<PointSequence, GenerationError> {
    generate_with(spec, &GeneratorConfig::default())
}

/// Generates the closed foil contour: the unit chord section is scaled by the chord and then
/// rotated by the setting angle about the leading edge at the origin.
pub fn generate_with(
    spec: &AirfoilSpec,
    config: &GeneratorConfig,
) -> Result<PointSequence, GenerationError> {
    require_positive("chord", spec.chord)?;
    if !spec.setting.is_finite() {
        return Err(GenerationError::invalid_parameter(
            "setting",
            format!("must be finite, got {}", spec.setting),
        ));
    }

    let contour = unit_contour(spec, config)?
        .scaled(spec.chord)
        .rotated(spec.setting, &Point2::origin());

    debug!(
        family = ?spec.family,
        chord = spec.chord,
        setting = spec.setting,
        points = contour.len(),
        "generated foil"
    );
    Ok(contour)
}
