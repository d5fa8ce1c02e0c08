//! Sections are the generated profiles which the host lofts into a surface, foils along a wing
//! span or frames along a fuselage. A set of sections can only be lofted when its members agree
//! with each other, which is what `validate` checks.

use crate::airfoil::{self, AirfoilSpec};
use crate::config::GeneratorConfig;
use crate::errors::{ConsistencyError, GenerationError};
use crate::frame::{self, FrameSpec};
use crate::geometry::{PointSequence, Winding};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Default distance under which all points of a section count as one point
pub const DEFAULT_DEGENERATE_TOL: f64 = 1e-6;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SectionKind {
    Foil(AirfoilSpec),
    Frame(FrameSpec),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub kind: SectionKind,

    /// Position of the section plane along the loft direction
    pub station: f64,
    pub points: PointSequence,

    /// The loft the section is checked with. Free foils and frames go to the `foils` and
    /// `frames` lofts, sections of a wing or fuselage to the loft of that component.
    pub loft: String,
}

impl Section {
    pub fn from_foil(
        name: &str,
        spec: &AirfoilSpec,
        config: &GeneratorConfig,
    ) -> Result<Section, GenerationError> {
        Ok(Section {
            name: name.to_string(),
            kind: SectionKind::Foil(spec.clone()),
            station: spec.station,
            points: airfoil::generate_with(spec, config)?,
            loft: "foils".to_string(),
        })
    }

    pub fn from_frame(name: &str, spec: &FrameSpec) -> Result<Section, GenerationError> {
        Ok(Section {
            name: name.to_string(),
            kind: SectionKind::Frame(spec.clone()),
            station: spec.station,
            points: frame::generate(spec)?,
            loft: "frames".to_string(),
        })
    }

    pub fn in_loft(mut self, loft: &str) -> Section {
        self.loft = loft.to_string();
        self
    }
}

/// The most common point count, ties going to the count seen first
fn reference_count(sections: &[Section]) -> Option<usize> {
    let mut tally: HashMap<usize, usize> = HashMap::new();
    for s in sections {
        *tally.entry(s.points.len()).or_insert(0) += 1;
    }

    let mut best: Option<(usize, usize)> = None;
    for s in sections {
        let count = s.points.len();
        let seen = tally.get(&count).copied().unwrap_or(0);
        if best.map_or(true, |(_, n)| seen > n) {
            best = Some((count, seen));
        }
    }
    best.map(|(count, _)| count)
}

/// Checks that an ordered set of sections can be lofted, with the default degenerate tolerance
pub fn validate(sections: &[Section]) -> Result<(), ConsistencyError> {
    validate_with(sections, DEFAULT_DEGENERATE_TOL)
}

/// Checks that an ordered set of sections can be lofted: every section has the same number of
/// points, stations strictly increase, no section collapses to a point and all closed sections
/// wind the same way. Sections are checked in order and the first violation is returned.
pub fn validate_with(sections: &[Section], degenerate_tol: f64) -> Result<(), ConsistencyError> {
    let expected = match reference_count(sections) {
        Some(c) => c,
        None => return Ok(()),
    };

    let mut winding: Option<Winding> = None;
    let mut previous: Option<f64> = None;

    for (index, s) in sections.iter().enumerate() {
        let result = check_section(index, s, expected, degenerate_tol, &mut winding, previous);
        if let Err(e) = &result {
            warn!(section = %s.name, error = %e, "section set is not loftable");
        }
        result?;
        previous = Some(s.station);
    }
    Ok(())
}

fn check_section(
    index: usize,
    section: &Section,
    expected: usize,
    degenerate_tol: f64,
    winding: &mut Option<Winding>,
    previous: Option<f64>,
) -> Result<(), ConsistencyError> {
    if section.points.is_degenerate(degenerate_tol) {
        return Err(ConsistencyError::Degenerate { index });
    }

    let found = section.points.len();
    if found != expected {
        return Err(ConsistencyError::PointCountMismatch {
            index,
            expected,
            found,
        });
    }

    if let Some(w) = section.points.winding() {
        match winding {
            Some(reference) if *reference != w => {
                return Err(ConsistencyError::WindingMismatch { index });
            }
            Some(_) => {}
            None => *winding = Some(w),
        }
    }

    if !section.station.is_finite() {
        return Err(ConsistencyError::InvalidStation {
            index,
            station: section.station,
        });
    }

    if let Some(p) = previous {
        if section.station <= p {
            return Err(ConsistencyError::StationOrder {
                index,
                previous: p,
                station: section.station,
            });
        }
    }
    Ok(())
}
