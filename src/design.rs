//! The aircraft design record: project metadata, the overall fuselage dimensions and the named
//! parametric components. This is the unit written to and read from the interchange document,
//! the generated geometry is always derived from it on demand.

use crate::airfoil::AirfoilSpec;
use crate::config::GeneratorConfig;
use crate::errors::{ConsistencyError, GenerationError};
use crate::frame::FrameSpec;
use crate::fuselage::{self, FuselageSpec};
use crate::geometry::PointSequence;
use crate::nacelle::{self, NacelleSpec};
use crate::section::{self, Section};
use crate::wing::{self, WingSpec};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    pub author: String,

    /// Free form date text, kept exactly as entered
    pub date: String,
    pub description: Option<String>,
    pub version: Option<String>,

    /// File name of the interchange document the design was last exchanged through
    pub reference_file: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ComponentSpec {
    Foil(AirfoilSpec),
    Frame(FrameSpec),
    Nacelle(NacelleSpec),
    Fuselage(FuselageSpec),
    Wing(WingSpec),
}

impl ComponentSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            ComponentSpec::Foil(_) => "foil",
            ComponentSpec::Frame(_) => "frame",
            ComponentSpec::Nacelle(_) => "nacelle",
            ComponentSpec::Fuselage(_) => "fuselage",
            ComponentSpec::Wing(_) => "wing",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub spec: ComponentSpec,
}

impl Component {
    pub fn new(name: &str, spec: ComponentSpec) -> Component {
        Component {
            name: name.to_string(),
            spec,
        }
    }
}

/// The outcome of building one named piece of geometry
pub type Built<T> = (String, Result<T, GenerationError>);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AircraftDesign {
    pub project: ProjectInfo,
    pub fuselage_length: f64,
    pub fuselage_width: f64,
    pub fuselage_height: f64,
    pub components: Vec<Component>,
}

impl AircraftDesign {
    pub fn new(project: ProjectInfo) -> AircraftDesign {
        AircraftDesign {
            project,
            fuselage_length: 0.0,
            fuselage_width: 0.0,
            fuselage_height: 0.0,
            components: Vec::new(),
        }
    }

    pub fn with_component(mut self, name: &str, spec: ComponentSpec) -> AircraftDesign {
        self.components.push(Component::new(name, spec));
        self
    }

    /// Builds every foil and frame section, including the frames derived from fuselage
    /// components and the root and tip foils of wing panels. Each section is generated on its
    /// own, so a failing component is reported next to the ones which built.
    pub fn sections(&self, config: &GeneratorConfig) -> Vec<Built<Section>> {
        let mut results: Vec<Built<Section>> = Vec::new();

        for component in self.components.iter() {
            let name = component.name.clone();
            match &component.spec {
                ComponentSpec::Foil(spec) => {
                    results.push((name.clone(), Section::from_foil(&name, spec, config)));
                }
                ComponentSpec::Frame(spec) => {
                    results.push((name.clone(), Section::from_frame(&name, spec)));
                }
                ComponentSpec::Fuselage(spec) => match fuselage::frames(spec) {
                    Ok(frames) => {
                        for (i, frame) in frames.iter().enumerate() {
                            let section_name = format!("{}_{:03}", name, i + 1);
                            let section =
                                Section::from_frame(&section_name, frame).map(|s| s.in_loft(&name));
                            results.push((section_name, section));
                        }
                    }
                    Err(e) => results.push((name, Err(e))),
                },
                ComponentSpec::Wing(spec) => match wing::sections(&name, spec, config) {
                    Ok(built) => results.extend(built),
                    Err(e) => results.push((name, Err(e))),
                },
                ComponentSpec::Nacelle(_) => {}
            }
        }

        log_summary("sections", &results);
        results
    }

    /// Builds the revolve profile of every nacelle component
    pub fn nacelle_profiles(&self) -> Vec<Built<PointSequence>> {
        let results: Vec<Built<PointSequence>> = self
            .components
            .iter()
            .filter_map(|c| match &c.spec {
                ComponentSpec::Nacelle(spec) => Some((c.name.clone(), nacelle::generate(spec))),
                _ => None,
            })
            .collect();

        log_summary("nacelle profiles", &results);
        results
    }
}

fn log_summary<T>(what: &str, results: &[Built<T>]) {
    let mut failed = 0;
    for (name, result) in results.iter() {
        if let Err(e) = result {
            failed += 1;
            warn!(component = %name, error = %e, "failed to build {}", what);
        }
    }
    info!(built = results.len() - failed, failed, "built {}", what);
}

/// Checks every loft of a batch of built sections on its own, lofts in order of first
/// appearance and sections in the order they were built. Failed sections take no part in the
/// check.
pub fn validate_lofts(
    sections: &[Built<Section>],
    config: &GeneratorConfig,
) -> Vec<(String, Result<(), ConsistencyError>)> {
    let mut lofts: Vec<(String, Vec<Section>)> = Vec::new();
    for section in sections.iter().filter_map(|(_, r)| r.as_ref().ok()) {
        match lofts.iter_mut().find(|(name, _)| *name == section.loft) {
            Some((_, members)) => members.push(section.clone()),
            None => lofts.push((section.loft.clone(), vec![section.clone()])),
        }
    }

    lofts
        .into_iter()
        .map(|(name, members)| {
            let check = section::validate_with(&members, config.degenerate_tolerance);
            (name, check)
        })
        .collect()
}
