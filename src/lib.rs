//! Parametric airframe geometry: foil sections, wing panels, fuselage frames and outlines,
//! nacelle revolve profiles, the consistency rules for lofting sections together, and the XML
//! interchange document which carries the design parameters.

pub mod airfoil;
pub mod algorithms;
pub mod config;
pub mod design;
pub mod errors;
pub mod frame;
pub mod fuselage;
pub mod geometry;
pub mod interchange;
pub mod nacelle;
pub mod section;
pub mod serialize;
pub mod wing;

pub use config::GeneratorConfig;
pub use design::{AircraftDesign, Component, ComponentSpec, ProjectInfo};
pub use errors::{ConfigError, ConsistencyError, FormatError, GenerationError};
pub use geometry::PointSequence;
