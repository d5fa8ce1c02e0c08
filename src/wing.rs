//! Wing panels, positioned the way the interchange document positions wing sections: a root
//! foil, a tip foil, and a positioning from the root to the tip which is half the span long and
//! swept back by the sweep angle.

use crate::airfoil::AirfoilSpec;
use crate::config::GeneratorConfig;
use crate::design::Built;
use crate::errors::{require_positive, GenerationError};
use crate::section::Section;
use ncollide2d::na::Vector2;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WingSpec {
    /// Tip to tip span. The panel covers one half of it.
    pub span: f64,

    /// Sweep of the positioning in degrees, positive backwards
    pub sweep: f64,

    /// Root foil, its station places the panel
    pub root: AirfoilSpec,

    /// Tip foil. Its station is derived from the panel and the one set here is not used.
    pub tip: AirfoilSpec,
}

impl WingSpec {
    pub fn new(span: f64, sweep: f64, root: AirfoilSpec, tip: AirfoilSpec) -> WingSpec {
        WingSpec {
            span,
            sweep,
            root,
            tip,
        }
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        require_positive("span", self.span)?;
        if !(self.sweep.is_finite() && self.sweep.abs() < 90.0) {
            return Err(GenerationError::invalid_parameter(
                "sweep",
                format!("must lie strictly between -90 and 90 degrees, got {}", self.sweep),
            ));
        }
        Ok(())
    }

    /// Length of the positioning from the root section to the tip section
    pub fn panel_length(&self) -> f64 {
        self.span / 2.0
    }

    /// Station of the tip section, measured along the same axis as the root station
    pub fn tip_station(&self) -> f64 {
        self.root.station + self.panel_length() * self.sweep.to_radians().cos()
    }

    /// How far the tip leading edge sits behind the root leading edge
    pub fn tip_setback(&self) -> f64 {
        self.panel_length() * self.sweep.to_radians().sin()
    }

    /// The tip foil at its derived station
    pub fn tip_spec(&self) -> AirfoilSpec {
        self.tip.clone().at_station(self.tip_station())
    }
}

/// Builds the root and tip sections of a panel as `<name>_root` and `<name>_tip`, both in the
/// loft called `name`. The tip contour is moved back by the sweep setback. Invalid panel
/// parameters fail the whole panel, a foil which fails to build only fails its own section.
pub fn sections(
    name: &str,
    spec: &WingSpec,
    config: &GeneratorConfig,
) -> Result<Vec<Built<Section>>, GenerationError> {
    spec.validate()?;

    let root_name = format!("{}_root", name);
    let root = Section::from_foil(&root_name, &spec.root, config).map(|s| s.in_loft(name));

    let tip_name = format!("{}_tip", name);
    let setback = Vector2::new(spec.tip_setback(), 0.0);
    let tip = Section::from_foil(&tip_name, &spec.tip_spec(), config).map(|mut s| {
        s.points = s.points.translated(&setback);
        s.in_loft(name)
    });

    debug!(
        wing = name,
        span = spec.span,
        sweep = spec.sweep,
        tip_station = spec.tip_station(),
        "built wing panel"
    );
    Ok(vec![(root_name, root), (tip_name, tip)])
}
