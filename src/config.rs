use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Resolution and tolerance settings shared by the generators and the section checker. Every
/// field has a default, so a config file only needs to name the values it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of chordwise panels per airfoil surface. A NACA section with a closed trailing
    /// edge has twice this many points.
    pub naca_panels: usize,

    /// Cluster the chordwise stations towards the leading and trailing edges
    pub half_cosine_spacing: bool,

    /// Use the finite trailing edge thickness coefficient instead of the closed one
    pub finite_trailing_edge: bool,

    /// Consecutive points closer than this are merged
    pub merge_tolerance: f64,

    /// A section whose points all lie within this distance of a single point is degenerate
    pub degenerate_tolerance: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            naca_panels: 240,
            half_cosine_spacing: true,
            finite_trailing_edge: false,
            merge_tolerance: 1e-9,
            degenerate_tolerance: 1e-6,
        }
    }
}

impl GeneratorConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: GeneratorConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.naca_panels < 2 {
            return Err(ConfigError::Invalid {
                name: "naca_panels",
                message: format!("at least 2 panels are needed, got {}", self.naca_panels),
            });
        }

        for (name, value) in [
            ("merge_tolerance", self.merge_tolerance),
            ("degenerate_tolerance", self.degenerate_tolerance),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid {
                    name,
                    message: format!("must be positive, got {}", value),
                });
            }
        }

        Ok(())
    }
}
