use std::path::PathBuf;
use thiserror::Error;

/// Failures of the profile generators. Each one concerns a single spec, so a batch build can
/// report it and carry on with the other components.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The NACA designation could not be parsed or encodes an impossible section
    #[error("invalid NACA code {code:?}: {reason}")]
    InvalidCode { code: String, reason: &'static str },

    /// A coordinate file did not contain enough points to describe a section
    #[error("only {found} coordinate pairs found in {}, at least 3 are required", path.display())]
    InsufficientData { path: PathBuf, found: usize },

    /// Frames only come in 8, 12 or 16 points
    #[error("invalid frame point count {0}, expected 8, 12 or 16")]
    InvalidPointCount(usize),

    #[error("invalid parameter {name}: {message}")]
    InvalidParameter { name: &'static str, message: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenerationError {
    pub(crate) fn invalid_code(code: &str, reason: &'static str) -> Self {
        GenerationError::InvalidCode {
            code: code.to_string(),
            reason,
        }
    }

    pub(crate) fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        GenerationError::InvalidParameter {
            name,
            message: message.into(),
        }
    }
}

/// Checks that a strictly positive, finite value was given for a named parameter
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<(), GenerationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GenerationError::invalid_parameter(
            name,
            format!("must be positive, got {}", value),
        ))
    }
}

/// Reasons a set of sections cannot be lofted together. Every variant names the index of the
/// first offending section.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConsistencyError {
    #[error("section {index} has {found} points, expected {expected}")]
    PointCountMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("section {index} is at station {station}, which does not follow {previous}")]
    StationOrder {
        index: usize,
        previous: f64,
        station: f64,
    },

    #[error("section {index} has no usable station ({station})")]
    InvalidStation { index: usize, station: f64 },

    #[error("section {index} is degenerate")]
    Degenerate { index: usize },

    #[error("section {index} winds in the opposite direction to the preceding sections")]
    WindingMismatch { index: usize },
}

impl ConsistencyError {
    pub fn index(&self) -> usize {
        match self {
            ConsistencyError::PointCountMismatch { index, .. }
            | ConsistencyError::StationOrder { index, .. }
            | ConsistencyError::InvalidStation { index, .. }
            | ConsistencyError::Degenerate { index }
            | ConsistencyError::WindingMismatch { index } => *index,
        }
    }
}

/// Errors reading or writing the interchange document
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("XML error: {0}")]
    Xml(String),

    #[error("missing required field {field} in {context}")]
    MissingField { field: &'static str, context: String },

    #[error("unknown value {value:?} for {field}")]
    InvalidEnum { field: &'static str, value: String },

    #[error("malformed number {value:?} for {field}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("malformed boolean {value:?} for {field}")]
    InvalidBool { field: &'static str, value: String },

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FormatError {
    pub(crate) fn missing(field: &'static str, context: impl Into<String>) -> Self {
        FormatError::MissingField {
            field,
            context: context.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value {name}: {message}")]
    Invalid { name: &'static str, message: String },
}
