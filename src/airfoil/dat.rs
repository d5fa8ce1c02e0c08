//! Reader for airfoil coordinate files in the common Selig `.dat` layout: an optional name on
//! the first line followed by one `x y` pair per line, normalized to a unit chord.

use crate::errors::GenerationError;
use ncollide2d::na::Point2;
use std::path::Path;
use tracing::debug;

/// Contents of a coordinate file, points in file order
#[derive(Clone, Debug, PartialEq)]
pub struct DatProfile {
    pub name: String,
    pub points: Vec<Point2<f64>>,
}

/// Parses one coordinate, which must carry fractional digits. Lednicer files open with a line of
/// surface point counts such as `61.  61.`, which this rejects.
fn parse_coordinate(token: &str) -> Option<f64> {
    let (_, fraction) = token.split_once('.')?;
    if !fraction.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    token.parse::<f64>().ok()
}

/// Reads a coordinate pair from a line, accepting whitespace and/or comma separators. Lines
/// which are not exactly two coordinates return None.
fn parse_pair(line: &str) -> Option<Point2<f64>> {
    let mut tokens = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty());

    let x = parse_coordinate(tokens.next()?)?;
    let y = parse_coordinate(tokens.next()?)?;
    if tokens.next().is_some() || !x.is_finite() || !y.is_finite() {
        return None;
    }
    Some(Point2::new(x, y))
}

/// Parse the text of a coordinate file. The path is only used for the default name and for
/// error reporting.
pub fn parse_dat(text: &str, path: &Path) -> Result<DatProfile, GenerationError> {
    let default_name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name: Option<String> = None;
    let mut points = Vec::new();

    for (i, line) in text.lines().enumerate() {
        match parse_pair(line) {
            Some(p) => points.push(p),
            None => {
                let trimmed = line.trim();
                if i == 0 && !trimmed.is_empty() {
                    name = Some(trimmed.to_string());
                } else if !trimmed.is_empty() {
                    debug!(line = i + 1, content = trimmed, "skipping non-coordinate line");
                }
            }
        }
    }

    if points.len() < 3 {
        return Err(GenerationError::InsufficientData {
            path: path.to_path_buf(),
            found: points.len(),
        });
    }

    Ok(DatProfile {
        name: name.unwrap_or(default_name),
        points,
    })
}

/// Read and parse a coordinate file. This is a single read with no retry.
pub fn load_dat(path: &Path) -> Result<DatProfile, GenerationError> {
    let text = std::fs::read_to_string(path).map_err(|source| GenerationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let profile = parse_dat(&text, path)?;
    debug!(
        path = %path.display(),
        name = %profile.name,
        points = profile.points.len(),
        "loaded coordinate file"
    );
    Ok(profile)
}
