//! River-map grid parameters: `nx` on line 1, `ny` on line 2, cell size on
//! line 4. Each value is the first token of its line.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::{first_token, DataError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridParams {
    pub nx: usize,
    pub ny: usize,
    /// Cell size in degrees.
    pub cell_size: f64,
}

pub fn read_grid_params(path: &Path) -> Result<GridParams, DataError> {
    let text = fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
    parse_grid_params(&text, path)
}

pub fn parse_grid_params(text: &str, path: &Path) -> Result<GridParams, DataError> {
    let lines: Vec<&str> = text.lines().collect();

    let nx = token(&lines, 0, "nx", path)?
        .parse::<usize>()
        .map_err(|e| DataError::parse(path, 1, format!("invalid nx: {e}")))?;
    let ny = token(&lines, 1, "ny", path)?
        .parse::<usize>()
        .map_err(|e| DataError::parse(path, 2, format!("invalid ny: {e}")))?;
    let cell_size = token(&lines, 3, "cell size", path)?
        .parse::<f64>()
        .map_err(|e| DataError::parse(path, 4, format!("invalid cell size: {e}")))?;

    Ok(GridParams { nx, ny, cell_size })
}

fn token<'a>(lines: &[&'a str], idx: usize, what: &str, path: &Path) -> Result<&'a str, DataError> {
    lines
        .get(idx)
        .copied()
        .and_then(first_token)
        .ok_or_else(|| DataError::parse(path, idx + 1, format!("missing {what}")))
}
