//! Station list: one header line, then whitespace-separated records
//! `river station x1 y1 x2 y2` with 1-based grid coordinates.

use std::fs;
use std::path::Path;

use super::DataError;
use crate::domain::{GridCell, Station};

pub fn read_station_list(path: &Path) -> Result<Vec<Station>, DataError> {
    let text = fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
    parse_station_list(&text, path)
}

pub fn parse_station_list(text: &str, path: &Path) -> Result<Vec<Station>, DataError> {
    let mut stations = Vec::new();

    for (idx, line) in text.lines().enumerate().skip(1) {
        let lineno = idx + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() < 6 {
            return Err(DataError::parse(
                path,
                lineno,
                format!("expected 6 fields, found {}", fields.len()),
            ));
        }

        let mut coords = [0i64; 4];
        for (slot, raw) in coords.iter_mut().zip(&fields[2..6]) {
            *slot = raw
                .parse()
                .map_err(|e| DataError::parse(path, lineno, format!("invalid coordinate '{raw}': {e}")))?;
        }
        let [x1, y1, x2, y2] = coords;

        let primary = GridCell::from_one_based(x1, y1).ok_or_else(|| {
            DataError::parse(path, lineno, format!("invalid primary cell ({x1}, {y1})"))
        })?;
        let secondary = Station::secondary_from_raw(x2, y2).ok_or_else(|| {
            DataError::parse(path, lineno, format!("invalid secondary cell ({x2}, {y2})"))
        })?;

        stations.push(Station {
            river: fields[0].to_string(),
            name: fields[1].to_string(),
            primary,
            secondary,
        });
    }

    Ok(stations)
}
