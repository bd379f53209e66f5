//! Gauge stations and their river-network grid cells.

use serde::{Deserialize, Serialize};

use super::ABSENT_CELL;

/// Zero-based (x, y) cell in the simulation grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub x: usize,
    pub y: usize,
}

impl GridCell {
    /// Convert the 1-based coordinates used in station lists.
    /// Returns `None` for anything below 1.
    pub fn from_one_based(x: i64, y: i64) -> Option<Self> {
        if x < 1 || y < 1 {
            return None;
        }
        Some(Self {
            x: (x - 1) as usize,
            y: (y - 1) as usize,
        })
    }

    pub fn fits(&self, nx: usize, ny: usize) -> bool {
        self.x < nx && self.y < ny
    }
}

/// A validation station: a gauge matched to one or two grid cells whose
/// simulated discharges are summed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub river: String,
    pub name: String,
    pub primary: GridCell,
    pub secondary: Option<GridCell>,
}

impl Station {
    /// Interpret a raw secondary coordinate pair; either value at the
    /// sentinel means the station has a single cell.
    pub fn secondary_from_raw(x: i64, y: i64) -> Option<Option<GridCell>> {
        if x == ABSENT_CELL || y == ABSENT_CELL {
            return Some(None);
        }
        GridCell::from_one_based(x, y).map(Some)
    }

    /// Base name of the comparison figure, `{river}-{station}`.
    pub fn file_stem(&self) -> String {
        format!("{}-{}", self.river, self.name)
    }

    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        std::iter::once(self.primary).chain(self.secondary)
    }
}
