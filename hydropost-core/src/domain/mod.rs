//! Domain types shared by both pipelines.

pub mod annual_max;
pub mod station;

pub use annual_max::{AnnualMaxMatrix, ShapeError};
pub use station::{GridCell, Station};

/// Annual-maximum values at or above this mark a missing or invalid record.
pub const MISSING_THRESHOLD: f32 = 1e20;

/// Fill value for every day of a station whose observation file is absent.
pub const OBS_FILE_MISSING: f64 = -9999.0;

/// Fill value for a day with no record in an existing observation file.
pub const OBS_DAY_MISSING: f64 = -9900.0;

/// Coordinate value marking an unused secondary grid cell in the station list.
pub const ABSENT_CELL: i64 = -9999;
