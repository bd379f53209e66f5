//! Dam-site list. Only the row count is consumed: site `i` is the `i`-th
//! data row and the `i`-th column of the annual-maximum matrix.

use std::path::Path;

use super::DataError;

/// Number of data rows (header excluded) in the dam-site CSV.
pub fn count_dam_sites(path: &Path) -> Result<usize, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|source| DataError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let mut count = 0;
    for record in reader.records() {
        record.map_err(|source| DataError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        count += 1;
    }
    Ok(count)
}
