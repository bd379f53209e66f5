//! Hydropost Core — domain types, calendar windows, statistics, file formats.
//!
//! This crate holds everything the post-processing pipelines compute or read:
//! - Annual-maximum matrices, gauge stations, grid cells, and sentinels
//! - Inclusive date ranges and per-year grid windows
//! - Plotting positions, Gumbel L-moment fitting, Nash–Sutcliffe efficiency
//! - Readers/writers for flat f32 binaries, dam CSVs, grid parameters,
//!   station lists, and observed discharge files
//!
//! Orchestration, configuration, and plotting live in `hydropost-runner`.

pub mod calendar;
pub mod domain;
pub mod io;
pub mod stats;

#[cfg(test)]
mod tests {
    use super::*;

    /// Everything the runner hands across worker threads must be Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::AnnualMaxMatrix>();
        require_sync::<domain::AnnualMaxMatrix>();
        require_send::<domain::Station>();
        require_sync::<domain::Station>();
        require_send::<calendar::DateRange>();
        require_sync::<calendar::DateRange>();
        require_send::<io::YearGrid>();
        require_sync::<io::YearGrid>();
        require_send::<io::ObservedSeries>();
        require_sync::<io::ObservedSeries>();
        require_send::<io::DataError>();
        require_sync::<io::DataError>();
        require_send::<stats::GumbelFit>();
        require_sync::<stats::GumbelFit>();
    }
}
