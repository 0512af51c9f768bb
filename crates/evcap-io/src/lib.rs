//! # evcap-io: input tables and result files
//!
//! - [`readers`]: hourly CSV tables with shape checks, assembled by [`load_inputs`]
//! - [`writers`]: hourly results CSV, JSON run summary, timestamped file names
//! - [`pattern`]: representative daily EV schedule tiled over the horizon

pub mod error;
pub mod pattern;
pub mod readers;
pub mod writers;

pub use error::DataError;
pub use pattern::{write_ev_schedule, DailyPattern, HOURS_PER_DAY};
pub use readers::{
    load_inputs, read_baseline_demand, read_baseline_demand_with_diagnostics,
    read_capacity_factors, read_capacity_factors_with_diagnostics, read_ev_schedule,
    read_ev_schedule_with_diagnostics, InputPaths, LoadedInputs,
};
pub use writers::{
    timestamped_results_path, write_hourly_results, write_run_summary, RunSummary, RESULTS_PREFIX,
};
