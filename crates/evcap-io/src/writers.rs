//! Result persistence: hourly CSV table and JSON run summary.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use evcap_algo::{AnnualSummary, CapacitySolution, HourlyRecord, ScheduleResiduals, SolveStatus};
use evcap_core::{Diagnostics, HourlyInputs};
use serde::Serialize;
use tracing::info;

/// Prefix of timestamped result tables.
pub const RESULTS_PREFIX: &str = "ev_opt_results";

/// `<dir>/ev_opt_results_<YYYYmmdd_HHMMSS>.csv`
pub fn timestamped_results_path<Tz: TimeZone>(dir: impl AsRef<Path>, at: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    dir.as_ref().join(format!(
        "{}_{}.csv",
        RESULTS_PREFIX,
        at.format("%Y%m%d_%H%M%S")
    ))
}

/// Write one row per hour with the columns of [`HourlyRecord`].
pub fn write_hourly_results(path: &Path, records: &[HourlyRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }

    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating CSV writer for {}", path.display()))?;
    for record in records {
        wtr.serialize(record).context("writing CSV record")?;
    }
    wtr.flush().context("flushing CSV writer")?;

    info!("Wrote {} hourly rows to {}", records.len(), path.display());
    Ok(())
}

/// Scalars and totals of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Local>,
    pub solver: String,
    pub status: SolveStatus,
    pub hours: usize,
    pub solar_capacity_mw: f64,
    pub wind_capacity_mw: f64,
    pub ev_energy_cap_mwh: f64,
    pub ev_power_cap_mw: f64,
    pub implied_vehicle_count: f64,
    pub objective: f64,
    pub capital_cost: f64,
    pub curtailment_cost: f64,
    pub annual: AnnualSummary,
    pub residuals: ScheduleResiduals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results_table: Option<PathBuf>,
    pub diagnostics: Diagnostics,
}

impl RunSummary {
    pub fn new(
        solution: &CapacitySolution,
        inputs: &HourlyInputs,
        residuals: ScheduleResiduals,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            generated_at: Local::now(),
            solver: solution.solver.clone(),
            status: solution.status,
            hours: solution.hours(),
            solar_capacity_mw: solution.solar_capacity.value(),
            wind_capacity_mw: solution.wind_capacity.value(),
            ev_energy_cap_mwh: solution.sizing.energy_cap.value(),
            ev_power_cap_mw: solution.sizing.power_cap.value(),
            implied_vehicle_count: solution.sizing.implied_vehicle_count,
            objective: solution.objective,
            capital_cost: solution.capital_cost,
            curtailment_cost: solution.curtailment_cost,
            annual: solution.annual_summary(inputs),
            residuals,
            results_table: None,
            diagnostics,
        }
    }

    pub fn with_results_table(mut self, path: impl Into<PathBuf>) -> Self {
        self.results_table = Some(path.into());
        self
    }
}

/// Write the run summary as pretty JSON.
pub fn write_run_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("serializing run summary to JSON")?;
    fs::write(path, json).with_context(|| format!("writing JSON to {}", path.display()))?;
    Ok(())
}
