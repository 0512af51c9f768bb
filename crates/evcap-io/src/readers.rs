//! Hourly CSV input tables.
//!
//! Every table has a header row and a `t` column. Hours may be 0-based or
//! 1-based (a table whose smallest `t` is 1 is shifted down by one). After
//! normalization each hour of the horizon must appear exactly once; rows past
//! the horizon are dropped with a warning.
//!
//! | Table | Columns |
//! |-------|---------|
//! | capacity factors | `t, solar, wind` |
//! | EV schedule | `t, EV_avail, SOC_req, driving_loss` |
//! | baseline demand | `t, value` (MWh) |

use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use evcap_core::{CapacityFactors, Diagnostics, EvSchedule, HourlyInputs};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::DataError;

pub const CAPACITY_FACTOR_COLUMNS: &[&str] = &["t", "solar", "wind"];
pub const SCHEDULE_COLUMNS: &[&str] = &["t", "EV_avail", "SOC_req", "driving_loss"];
pub const BASELINE_COLUMNS: &[&str] = &["t", "value"];

trait HourRow {
    fn hour(&self) -> f64;
}

#[derive(Debug, Deserialize)]
struct CapacityFactorRow {
    t: f64,
    solar: f64,
    wind: f64,
}

impl HourRow for CapacityFactorRow {
    fn hour(&self) -> f64 {
        self.t
    }
}

#[derive(Debug, Deserialize)]
struct ScheduleRow {
    t: f64,
    #[serde(rename = "EV_avail")]
    availability: f64,
    #[serde(rename = "SOC_req")]
    soc_requirement: f64,
    driving_loss: f64,
}

impl HourRow for ScheduleRow {
    fn hour(&self) -> f64 {
        self.t
    }
}

#[derive(Debug, Deserialize)]
struct BaselineRow {
    t: f64,
    value: f64,
}

impl HourRow for BaselineRow {
    fn hour(&self) -> f64 {
        self.t
    }
}

/// Read `path` into exactly `horizon` rows ordered by hour.
fn read_hourly_rows<R>(
    path: &Path,
    required: &[&str],
    horizon: usize,
    diag: &mut Diagnostics,
) -> Result<Vec<R>, DataError>
where
    R: DeserializeOwned + HourRow,
{
    let label = path.display().to_string();
    let csv_error = |source| DataError::Csv {
        path: label.clone(),
        source,
    };

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(csv_error)?;
    let headers: StringRecord = rdr.headers().map_err(csv_error)?.clone();

    let missing: Vec<String> = required
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DataError::MissingColumns {
            path: label,
            missing,
        });
    }

    let mut parsed: Vec<(u64, usize, R)> = Vec::with_capacity(horizon);
    for result in rdr.records() {
        let record = result.map_err(csv_error)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row: R = record
            .deserialize(Some(&headers))
            .map_err(|e| DataError::BadRow {
                path: label.clone(),
                line,
                message: e.to_string(),
            })?;
        let t = row.hour();
        if !(t.is_finite() && t >= 0.0 && t.fract() == 0.0) {
            return Err(DataError::InvalidHour {
                path: label,
                line,
                value: t,
            });
        }
        parsed.push((line, t as usize, row));
    }

    if parsed.len() < horizon {
        return Err(DataError::TooFewRows {
            path: label,
            rows: parsed.len(),
            expected: horizon,
        });
    }

    let offset = match parsed.iter().map(|(_, t, _)| *t).min() {
        Some(1) => 1,
        _ => 0,
    };

    let mut slots: Vec<Option<R>> = (0..horizon).map(|_| None).collect();
    let mut beyond: Vec<u64> = Vec::new();
    for (line, t, row) in parsed {
        let hour = t - offset;
        if hour >= horizon {
            beyond.push(line);
            continue;
        }
        if slots[hour].is_some() {
            return Err(DataError::DuplicateHour {
                path: label,
                line,
                hour,
            });
        }
        slots[hour] = Some(row);
    }

    if let Some(first) = beyond.first() {
        let message = format!(
            "{} row(s) past the {}-hour horizon ignored in '{}'",
            beyond.len(),
            horizon,
            label
        );
        warn!("{}", message);
        diag.add_warning_at_line("input", &message, *first as usize);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(hour, slot)| {
            slot.ok_or_else(|| DataError::MissingHour {
                path: label.clone(),
                hour,
            })
        })
        .collect()
}

pub fn read_capacity_factors(path: impl AsRef<Path>, horizon: usize) -> Result<CapacityFactors, DataError> {
    read_capacity_factors_with_diagnostics(path, horizon, &mut Diagnostics::new())
}

/// Read `t, solar, wind`.
pub fn read_capacity_factors_with_diagnostics(
    path: impl AsRef<Path>,
    horizon: usize,
    diag: &mut Diagnostics,
) -> Result<CapacityFactors, DataError> {
    let rows: Vec<CapacityFactorRow> =
        read_hourly_rows(path.as_ref(), CAPACITY_FACTOR_COLUMNS, horizon, diag)?;
    let (solar, wind) = rows.into_iter().map(|r| (r.solar, r.wind)).unzip();
    Ok(CapacityFactors::new(solar, wind))
}

pub fn read_ev_schedule(path: impl AsRef<Path>, horizon: usize) -> Result<EvSchedule, DataError> {
    read_ev_schedule_with_diagnostics(path, horizon, &mut Diagnostics::new())
}

/// Read `t, EV_avail, SOC_req, driving_loss`.
pub fn read_ev_schedule_with_diagnostics(
    path: impl AsRef<Path>,
    horizon: usize,
    diag: &mut Diagnostics,
) -> Result<EvSchedule, DataError> {
    let rows: Vec<ScheduleRow> = read_hourly_rows(path.as_ref(), SCHEDULE_COLUMNS, horizon, diag)?;
    let mut schedule = EvSchedule::new(
        Vec::with_capacity(horizon),
        Vec::with_capacity(horizon),
        Vec::with_capacity(horizon),
    );
    for row in rows {
        schedule.availability.push(row.availability);
        schedule.soc_requirement.push(row.soc_requirement);
        schedule.driving_loss.push(row.driving_loss);
    }
    Ok(schedule)
}

pub fn read_baseline_demand(path: impl AsRef<Path>, horizon: usize) -> Result<Vec<f64>, DataError> {
    read_baseline_demand_with_diagnostics(path, horizon, &mut Diagnostics::new())
}

/// Read `t, value`.
pub fn read_baseline_demand_with_diagnostics(
    path: impl AsRef<Path>,
    horizon: usize,
    diag: &mut Diagnostics,
) -> Result<Vec<f64>, DataError> {
    let rows: Vec<BaselineRow> = read_hourly_rows(path.as_ref(), BASELINE_COLUMNS, horizon, diag)?;
    Ok(rows.into_iter().map(|r| r.value).collect())
}

/// Locations of the three input tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPaths {
    pub capacity_factors: PathBuf,
    pub schedule: PathBuf,
    pub baseline: PathBuf,
}

/// Validated inputs plus anything worth telling the user about the tables.
#[derive(Debug, Clone)]
pub struct LoadedInputs {
    pub inputs: HourlyInputs,
    pub diagnostics: Diagnostics,
}

/// Load and validate all three tables for a `horizon`-hour run.
pub fn load_inputs(paths: &InputPaths, horizon: usize) -> Result<LoadedInputs, DataError> {
    let mut diagnostics = Diagnostics::new();
    let cf = read_capacity_factors_with_diagnostics(&paths.capacity_factors, horizon, &mut diagnostics)?;
    let schedule = read_ev_schedule_with_diagnostics(&paths.schedule, horizon, &mut diagnostics)?;
    let baseline = read_baseline_demand_with_diagnostics(&paths.baseline, horizon, &mut diagnostics)?;

    let inputs = HourlyInputs::new(cf, schedule, baseline)?;
    info!(
        "Loaded {} hours: baseline EV energy {:.2} MWh, total driving loss {:.4}",
        inputs.hours(),
        inputs.annual_baseline_energy().value(),
        inputs.schedule().total_driving_loss()
    );

    Ok(LoadedInputs {
        inputs,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_one_based_hours_are_shifted() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "cf.csv", "t,solar,wind\n1,0.1,0.5\n2,0.2,0.6\n3,0.3,0.7\n");
        let cf = read_capacity_factors(&path, 3).unwrap();
        assert_eq!(cf.solar, vec![0.1, 0.2, 0.3]);
        assert_eq!(cf.wind, vec![0.5, 0.6, 0.7]);
    }

    #[test]
    fn test_rows_are_ordered_by_hour() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "base.csv", "t,value\n2,30\n0,10\n1,20\n");
        assert_eq!(read_baseline_demand(&path, 3).unwrap(), vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_whitespace_and_extra_columns() {
        let dir = tempdir().unwrap();
        let path = write(
            dir.path(),
            "sched.csv",
            "t, EV_avail , SOC_req,driving_loss,note\n0, 0.8, 0.0, 0.0,home\n1,0.4,0.8,0.2,work\n",
        );
        let schedule = read_ev_schedule(&path, 2).unwrap();
        assert_eq!(schedule.availability, vec![0.8, 0.4]);
        assert_eq!(schedule.soc_requirement, vec![0.0, 0.8]);
        assert_eq!(schedule.driving_loss, vec![0.0, 0.2]);
    }

    #[test]
    fn test_missing_column() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "cf.csv", "t,solar\n0,0.1\n");
        let err = read_capacity_factors(&path, 1).unwrap_err();
        match err {
            DataError::MissingColumns { missing, .. } => assert_eq!(missing, vec!["wind"]),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_hour() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "base.csv", "t,value\n0,1\n1,1\n1,2\n");
        let err = read_baseline_demand(&path, 3).unwrap_err();
        assert!(matches!(err, DataError::DuplicateHour { hour: 1, line: 4, .. }), "{:?}", err);
    }

    #[test]
    fn test_missing_hour() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "base.csv", "t,value\n0,1\n2,1\n3,1\n");
        let err = read_baseline_demand(&path, 3).unwrap_err();
        assert!(matches!(err, DataError::MissingHour { hour: 1, .. }), "{:?}", err);
    }

    #[test]
    fn test_too_few_rows() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "base.csv", "t,value\n0,1\n1,1\n");
        let err = read_baseline_demand(&path, 24).unwrap_err();
        assert!(matches!(err, DataError::TooFewRows { rows: 2, expected: 24, .. }));
    }

    #[test]
    fn test_non_numeric_cell() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "base.csv", "t,value\n0,1\n1,abc\n");
        let err = read_baseline_demand(&path, 2).unwrap_err();
        assert!(matches!(err, DataError::BadRow { line: 3, .. }), "{:?}", err);
    }

    #[test]
    fn test_fractional_hour_rejected() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "base.csv", "t,value\n0,1\n0.5,1\n");
        let err = read_baseline_demand(&path, 2).unwrap_err();
        assert!(matches!(err, DataError::InvalidHour { .. }));
    }

    #[test]
    fn test_rows_past_horizon_warn() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "base.csv", "t,value\n0,1\n1,2\n2,3\n3,4\n");
        let mut diag = Diagnostics::new();
        let values = read_baseline_demand_with_diagnostics(&path, 2, &mut diag).unwrap();
        assert_eq!(values, vec![1.0, 2.0]);
        assert_eq!(diag.warning_count(), 1);
        assert_eq!(diag.issues[0].line, Some(4));
    }
}
