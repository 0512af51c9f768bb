//! Integration tests for the `evcap` binary

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

const HOURS: usize = 48;

struct Tables {
    cf: PathBuf,
    schedule: PathBuf,
    baseline: PathBuf,
}

/// Two days of inputs; `schedule_row` supplies `EV_avail,SOC_req,driving_loss` per hour.
fn write_tables(dir: &Path, schedule_row: impl Fn(usize) -> String) -> Tables {
    let mut cf = String::from("t,solar,wind\n");
    let mut schedule = String::from("t,EV_avail,SOC_req,driving_loss\n");
    let mut baseline = String::from("t,value\n");
    for t in 0..HOURS {
        let h = t % 24;
        let solar = if (7..17).contains(&h) { 0.7 } else { 0.0 };
        cf.push_str(&format!("{},{},0.35\n", t, solar));
        schedule.push_str(&format!("{},{}\n", t, schedule_row(h)));
        baseline.push_str(&format!("{},{}\n", t, if h >= 17 { 2.5 } else { 1.0 }));
    }
    let tables = Tables {
        cf: dir.join("cf.csv"),
        schedule: dir.join("schedule.csv"),
        baseline: dir.join("baseline.csv"),
    };
    fs::write(&tables.cf, cf).unwrap();
    fs::write(&tables.schedule, schedule).unwrap();
    fs::write(&tables.baseline, baseline).unwrap();
    tables
}

fn commuter(h: usize) -> String {
    let avail = if (8..18).contains(&h) { 0.4 } else { 0.8 };
    let floor = if h == 8 { 0.8 } else { 0.0 };
    let loss = if h == 9 || h == 18 { 0.2 } else { 0.0 };
    format!("{},{},{}", avail, floor, loss)
}

#[test]
fn test_help_lists_commands() {
    let mut cmd = cargo_bin_cmd!("evcap");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("solve"))
        .stdout(predicate::str::contains("size"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("schedule"));
}

#[test]
fn test_solve_help_mentions_tables() {
    let mut cmd = cargo_bin_cmd!("evcap");
    cmd.args(["solve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--cf"))
        .stdout(predicate::str::contains("--baseline"))
        .stdout(predicate::str::contains("--summary"));
}

#[test]
fn test_schedule_writes_horizon() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("schedule.csv");
    let mut cmd = cargo_bin_cmd!("evcap");
    cmd.args(["schedule", "--hours", "48", "--out"])
        .arg(&out)
        .assert()
        .success();

    let text = fs::read_to_string(&out).unwrap();
    assert_eq!(text.lines().count(), 49);
    assert!(text.starts_with("t,EV_avail,SOC_req,driving_loss"));
}

#[test]
fn test_size_prints_json() {
    let dir = tempfile::tempdir().unwrap();
    let tables = write_tables(dir.path(), commuter);
    let mut cmd = cargo_bin_cmd!("evcap");
    cmd.args(["size", "--horizon", "48", "--json", "--schedule"])
        .arg(&tables.schedule)
        .arg("--baseline")
        .arg(&tables.baseline)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"energy_cap\""))
        .stdout(predicate::str::contains("\"implied_vehicle_count\""));
}

#[test]
fn test_size_without_driving_fails() {
    let dir = tempfile::tempdir().unwrap();
    let tables = write_tables(dir.path(), |_| "1.0,0.0,0.0".to_string());
    let mut cmd = cargo_bin_cmd!("evcap");
    cmd.args(["size", "--horizon", "48", "--schedule"])
        .arg(&tables.schedule)
        .arg("--baseline")
        .arg(&tables.baseline)
        .assert()
        .code(4)
        .stderr(predicate::str::contains("driving loss"));
}

#[test]
fn test_solve_writes_results_and_summary() {
    let dir = tempfile::tempdir().unwrap();
    let tables = write_tables(dir.path(), commuter);
    let out = dir.path().join("results.csv");
    let summary = dir.path().join("summary.json");

    let mut cmd = cargo_bin_cmd!("evcap");
    cmd.args(["solve", "--horizon", "48", "--cf"])
        .arg(&tables.cf)
        .arg("--schedule")
        .arg(&tables.schedule)
        .arg("--baseline")
        .arg(&tables.baseline)
        .arg("--out")
        .arg(&out)
        .arg("--summary")
        .arg(&summary)
        .assert()
        .success()
        .stdout(predicate::str::contains("Solar Capacity"))
        .stdout(predicate::str::contains("Results written to"));

    let table = fs::read_to_string(&out).unwrap();
    assert_eq!(table.lines().count(), HOURS + 1);
    assert!(table.starts_with("t,EV_nrel,EV_opt,EV_SOC,EV_avail,SOC_req,drive_frac,driving_MWh,curtailment"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary).unwrap()).unwrap();
    assert_eq!(json["status"], "optimal");
    assert_eq!(json["hours"], HOURS);
}

#[test]
fn test_config_file_sets_horizon_and_costs() {
    let dir = tempfile::tempdir().unwrap();
    let tables = write_tables(dir.path(), commuter);
    let config = dir.path().join("evcap.toml");
    fs::write(
        &config,
        "horizon_hours = 48\n\n[costs]\nsolar_per_mw = 5.0\n\n[logging]\nlevel = \"warn\"\n",
    )
    .unwrap();
    let out = dir.path().join("results.csv");

    let mut cmd = cargo_bin_cmd!("evcap");
    cmd.arg("--config")
        .arg(&config)
        .args(["solve", "--cf"])
        .arg(&tables.cf)
        .arg("--schedule")
        .arg(&tables.schedule)
        .arg("--baseline")
        .arg(&tables.baseline)
        .arg("--out")
        .arg(&out)
        .assert()
        .success();
    assert!(out.exists());
}

#[test]
fn test_infeasible_solve_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    // Never plugged in, so no charging can meet the annual energy
    let tables = write_tables(dir.path(), |h| {
        format!("0.0,0.0,{}", if h == 9 { 0.3 } else { 0.0 })
    });
    let out = dir.path().join("results.csv");

    let mut cmd = cargo_bin_cmd!("evcap");
    cmd.args(["solve", "--horizon", "48", "--cf"])
        .arg(&tables.cf)
        .arg("--schedule")
        .arg(&tables.schedule)
        .arg("--baseline")
        .arg(&tables.baseline)
        .arg("--out")
        .arg(&out)
        .assert()
        .code(5)
        .stderr(predicate::str::contains("capacity optimization failed"));
    assert!(!out.exists());
}

#[test]
fn test_validate_reports_unreachable_floor() {
    let dir = tempfile::tempdir().unwrap();
    let tables = write_tables(dir.path(), |h| {
        if h == 12 {
            "1.0,1.0,0.9".to_string()
        } else {
            "1.0,0.0,0.0".to_string()
        }
    });

    let mut cmd = cargo_bin_cmd!("evcap");
    cmd.args(["validate", "--horizon", "48", "--cf"])
        .arg(&tables.cf)
        .arg("--schedule")
        .arg(&tables.schedule)
        .arg("--baseline")
        .arg(&tables.baseline)
        .assert()
        .code(3)
        .stdout(predicate::str::contains("unreachable"));
}

#[test]
fn test_missing_column_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let tables = write_tables(dir.path(), commuter);
    fs::write(&tables.baseline, "t,demand\n0,1.0\n").unwrap();

    let mut cmd = cargo_bin_cmd!("evcap");
    cmd.args(["validate", "--horizon", "48", "--cf"])
        .arg(&tables.cf)
        .arg("--schedule")
        .arg(&tables.schedule)
        .arg("--baseline")
        .arg(&tables.baseline)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("missing required column"));
}

#[test]
fn test_solve_without_driving_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let tables = write_tables(dir.path(), |_| "1.0,0.0,0.0".to_string());
    let out = dir.path().join("results.csv");

    let mut cmd = cargo_bin_cmd!("evcap");
    cmd.args(["solve", "--horizon", "48", "--cf"])
        .arg(&tables.cf)
        .arg("--schedule")
        .arg(&tables.schedule)
        .arg("--baseline")
        .arg(&tables.baseline)
        .arg("--out")
        .arg(&out)
        .assert()
        .code(4)
        .stderr(predicate::str::contains("driving loss"));
    assert!(!out.exists());
}

#[test]
fn test_invalid_config_file_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("evcap.toml");
    fs::write(&config, "[fleet]\ncharge_efficiency = 1.5\n").unwrap();

    let mut cmd = cargo_bin_cmd!("evcap");
    cmd.arg("--config")
        .arg(&config)
        .args(["schedule", "--out"])
        .arg(dir.path().join("schedule.csv"))
        .assert()
        .code(4)
        .stderr(predicate::str::contains("charge_efficiency"));
}

#[test]
fn test_solver_time_limit_is_solver_error() {
    let dir = tempfile::tempdir().unwrap();
    let tables = write_tables(dir.path(), commuter);
    let config = dir.path().join("evcap.toml");
    fs::write(&config, "[solver]\ntime_limit_seconds = 1e-9\n").unwrap();
    let out = dir.path().join("results.csv");

    let mut cmd = cargo_bin_cmd!("evcap");
    cmd.arg("--config")
        .arg(&config)
        .args(["solve", "--horizon", "48", "--cf"])
        .arg(&tables.cf)
        .arg("--schedule")
        .arg(&tables.schedule)
        .arg("--baseline")
        .arg(&tables.baseline)
        .arg("--out")
        .arg(&out)
        .assert()
        .code(7);
    assert!(!out.exists());
}
