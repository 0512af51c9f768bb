//! TOML run configuration.
//!
//! Every table and field has a default, so an empty file (or no file) runs
//! the reference case over a full year.

use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use evcap_algo::{CostParams, FleetParams, LpSolverKind, PlanningParams, SolverSettings};
use evcap_core::HOURS_PER_YEAR;
use serde::{Deserialize, Serialize};

use crate::cli::OverrideArgs;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvcapConfig {
    /// Hours every input table must cover
    #[serde(default = "default_horizon_hours")]
    pub horizon_hours: usize,
    #[serde(default)]
    pub costs: CostParams,
    #[serde(default)]
    pub fleet: FleetParams,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for EvcapConfig {
    fn default() -> Self {
        Self {
            horizon_hours: default_horizon_hours(),
            costs: CostParams::default(),
            fleet: FleetParams::default(),
            solver: SolverConfig::default(),
            logging: LoggingConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

fn default_horizon_hours() -> usize {
    HOURS_PER_YEAR
}

/// LP solver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Solver time limit in seconds (0 = no limit)
    #[serde(default)]
    pub time_limit_seconds: f64,
    #[serde(default)]
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            time_limit_seconds: 0.0,
            verbose: false,
        }
    }
}

fn default_backend() -> String {
    "clarabel".to_string()
}

impl SolverConfig {
    pub fn settings(&self) -> Result<SolverSettings> {
        let backend: LpSolverKind = self.backend.parse()?;
        ensure!(
            self.time_limit_seconds.is_finite() && self.time_limit_seconds >= 0.0,
            "solver time_limit_seconds must be non-negative, got {}",
            self.time_limit_seconds
        );
        Ok(SolverSettings {
            backend,
            time_limit_seconds: (self.time_limit_seconds > 0.0).then_some(self.time_limit_seconds),
            verbose: self.verbose,
        })
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl LoggingConfig {
    pub fn level(&self) -> Result<tracing::Level> {
        self.level
            .parse()
            .with_context(|| format!("invalid [logging] level '{}'", self.level))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for timestamped result tables
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
        }
    }
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

impl EvcapConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: EvcapConfig = toml::from_str(contents).context("parsing configuration TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.horizon_hours > 0, "horizon_hours must be positive");
        self.planning_params().validate()?;
        self.logging.level()?;
        self.solver.settings()?;
        Ok(())
    }

    /// Apply command-line overrides and re-validate.
    pub fn apply_overrides(&mut self, overrides: &OverrideArgs) -> Result<()> {
        if let Some(v) = overrides.solar_cost {
            self.costs.solar_per_mw = v;
        }
        if let Some(v) = overrides.wind_cost {
            self.costs.wind_per_mw = v;
        }
        if let Some(v) = overrides.curtailment_cost {
            self.costs.curtailment_per_mwh = v;
        }
        if let Some(v) = overrides.charge_efficiency {
            self.fleet.charge_efficiency = v;
        }
        if let Some(solver) = &overrides.solver {
            self.solver.backend = solver.clone();
        }
        if let Some(hours) = overrides.horizon {
            self.horizon_hours = hours;
        }
        self.validate()
    }

    pub fn planning_params(&self) -> PlanningParams {
        PlanningParams {
            costs: self.costs,
            fleet: self.fleet,
        }
    }
}

/// Load `path`, or the defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<EvcapConfig> {
    match path {
        None => Ok(EvcapConfig::default()),
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("reading configuration {}", path.display()))?;
            EvcapConfig::from_toml_str(&contents)
                .with_context(|| format!("loading configuration {}", path.display()))
        }
    }
}
