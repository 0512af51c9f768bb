use clap::{Args, CommandFactory, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "evcap",
    author,
    version,
    about = "Co-optimize solar/wind capacity with a flexible EV charging schedule",
    long_about = None
)]
pub struct Cli {
    /// Set the logging level [default: config `[logging] level`, then info]
    #[arg(long, global = true)]
    pub log_level: Option<tracing::Level>,

    /// TOML configuration file
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Size the fleet, solve the capacity LP and write hourly results
    Solve {
        #[command(flatten)]
        inputs: InputArgs,
        #[command(flatten)]
        overrides: OverrideArgs,
        /// Hourly results CSV [default: <results_dir>/ev_opt_results_<timestamp>.csv]
        #[arg(long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
        /// Also write a JSON run summary here
        #[arg(long, value_hint = ValueHint::FilePath)]
        summary: Option<PathBuf>,
    },
    /// Derive fleet energy and power capacity only
    Size {
        /// EV schedule table (t, EV_avail, SOC_req, driving_loss)
        #[arg(long, value_hint = ValueHint::FilePath)]
        schedule: PathBuf,
        /// Baseline EV demand table (t, value)
        #[arg(long, value_hint = ValueHint::FilePath)]
        baseline: PathBuf,
        #[command(flatten)]
        overrides: OverrideArgs,
        /// Print the sizing as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load the inputs and report diagnostics without solving
    Validate {
        #[command(flatten)]
        inputs: InputArgs,
        #[command(flatten)]
        overrides: OverrideArgs,
    },
    /// Write the default daily EV pattern as a schedule table
    Schedule {
        /// Output CSV path
        #[arg(long, value_hint = ValueHint::FilePath)]
        out: PathBuf,
        /// Number of hours [default: config horizon_hours]
        #[arg(long)]
        hours: Option<usize>,
    },
}

impl Commands {
    /// Configuration overrides carried by the command, if any.
    pub fn overrides(&self) -> Option<&OverrideArgs> {
        match self {
            Commands::Solve { overrides, .. }
            | Commands::Size { overrides, .. }
            | Commands::Validate { overrides, .. } => Some(overrides),
            Commands::Schedule { .. } => None,
        }
    }
}

/// The three hourly input tables.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Capacity-factor table (t, solar, wind)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub cf: PathBuf,
    /// EV schedule table (t, EV_avail, SOC_req, driving_loss)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub schedule: PathBuf,
    /// Baseline EV demand table (t, value)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub baseline: PathBuf,
}

/// Command-line overrides for configuration values.
#[derive(Args, Debug, Clone, Default)]
pub struct OverrideArgs {
    /// Solar capital cost ($/MW)
    #[arg(long)]
    pub solar_cost: Option<f64>,
    /// Wind capital cost ($/MW)
    #[arg(long)]
    pub wind_cost: Option<f64>,
    /// Curtailment penalty ($/MWh)
    #[arg(long)]
    pub curtailment_cost: Option<f64>,
    /// EV charging efficiency in (0, 1]
    #[arg(long)]
    pub charge_efficiency: Option<f64>,
    /// LP solver backend (clarabel, highs)
    #[arg(long)]
    pub solver: Option<String>,
    /// Horizon length in hours
    #[arg(long)]
    pub horizon: Option<usize>,
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
