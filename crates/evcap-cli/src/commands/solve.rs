//! `evcap solve`

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use evcap_algo::{diagnose_inputs, plan_capacity, GoodLpBackend, DEFAULT_RESIDUAL_TOLERANCE};
use evcap_cli::cli::InputArgs;
use evcap_cli::config::EvcapConfig;
use evcap_io::{
    load_inputs, timestamped_results_path, write_hourly_results, write_run_summary, RunSummary,
};
use tracing::{info, warn};

use super::input_paths;

pub fn handle(
    config: &EvcapConfig,
    inputs: &InputArgs,
    out: Option<&Path>,
    summary: Option<&Path>,
) -> Result<()> {
    let loaded = load_inputs(&input_paths(inputs), config.horizon_hours)
        .context("loading input tables")?;
    let params = config.planning_params();

    let mut diagnostics = loaded.diagnostics;
    diagnostics.merge(diagnose_inputs(&loaded.inputs, &params.fleet));
    for issue in &diagnostics.issues {
        warn!("{}", issue);
    }

    let backend = GoodLpBackend::new(config.solver.settings()?);
    info!("Solving with {}", config.solver.backend);
    let plan = plan_capacity(&loaded.inputs, &params, &backend)
        .context("capacity optimization failed")?;
    plan.residuals.log(DEFAULT_RESIDUAL_TOLERANCE);

    let out_path = match out {
        Some(path) => path.to_path_buf(),
        None => timestamped_results_path(&config.output.results_dir, &Local::now()),
    };
    write_hourly_results(&out_path, &plan.solution.hourly_records(&loaded.inputs))?;

    if let Some(path) = summary {
        let run = RunSummary::new(&plan.solution, &loaded.inputs, plan.residuals, diagnostics)
            .with_results_table(&out_path);
        write_run_summary(path, &run)?;
        info!("Run summary written to {}", path.display());
    }

    print!("{}", plan.solution.summary());
    let annual = plan.solution.annual_summary(&loaded.inputs);
    println!(
        "Annual: baseline {:.2} MWh, optimized {:.2} MWh, driving {:.2} MWh, curtailed {:.2} MWh",
        annual.baseline_energy.value(),
        annual.optimized_charge.value(),
        annual.driving_energy.value(),
        annual.curtailed_energy.value()
    );
    println!("Results written to {}", out_path.display());
    Ok(())
}
