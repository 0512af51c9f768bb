//! `evcap validate`

use anyhow::{Context, Result};
use evcap_algo::{diagnose_inputs, FleetSizing};
use evcap_cli::cli::InputArgs;
use evcap_cli::config::EvcapConfig;
use evcap_io::{load_inputs, DataError};

use super::input_paths;

pub fn handle(config: &EvcapConfig, inputs: &InputArgs) -> Result<()> {
    let loaded = load_inputs(&input_paths(inputs), config.horizon_hours)
        .context("loading input tables")?;
    let mut diagnostics = loaded.diagnostics;
    diagnostics.merge(diagnose_inputs(&loaded.inputs, &config.fleet));

    println!("Loaded {} hours", loaded.inputs.hours());
    match FleetSizing::from_inputs(&loaded.inputs, &config.fleet) {
        Ok(sizing) => println!(
            "Fleet sizing: {:.2} MWh / {:.2} MW",
            sizing.energy_cap.value(),
            sizing.power_cap.value()
        ),
        Err(e) => diagnostics.add_error("sizing", &e.to_string()),
    }
    print!("{}", diagnostics);

    if diagnostics.has_errors() {
        return Err(DataError::Invalid(format!("validation found {}", diagnostics.summary())).into());
    }
    Ok(())
}
