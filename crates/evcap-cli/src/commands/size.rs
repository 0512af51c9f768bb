//! `evcap size`

use std::path::Path;

use anyhow::{Context, Result};
use evcap_algo::derive_fleet_sizing;
use evcap_cli::config::EvcapConfig;
use evcap_io::{read_baseline_demand, read_ev_schedule};

pub fn handle(config: &EvcapConfig, schedule: &Path, baseline: &Path, json: bool) -> Result<()> {
    let schedule = read_ev_schedule(schedule, config.horizon_hours)
        .context("loading EV schedule table")?;
    let baseline = read_baseline_demand(baseline, config.horizon_hours)
        .context("loading baseline demand table")?;

    let sizing = derive_fleet_sizing(&baseline, &schedule.driving_loss, &config.fleet)
        .context("fleet sizing failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sizing)?);
    } else {
        println!("EV energy capacity: {:.2} MWh", sizing.energy_cap.value());
        println!("EV power capacity:  {:.2} MW", sizing.power_cap.value());
        println!("C-rate:             {:.4} 1/h", sizing.c_rate);
        println!("Implied vehicles:   {:.0}", sizing.implied_vehicle_count);
    }
    Ok(())
}
