//! Capacity plan and hourly charging schedule produced by a solve.

use std::time::Duration;

use evcap_core::{HourlyInputs, MegawattHours, Megawatts, Technology};
use serde::{Deserialize, Serialize};

use crate::model::LpModel;
use crate::params::PlanningParams;
use crate::sizing::FleetSizing;
use crate::solver::{LpOutcome, SolveStatus};

/// Optimal capacities, schedules and costs of one planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacitySolution {
    pub status: SolveStatus,
    /// Backend that produced the solution
    pub solver: String,
    pub solar_capacity: Megawatts,
    pub wind_capacity: Megawatts,
    /// Sizing the model was built with
    pub sizing: FleetSizing,
    /// Optimized EV charging per hour (MW)
    pub ev_charge: Vec<f64>,
    /// Discarded renewable output per hour (MW)
    pub curtailment: Vec<f64>,
    /// Fleet state of charge at the end of each hour (MWh)
    pub ev_soc: Vec<f64>,
    pub capital_cost: f64,
    pub curtailment_cost: f64,
    pub objective: f64,
    #[serde(skip)]
    pub solve_time: Duration,
}

/// One row of the hourly results table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyRecord {
    pub t: usize,
    #[serde(rename = "EV_nrel")]
    pub ev_baseline: f64,
    #[serde(rename = "EV_opt")]
    pub ev_charge: f64,
    #[serde(rename = "EV_SOC")]
    pub ev_soc: f64,
    #[serde(rename = "EV_avail")]
    pub ev_availability: f64,
    #[serde(rename = "SOC_req")]
    pub soc_requirement: f64,
    pub drive_frac: f64,
    #[serde(rename = "driving_MWh")]
    pub driving_mwh: f64,
    pub curtailment: f64,
}

/// Horizon totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualSummary {
    pub baseline_energy: MegawattHours,
    pub optimized_charge: MegawattHours,
    pub driving_energy: MegawattHours,
    pub curtailed_energy: MegawattHours,
    pub renewable_generation: MegawattHours,
}

impl CapacitySolution {
    /// Lift raw column values into named quantities.
    pub fn from_outcome(
        model: &LpModel,
        sizing: &FleetSizing,
        params: &PlanningParams,
        solver: &str,
        outcome: LpOutcome,
    ) -> Self {
        let layout = model.layout;
        let hours = model.ring.hours();
        // Interior-point solvers can return tiny negatives on zero-valued columns.
        let value = |col: usize| outcome.values.get(col).copied().unwrap_or(0.0).max(0.0);

        let solar_capacity = Megawatts(value(layout.capacity(Technology::Solar)));
        let wind_capacity = Megawatts(value(layout.capacity(Technology::Wind)));
        let ev_charge: Vec<f64> = hours.clone().map(|t| value(layout.charge(t))).collect();
        let curtailment: Vec<f64> = hours.clone().map(|t| value(layout.curtailment(t))).collect();
        let ev_soc: Vec<f64> = hours.map(|t| value(layout.soc(t))).collect();

        let capital_cost = solar_capacity.value() * params.costs.solar_per_mw
            + wind_capacity.value() * params.costs.wind_per_mw;
        let curtailment_cost =
            curtailment.iter().sum::<f64>() * params.costs.curtailment_per_mwh;

        Self {
            status: outcome.status,
            solver: solver.to_string(),
            solar_capacity,
            wind_capacity,
            sizing: *sizing,
            ev_charge,
            curtailment,
            ev_soc,
            capital_cost,
            curtailment_cost,
            objective: capital_cost + curtailment_cost,
            solve_time: outcome.solve_time,
        }
    }

    pub fn capacity(&self, tech: Technology) -> Megawatts {
        match tech {
            Technology::Solar => self.solar_capacity,
            Technology::Wind => self.wind_capacity,
        }
    }

    pub fn hours(&self) -> usize {
        self.ev_charge.len()
    }

    /// Column values in model order, for residual checks.
    pub fn column_values(&self, model: &LpModel) -> Vec<f64> {
        let layout = model.layout;
        let mut x = vec![0.0; layout.len()];
        x[layout.capacity(Technology::Solar)] = self.solar_capacity.value();
        x[layout.capacity(Technology::Wind)] = self.wind_capacity.value();
        for t in 0..self.hours().min(layout.hours()) {
            x[layout.charge(t)] = self.ev_charge[t];
            x[layout.curtailment(t)] = self.curtailment[t];
            x[layout.soc(t)] = self.ev_soc[t];
        }
        x
    }

    /// Hourly results joined with the inputs they were solved against.
    pub fn hourly_records(&self, inputs: &HourlyInputs) -> Vec<HourlyRecord> {
        let schedule = inputs.schedule();
        let baseline = inputs.baseline_demand();
        let e_cap = self.sizing.energy_cap.value();

        (0..self.hours().min(inputs.hours()))
            .map(|t| HourlyRecord {
                t,
                ev_baseline: baseline[t],
                ev_charge: self.ev_charge[t],
                ev_soc: self.ev_soc[t],
                ev_availability: schedule.availability[t],
                soc_requirement: schedule.soc_requirement[t],
                drive_frac: schedule.driving_loss[t],
                driving_mwh: schedule.driving_loss[t] * e_cap,
                curtailment: self.curtailment[t],
            })
            .collect()
    }

    pub fn annual_summary(&self, inputs: &HourlyInputs) -> AnnualSummary {
        let cf = inputs.capacity_factors();
        let renewable_generation: f64 = (0..inputs.hours())
            .map(|t| {
                cf.solar[t] * self.solar_capacity.value() + cf.wind[t] * self.wind_capacity.value()
            })
            .sum();

        AnnualSummary {
            baseline_energy: inputs.annual_baseline_energy(),
            optimized_charge: MegawattHours(self.ev_charge.iter().sum()),
            driving_energy: self
                .sizing
                .driving_energy(inputs.schedule().total_driving_loss()),
            curtailed_energy: MegawattHours(self.curtailment.iter().sum()),
            renewable_generation: MegawattHours(renewable_generation),
        }
    }

    /// Format a human-readable summary
    pub fn summary(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Capacity Plan Summary\n{}\n", "=".repeat(40)));
        s.push_str(&format!("Status: {} ({})\n", self.status.as_str(), self.solver));
        s.push_str(&format!("Objective: ${:.4}\n", self.objective));
        s.push_str(&format!("  Capital: ${:.4}\n", self.capital_cost));
        s.push_str(&format!("  Curtailment: ${:.4}\n", self.curtailment_cost));
        s.push_str(&format!("Solar Capacity: {:.4} MW\n", self.solar_capacity.value()));
        s.push_str(&format!("Wind Capacity: {:.4} MW\n", self.wind_capacity.value()));
        s.push_str(&format!(
            "EV Energy Cap: {:.2} MWh\n",
            self.sizing.energy_cap.value()
        ));
        s.push_str(&format!("EV Power Cap: {:.2} MW\n", self.sizing.power_cap.value()));
        s.push_str(&format!(
            "Peak Charging: {:.4} MW\n",
            self.ev_charge.iter().copied().fold(0.0, f64::max)
        ));
        s.push_str(&format!("Solve Time: {:.2?}\n", self.solve_time));
        s
    }
}
