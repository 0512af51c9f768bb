//! Aggregate fleet sizing from a baseline charging profile.
//!
//! The fleet is represented as one virtual battery. Its usable energy follows
//! from conservation over the horizon: the energy that reaches the batteries
//! (baseline charging after efficiency loss) must equal the energy driven
//! away, and driving losses are given as fractions of that same capacity.
//!
//! ```text
//! E_cap = η · Σ_t baseline[t] / Σ_t driving_loss[t]        (MWh)
//! P_cap = c_rate · E_cap                                   (MW)
//! ```
//!
//! The derivation is a pure function of the two series and the fleet
//! constants, and it never touches the other inputs.

use evcap_core::{HourlyInputs, MegawattHours, Megawatts};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::params::FleetParams;

/// Errors raised before the optimization problem is built.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SizingError {
    /// Sizing is undefined when nothing is ever driven
    #[error("total driving loss over the horizon must be positive, got {total}")]
    NoDrivingLoss { total: f64 },

    /// Baseline and driving-loss series cover different horizons
    #[error("baseline demand has {baseline} hours but driving loss has {driving_loss}")]
    LengthMismatch { baseline: usize, driving_loss: usize },

    /// A total could not be formed
    #[error("{0} is not finite")]
    NonFinite(&'static str),

    /// A cost or fleet constant is out of range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Aggregate fleet battery parameters, fixed before the solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FleetSizing {
    /// Usable fleet battery energy
    pub energy_cap: MegawattHours,
    /// Fleet charging power at full availability
    pub power_cap: Megawatts,
    /// Power-to-energy ratio used for `power_cap` (1/h)
    pub c_rate: f64,
    /// Sum of baseline charging over the horizon
    pub annual_ev_energy: MegawattHours,
    /// Sum of driving-loss fractions over the horizon
    pub total_loss_fraction: f64,
    /// Fleet size implied by `energy_cap` and per-vehicle usable energy
    pub implied_vehicle_count: f64,
}

/// Derive fleet energy and power capacity from the baseline profile.
///
/// Fails with [`SizingError::NoDrivingLoss`] when the driving-loss fractions
/// sum to zero or less.
pub fn derive_fleet_sizing(
    baseline_demand: &[f64],
    driving_loss: &[f64],
    fleet: &FleetParams,
) -> Result<FleetSizing, SizingError> {
    fleet.validate()?;

    if baseline_demand.len() != driving_loss.len() {
        return Err(SizingError::LengthMismatch {
            baseline: baseline_demand.len(),
            driving_loss: driving_loss.len(),
        });
    }

    let annual_ev_energy: f64 = baseline_demand.iter().sum();
    let total_loss_fraction: f64 = driving_loss.iter().sum();

    if !annual_ev_energy.is_finite() {
        return Err(SizingError::NonFinite("annual EV energy"));
    }
    if !total_loss_fraction.is_finite() {
        return Err(SizingError::NonFinite("total driving loss"));
    }
    if total_loss_fraction <= 0.0 {
        return Err(SizingError::NoDrivingLoss {
            total: total_loss_fraction,
        });
    }

    let energy_cap =
        MegawattHours(fleet.charge_efficiency * annual_ev_energy / total_loss_fraction);
    let c_rate = fleet.c_rate();
    let power_cap = energy_cap.at_c_rate(c_rate);
    let implied_vehicle_count =
        energy_cap.to_kilowatt_hours() / fleet.usable_per_vehicle();

    info!(
        "Implied EV count ~ {:.0}; EV_e_cap = {:.2} MWh, EV_p_cap = {:.2} MW",
        implied_vehicle_count,
        energy_cap.value(),
        power_cap.value()
    );

    Ok(FleetSizing {
        energy_cap,
        power_cap,
        c_rate,
        annual_ev_energy: MegawattHours(annual_ev_energy),
        total_loss_fraction,
        implied_vehicle_count,
    })
}

impl FleetSizing {
    /// Size the fleet from validated inputs.
    pub fn from_inputs(inputs: &HourlyInputs, fleet: &FleetParams) -> Result<Self, SizingError> {
        derive_fleet_sizing(
            inputs.baseline_demand(),
            &inputs.schedule().driving_loss,
            fleet,
        )
    }

    /// Driving energy drained at an hour with the given loss fraction.
    pub fn driving_energy(&self, loss_fraction: f64) -> MegawattHours {
        self.energy_cap * loss_fraction
    }
}
