//! Post-solve constraint residuals.
//!
//! Recomputes every row of the model at the extracted solution. Residuals are
//! relative: the violation of a row divided by the larger of 1, its
//! right-hand side and its largest term.

use serde::Serialize;
use tracing::{info, warn};

use crate::model::{ConstraintFamily, LpModel};
use crate::solution::CapacitySolution;

/// Default relative tolerance for [`ScheduleResiduals::within`].
pub const DEFAULT_RESIDUAL_TOLERANCE: f64 = 1e-5;

/// Worst relative violation per constraint family.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScheduleResiduals {
    pub power_balance: f64,
    pub annual_parity: f64,
    pub soc_ceiling: f64,
    pub soc_floor: f64,
    pub availability_cap: f64,
    pub soc_dynamics: f64,
    /// Most negative column value, as a positive number
    pub negativity: f64,
    /// Hour of the worst per-hour violation
    pub worst_hour: Option<usize>,
}

impl ScheduleResiduals {
    pub fn get(&self, family: ConstraintFamily) -> f64 {
        match family {
            ConstraintFamily::PowerBalance => self.power_balance,
            ConstraintFamily::AnnualEnergyParity => self.annual_parity,
            ConstraintFamily::SocCeiling => self.soc_ceiling,
            ConstraintFamily::SocFloor => self.soc_floor,
            ConstraintFamily::AvailabilityCap => self.availability_cap,
            ConstraintFamily::SocDynamics => self.soc_dynamics,
        }
    }

    fn slot(&mut self, family: ConstraintFamily) -> &mut f64 {
        match family {
            ConstraintFamily::PowerBalance => &mut self.power_balance,
            ConstraintFamily::AnnualEnergyParity => &mut self.annual_parity,
            ConstraintFamily::SocCeiling => &mut self.soc_ceiling,
            ConstraintFamily::SocFloor => &mut self.soc_floor,
            ConstraintFamily::AvailabilityCap => &mut self.availability_cap,
            ConstraintFamily::SocDynamics => &mut self.soc_dynamics,
        }
    }

    pub fn max(&self) -> f64 {
        ConstraintFamily::ALL
            .iter()
            .map(|f| self.get(*f))
            .fold(self.negativity, f64::max)
    }

    pub fn within(&self, tolerance: f64) -> bool {
        self.max() <= tolerance
    }

    /// Log each family; warn when one exceeds `tolerance`.
    pub fn log(&self, tolerance: f64) {
        for family in ConstraintFamily::ALL {
            let residual = self.get(family);
            if residual > tolerance {
                warn!(
                    "{} residual {:.3e} exceeds tolerance {:.1e}",
                    family, residual, tolerance
                );
            }
        }
        if self.negativity > tolerance {
            warn!("negative column value {:.3e}", -self.negativity);
        }
        info!(
            "Max constraint residual {:.3e}{}",
            self.max(),
            self.worst_hour
                .map(|t| format!(" (worst hour {})", t))
                .unwrap_or_default()
        );
    }
}

/// Residuals of `x` against every row of `model`.
pub fn residuals_for_values(model: &LpModel, x: &[f64]) -> ScheduleResiduals {
    let mut residuals = ScheduleResiduals::default();
    let mut worst = 0.0;

    for row in &model.rows {
        let relative = row.violation(x) / row.scale(x);
        let slot = residuals.slot(row.family);
        if relative > *slot {
            *slot = relative;
        }
        if row.hour.is_some() && relative > worst {
            worst = relative;
            residuals.worst_hour = row.hour;
        }
    }

    residuals.negativity = x.iter().fold(0.0, |acc: f64, v| acc.max(-v));
    residuals
}

/// Check an extracted solution against the model it came from.
pub fn verify_solution(model: &LpModel, solution: &CapacitySolution) -> ScheduleResiduals {
    residuals_for_values(model, &solution.column_values(model))
}
