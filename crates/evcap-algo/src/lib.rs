//! # evcap-algo: fleet sizing and capacity/charging co-optimization
//!
//! Sizes renewable generation against an aggregated, schedulable EV fleet in
//! two steps:
//!
//! 1. [`derive_fleet_sizing`] turns a baseline charging profile and an hourly
//!    driving-loss profile into fleet battery energy and charging power.
//! 2. [`build_capacity_model`] writes one LP over the hour ring that chooses
//!    solar and wind capacity, hourly charging, curtailment and state of
//!    charge. An [`LpBackend`] solves it.
//!
//! ## Model
//!
//! | Family | Rows | Form |
//! |--------|------|------|
//! | Power balance | N | supply = charging + curtailment |
//! | Annual parity | 1 | Σ charging = Σ baseline |
//! | SOC ceiling / floor | 2N | `req[t]·E ≤ soc[t] ≤ E` |
//! | Availability | N | `charge[t] ≤ avail[t]·P` |
//! | SOC dynamics | N | cyclic, `prev(0) = N-1` |
//!
//! The objective is capital cost plus a curtailment penalty. Infeasible and
//! unbounded outcomes are errors; there is no relaxed fallback.
//!
//! ## Example
//!
//! ```no_run
//! use evcap_algo::{plan_capacity, GoodLpBackend, PlanningParams};
//! use evcap_core::{CapacityFactors, EvSchedule, HourlyInputs};
//!
//! let hours = 24;
//! let mut loss = vec![0.0; hours];
//! loss[12] = 0.5;
//! let inputs = HourlyInputs::new(
//!     CapacityFactors::constant(hours, 1.0, 1.0),
//!     EvSchedule::new(vec![1.0; hours], vec![0.0; hours], loss),
//!     vec![10.0; hours],
//! )?;
//!
//! let plan = plan_capacity(&inputs, &PlanningParams::default(), &GoodLpBackend::default())?;
//! println!("{}", plan.solution.summary());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod diagnose;
pub mod error;
pub mod model;
pub mod params;
pub mod sizing;
pub mod solution;
pub mod solver;
pub mod verify;

pub use diagnose::diagnose_inputs;
pub use error::OptimizeError;
pub use model::{build_capacity_model, ColumnLayout, ConstraintFamily, LpModel, LpRow, RowSense};
pub use params::{CostParams, FleetParams, PlanningParams};
pub use sizing::{derive_fleet_sizing, FleetSizing, SizingError};
pub use solution::{AnnualSummary, CapacitySolution, HourlyRecord};
pub use solver::{
    GoodLpBackend, LpBackend, LpOutcome, LpSolverKind, SolveStatus, SolverSettings,
};
pub use verify::{verify_solution, ScheduleResiduals, DEFAULT_RESIDUAL_TOLERANCE};

use evcap_core::HourlyInputs;
use tracing::info;

/// Everything one planning run produces.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub model: LpModel,
    pub solution: CapacitySolution,
    pub residuals: ScheduleResiduals,
}

/// Size the fleet, build the model and solve it with `backend`.
pub fn plan_capacity(
    inputs: &HourlyInputs,
    params: &PlanningParams,
    backend: &dyn LpBackend,
) -> Result<PlanOutcome, OptimizeError> {
    params.validate()?;
    let sizing = FleetSizing::from_inputs(inputs, &params.fleet)?;
    plan_capacity_with_sizing(inputs, &sizing, params, backend)
}

/// Build and solve the model for an already derived sizing.
pub fn plan_capacity_with_sizing(
    inputs: &HourlyInputs,
    sizing: &FleetSizing,
    params: &PlanningParams,
    backend: &dyn LpBackend,
) -> Result<PlanOutcome, OptimizeError> {
    let model = build_capacity_model(inputs, sizing, params)?;
    let outcome = backend.solve(&model)?;
    let solution = CapacitySolution::from_outcome(&model, sizing, params, backend.name(), outcome);
    let residuals = verify_solution(&model, &solution);

    info!(
        "Optimal capacities: solar {:.4} MW, wind {:.4} MW (objective {:.4})",
        solution.solar_capacity.value(),
        solution.wind_capacity.value(),
        solution.objective
    );

    Ok(PlanOutcome {
        model,
        solution,
        residuals,
    })
}
