//! Capacity/charging LP in solver-independent form.
//!
//! The model is plain data: a column layout, a dense objective and a list of
//! sparse rows. It carries no solver handles, so it can be inspected, checked
//! against a candidate solution, or handed to any [`crate::LpBackend`].
//!
//! # Columns
//!
//! ```text
//! [ solar | wind | charge[0..N] | curtailment[0..N] | soc[0..N] ]
//! ```
//!
//! Every column is continuous with lower bound 0 and no upper bound.
//!
//! # Rows
//!
//! | Family | Per hour | Form |
//! |--------|----------|------|
//! | PowerBalance | yes | `cf_s·S + cf_w·W - c[t] - k[t] = 0` |
//! | AnnualEnergyParity | no | `Σ c[t] = Σ baseline[t]` |
//! | SocCeiling | yes | `soc[t] ≤ E` |
//! | SocFloor | yes | `soc[t] ≥ req[t]·E` |
//! | AvailabilityCap | yes | `c[t] ≤ avail[t]·P` |
//! | SocDynamics | yes | `soc[t] - soc[prev(t)] - η·c[t] = -loss[t]·E` |

use evcap_core::{HourRing, HourlyInputs, Technology};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::OptimizeError;
use crate::params::PlanningParams;
use crate::sizing::FleetSizing;

/// Constraint families of the capacity model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintFamily {
    PowerBalance,
    AnnualEnergyParity,
    SocCeiling,
    SocFloor,
    AvailabilityCap,
    SocDynamics,
}

impl ConstraintFamily {
    pub const ALL: [ConstraintFamily; 6] = [
        ConstraintFamily::PowerBalance,
        ConstraintFamily::AnnualEnergyParity,
        ConstraintFamily::SocCeiling,
        ConstraintFamily::SocFloor,
        ConstraintFamily::AvailabilityCap,
        ConstraintFamily::SocDynamics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintFamily::PowerBalance => "power_balance",
            ConstraintFamily::AnnualEnergyParity => "annual_energy_parity",
            ConstraintFamily::SocCeiling => "soc_ceiling",
            ConstraintFamily::SocFloor => "soc_floor",
            ConstraintFamily::AvailabilityCap => "availability_cap",
            ConstraintFamily::SocDynamics => "soc_dynamics",
        }
    }
}

impl std::fmt::Display for ConstraintFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowSense {
    Eq,
    Le,
    Ge,
}

/// One sparse linear constraint `Σ coef·x[col] (sense) rhs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LpRow {
    pub family: ConstraintFamily,
    /// Hour the row belongs to; `None` for horizon-wide rows
    pub hour: Option<usize>,
    pub terms: Vec<(usize, f64)>,
    pub sense: RowSense,
    pub rhs: f64,
}

impl LpRow {
    fn new(family: ConstraintFamily, hour: Option<usize>, sense: RowSense, rhs: f64) -> Self {
        Self {
            family,
            hour,
            terms: Vec::new(),
            sense,
            rhs,
        }
    }

    /// Add `coef·x[col]`, merging with an existing term on the same column.
    fn push(&mut self, col: usize, coef: f64) {
        match self.terms.iter_mut().find(|(c, _)| *c == col) {
            Some((_, existing)) => *existing += coef,
            None => self.terms.push((col, coef)),
        }
    }

    fn with_term(mut self, col: usize, coef: f64) -> Self {
        self.push(col, coef);
        self
    }

    /// Left-hand side evaluated at `x`.
    pub fn activity(&self, x: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(col, coef)| coef * x.get(col).copied().unwrap_or(0.0))
            .sum()
    }

    /// Amount by which `x` violates the row (0 when satisfied).
    pub fn violation(&self, x: &[f64]) -> f64 {
        let lhs = self.activity(x);
        match self.sense {
            RowSense::Eq => (lhs - self.rhs).abs(),
            RowSense::Le => (lhs - self.rhs).max(0.0),
            RowSense::Ge => (self.rhs - lhs).max(0.0),
        }
    }

    /// Magnitude used to turn an absolute violation into a relative one.
    pub fn scale(&self, x: &[f64]) -> f64 {
        let term_scale = self
            .terms
            .iter()
            .map(|&(col, coef)| (coef * x.get(col).copied().unwrap_or(0.0)).abs())
            .fold(0.0, f64::max);
        1.0f64.max(self.rhs.abs()).max(term_scale)
    }
}

/// Column indices for a horizon of `hours`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    hours: usize,
}

impl ColumnLayout {
    pub fn new(hours: usize) -> Self {
        Self { hours }
    }

    pub fn hours(&self) -> usize {
        self.hours
    }

    pub fn capacity(&self, tech: Technology) -> usize {
        match tech {
            Technology::Solar => 0,
            Technology::Wind => 1,
        }
    }

    #[inline]
    pub fn charge(&self, t: usize) -> usize {
        2 + t
    }

    #[inline]
    pub fn curtailment(&self, t: usize) -> usize {
        2 + self.hours + t
    }

    #[inline]
    pub fn soc(&self, t: usize) -> usize {
        2 + 2 * self.hours + t
    }

    pub fn len(&self) -> usize {
        2 + 3 * self.hours
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Human-readable column name, e.g. `charge[17]`.
    pub fn name(&self, col: usize) -> String {
        let n = self.hours;
        match col {
            0 => "solar".to_string(),
            1 => "wind".to_string(),
            c if c < 2 + n => format!("charge[{}]", c - 2),
            c if c < 2 + 2 * n => format!("curtailment[{}]", c - 2 - n),
            c => format!("soc[{}]", c - 2 - 2 * n),
        }
    }
}

/// The full capacity/charging LP: minimise `objective·x` subject to `rows`,
/// `x ≥ 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LpModel {
    pub ring: HourRing,
    pub layout: ColumnLayout,
    pub objective: Vec<f64>,
    pub rows: Vec<LpRow>,
}

impl LpModel {
    pub fn num_columns(&self) -> usize {
        self.layout.len()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn rows_of(&self, family: ConstraintFamily) -> impl Iterator<Item = &LpRow> {
        self.rows.iter().filter(move |r| r.family == family)
    }

    pub fn objective_value(&self, x: &[f64]) -> f64 {
        self.objective
            .iter()
            .zip(x)
            .map(|(c, v)| c * v)
            .sum()
    }

    fn check_finite(&self) -> Result<(), OptimizeError> {
        if let Some(col) = self.objective.iter().position(|c| !c.is_finite()) {
            return Err(OptimizeError::InvalidModel(format!(
                "objective coefficient of {} is not finite",
                self.layout.name(col)
            )));
        }
        for row in &self.rows {
            let finite = row.rhs.is_finite() && row.terms.iter().all(|(_, c)| c.is_finite());
            if !finite {
                return Err(OptimizeError::InvalidModel(format!(
                    "{} row at hour {:?} has a non-finite coefficient",
                    row.family, row.hour
                )));
            }
        }
        Ok(())
    }
}

/// Build the capacity/charging LP for one planning run.
pub fn build_capacity_model(
    inputs: &HourlyInputs,
    sizing: &FleetSizing,
    params: &PlanningParams,
) -> Result<LpModel, OptimizeError> {
    params.validate()?;

    let ring = inputs.ring();
    let n = ring.len();
    let layout = ColumnLayout::new(n);
    let cf = inputs.capacity_factors();
    let schedule = inputs.schedule();
    let e_cap = sizing.energy_cap.value();
    let p_cap = sizing.power_cap.value();
    let eta = params.fleet.charge_efficiency;

    let mut objective = vec![0.0; layout.len()];
    for tech in Technology::ALL {
        objective[layout.capacity(tech)] = params.costs.unit_cost(tech);
    }
    for t in ring.hours() {
        objective[layout.curtailment(t)] = params.costs.curtailment_per_mwh;
    }

    let mut rows = Vec::with_capacity(5 * n + 1);

    for t in ring.hours() {
        let balance = LpRow::new(ConstraintFamily::PowerBalance, Some(t), RowSense::Eq, 0.0)
            .with_term(layout.capacity(Technology::Solar), cf.solar[t])
            .with_term(layout.capacity(Technology::Wind), cf.wind[t])
            .with_term(layout.charge(t), -1.0)
            .with_term(layout.curtailment(t), -1.0);
        rows.push(balance);
    }

    let mut parity = LpRow::new(
        ConstraintFamily::AnnualEnergyParity,
        None,
        RowSense::Eq,
        inputs.annual_baseline_energy().value(),
    );
    // Distinct columns, so no merging needed
    parity.terms = ring.hours().map(|t| (layout.charge(t), 1.0)).collect();
    rows.push(parity);

    for t in ring.hours() {
        rows.push(
            LpRow::new(ConstraintFamily::SocCeiling, Some(t), RowSense::Le, e_cap)
                .with_term(layout.soc(t), 1.0),
        );
        rows.push(
            LpRow::new(
                ConstraintFamily::SocFloor,
                Some(t),
                RowSense::Ge,
                schedule.soc_requirement[t] * e_cap,
            )
            .with_term(layout.soc(t), 1.0),
        );
        rows.push(
            LpRow::new(
                ConstraintFamily::AvailabilityCap,
                Some(t),
                RowSense::Le,
                schedule.availability[t] * p_cap,
            )
            .with_term(layout.charge(t), 1.0),
        );
    }

    for t in ring.hours() {
        let dynamics = LpRow::new(
            ConstraintFamily::SocDynamics,
            Some(t),
            RowSense::Eq,
            -schedule.driving_loss[t] * e_cap,
        )
        .with_term(layout.soc(t), 1.0)
        .with_term(layout.soc(ring.prev(t)), -1.0)
        .with_term(layout.charge(t), -eta);
        rows.push(dynamics);
    }

    let model = LpModel {
        ring,
        layout,
        objective,
        rows,
    };
    model.check_finite()?;

    for family in ConstraintFamily::ALL {
        debug!("{}: {} rows", family, model.rows_of(family).count());
    }
    info!(
        "Built capacity model: {} hours, {} columns, {} rows",
        n,
        model.num_columns(),
        model.num_rows()
    );

    Ok(model)
}
