//! LP backends for the capacity model.
//!
//! [`LpBackend`] is the seam between the pure-data [`LpModel`] and a concrete
//! solver. [`GoodLpBackend`] translates the model into `good_lp` variables
//! and constraints and dispatches on [`LpSolverKind`]; Clarabel is always
//! available, HiGHS behind the `solver-highs` feature.

use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::anyhow;
#[cfg(feature = "solver-clarabel")]
use good_lp::solvers::clarabel::clarabel as clarabel_solver;
#[cfg(feature = "solver-highs")]
use good_lp::solvers::highs::highs as highs_solver;
use good_lp::solvers::SolutionStatus;
use good_lp::{
    constraint, variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel,
    Variable,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::OptimizeError;
use crate::model::{LpModel, RowSense};

/// Which LP solver `good_lp` should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LpSolverKind {
    #[default]
    Clarabel,
    #[cfg(feature = "solver-highs")]
    Highs,
}

impl LpSolverKind {
    pub fn available() -> &'static [&'static str] {
        AVAILABLE_LP_SOLVERS
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LpSolverKind::Clarabel => "clarabel",
            #[cfg(feature = "solver-highs")]
            LpSolverKind::Highs => "highs",
        }
    }
}

impl std::fmt::Display for LpSolverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const AVAILABLE_LP_SOLVERS: &[&str] = &[
    "clarabel",
    #[cfg(feature = "solver-highs")]
    "highs",
];

fn unknown_solver_error(label: &str) -> anyhow::Error {
    anyhow!(
        "unknown lp solver '{}'; supported values: {}",
        label,
        LpSolverKind::available().join(", ")
    )
}

impl FromStr for LpSolverKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "clarabel" => Ok(LpSolverKind::Clarabel),
            "highs" => {
                #[cfg(feature = "solver-highs")]
                {
                    Ok(LpSolverKind::Highs)
                }
                #[cfg(not(feature = "solver-highs"))]
                {
                    Err(unknown_solver_error(&normalized))
                }
            }
            other => Err(unknown_solver_error(other)),
        }
    }
}

/// Termination status of a successful solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    Optimal,
    /// Feasible point returned when the time limit was hit
    TimeLimit,
    /// Feasible point within the configured gap
    GapLimit,
}

impl SolveStatus {
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveStatus::Optimal)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::TimeLimit => "time_limit",
            SolveStatus::GapLimit => "gap_limit",
        }
    }
}

impl From<SolutionStatus> for SolveStatus {
    fn from(status: SolutionStatus) -> Self {
        match status {
            SolutionStatus::Optimal => SolveStatus::Optimal,
            SolutionStatus::TimeLimit => SolveStatus::TimeLimit,
            SolutionStatus::GapLimit => SolveStatus::GapLimit,
        }
    }
}

/// Raw result of a backend solve: one value per model column.
#[derive(Debug, Clone, PartialEq)]
pub struct LpOutcome {
    pub values: Vec<f64>,
    pub objective: f64,
    pub status: SolveStatus,
    pub solve_time: Duration,
}

/// Anything that can solve an [`LpModel`].
pub trait LpBackend {
    fn name(&self) -> &'static str;

    fn solve(&self, model: &LpModel) -> Result<LpOutcome, OptimizeError>;
}

/// Solver options.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SolverSettings {
    pub backend: LpSolverKind,
    /// Wall-clock limit; hitting it without a usable point is a solver failure
    pub time_limit_seconds: Option<f64>,
    pub verbose: bool,
}

/// [`LpBackend`] built on `good_lp`.
#[derive(Debug, Clone, Default)]
pub struct GoodLpBackend {
    settings: SolverSettings,
}

impl GoodLpBackend {
    pub fn new(settings: SolverSettings) -> Self {
        Self { settings }
    }

    pub fn with_kind(kind: LpSolverKind) -> Self {
        Self::new(SolverSettings {
            backend: kind,
            ..SolverSettings::default()
        })
    }

    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }
}

impl LpBackend for GoodLpBackend {
    fn name(&self) -> &'static str {
        self.settings.backend.as_str()
    }

    fn solve(&self, model: &LpModel) -> Result<LpOutcome, OptimizeError> {
        let start = Instant::now();

        let mut vars = ProblemVariables::new();
        let columns: Vec<Variable> = (0..model.num_columns())
            .map(|_| vars.add(variable().min(0.0)))
            .collect();

        let mut objective = Expression::from(0.0);
        for (col, &coef) in model.objective.iter().enumerate() {
            if coef != 0.0 {
                objective += coef * columns[col];
            }
        }

        let unsolved = vars.minimise(objective);
        let (values, status) = match self.settings.backend {
            LpSolverKind::Clarabel => {
                #[cfg(feature = "solver-clarabel")]
                {
                    let mut problem = unsolved.using(clarabel_solver);
                    problem.settings().verbose(self.settings.verbose);
                    if let Some(limit) = self.settings.time_limit_seconds {
                        problem.settings().time_limit(limit);
                    }
                    let problem = add_model_rows(problem, model, &columns);
                    extract(problem.solve(), &columns)?
                }
                #[cfg(not(feature = "solver-clarabel"))]
                {
                    drop(unsolved);
                    return Err(OptimizeError::SolverFailed(
                        "clarabel support was not compiled in".to_string(),
                    ));
                }
            }
            #[cfg(feature = "solver-highs")]
            LpSolverKind::Highs => {
                let mut problem = unsolved
                    .using(highs_solver)
                    .set_verbose(self.settings.verbose);
                if let Some(limit) = self.settings.time_limit_seconds {
                    problem = problem.set_time_limit(limit);
                }
                let problem = add_model_rows(problem, model, &columns);
                extract(problem.solve(), &columns)?
            }
        };

        let objective = model.objective_value(&values);
        let solve_time = start.elapsed();

        if !status.is_optimal() {
            warn!(
                "{} stopped with status {}; accepting the feasible point (objective {:.6})",
                self.name(),
                status.as_str(),
                objective
            );
        }
        info!(
            "{} solve finished in {:.2?}: status {}, objective {:.6}",
            self.name(),
            solve_time,
            status.as_str(),
            objective
        );

        Ok(LpOutcome {
            values,
            objective,
            status,
            solve_time,
        })
    }
}

fn add_model_rows<M>(mut problem: M, model: &LpModel, columns: &[Variable]) -> M
where
    M: SolverModel,
{
    for row in &model.rows {
        let mut lhs = Expression::from(0.0);
        for &(col, coef) in &row.terms {
            lhs += coef * columns[col];
        }
        let rhs = row.rhs;
        problem = match row.sense {
            RowSense::Eq => problem.with(constraint!(lhs == rhs)),
            RowSense::Le => problem.with(constraint!(lhs <= rhs)),
            RowSense::Ge => problem.with(constraint!(lhs >= rhs)),
        };
    }
    problem
}

fn extract<S: Solution>(
    result: Result<S, ResolutionError>,
    columns: &[Variable],
) -> Result<(Vec<f64>, SolveStatus), OptimizeError> {
    let solution = result.map_err(map_resolution_error)?;
    let status = SolveStatus::from(solution.status());
    let values = columns.iter().map(|v| solution.value(*v)).collect();
    Ok((values, status))
}

fn map_resolution_error(err: ResolutionError) -> OptimizeError {
    match err {
        ResolutionError::Infeasible => {
            OptimizeError::Infeasible("solver reported primal infeasibility".to_string())
        }
        ResolutionError::Unbounded => {
            OptimizeError::Unbounded("solver reported an unbounded objective".to_string())
        }
        other => OptimizeError::SolverFailed(other.to_string()),
    }
}
