//! End-to-end solves on short horizons

use evcap_algo::{
    plan_capacity, ConstraintFamily, GoodLpBackend, LpBackend, LpModel, LpOutcome, LpSolverKind,
    OptimizeError, PlanningParams, SizingError, SolverSettings,
};
use evcap_core::{CapacityFactors, EvSchedule, HourlyInputs, Technology};

const TOL: f64 = 1e-3;

/// Flat supply, full availability, one driving hour.
fn scenario_a(hours: usize) -> HourlyInputs {
    let mut loss = vec![0.0; hours];
    loss[12] = 0.5;
    HourlyInputs::new(
        CapacityFactors::constant(hours, 1.0, 1.0),
        EvSchedule::new(vec![1.0; hours], vec![0.0; hours], loss),
        vec![10.0; hours],
    )
    .expect("valid inputs")
}

/// Commuter pattern with a solar bell and wind cycling over three days.
fn daily_pattern(days: usize) -> HourlyInputs {
    let hours = days * 24;
    let mut solar = Vec::with_capacity(hours);
    let mut wind = Vec::with_capacity(hours);
    let mut avail = Vec::with_capacity(hours);
    let mut floor = Vec::with_capacity(hours);
    let mut loss = Vec::with_capacity(hours);
    let mut baseline = Vec::with_capacity(hours);

    for t in 0..hours {
        let h = t % 24;
        let day = ((t / 24) % 3) as f64;
        solar.push(if (6..18).contains(&h) {
            ((h as f64 - 6.0) * std::f64::consts::PI / 12.0).sin() * 0.9
        } else {
            0.0
        });
        wind.push(0.25 + 0.05 * day);
        avail.push(if (8..18).contains(&h) { 0.4 } else { 0.8 });
        floor.push(if h == 8 { 0.8 } else { 0.0 });
        loss.push(if h == 9 || h == 18 { 0.2 } else { 0.0 });
        baseline.push(if (17..22).contains(&h) { 4.0 } else { 1.0 });
    }

    HourlyInputs::new(
        CapacityFactors::new(solar, wind),
        EvSchedule::new(avail, floor, loss),
        baseline,
    )
    .expect("valid inputs")
}

#[test]
fn test_flat_supply_builds_cheapest_technology_only() {
    let inputs = scenario_a(24);
    let plan = plan_capacity(&inputs, &PlanningParams::default(), &GoodLpBackend::default())
        .expect("scenario should solve");
    let solution = &plan.solution;

    assert!(solution.status.is_optimal());
    assert!(
        (solution.capacity(Technology::Solar).value() - 10.0).abs() < TOL,
        "solar should match flat demand, got {}",
        solution.solar_capacity
    );
    assert!(solution.capacity(Technology::Wind).value() < TOL);
    assert!(solution.curtailment.iter().sum::<f64>() < TOL);
    for (t, c) in solution.ev_charge.iter().enumerate() {
        assert!((c - 10.0).abs() < TOL, "hour {} charges {}", t, c);
    }
    assert!((solution.objective - 8.0).abs() < TOL);
    assert!(plan.residuals.within(1e-4), "{:?}", plan.residuals);

    // Charging adds 0.95 * 10 each hour; the driving hour drains half the fleet
    let e_cap = solution.sizing.energy_cap.value();
    let ring = inputs.ring();
    for t in ring.hours() {
        let step = solution.ev_soc[t] - solution.ev_soc[ring.prev(t)];
        let expected = if t == 12 { 0.95 * 10.0 - 0.5 * e_cap } else { 0.95 * 10.0 };
        assert!(
            (step - expected).abs() < TOL,
            "SOC step at hour {} is {}, expected {}",
            t,
            step,
            expected
        );
    }
}

#[test]
fn test_zero_availability_is_fatal() {
    let hours = 24;
    let mut loss = vec![0.0; hours];
    loss[12] = 0.5;
    let inputs = HourlyInputs::new(
        CapacityFactors::constant(hours, 1.0, 1.0),
        EvSchedule::new(vec![0.0; hours], vec![0.0; hours], loss),
        vec![10.0; hours],
    )
    .unwrap();

    let err = plan_capacity(&inputs, &PlanningParams::default(), &GoodLpBackend::default())
        .unwrap_err();
    assert!(
        matches!(err, OptimizeError::Infeasible(_) | OptimizeError::SolverFailed(_)),
        "unexpected error {:?}",
        err
    );
}

#[test]
fn test_unreachable_floor_is_fatal() {
    let hours = 24;
    let mut loss = vec![0.0; hours];
    let mut floor = vec![0.0; hours];
    loss[12] = 0.9;
    floor[12] = 1.0;
    let inputs = HourlyInputs::new(
        CapacityFactors::constant(hours, 1.0, 1.0),
        EvSchedule::new(vec![1.0; hours], floor, loss),
        vec![10.0; hours],
    )
    .unwrap();

    let err = plan_capacity(&inputs, &PlanningParams::default(), &GoodLpBackend::default())
        .unwrap_err();
    assert!(err.is_solve_failure(), "unexpected error {:?}", err);
}

#[test]
fn test_zero_driving_loss_fails_before_solve() {
    let hours = 24;
    let inputs = HourlyInputs::new(
        CapacityFactors::constant(hours, 1.0, 1.0),
        EvSchedule::new(vec![1.0; hours], vec![0.0; hours], vec![0.0; hours]),
        vec![10.0; hours],
    )
    .unwrap();

    let err = plan_capacity(&inputs, &PlanningParams::default(), &PanicBackend).unwrap_err();
    assert_eq!(
        err,
        OptimizeError::Sizing(SizingError::NoDrivingLoss { total: 0.0 })
    );
}

#[test]
fn test_repeated_solves_agree() {
    let inputs = scenario_a(24);
    let backend = GoodLpBackend::default();
    let first = plan_capacity(&inputs, &PlanningParams::default(), &backend).unwrap();
    let second = plan_capacity(&inputs, &PlanningParams::default(), &backend).unwrap();
    assert!((first.solution.objective - second.solution.objective).abs() < 1e-9);
}

#[test]
fn test_daily_pattern_schedule_properties() {
    let inputs = daily_pattern(3);
    let params = PlanningParams::default();
    let plan = plan_capacity(&inputs, &params, &GoodLpBackend::default())
        .expect("daily pattern should solve");
    let s = &plan.solution;
    let n = inputs.hours();
    let e_cap = s.sizing.energy_cap.value();
    let p_cap = s.sizing.power_cap.value();
    let cf = inputs.capacity_factors();
    let sched = inputs.schedule();
    let eta = params.fleet.charge_efficiency;

    assert!(s.solar_capacity.value() >= 0.0 && s.wind_capacity.value() >= 0.0);

    let total_charge: f64 = s.ev_charge.iter().sum();
    let total_baseline = inputs.annual_baseline_energy().value();
    assert!((total_charge - total_baseline).abs() < TOL * total_baseline);

    for t in 0..n {
        let supply = cf.solar[t] * s.solar_capacity.value() + cf.wind[t] * s.wind_capacity.value();
        assert!(
            (supply - s.ev_charge[t] - s.curtailment[t]).abs() < TOL,
            "power balance at hour {}",
            t
        );
        assert!(s.ev_soc[t] <= e_cap * (1.0 + 1e-6), "ceiling at hour {}", t);
        assert!(
            s.ev_soc[t] >= sched.soc_requirement[t] * e_cap - TOL,
            "floor at hour {}",
            t
        );
        assert!(
            s.ev_charge[t] <= sched.availability[t] * p_cap + TOL,
            "availability at hour {}",
            t
        );
    }

    // Hour 0 continues from the last hour of the ring
    let wrap = s.ev_soc[n - 1] + eta * s.ev_charge[0] - sched.driving_loss[0] * e_cap;
    assert!((s.ev_soc[0] - wrap).abs() < TOL * e_cap.max(1.0));

    assert!(plan.residuals.within(1e-4), "{:?}", plan.residuals);
    assert!(plan.residuals.get(ConstraintFamily::SocDynamics) < 1e-4);

    let summary = s.annual_summary(&inputs);
    assert!((summary.driving_energy.value() - eta * total_baseline).abs() < 1e-6 * total_baseline);
}

#[test]
fn test_clarabel_time_limit_is_enforced() {
    let inputs = daily_pattern(365);
    let backend = GoodLpBackend::new(SolverSettings {
        backend: LpSolverKind::Clarabel,
        time_limit_seconds: Some(1e-9),
        verbose: false,
    });

    let err = plan_capacity(&inputs, &PlanningParams::default(), &backend).unwrap_err();
    assert!(
        matches!(err, OptimizeError::SolverFailed(_)),
        "unexpected error {:?}",
        err
    );
}

/// Backend that must never be reached.
struct PanicBackend;

impl LpBackend for PanicBackend {
    fn name(&self) -> &'static str {
        "panic"
    }

    fn solve(&self, _model: &LpModel) -> Result<LpOutcome, OptimizeError> {
        panic!("solver should not run when sizing fails");
    }
}

/// Backend that reports infeasibility without solving.
struct InfeasibleBackend;

impl LpBackend for InfeasibleBackend {
    fn name(&self) -> &'static str {
        "infeasible"
    }

    fn solve(&self, model: &LpModel) -> Result<LpOutcome, OptimizeError> {
        Err(OptimizeError::Infeasible(format!("{} rows", model.num_rows())))
    }
}

#[test]
fn test_backend_errors_propagate() {
    let inputs = scenario_a(24);
    let err = plan_capacity(&inputs, &PlanningParams::default(), &InfeasibleBackend).unwrap_err();
    assert_eq!(err, OptimizeError::Infeasible("121 rows".to_string()));
}
