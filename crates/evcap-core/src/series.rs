//! Hourly input series for a planning run.
//!
//! Inputs are validated once on construction and are read-only afterwards.
//! Every series in a [`HourlyInputs`] has exactly [`HourRing::len`] entries.

use serde::{Deserialize, Serialize};

use crate::{EvcapError, EvcapResult, HourRing, MegawattHours, Technology};

/// Hourly solar and wind capacity factors, fractions of nameplate in [0,1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityFactors {
    pub solar: Vec<f64>,
    pub wind: Vec<f64>,
}

impl CapacityFactors {
    pub fn new(solar: Vec<f64>, wind: Vec<f64>) -> Self {
        Self { solar, wind }
    }

    /// Constant factors for every hour.
    pub fn constant(hours: usize, solar: f64, wind: f64) -> Self {
        Self {
            solar: vec![solar; hours],
            wind: vec![wind; hours],
        }
    }

    pub fn for_technology(&self, tech: Technology) -> &[f64] {
        match tech {
            Technology::Solar => &self.solar,
            Technology::Wind => &self.wind,
        }
    }
}

/// Hourly EV fleet schedule.
///
/// - `availability`: share of fleet charging power plugged in at the hour
/// - `soc_requirement`: minimum SOC as a fraction of fleet energy capacity
/// - `driving_loss`: SOC fraction drained by driving during the hour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvSchedule {
    pub availability: Vec<f64>,
    pub soc_requirement: Vec<f64>,
    pub driving_loss: Vec<f64>,
}

impl EvSchedule {
    pub fn new(availability: Vec<f64>, soc_requirement: Vec<f64>, driving_loss: Vec<f64>) -> Self {
        Self {
            availability,
            soc_requirement,
            driving_loss,
        }
    }

    pub fn len(&self) -> usize {
        self.availability.len()
    }

    pub fn is_empty(&self) -> bool {
        self.availability.is_empty()
    }

    /// Sum of driving-loss fractions over the horizon.
    pub fn total_driving_loss(&self) -> f64 {
        self.driving_loss.iter().sum()
    }
}

/// Validated bundle of every hourly series the optimizer consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyInputs {
    ring: HourRing,
    capacity_factors: CapacityFactors,
    schedule: EvSchedule,
    baseline_demand: Vec<f64>,
}

impl HourlyInputs {
    /// Validate and bundle the series.
    ///
    /// Fails when lengths differ, when the horizon is empty, when a fraction
    /// lies outside [0,1] or when a demand value is negative or non-finite.
    pub fn new(
        capacity_factors: CapacityFactors,
        schedule: EvSchedule,
        baseline_demand: Vec<f64>,
    ) -> EvcapResult<Self> {
        let ring = HourRing::new(baseline_demand.len())?;
        let n = ring.len();

        let fractions: [(&str, &[f64]); 5] = [
            ("solar", &capacity_factors.solar),
            ("wind", &capacity_factors.wind),
            ("EV_avail", &schedule.availability),
            ("SOC_req", &schedule.soc_requirement),
            ("driving_loss", &schedule.driving_loss),
        ];
        for (name, values) in fractions {
            if values.len() != n {
                return Err(EvcapError::Data(format!(
                    "series '{}' has {} hours, expected {}",
                    name,
                    values.len(),
                    n
                )));
            }
            check_fraction_series(name, values)?;
        }

        if let Some((t, v)) = baseline_demand
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(EvcapError::Data(format!(
                "baseline demand must be finite and non-negative; hour {} has {}",
                t, v
            )));
        }

        Ok(Self {
            ring,
            capacity_factors,
            schedule,
            baseline_demand,
        })
    }

    pub fn ring(&self) -> HourRing {
        self.ring
    }

    pub fn hours(&self) -> usize {
        self.ring.len()
    }

    pub fn capacity_factors(&self) -> &CapacityFactors {
        &self.capacity_factors
    }

    pub fn schedule(&self) -> &EvSchedule {
        &self.schedule
    }

    /// Uncontrolled EV energy draw per hour (MWh).
    pub fn baseline_demand(&self) -> &[f64] {
        &self.baseline_demand
    }

    pub fn annual_baseline_energy(&self) -> MegawattHours {
        MegawattHours(self.baseline_demand.iter().sum())
    }
}

fn check_fraction_series(name: &str, values: &[f64]) -> EvcapResult<()> {
    match values
        .iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite() || **v < 0.0 || **v > 1.0)
    {
        Some((t, v)) => Err(EvcapError::Data(format!(
            "series '{}' must lie in [0,1]; hour {} has {}",
            name, t, v
        ))),
        None => Ok(()),
    }
}
