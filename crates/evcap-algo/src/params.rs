//! Cost and fleet constants for a planning run.
//!
//! Both structs deserialize straight from the `[costs]` and `[fleet]` tables
//! of the CLI configuration file; every field has a default.

use evcap_core::{KilowattHours, Kilowatts, Technology};
use serde::{Deserialize, Serialize};

use crate::sizing::SizingError;

/// Capital costs and the curtailment penalty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostParams {
    /// Solar capital cost ($/MW)
    #[serde(default = "default_solar_cost")]
    pub solar_per_mw: f64,
    /// Wind capital cost ($/MW)
    #[serde(default = "default_wind_cost")]
    pub wind_per_mw: f64,
    /// Penalty on discarded renewable output ($/MWh)
    #[serde(default = "default_curtailment_cost")]
    pub curtailment_per_mwh: f64,
}

impl Default for CostParams {
    fn default() -> Self {
        Self {
            solar_per_mw: default_solar_cost(),
            wind_per_mw: default_wind_cost(),
            curtailment_per_mwh: default_curtailment_cost(),
        }
    }
}

fn default_solar_cost() -> f64 {
    0.8
}

fn default_wind_cost() -> f64 {
    1.0
}

fn default_curtailment_cost() -> f64 {
    0.1
}

impl CostParams {
    pub fn unit_cost(&self, tech: Technology) -> f64 {
        match tech {
            Technology::Solar => self.solar_per_mw,
            Technology::Wind => self.wind_per_mw,
        }
    }

    pub fn validate(&self) -> Result<(), SizingError> {
        for (name, value) in [
            ("solar_per_mw", self.solar_per_mw),
            ("wind_per_mw", self.wind_per_mw),
            ("curtailment_per_mwh", self.curtailment_per_mwh),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SizingError::InvalidParameter(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Per-vehicle constants that fix the fleet's power/energy relationship.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FleetParams {
    /// Fraction of grid energy that reaches the battery when charging
    #[serde(default = "default_charge_efficiency")]
    pub charge_efficiency: f64,
    /// Rated charging power of one vehicle (kW)
    #[serde(default = "default_per_vehicle_power_kw")]
    pub per_vehicle_power_kw: f64,
    /// Nameplate battery capacity of one vehicle (kWh)
    #[serde(default = "default_battery_capacity_kwh")]
    pub battery_capacity_kwh: f64,
    /// Share of the battery kept in reserve and never used
    #[serde(default = "default_min_battery_fraction")]
    pub min_battery_fraction: f64,
}

impl Default for FleetParams {
    fn default() -> Self {
        Self {
            charge_efficiency: default_charge_efficiency(),
            per_vehicle_power_kw: default_per_vehicle_power_kw(),
            battery_capacity_kwh: default_battery_capacity_kwh(),
            min_battery_fraction: default_min_battery_fraction(),
        }
    }
}

fn default_charge_efficiency() -> f64 {
    0.95
}

fn default_per_vehicle_power_kw() -> f64 {
    7.2
}

fn default_battery_capacity_kwh() -> f64 {
    75.0
}

fn default_min_battery_fraction() -> f64 {
    0.20
}

impl FleetParams {
    pub fn per_vehicle_power(&self) -> Kilowatts {
        Kilowatts(self.per_vehicle_power_kw)
    }

    /// Usable energy of one vehicle: capacity above the reserve floor.
    pub fn usable_per_vehicle(&self) -> KilowattHours {
        KilowattHours(self.battery_capacity_kwh * (1.0 - self.min_battery_fraction))
    }

    /// Rated power over usable energy (1/h).
    pub fn c_rate(&self) -> f64 {
        self.per_vehicle_power() / self.usable_per_vehicle()
    }

    pub fn validate(&self) -> Result<(), SizingError> {
        if !(self.charge_efficiency > 0.0 && self.charge_efficiency <= 1.0) {
            return Err(SizingError::InvalidParameter(format!(
                "charge_efficiency must lie in (0, 1], got {}",
                self.charge_efficiency
            )));
        }
        if !(self.per_vehicle_power_kw.is_finite() && self.per_vehicle_power_kw > 0.0) {
            return Err(SizingError::InvalidParameter(format!(
                "per_vehicle_power_kw must be positive, got {}",
                self.per_vehicle_power_kw
            )));
        }
        if !(self.battery_capacity_kwh.is_finite() && self.battery_capacity_kwh > 0.0) {
            return Err(SizingError::InvalidParameter(format!(
                "battery_capacity_kwh must be positive, got {}",
                self.battery_capacity_kwh
            )));
        }
        if !(0.0..1.0).contains(&self.min_battery_fraction) {
            return Err(SizingError::InvalidParameter(format!(
                "min_battery_fraction must lie in [0, 1), got {}",
                self.min_battery_fraction
            )));
        }
        Ok(())
    }
}

/// Everything the optimizer needs besides the hourly series.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanningParams {
    #[serde(default)]
    pub costs: CostParams,
    #[serde(default)]
    pub fleet: FleetParams,
}

impl PlanningParams {
    pub fn validate(&self) -> Result<(), SizingError> {
        self.costs.validate()?;
        self.fleet.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fleet_c_rate() {
        let fleet = FleetParams::default();
        // 7.2 kW over 75 kWh * 0.8 = 60 kWh usable
        assert!((fleet.usable_per_vehicle().value() - 60.0).abs() < 1e-12);
        assert!((fleet.c_rate() - 0.12).abs() < 1e-12);
    }

    #[test]
    fn test_unit_costs() {
        let costs = CostParams::default();
        assert_eq!(costs.unit_cost(Technology::Solar), 0.8);
        assert_eq!(costs.unit_cost(Technology::Wind), 1.0);
    }

    #[test]
    fn test_invalid_efficiency_rejected() {
        let fleet = FleetParams {
            charge_efficiency: 1.2,
            ..FleetParams::default()
        };
        assert!(fleet.validate().is_err());
    }

    #[test]
    fn test_full_reserve_rejected() {
        let fleet = FleetParams {
            min_battery_fraction: 1.0,
            ..FleetParams::default()
        };
        assert!(fleet.validate().is_err());
    }

    #[test]
    fn test_negative_cost_rejected() {
        let costs = CostParams {
            curtailment_per_mwh: -0.1,
            ..CostParams::default()
        };
        let err = costs.validate().unwrap_err();
        assert!(err.to_string().contains("curtailment_per_mwh"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let params: PlanningParams = serde_json::from_str(r#"{"costs": {"wind_per_mw": 2.5}}"#).unwrap();
        assert_eq!(params.costs.wind_per_mw, 2.5);
        assert_eq!(params.costs.solar_per_mw, 0.8);
        assert_eq!(params.fleet, FleetParams::default());
    }
}
