//! Unit newtypes for fleet and generation quantities.
//!
//! Sizing mixes per-vehicle kilowatt figures with fleet-level megawatt
//! figures, and power with energy. Wrapping them keeps `ev_power_cap` from
//! being passed where `ev_energy_cap` is expected.
//!
//! ```
//! use evcap_core::units::{KilowattHours, Kilowatts, MegawattHours, Megawatts};
//!
//! let c_rate = Kilowatts(7.5) / KilowattHours(60.0);
//! assert_eq!(MegawattHours(100.0).at_c_rate(c_rate), Megawatts(12.5));
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

macro_rules! unit_type {
    ($(#[$meta:meta])* $name:ident, $symbol:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
        #[repr(transparent)]
        pub struct $name(pub f64);

        impl $name {
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }
        }

        impl Add for $name {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $name {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self {
                Self(self.0 * rhs)
            }
        }

        impl Mul<$name> for f64 {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                $name(self * rhs.0)
            }
        }

        impl Div<f64> for $name {
            type Output = Self;
            fn div(self, rhs: f64) -> Self {
                Self(self.0 / rhs)
            }
        }

        /// Ratio of two like quantities.
        impl Div for $name {
            type Output = f64;
            fn div(self, rhs: Self) -> f64 {
                self.0 / rhs.0
            }
        }

        impl std::iter::Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|x| x.0).sum())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:.4} {}", self.0, $symbol)
            }
        }
    };
}

unit_type!(
    /// Fleet charging power and installed capacity.
    Megawatts,
    "MW"
);
unit_type!(
    /// Per-vehicle charger rating.
    Kilowatts,
    "kW"
);
unit_type!(
    /// Fleet battery energy and horizon totals.
    MegawattHours,
    "MWh"
);
unit_type!(
    /// Per-vehicle battery size.
    KilowattHours,
    "kWh"
);

/// Power over energy gives a C-rate in 1/h.
impl Div<KilowattHours> for Kilowatts {
    type Output = f64;
    fn div(self, rhs: KilowattHours) -> f64 {
        self.0 / rhs.0
    }
}

impl MegawattHours {
    #[inline]
    pub fn to_kilowatt_hours(self) -> KilowattHours {
        KilowattHours(self.0 * 1000.0)
    }

    /// Power that moves this energy at `c_rate` (1/h).
    #[inline]
    pub fn at_c_rate(self, c_rate: f64) -> Megawatts {
        Megawatts(self.0 * c_rate)
    }
}
