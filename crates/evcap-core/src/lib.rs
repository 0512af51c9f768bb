//! # evcap-core: data model for EV-flexible capacity planning
//!
//! Provides the shared types for sizing renewable generation against an
//! aggregated, schedulable EV fleet:
//!
//! - [`HourRing`]: the cyclic hour index of the planning year
//! - [`HourlyInputs`]: validated capacity factors, fleet schedule and baseline demand
//! - [`Technology`]: buildable generation technologies
//! - [`units`]: MW / MWh / kW / kWh newtypes
//! - [`Diagnostics`]: non-fatal findings about the inputs
//! - [`EvcapError`]: the unified error type
//!
//! ## Quick Start
//!
//! ```rust
//! use evcap_core::*;
//!
//! let hours = 24;
//! let mut loss = vec![0.0; hours];
//! loss[18] = 0.2;
//!
//! let inputs = HourlyInputs::new(
//!     CapacityFactors::constant(hours, 0.25, 0.35),
//!     EvSchedule::new(vec![0.8; hours], vec![0.0; hours], loss),
//!     vec![1.5; hours],
//! )?;
//!
//! assert_eq!(inputs.ring().prev(0), hours - 1);
//! # Ok::<(), EvcapError>(())
//! ```

pub mod diagnostics;
pub mod error;
pub mod ring;
pub mod series;
pub mod tech;
pub mod units;

pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use error::{EvcapError, EvcapResult};
pub use ring::{HourRing, HOURS_PER_YEAR};
pub use series::{CapacityFactors, EvSchedule, HourlyInputs};
pub use tech::Technology;
pub use units::{KilowattHours, Kilowatts, MegawattHours, Megawatts};
