//! Pre-solve screening of planning inputs.
//!
//! Flags schedule patterns that make the LP infeasible or degenerate without
//! changing anything. The only hard check is local: from a full battery, one
//! hour of full-availability charging must be able to cover that hour's loss
//! and still meet its floor.

use evcap_core::{Diagnostics, HourlyInputs, Technology};
use tracing::warn;

use crate::params::FleetParams;

/// Screen `inputs` for obviously unreachable floors and degenerate series.
pub fn diagnose_inputs(inputs: &HourlyInputs, fleet: &FleetParams) -> Diagnostics {
    let mut diag = Diagnostics::new();
    let ring = inputs.ring();
    let schedule = inputs.schedule();
    let eta = fleet.charge_efficiency;
    let c_rate = fleet.c_rate();

    for t in ring.hours() {
        let avail = schedule.availability[t];
        let floor = schedule.soc_requirement[t];
        let loss = schedule.driving_loss[t];

        // SOC/E after hour t is at most 1 - loss + eta*avail*c_rate
        let reachable = 1.0 - loss + eta * avail * c_rate;
        if floor > reachable + 1e-12 {
            diag.add_error_at_hour(
                "schedule",
                &format!(
                    "SOC floor {:.3} unreachable: at most {:.3} after driving loss {:.3}",
                    floor, reachable, loss
                ),
                t,
            );
            continue;
        }

        if floor > 0.0 && avail == 0.0 {
            diag.add_warning_at_hour(
                "schedule",
                &format!("SOC floor {:.3} with no fleet plugged in", floor),
                t,
            );
        }

        let next = ring.next(t);
        if loss > 0.0 && avail == 0.0 && schedule.soc_requirement[next] > 0.0 {
            diag.add_warning_at_hour(
                "schedule",
                "driving loss while unplugged is followed by an SOC floor",
                t,
            );
        }
    }

    let cf = inputs.capacity_factors();
    for tech in Technology::ALL {
        if cf.for_technology(tech).iter().all(|v| *v == 0.0) {
            diag.add_warning(
                "supply",
                &format!("{} capacity factor is zero for every hour", tech),
            );
        }
    }

    if inputs.annual_baseline_energy().value() == 0.0 {
        diag.add_warning("demand", "baseline EV demand is zero for the whole horizon");
    }

    if diag.has_issues() {
        warn!("Input diagnostics: {}", diag.summary());
    }
    diag
}
