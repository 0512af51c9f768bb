pub mod schedule;
pub mod size;
pub mod solve;
pub mod validate;

use evcap_cli::cli::InputArgs;
use evcap_io::InputPaths;

pub(crate) fn input_paths(args: &InputArgs) -> InputPaths {
    InputPaths {
        capacity_factors: args.cf.clone(),
        schedule: args.schedule.clone(),
        baseline: args.baseline.clone(),
    }
}
