pub mod cli;
pub mod config;
pub mod failure;

pub use cli::{build_cli_command, Cli, Commands, InputArgs, OverrideArgs};
pub use config::{load_config, EvcapConfig};
pub use failure::classify;
