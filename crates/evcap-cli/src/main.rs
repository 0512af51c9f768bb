use clap::Parser;
use evcap_cli::cli::{Cli, Commands};
use evcap_cli::config::{load_config, EvcapConfig};
use evcap_cli::failure::classify;
use evcap_core::EvcapError;
use tracing::{error, info, warn};
use tracing_subscriber::FmtSubscriber;

mod commands;

fn exit_with(failure: EvcapError, err: &anyhow::Error) -> ! {
    error!("Command failed: {:?}", err);
    if failure.is_solve_failure() {
        warn!("No results were written");
    }
    eprintln!("error: {:#}", err);
    std::process::exit(failure.exit_code());
}

fn main() {
    let cli = Cli::parse();

    let loaded = load_config(cli.config.as_deref());
    let level = match (cli.log_level, &loaded) {
        (Some(level), _) => level,
        (None, Ok(config)) => config.logging.level().unwrap_or(tracing::Level::INFO),
        (None, Err(_)) => tracing::Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("error: setting default subscriber failed: {}", e);
    }

    let config = loaded.and_then(|base| match cli.command.overrides() {
        Some(overrides) => {
            let mut config: EvcapConfig = base;
            config.apply_overrides(overrides)?;
            Ok(config)
        }
        None => Ok(base),
    });
    let config = match config {
        Ok(config) => config,
        Err(e) => exit_with(EvcapError::Config(format!("{:#}", e)), &e),
    };

    info!("evcap {} (horizon {} h)", env!("CARGO_PKG_VERSION"), config.horizon_hours);

    let result = match &cli.command {
        Commands::Solve {
            inputs,
            out,
            summary,
            ..
        } => commands::solve::handle(&config, inputs, out.as_deref(), summary.as_deref()),
        Commands::Size {
            schedule,
            baseline,
            json,
            ..
        } => commands::size::handle(&config, schedule, baseline, *json),
        Commands::Validate { inputs, .. } => commands::validate::handle(&config, inputs),
        Commands::Schedule { out, hours } => {
            commands::schedule::handle(out, hours.unwrap_or(config.horizon_hours))
        }
    };

    if let Err(e) = result {
        exit_with(classify(&e), &e);
    }
}
