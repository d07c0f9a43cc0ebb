//! TouchMCU CLI
//!
//! Command-line interface for the TouchMCU layout builder.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use touchmcu::cli::commands;
use touchmcu::cli::{BuildConfig, Cli};
use touchmcu::TouchMcuError;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logger
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    info!("TouchMCU v{}", env!("CARGO_PKG_VERSION"));

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if let Some(hint) = e
                .downcast_ref::<TouchMcuError>()
                .and_then(TouchMcuError::recovery_suggestion)
            {
                eprintln!("Hint: {}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    if cli.list {
        commands::list_overlays(&cli.overlay_dir)?;
        return Ok(());
    }

    let config = BuildConfig::from(cli);
    let report = commands::build(&config)
        .with_context(|| format!("failed to build overlay '{}'", config.overlay))?;

    if cli.show {
        commands::preview(&report.path);
    }
    Ok(())
}
