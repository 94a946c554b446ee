//! depot — a demo harness for the native dependency resolver.
//!
//! This binary does not fetch or install anything; it loads a scenario
//! fixture describing available packages, pins, and requests, and drives
//! the resolver's public interface exactly as a real front-end would.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

mod commands;
mod output;

use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use commands::{Cli, Commands};
use depot_config::{CliOverrides, ConfigLoader};

#[global_allocator]
static ALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> ExitCode {
    let start = Instant::now();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("DEPOT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .without_time()
        .init();

    output::init(cli.no_color.then_some(false));

    let overrides = CliOverrides {
        max_iterations: cli.max_iterations,
        ..CliOverrides::default()
    };

    let result = run(&cli, &overrides);
    tracing::debug!(elapsed = ?start.elapsed(), "depot finished");

    match result {
        Ok(code) => code,
        Err(err) => {
            let report: miette::Report = miette::miette!("{err:#}");
            eprintln!("{report:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, overrides: &CliOverrides) -> anyhow::Result<ExitCode> {
    let config = ConfigLoader::new().resolve(overrides)?;

    match &cli.command {
        Commands::Resolve(args) => commands::resolve::run(args, &config)?,
        Commands::Explain(args) => commands::explain::run(args, &config)?,
    }

    Ok(ExitCode::SUCCESS)
}
