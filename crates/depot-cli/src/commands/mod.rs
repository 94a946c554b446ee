//! CLI surface: a thin harness exercising the resolver's public interface
//! end to end (spec §10.5) — not a package manager front-end.

pub mod common;
pub mod explain;
pub mod resolve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// depot — a demo harness for the native dependency resolver.
#[derive(Debug, Parser)]
#[command(name = "depot", version, about, long_about = None)]
pub struct Cli {
    /// Disable ANSI colors.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to a config file layer, overriding the usual system/user
    /// search path.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the search step budget.
    #[arg(long, global = true)]
    pub max_iterations: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve a scenario interactively, prompting Accept/Decline/Abandon
    /// for each proposed solution.
    Resolve(resolve::ResolveArgs),
    /// Resolve a scenario non-interactively, auto-accepting the first
    /// solution found.
    Explain(explain::ExplainArgs),
}
