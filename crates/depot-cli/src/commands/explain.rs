//! `depot explain <scenario.json>` — resolves non-interactively, accepting
//! the first proposed solution, and prints the fail-tree rendering when
//! none exists (spec §10.5).

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use depot_config::ResolverConfig;
use depot_resolver::{Decision, Resolution};

use crate::commands::common::{build_resolver, load_scenario, print_solution};
use crate::output::{error, success};

#[derive(Debug, Args)]
pub struct ExplainArgs {
    /// Path to a scenario JSON file (packages, pins, and requests).
    pub scenario: PathBuf,
}

pub fn run(args: &ExplainArgs, config: &ResolverConfig) -> Result<()> {
    let (scenario, cache) = load_scenario(&args.scenario)?;
    let mut resolver = build_resolver(&cache, &scenario, config)?;

    let resolution = resolver.resolve(|store, solution, graph, _suggested| {
        let score = store.get(solution).score;
        print_solution(store, solution, graph, score);
        Decision::Accept
    });

    match resolution {
        Resolution::Accepted { score, .. } => {
            success(&format!("solution found (score {score:+.1})"));
        }
        Resolution::Abandoned => {
            unreachable!("explain always accepts the first solution offered");
        }
        Resolution::Unsolvable(reasons) => {
            error("no solution exists for this scenario");
            for reason in reasons {
                println!("  - {reason}");
            }
        }
    }

    Ok(())
}
