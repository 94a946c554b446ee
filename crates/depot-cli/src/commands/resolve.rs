//! `depot resolve <scenario.json>` — interactively walks the resolver's
//! proposed solutions, prompting Accept/Decline/Abandon for each one
//! (spec §10.5).

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use depot_config::ResolverConfig;
use depot_resolver::{Decision, Resolution};

use crate::commands::common::{build_resolver, load_scenario, print_solution};
use crate::output::prompt::Select;
use crate::output::{error, success};

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Path to a scenario JSON file (packages, pins, and requests).
    pub scenario: PathBuf,
}

pub fn run(args: &ResolveArgs, config: &ResolverConfig) -> Result<()> {
    let (scenario, cache) = load_scenario(&args.scenario)?;
    let mut resolver = build_resolver(&cache, &scenario, config)?;

    let resolution = resolver.resolve(|store, solution, graph, _suggested| {
        let score = store.get(solution).score;
        print_solution(store, solution, graph, score);

        let choice = Select::new("accept this solution?")
            .items(["Accept", "Decline", "Abandon"])
            .default(0)
            .prompt()
            .unwrap_or(0);

        match choice {
            0 => Decision::Accept,
            1 => Decision::Decline,
            _ => Decision::Abandon,
        }
    });

    match resolution {
        Resolution::Accepted { score, .. } => {
            success(&format!("solution accepted (score {score:+.1})"));
        }
        Resolution::Abandoned => {
            error("no solution was accepted");
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
