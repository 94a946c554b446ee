//! Shared scenario-loading and solution-rendering helpers for `resolve`
//! and `explain`.

use std::path::Path;

use anyhow::{Context, Result};

use depot_cache::{MetadataCache, Scenario, ScenarioRequest};
use depot_config::ResolverConfig;
use depot_core::{PackageName, RelationExpr, Version};
use depot_resolver::arena::Id;
use depot_resolver::{AutoRemovalPolicy, Element, Graph, Importance, Resolver, ScoreManager, Solution, SolutionStore};

use crate::output::table::Table;

/// Parse a scenario file and build the [`MetadataCache`] it describes.
pub fn load_scenario(path: &Path) -> Result<(Scenario, MetadataCache)> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let scenario = Scenario::parse(&text).with_context(|| format!("parsing {}", path.display()))?;
    let cache = scenario.build_cache().context("building cache from scenario")?;
    Ok((scenario, cache))
}

/// Build a [`Resolver`] over `cache`, configured from `config` and primed
/// with every request `scenario` describes.
pub fn build_resolver<'c>(
    cache: &'c MetadataCache,
    scenario: &Scenario,
    config: &ResolverConfig,
) -> Result<Resolver<'c>> {
    let scores = ScoreManager::with_weights(config.score_weights);
    let autoremoval = AutoRemovalPolicy::new(
        &config.auto_removal.target_set,
        &config.auto_removal.never,
        &config.auto_removal.keep_if_reverse_dependants,
    )
    .context("compiling auto-removal patterns")?;

    let mut resolver = Resolver::new(cache)
        .with_scores(scores)
        .with_autoremoval(autoremoval)
        .with_step_budget(config.max_iterations);

    for request in &scenario.requests {
        match request {
            ScenarioRequest::InstallVersion { package, version } => {
                resolver.install_version(PackageName::parse(package.clone())?, Version::parse(version.clone())?);
            }
            ScenarioRequest::RemoveVersions { package } => {
                resolver.remove_versions(PackageName::parse(package.clone())?);
            }
            ScenarioRequest::SatisfyRelation { relation } => {
                let relation: RelationExpr = relation
                    .parse()
                    .map_err(|err: depot_core::Error| anyhow::anyhow!(err.to_string()))?;
                resolver.satisfy_relation_expression(relation, false, Importance::Must);
            }
            ScenarioRequest::Upgrade { package } => {
                resolver.upgrade(PackageName::parse(package.clone())?);
            }
        }
    }

    Ok(resolver)
}

/// Render a proposed solution as a package/version table.
pub fn print_solution(store: &SolutionStore, solution: Id<Solution>, graph: &Graph<'_>, score: f64) {
    let sol = store.get(solution);
    let mut rows: Vec<(String, String)> = sol
        .present_elements()
        .into_iter()
        .filter_map(|id| match graph.element(id) {
            Element::Version(v) => {
                let version = v.version.as_ref().map_or_else(|| "(removed)".to_string(), |k| k.0.clone());
                Some((v.package.as_str().to_string(), version))
            }
            _ => None,
        })
        .collect();
    rows.sort();

    let mut table = Table::new();
    table.headers(["Package", "Version"]);
    for (package, version) in rows {
        table.row([package, version]);
    }
    table.print();
    println!("score: {score:+.1}");
}
