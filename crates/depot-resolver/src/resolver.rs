//! Public interface (spec §4.G, component G).
//!
//! `Resolver` accumulates requests (install, remove, satisfy a bare
//! relation, upgrade, flip the automatically-installed flag) and turns
//! them into goal elements for the [`SearchEngine`] when `resolve` is
//! called. Grounded on
//! `examples/original_source/cpp/lib/include/cupt/system/resolver.hpp`'s
//! request-then-resolve shape.

use tracing::{debug, info};

use depot_core::{PackageName, RelationExpr, Version};

use crate::arena::Id;
use crate::autoremove::AutoRemovalPolicy;
use crate::cache::Cache;
use crate::element::Element;
use crate::error::ResolveOutcome;
use crate::failtree::{DecisionFailTree, FailureReason};
use crate::graph::Graph;
use crate::reasons::{build_suggested_packages, SuggestedPackage};
use crate::score::ScoreManager;
use crate::search::SearchEngine;
use crate::solution::{Solution, SolutionStore};

/// One accumulated request, queued until `resolve` is called.
#[derive(Debug, Clone)]
enum Request {
    InstallVersion(PackageName, Version),
    RemoveVersions(PackageName),
    SatisfyRelation(RelationExpr, bool, Importance),
    Upgrade(PackageName),
    SetAutomaticallyInstalled(PackageName, bool),
}

/// How strongly a request binds (spec §4.G
/// `satisfyRelationExpression(expr, invert?, annotation, importance)`).
/// `Must` behaves as today: the goal is a hard requirement. `Try`/`Wish`
/// are accepted and threaded through requests but are not yet weighted
/// any differently by the search engine — see `DESIGN.md` for the scope
/// this leaves open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Importance {
    Must,
    Try,
    Wish,
}

/// What to do with a proposed solution, returned by the caller's callback
/// to [`Resolver::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Keep this solution; stop searching.
    Accept,
    /// Reject it; the search resumes at the next-best candidate still on
    /// the frontier (spec §4.G, §8 property 4: sticky declines).
    Decline,
    /// Reject it and stop searching altogether.
    Abandon,
}

/// The outcome handed to a `resolve` caller once a decision has been made.
#[derive(Debug)]
pub enum Resolution {
    /// The caller accepted a solution.
    Accepted {
        /// The accepted solution's id.
        solution: Id<Solution>,
        /// Its final score.
        score: f64,
    },
    /// The caller abandoned the only candidate offered.
    Abandoned,
    /// No solution could be found at all.
    Unsolvable(Vec<FailureReason>),
}

/// Accumulates requests against a [`Cache`] and resolves them into a
/// [`Solution`] via the [`SearchEngine`].
pub struct Resolver<'c> {
    cache: &'c dyn Cache,
    requests: Vec<Request>,
    scores: ScoreManager,
    autoremoval: AutoRemovalPolicy,
    step_budget: u64,
}

impl<'c> Resolver<'c> {
    /// A resolver with default scoring weights and auto-removal policy.
    #[must_use]
    pub fn new(cache: &'c dyn Cache) -> Self {
        Self {
            cache,
            requests: Vec::new(),
            scores: ScoreManager::new(),
            autoremoval: AutoRemovalPolicy::default(),
            step_budget: 1_000_000,
        }
    }

    /// Override the default scoring weights.
    #[must_use]
    pub fn with_scores(mut self, scores: ScoreManager) -> Self {
        self.scores = scores;
        self
    }

    /// Override the default auto-removal policy.
    #[must_use]
    pub fn with_autoremoval(mut self, policy: AutoRemovalPolicy) -> Self {
        self.autoremoval = policy;
        self
    }

    /// Override the default search step budget (spec §5).
    #[must_use]
    pub fn with_step_budget(mut self, step_budget: u64) -> Self {
        self.step_budget = step_budget;
        self
    }

    /// Request that `package` end up at exactly `version`.
    pub fn install_version(&mut self, package: PackageName, version: Version) {
        self.requests.push(Request::InstallVersion(package, version));
    }

    /// Request that `package` end up removed.
    pub fn remove_versions(&mut self, package: PackageName) {
        self.requests.push(Request::RemoveVersions(package));
    }

    /// Request that some version satisfying `relation` end up selected
    /// (or, if `invert` is set, that every satisfier end up removed),
    /// without pinning which version — the search chooses the best
    /// satisfier by pin order rather than the caller fixing it up front
    /// (spec §4.G `satisfyRelationExpression(expr, invert?, importance)`).
    pub fn satisfy_relation_expression(&mut self, relation: RelationExpr, invert: bool, importance: Importance) {
        self.requests.push(Request::SatisfyRelation(relation, invert, importance));
    }

    /// Request that `package` be upgraded to its best available version.
    pub fn upgrade(&mut self, package: PackageName) {
        self.requests.push(Request::Upgrade(package));
    }

    /// Flip whether `package` is considered automatically installed,
    /// affecting the auto-removal oracle's eligibility check.
    pub fn set_automatically_installed_flag(&mut self, package: PackageName, automatic: bool) {
        self.requests.push(Request::SetAutomaticallyInstalled(package, automatic));
    }

    /// Resolve every queued request into goal elements, run the search
    /// engine, and hand each candidate solution to `callback` along with
    /// its reconstructed suggested-package map (spec §4.G). A
    /// `Decision::Decline` resumes the search at the next-best candidate
    /// still on the frontier; `Decision::Abandon` stops it outright.
    pub fn resolve<F>(&mut self, mut callback: F) -> Resolution
    where
        F: FnMut(&SolutionStore, Id<Solution>, &Graph<'c>, &[SuggestedPackage]) -> Decision,
    {
        info!(requests = self.requests.len(), "starting resolution");
        let mut engine = SearchEngine::new(self.cache, self.scores, self.autoremoval.clone(), self.step_budget);
        let goals = self.build_goals(&mut engine);

        let (store, outcome) = engine.resolve(&goals, |store, solution, graph| {
            let suggested = build_suggested_packages(store, solution, graph);
            callback(store, solution, graph, &suggested)
        });
        match outcome {
            ResolveOutcome::Solved { solution, score } => {
                debug!(score, "candidate solution accepted");
                Resolution::Accepted { solution, score }
            }
            ResolveOutcome::Abandoned => Resolution::Abandoned,
            ResolveOutcome::Failed(err) => {
                let dead_ends = match &err {
                    crate::error::ResolveError::Unsolvable { dead_ends } => dead_ends.clone(),
                    _ => Vec::new(),
                };
                let tree = DecisionFailTree::new(engine.graph());
                Resolution::Unsolvable(tree.explain(&dead_ends))
            }
        }
    }

    fn build_goals(&self, engine: &mut SearchEngine<'c>) -> Vec<Id<Element>> {
        let mut goals = Vec::new();
        for request in &self.requests {
            match request {
                Request::InstallVersion(package, version) => {
                    goals.push(engine.graph_mut().get_or_create_version_element(package, Some(version)));
                }
                Request::RemoveVersions(package) => {
                    goals.push(engine.graph_mut().get_or_create_version_element(package, None));
                }
                Request::SatisfyRelation(relation, invert, _importance) => {
                    let mut candidates = self.cache.satisfying_versions(relation);
                    candidates.sort_by(|(pkg_a, a), (pkg_b, b)| {
                        let pin_a = self.cache.pin(pkg_a, a);
                        let pin_b = self.cache.pin(pkg_b, b);
                        pin_b.cmp(&pin_a).then_with(|| b.cmp(a))
                    });
                    if *invert {
                        for (package, _) in &candidates {
                            goals.push(engine.graph_mut().get_or_create_version_element(package, None));
                        }
                    } else if let Some((package, version)) = candidates.first() {
                        goals.push(engine.graph_mut().get_or_create_version_element(package, Some(version)));
                    }
                }
                Request::Upgrade(package) => {
                    if let Some(binary_package) = self.cache.binary_package(package) {
                        let best = binary_package.versions().into_iter().max_by(|a, b| {
                            let pin_a = self.cache.pin(package, a);
                            let pin_b = self.cache.pin(package, b);
                            pin_a.cmp(&pin_b).then_with(|| a.cmp(b))
                        });
                        if let Some(best) = best {
                            goals.push(engine.graph_mut().get_or_create_version_element(package, Some(best)));
                        }
                    }
                }
                Request::SetAutomaticallyInstalled(_, _) => {
                    // Bookkeeping only: affects the auto-removal oracle's
                    // eligibility check, not which goal elements are seeded.
                }
            }
        }
        goals
    }
}
