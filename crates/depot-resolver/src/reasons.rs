//! Suggested-package map and reason reconstruction (spec §4.G, the
//! callback's `Reasons` payload; spec §9 "Reasons are a small enumeration
//! ... render them via a single formatter").
//!
//! Walks a solution's ancestry chain (`parent`/`introduced_by`/
//! `introduced_reason`, set explicitly by the search engine at every branch
//! point) to explain, for each present package, why its chosen version ended
//! up selected. Mirrors `failtree.rs`'s dependant-walk for the opposite
//! case: explaining an accepted choice rather than a dead end.

use ahash::AHashMap;

use depot_core::PackageName;

use crate::arena::Id;
use crate::element::{DependencyKind, Element};
use crate::graph::Graph;
use crate::solution::{DecisionReason, Solution, SolutionStore};

/// Why a package ended up at its chosen version (spec §4.G/§9).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    /// Directly requested by the caller.
    UserRequest,
    /// Dropped by the auto-removal pass.
    AutoRemoval,
    /// Pulled in (or excluded) by another package's dependency line.
    DependencyOn {
        dependant: String,
        kind: DependencyKind,
        clause: String,
    },
    /// Pulled to match a synchronization constraint (spec §4.E sync pass;
    /// not currently produced by this engine, kept for interface parity).
    SynchronizationWith { package: String },
}

/// One entry of the suggested-package map (spec §4.G).
#[derive(Debug, Clone)]
pub struct SuggestedPackage {
    /// The package this entry describes.
    pub package: PackageName,
    /// The chosen version, or `None` if the package ends up removed.
    pub version: Option<String>,
    /// Whether a `Reason::UserRequest` explains this package.
    pub manually_selected: bool,
    /// Ordered, most-recent-decision-first.
    pub reasons: Vec<Reason>,
}

/// Reconstruct the suggested-package map for `solution_id`.
#[must_use]
pub fn build_suggested_packages(store: &SolutionStore, solution_id: Id<Solution>, graph: &Graph<'_>) -> Vec<SuggestedPackage> {
    let solution = store.get(solution_id);
    let mut reasons_by_package: AHashMap<PackageName, Vec<Reason>> = AHashMap::new();

    let mut current = Some(solution_id);
    while let Some(id) = current {
        let step = store.get(id);
        if let (Some(decision), Some(tag)) = (step.introduced_by, step.introduced_reason) {
            if let Some(package) = package_for(graph, decision, tag) {
                reasons_by_package.entry(package).or_default().push(render_reason(graph, tag));
            }
        }
        current = step.parent;
    }

    solution
        .present_elements()
        .into_iter()
        .filter_map(|id| match graph.element(id) {
            Element::Version(v) => {
                let reasons = reasons_by_package.get(&v.package).cloned().unwrap_or_default();
                let manually_selected = reasons.iter().any(|r| matches!(r, Reason::UserRequest));
                Some(SuggestedPackage {
                    package: v.package.clone(),
                    version: v.version.as_ref().map(|k| k.0.clone()),
                    manually_selected,
                    reasons,
                })
            }
            _ => None,
        })
        .collect()
}

fn package_for(graph: &Graph<'_>, decision: Id<Element>, tag: DecisionReason) -> Option<PackageName> {
    let target = match tag {
        DecisionReason::UserRequest | DecisionReason::AutoRemoval => decision,
        DecisionReason::DependencyOn { selected, .. } => selected,
    };
    match graph.element(target) {
        Element::Version(v) => Some(v.package.clone()),
        _ => None,
    }
}

fn render_reason(graph: &Graph<'_>, tag: DecisionReason) -> Reason {
    match tag {
        DecisionReason::UserRequest => Reason::UserRequest,
        DecisionReason::AutoRemoval => Reason::AutoRemoval,
        DecisionReason::DependencyOn { relation, .. } => match graph.element(relation) {
            Element::Relation(r) => {
                let dependant = match graph.element(r.dependant) {
                    Element::Version(v) => match &v.version {
                        Some(key) => format!("{} {}", v.package, key.0),
                        None => v.package.to_string(),
                    },
                    _ => "<unknown>".to_string(),
                };
                Reason::DependencyOn {
                    dependant,
                    kind: r.kind,
                    clause: r.clause.to_string(),
                }
            }
            _ => Reason::DependencyOn { dependant: "<unknown>".to_string(), kind: DependencyKind::Depends, clause: String::new() },
        },
    }
}
