//! The native dependency-resolution engine: turns a set of install/remove/
//! upgrade requests against a [`Cache`] of package metadata into a scored
//! [`Solution`], per the dependency-graph/priority-search design laid out
//! across this crate's modules (spec §4).

pub mod arena;
pub mod autoremove;
pub mod cache;
mod cow_map;
pub mod element;
pub mod error;
pub mod failtree;
pub mod graph;
pub mod reasons;
pub mod resolver;
pub mod score;
pub mod search;
pub mod solution;

pub use autoremove::{AutoRemovalPolicy, AutoRemovalVerdict};
pub use cache::{BinaryPackage, Cache, InstalledInfo};
pub use element::{DependencyKind, Element, RelationElement, SynchronizationElement, VersionElement, VersionKey};
pub use error::{ResolveError, ResolveOutcome};
pub use failtree::{DecisionFailTree, FailureReason};
pub use graph::Graph;
pub use reasons::{Reason, SuggestedPackage};
pub use resolver::{Decision, Importance, Resolution, Resolver};
pub use score::{ScoreBreakdown, ScoreEvent, ScoreManager, ScoreWeights};
pub use search::SearchEngine;
pub use solution::{DecisionReason, Solution, SolutionStore};
