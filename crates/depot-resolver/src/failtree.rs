//! Decision Fail Tree (spec §4.F, component F).
//!
//! Turns the dead-end relation ids a failed [`crate::search::SearchEngine`]
//! run collected into a human-readable explanation: which clause could not
//! be satisfied, tied back to the dependant version that introduced it.
//! Grounded on
//! `examples/original_source/cpp/lib/include/internal/decisionfailtree.hpp`.

use std::fmt;

use crate::arena::Id;
use crate::element::Element;
use crate::graph::Graph;

/// One unsatisfiable clause encountered during a failed resolution.
#[derive(Debug, Clone)]
pub struct FailureReason {
    /// The relation element that had no (or no usable) satisfiers.
    pub relation: Id<Element>,
    /// The package and version whose dependency line introduced the
    /// clause, if it came from a version element rather than a top-level
    /// request.
    pub introduced_by: Option<String>,
    /// The clause itself, rendered as written.
    pub clause: String,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.introduced_by {
            Some(dependant) => write!(f, "{dependant} requires {}, which cannot be satisfied", self.clause),
            None => write!(f, "requested {}, which cannot be satisfied", self.clause),
        }
    }
}

/// Renders the dead-end relation ids a failed resolve call returned into
/// [`FailureReason`]s a user or CLI can read.
pub struct DecisionFailTree<'a, 'c> {
    graph: &'a Graph<'c>,
}

impl<'a, 'c> DecisionFailTree<'a, 'c> {
    #[must_use]
    pub const fn new(graph: &'a Graph<'c>) -> Self {
        Self { graph }
    }

    /// Explain every dead end, most-specific (deepest dependency chain)
    /// first is not tracked by this simplified tree; reasons are returned
    /// in the order the search engine recorded them.
    #[must_use]
    pub fn explain(&self, dead_ends: &[Id<Element>]) -> Vec<FailureReason> {
        dead_ends.iter().map(|&id| self.explain_one(id)).collect()
    }

    fn explain_one(&self, relation: Id<Element>) -> FailureReason {
        let clause = match self.graph.element(relation) {
            Element::Relation(r) => r.clause.to_string(),
            _ => "<unknown clause>".to_string(),
        };
        let introduced_by = match self.graph.element(relation) {
            Element::Relation(r) => match self.graph.element(r.dependant) {
                Element::Version(v) => v.version.as_ref().map(|key| format!("{} {}", v.package, key.0)),
                _ => None,
            },
            _ => None,
        };
        FailureReason {
            relation,
            introduced_by,
            clause,
        }
    }
}
