//! Resolver-specific error and outcome types (spec §7).
//!
//! Mirrors `depot_core::error`'s `ErrorCode` + `thiserror` convention, but
//! scoped to failures the search engine itself can produce rather than
//! parsing/IO failures (those stay in `depot_core::Error`).

use thiserror::Error;

use crate::arena::Id;
use crate::element::Element;

/// A resolution failure.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The search frontier was exhausted without finding a complete
    /// solution: every branch hit an unsatisfiable relation or an
    /// essential-package removal with no alternative.
    #[error("no solution satisfies the given requests")]
    Unsolvable {
        /// The deepest branches explored, for the decision fail tree to
        /// render (component F).
        dead_ends: Vec<Id<Element>>,
    },
    /// The search exceeded its configured step budget (spec §5 resource
    /// bound) before converging.
    #[error("resolution exceeded the configured step budget of {limit}")]
    StepBudgetExceeded {
        /// The configured limit that was hit.
        limit: u64,
    },
    /// A request referenced a package name the cache has never heard of.
    #[error("unknown package in request: {0}")]
    UnknownPackage(String),
}

/// The result of one `resolve` call: either a complete, scored solution or
/// a structured failure explanation.
#[derive(Debug)]
pub enum ResolveOutcome {
    /// A complete solution was found.
    Solved {
        /// The winning solution's id in the [`crate::solution::SolutionStore`].
        solution: Id<crate::solution::Solution>,
        /// Its final score.
        score: f64,
    },
    /// No solution could be found; `error` explains why.
    Failed(ResolveError),
    /// The caller abandoned the candidate solution offered and chose not
    /// to continue searching (spec §4.G `Decision::Abandon`).
    Abandoned,
}

impl ResolveOutcome {
    /// The winning solution id, if resolution succeeded.
    #[must_use]
    pub const fn solution(&self) -> Option<Id<crate::solution::Solution>> {
        match self {
            Self::Solved { solution, .. } => Some(*solution),
            Self::Failed(_) | Self::Abandoned => None,
        }
    }

    /// Whether resolution succeeded.
    #[must_use]
    pub const fn is_solved(&self) -> bool {
        matches!(self, Self::Solved { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solved_outcome_reports_its_solution() {
        let mut arena = crate::arena::Arena::new();
        let id = arena.alloc(crate::solution::Solution::root());
        let outcome = ResolveOutcome::Solved { solution: id, score: 42.0 };
        assert!(outcome.is_solved());
        assert_eq!(outcome.solution(), Some(id));
    }

    #[test]
    fn failed_outcome_has_no_solution() {
        let outcome = ResolveOutcome::Failed(ResolveError::StepBudgetExceeded { limit: 1000 });
        assert!(!outcome.is_solved());
        assert_eq!(outcome.solution(), None);
    }
}
