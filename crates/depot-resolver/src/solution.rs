//! Solutions and the solution store (spec §4.B, component B).
//!
//! A `Solution` is one candidate state of the world: which elements are
//! selected, which relation elements are currently broken, and which
//! version elements have been rejected as conflictors along this branch.
//! Branching a solution is O(1) via [`CowMap`]; only the search engine
//! (component E) decides *when* to branch and on what score delta.
//! Grounded on `examples/original_source/cpp/lib/include/internal/solution.hpp`.

use crate::arena::{Arena, Id};
use crate::cow_map::CowMap;
use crate::element::Element;

/// Why a single branch step was taken, set explicitly by whichever part of
/// the search engine created it (spec §4.G's "Reasons" — component G
/// reconstructs the full suggested-package map by walking these back
/// through a solution's ancestry).
#[derive(Debug, Clone, Copy)]
pub enum DecisionReason {
    /// Directly requested by the caller (install/remove/satisfy/upgrade).
    UserRequest,
    /// Dropped by the auto-removal pass.
    AutoRemoval,
    /// A dependency or anti-relation forced this choice; carries the
    /// relation element and the candidate actually selected.
    DependencyOn {
        relation: Id<Element>,
        selected: Id<Element>,
    },
}

/// One candidate state of the world.
#[derive(Clone)]
pub struct Solution {
    /// Search depth: 0 for the root, incremented on every branch.
    pub level: u32,
    /// Cumulative score (spec §4.C); higher is preferred.
    pub score: f64,
    /// The solution this one was branched from. `None` only for the root.
    pub parent: Option<Id<Solution>>,
    /// The decision (a version element chosen, or a relation element
    /// resolved) that produced this solution from its parent. `None` only
    /// for the root.
    pub introduced_by: Option<Id<Element>>,
    /// Why `introduced_by` was chosen, for the suggested-package map's
    /// reason reconstruction. `None` for steps that don't explain any
    /// single package (e.g. clearing an already-satisfied relation).
    pub introduced_reason: Option<DecisionReason>,
    /// `id -> true` selected, `id -> false` explicitly excluded. Absence
    /// means undecided.
    entries: CowMap<Id<Element>, bool>,
    /// Relation elements that are currently unsatisfied.
    broken_successors: CowMap<Id<Element>, ()>,
    /// Version elements excluded along this branch because a conflict
    /// forced their removal from consideration.
    rejected_conflictors: CowMap<Id<Element>, ()>,
}

impl Solution {
    /// The empty root solution: level 0, score 0, nothing decided.
    #[must_use]
    pub fn root() -> Self {
        Self {
            level: 0,
            score: 0.0,
            parent: None,
            introduced_by: None,
            introduced_reason: None,
            entries: CowMap::new(),
            broken_successors: CowMap::new(),
            rejected_conflictors: CowMap::new(),
        }
    }

    /// Branch a child solution that records `decision` having been made,
    /// adjusting the cumulative score by `score_delta`. O(1): the parent's
    /// maps are shared, not copied (spec §9 open question 1). The caller
    /// (`SolutionStore::branch`/`store_branch_with`) fills in `parent`
    /// since only it knows the parent's own id.
    #[must_use]
    pub fn branch(&self, decision: Id<Element>, score_delta: f64) -> Self {
        Self {
            level: self.level + 1,
            score: self.score + score_delta,
            parent: None,
            introduced_by: Some(decision),
            introduced_reason: None,
            entries: self.entries.clone().branch(),
            broken_successors: self.broken_successors.clone().branch(),
            rejected_conflictors: self.rejected_conflictors.clone().branch(),
        }
    }

    /// Record why this branch step was taken (spec §4.G Reasons).
    pub fn set_reason(&mut self, reason: DecisionReason) {
        self.introduced_reason = Some(reason);
    }

    /// Whether `id` has been decided, and if so, how.
    #[must_use]
    pub fn presence(&self, id: Id<Element>) -> Option<bool> {
        self.entries.get(&id).copied()
    }

    /// Whether `id` has been selected (present) in this solution.
    #[must_use]
    pub fn is_present(&self, id: Id<Element>) -> bool {
        self.presence(id) == Some(true)
    }

    /// Record a present/absent decision for `id`.
    pub fn set_presence(&mut self, id: Id<Element>, present: bool) {
        self.entries.insert(id, present);
    }

    /// Mark a relation element as currently unsatisfied.
    pub fn mark_broken(&mut self, relation: Id<Element>) {
        self.broken_successors.insert(relation, ());
    }

    /// Clear a relation element's broken status, e.g. after a satisfier is
    /// selected.
    pub fn clear_broken(&mut self, relation: Id<Element>) {
        self.broken_successors.remove(&relation);
    }

    /// Whether `relation` is currently recorded as broken.
    #[must_use]
    pub fn is_broken(&self, relation: Id<Element>) -> bool {
        self.broken_successors.contains_key(&relation)
    }

    /// Every element currently selected (present) in this solution.
    #[must_use]
    pub fn present_elements(&self) -> Vec<Id<Element>> {
        self.entries
            .flatten()
            .into_iter()
            .filter_map(|(id, present)| present.then_some(id))
            .collect()
    }

    /// Every relation element currently broken in this solution.
    #[must_use]
    pub fn broken_successors(&self) -> Vec<Id<Element>> {
        self.broken_successors.flatten().into_keys().collect()
    }

    /// Record that `version_element` was rejected as a conflictor.
    pub fn reject_conflictor(&mut self, version_element: Id<Element>) {
        self.rejected_conflictors.insert(version_element, ());
    }

    /// Whether `version_element` was rejected as a conflictor along this
    /// branch.
    #[must_use]
    pub fn is_rejected_conflictor(&self, version_element: Id<Element>) -> bool {
        self.rejected_conflictors.contains_key(&version_element)
    }

    /// Whether the solution has no unsatisfied relations left: a complete,
    /// valid candidate.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.broken_successors.flatten().is_empty()
    }
}

/// Owns every [`Solution`] branched during one resolve call, keeping the
/// tree addressable by [`Id`] for the decision fail tree (component F) to
/// reference.
#[derive(Default)]
pub struct SolutionStore {
    solutions: Arena<Solution>,
}

impl SolutionStore {
    /// A store seeded with the root solution, returning its id.
    #[must_use]
    pub fn new() -> (Self, Id<Solution>) {
        let mut solutions = Arena::new();
        let root_id = solutions.alloc(Solution::root());
        (Self { solutions }, root_id)
    }

    /// Read a solution by id.
    #[must_use]
    pub fn get(&self, id: Id<Solution>) -> &Solution {
        &self.solutions[id]
    }

    /// Mutate a solution in place. Used only to seed the root with initial
    /// requests before search begins; every decision made during search
    /// itself goes through `branch` so sibling solutions never see each
    /// other's edits.
    pub fn get_mut(&mut self, id: Id<Solution>) -> &mut Solution {
        &mut self.solutions[id]
    }

    /// Branch `parent` on `decision`, interning and returning the new
    /// solution's id.
    pub fn branch(&mut self, parent: Id<Solution>, decision: Id<Element>, score_delta: f64) -> Id<Solution> {
        let mut child = self.solutions[parent].branch(decision, score_delta);
        child.parent = Some(parent);
        self.solutions.alloc(child)
    }

    /// Number of solutions branched so far, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    /// Whether no solution has been branched yet (always false once
    /// constructed, since `new` seeds the root).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena as ElementArena;
    use crate::element::{Element, VersionElement};
    use depot_core::PackageName;

    fn fake_element_id(arena: &mut ElementArena<Element>) -> Id<Element> {
        arena.alloc(Element::Version(VersionElement {
            package: PackageName::parse("libfoo").unwrap(),
            version: None,
        }))
    }

    #[test]
    fn branching_increments_level_and_score() {
        let (mut store, root) = SolutionStore::new();
        let mut elements = ElementArena::new();
        let decision = fake_element_id(&mut elements);
        let child = store.branch(root, decision, 42.0);
        assert_eq!(store.get(child).level, 1);
        assert_eq!(store.get(child).score, 42.0);
        assert_eq!(store.get(child).introduced_by, Some(decision));
    }

    #[test]
    fn child_entries_do_not_mutate_parent() {
        let (mut store, root) = SolutionStore::new();
        let mut elements = ElementArena::new();
        let decision = fake_element_id(&mut elements);
        let child_id = store.branch(root, decision, 0.0);

        let mut child = store.get(child_id).clone();
        child.set_presence(decision, true);

        assert!(child.is_present(decision));
        assert_eq!(store.get(root).presence(decision), None);
    }

    #[test]
    fn broken_successors_round_trip() {
        let (mut store, root) = SolutionStore::new();
        let mut elements = ElementArena::new();
        let relation = fake_element_id(&mut elements);
        let mut solution = store.get(root).clone();
        solution.mark_broken(relation);
        assert!(solution.is_broken(relation));
        assert!(!solution.is_complete());
        solution.clear_broken(relation);
        assert!(!solution.is_broken(relation));
        assert!(solution.is_complete());
    }

    #[test]
    fn rejected_conflictors_are_tracked_independently_of_presence() {
        let (mut store, root) = SolutionStore::new();
        let mut elements = ElementArena::new();
        let id = fake_element_id(&mut elements);
        let mut solution = store.get(root).clone();
        solution.reject_conflictor(id);
        assert!(solution.is_rejected_conflictor(id));
        assert_eq!(solution.presence(id), None);
    }
}
