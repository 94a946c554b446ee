//! Search Engine (spec §4.E, component E).
//!
//! A priority-queue frontier over [`Solution`]s, ordered by (score desc, id
//! asc) as spec §4.E requires, always expanding the best-looking branch
//! first. Each step picks the lowest-id hard-broken relation in the
//! expanded solution and branches one child per candidate satisfier (in pin
//! order), pruning candidates that would select a package already in
//! conflict with something present. Soft relations (recommends/suggests)
//! never block completion; an unsatisfied one is scored and cleared in
//! place. The root is seeded from the installed set before requested goals
//! are layered on, conflicts are repaired by varying the conflicting side
//! rather than installing the conflictor, and a solution is only offered to
//! the caller once orphaned automatically-installed packages have been
//! dropped to a fixpoint. Grounded on
//! `examples/original_source/cpp/lib/include/internal/nativeresolverimpl.hpp`'s
//! main loop.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::arena::Id;
use crate::autoremove::AutoRemovalPolicy;
use crate::cache::Cache;
use crate::element::{DependencyKind, Element, RelationElement};
use crate::error::{ResolveError, ResolveOutcome};
use crate::graph::Graph;
use crate::resolver::Decision;
use crate::score::{ScoreEvent, ScoreManager};
use crate::solution::{DecisionReason, Solution, SolutionStore};

#[derive(Clone, Copy)]
struct FrontierEntry {
    score: f64,
    id: Id<Solution>,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Highest score first; on a tie, the lowest id (spec §4.E).
        self.score.total_cmp(&other.score).then_with(|| other.id.cmp(&self.id))
    }
}

/// Drives the search over a [`Graph`] backed by a [`Cache`].
pub struct SearchEngine<'c> {
    graph: Graph<'c>,
    cache: &'c dyn Cache,
    scores: ScoreManager,
    autoremoval: AutoRemovalPolicy,
    step_budget: u64,
}

impl<'c> SearchEngine<'c> {
    /// Build an engine over `cache` with the given scoring weights,
    /// auto-removal policy and step budget (spec §5 resource bound).
    #[must_use]
    pub fn new(cache: &'c dyn Cache, scores: ScoreManager, autoremoval: AutoRemovalPolicy, step_budget: u64) -> Self {
        Self {
            graph: Graph::new(cache),
            cache,
            scores,
            autoremoval,
            step_budget,
        }
    }

    /// The graph built up so far, for callers that need to inspect
    /// elements after resolution (the decision fail tree, the public
    /// interface's reason rendering).
    #[must_use]
    pub const fn graph(&self) -> &Graph<'c> {
        &self.graph
    }

    #[must_use]
    pub fn graph_mut(&mut self) -> &mut Graph<'c> {
        &mut self.graph
    }

    /// Resolve starting from `goals`: version elements that must end up
    /// present. The root is seeded with the currently installed packages
    /// before the requested goals are layered on top (spec §3, §4.B
    /// `createInitial`), so conflict-driven swaps and auto-removal have a
    /// real base to operate on rather than an empty one. Every candidate
    /// solution the search reaches is offered to `callback`; `Decline`
    /// bans it and resumes the frontier at the next-best alternative
    /// (spec §4.G, §8 property 4).
    pub fn resolve<F>(&mut self, goals: &[Id<Element>], mut callback: F) -> (SolutionStore, ResolveOutcome)
    where
        F: FnMut(&SolutionStore, Id<Solution>, &Graph<'c>) -> Decision,
    {
        let (mut store, mut root_id) = SolutionStore::new();

        for package in self.cache.installed_package_names() {
            let Some(installed) = self.cache.binary_package(&package).and_then(|p| p.installed_version()).cloned() else {
                continue;
            };
            let id = self.graph.get_or_create_version_element(&package, Some(&installed));
            let mut child = store.get(root_id).branch(id, 0.0);
            self.select(&mut child, id);
            self.schedule_successors(&mut child, id);
            root_id = store_branch_with(&mut store, root_id, child);
        }

        for &goal in goals {
            self.graph.unfold(goal);
            let mut child = store.get(root_id).branch(goal, 0.0);
            self.select(&mut child, goal);
            self.schedule_successors(&mut child, goal);
            child.set_reason(DecisionReason::UserRequest);
            root_id = store_branch_with(&mut store, root_id, child);
        }

        {
            let mut root = store.get(root_id).clone();
            self.recompute_anti_relations(&mut root);
            *store.get_mut(root_id) = root;
        }

        let mut frontier = BinaryHeap::new();
        frontier.push(FrontierEntry {
            score: store.get(root_id).score,
            id: root_id,
        });

        let mut dead_ends = Vec::new();
        let mut steps: u64 = 0;

        while let Some(FrontierEntry { id, .. }) = frontier.pop() {
            steps += 1;
            if steps > self.step_budget {
                return (store, ResolveOutcome::Failed(ResolveError::StepBudgetExceeded { limit: self.step_budget }));
            }

            if self.hard_broken(store.get(id)).is_empty() {
                let solved_id = self.auto_remove_pass(&mut store, id);
                let score = store.get(solved_id).score;
                match callback(&store, solved_id, &self.graph) {
                    Decision::Accept => return (store, ResolveOutcome::Solved { solution: solved_id, score }),
                    Decision::Decline => continue,
                    Decision::Abandon => return (store, ResolveOutcome::Abandoned),
                }
            }

            let relation_id = self.hard_broken(store.get(id)).into_iter().min().expect("checked non-empty above");
            let children = self.branch_on_relation(&mut store, id, relation_id);
            if children.is_empty() {
                dead_ends.push(relation_id);
                continue;
            }
            for child_id in children {
                frontier.push(FrontierEntry {
                    score: store.get(child_id).score,
                    id: child_id,
                });
            }
        }

        (store, ResolveOutcome::Failed(ResolveError::Unsolvable { dead_ends }))
    }

    /// Set `id` present and every other member of its conflict family
    /// absent, so "at most one version of a package" (spec §4.A) holds by
    /// construction rather than by the caller remembering to clear
    /// siblings.
    fn select(&mut self, solution: &mut Solution, id: Id<Element>) {
        let family = self.graph.conflict_family(id);
        for member in family {
            if member != id {
                solution.set_presence(member, false);
            }
        }
        solution.set_presence(id, true);
    }

    /// Hard (non-soft) relation elements still broken in `solution`,
    /// smallest id first.
    fn hard_broken(&self, solution: &Solution) -> Vec<Id<Element>> {
        let mut broken: Vec<Id<Element>> = solution
            .broken_successors()
            .into_iter()
            .filter(|&id| match self.graph.element(id) {
                Element::Relation(r) => !r.kind.is_soft(),
                _ => false,
            })
            .collect();
        broken.sort_unstable();
        broken
    }

    /// The conflict targets of a version element: the directly-linked
    /// version elements an anti-relation clause names (spec §4.A).
    fn conflict_targets(&self, version_element: Id<Element>) -> Vec<Id<Element>> {
        self.graph
            .successors(version_element)
            .iter()
            .copied()
            .filter(|&id| matches!(self.graph.element(id), Element::Version(_)))
            .collect()
    }

    fn conflicts_with_present(&self, solution: &Solution, candidate: Id<Element>) -> bool {
        let forward = self.conflict_targets(candidate);
        if forward.iter().any(|&t| solution.is_present(t)) {
            return true;
        }
        solution
            .present_elements()
            .into_iter()
            .any(|present| self.conflict_targets(present).contains(&candidate))
    }

    /// Branch `parent` on `relation_id`, one child per viable satisfier.
    /// Anti-relations (conflicts/breaks) are repaired separately: their
    /// "satisfiers" are exactly the packages that must not coexist with the
    /// dependant, so installing one would make the conflict worse, not
    /// better (spec §4.E: "for anti-relations, the roles swap").
    fn branch_on_relation(
        &mut self,
        store: &mut SolutionStore,
        parent: Id<Solution>,
        relation_id: Id<Element>,
    ) -> Vec<Id<Solution>> {
        let Element::Relation(relation) = self.graph.element(relation_id).clone() else {
            return Vec::new();
        };
        if relation.kind.is_anti() {
            return self.repair_conflict(store, parent, relation_id, &relation);
        }

        self.graph.unfold(relation_id);
        let satisfiers = self.graph.successors(relation_id).to_vec();
        let parent_solution = store.get(parent).clone();

        if satisfiers.iter().any(|&s| parent_solution.is_present(s)) {
            let mut child = parent_solution.branch(relation_id, 0.0);
            child.clear_broken(relation_id);
            return vec![store_branch_with(store, parent, child)];
        }

        let mut children = Vec::new();
        for &candidate in &satisfiers {
            if parent_solution.is_rejected_conflictor(candidate) {
                continue;
            }
            if self.conflicts_with_present(&parent_solution, candidate) {
                continue;
            }
            let delta = self.score_for_selection(candidate);
            let mut child = parent_solution.branch(relation_id, delta);
            self.select(&mut child, candidate);
            child.clear_broken(relation_id);
            self.schedule_successors(&mut child, candidate);
            child.set_reason(DecisionReason::DependencyOn { relation: relation_id, selected: candidate });
            self.recompute_anti_relations(&mut child);
            children.push(store_branch_with(store, parent, child));
        }
        children
    }

    /// Repair a broken conflict/breaks relation by varying the dependant's
    /// own conflict family — removing it or swapping it for another of its
    /// versions — rather than by installing the conflictor, which is the
    /// one thing a conflict forbids.
    fn repair_conflict(
        &mut self,
        store: &mut SolutionStore,
        parent: Id<Solution>,
        relation_id: Id<Element>,
        relation: &RelationElement,
    ) -> Vec<Id<Solution>> {
        let dependant = relation.dependant;
        let parent_solution = store.get(parent).clone();
        let family = self.graph.conflict_family(dependant);

        let mut children = Vec::new();
        for candidate in family {
            if candidate == dependant {
                continue;
            }
            if parent_solution.is_rejected_conflictor(candidate) {
                continue;
            }
            let mut trial = parent_solution.clone();
            self.select(&mut trial, candidate);
            if self.conflicts_with_present(&trial, candidate) {
                continue;
            }

            let delta = self.score_for_selection(candidate);
            let mut child = parent_solution.branch(relation_id, delta);
            self.select(&mut child, candidate);
            child.clear_broken(relation_id);
            self.schedule_successors(&mut child, candidate);
            child.set_reason(DecisionReason::DependencyOn { relation: relation_id, selected: candidate });
            self.recompute_anti_relations(&mut child);
            children.push(store_branch_with(store, parent, child));
        }
        children
    }

    /// Unfold `element` and schedule its relation successors on
    /// `solution`: hard ones are marked broken, anti-relations are
    /// evaluated against what's already present, soft ones are resolved
    /// immediately (satisfied, or scored and dropped).
    fn schedule_successors(&mut self, solution: &mut Solution, element: Id<Element>) {
        self.graph.unfold(element);
        for successor in self.graph.successors(element).to_vec() {
            let Element::Relation(relation) = self.graph.element(successor).clone() else {
                continue;
            };
            if relation.kind.is_soft() {
                self.graph.unfold(successor);
                let satisfiers = self.graph.successors(successor).to_vec();
                let already_satisfied = satisfiers.iter().any(|&s| solution.is_present(s));
                if !already_satisfied {
                    let penalty = match relation.kind {
                        DependencyKind::Recommends => ScoreEvent::UnsatisfiedRecommends,
                        DependencyKind::Suggests => ScoreEvent::UnsatisfiedSuggests,
                        _ => unreachable!("is_soft only matches Recommends/Suggests"),
                    };
                    solution.score += self.scores.delta(penalty);
                }
            } else if relation.kind.is_anti() {
                self.schedule_anti_relation(solution, successor);
            } else {
                solution.mark_broken(successor);
            }
        }
    }

    /// A conflict/breaks relation is broken only while one of its
    /// conflictors is actually present; otherwise it's vacuously satisfied.
    fn schedule_anti_relation(&mut self, solution: &mut Solution, relation_id: Id<Element>) {
        self.graph.unfold(relation_id);
        let conflictors = self.graph.successors(relation_id).to_vec();
        if conflictors.iter().any(|&c| solution.is_present(c)) {
            solution.mark_broken(relation_id);
        } else {
            solution.clear_broken(relation_id);
        }
    }

    /// Re-check every anti-relation reachable from what's currently
    /// present, e.g. after a branch changes which versions are selected.
    fn recompute_anti_relations(&mut self, solution: &mut Solution) {
        for present in solution.present_elements() {
            for successor in self.graph.successors(present).to_vec() {
                if matches!(self.graph.element(successor), Element::Relation(r) if r.kind.is_anti()) {
                    self.schedule_anti_relation(solution, successor);
                }
            }
        }
    }

    fn score_for_selection(&self, candidate: Id<Element>) -> f64 {
        let Element::Version(v) = self.graph.element(candidate).clone() else {
            return 0.0;
        };
        let Some(version_key) = &v.version else {
            return self.scores.delta(ScoreEvent::Removal);
        };
        let version = depot_core::Version::parse(version_key.0.clone()).expect("interned version keys always parse");
        let pin = self.cache.pin(&v.package, &version);
        let mut delta = self.scores.delta(ScoreEvent::VersionWeight(pin));
        match self.cache.binary_package(&v.package).and_then(|p| p.installed_version()) {
            None => delta += self.scores.delta(ScoreEvent::NewInstall),
            Some(installed) if installed < &version => delta += self.scores.delta(ScoreEvent::Upgrade),
            Some(installed) if installed > &version => delta += self.scores.delta(ScoreEvent::Downgrade),
            Some(_) => {}
        }
        delta
    }

    /// Whether `package` is eligible for automatic removal in `solution`,
    /// consulting the auto-removal oracle.
    #[must_use]
    pub fn may_auto_remove(&self, package: &depot_core::PackageName, is_essential: bool, has_reverse_dependants: bool) -> bool {
        self.autoremoval.may_remove(package, is_essential, has_reverse_dependants)
    }

    /// Whether `candidate` still has a hard (non-soft, non-anti) reverse
    /// dependant present in `solution` — the structural half of spec
    /// §4.D's "no remaining dependants" condition.
    fn has_hard_reverse_dependants(&self, solution: &Solution, candidate: Id<Element>) -> bool {
        self.graph.predecessors(candidate).iter().any(|&pred| match self.graph.element(pred) {
            Element::Relation(r) => !r.kind.is_soft() && !r.kind.is_anti() && solution.is_present(r.dependant),
            _ => false,
        })
    }

    /// Before delivering a solution, repeatedly drop orphaned
    /// automatically-installed packages until a fixpoint (spec §4.E,
    /// component D). Iterates rather than recursing since removing one
    /// package can orphan another.
    fn auto_remove_pass(&mut self, store: &mut SolutionStore, mut current: Id<Solution>) -> Id<Solution> {
        loop {
            let solution = store.get(current).clone();
            let mut candidate = None;
            for id in solution.present_elements() {
                let Element::Version(v) = self.graph.element(id).clone() else {
                    continue;
                };
                let Some(version_key) = &v.version else {
                    continue;
                };
                if !self.cache.is_automatically_installed(&v.package) {
                    continue;
                }
                let has_reverse = self.has_hard_reverse_dependants(&solution, id);
                if has_reverse {
                    continue;
                }
                let version = depot_core::Version::parse(version_key.0.clone()).expect("interned version keys always parse");
                let is_essential = self.cache.binary_package(&v.package).is_some_and(|p| p.is_essential(&version));
                if self.may_auto_remove(&v.package, is_essential, has_reverse) {
                    candidate = Some((id, v.package.clone()));
                    break;
                }
            }

            let Some((id, package)) = candidate else {
                return current;
            };
            let empty_id = self.graph.get_or_create_version_element(&package, None);
            let delta = self.score_for_selection(empty_id);
            let mut child = solution.branch(id, delta);
            self.select(&mut child, empty_id);
            child.set_reason(DecisionReason::AutoRemoval);
            self.recompute_anti_relations(&mut child);
            current = store_branch_with(store, current, child);
        }
    }
}

fn store_branch_with(store: &mut SolutionStore, parent: Id<Solution>, mut prepared: Solution) -> Id<Solution> {
    prepared.parent = Some(parent);
    let decision = prepared.introduced_by.expect("branch() always sets introduced_by");
    let delta = prepared.score - store.get(parent).score;
    let id = store.branch(parent, decision, delta);
    *store.get_mut(id) = prepared;
    id
}
