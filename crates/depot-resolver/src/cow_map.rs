//! A copy-on-write layered map (spec §4.B/§9 open question 1).
//!
//! Each [`Solution`](crate::solution::Solution) owns one `CowMap`. Branching
//! a solution (to try an alternative at a decision point) clones a `CowMap`
//! in O(1) by sharing the parent's backing map behind an `Rc` and recording
//! only the entries the child overrides, rather than deep-copying the whole
//! entry set on every branch. Grounded on cupt's `solution.cpp`, which
//! layers sibling solutions the same way to keep backtracking cheap.

use std::rc::Rc;

use ahash::AHashMap;

/// A map overlay: a shared, immutable parent plus local overrides.
///
/// Reads check `overrides` first, falling back to `parent`. A value of
/// `None` in `overrides` records a deletion (shadowing a parent entry
/// without mutating it).
#[derive(Clone)]
pub struct CowMap<K, V> {
    parent: Option<Rc<CowMap<K, V>>>,
    overrides: AHashMap<K, Option<V>>,
}

impl<K, V> Default for CowMap<K, V>
where
    K: std::hash::Hash + Eq + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> CowMap<K, V>
where
    K: std::hash::Hash + Eq + Clone,
    V: Clone,
{
    /// An empty map with no parent.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: None,
            overrides: AHashMap::new(),
        }
    }

    /// Branch a child layer from `self`. O(1): `self` is moved behind an
    /// `Rc` and shared, not copied.
    #[must_use]
    pub fn branch(self) -> Self {
        Self {
            parent: Some(Rc::new(self)),
            overrides: AHashMap::new(),
        }
    }

    /// Look up `key`, checking local overrides before falling back to the
    /// parent chain.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        match self.overrides.get(key) {
            Some(Some(value)) => Some(value),
            Some(None) => None, // locally deleted
            None => self.parent.as_ref().and_then(|p| p.get(key)),
        }
    }

    /// Insert or overwrite `key` in this layer, leaving the parent chain
    /// untouched.
    pub fn insert(&mut self, key: K, value: V) {
        self.overrides.insert(key, Some(value));
    }

    /// Shadow `key` with a local deletion.
    pub fn remove(&mut self, key: &K) {
        self.overrides.insert(key.clone(), None);
    }

    /// Whether `key` resolves to a present value anywhere in the chain.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Materialize every visible `(key, value)` pair, most-local override
    /// winning. O(depth × size); intended for final-solution inspection,
    /// not the search hot path.
    #[must_use]
    pub fn flatten(&self) -> AHashMap<K, V> {
        let mut out = self
            .parent
            .as_ref()
            .map_or_else(AHashMap::new, |p| p.flatten());
        for (k, v) in &self.overrides {
            match v {
                Some(value) => {
                    out.insert(k.clone(), value.clone());
                }
                None => {
                    out.remove(k);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_sees_parent_entries() {
        let mut parent: CowMap<&str, i32> = CowMap::new();
        parent.insert("a", 1);
        let child = parent.branch();
        assert_eq!(child.get(&"a"), Some(&1));
    }

    #[test]
    fn child_override_does_not_mutate_parent() {
        let mut parent: CowMap<&str, i32> = CowMap::new();
        parent.insert("a", 1);
        let mut child = parent.clone().branch();
        child.insert("a", 2);
        assert_eq!(child.get(&"a"), Some(&2));
        assert_eq!(parent.get(&"a"), Some(&1));
    }

    #[test]
    fn child_can_shadow_delete_a_parent_entry() {
        let mut parent: CowMap<&str, i32> = CowMap::new();
        parent.insert("a", 1);
        let mut child = parent.branch();
        child.remove(&"a");
        assert_eq!(child.get(&"a"), None);
    }

    #[test]
    fn flatten_merges_the_whole_chain() {
        let mut root: CowMap<&str, i32> = CowMap::new();
        root.insert("a", 1);
        root.insert("b", 2);
        let mut mid = root.branch();
        mid.insert("b", 20);
        mid.remove(&"a");
        mid.insert("c", 3);
        let flat = mid.flatten();
        assert_eq!(flat.get("a"), None);
        assert_eq!(flat.get("b"), Some(&20));
        assert_eq!(flat.get("c"), Some(&3));
    }
}
