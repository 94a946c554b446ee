//! The vertex type of the dependency graph (spec §3 "Element").
//!
//! Three variants, matching §3 exactly: a concrete (package, version)
//! choice (including the distinguished "no version / removed" choice per
//! package), a normalized relation clause tied to a dependant version, and
//! an optional synchronization constraint tying same-source binaries
//! together. Elements are immutable after construction; only their
//! unfolded-successor state (tracked in `Graph`, not here) changes.

use depot_core::{PackageName, Version};

use crate::arena::Id;

/// The kind of dependency line a [`RelationElement`] came from.
///
/// Ordered pre-depends > depends > conflicts > breaks for the purposes of
/// breakage-priority comparisons (spec §4.E rule 3); recommends/suggests
/// are soft and compared separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    /// Must be satisfied and unpacked before the dependant is unpacked.
    PreDepends,
    /// Must be satisfied for the dependant to be considered correctly
    /// installed.
    Depends,
    /// Soft: should be installed in all but unusual cases.
    Recommends,
    /// Soft: may be useful together with the dependant.
    Suggests,
    /// Anti-relation: the dependant and a satisfier may not both be
    /// selected.
    Conflicts,
    /// Anti-relation, weaker timing guarantee than conflicts.
    Breaks,
}

impl DependencyKind {
    /// Conflicts and breaks invert the edge semantics: satisfying the
    /// clause means *excluding* candidates rather than selecting one.
    #[must_use]
    pub const fn is_anti(self) -> bool {
        matches!(self, Self::Conflicts | Self::Breaks)
    }

    /// Soft relations (recommends/suggests) never invalidate a solution;
    /// they only cost score when broken.
    #[must_use]
    pub const fn is_soft(self) -> bool {
        matches!(self, Self::Recommends | Self::Suggests)
    }

    /// Relative priority among hard dependency kinds, highest first, used
    /// by the breakage-priority ordering (spec §4.E rule 3). Lower number
    /// sorts first (higher priority).
    #[must_use]
    pub const fn hard_rank(self) -> u8 {
        match self {
            Self::PreDepends => 0,
            Self::Depends => 1,
            Self::Conflicts => 2,
            Self::Breaks => 3,
            Self::Recommends => 4,
            Self::Suggests => 5,
        }
    }
}

/// A concrete (package, version) choice, or the distinguished "removed"
/// choice for a package when `version` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionElement {
    /// The package this choice is for.
    pub package: PackageName,
    /// `None` marks the "no version selected" choice.
    pub version: Option<VersionKey>,
}

/// A hashable, orderable stand-in for `depot_core::Version` used as an
/// interning/comparison key. `Version`'s `Eq` follows dpkg-equality
/// (`"1.0"` == `"1.0-0"`), which is unsound to combine with `Hash` on the
/// raw string; elements instead key on the literal string the cache handed
/// back, which is always exactly reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VersionKey(pub String);

impl VersionKey {
    /// Build a key from a parsed version's canonical string form.
    #[must_use]
    pub fn new(version: &Version) -> Self {
        Self(version.as_str().to_string())
    }
}

/// A normalized relation clause tied to one dependant version (spec §3's
/// "Relation element").
#[derive(Debug, Clone)]
pub struct RelationElement {
    /// The version element whose dependency line this clause came from.
    pub dependant: Id<Element>,
    /// Which dependency line (depends, recommends, conflicts, ...).
    pub kind: DependencyKind,
    /// The literal relation expression (one clause, possibly with `|`
    /// alternatives), as written in the dependant's dependency line.
    pub clause: depot_core::RelationExpr,
}

/// Ties binary packages built from the same source to a common source
/// version (spec §3, optional feature; spec §4.E "Synchronization pass").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SynchronizationElement {
    /// The source package name all members must agree on.
    pub source_package: PackageName,
    /// The source version the constraint pins members to.
    pub source_version: VersionKey,
}

/// The dependency graph's vertex type (spec §3).
#[derive(Debug, Clone)]
pub enum Element {
    /// A (package, version) choice.
    Version(VersionElement),
    /// A dependency clause tied to a specific dependant version.
    Relation(RelationElement),
    /// A same-source-version constraint.
    Synchronization(SynchronizationElement),
}

impl Element {
    /// The package this element most directly concerns, where that makes
    /// sense (used for deterministic tie-breaking in the search engine).
    #[must_use]
    pub fn package_name(&self) -> Option<&PackageName> {
        match self {
            Self::Version(v) => Some(&v.package),
            Self::Relation(_) | Self::Synchronization(_) => None,
        }
    }

    /// True if this is the "package not installed / removed" choice.
    #[must_use]
    pub const fn is_empty_version(&self) -> bool {
        matches!(self, Self::Version(VersionElement { version: None, .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hard_rank_orders_pre_depends_first() {
        assert!(DependencyKind::PreDepends.hard_rank() < DependencyKind::Depends.hard_rank());
        assert!(DependencyKind::Depends.hard_rank() < DependencyKind::Conflicts.hard_rank());
        assert!(DependencyKind::Conflicts.hard_rank() < DependencyKind::Breaks.hard_rank());
    }

    #[test]
    fn conflicts_and_breaks_are_anti_relations() {
        assert!(DependencyKind::Conflicts.is_anti());
        assert!(DependencyKind::Breaks.is_anti());
        assert!(!DependencyKind::Depends.is_anti());
    }

    #[test]
    fn recommends_and_suggests_are_soft() {
        assert!(DependencyKind::Recommends.is_soft());
        assert!(DependencyKind::Suggests.is_soft());
        assert!(!DependencyKind::PreDepends.is_soft());
    }

    #[test]
    fn empty_version_element_detected() {
        let el = Element::Version(VersionElement {
            package: PackageName::parse("libfoo").unwrap(),
            version: None,
        });
        assert!(el.is_empty_version());
    }
}
