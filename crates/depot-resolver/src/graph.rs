//! Dependency Graph Builder (spec §4.A, component A).
//!
//! Expands the graph around an element on demand. Elements are interned
//! (equality is identity, per spec §3); unfolding is at-most-once per
//! element, guarded by a `seen` set rather than mutating the element
//! itself, since elements are immutable once built (spec §9).

use ahash::{AHashMap, AHashSet};
use depot_core::{PackageName, RelationExpr, Version};

use crate::arena::{Arena, Id};
use crate::cache::Cache;
use crate::element::{
    DependencyKind, Element, RelationElement, SynchronizationElement, VersionElement, VersionKey,
};

/// All dependency kinds checked when unfolding a version element, in the
/// order their dependency lines are read. Order here has no semantic
/// effect; breakage priority is recomputed from `DependencyKind::hard_rank`
/// wherever it matters.
const ALL_KINDS: [DependencyKind; 6] = [
    DependencyKind::PreDepends,
    DependencyKind::Depends,
    DependencyKind::Recommends,
    DependencyKind::Suggests,
    DependencyKind::Conflicts,
    DependencyKind::Breaks,
];

/// Owns every [`Element`] created during one resolve call and the edges
/// between them.
pub struct Graph<'c> {
    cache: &'c dyn Cache,
    elements: Arena<Element>,
    version_index: AHashMap<(PackageName, Option<VersionKey>), Id<Element>>,
    relation_index: AHashMap<(Id<Element>, DependencyKind, String), Id<Element>>,
    sync_index: AHashMap<(PackageName, VersionKey), Id<Element>>,
    successors: AHashMap<Id<Element>, Vec<Id<Element>>>,
    predecessors: AHashMap<Id<Element>, Vec<Id<Element>>>,
    conflict_families: AHashMap<PackageName, Vec<Id<Element>>>,
    unfolded: AHashSet<Id<Element>>,
}

impl<'c> Graph<'c> {
    /// An empty graph backed by `cache`.
    #[must_use]
    pub fn new(cache: &'c dyn Cache) -> Self {
        Self {
            cache,
            elements: Arena::new(),
            version_index: AHashMap::new(),
            relation_index: AHashMap::new(),
            sync_index: AHashMap::new(),
            successors: AHashMap::new(),
            predecessors: AHashMap::new(),
            conflict_families: AHashMap::new(),
            unfolded: AHashSet::new(),
        }
    }

    /// Read an element by id.
    #[must_use]
    pub fn element(&self, id: Id<Element>) -> &Element {
        &self.elements[id]
    }

    /// Idempotently intern the (package, version) choice, interning every
    /// sibling choice (including the empty one) into the same conflict
    /// family the first time the family is touched.
    pub fn get_or_create_version_element(
        &mut self,
        package: &PackageName,
        version: Option<&Version>,
    ) -> Id<Element> {
        self.ensure_conflict_family(package);
        let key = version.map(VersionKey::new);
        self.version_index[&(package.clone(), key)]
    }

    /// Materialize the full conflict family for `package` (every known
    /// version plus the empty choice) the first time it's referenced.
    fn ensure_conflict_family(&mut self, package: &PackageName) -> &[Id<Element>] {
        if !self.conflict_families.contains_key(package) {
            let mut members = Vec::new();

            let empty_id = self.elements.alloc(Element::Version(VersionElement {
                package: package.clone(),
                version: None,
            }));
            self.version_index.insert((package.clone(), None), empty_id);
            members.push(empty_id);

            if let Some(binary_package) = self.cache.binary_package(package) {
                for version in binary_package.versions() {
                    let key = VersionKey::new(version);
                    let id = self.elements.alloc(Element::Version(VersionElement {
                        package: package.clone(),
                        version: Some(key.clone()),
                    }));
                    self.version_index.insert((package.clone(), Some(key)), id);
                    members.push(id);
                }
            }

            self.conflict_families.insert(package.clone(), members);
        }
        &self.conflict_families[package]
    }

    /// Idempotently intern a relation element tied to `dependant`.
    pub fn get_or_create_relation_element(
        &mut self,
        dependant: Id<Element>,
        kind: DependencyKind,
        clause: RelationExpr,
    ) -> Id<Element> {
        let clause_key = clause.to_string();
        if let Some(&id) = self.relation_index.get(&(dependant, kind, clause_key.clone())) {
            return id;
        }
        let id = self.elements.alloc(Element::Relation(RelationElement {
            dependant,
            kind,
            clause,
        }));
        self.relation_index.insert((dependant, kind, clause_key), id);
        id
    }

    fn get_or_create_sync_element(&mut self, source_package: &PackageName, source_version: &Version) -> Id<Element> {
        let key = VersionKey::new(source_version);
        if let Some(&id) = self.sync_index.get(&(source_package.clone(), key.clone())) {
            return id;
        }
        let id = self.elements.alloc(Element::Synchronization(SynchronizationElement {
            source_package: source_package.clone(),
            source_version: key.clone(),
        }));
        self.sync_index.insert((source_package.clone(), key), id);
        id
    }

    /// Ensure `id`'s successors (and, for anti-relations, direct conflict
    /// edges) are materialized. A no-op on the second and later call
    /// (spec §8 property 7: idempotence of unfolding).
    pub fn unfold(&mut self, id: Id<Element>) {
        if self.unfolded.contains(&id) {
            return;
        }
        self.unfolded.insert(id);

        match self.elements[id].clone() {
            Element::Version(v) => self.unfold_version(id, &v),
            Element::Relation(r) => self.unfold_relation(id, &r),
            Element::Synchronization(_) => {
                // Synchronization elements have no outgoing edges of their own;
                // membership is recomputed by the search engine's sync pass.
            }
        }
    }

    fn unfold_version(&mut self, id: Id<Element>, v: &VersionElement) {
        let Some(key) = &v.version else {
            // The empty choice has no outgoing dependency edges (spec §4.A).
            return;
        };
        let version = Version::parse(key.0.clone()).expect("version keys are always valid versions");
        let Some(binary_package) = self.cache.binary_package(&v.package) else {
            return;
        };

        for &kind in &ALL_KINDS {
            let Some(line) = binary_package.relations(&version, kind) else {
                continue;
            };
            for clause in line.0.clone() {
                let relation_id = self.get_or_create_relation_element(id, kind, clause.clone());
                self.add_edge(id, relation_id);

                if kind.is_anti() {
                    for (pkg, sat_version) in self.cache.satisfying_versions(&clause) {
                        if pkg == v.package {
                            // A package cannot directly conflict with itself;
                            // this is the exclusion spec §4.A alludes to.
                            continue;
                        }
                        let sat_id = self.get_or_create_version_element(&pkg, Some(&sat_version));
                        self.add_edge(id, sat_id);
                    }
                }
            }
        }

        if let Some((source_package, source_version)) = binary_package.source(&version) {
            let sync_id = self.get_or_create_sync_element(source_package, source_version);
            self.add_edge(id, sync_id);
        }
    }

    fn unfold_relation(&mut self, id: Id<Element>, r: &RelationElement) {
        for (pkg, version) in self.cache.satisfying_versions(&r.clause) {
            let satisfier_id = self.get_or_create_version_element(&pkg, Some(&version));
            self.add_edge(id, satisfier_id);
        }
    }

    fn add_edge(&mut self, from: Id<Element>, to: Id<Element>) {
        self.successors.entry(from).or_default().push(to);
        self.predecessors.entry(to).or_default().push(from);
    }

    /// The materialized successors of `id`. Empty until `unfold(id)` has
    /// been called.
    #[must_use]
    pub fn successors(&self, id: Id<Element>) -> &[Id<Element>] {
        self.successors.get(&id).map_or(&[], Vec::as_slice)
    }

    /// The materialized predecessors of `id`.
    #[must_use]
    pub fn predecessors(&self, id: Id<Element>) -> &[Id<Element>] {
        self.predecessors.get(&id).map_or(&[], Vec::as_slice)
    }

    /// For a version element, every version element of the same package
    /// (including the empty choice); for anything else, `id` alone.
    #[must_use]
    pub fn conflict_family(&mut self, id: Id<Element>) -> Vec<Id<Element>> {
        match &self.elements[id] {
            Element::Version(v) => {
                let package = v.package.clone();
                self.ensure_conflict_family(&package).to_vec()
            }
            Element::Relation(_) | Element::Synchronization(_) => vec![id],
        }
    }

    /// Whether `id` is unsatisfiable: a relation element with no
    /// materialized successors after unfolding.
    #[must_use]
    pub fn is_unsatisfiable_relation(&self, id: Id<Element>) -> bool {
        matches!(self.elements[id], Element::Relation(_)) && self.successors(id).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{BinaryPackage, InstalledInfo};
    use depot_core::{RelationLine, Version};

    struct FakePackage {
        versions: Vec<Version>,
        depends: AHashMap<String, RelationLine>,
        installed: Option<Version>,
    }

    impl BinaryPackage for FakePackage {
        fn versions(&self) -> Vec<&Version> {
            self.versions.iter().collect()
        }

        fn relations(&self, version: &Version, kind: DependencyKind) -> Option<&RelationLine> {
            self.depends.get(&format!("{version}:{kind:?}"))
        }

        fn is_essential(&self, _version: &Version) -> bool {
            false
        }

        fn source(&self, _version: &Version) -> Option<(&PackageName, &Version)> {
            None
        }

        fn installed_version(&self) -> Option<&Version> {
            self.installed.as_ref()
        }
    }

    struct FakeCache {
        packages: AHashMap<PackageName, FakePackage>,
    }

    impl Cache for FakeCache {
        fn binary_package_names(&self) -> Vec<PackageName> {
            self.packages.keys().cloned().collect()
        }

        fn binary_package(&self, name: &PackageName) -> Option<&dyn BinaryPackage> {
            self.packages.get(name).map(|p| p as &dyn BinaryPackage)
        }

        fn satisfying_versions(&self, relation: &RelationExpr) -> Vec<(PackageName, Version)> {
            let mut out = Vec::new();
            for alt in &relation.0 {
                if let Some(pkg) = self.packages.get(&alt.package) {
                    for v in &pkg.versions {
                        if alt.is_satisfied_by(v) {
                            out.push((alt.package.clone(), v.clone()));
                        }
                    }
                }
            }
            out
        }

        fn pin(&self, _package: &PackageName, _version: &Version) -> i32 {
            500
        }

        fn is_automatically_installed(&self, _name: &PackageName) -> bool {
            false
        }

        fn installed_package_names(&self) -> Vec<PackageName> {
            self.packages
                .iter()
                .filter(|(_, p)| p.installed_version().is_some())
                .map(|(n, _)| n.clone())
                .collect()
        }

        fn installed_info(&self, name: &PackageName) -> Option<InstalledInfo> {
            self.packages.get(name).and_then(|p| {
                p.installed_version().map(|_| InstalledInfo {
                    correctly_installed: true,
                    automatically_installed: false,
                    held: false,
                })
            })
        }
    }

    fn name(s: &str) -> PackageName {
        PackageName::parse(s).unwrap()
    }

    fn version(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn fake_cache_with_a_depends_b() -> FakeCache {
        let mut depends = AHashMap::new();
        depends.insert(
            "1.0:Depends".to_string(),
            "libb".parse::<RelationLine>().unwrap(),
        );
        let mut packages = AHashMap::new();
        packages.insert(
            name("liba"),
            FakePackage {
                versions: vec![version("1.0")],
                depends,
                installed: None,
            },
        );
        packages.insert(
            name("libb"),
            FakePackage {
                versions: vec![version("1.0")],
                depends: AHashMap::new(),
                installed: None,
            },
        );
        FakeCache { packages }
    }

    #[test]
    fn unfold_version_materializes_relation_and_satisfier() {
        let cache = fake_cache_with_a_depends_b();
        let mut graph = Graph::new(&cache);
        let a = graph.get_or_create_version_element(&name("liba"), Some(&version("1.0")));
        graph.unfold(a);

        let succs = graph.successors(a).to_vec();
        assert_eq!(succs.len(), 1);
        let relation_id = succs[0];
        assert!(matches!(graph.element(relation_id), Element::Relation(_)));

        graph.unfold(relation_id);
        let satisfiers = graph.successors(relation_id).to_vec();
        assert_eq!(satisfiers.len(), 1);
        let b = graph.get_or_create_version_element(&name("libb"), Some(&version("1.0")));
        assert_eq!(satisfiers[0], b);
    }

    #[test]
    fn unfold_is_idempotent() {
        let cache = fake_cache_with_a_depends_b();
        let mut graph = Graph::new(&cache);
        let a = graph.get_or_create_version_element(&name("liba"), Some(&version("1.0")));
        graph.unfold(a);
        let first = graph.successors(a).to_vec();
        graph.unfold(a);
        let second = graph.successors(a).to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_choice_has_no_successors() {
        let cache = fake_cache_with_a_depends_b();
        let mut graph = Graph::new(&cache);
        let empty = graph.get_or_create_version_element(&name("liba"), None);
        graph.unfold(empty);
        assert!(graph.successors(empty).is_empty());
    }

    #[test]
    fn conflict_family_includes_empty_choice() {
        let cache = fake_cache_with_a_depends_b();
        let mut graph = Graph::new(&cache);
        let a = graph.get_or_create_version_element(&name("liba"), Some(&version("1.0")));
        let family = graph.conflict_family(a);
        assert_eq!(family.len(), 2); // 1.0 and the empty choice
    }

    #[test]
    fn unknown_package_relation_is_unsatisfiable() {
        let mut depends = AHashMap::new();
        depends.insert(
            "1.0:Depends".to_string(),
            "doesnotexist".parse::<RelationLine>().unwrap(),
        );
        let mut packages = AHashMap::new();
        packages.insert(
            name("liba"),
            FakePackage {
                versions: vec![version("1.0")],
                depends,
                installed: None,
            },
        );
        let cache = FakeCache { packages };
        let mut graph = Graph::new(&cache);
        let a = graph.get_or_create_version_element(&name("liba"), Some(&version("1.0")));
        graph.unfold(a);
        let relation_id = graph.successors(a)[0];
        graph.unfold(relation_id);
        assert!(graph.is_unsatisfiable_relation(relation_id));
    }
}
