//! In-memory package metadata cache implementing
//! [`depot_resolver::Cache`]/[`depot_resolver::BinaryPackage`] over a
//! [`PackageIndex`] parsed from Debian-control-style `Packages`/`status`
//! text (spec §6's "Cache contract").
//!
//! Read-only once built, matching the resolver's single-threaded,
//! non-mutating access contract (spec §5); `dashmap`/`parking_lot` are kept
//! from the teacher's stack for the same reason the teacher reaches for
//! them — fast concurrent reads — even though this crate's own resolve
//! path only ever borrows the cache from one thread at a time.

pub mod config;
pub mod fixture;
pub mod index;

use depot_core::{PackageName, RelationExpr, RelationLine, Version};
use depot_resolver::{BinaryPackage, Cache, DependencyKind, InstalledInfo};

pub use config::PinPriorities;
pub use fixture::{Scenario, ScenarioPackage, ScenarioRequest, ScenarioVersion};
pub use index::{IndexedPackage, IndexedVersion, PackageIndex};

impl BinaryPackage for IndexedPackage {
    fn versions(&self) -> Vec<&Version> {
        self.versions.iter().map(|v| &v.version).collect()
    }

    fn relations(&self, version: &Version, kind: DependencyKind) -> Option<&RelationLine> {
        self.versions
            .iter()
            .find(|v| &v.version == version)
            .and_then(|v| v.relations.get(&kind))
    }

    fn is_essential(&self, version: &Version) -> bool {
        self.versions
            .iter()
            .find(|v| &v.version == version)
            .is_some_and(|v| v.essential)
    }

    fn source(&self, version: &Version) -> Option<(&PackageName, &Version)> {
        self.versions
            .iter()
            .find(|v| &v.version == version)
            .and_then(|v| v.source.as_ref())
            .map(|(name, source_version)| (name, source_version))
    }

    fn installed_version(&self) -> Option<&Version> {
        self.installed_version.as_ref()
    }
}

/// The full read-only cache the resolver queries.
pub struct MetadataCache {
    index: PackageIndex,
    pins: PinPriorities,
}

impl MetadataCache {
    /// Build a cache over an already-parsed index, with no pin overrides.
    #[must_use]
    pub fn new(index: PackageIndex) -> Self {
        Self {
            index,
            pins: PinPriorities::new(),
        }
    }

    /// Attach pin-priority overrides.
    #[must_use]
    pub fn with_pins(mut self, pins: PinPriorities) -> Self {
        self.pins = pins;
        self
    }

    /// Expand `relation` against every package that provides a matching
    /// name; this cache doesn't model `Provides` (virtual packages) yet,
    /// so expansion is limited to the relation's named packages.
    fn expand(&self, relation: &RelationExpr) -> Vec<(PackageName, Version)> {
        let mut out = Vec::new();
        for alt in &relation.0 {
            if let Some(indexed) = self.index.packages.get(&alt.package) {
                for version in &indexed.versions {
                    if alt.is_satisfied_by(&version.version) {
                        out.push((alt.package.clone(), version.version.clone()));
                    }
                }
            }
        }
        out
    }
}

impl Cache for MetadataCache {
    fn binary_package_names(&self) -> Vec<PackageName> {
        self.index.packages.keys().cloned().collect()
    }

    fn binary_package(&self, name: &PackageName) -> Option<&dyn BinaryPackage> {
        self.index.packages.get(name).map(|p| p as &dyn BinaryPackage)
    }

    fn satisfying_versions(&self, relation: &RelationExpr) -> Vec<(PackageName, Version)> {
        self.expand(relation)
    }

    fn pin(&self, package: &PackageName, version: &Version) -> i32 {
        if let Some(priority) = self.pins.get(package) {
            return priority;
        }
        match self.index.packages.get(package).and_then(|p| p.installed_version.as_ref()) {
            Some(installed) if installed == version => config::INSTALLED_PRIORITY,
            _ => config::DEFAULT_PRIORITY,
        }
    }

    fn is_automatically_installed(&self, name: &PackageName) -> bool {
        self.index
            .packages
            .get(name)
            .is_some_and(|p| p.automatically_installed)
    }

    fn installed_package_names(&self) -> Vec<PackageName> {
        self.index
            .packages
            .iter()
            .filter(|(_, p)| p.installed_version.is_some())
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn installed_info(&self, name: &PackageName) -> Option<InstalledInfo> {
        self.index.packages.get(name).and_then(|p| {
            p.installed_version.as_ref().map(|_| InstalledInfo {
                correctly_installed: true,
                automatically_installed: p.automatically_installed,
                held: p.held,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_cache() -> MetadataCache {
        let mut index = PackageIndex::new();
        index
            .load_packages("Package: liba\nVersion: 1.0\nDepends: libb\n\nPackage: libb\nVersion: 1.0\n")
            .unwrap();
        index
            .load_status("Package: liba\nVersion: 1.0\nStatus: install ok installed\n")
            .unwrap();
        MetadataCache::new(index)
    }

    #[test]
    fn installed_version_gets_installed_priority() {
        let cache = sample_cache();
        let name = PackageName::parse("liba").unwrap();
        let version = Version::parse("1.0").unwrap();
        assert_eq!(cache.pin(&name, &version), config::INSTALLED_PRIORITY);
    }

    #[test]
    fn uninstalled_version_gets_default_priority() {
        let cache = sample_cache();
        let name = PackageName::parse("libb").unwrap();
        let version = Version::parse("1.0").unwrap();
        assert_eq!(cache.pin(&name, &version), config::DEFAULT_PRIORITY);
    }

    #[test]
    fn pin_override_wins_over_installed_priority() {
        let mut pins = PinPriorities::new();
        let name = PackageName::parse("liba").unwrap();
        pins.set(name.clone(), 42);
        let cache = sample_cache().with_pins(pins);
        assert_eq!(cache.pin(&name, &Version::parse("1.0").unwrap()), 42);
    }

    #[test]
    fn binary_package_exposes_relations() {
        let cache = sample_cache();
        let name = PackageName::parse("liba").unwrap();
        let package = cache.binary_package(&name).unwrap();
        let version = Version::parse("1.0").unwrap();
        assert!(package.relations(&version, DependencyKind::Depends).is_some());
    }

    #[test]
    fn satisfying_versions_filters_by_constraint() {
        let cache = sample_cache();
        let relation: RelationExpr = "libb (>= 2.0)".parse().unwrap();
        assert!(cache.satisfying_versions(&relation).is_empty());
        let relation: RelationExpr = "libb (>= 1.0)".parse().unwrap();
        assert_eq!(cache.satisfying_versions(&relation).len(), 1);
    }

    #[test]
    fn installed_package_names_reflects_status_overlay() {
        let cache = sample_cache();
        let names = cache.installed_package_names();
        assert_eq!(names, vec![PackageName::parse("liba").unwrap()]);
    }
}
