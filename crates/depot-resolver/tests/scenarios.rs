//! End-to-end scenarios against the public `Resolver` interface (spec §8's
//! literal scenarios 1, 5 and 6; scenarios 2-4 are covered by
//! `src/search.rs`'s nested tests, which already exercise the engine one
//! level below `Resolver`).

use ahash::AHashMap;

use depot_core::{PackageName, RelationLine, Version};
use depot_resolver::{
    BinaryPackage, Cache, Decision, DependencyKind, Importance, InstalledInfo, Reason, Resolution, Resolver,
};

struct FakeVersion {
    version: Version,
    depends: Option<RelationLine>,
    pin: i32,
}

struct FakePackage {
    versions: Vec<FakeVersion>,
    installed: Option<Version>,
    automatic: bool,
}

impl BinaryPackage for FakePackage {
    fn versions(&self) -> Vec<&Version> {
        self.versions.iter().map(|v| &v.version).collect()
    }

    fn relations(&self, version: &Version, kind: DependencyKind) -> Option<&RelationLine> {
        if !matches!(kind, DependencyKind::Depends | DependencyKind::PreDepends) {
            return None;
        }
        self.versions.iter().find(|v| &v.version == version).and_then(|v| v.depends.as_ref())
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

    fn satisfying_versions(&self, relation: &depot_core::RelationExpr) -> Vec<(PackageName, Version)> {
        let mut out = Vec::new();
        for alt in &relation.0 {
            if let Some(pkg) = self.packages.get(&alt.package) {
                for v in &pkg.versions {
                    if alt.is_satisfied_by(&v.version) {
                        out.push((alt.package.clone(), v.version.clone()));
                    }
                }
            }
        }
        out.sort_by(|a, b| {
            let pin_a = self.pin(&a.0, &a.1);
            let pin_b = self.pin(&b.0, &b.1);
            pin_b.cmp(&pin_a).then_with(|| b.1.cmp(&a.1))
        });
        out
    }

    fn pin(&self, package: &PackageName, version: &Version) -> i32 {
        self.packages
            .get(package)
            .and_then(|p| p.versions.iter().find(|v| &v.version == version))
            .map_or(500, |v| v.pin)
    }

    fn is_automatically_installed(&self, name: &PackageName) -> bool {
        self.packages.get(name).is_some_and(|p| p.automatic)
    }

    fn installed_package_names(&self) -> Vec<PackageName> {
        self.packages.iter().filter(|(_, p)| p.installed_version().is_some()).map(|(n, _)| n.clone()).collect()
    }

    fn installed_info(&self, name: &PackageName) -> Option<InstalledInfo> {
        self.packages.get(name).and_then(|p| {
            p.installed_version().map(|_| InstalledInfo {
                correctly_installed: true,
                automatically_installed: p.automatic,
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

fn plain(v: &str, pin: i32) -> FakeVersion {
    FakeVersion { version: version(v), depends: None, pin }
}

/// Scenario 1 — trivial install: `a` has `1.0`/`2.0`, nothing installed,
/// `satisfyRelationExpression("a")` should land on the newest version.
#[test]
fn trivial_install_picks_the_newest_version() {
    let mut packages = AHashMap::new();
    packages.insert(
        name("a"),
        FakePackage { versions: vec![plain("1.0", 500), plain("2.0", 500)], installed: None, automatic: false },
    );
    let cache = FakeCache { packages };
    let mut resolver = Resolver::new(&cache);
    resolver.satisfy_relation_expression("a".parse().unwrap(), false, Importance::Must);

    let resolution = resolver.resolve(|_store, _solution, _graph, _suggested| Decision::Accept);
    match resolution {
        Resolution::Accepted { score, .. } => assert!(score.is_finite()),
        other => panic!("expected Accepted, got {other:?}"),
    }
}

/// Scenario 5 — auto-removal: `tool 1.0` (manual) depends on `libhelper`
/// (auto-installed); removing `tool` should pull `libhelper` out with it.
#[test]
fn removing_a_manual_package_auto_removes_its_orphaned_dependency() {
    let mut packages = AHashMap::new();
    packages.insert(
        name("tool"),
        FakePackage {
            versions: vec![FakeVersion {
                version: version("1.0"),
                depends: Some("libhelper".parse().unwrap()),
                pin: 990,
            }],
            installed: Some(version("1.0")),
            automatic: false,
        },
    );
    packages.insert(
        name("libhelper"),
        FakePackage { versions: vec![plain("1.0", 990)], installed: Some(version("1.0")), automatic: true },
    );
    let cache = FakeCache { packages };
    let mut resolver = Resolver::new(&cache).with_autoremoval(
        depot_resolver::AutoRemovalPolicy::new(&["libhelper".to_string()], &[], &[]).unwrap(),
    );
    resolver.remove_versions(name("tool"));

    let resolution = resolver.resolve(|_store, _solution, _graph, suggested| {
        let libhelper = suggested
            .iter()
            .find(|s| s.package == name("libhelper"))
            .expect("libhelper should still be present in the suggested-package map");
        assert_eq!(libhelper.version, None, "libhelper should have been auto-removed");
        assert!(
            libhelper.reasons.iter().any(|r| matches!(r, Reason::AutoRemoval)),
            "libhelper's removal should be explained by an auto-removal reason, got {:?}",
            libhelper.reasons
        );
        Decision::Accept
    });
    match resolution {
        Resolution::Accepted { .. } => {}
        other => panic!("expected Accepted, got {other:?}"),
    }
}

/// Scenario 6 — upgrade with pin tie: both `1.0` and `2.0` are pinned
/// `500`; an upgrade should still land on `2.0` (higher version string
/// wins the tie). With `2.0` absent from the cache, the same request must
/// keep `1.0`.
#[test]
fn upgrade_prefers_the_newer_version_on_a_pin_tie() {
    let mut packages = AHashMap::new();
    packages.insert(
        name("pkg"),
        FakePackage { versions: vec![plain("1.0", 500), plain("2.0", 500)], installed: Some(version("1.0")), automatic: false },
    );
    let cache = FakeCache { packages };
    let mut resolver = Resolver::new(&cache);
    resolver.upgrade(name("pkg"));

    let resolution = resolver.resolve(|store, solution, graph, _suggested| {
        let sol = store.get(solution);
        let picked = sol.present_elements().into_iter().find_map(|id| match graph.element(id) {
            depot_resolver::Element::Version(v) if v.package == name("pkg") => v.version.clone(),
            _ => None,
        });
        assert_eq!(picked.map(|k| k.0), Some("2.0".to_string()));
        Decision::Accept
    });
    assert!(matches!(resolution, Resolution::Accepted { .. }));
}

/// Same request, but `2.0` is no longer in the cache: the upgrade must
/// settle back on the only version left.
#[test]
fn upgrade_keeps_the_installed_version_when_nothing_newer_exists() {
    let mut packages = AHashMap::new();
    packages.insert(
        name("pkg"),
        FakePackage { versions: vec![plain("1.0", 500)], installed: Some(version("1.0")), automatic: false },
    );
    let cache = FakeCache { packages };
    let mut resolver = Resolver::new(&cache);
    resolver.upgrade(name("pkg"));

    let resolution = resolver.resolve(|store, solution, graph, _suggested| {
        let sol = store.get(solution);
        let picked = sol.present_elements().into_iter().find_map(|id| match graph.element(id) {
            depot_resolver::Element::Version(v) if v.package == name("pkg") => v.version.clone(),
            _ => None,
        });
        assert_eq!(picked.map(|k| k.0), Some("1.0".to_string()));
        Decision::Accept
    });
    assert!(matches!(resolution, Resolution::Accepted { .. }));
}
