//! Benchmarks the search engine over a small synthetic package chain,
//! the same shape as `libretto-resolver`'s own `resolver_bench` (one
//! package depending on the next, N deep) adapted to Debian-style
//! relations.

use ahash::AHashMap;
use criterion::{criterion_group, criterion_main, Criterion};

use depot_core::{PackageName, RelationLine, Version};
use depot_resolver::{AutoRemovalPolicy, BinaryPackage, Cache, InstalledInfo, ScoreManager, SearchEngine};

struct ChainPackage {
    versions: Vec<Version>,
    depends: Option<RelationLine>,
}

impl BinaryPackage for ChainPackage {
    fn versions(&self) -> Vec<&Version> {
        self.versions.iter().collect()
    }

    fn relations(&self, _version: &Version, kind: depot_resolver::DependencyKind) -> Option<&RelationLine> {
        matches!(kind, depot_resolver::DependencyKind::Depends)
            .then_some(())
            .and(self.depends.as_ref())
    }

    fn is_essential(&self, _version: &Version) -> bool {
        false
    }

    fn source(&self, _version: &Version) -> Option<(&PackageName, &Version)> {
        None
    }

    fn installed_version(&self) -> Option<&Version> {
        None
    }
}

struct ChainCache {
    packages: AHashMap<PackageName, ChainPackage>,
}

impl ChainCache {
    fn new(depth: usize) -> Self {
        let mut packages = AHashMap::new();
        for i in 0..depth {
            let name = PackageName::parse(format!("pkg{i:04}")).unwrap();
            let depends = (i + 1 < depth).then(|| {
                format!("pkg{:04}", i + 1).parse::<RelationLine>().unwrap()
            });
            packages.insert(
                name,
                ChainPackage {
                    versions: vec![Version::parse("1.0").unwrap()],
                    depends,
                },
            );
        }
        Self { packages }
    }
}

impl Cache for ChainCache {
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
        Vec::new()
    }

    fn installed_info(&self, _name: &PackageName) -> Option<InstalledInfo> {
        None
    }
}

fn bench_chain(c: &mut Criterion) {
    let cache = ChainCache::new(50);
    c.bench_function("resolve_50_deep_chain", |b| {
        b.iter(|| {
            let mut engine = SearchEngine::new(&cache, ScoreManager::new(), AutoRemovalPolicy::default(), 100_000);
            let root = PackageName::parse("pkg0000").unwrap();
            let version = Version::parse("1.0").unwrap();
            let goal = engine.graph_mut().get_or_create_version_element(&root, Some(&version));
            let (_store, outcome) = engine.resolve(&[goal]);
            assert!(outcome.is_solved());
        });
    });
}

criterion_group!(benches, bench_chain);
criterion_main!(benches);
