//! The read-only metadata contract the resolver consumes (spec §6, "Cache
//! contract"). Defined here, the consumer, and implemented by `depot-cache`
//! — the same direction the teacher takes with `pubgrub`'s
//! `DependencyProvider`, defined by the `pubgrub` crate and implemented by
//! whatever embeds it.

use depot_core::{PackageName, RelationExpr, RelationLine, Version};

/// A package as seen by the resolver: its known versions and whether one
/// of them is currently installed.
pub trait BinaryPackage {
    /// All versions known for this package, most-preferred pin first is
    /// not required; the resolver sorts by pin itself.
    fn versions(&self) -> Vec<&Version>;

    /// The dependency/conflict lines for one of this package's versions.
    ///
    /// Returns `None` if `version` is not one of this package's versions.
    fn relations(&self, version: &Version, kind: crate::element::DependencyKind) -> Option<&RelationLine>;

    /// Whether `version` carries the `Essential: yes` field.
    fn is_essential(&self, version: &Version) -> bool;

    /// The source package this binary version was built from, and that
    /// source's version, if known. `None` means source-less (e.g. a
    /// virtual or locally-built package) — such packages are exempt from
    /// the synchronization pass (spec §9 open question resolution).
    fn source(&self, version: &Version) -> Option<(&PackageName, &Version)>;

    /// The currently installed version of this package, if any.
    fn installed_version(&self) -> Option<&Version>;
}

/// Installed-package bookkeeping independent of package metadata (spec
/// §6's `systemState.installedInfo`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstalledInfo {
    /// Whether dpkg considers the package correctly configured.
    pub correctly_installed: bool,
    /// Whether the installation was requested automatically (as a
    /// dependency) rather than explicitly by the user.
    pub automatically_installed: bool,
    /// Whether the package is held back from automatic changes.
    pub held: bool,
}

/// The read-only contract the resolver consumes. The resolver never
/// mutates a `Cache` and never calls it from more than one thread at a
/// time (spec §5).
pub trait Cache {
    /// Every binary package name the cache knows about.
    fn binary_package_names(&self) -> Vec<PackageName>;

    /// Look up a package by name.
    fn binary_package(&self, name: &PackageName) -> Option<&dyn BinaryPackage>;

    /// Every version, across all packages, that would satisfy the given
    /// relation expression — expanding virtual packages and `Provides`
    /// internally. Order is not significant; the resolver sorts by pin.
    fn satisfying_versions(&self, relation: &RelationExpr) -> Vec<(PackageName, Version)>;

    /// The pin (preference weight) of a version; higher is more preferred.
    /// By convention a plain install candidate is pinned 500, the
    /// currently installed version 990, and anything from a
    /// higher-priority release channel higher still.
    fn pin(&self, package: &PackageName, version: &Version) -> i32;

    /// Whether `name`'s installation was recorded as automatic (a
    /// dependency, not a direct user request).
    fn is_automatically_installed(&self, name: &PackageName) -> bool;

    /// Every package name currently installed.
    fn installed_package_names(&self) -> Vec<PackageName>;

    /// Installed-state bookkeeping for `name`, if it is installed.
    fn installed_info(&self, name: &PackageName) -> Option<InstalledInfo>;
}
