//! Pin-priority configuration (spec §6's `Cache::pin`).
//!
//! Mirrors apt/cupt pin semantics loosely: the currently installed version
//! gets a high default priority so the resolver doesn't churn reinstalls,
//! everything else gets a plain default, and per-package overrides can be
//! layered on top.

use ahash::AHashMap;

use depot_core::PackageName;

/// Default priority for a version that isn't the installed one.
pub const DEFAULT_PRIORITY: i32 = 500;
/// Default priority for the currently installed version.
pub const INSTALLED_PRIORITY: i32 = 990;

/// Per-package pin overrides, consulted before the installed/default
/// fallback.
#[derive(Debug, Clone, Default)]
pub struct PinPriorities {
    overrides: AHashMap<PackageName, i32>,
}

impl PinPriorities {
    /// No overrides configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin `package` to `priority`, overriding the installed/default
    /// fallback for every version of it.
    pub fn set(&mut self, package: PackageName, priority: i32) {
        self.overrides.insert(package, priority);
    }

    /// The configured override for `package`, if any.
    #[must_use]
    pub fn get(&self, package: &PackageName) -> Option<i32> {
        self.overrides.get(package).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_is_returned_once_set() {
        let mut pins = PinPriorities::new();
        let name = PackageName::parse("libfoo").unwrap();
        assert_eq!(pins.get(&name), None);
        pins.set(name.clone(), 100);
        assert_eq!(pins.get(&name), Some(100));
    }
}
