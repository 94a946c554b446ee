//! Auto-Removal Oracle (spec §4.D, component D).
//!
//! Decides, for an installed-and-automatically-installed package with no
//! remaining dependants, whether the search engine is allowed to propose
//! removing it. Rule order is load-bearing and ported verbatim from
//! `examples/original_source/cpp/lib/src/internal/autoremovalpossibility.cpp`:
//! essential packages are never auto-removed, packages outside the
//! auto-remove target set are never touched, an explicit "never" pattern
//! wins over everything below it, and a "keep if still depended on"
//! pattern only applies when the package genuinely has no remaining
//! reverse-dependants.

use once_cell::sync::Lazy;
use regex::RegexSet;

use depot_core::PackageName;

/// The verdict for one candidate package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoRemovalVerdict {
    /// The package must not be auto-removed.
    No,
    /// The package may be auto-removed only if it has no remaining
    /// reverse-dependants.
    YesIfNoReverseDependants,
    /// The package may be auto-removed unconditionally.
    Yes,
}

/// Regex pattern sets controlling which packages are eligible at all
/// (§4.D's "auto-remove target set") and which are protected outright.
#[derive(Clone)]
pub struct AutoRemovalPolicy {
    target_set: RegexSet,
    never: RegexSet,
    keep_if_reverse_dependants: RegexSet,
}

fn empty_set() -> RegexSet {
    RegexSet::new(Vec::<&str>::new()).expect("an empty pattern list always compiles")
}

static DEFAULT_TARGET_SET: Lazy<RegexSet> =
    Lazy::new(|| RegexSet::new([r"^.*$"]).expect("catch-all pattern always compiles"));

impl Default for AutoRemovalPolicy {
    /// By default every automatically-installed package is eligible, none
    /// is protected by name, and none requires a reverse-dependants check
    /// beyond the structural one the oracle always performs.
    fn default() -> Self {
        Self {
            target_set: DEFAULT_TARGET_SET.clone(),
            never: empty_set(),
            keep_if_reverse_dependants: empty_set(),
        }
    }
}

impl AutoRemovalPolicy {
    /// Build a policy from explicit pattern lists (e.g. loaded from
    /// configuration).
    ///
    /// # Errors
    /// Returns an error if any pattern fails to compile as a regex.
    pub fn new(
        target_set: &[String],
        never: &[String],
        keep_if_reverse_dependants: &[String],
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            target_set: RegexSet::new(target_set)?,
            never: RegexSet::new(never)?,
            keep_if_reverse_dependants: RegexSet::new(keep_if_reverse_dependants)?,
        })
    }

    /// Decide the verdict for `package`, given whether it's essential,
    /// whether it's currently held, and whether it still has reverse
    /// dependants in the candidate solution.
    #[must_use]
    pub fn verdict(
        &self,
        package: &PackageName,
        is_essential: bool,
        has_reverse_dependants: bool,
    ) -> AutoRemovalVerdict {
        if is_essential {
            return AutoRemovalVerdict::No;
        }
        if !self.target_set.is_match(package.as_str()) {
            return AutoRemovalVerdict::No;
        }
        if self.never.is_match(package.as_str()) {
            return AutoRemovalVerdict::No;
        }
        if self.keep_if_reverse_dependants.is_match(package.as_str()) {
            return if has_reverse_dependants {
                AutoRemovalVerdict::No
            } else {
                AutoRemovalVerdict::Yes
            };
        }
        AutoRemovalVerdict::Yes
    }

    /// Whether `package` may be proposed for removal at all, folding the
    /// reverse-dependants check into a single boolean for callers that
    /// don't need the distinction (the search engine always knows
    /// `has_reverse_dependants` by the time it asks).
    #[must_use]
    pub fn may_remove(&self, package: &PackageName, is_essential: bool, has_reverse_dependants: bool) -> bool {
        matches!(
            self.verdict(package, is_essential, has_reverse_dependants),
            AutoRemovalVerdict::Yes
        ) || (matches!(
            self.verdict(package, is_essential, has_reverse_dependants),
            AutoRemovalVerdict::YesIfNoReverseDependants
        ) && !has_reverse_dependants)
    }
}
