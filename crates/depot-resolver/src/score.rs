//! Score Manager (spec §4.C, component C).
//!
//! Every decision the search engine makes (selecting a version, removing a
//! package, leaving a soft dependency unsatisfied, ...) contributes a signed
//! delta to its solution's score; the frontier always expands the
//! highest-scoring solution first. Weights and short-codes are ported from
//! `examples/original_source/cpp/lib/src/internal/score.cpp`.

use std::fmt;

/// One scored event a decision can produce. A single decision (e.g.
/// choosing a version) can emit several of these (its own weight, plus a
/// removal/upgrade/downgrade classification relative to what was installed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreEvent {
    /// Selecting a version contributes its pin value directly.
    VersionWeight(i32),
    /// A package that was not installed before is now selected.
    NewInstall,
    /// A previously installed package is now removed.
    Removal,
    /// An essential package is removed — heavily penalized, never
    /// prevented outright (that's the auto-removal oracle's job).
    RemovalOfEssential,
    /// An automatically-installed package is removed as part of an
    /// auto-removal pass.
    RemovalOfAutoInstalled,
    /// A selected version is newer than the installed one.
    Upgrade,
    /// A selected version is older than the installed one.
    Downgrade,
    /// Penalty proportional to how far down its alternatives list a
    /// relation's chosen satisfier sits.
    PositionPenalty(u32),
    /// A `Recommends` clause could not be satisfied.
    UnsatisfiedRecommends,
    /// A `Suggests` clause could not be satisfied.
    UnsatisfiedSuggests,
    /// A user-requested "try" relation could not be satisfied.
    UnsatisfiedTry,
    /// A user-requested "wish" relation could not be satisfied.
    UnsatisfiedWish,
    /// A user-requested "must" relation could not be satisfied — the
    /// heaviest unsatisfied-request penalty short of outright failure.
    UnsatisfiedMust,
    /// A synchronization constraint (spec §4.A) could not be honored.
    FailedSync,
}

impl ScoreEvent {
    /// The short code cupt renders these under in its solution trace
    /// (`v`/`a`/`r`/`re`/`ra`/`u`/`d`/`pp`/`ur`/`us`/`ut`/`uw`/`uc`/`fs`),
    /// kept verbatim since spec §4.C names them.
    #[must_use]
    pub const fn short_code(self) -> &'static str {
        match self {
            Self::VersionWeight(_) => "v",
            Self::NewInstall => "a",
            Self::Removal => "r",
            Self::RemovalOfEssential => "re",
            Self::RemovalOfAutoInstalled => "ra",
            Self::Upgrade => "u",
            Self::Downgrade => "d",
            Self::PositionPenalty(_) => "pp",
            Self::UnsatisfiedRecommends => "ur",
            Self::UnsatisfiedSuggests => "us",
            Self::UnsatisfiedTry => "ut",
            Self::UnsatisfiedWish => "uw",
            Self::UnsatisfiedMust => "uc",
            Self::FailedSync => "fs",
        }
    }
}

/// The weights applied to each [`ScoreEvent`] kind, separate from the event
/// list itself so alternate tunings can be swapped in without touching the
/// decision-emitting code.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub new_install: f64,
    pub removal: f64,
    pub removal_of_essential: f64,
    pub removal_of_auto_installed: f64,
    pub upgrade: f64,
    pub downgrade: f64,
    pub position_penalty: f64,
    pub unsatisfied_recommends: f64,
    pub unsatisfied_suggests: f64,
    pub unsatisfied_try: f64,
    pub unsatisfied_wish: f64,
    pub unsatisfied_must: f64,
    pub failed_sync: f64,
}

impl Default for ScoreWeights {
    /// Defaults follow cupt's `score.cpp` ordering of magnitude: outright
    /// removals and unsatisfied hard requests dominate, soft-dependency
    /// gaps are mild, and position penalty is a tie-breaker only.
    fn default() -> Self {
        Self {
            new_install: -20.0,
            removal: -50.0,
            removal_of_essential: -200_000.0,
            removal_of_auto_installed: -5.0,
            upgrade: 20.0,
            downgrade: -40.0,
            position_penalty: -2.0,
            unsatisfied_recommends: -60.0,
            unsatisfied_suggests: -10.0,
            unsatisfied_try: -100.0,
            unsatisfied_wish: -30.0,
            unsatisfied_must: -150_000.0,
            failed_sync: -1_000.0,
        }
    }
}

/// Applies [`ScoreWeights`] to a stream of [`ScoreEvent`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreManager {
    weights: ScoreWeights,
}

impl ScoreManager {
    /// A manager using the default weights.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A manager using caller-supplied weights (e.g. loaded from
    /// configuration).
    #[must_use]
    pub const fn with_weights(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// The signed delta one event contributes.
    #[must_use]
    pub fn delta(&self, event: ScoreEvent) -> f64 {
        match event {
            ScoreEvent::VersionWeight(pin) => f64::from(pin),
            ScoreEvent::NewInstall => self.weights.new_install,
            ScoreEvent::Removal => self.weights.removal,
            ScoreEvent::RemovalOfEssential => self.weights.removal_of_essential,
            ScoreEvent::RemovalOfAutoInstalled => self.weights.removal_of_auto_installed,
            ScoreEvent::Upgrade => self.weights.upgrade,
            ScoreEvent::Downgrade => self.weights.downgrade,
            ScoreEvent::PositionPenalty(position) => self.weights.position_penalty * f64::from(position),
            ScoreEvent::UnsatisfiedRecommends => self.weights.unsatisfied_recommends,
            ScoreEvent::UnsatisfiedSuggests => self.weights.unsatisfied_suggests,
            ScoreEvent::UnsatisfiedTry => self.weights.unsatisfied_try,
            ScoreEvent::UnsatisfiedWish => self.weights.unsatisfied_wish,
            ScoreEvent::UnsatisfiedMust => self.weights.unsatisfied_must,
            ScoreEvent::FailedSync => self.weights.failed_sync,
        }
    }

    /// Sum the deltas of every event a single decision produced.
    #[must_use]
    pub fn delta_for(&self, events: &[ScoreEvent]) -> f64 {
        events.iter().map(|&e| self.delta(e)).sum()
    }
}

/// Renders an event list the way cupt's solution trace does: short codes
/// with their signed contribution, e.g. `v+500 a-20 u+20`.
pub struct ScoreBreakdown<'a> {
    manager: &'a ScoreManager,
    events: &'a [ScoreEvent],
}

impl<'a> ScoreBreakdown<'a> {
    #[must_use]
    pub const fn new(manager: &'a ScoreManager, events: &'a [ScoreEvent]) -> Self {
        Self { manager, events }
    }
}

impl fmt::Display for ScoreBreakdown<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .events
            .iter()
            .map(|&event| {
                let delta = self.manager.delta(event);
                format!("{}{:+}", event.short_code(), delta as i64)
            })
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn essential_removal_dominates_the_score() {
        let manager = ScoreManager::new();
        assert!(manager.delta(ScoreEvent::RemovalOfEssential) < manager.delta(ScoreEvent::Removal));
    }

    #[test]
    fn upgrade_is_positive_and_downgrade_is_negative() {
        let manager = ScoreManager::new();
        assert!(manager.delta(ScoreEvent::Upgrade) > 0.0);
        assert!(manager.delta(ScoreEvent::Downgrade) < 0.0);
    }

    #[test]
    fn position_penalty_scales_with_position() {
        let manager = ScoreManager::new();
        assert!(manager.delta(ScoreEvent::PositionPenalty(3)) < manager.delta(ScoreEvent::PositionPenalty(1)));
    }

    #[test]
    fn version_weight_passes_pin_through_directly() {
        let manager = ScoreManager::new();
        assert_eq!(manager.delta(ScoreEvent::VersionWeight(990)), 990.0);
    }

    #[test]
    fn breakdown_renders_short_codes_with_signs() {
        let manager = ScoreManager::new();
        let events = [ScoreEvent::VersionWeight(500), ScoreEvent::NewInstall];
        let rendered = ScoreBreakdown::new(&manager, &events).to_string();
        assert_eq!(rendered, "v+500 a-20");
    }

    #[test]
    fn delta_for_sums_every_event() {
        let manager = ScoreManager::new();
        let events = [ScoreEvent::Upgrade, ScoreEvent::UnsatisfiedSuggests];
        let expected = manager.delta(ScoreEvent::Upgrade) + manager.delta(ScoreEvent::UnsatisfiedSuggests);
        assert_eq!(manager.delta_for(&events), expected);
    }
}
