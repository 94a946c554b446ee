//! The `ResolverConfig` shape (spec §6's Config contract table), plus the
//! ambient settings (log level, cache path) a runnable crate needs that
//! the resolver core itself is silent on.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use depot_resolver::ScoreWeights;

/// Auto-removal pattern configuration (spec §4.D, surfaced through the
/// Config contract's "never-auto-remove" / "no-auto-remove-if-reverse-
/// depends" rows).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoRemovalConfig {
    /// Master switch for the whole oracle (§4.D).
    pub enabled: bool,
    /// Packages outside every one of these patterns are never considered
    /// for auto-removal at all (empty means "everything is a candidate").
    pub target_set: Vec<String>,
    /// A pattern match here forbids removal outright.
    pub never: Vec<String>,
    /// A pattern match here allows removal only once no reverse-dependant
    /// remains.
    pub keep_if_reverse_dependants: Vec<String>,
}

impl Default for AutoRemovalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            target_set: Vec::new(),
            never: Vec::new(),
            keep_if_reverse_dependants: Vec::new(),
        }
    }
}

/// The resolved, merged configuration the CLI hands to
/// [`depot_resolver::Resolver`] and [`depot_resolver::search::SearchEngine`].
///
/// Matches spec.md §6's Config contract table: score multipliers,
/// never-auto-remove / keep-if-reverse-depends patterns, the auto-remove
/// master switch, the synchronize-source-versions switch, the iteration
/// budget, and the default release pin. Ambient fields (`log_level`,
/// `cache_dir`) aren't part of that contract but are required for a
/// runnable crate, the way the teacher's `ResolvedConfig` carried fields
/// the manifest schema didn't name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Per-event score weights (spec §4.C).
    pub score_weights: ScoreWeights,
    /// Auto-removal oracle configuration (spec §4.D).
    pub auto_removal: AutoRemovalConfig,
    /// Whether the synchronization pass (spec §4.A) is active.
    pub synchronize_source_versions: bool,
    /// Hard cap on search steps before `resolve` reports
    /// `BudgetExceeded` (spec §4.E/§5).
    pub max_iterations: u64,
    /// Pin priority used for a version with no installed/explicit pin
    /// (spec §6's "default release pin").
    pub default_release_pin: i32,
    /// Minimum `tracing` level the CLI's subscriber should emit at
    /// (`DEPOT_LOG` overrides this; see [`crate::env`]).
    pub log_level: String,
    /// Directory `depot-cache` reads `Packages`/`status`-style fixtures
    /// from, when the CLI isn't given an explicit scenario path.
    pub cache_dir: Option<PathBuf>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            score_weights: ScoreWeights::default(),
            auto_removal: AutoRemovalConfig::default(),
            synchronize_source_versions: true,
            max_iterations: 100_000,
            default_release_pin: 500,
            log_level: "info".to_string(),
            cache_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_json() {
        let config = ResolverConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let restored: ResolverConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: ResolverConfig = serde_json::from_str(r#"{"max_iterations": 5}"#).unwrap();
        assert_eq!(config.max_iterations, 5);
        assert_eq!(config.default_release_pin, 500);
    }
}
