//! Environment-variable overrides, the highest-precedence layer below CLI
//! flags in [`crate::loader::ConfigSource`]'s chain.

use std::path::PathBuf;

/// Well-known `DEPOT_*` environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepotEnvVar {
    /// `DEPOT_LOG` — `tracing` `EnvFilter` directive, e.g. `debug` or
    /// `depot_resolver=trace`.
    Log,
    /// `DEPOT_HOME` — overrides the directory [`directories::ProjectDirs`]
    /// would otherwise pick for the global config file.
    Home,
    /// `DEPOT_CACHE_DIR` — overrides `ResolverConfig::cache_dir`.
    CacheDir,
    /// `DEPOT_MAX_ITERATIONS` — overrides `ResolverConfig::max_iterations`.
    MaxIterations,
}

impl DepotEnvVar {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Log => "DEPOT_LOG",
            Self::Home => "DEPOT_HOME",
            Self::CacheDir => "DEPOT_CACHE_DIR",
            Self::MaxIterations => "DEPOT_MAX_ITERATIONS",
        }
    }

    #[must_use]
    pub fn get(self) -> Option<String> {
        std::env::var(self.as_str()).ok()
    }

    #[must_use]
    pub fn as_path(self) -> Option<PathBuf> {
        self.get().map(PathBuf::from)
    }

    #[must_use]
    pub fn as_u64(self) -> Option<u64> {
        self.get().and_then(|v| v.parse().ok())
    }
}

/// Snapshot of every recognized environment variable, read once so a single
/// process invocation sees a consistent view even if the environment
/// changes mid-run.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub log: Option<String>,
    pub home: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub max_iterations: Option<u64>,
}

impl EnvConfig {
    /// Read every `DEPOT_*` variable from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            log: DepotEnvVar::Log.get(),
            home: DepotEnvVar::Home.as_path(),
            cache_dir: DepotEnvVar::CacheDir.as_path(),
            max_iterations: DepotEnvVar::MaxIterations.as_u64(),
        }
    }

    /// Layer this snapshot's overrides onto `config`, mutating in place.
    pub fn apply_to(&self, config: &mut crate::types::ResolverConfig) {
        if let Some(log) = &self.log {
            config.log_level = log.clone();
        }
        if let Some(cache_dir) = &self.cache_dir {
            config.cache_dir = Some(cache_dir.clone());
        }
        if let Some(max_iterations) = self.max_iterations {
            config.max_iterations = max_iterations;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_config_applies_only_present_overrides() {
        let mut config = crate::types::ResolverConfig::default();
        let original_pin = config.default_release_pin;
        let env = EnvConfig {
            max_iterations: Some(42),
            ..EnvConfig::default()
        };
        env.apply_to(&mut config);
        assert_eq!(config.max_iterations, 42);
        assert_eq!(config.default_release_pin, original_pin);
    }
}
