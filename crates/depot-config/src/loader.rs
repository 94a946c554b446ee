//! Layered configuration loading (spec §10.3): defaults, a system file, a
//! user file, environment overrides, and CLI overrides, merged in that
//! precedence order. Keeps the teacher's `ConfigSource` chain shape and
//! `ConfigLoader` path-resolution methods, replacing the Composer-specific
//! `ComposerConfig`/`ComposerManifest` payload with [`ResolverConfig`] and
//! `directories` in place of the teacher's bespoke home-dir logic.

use std::path::{Path, PathBuf};

use depot_core::{Error, Result};

use crate::env::EnvConfig;
use crate::types::ResolverConfig;

/// One layer in the configuration precedence chain, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigSource {
    /// Built-in [`ResolverConfig::default`].
    Defaults,
    /// A system-wide config file (`/etc/depot/config.json` on Unix).
    System,
    /// The current user's config file, under [`directories::ProjectDirs`].
    User,
    /// `DEPOT_*` environment variables.
    Environment,
    /// Flags passed on the command line.
    Cli,
}

impl ConfigSource {
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Defaults => "built-in defaults",
            Self::System => "system configuration file",
            Self::User => "user configuration file",
            Self::Environment => "environment variables",
            Self::Cli => "command-line overrides",
        }
    }
}

/// Overrides a caller (typically `depot-cli`'s argument parser) applies on
/// top of every file- and environment-sourced layer.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub max_iterations: Option<u64>,
    pub log_level: Option<String>,
    pub cache_dir: Option<PathBuf>,
    pub synchronize_source_versions: Option<bool>,
}

impl CliOverrides {
    pub fn apply_to(&self, config: &mut ResolverConfig) {
        if let Some(max_iterations) = self.max_iterations {
            config.max_iterations = max_iterations;
        }
        if let Some(log_level) = &self.log_level {
            config.log_level = log_level.clone();
        }
        if let Some(cache_dir) = &self.cache_dir {
            config.cache_dir = Some(cache_dir.clone());
        }
        if let Some(enabled) = self.synchronize_source_versions {
            config.synchronize_source_versions = enabled;
        }
    }
}

/// Loads and layers a [`ResolverConfig`] from every [`ConfigSource`].
pub struct ConfigLoader {
    project_dirs: Option<directories::ProjectDirs>,
    env: EnvConfig,
}

impl ConfigLoader {
    /// Build a loader using `directories`' standard qualifier/org/app triple
    /// to locate the per-user config file, and a fresh read of the process
    /// environment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            project_dirs: directories::ProjectDirs::from("", "", "depot"),
            env: EnvConfig::from_env(),
        }
    }

    /// `/etc/depot/config.json`, the system-wide layer.
    #[must_use]
    pub fn system_config_path(&self) -> PathBuf {
        PathBuf::from("/etc/depot/config.json")
    }

    /// The current user's config file, honoring `DEPOT_HOME` before falling
    /// back to `directories`' platform-standard config directory.
    #[must_use]
    pub fn user_config_path(&self) -> Option<PathBuf> {
        if let Some(home) = &self.env.home {
            return Some(home.join("config.json"));
        }
        self.project_dirs
            .as_ref()
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Parse one config-file layer, returning `None` (not an error) when the
    /// file doesn't exist — a missing optional layer is normal, not a
    /// contract violation.
    ///
    /// # Errors
    /// Returns an error if the file exists but isn't readable or isn't
    /// valid JSON.
    pub fn load_layer(&self, path: &Path) -> Result<Option<ResolverConfig>> {
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
        let config: ResolverConfig =
            serde_json::from_str(&text).map_err(|err| Error::config(format!("{}: {err}", path.display())))?;
        Ok(Some(config))
    }

    /// Resolve the full `Defaults → System → User → Environment → Cli`
    /// chain into one [`ResolverConfig`]. Each file layer, when present,
    /// replaces the whole struct built so far rather than merging
    /// field-by-field — a config file is expected to be a complete
    /// snapshot, the way the teacher's own file layers were.
    ///
    /// # Errors
    /// Returns an error if a present file layer fails to parse.
    pub fn resolve(&self, cli: &CliOverrides) -> Result<ResolverConfig> {
        let mut config = ResolverConfig::default();
        tracing::debug!(source = ?ConfigSource::Defaults, "applied");

        if let Some(layer) = self.load_layer(&self.system_config_path())? {
            config = layer;
            tracing::debug!(source = ?ConfigSource::System, "applied");
        }

        if let Some(path) = self.user_config_path() {
            if let Some(layer) = self.load_layer(&path)? {
                config = layer;
                tracing::debug!(source = ?ConfigSource::User, "applied");
            }
        }

        self.env.apply_to(&mut config);
        tracing::debug!(source = ?ConfigSource::Environment, "applied");

        cli.apply_to(&mut config);
        tracing::debug!(source = ?ConfigSource::Cli, "applied");

        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_layer_is_not_an_error() {
        let loader = ConfigLoader::new();
        let missing = Path::new("/nonexistent/depot/config.json");
        assert!(loader.load_layer(missing).unwrap().is_none());
    }

    #[test]
    fn present_layer_parses_into_resolver_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"max_iterations": 7}"#).unwrap();
        let loader = ConfigLoader::new();
        let layer = loader.load_layer(&path).unwrap().unwrap();
        assert_eq!(layer.max_iterations, 7);
    }

    #[test]
    fn cli_overrides_win_over_every_other_layer() {
        let loader = ConfigLoader::new();
        let cli = CliOverrides {
            max_iterations: Some(99),
            ..CliOverrides::default()
        };
        let config = loader.resolve(&cli).unwrap();
        assert_eq!(config.max_iterations, 99);
    }
}
