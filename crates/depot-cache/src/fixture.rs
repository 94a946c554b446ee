//! JSON scenario fixtures for `depot-cli`'s `resolve`/`explain` subcommands
//! (spec §10.5): a self-contained package/version/relation/pin/installed
//! snapshot plus the requests to resolve against it, so the demo CLI never
//! needs a real `Packages`/`status` file on disk.
//!
//! Reuses [`crate::index::IndexedVersion::from_stanza`] rather than
//! duplicating its relation-field parsing: each JSON version is turned
//! into the same `Stanza` map the control-file parser already builds from
//! text, then fed through the identical constructor.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use depot_core::{PackageName, Result, Version};

use crate::config::PinPriorities;
use crate::index::{IndexedVersion, PackageIndex, Stanza};
use crate::MetadataCache;

/// One version entry in a scenario fixture, one field per relation kind
/// plus the bookkeeping fields `IndexedVersion::from_stanza` expects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioVersion {
    pub version: String,
    #[serde(default)]
    pub depends: Option<String>,
    #[serde(default)]
    pub pre_depends: Option<String>,
    #[serde(default)]
    pub recommends: Option<String>,
    #[serde(default)]
    pub suggests: Option<String>,
    #[serde(default)]
    pub conflicts: Option<String>,
    #[serde(default)]
    pub breaks: Option<String>,
    #[serde(default)]
    pub essential: bool,
    #[serde(default)]
    pub source: Option<String>,
}

impl ScenarioVersion {
    fn to_stanza(&self) -> Stanza {
        let mut stanza = Stanza::new();
        stanza.insert("Version".to_string(), self.version.clone());
        for (field, value) in [
            ("Depends", &self.depends),
            ("Pre-Depends", &self.pre_depends),
            ("Recommends", &self.recommends),
            ("Suggests", &self.suggests),
            ("Conflicts", &self.conflicts),
            ("Breaks", &self.breaks),
        ] {
            if let Some(value) = value {
                stanza.insert(field.to_string(), value.clone());
            }
        }
        if self.essential {
            stanza.insert("Essential".to_string(), "yes".to_string());
        }
        if let Some(source) = &self.source {
            stanza.insert("Source".to_string(), source.clone());
        }
        stanza
    }
}

/// One package entry: its known versions plus installed-state bookkeeping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioPackage {
    pub versions: Vec<ScenarioVersion>,
    #[serde(default)]
    pub installed: Option<String>,
    #[serde(default)]
    pub automatic: bool,
    #[serde(default)]
    pub held: bool,
}

/// One request a scenario asks the resolver to satisfy, mirroring
/// [`depot_resolver::resolver::Request`] in JSON form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioRequest {
    InstallVersion { package: String, version: String },
    RemoveVersions { package: String },
    SatisfyRelation { relation: String },
    Upgrade { package: String },
}

/// A full scenario: the cache snapshot plus the requests to resolve.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    pub packages: AHashMap<String, ScenarioPackage>,
    #[serde(default)]
    pub pins: AHashMap<String, i32>,
    #[serde(default)]
    pub requests: Vec<ScenarioRequest>,
}

impl Scenario {
    /// Parse a scenario from its JSON text.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or a package name,
    /// version, or relation line within it fails to parse.
    pub fn parse(text: &str) -> Result<Self> {
        depot_core::from_json(text)
    }

    /// Build the [`MetadataCache`] this scenario describes.
    ///
    /// # Errors
    /// Returns an error if a package name, version, or relation line fails
    /// to parse.
    pub fn build_cache(&self) -> Result<MetadataCache> {
        let mut index = PackageIndex::new();
        for (name, package) in &self.packages {
            let package_name = PackageName::parse(name.clone())?;
            let mut indexed_versions = Vec::with_capacity(package.versions.len());
            for version in &package.versions {
                indexed_versions.push(IndexedVersion::from_stanza(&version.to_stanza())?);
            }
            let entry = index.packages.entry(package_name).or_default();
            entry.versions = indexed_versions;
            entry.automatically_installed = package.automatic;
            entry.held = package.held;
            if let Some(installed) = &package.installed {
                entry.installed_version = Some(Version::parse(installed.clone())?);
            }
        }

        let mut pins = PinPriorities::new();
        for (name, priority) in &self.pins {
            pins.set(PackageName::parse(name.clone())?, *priority);
        }

        Ok(MetadataCache::new(index).with_pins(pins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "packages": {
            "liba": {
                "versions": [{"version": "1.0", "depends": "libb"}],
                "installed": "1.0"
            },
            "libb": {
                "versions": [{"version": "1.0"}, {"version": "2.0"}]
            }
        },
        "pins": {"libb": 990},
        "requests": [{"type": "install_version", "package": "liba", "version": "1.0"}]
    }"#;

    #[test]
    fn parses_and_builds_a_cache() {
        use depot_resolver::Cache;
        let scenario = Scenario::parse(SAMPLE).unwrap();
        let cache = scenario.build_cache().unwrap();
        let name = PackageName::parse("liba").unwrap();
        assert!(cache.binary_package(&name).is_some());
        assert_eq!(scenario.requests.len(), 1);
    }

    #[test]
    fn pin_override_survives_into_the_built_cache() {
        use depot_resolver::Cache;
        let scenario = Scenario::parse(SAMPLE).unwrap();
        let cache = scenario.build_cache().unwrap();
        let name = PackageName::parse("libb").unwrap();
        assert_eq!(cache.pin(&name, &Version::parse("2.0").unwrap()), 990);
    }
}
