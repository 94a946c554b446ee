//! Parses Debian-control-style stanzas (`Packages`/`status`-file format)
//! into the in-memory structures [`crate::MetadataCache`] serves from.
//!
//! Grounded on the teacher's `index.rs`, which built an in-memory lookup
//! table from parsed entries the same way; the parsing itself is new,
//! following the control-file grammar cupt reads in
//! `examples/original_source/cpp/lib/src/internal/filesystem.cpp` and
//! `cacheimpl.cpp` (blank-line-separated stanzas, `Key: value` fields,
//! continuation lines indented with a space).

use ahash::AHashMap;

use depot_core::{Error, PackageName, RelationLine, Result, Version};
use depot_resolver::DependencyKind;

/// One parsed `Key: value` stanza, case-sensitively keyed as written.
pub type Stanza = AHashMap<String, String>;

/// Split `text` into stanzas separated by one or more blank lines.
#[must_use]
pub fn parse_stanzas(text: &str) -> Vec<Stanza> {
    let mut stanzas = Vec::new();
    let mut current = Stanza::new();
    let mut last_key: Option<String> = None;

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                stanzas.push(std::mem::take(&mut current));
            }
            last_key = None;
            continue;
        }
        if let Some(rest) = line.strip_prefix(' ') {
            if let Some(key) = &last_key {
                if let Some(value) = current.get_mut(key) {
                    value.push('\n');
                    value.push_str(rest);
                    continue;
                }
            }
            continue; // a continuation line with nothing to continue is dropped
        }
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim().to_string();
            current.insert(key.clone(), value.trim().to_string());
            last_key = Some(key);
        }
    }
    if !current.is_empty() {
        stanzas.push(current);
    }
    stanzas
}

/// One binary package version as read from a `Packages`-style stanza.
#[derive(Debug, Clone)]
pub struct IndexedVersion {
    pub version: Version,
    pub relations: AHashMap<DependencyKind, RelationLine>,
    pub essential: bool,
    pub source: Option<(PackageName, Version)>,
}

const RELATION_FIELDS: &[(&str, DependencyKind)] = &[
    ("Pre-Depends", DependencyKind::PreDepends),
    ("Depends", DependencyKind::Depends),
    ("Recommends", DependencyKind::Recommends),
    ("Suggests", DependencyKind::Suggests),
    ("Conflicts", DependencyKind::Conflicts),
    ("Breaks", DependencyKind::Breaks),
];

impl IndexedVersion {
    /// Parse one version entry out of a `Packages`-stanza. Requires at
    /// least `Package` and `Version` fields.
    ///
    /// # Errors
    /// Returns an error if `Version` is missing or malformed, or if a
    /// relation field fails to parse.
    pub fn from_stanza(stanza: &Stanza) -> Result<Self> {
        let version_str = stanza
            .get("Version")
            .ok_or_else(|| Error::config_key("Version", "stanza is missing a Version field"))?;
        let version = Version::parse(version_str.clone())?;

        let mut relations = AHashMap::new();
        for &(field, kind) in RELATION_FIELDS {
            if let Some(raw) = stanza.get(field) {
                relations.insert(kind, raw.parse::<RelationLine>()?);
            }
        }

        let essential = stanza
            .get("Essential")
            .is_some_and(|v| v.eq_ignore_ascii_case("yes"));

        let source = match stanza.get("Source") {
            Some(raw) => {
                let (name, source_version) = match raw.split_once('(') {
                    Some((name, rest)) => {
                        let version_str = rest.trim_end_matches(')').trim();
                        (name.trim(), Version::parse(version_str.to_string())?)
                    }
                    None => (raw.trim(), version.clone()),
                };
                Some((PackageName::parse(name)?, source_version))
            }
            None => None,
        };

        Ok(Self {
            version,
            relations,
            essential,
            source,
        })
    }
}

/// Every known version of one package, plus installed-state bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct IndexedPackage {
    pub versions: Vec<IndexedVersion>,
    pub installed_version: Option<Version>,
    pub automatically_installed: bool,
    pub held: bool,
}

/// The full in-memory package index: every known version of every
/// package, built from one or more parsed `Packages` files and an
/// optional `status` file overlay.
#[derive(Debug, Clone, Default)]
pub struct PackageIndex {
    pub packages: AHashMap<PackageName, IndexedPackage>,
}

impl PackageIndex {
    /// An empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge every stanza in a `Packages`-style file into the index.
    ///
    /// # Errors
    /// Returns an error if a stanza is missing `Package`/`Version` or has
    /// a malformed relation field.
    pub fn load_packages(&mut self, text: &str) -> Result<()> {
        for stanza in parse_stanzas(text) {
            let Some(name) = stanza.get("Package") else {
                continue;
            };
            let package = PackageName::parse(name.clone())?;
            let indexed = IndexedVersion::from_stanza(&stanza)?;
            self.packages.entry(package).or_default().versions.push(indexed);
        }
        Ok(())
    }

    /// Overlay installed-state bookkeeping from a `status`-style file:
    /// `Status: install ok installed` marks a package installed at the
    /// version given in the same stanza; `X-Depot-Automatic: yes` marks it
    /// as automatically installed (this crate's own convention — dpkg
    /// itself tracks the equivalent bit in `extended_states`, out of scope
    /// here).
    ///
    /// # Errors
    /// Returns an error if a stanza's `Version` field is malformed.
    pub fn load_status(&mut self, text: &str) -> Result<()> {
        for stanza in parse_stanzas(text) {
            let Some(name) = stanza.get("Package") else {
                continue;
            };
            let package = PackageName::parse(name.clone())?;
            let installed = stanza
                .get("Status")
                .is_some_and(|s| s.contains("installed"));
            if !installed {
                continue;
            }
            let Some(version_str) = stanza.get("Version") else {
                continue;
            };
            let version = Version::parse(version_str.clone())?;
            let automatically_installed = stanza
                .get("X-Depot-Automatic")
                .is_some_and(|v| v.eq_ignore_ascii_case("yes"));
            let held = stanza.get("Status").is_some_and(|s| s.starts_with("hold"));

            let entry = self.packages.entry(package).or_default();
            entry.installed_version = Some(version);
            entry.automatically_installed = automatically_installed;
            entry.held = held;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_single_stanza() {
        let text = "Package: libfoo\nVersion: 1.0\nDepends: libbar (>= 2.0)\n";
        let stanzas = parse_stanzas(text);
        assert_eq!(stanzas.len(), 1);
        assert_eq!(stanzas[0].get("Package").unwrap(), "libfoo");
    }

    #[test]
    fn continuation_lines_are_appended() {
        let text = "Package: libfoo\nVersion: 1.0\nDescription: short\n long continued\n";
        let stanzas = parse_stanzas(text);
        assert_eq!(stanzas[0].get("Description").unwrap(), "short\nlong continued");
    }

    #[test]
    fn multiple_stanzas_split_on_blank_lines() {
        let text = "Package: a\nVersion: 1.0\n\nPackage: b\nVersion: 2.0\n";
        let stanzas = parse_stanzas(text);
        assert_eq!(stanzas.len(), 2);
    }

    #[test]
    fn load_packages_builds_relations() {
        let mut index = PackageIndex::new();
        index
            .load_packages("Package: liba\nVersion: 1.0\nDepends: libb\nConflicts: libc\n")
            .unwrap();
        let pkg = &index.packages[&PackageName::parse("liba").unwrap()];
        assert_eq!(pkg.versions.len(), 1);
        assert!(pkg.versions[0].relations.contains_key(&DependencyKind::Depends));
        assert!(pkg.versions[0].relations.contains_key(&DependencyKind::Conflicts));
    }

    #[test]
    fn load_status_marks_installed_version() {
        let mut index = PackageIndex::new();
        index.load_packages("Package: liba\nVersion: 1.0\n").unwrap();
        index
            .load_status("Package: liba\nVersion: 1.0\nStatus: install ok installed\nX-Depot-Automatic: yes\n")
            .unwrap();
        let pkg = &index.packages[&PackageName::parse("liba").unwrap()];
        assert_eq!(pkg.installed_version, Some(Version::parse("1.0").unwrap()));
        assert!(pkg.automatically_installed);
    }

    #[test]
    fn source_field_with_explicit_version_parses() {
        let mut index = PackageIndex::new();
        index
            .load_packages("Package: libfoo1\nVersion: 1.0-1\nSource: libfoo (1.0)\n")
            .unwrap();
        let pkg = &index.packages[&PackageName::parse("libfoo1").unwrap()];
        let (name, version) = pkg.versions[0].source.as_ref().unwrap();
        assert_eq!(name.as_str(), "libfoo");
        assert_eq!(version.as_str(), "1.0");
    }
}
