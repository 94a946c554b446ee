//! Package names, Debian-style versions, and relation expressions.
//!
//! Version comparison follows the dpkg algorithm: a version splits into an
//! epoch, an upstream part and a revision part, each upstream/revision part
//! compares by alternating between runs of non-digits and runs of digits,
//! and `~` sorts before everything (including the empty string), which is
//! how `1.0~rc1` ends up older than `1.0`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// A validated binary package name.
///
/// Package names start with an alphanumeric character and otherwise
/// contain only lowercase letters, digits, `+`, `-` and `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageName(String);

impl PackageName {
    /// Parse and validate a package name.
    ///
    /// # Errors
    /// Returns an error if the name is too short, doesn't start with an
    /// alphanumeric character, or contains a character outside
    /// `[a-z0-9+.-]`.
    pub fn parse(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.len() < 2 {
            return Err(Error::malformed_version(
                name,
                "package name must be at least 2 characters",
            ));
        }
        let first = name.chars().next().expect("length checked above");
        if !first.is_ascii_alphanumeric() {
            return Err(Error::malformed_version(
                name,
                "package name must start with a letter or digit",
            ));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '+' | '-' | '.'))
        {
            return Err(Error::malformed_version(
                name,
                "package name may only contain lowercase letters, digits, '+', '-' and '.'",
            ));
        }
        Ok(Self(name))
    }

    /// The name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PackageName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A Debian-style `[epoch:]upstream-version[-revision]` version.
#[derive(Debug, Clone, Eq)]
pub struct Version {
    raw: String,
    epoch: u32,
    upstream_end: usize,
    revision_start: usize,
}

impl Version {
    /// Parse a version string.
    ///
    /// # Errors
    /// Returns an error if the epoch is present but not a valid `u32`.
    pub fn parse(input: impl Into<String>) -> Result<Self> {
        let raw = input.into();
        let (epoch_str, upstream_start) = match raw.find(':') {
            Some(pos) => (&raw[..pos], pos + 1),
            None => ("", 0),
        };
        let epoch = if epoch_str.is_empty() {
            0
        } else {
            epoch_str.parse().map_err(|_| {
                Error::malformed_version(raw.clone(), "epoch is not a valid integer")
            })?
        };
        let (upstream_end, revision_start) = match raw.rfind('-') {
            Some(pos) if pos >= upstream_start => (pos, pos + 1),
            _ => (raw.len(), raw.len()),
        };
        Ok(Self {
            raw,
            epoch,
            upstream_end,
            revision_start,
        })
    }

    /// The epoch, defaulting to 0 when absent.
    #[must_use]
    pub const fn epoch(&self) -> u32 {
        self.epoch
    }

    fn colon(&self) -> usize {
        self.raw.find(':').map_or(0, |pos| pos + 1)
    }

    /// The upstream part of the version, without epoch or revision.
    #[must_use]
    pub fn upstream(&self) -> &str {
        &self.raw[self.colon()..self.upstream_end]
    }

    /// The revision part, or `"0"` when absent (dpkg's implicit default).
    #[must_use]
    pub fn revision(&self) -> &str {
        let rev = &self.raw[self.revision_start..];
        if rev.is_empty() { "0" } else { rev }
    }

    /// The full, unparsed version string as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.epoch.cmp(&other.epoch) {
            Ordering::Equal => {}
            ord => return ord,
        }
        match compare_version_part(self.upstream().as_bytes(), other.upstream().as_bytes()) {
            Ordering::Equal => {}
            ord => return ord,
        }
        compare_version_part(self.revision().as_bytes(), other.revision().as_bytes())
    }
}

fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

/// Letters sort before all other non-digit characters; `~` is handled
/// separately by the caller before this is reached.
fn modified_ascii_value(c: u8) -> i16 {
    if c.is_ascii_alphabetic() {
        i16::from(c) - 1000
    } else {
        i16::from(c)
    }
}

/// Strip leading zeroes from the digit run starting at `pos`, returning the
/// (stripped-start, run-end) pair. `start == end` means the run was all
/// zeroes (or empty), which compares as numeric zero.
fn consume_number(s: &[u8], pos: usize) -> (usize, usize) {
    let mut i = pos;
    while i < s.len() && s[i] == b'0' {
        i += 1;
    }
    let start = i;
    while i < s.len() && is_digit(s[i]) {
        i += 1;
    }
    (start, i)
}

/// Port of cupt's `__compare_version_part`: alternates string-mode and
/// number-mode comparison over two byte runs, starting in string mode.
fn compare_version_part(left: &[u8], right: &[u8]) -> Ordering {
    let mut li = 0usize;
    let mut ri = 0usize;
    let mut number_mode = false;

    loop {
        if number_mode {
            let (ls, le) = consume_number(left, li);
            let (rs, re) = consume_number(right, ri);
            let left_len = le - ls;
            let right_len = re - rs;
            match left_len.cmp(&right_len) {
                Ordering::Equal => {}
                ord => return ord,
            }
            match left[ls..le].cmp(&right[rs..re]) {
                Ordering::Equal => {}
                ord => return ord,
            }
            li = le;
            ri = re;
        } else {
            while li < left.len()
                && ri < right.len()
                && !(is_digit(left[li]) && is_digit(right[ri]))
            {
                if left[li] != right[ri] {
                    if left[li] == b'~' {
                        return Ordering::Less;
                    }
                    if right[ri] == b'~' {
                        return Ordering::Greater;
                    }
                    if is_digit(left[li]) {
                        return Ordering::Less;
                    }
                    if is_digit(right[ri]) {
                        return Ordering::Greater;
                    }
                    let lv = modified_ascii_value(left[li]);
                    let rv = modified_ascii_value(right[ri]);
                    return lv.cmp(&rv);
                }
                li += 1;
                ri += 1;
            }
            if li < left.len() && ri == right.len() {
                return if left[li] == b'~' { Ordering::Less } else { Ordering::Greater };
            }
            if li == left.len() && ri < right.len() {
                return if right[ri] == b'~' { Ordering::Greater } else { Ordering::Less };
            }
        }
        number_mode = !number_mode;
        if li >= left.len() && ri >= right.len() {
            break;
        }
    }

    Ordering::Equal
}

/// The comparison operator in a versioned relation, e.g. the `>=` in
/// `libfoo (>= 1.0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// `<<`
    Less,
    /// `<=`
    LessOrEqual,
    /// `=`
    Equal,
    /// `>=`
    MoreOrEqual,
    /// `>>`
    More,
}

impl RelationKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Less => "<<",
            Self::LessOrEqual => "<=",
            Self::Equal => "=",
            Self::MoreOrEqual => ">=",
            Self::More => ">>",
        }
    }

    fn matches(self, ord: Ordering) -> bool {
        match self {
            Self::Less => ord == Ordering::Less,
            Self::LessOrEqual => ord != Ordering::Greater,
            Self::Equal => ord == Ordering::Equal,
            Self::MoreOrEqual => ord != Ordering::Less,
            Self::More => ord == Ordering::Greater,
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single relation against one package, e.g. `libfoo (>= 1.0)` or a bare
/// `libfoo` with no version constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleRelation {
    /// The referenced package.
    pub package: PackageName,
    /// The version constraint, or `None` for an unconditional relation.
    pub constraint: Option<(RelationKind, Version)>,
}

impl SingleRelation {
    /// Whether `version` satisfies this relation.
    #[must_use]
    pub fn is_satisfied_by(&self, version: &Version) -> bool {
        match &self.constraint {
            None => true,
            Some((kind, required)) => kind.matches(version.cmp(required)),
        }
    }
}

impl fmt::Display for SingleRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.constraint {
            None => write!(f, "{}", self.package),
            Some((kind, version)) => write!(f, "{} ({kind} {version})", self.package),
        }
    }
}

impl FromStr for SingleRelation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let Some(open) = s.find('(') else {
            return Ok(Self {
                package: PackageName::parse(s)?,
                constraint: None,
            });
        };
        let close = s
            .rfind(')')
            .ok_or_else(|| Error::invalid_relation(s, "missing closing ')'"))?;
        let package = PackageName::parse(s[..open].trim())?;
        let inner = s[open + 1..close].trim();
        let ops = ["<<", "<=", ">=", ">>", "=", "<", ">"];
        let (op, rest) = ops
            .iter()
            .find_map(|op| inner.strip_prefix(op).map(|rest| (*op, rest)))
            .ok_or_else(|| Error::invalid_relation(s, "unrecognized comparison operator"))?;
        let kind = match op {
            "<<" | "<" => RelationKind::Less,
            "<=" => RelationKind::LessOrEqual,
            "=" => RelationKind::Equal,
            ">=" => RelationKind::MoreOrEqual,
            ">>" | ">" => RelationKind::More,
            _ => unreachable!("exhausted in `ops` above"),
        };
        let version = Version::parse(rest.trim())?;
        Ok(Self {
            package,
            constraint: Some((kind, version)),
        })
    }
}

/// A set of alternative relations joined by `|`; satisfied if any
/// alternative is satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RelationExpr(pub Vec<SingleRelation>);

impl RelationExpr {
    /// Whether any alternative is satisfied, given a lookup of the
    /// currently installed version of a package (if any).
    pub fn is_satisfied_by(
        &self,
        mut installed_version_of: impl FnMut(&PackageName) -> Option<Version>,
    ) -> bool {
        self.0
            .iter()
            .any(|rel| installed_version_of(&rel.package).is_some_and(|v| rel.is_satisfied_by(&v)))
    }
}

impl fmt::Display for RelationExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&rendered.join(" | "))
    }
}

impl FromStr for RelationExpr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let alternatives = s
            .split('|')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(SingleRelation::from_str)
            .collect::<Result<Vec<_>>>()?;
        if alternatives.is_empty() {
            return Err(Error::invalid_relation(s, "empty relation expression"));
        }
        Ok(Self(alternatives))
    }
}

/// A list of relation expressions joined by `,`; satisfied only if every
/// expression is satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RelationLine(pub Vec<RelationExpr>);

impl fmt::Display for RelationLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&rendered.join(", "))
    }
}

impl FromStr for RelationLine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Ok(Self(Vec::new()));
        }
        let expressions = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(RelationExpr::from_str)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self(expressions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.0", "1.0", Ordering::Equal)]
    #[case("1.0", "2.0", Ordering::Less)]
    #[case("2.0", "1.0", Ordering::Greater)]
    #[case("1.0~rc1", "1.0", Ordering::Less)]
    #[case("1.0", "1.0~rc1", Ordering::Greater)]
    #[case("1.0~~", "1.0~", Ordering::Less)]
    #[case("1.0-1", "1.0-2", Ordering::Less)]
    #[case("1.0", "1.0-1", Ordering::Equal)]
    #[case("1:1.0", "2.0", Ordering::Greater)]
    #[case("1.0.0", "1.0", Ordering::Greater)]
    #[case("1.09", "1.9", Ordering::Equal)]
    #[case("1.0009", "1.9", Ordering::Equal)]
    #[case("1.a", "1.b", Ordering::Less)]
    #[case("1.A", "1.a", Ordering::Less)]
    fn dpkg_version_compare(#[case] left: &str, #[case] right: &str, #[case] expected: Ordering) {
        let left = Version::parse(left).unwrap();
        let right = Version::parse(right).unwrap();
        assert_eq!(left.cmp(&right), expected, "{left} vs {right}");
    }

    #[test]
    fn version_round_trips_through_display() {
        let v = Version::parse("2:1.4.2-3").unwrap();
        assert_eq!(v.epoch(), 2);
        assert_eq!(v.upstream(), "1.4.2");
        assert_eq!(v.revision(), "3");
        assert_eq!(v.to_string(), "2:1.4.2-3");
    }

    #[test]
    fn version_without_revision_defaults_to_zero() {
        let v = Version::parse("1.4.2").unwrap();
        assert_eq!(v.revision(), "0");
    }

    #[test]
    fn package_name_rejects_uppercase() {
        assert!(PackageName::parse("LibFoo").is_err());
    }

    #[test]
    fn package_name_rejects_single_char() {
        assert!(PackageName::parse("a").is_err());
    }

    #[test]
    fn package_name_accepts_valid_forms() {
        assert!(PackageName::parse("libssl1.1").is_ok());
        assert!(PackageName::parse("g++").is_ok());
    }

    #[test]
    fn single_relation_parses_with_constraint() {
        let rel: SingleRelation = "libfoo (>= 1.2.3-1)".parse().unwrap();
        assert_eq!(rel.package.as_str(), "libfoo");
        let (kind, version) = rel.constraint.as_ref().unwrap();
        assert_eq!(*kind, RelationKind::MoreOrEqual);
        assert_eq!(version.as_str(), "1.2.3-1");
    }

    #[test]
    fn single_relation_parses_bare_package() {
        let rel: SingleRelation = "libfoo".parse().unwrap();
        assert!(rel.constraint.is_none());
        assert!(rel.is_satisfied_by(&Version::parse("0.0.1").unwrap()));
    }

    #[test]
    fn single_relation_rejects_malformed_operator() {
        assert!("libfoo (~> 1.0)".parse::<SingleRelation>().is_err());
    }

    #[test]
    fn relation_expr_is_an_or() {
        let expr: RelationExpr = "libfoo (>= 2.0) | libbar".parse().unwrap();
        assert_eq!(expr.0.len(), 2);
        let installed = |name: &PackageName| {
            if name.as_str() == "libbar" {
                Some(Version::parse("1.0").unwrap())
            } else {
                None
            }
        };
        assert!(expr.is_satisfied_by(installed));
    }

    #[test]
    fn relation_line_is_an_and() {
        let line: RelationLine = "libfoo (>= 1.0), libbar (<< 2.0)".parse().unwrap();
        assert_eq!(line.0.len(), 2);
        assert_eq!(line.to_string(), "libfoo (>= 1.0), libbar (<< 2.0)");
    }

    #[test]
    fn relation_line_empty_string_is_empty_line() {
        let line: RelationLine = "".parse().unwrap();
        assert!(line.0.is_empty());
    }

    proptest::proptest! {
        #[test]
        fn version_ord_is_antisymmetric(a in "[0-9]{1,3}\\.[0-9]{1,3}", b in "[0-9]{1,3}\\.[0-9]{1,3}") {
            let va = Version::parse(a).unwrap();
            let vb = Version::parse(b).unwrap();
            proptest::prop_assert_eq!(va.cmp(&vb).reverse(), vb.cmp(&va));
        }

        #[test]
        fn version_equals_itself(a in "[0-9]{1,3}\\.[0-9]{1,3}(-[0-9]{1,2})?") {
            let va = Version::parse(a).unwrap();
            proptest::prop_assert_eq!(va.cmp(&va), Ordering::Equal);
        }
    }
}
