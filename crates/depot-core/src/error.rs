//! Error types shared across the depot crates.
//!
//! Each error carries a short code (e.g. `E0101`) so it can be grepped for
//! in bug reports and docs, plus a human message and optional suggestions.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error codes for depot errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Package / version errors (E01xx)
    /// Package not found in the cache.
    E0101,
    /// No version of a package satisfies a relation.
    E0102,
    /// Malformed version string.
    E0103,
    /// Invalid package name.
    E0104,

    // Resolution errors (E02xx)
    /// The search exhausted the frontier without finding a solution.
    E0201,
    /// A relation expression could not be parsed.
    E0202,
    /// Two pinned decisions about the same package conflicted.
    E0203,

    // Manifest / relation parsing errors (E04xx)
    /// Invalid relation line syntax.
    E0401,
    /// Invalid JSON syntax.
    E0402,

    // IO errors (E05xx)
    /// File not found.
    E0501,
    /// Permission denied.
    E0502,
    /// File already exists.
    E0503,

    // Configuration errors (E11xx)
    /// Invalid configuration value.
    E1101,
    /// Missing required configuration.
    E1102,
}

impl ErrorCode {
    /// String form of the code, e.g. `"E0101"`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::E0101 => "E0101",
            Self::E0102 => "E0102",
            Self::E0103 => "E0103",
            Self::E0104 => "E0104",
            Self::E0201 => "E0201",
            Self::E0202 => "E0202",
            Self::E0203 => "E0203",
            Self::E0401 => "E0401",
            Self::E0402 => "E0402",
            Self::E0501 => "E0501",
            Self::E0502 => "E0502",
            Self::E0503 => "E0503",
            Self::E1101 => "E1101",
            Self::E1102 => "E1102",
        }
    }

    /// Short human title for this code.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::E0101 => "Package not found",
            Self::E0102 => "Relation not satisfiable",
            Self::E0103 => "Malformed version",
            Self::E0104 => "Invalid package name",
            Self::E0201 => "Resolution failed",
            Self::E0202 => "Invalid relation expression",
            Self::E0203 => "Conflicting pins",
            Self::E0401 => "Invalid relation line",
            Self::E0402 => "JSON syntax error",
            Self::E0501 => "File not found",
            Self::E0502 => "Permission denied",
            Self::E0503 => "File exists",
            Self::E1101 => "Invalid configuration",
            Self::E1102 => "Missing configuration",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Wrapper to make `ErrorCode` usable as an error source.
#[derive(Debug)]
pub struct ErrorCodeSource(pub ErrorCode);

impl fmt::Display for ErrorCodeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_str())
    }
}

impl std::error::Error for ErrorCodeSource {}

/// Main error type for depot operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Package not found in the cache.
    #[error("[{code}] package '{name}' not found")]
    PackageNotFound {
        #[source]
        code: ErrorCodeSource,
        name: String,
        suggestions: Vec<String>,
    },

    /// No version of a package satisfies the relation.
    #[error("[{code}] no version of '{name}' satisfies '{relation}'")]
    RelationNotSatisfiable {
        #[source]
        code: ErrorCodeSource,
        name: String,
        relation: String,
        available_versions: Vec<String>,
        suggestions: Vec<String>,
    },

    /// A version string could not be parsed.
    #[error("[{code}] malformed version '{input}': {reason}")]
    MalformedVersion {
        #[source]
        code: ErrorCodeSource,
        input: String,
        reason: String,
    },

    /// A relation expression or relation line could not be parsed.
    #[error("[{code}] invalid relation expression '{input}': {reason}")]
    InvalidRelation {
        #[source]
        code: ErrorCodeSource,
        input: String,
        reason: String,
    },

    /// Resolution exhausted the search without finding a solution.
    #[error("[{code}] resolution failed: {message}")]
    Resolution {
        #[source]
        code: ErrorCodeSource,
        message: String,
        conflicting_packages: Vec<String>,
        suggestions: Vec<String>,
    },

    /// JSON (de)serialization error.
    #[error("[E0402] json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error with path context.
    #[error("[{code}] io error at {path}: {message}")]
    Io {
        #[source]
        code: ErrorCodeSource,
        path: PathBuf,
        message: String,
        suggestions: Vec<String>,
    },

    /// Configuration error.
    #[error("[{code}] config error: {message}")]
    Config {
        #[source]
        code: ErrorCodeSource,
        message: String,
        key: Option<String>,
        suggestions: Vec<String>,
    },
}

impl Error {
    /// The error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::PackageNotFound { code, .. }
            | Self::RelationNotSatisfiable { code, .. }
            | Self::MalformedVersion { code, .. }
            | Self::InvalidRelation { code, .. }
            | Self::Resolution { code, .. }
            | Self::Io { code, .. }
            | Self::Config { code, .. } => code.0,
            Self::Json(_) => ErrorCode::E0402,
        }
    }

    /// Suggestions for fixing this error, if any were recorded.
    #[must_use]
    pub fn suggestions(&self) -> &[String] {
        match self {
            Self::PackageNotFound { suggestions, .. }
            | Self::RelationNotSatisfiable { suggestions, .. }
            | Self::Resolution { suggestions, .. }
            | Self::Io { suggestions, .. }
            | Self::Config { suggestions, .. } => suggestions,
            Self::MalformedVersion { .. } | Self::InvalidRelation { .. } | Self::Json(_) => &[],
        }
    }

    /// Build an IO error with suggestions derived from the error kind.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        let (code, suggestions) = match err.kind() {
            std::io::ErrorKind::NotFound => (
                ErrorCode::E0501,
                vec![format!("Check if the path exists: {}", path.display())],
            ),
            std::io::ErrorKind::PermissionDenied => (
                ErrorCode::E0502,
                vec![format!("Check permissions on: {}", path.display())],
            ),
            std::io::ErrorKind::AlreadyExists => (
                ErrorCode::E0503,
                vec![format!("File already exists: {}", path.display())],
            ),
            _ => (
                ErrorCode::E0501,
                vec![format!("Check the file: {}", path.display())],
            ),
        };
        Self::Io {
            code: ErrorCodeSource(code),
            path,
            message: err.to_string(),
            suggestions,
        }
    }

    /// Build a package-not-found error.
    #[must_use]
    pub fn package_not_found(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::PackageNotFound {
            code: ErrorCodeSource(ErrorCode::E0101),
            suggestions: vec![
                "Check the package name for typos".to_string(),
                "Verify the package exists in a configured repository".to_string(),
            ],
            name,
        }
    }

    /// Build a relation-not-satisfiable error, suggesting the closest available version.
    #[must_use]
    pub fn relation_not_satisfiable(
        name: impl Into<String>,
        relation: impl Into<String>,
        available: Vec<String>,
    ) -> Self {
        let name = name.into();
        let relation = relation.into();
        let mut suggestions = vec![format!("Relax the relation (current: {relation})")];
        if !available.is_empty() {
            suggestions.push(format!("Available versions: {}", available.join(", ")));
        }
        Self::RelationNotSatisfiable {
            code: ErrorCodeSource(ErrorCode::E0102),
            name,
            relation,
            available_versions: available,
            suggestions,
        }
    }

    /// Build a malformed-version error.
    #[must_use]
    pub fn malformed_version(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedVersion {
            code: ErrorCodeSource(ErrorCode::E0103),
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Build an invalid-relation error.
    #[must_use]
    pub fn invalid_relation(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRelation {
            code: ErrorCodeSource(ErrorCode::E0202),
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Build a resolution-failed error.
    #[must_use]
    pub fn resolution(message: impl Into<String>, conflicting: Vec<String>) -> Self {
        let message = message.into();
        let mut suggestions = vec!["Inspect the failure tree for the blocking decisions".to_string()];
        if !conflicting.is_empty() {
            suggestions.insert(
                0,
                format!("Conflicting packages: {}", conflicting.join(", ")),
            );
        }
        Self::Resolution {
            code: ErrorCodeSource(ErrorCode::E0201),
            message,
            conflicting_packages: conflicting,
            suggestions,
        }
    }

    /// Build a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            code: ErrorCodeSource(ErrorCode::E1101),
            message: message.into(),
            key: None,
            suggestions: vec!["Check the configuration file for errors".to_string()],
        }
    }

    /// Build a configuration error naming the offending key.
    #[must_use]
    pub fn config_key(key: impl Into<String>, message: impl Into<String>) -> Self {
        let key = key.into();
        Self::Config {
            code: ErrorCodeSource(ErrorCode::E1101),
            message: message.into(),
            suggestions: vec![format!("Check the '{key}' configuration key")],
            key: Some(key),
        }
    }

    /// Render the error together with its suggestions, for CLI display.
    #[must_use]
    pub fn display_with_suggestions(&self) -> String {
        let mut output = format!("{self}");
        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str("\n\nSuggestions:");
            for suggestion in suggestions {
                output.push_str(&format!("\n  - {suggestion}"));
            }
        }
        output
    }
}

/// Result type used throughout depot.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_roundtrip() {
        assert_eq!(ErrorCode::E0101.as_str(), "E0101");
        assert_eq!(ErrorCode::E0101.title(), "Package not found");
    }

    #[test]
    fn package_not_found_carries_suggestions() {
        let err = Error::package_not_found("libfoo");
        assert_eq!(err.code(), ErrorCode::E0101);
        assert!(!err.suggestions().is_empty());
        assert!(err.to_string().contains("[E0101]"));
    }

    #[test]
    fn relation_not_satisfiable_lists_available() {
        let err = Error::relation_not_satisfiable(
            "libfoo",
            ">= 2.0",
            vec!["1.0.0".to_string(), "1.5.0".to_string()],
        );
        assert_eq!(err.code(), ErrorCode::E0102);
        assert!(err.suggestions().iter().any(|s| s.contains("1.5.0")));
    }

    #[test]
    fn display_with_suggestions_includes_bullets() {
        let err = Error::package_not_found("libfoo");
        let display = err.display_with_suggestions();
        assert!(display.contains("Suggestions:"));
        assert!(display.contains("- "));
    }
}
