//! `ResolverConfig` validation with descriptive, non-fatal issues.

use crate::types::ResolverConfig;

/// Validation severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational message.
    Info,
    /// Warning (may indicate issues).
    Warning,
    /// Error (must be fixed).
    Error,
}

/// One validation finding.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Severity level.
    pub severity: Severity,
    /// Issue code for programmatic handling.
    pub code: &'static str,
    /// Field path (dot-notation).
    pub field: String,
    /// Human-readable message.
    pub message: String,
}

impl ValidationIssue {
    #[must_use]
    pub fn error(code: &'static str, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn warning(code: &'static str, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Check `config` for structurally-invalid values a malformed JSON file or
/// an overzealous env override could introduce. Unlike JSON parse errors
/// (which fail loading outright), these are reported so a caller can decide
/// whether to proceed — mirroring the "non-fatal, surfaced" framing spec §7
/// gives to everything except contract violations.
#[must_use]
pub fn validate(config: &ResolverConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if config.max_iterations == 0 {
        issues.push(ValidationIssue::error(
            "config::zero-iteration-budget",
            "max_iterations",
            "a zero iteration budget makes every resolve() call exhaust its frontier immediately",
        ));
    }

    if config.default_release_pin < 0 {
        issues.push(ValidationIssue::warning(
            "config::negative-default-pin",
            "default_release_pin",
            "a negative default pin makes unpinned versions lose to every installed package",
        ));
    }

    for (field, pattern) in config
        .auto_removal
        .never
        .iter()
        .map(|p| ("auto_removal.never", p))
        .chain(
            config
                .auto_removal
                .keep_if_reverse_dependants
                .iter()
                .map(|p| ("auto_removal.keep_if_reverse_dependants", p)),
        )
        .chain(config.auto_removal.target_set.iter().map(|p| ("auto_removal.target_set", p)))
    {
        if let Err(err) = regex::Regex::new(pattern) {
            issues.push(ValidationIssue::error(
                "config::invalid-pattern",
                field,
                format!("pattern {pattern:?} does not compile: {err}"),
            ));
        }
    }

    issues
}
