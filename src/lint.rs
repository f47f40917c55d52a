//! Static checks over a parsed user.js
//!
//! The browser silently ignores or coerces bad entries, so these checks are
//! the only feedback a maintainer gets before restarting with a new file.

use crate::error::{Error, Result};
use crate::types::{PrefEntry, PrefType, PrefValue, PrefsFile};
use glob::Pattern;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Lint configuration
///
/// # Example
///
/// ```rust
/// use userjs::LintConfig;
///
/// let config = LintConfig {
///     override_sections: vec!["*OVERRIDES*".to_string()],
///     flag_bool_like_integers: true,
/// };
/// ```
#[derive(Debug, Clone)]
pub struct LintConfig {
    /// Glob patterns for sections whose entries may intentionally override
    /// earlier values (matched case-insensitively)
    pub override_sections: Vec<String>,
    /// Warn on `0`/`1` integers assigned to `*.enabled` keys
    pub flag_bool_like_integers: bool,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            override_sections: vec!["*OVERRIDES*".to_string(), "SMOOTHFOX*".to_string()],
            flag_bool_like_integers: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Note,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// Identifier of the rule that produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    InvalidName,
    DuplicateConflict,
    DuplicateRedundant,
    MixedType,
    IntRange,
    Directive,
    BoolAsInt,
    Syntax,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Rule::InvalidName => "invalid-name",
            Rule::DuplicateConflict => "duplicate-conflict",
            Rule::DuplicateRedundant => "duplicate-redundant",
            Rule::MixedType => "mixed-type",
            Rule::IntRange => "int-range",
            Rule::Directive => "directive",
            Rule::BoolAsInt => "bool-as-int",
            Rule::Syntax => "syntax",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub rule: Rule,
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] line {}: {}",
            self.severity, self.rule, self.line, self.message
        )
    }
}

/// All diagnostics for one file, in source order
#[derive(Debug, Clone, Default, Serialize)]
pub struct LintReport {
    pub diagnostics: Vec<Diagnostic>,
}

impl LintReport {
    /// Report for content that failed to parse
    pub fn from_parse_error(err: &Error) -> Self {
        let (line, _) = err.position().unwrap_or((0, 0));
        LintReport {
            diagnostics: vec![Diagnostic {
                severity: Severity::Error,
                rule: Rule::Syntax,
                line,
                key: None,
                message: err.to_string(),
            }],
        }
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

/// Run every rule over `file`
///
/// Fails only when a pattern in `config.override_sections` is not a valid glob.
pub fn lint(file: &PrefsFile, config: &LintConfig) -> Result<LintReport> {
    let override_patterns = config
        .override_sections
        .iter()
        .map(|p| {
            Pattern::new(&p.to_uppercase())
                .map_err(|e| Error::InvalidGlobPattern(format!("'{}': {}", p, e)))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut diagnostics = Vec::new();
    // First occurrence and the value currently in effect, per key
    let mut seen: HashMap<&str, (&PrefEntry, &PrefValue)> = HashMap::new();

    for entry in &file.entries {
        check_name(entry, &mut diagnostics);
        check_value(entry, config, &mut diagnostics);

        if entry.pref_type != PrefType::User {
            diagnostics.push(diagnostic(
                Severity::Warning,
                Rule::Directive,
                entry,
                format!(
                    "'{}' is used for '{}'; user.js entries are normally written with user_pref",
                    entry.pref_type.directive(),
                    entry.key
                ),
            ));
        }

        match seen.get_mut(entry.key.as_str()) {
            None => {
                seen.insert(entry.key.as_str(), (entry, &entry.value));
            }
            Some((first, current)) => {
                check_duplicate(entry, *first, *current, &override_patterns, &mut diagnostics);
                *current = &entry.value;
            }
        }
    }

    let report = LintReport { diagnostics };
    tracing::debug!(
        errors = report.error_count(),
        warnings = report.warning_count(),
        "lint finished"
    );
    Ok(report)
}

fn diagnostic(severity: Severity, rule: Rule, entry: &PrefEntry, message: String) -> Diagnostic {
    Diagnostic {
        severity,
        rule,
        line: entry.line,
        key: Some(entry.key.clone()),
        message,
    }
}

/// Non-empty dotted identifier: segments of `[A-Za-z0-9_:-]+` joined by `.`
pub fn is_valid_pref_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':'))
        })
}

fn check_name(entry: &PrefEntry, out: &mut Vec<Diagnostic>) {
    if !is_valid_pref_name(&entry.key) {
        out.push(diagnostic(
            Severity::Error,
            Rule::InvalidName,
            entry,
            format!("'{}' is not a dotted preference name", entry.key),
        ));
    }
}

fn check_value(entry: &PrefEntry, config: &LintConfig, out: &mut Vec<Diagnostic>) {
    let PrefValue::Integer(n) = entry.value else {
        return;
    };

    if i32::try_from(n).is_err() {
        out.push(diagnostic(
            Severity::Error,
            Rule::IntRange,
            entry,
            format!(
                "{} does not fit in a 32-bit integer preference for '{}'",
                n, entry.key
            ),
        ));
    }

    if config.flag_bool_like_integers && (n == 0 || n == 1) && entry.key.ends_with(".enabled") {
        out.push(diagnostic(
            Severity::Warning,
            Rule::BoolAsInt,
            entry,
            format!(
                "'{}' looks like a switch but is set to the integer {}; use {}",
                entry.key,
                n,
                n == 1
            ),
        ));
    }
}

fn check_duplicate(
    entry: &PrefEntry,
    first: &PrefEntry,
    current: &PrefValue,
    override_patterns: &[Pattern],
    out: &mut Vec<Diagnostic>,
) {
    if entry.value.kind() != current.kind() {
        out.push(diagnostic(
            Severity::Error,
            Rule::MixedType,
            entry,
            format!(
                "'{}' is set as {} here but was {} before (first set on line {})",
                entry.key,
                entry.value.kind(),
                current.kind(),
                first.line
            ),
        ));
        return;
    }

    if &entry.value == current {
        out.push(diagnostic(
            Severity::Warning,
            Rule::DuplicateRedundant,
            entry,
            format!(
                "'{}' repeats the value already set on line {}",
                entry.key, first.line
            ),
        ));
        return;
    }

    let is_override = entry.section.as_deref().is_some_and(|section| {
        let section = section.to_uppercase();
        override_patterns.iter().any(|p| p.matches(&section))
    });

    if is_override {
        out.push(diagnostic(
            Severity::Note,
            Rule::DuplicateConflict,
            entry,
            format!(
                "'{}' overrides the value from line {} ({} -> {})",
                entry.key, first.line, current, entry.value
            ),
        ));
    } else {
        out.push(diagnostic(
            Severity::Error,
            Rule::DuplicateConflict,
            entry,
            format!(
                "'{}' conflicts with line {} ({} vs {}) outside an override section",
                entry.key, first.line, current, entry.value
            ),
        ));
    }
}
