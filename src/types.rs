//! Value types exchanged with callers: options in, results and warnings out.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a conversion warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningKind {
    /// Same meaning, different spelling in the target.
    SyntaxDifference,
    /// No faithful single-function equivalent in the target.
    UnsupportedFunction,
    /// The target supports the construct only partially or differently.
    PartialSupport,
    /// A construct that is dropped rather than reproduced.
    UnsupportedConstruct,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WarningKind::SyntaxDifference => "SYNTAX_DIFFERENCE",
            WarningKind::UnsupportedFunction => "UNSUPPORTED_FUNCTION",
            WarningKind::PartialSupport => "PARTIAL_SUPPORT",
            WarningKind::UnsupportedConstruct => "UNSUPPORTED_CONSTRUCT",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// A non-fatal note about a construct that was not (fully) rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionWarning {
    pub kind: WarningKind,
    pub message: String,
    pub severity: Severity,
    pub suggestion: Option<String>,
}

impl ConversionWarning {
    pub fn new(kind: WarningKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            severity,
            suggestion: None,
        }
    }

    pub fn info(kind: WarningKind, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Info, message)
    }

    pub fn warning(kind: WarningKind, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Warning, message)
    }

    pub fn error(kind: WarningKind, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Error, message)
    }

    /// Attach a suggested manual rewrite.
    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.kind, self.message)?;
        if let Some(s) = &self.suggestion {
            write!(f, " (suggestion: {})", s)?;
        }
        Ok(())
    }
}

/// Outcome of converting one statement.
///
/// `applied_rules` holds free-form provenance labels. They are meant for
/// people reading an audit trail, not for exact matching across versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub converted_sql: String,
    pub warnings: Vec<ConversionWarning>,
    pub applied_rules: Vec<String>,
}

impl ConversionResult {
    /// Result for a statement that was passed through untouched.
    pub fn unchanged(sql: impl Into<String>) -> Self {
        Self {
            converted_sql: sql.into(),
            warnings: Vec::new(),
            applied_rules: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.warnings.iter().any(|w| w.severity == Severity::Error)
    }

    /// Highest severity among the warnings, if any.
    pub fn max_severity(&self) -> Option<Severity> {
        self.warnings.iter().map(|w| w.severity).max()
    }
}

/// Caller-supplied knobs for one conversion call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOptions {
    /// Keep INFO-severity advisories in the result.
    pub include_info: bool,
    /// Record informational "unchanged" / "native in target" rule entries.
    pub record_unchanged: bool,
    /// Indentation width of synthesized column lines.
    pub ddl_indent: usize,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            include_info: true,
            record_unchanged: true,
            ddl_indent: 4,
        }
    }
}

impl ConversionOptions {
    pub fn include_info(mut self, yes: bool) -> Self {
        self.include_info = yes;
        self
    }

    pub fn record_unchanged(mut self, yes: bool) -> Self {
        self.record_unchanged = yes;
        self
    }

    pub fn ddl_indent(mut self, width: usize) -> Self {
        self.ddl_indent = width;
        self
    }
}
