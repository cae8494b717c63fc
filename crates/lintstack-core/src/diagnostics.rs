//! Fail-soft diagnostics collected during resolution

use crate::document::DocumentId;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity class of a diagnostic
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    /// Worth addressing, the effective configuration is still sound
    Warning,
    /// Part of the effective configuration was dropped or is unusable
    Error,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Warning => write!(f, "warning"),
            DiagnosticSeverity::Error => write!(f, "error"),
        }
    }
}

/// Error codes for fail-soft problems
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticCode {
    /// One plugin name bound to two implementations
    DuplicatePluginConflict,
    /// A rule declaration whose severity does not normalize
    InvalidSeverityValue,
    /// A `plugin/rule` entry whose plugin is not registered
    UnknownPluginRule,
    /// Rule options rejected by the rule's schema
    SchemaValidationFailed,
    /// A declared plugin the resolver cannot map
    UnresolvedPlugin,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::DuplicatePluginConflict => "duplicate-plugin-conflict",
            DiagnosticCode::InvalidSeverityValue => "invalid-severity-value",
            DiagnosticCode::UnknownPluginRule => "unknown-plugin-rule",
            DiagnosticCode::SchemaValidationFailed => "schema-validation-failed",
            DiagnosticCode::UnresolvedPlugin => "unresolved-plugin",
        }
    }

    /// Severity used unless the resolver configuration overrides it
    pub fn default_severity(&self) -> DiagnosticSeverity {
        match self {
            DiagnosticCode::UnknownPluginRule => DiagnosticSeverity::Warning,
            _ => DiagnosticSeverity::Error,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A problem found while resolving, reported alongside the effective config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: DiagnosticSeverity,
    pub message: String,
    /// Documents implicated, in the order they contributed
    pub path: Vec<DocumentId>,
    /// Rule involved, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
}

impl Diagnostic {
    /// Create a diagnostic with the code's default severity
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: code.default_severity(),
            message: message.into(),
            path: Vec::new(),
            rule: None,
        }
    }

    pub fn with_severity(mut self, severity: DiagnosticSeverity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_document(mut self, id: &DocumentId) -> Self {
        self.path.push(id.clone());
        self
    }

    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
        if !self.path.is_empty() {
            let path: Vec<&str> = self.path.iter().map(DocumentId::as_str).collect();
            write!(f, " ({})", path.join(", "))?;
        }
        Ok(())
    }
}
