//! Validation diagnostic types.

use serde::{Deserialize, Serialize};

/// Severity level of a validation diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticLevel {
    Error,
    Warning,
}

/// A single validation finding, keyed to its structural location.
///
/// `path` is the dotted location within the document, e.g.
/// `widgets.2.children.0.type`; empty for findings about the document root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub code: String,
    pub message: String,
    pub path: String,
}

/// Stable diagnostic codes emitted by the validator.
pub mod codes {
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const INVALID_ROOT: &str = "INVALID_ROOT";
    pub const MISSING_FIELD: &str = "MISSING_FIELD";
    pub const EMPTY_FIELD: &str = "EMPTY_FIELD";
    pub const INVALID_TYPE: &str = "INVALID_TYPE";
    pub const INVALID_LAYOUT: &str = "INVALID_LAYOUT";
    pub const INVALID_DIRECTION: &str = "INVALID_DIRECTION";
    pub const INVALID_ACTION: &str = "INVALID_ACTION";
    pub const DUPLICATE_ID: &str = "DUPLICATE_ID";
    pub const UNKNOWN_WIDGET: &str = "UNKNOWN_WIDGET";
    pub const NON_CONTAINER_CHILDREN: &str = "NON_CONTAINER_CHILDREN";
    pub const UNKNOWN_ACTION_REF: &str = "UNKNOWN_ACTION_REF";
    pub const UNKNOWN_STATE_KEY: &str = "UNKNOWN_STATE_KEY";
}

/// Aggregated result of template or fragment validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    /// Assemble a report; validity means zero error-level diagnostics.
    pub fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        let is_valid = !diagnostics
            .iter()
            .any(|d| d.level == DiagnosticLevel::Error);
        ValidationReport { is_valid, diagnostics }
    }

    /// An invalid report with no diagnostics, used when the document never
    /// decoded far enough to be checked.
    pub fn failed_empty() -> Self {
        ValidationReport { is_valid: false, diagnostics: vec![] }
    }

    /// Return only the error-level diagnostics.
    pub fn errors(&self) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Error)
            .collect()
    }

    /// Return only the warning-level diagnostics.
    pub fn warnings(&self) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Warning)
            .collect()
    }

    /// Newline-joined `path: message` lines for the error-level findings.
    pub fn error_summary(&self) -> String {
        self.errors()
            .iter()
            .map(|d| {
                if d.path.is_empty() {
                    d.message.clone()
                } else {
                    format!("{}: {}", d.path, d.message)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
