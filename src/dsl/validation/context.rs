//! Per-invocation validation context.

use super::types::{Diagnostic, DiagnosticLevel, ValidationReport};

/// Carries the path stack and collected findings for one validation pass.
///
/// One context is allocated per `validate_*` call and discarded with it, so
/// concurrent validations of different documents never share state.
pub(crate) struct ValidationContext {
    segments: Vec<String>,
    diagnostics: Vec<Diagnostic>,
    state_keys: Vec<String>,
}

impl ValidationContext {
    pub fn new() -> Self {
        ValidationContext {
            segments: Vec::new(),
            diagnostics: Vec::new(),
            state_keys: Vec::new(),
        }
    }

    pub fn push(&mut self, segment: &str) {
        self.segments.push(segment.to_string());
    }

    pub fn push_index(&mut self, index: usize) {
        self.segments.push(index.to_string());
    }

    pub fn pop(&mut self) {
        self.segments.pop();
    }

    /// Dotted path of the current position, e.g. `widgets.2.children.0`.
    pub fn path(&self) -> String {
        self.segments.join(".")
    }

    pub fn error(&mut self, code: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            level: DiagnosticLevel::Error,
            code: code.to_string(),
            message: message.into(),
            path: self.path(),
        });
    }

    /// Emit an error one segment deeper, leaving the stack as it was.
    pub fn error_at(&mut self, segment: &str, code: &str, message: impl Into<String>) {
        self.push(segment);
        self.error(code, message);
        self.pop();
    }

    pub fn warning(&mut self, code: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            level: DiagnosticLevel::Warning,
            code: code.to_string(),
            message: message.into(),
            path: self.path(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.level == DiagnosticLevel::Error)
    }

    /// Remember a declared `state.initial` key for later cross-checks.
    pub fn record_state_key(&mut self, key: &str) {
        self.state_keys.push(key.to_string());
    }

    pub fn state_keys(&self) -> &[String] {
        &self.state_keys
    }

    pub fn into_report(self) -> ValidationReport {
        ValidationReport::from_diagnostics(self.diagnostics)
    }
}
