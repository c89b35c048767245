//! Hard-failure error type for explicit boundaries.
//!
//! Parsing and validation normally report through result objects
//! ([`TemplateParseOutcome`](crate::dsl::TemplateParseOutcome) and
//! [`ValidationReport`](crate::dsl::ValidationReport)); this enum exists only
//! for the call sites that have chosen to treat failure as fatal.

use crate::dsl::validation::ValidationReport;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template parse error: {0}")]
    Parse(String),
    #[error("Template serialize error: {0}")]
    Serialize(String),
    #[error("Template validation failed:\n{}", .0.error_summary())]
    ValidationFailed(Box<ValidationReport>),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
