//! Error types for the template engine.
//!
//! - [`TemplateError`]: hard failures at explicit boundaries (asserts,
//!   serialization, file loading). Soft failures never use it: parsing and
//!   validation report through result objects, and render-time problems
//!   degrade with a log line instead of propagating.

pub mod template_error;

pub use template_error::TemplateError;

/// Convenience alias for fallible engine operations.
pub type TemplateResult<T> = Result<T, TemplateError>;
