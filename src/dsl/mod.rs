//! The template DSL: document schema, parsing, and validation.

pub mod parser;
pub mod schema;
pub mod validation;

pub use parser::{
    detect_format, format_for_path, load_template_file, merge_fragments_into_template,
    parse_fragment, parse_fragment_file, parse_template, parse_template_file, parse_templates,
    serialize_fragment_to_json, serialize_fragment_to_yaml, serialize_template_to_json,
    serialize_template_to_yaml, FragmentParseOutcome, ParseOutcome, TemplateFormat,
    TemplateParseOutcome,
};
pub use schema::*;
pub use validation::{
    assert_valid_fragment, assert_valid_template, is_valid_fragment, is_valid_template,
    validate_fragment, validate_template, Diagnostic, DiagnosticLevel, ValidationReport,
};
