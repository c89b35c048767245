//! Template parser: turns raw JSON/YAML text into validated documents.
//!
//! Parsing never returns `Err` and never panics: every attempt produces a
//! [`ParseOutcome`] carrying either the typed document or the reason it was
//! rejected (decode failure or validation report), so tooling can report
//! every problem across a batch of documents in one pass.

use std::collections::HashMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::TemplateError;
use crate::widgets::WidgetRegistry;

use super::schema::{PageTemplate, TemplateFragment};
use super::validation::{self, ValidationReport};

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFormat {
    /// JSON format (`.json`).
    Json,
    /// YAML format (`.yaml` / `.yml`).
    Yaml,
}

/// Heuristic detection: trimmed text opening with `{` or `[` is JSON,
/// anything else is YAML.
pub fn detect_format(text: &str) -> TemplateFormat {
    let trimmed = text.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        TemplateFormat::Json
    } else {
        TemplateFormat::Yaml
    }
}

/// Pick a format from the file extension, content-sniffing anything else.
pub fn format_for_path(path: &Path, content: &str) -> TemplateFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => TemplateFormat::Json,
        Some("yaml") | Some("yml") => TemplateFormat::Yaml,
        _ => detect_format(content),
    }
}

/// Result object for one parse attempt.
///
/// `success` implies `data` is present and `validation.is_valid`; a decode
/// failure carries `parse_error` plus an empty invalid report; a decodable
/// but invalid document carries the full report and no data.
#[derive(Debug, Clone)]
pub struct ParseOutcome<T> {
    pub success: bool,
    pub data: Option<T>,
    pub parse_error: Option<String>,
    pub validation: ValidationReport,
}

pub type TemplateParseOutcome = ParseOutcome<PageTemplate>;
pub type FragmentParseOutcome = ParseOutcome<TemplateFragment>;

impl<T> ParseOutcome<T> {
    fn parse_failure(message: String) -> Self {
        ParseOutcome {
            success: false,
            data: None,
            parse_error: Some(message),
            validation: ValidationReport::failed_empty(),
        }
    }

    fn invalid(validation: ValidationReport) -> Self {
        ParseOutcome {
            success: false,
            data: None,
            parse_error: None,
            validation,
        }
    }
}

fn decode_value(text: &str, format: TemplateFormat) -> Result<Value, String> {
    match format {
        TemplateFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        TemplateFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
    }
}

fn parse_document<T, V>(
    text: &str,
    format: Option<TemplateFormat>,
    registry: &WidgetRegistry,
    validate: V,
) -> ParseOutcome<T>
where
    T: DeserializeOwned,
    V: Fn(&Value, &WidgetRegistry) -> ValidationReport,
{
    let format = format.unwrap_or_else(|| detect_format(text));
    let value = match decode_value(text, format) {
        Ok(value) => value,
        Err(message) => return ParseOutcome::parse_failure(message),
    };

    let validation = validate(&value, registry);
    if !validation.is_valid {
        return ParseOutcome::invalid(validation);
    }

    match serde_json::from_value::<T>(value) {
        Ok(data) => ParseOutcome {
            success: true,
            data: Some(data),
            parse_error: None,
            validation,
        },
        Err(e) => ParseOutcome::parse_failure(e.to_string()),
    }
}

/// Parse one template document; `format` falls back to [`detect_format`].
pub fn parse_template(
    text: &str,
    format: Option<TemplateFormat>,
    registry: &WidgetRegistry,
) -> TemplateParseOutcome {
    parse_document(text, format, registry, validation::validate_template)
}

/// Parse one fragment document; `format` falls back to [`detect_format`].
pub fn parse_fragment(
    text: &str,
    format: Option<TemplateFormat>,
    registry: &WidgetRegistry,
) -> FragmentParseOutcome {
    parse_document(text, format, registry, validation::validate_fragment)
}

/// Parse a template from disk. I/O failures surface as `parse_error`,
/// keeping the result-object contract.
pub fn parse_template_file(
    path: impl AsRef<Path>,
    registry: &WidgetRegistry,
) -> TemplateParseOutcome {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let format = format_for_path(path, &content);
            parse_template(&content, Some(format), registry)
        }
        Err(e) => ParseOutcome::parse_failure(format!("{}: {}", path.display(), e)),
    }
}

/// Parse a fragment from disk; see [`parse_template_file`].
pub fn parse_fragment_file(
    path: impl AsRef<Path>,
    registry: &WidgetRegistry,
) -> FragmentParseOutcome {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let format = format_for_path(path, &content);
            parse_fragment(&content, Some(format), registry)
        }
        Err(e) => ParseOutcome::parse_failure(format!("{}: {}", path.display(), e)),
    }
}

/// Load a template from disk, treating any failure as fatal.
pub fn load_template_file(
    path: impl AsRef<Path>,
    registry: &WidgetRegistry,
) -> Result<PageTemplate, TemplateError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let format = format_for_path(path, &content);
    let outcome = parse_template(&content, Some(format), registry);
    match (outcome.data, outcome.parse_error) {
        (Some(template), _) => Ok(template),
        (None, Some(message)) => Err(TemplateError::Parse(message)),
        (None, None) => Err(TemplateError::ValidationFailed(Box::new(outcome.validation))),
    }
}

// ================================
// Serialization
// ================================

fn to_json_string<T: Serialize>(value: &T) -> Result<String, TemplateError> {
    serde_json::to_string_pretty(value).map_err(|e| TemplateError::Serialize(e.to_string()))
}

fn to_yaml_string<T: Serialize>(value: &T) -> Result<String, TemplateError> {
    serde_yaml::to_string(value).map_err(|e| TemplateError::Serialize(e.to_string()))
}

pub fn serialize_template_to_json(template: &PageTemplate) -> Result<String, TemplateError> {
    to_json_string(template)
}

pub fn serialize_template_to_yaml(template: &PageTemplate) -> Result<String, TemplateError> {
    to_yaml_string(template)
}

pub fn serialize_fragment_to_json(fragment: &TemplateFragment) -> Result<String, TemplateError> {
    to_json_string(fragment)
}

pub fn serialize_fragment_to_yaml(fragment: &TemplateFragment) -> Result<String, TemplateError> {
    to_yaml_string(fragment)
}

// ================================
// Batch operations
// ================================

/// Parse a batch of template texts, keyed by each parsed template's id.
/// Texts that never produced an id get a synthetic `invalid-{index}` key.
pub fn parse_templates(
    texts: &[&str],
    registry: &WidgetRegistry,
) -> HashMap<String, TemplateParseOutcome> {
    let mut outcomes = HashMap::new();
    for (index, text) in texts.iter().enumerate() {
        let outcome = parse_template(text, None, registry);
        let key = match &outcome.data {
            Some(template) => template.id.clone(),
            None => format!("invalid-{}", index),
        };
        outcomes.insert(key, outcome);
    }
    outcomes
}

/// Append each fragment's widgets onto the base template's widget list.
/// Plain concatenation: no collision resolution, append order is render
/// order.
pub fn merge_fragments_into_template(
    base: &PageTemplate,
    fragments: &[TemplateFragment],
) -> PageTemplate {
    let mut merged = base.clone();
    for fragment in fragments {
        merged.widgets.extend(fragment.widgets.iter().cloned());
    }
    merged
}
