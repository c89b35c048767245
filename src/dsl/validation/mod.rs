//! Template and fragment validation.
//!
//! The validators are total: they accept any decoded value, never panic,
//! and collect every finding in one pass without short-circuiting across
//! sibling checks. A document is valid iff it has zero error-level
//! diagnostics; warnings never block rendering.

mod context;
mod template;
mod types;
mod widgets;

pub use types::{codes, Diagnostic, DiagnosticLevel, ValidationReport};

use serde_json::Value;

use crate::error::TemplateError;
use crate::widgets::WidgetRegistry;

use context::ValidationContext;

/// Check an arbitrary decoded value against the page-template shape.
pub fn validate_template(value: &Value, registry: &WidgetRegistry) -> ValidationReport {
    let mut ctx = ValidationContext::new();
    template::check_template(value, registry, &mut ctx);
    ctx.into_report()
}

/// Check an arbitrary decoded value against the fragment shape.
pub fn validate_fragment(value: &Value, registry: &WidgetRegistry) -> ValidationReport {
    let mut ctx = ValidationContext::new();
    template::check_fragment(value, registry, &mut ctx);
    ctx.into_report()
}

pub fn is_valid_template(value: &Value, registry: &WidgetRegistry) -> bool {
    validate_template(value, registry).is_valid
}

pub fn is_valid_fragment(value: &Value, registry: &WidgetRegistry) -> bool {
    validate_fragment(value, registry).is_valid
}

/// Validate and convert invalidity into a hard error for call sites that
/// have chosen to treat it as fatal (build-time checks, test fixtures).
pub fn assert_valid_template(value: &Value, registry: &WidgetRegistry) -> Result<(), TemplateError> {
    let report = validate_template(value, registry);
    if report.is_valid {
        Ok(())
    } else {
        Err(TemplateError::ValidationFailed(Box::new(report)))
    }
}

pub fn assert_valid_fragment(value: &Value, registry: &WidgetRegistry) -> Result<(), TemplateError> {
    let report = validate_fragment(value, registry);
    if report.is_valid {
        Ok(())
    } else {
        Err(TemplateError::ValidationFailed(Box::new(report)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn registry() -> WidgetRegistry {
        WidgetRegistry::with_builtins()
    }

    #[test]
    fn test_minimal_valid_template() {
        let value = json!({"id": "p1", "name": "Page", "widgets": []});
        let report = validate_template(&value, &registry());
        assert!(report.is_valid, "{:?}", report.diagnostics);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_totality_over_non_objects() {
        let reg = registry();
        for value in [
            Value::Null,
            json!(42),
            json!("just a string"),
            json!(true),
            json!([1, 2, 3]),
        ] {
            let report = validate_template(&value, &reg);
            assert!(!report.is_valid);
            assert!(report
                .diagnostics
                .iter()
                .any(|d| d.code == codes::INVALID_ROOT));
        }
    }

    #[test]
    fn test_missing_required_fields_all_reported() {
        let report = validate_template(&json!({}), &registry());
        assert!(!report.is_valid);
        let missing: Vec<&str> = report
            .diagnostics
            .iter()
            .filter(|d| d.code == codes::MISSING_FIELD)
            .map(|d| d.path.as_str())
            .collect();
        assert!(missing.contains(&"id"));
        assert!(missing.contains(&"name"));
        assert!(missing.contains(&"widgets"));
    }

    #[test]
    fn test_unknown_widget_rejected_with_path() {
        let value = json!({
            "id": "p1",
            "name": "Page",
            "widgets": [{"type": "doesNotExist", "props": {}}]
        });
        let report = validate_template(&value, &registry());
        assert!(!report.is_valid);
        let diag = report
            .diagnostics
            .iter()
            .find(|d| d.code == codes::UNKNOWN_WIDGET)
            .expect("unknown widget diagnostic");
        assert_eq!(diag.path, "widgets.0.type");
    }

    #[test]
    fn test_duplicate_action_ids_do_not_mask_other_errors() {
        let value = json!({
            "id": "p1",
            "name": "Page",
            "actions": [
                {"id": "x", "type": "navigate", "path": "/a"},
                {"id": "x", "type": "navigate", "path": "/b"},
                {"id": "y", "type": "bogus"}
            ],
            "widgets": [{"type": "doesNotExist", "props": {}}]
        });
        let report = validate_template(&value, &registry());
        assert!(!report.is_valid);
        assert!(report.diagnostics.iter().any(|d| d.code == codes::DUPLICATE_ID
            && d.path == "actions.1.id"));
        assert!(report
            .diagnostics
            .iter()
            .any(|d| d.code == codes::INVALID_ACTION && d.path == "actions.2.type"));
        assert!(report
            .diagnostics
            .iter()
            .any(|d| d.code == codes::UNKNOWN_WIDGET));
    }

    #[test]
    fn test_children_on_non_container_is_warning_only() {
        let value = json!({
            "id": "p1",
            "name": "Page",
            "widgets": [{
                "type": "text",
                "props": {"text": "hi"},
                "children": [{"type": "text", "props": {"text": "nested"}}]
            }]
        });
        let report = validate_template(&value, &registry());
        assert!(report.is_valid);
        let warning = report
            .warnings()
            .into_iter()
            .find(|d| d.code == codes::NON_CONTAINER_CHILDREN)
            .expect("non-container warning");
        assert_eq!(warning.path, "widgets.0.children");
    }

    #[test]
    fn test_nested_child_error_paths() {
        let value = json!({
            "id": "p1",
            "name": "Page",
            "widgets": [{
                "type": "container",
                "props": {},
                "children": [
                    {"type": "text", "props": {"text": "a"}},
                    {"type": "nope", "props": {}}
                ]
            }]
        });
        let report = validate_template(&value, &registry());
        let diag = report
            .diagnostics
            .iter()
            .find(|d| d.code == codes::UNKNOWN_WIDGET)
            .unwrap();
        assert_eq!(diag.path, "widgets.0.children.1.type");
    }

    #[test]
    fn test_fragment_reference_skips_registry_lookup() {
        let value = json!({
            "id": "p1",
            "name": "Page",
            "widgets": [{"type": "fragment", "fragmentId": "header"}]
        });
        let report = validate_template(&value, &registry());
        assert!(report.is_valid, "{:?}", report.diagnostics);

        let value = json!({
            "id": "p1",
            "name": "Page",
            "widgets": [{"type": "fragment"}]
        });
        let report = validate_template(&value, &registry());
        assert!(!report.is_valid);
        assert!(report.diagnostics.iter().any(|d| d.code == codes::MISSING_FIELD
            && d.path == "widgets.0.fragmentId"));
    }

    #[test]
    fn test_layout_and_direction_checks() {
        let value = json!({
            "id": "p1",
            "name": "Page",
            "layout": {"type": "circular"},
            "widgets": []
        });
        let report = validate_template(&value, &registry());
        assert!(report.diagnostics.iter().any(|d| d.code == codes::INVALID_LAYOUT
            && d.path == "layout.type"));

        let value = json!({
            "id": "p1",
            "name": "Page",
            "layout": {"type": "flex", "direction": "diagonal"},
            "widgets": []
        });
        let report = validate_template(&value, &registry());
        assert!(report.diagnostics.iter().any(|d| d.code == codes::INVALID_DIRECTION
            && d.path == "layout.direction"));
    }

    #[test]
    fn test_action_variant_required_fields() {
        let value = json!({
            "id": "p1",
            "name": "Page",
            "actions": [
                {"id": "go", "type": "navigate"},
                {"id": "save", "type": "setState"},
                {"id": "fetch", "type": "api", "apiRoute": "/x"},
                {"id": "ext", "type": "custom"}
            ],
            "widgets": []
        });
        let report = validate_template(&value, &registry());
        let paths: Vec<&str> = report
            .diagnostics
            .iter()
            .filter(|d| d.code == codes::MISSING_FIELD)
            .map(|d| d.path.as_str())
            .collect();
        assert!(paths.contains(&"actions.0.path"));
        assert!(paths.contains(&"actions.1.stateUpdates"));
        assert!(paths.contains(&"actions.2.method"));
        assert!(paths.contains(&"actions.3.handler"));
    }

    #[test]
    fn test_unknown_action_ref_is_warning() {
        let value = json!({
            "id": "p1",
            "name": "Page",
            "actions": [{"id": "save", "type": "setState", "stateUpdates": {}}],
            "widgets": [{
                "type": "button",
                "props": {"label": "Go"},
                "actions": {"click": "missing-action"}
            }]
        });
        let report = validate_template(&value, &registry());
        assert!(report.is_valid);
        assert!(report.warnings().iter().any(|d| d.code == codes::UNKNOWN_ACTION_REF
            && d.path == "widgets.0.actions.click"));
    }

    #[test]
    fn test_setstate_unknown_key_lint() {
        let value = json!({
            "id": "p1",
            "name": "Page",
            "state": {"initial": {"count": 0}},
            "actions": [{"id": "bump", "type": "setState", "stateUpdates": {"cuont": 1}}],
            "widgets": []
        });
        let report = validate_template(&value, &registry());
        assert!(report.is_valid);
        assert!(report.warnings().iter().any(|d| d.code == codes::UNKNOWN_STATE_KEY
            && d.path == "actions.0.stateUpdates.cuont"));
    }

    #[test]
    fn test_assert_valid_template_error_summary() {
        let value = json!({"name": "Page", "widgets": []});
        let err = assert_valid_template(&value, &registry()).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("id"), "summary should cite the path: {}", text);
    }

    #[test]
    fn test_validate_fragment_shape() {
        let value = json!({
            "id": "header",
            "name": "Header",
            "props": {"title": {"type": "string", "required": true}},
            "widgets": [{"type": "heading", "props": {"level": 1}}]
        });
        let report = validate_fragment(&value, &registry());
        assert!(report.is_valid, "{:?}", report.diagnostics);

        let report = validate_fragment(&json!({"id": "x", "name": "X"}), &registry());
        assert!(!report.is_valid);
        assert!(report.diagnostics.iter().any(|d| d.path == "widgets"));
    }
}
