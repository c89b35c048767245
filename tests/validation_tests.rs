use pageflow::{
    assert_valid_template, is_valid_template, validate_fragment, validate_template,
    DiagnosticLevel, WidgetRegistry,
};
use serde_json::{json, Value};

fn registry() -> WidgetRegistry {
    WidgetRegistry::with_builtins()
}

fn paths_with_code(report: &pageflow::ValidationReport, code: &str) -> Vec<String> {
    report
        .diagnostics
        .iter()
        .filter(|d| d.code == code)
        .map(|d| d.path.clone())
        .collect()
}

#[test]
fn test_no_input_shape_panics() {
    let reg = registry();
    let inputs = [
        Value::Null,
        json!(42),
        json!("just a string"),
        json!(true),
        json!([1, 2, 3]),
        json!({}),
        json!({"id": 7, "name": [], "widgets": {"not": "an array"}}),
    ];
    for input in inputs {
        let report = validate_template(&input, &reg);
        assert!(!report.is_valid, "accepted {input}");
        assert!(!report.errors().is_empty());
        let report = validate_fragment(&input, &reg);
        assert!(!report.is_valid);
    }
}

#[test]
fn test_minimal_template_is_valid() {
    let report = validate_template(
        &json!({"id": "p", "name": "P", "widgets": []}),
        &registry(),
    );
    assert!(report.is_valid, "{:?}", report.diagnostics);
    assert!(report.diagnostics.is_empty());
}

#[test]
fn test_unknown_widget_is_an_error_at_its_path() {
    let report = validate_template(
        &json!({
            "id": "p", "name": "P",
            "widgets": [{"type": "crystal-ball", "props": {}}]
        }),
        &registry(),
    );
    assert!(!report.is_valid);
    assert_eq!(paths_with_code(&report, "UNKNOWN_WIDGET"), ["widgets.0.type"]);
}

#[test]
fn test_registry_decides_the_known_set() {
    let doc = json!({
        "id": "p", "name": "P",
        "widgets": [{"type": "crystal-ball", "props": {}}]
    });
    assert!(!is_valid_template(&doc, &registry()));

    struct CrystalBall;
    impl pageflow::WidgetAdapter for CrystalBall {}
    let mut custom = WidgetRegistry::with_builtins();
    custom.register("crystal-ball", Box::new(CrystalBall));
    assert!(is_valid_template(&doc, &custom));
}

#[test]
fn test_duplicate_action_ids_do_not_mask_other_findings() {
    let report = validate_template(
        &json!({
            "id": "p", "name": "P",
            "actions": [
                {"id": "save", "type": "navigate", "path": "/a"},
                {"id": "save", "type": "navigate", "path": "/b"},
                {"id": "other", "type": "setState"}
            ],
            "widgets": [{"type": "nope", "props": {}}]
        }),
        &registry(),
    );
    assert!(!report.is_valid);
    assert_eq!(paths_with_code(&report, "DUPLICATE_ID"), ["actions.1.id"]);
    assert_eq!(
        paths_with_code(&report, "MISSING_FIELD"),
        ["actions.2.stateUpdates"]
    );
    assert_eq!(paths_with_code(&report, "UNKNOWN_WIDGET"), ["widgets.0.type"]);
}

#[test]
fn test_deeply_nested_findings_carry_full_paths() {
    let report = validate_template(
        &json!({
            "id": "p", "name": "P",
            "widgets": [{
                "type": "container", "props": {},
                "children": [
                    {"type": "text", "props": {}},
                    {"type": "row", "props": {}, "children": [
                        {"type": "widget-from-mars", "props": {}}
                    ]}
                ]
            }]
        }),
        &registry(),
    );
    assert_eq!(
        paths_with_code(&report, "UNKNOWN_WIDGET"),
        ["widgets.0.children.1.children.0.type"]
    );
}

#[test]
fn test_non_container_children_is_only_a_warning() {
    let report = validate_template(
        &json!({
            "id": "p", "name": "P",
            "widgets": [{
                "type": "text", "props": {},
                "children": [{"type": "text", "props": {}}]
            }]
        }),
        &registry(),
    );
    assert!(report.is_valid);
    assert_eq!(report.warnings().len(), 1);
    assert_eq!(report.warnings()[0].code, "NON_CONTAINER_CHILDREN");
}

#[test]
fn test_action_variant_requirements() {
    let report = validate_template(
        &json!({
            "id": "p", "name": "P",
            "actions": [
                {"id": "a", "type": "navigate"},
                {"id": "b", "type": "api"},
                {"id": "c", "type": "custom"},
                {"id": "d", "type": "teleport"}
            ],
            "widgets": []
        }),
        &registry(),
    );
    assert!(!report.is_valid);
    let missing = paths_with_code(&report, "MISSING_FIELD");
    for expected in [
        "actions.0.path",
        "actions.1.apiRoute",
        "actions.1.method",
        "actions.2.handler",
    ] {
        assert!(missing.contains(&expected.to_string()), "{missing:?}");
    }
    assert_eq!(paths_with_code(&report, "INVALID_ACTION"), ["actions.3.type"]);
}

#[test]
fn test_widget_action_refs_are_checked_softly() {
    let report = validate_template(
        &json!({
            "id": "p", "name": "P",
            "actions": [{"id": "save", "type": "navigate", "path": "/x"}],
            "widgets": [{
                "type": "button", "props": {"label": "Go"},
                "actions": {"click": "not-declared"}
            }]
        }),
        &registry(),
    );
    assert!(report.is_valid);
    let warnings = report.warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code, "UNKNOWN_ACTION_REF");
    assert_eq!(warnings[0].path, "widgets.0.actions.click");
}

#[test]
fn test_layout_vocabulary_is_closed() {
    let report = validate_template(
        &json!({
            "id": "p", "name": "P",
            "layout": {"type": "circle", "direction": "spiral"},
            "widgets": []
        }),
        &registry(),
    );
    assert!(!report.is_valid);
    assert_eq!(paths_with_code(&report, "INVALID_LAYOUT"), ["layout.type"]);
    assert_eq!(
        paths_with_code(&report, "INVALID_DIRECTION"),
        ["layout.direction"]
    );
}

#[test]
fn test_fragment_reference_needs_fragment_id_but_not_registry() {
    let reg = registry();
    let report = validate_template(
        &json!({
            "id": "p", "name": "P",
            "widgets": [{"type": "fragment", "fragmentId": "hero", "props": {"x": 1}}]
        }),
        &reg,
    );
    assert!(report.is_valid, "{:?}", report.diagnostics);

    let report = validate_template(
        &json!({
            "id": "p", "name": "P",
            "widgets": [{"type": "fragment", "props": {}}]
        }),
        &reg,
    );
    assert!(!report.is_valid);
    assert_eq!(
        paths_with_code(&report, "MISSING_FIELD"),
        ["widgets.0.fragmentId"]
    );
}

#[test]
fn test_fragment_document_validation() {
    let report = validate_fragment(
        &json!({
            "id": "hero", "name": "Hero",
            "props": {"title": {"type": "string", "required": true}},
            "widgets": [{"type": "heading", "props": {}, "bindings": {"text": "props.title"}}]
        }),
        &registry(),
    );
    assert!(report.is_valid, "{:?}", report.diagnostics);

    let report = validate_fragment(&json!({"name": "No Id", "widgets": []}), &registry());
    assert!(!report.is_valid);
    assert_eq!(paths_with_code(&report, "MISSING_FIELD"), ["id"]);
}

#[test]
fn test_state_key_lint_for_set_state() {
    let report = validate_template(
        &json!({
            "id": "p", "name": "P",
            "state": {"initial": {"count": 0}},
            "actions": [
                {"id": "a", "type": "setState", "stateUpdates": {"count": 1, "mode": "x"}}
            ],
            "widgets": []
        }),
        &registry(),
    );
    assert!(report.is_valid);
    let warnings = paths_with_code(&report, "UNKNOWN_STATE_KEY");
    assert_eq!(warnings, ["actions.0.stateUpdates.mode"]);
}

#[test]
fn test_assert_valid_template_summarizes_paths() {
    let err = assert_valid_template(
        &json!({"id": "", "name": "P", "widgets": [{"props": {}}]}),
        &registry(),
    )
    .unwrap_err();
    let text = err.to_string();
    assert!(text.contains("id"), "{text}");
    assert!(text.contains("widgets.0"), "{text}");

    assert!(assert_valid_template(
        &json!({"id": "p", "name": "P", "widgets": []}),
        &registry()
    )
    .is_ok());
}

#[test]
fn test_every_diagnostic_has_level_code_message() {
    let report = validate_template(
        &json!({
            "id": "", "name": 3,
            "layout": [],
            "state": {"initial": 5},
            "widgets": [{"type": "ghost", "props": []}]
        }),
        &registry(),
    );
    assert!(!report.is_valid);
    for diagnostic in &report.diagnostics {
        assert!(!diagnostic.code.is_empty());
        assert!(!diagnostic.message.is_empty());
        assert!(matches!(
            diagnostic.level,
            DiagnosticLevel::Error | DiagnosticLevel::Warning
        ));
    }
}
