//! Top-level template and fragment checks.
//!
//! Everything here operates on the raw decoded value so malformed documents
//! of any shape can be diagnosed; the typed decode only runs as a final
//! probe once no structural errors remain.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::dsl::schema::{ActionKind, PageTemplate, TemplateFragment};
use crate::widgets::WidgetRegistry;

use super::context::ValidationContext;
use super::types::codes;
use super::widgets::check_widget_list;

const LAYOUT_TYPES: &[&str] = &["flex", "grid", "block"];
const FLEX_DIRECTIONS: &[&str] = &["row", "column", "row-reverse", "column-reverse"];

pub(crate) fn check_template(value: &Value, registry: &WidgetRegistry, ctx: &mut ValidationContext) {
    let Some(obj) = as_object_root(value, "template", ctx) else {
        return;
    };

    require_nonempty_string(obj, "id", ctx);
    require_nonempty_string(obj, "name", ctx);
    optional_string(obj, "description", ctx);
    optional_string(obj, "version", ctx);

    if let Some(layout) = obj.get("layout") {
        check_layout(layout, ctx);
    }
    if let Some(state) = obj.get("state") {
        check_state(state, ctx);
    }

    let declared_actions = match obj.get("actions") {
        Some(actions) => check_actions(actions, ctx),
        None => HashSet::new(),
    };
    if let Some(loaders) = obj.get("loaders") {
        check_loaders(loaders, ctx);
    }
    if let Some(meta) = obj.get("meta") {
        if !meta.is_object() {
            ctx.error_at("meta", codes::INVALID_TYPE, "meta must be an object");
        }
    }

    check_widgets_field(obj, registry, Some(&declared_actions), ctx);

    // Everything the raw checks missed still has to decode into the typed
    // model, otherwise a "valid" report could not produce data.
    if !ctx.has_errors() {
        if let Err(e) = serde_json::from_value::<PageTemplate>(value.clone()) {
            ctx.error(codes::INVALID_TYPE, format!("template failed to decode: {}", e));
        }
    }
}

pub(crate) fn check_fragment(value: &Value, registry: &WidgetRegistry, ctx: &mut ValidationContext) {
    let Some(obj) = as_object_root(value, "fragment", ctx) else {
        return;
    };

    require_nonempty_string(obj, "id", ctx);
    require_nonempty_string(obj, "name", ctx);
    optional_string(obj, "description", ctx);

    if let Some(props) = obj.get("props") {
        check_fragment_props(props, ctx);
    }

    check_widgets_field(obj, registry, None, ctx);

    if !ctx.has_errors() {
        if let Err(e) = serde_json::from_value::<TemplateFragment>(value.clone()) {
            ctx.error(codes::INVALID_TYPE, format!("fragment failed to decode: {}", e));
        }
    }
}

fn check_widgets_field(
    obj: &Map<String, Value>,
    registry: &WidgetRegistry,
    declared_actions: Option<&HashSet<String>>,
    ctx: &mut ValidationContext,
) {
    ctx.push("widgets");
    match obj.get("widgets") {
        None => ctx.error(codes::MISSING_FIELD, "missing required field \"widgets\""),
        Some(Value::Array(items)) => check_widget_list(items, registry, declared_actions, ctx),
        Some(other) => ctx.error(
            codes::INVALID_TYPE,
            format!("widgets must be an array, got {}", json_kind(other)),
        ),
    }
    ctx.pop();
}

fn check_layout(value: &Value, ctx: &mut ValidationContext) {
    ctx.push("layout");
    let Some(obj) = require_object(value, "layout", ctx) else {
        ctx.pop();
        return;
    };

    if let Some(t) = obj.get("type") {
        ctx.push("type");
        match t.as_str() {
            Some(s) if LAYOUT_TYPES.contains(&s) => {}
            Some(s) => ctx.error(
                codes::INVALID_LAYOUT,
                format!("unknown layout type \"{}\", expected one of flex, grid, block", s),
            ),
            None => ctx.error(codes::INVALID_LAYOUT, "layout type must be a string"),
        }
        ctx.pop();
    }

    if let Some(d) = obj.get("direction") {
        match d.as_str() {
            Some(s) if FLEX_DIRECTIONS.contains(&s) => {}
            _ => ctx.error_at(
                "direction",
                codes::INVALID_DIRECTION,
                format!("direction must be one of {}", FLEX_DIRECTIONS.join(", ")),
            ),
        }
    }

    for field in ["gap", "padding", "columns", "rows"] {
        optional_u64(obj, field, ctx);
    }
    optional_string(obj, "maxWidth", ctx);
    optional_bool(obj, "centered", ctx);
    ctx.pop();
}

fn check_state(value: &Value, ctx: &mut ValidationContext) {
    ctx.push("state");
    let Some(obj) = require_object(value, "state", ctx) else {
        ctx.pop();
        return;
    };

    if let Some(initial) = obj.get("initial") {
        ctx.push("initial");
        match initial.as_object() {
            Some(map) => {
                for key in map.keys() {
                    ctx.record_state_key(key);
                }
            }
            None => ctx.error(codes::INVALID_TYPE, "state.initial must be an object"),
        }
        ctx.pop();
    }

    if let Some(computed) = obj.get("computed") {
        ctx.push("computed");
        match computed.as_object() {
            Some(map) => {
                for (key, expr) in map {
                    if !expr.is_string() {
                        ctx.error_at(key, codes::INVALID_TYPE, "computed expression must be a string");
                    }
                }
            }
            None => ctx.error(codes::INVALID_TYPE, "state.computed must be an object"),
        }
        ctx.pop();
    }
    ctx.pop();
}

fn check_actions(value: &Value, ctx: &mut ValidationContext) -> HashSet<String> {
    let mut seen = HashSet::new();

    ctx.push("actions");
    let Some(entries) = require_array(value, "actions", ctx) else {
        ctx.pop();
        return seen;
    };

    for (i, entry) in entries.iter().enumerate() {
        ctx.push_index(i);
        let Some(obj) = require_object(entry, "action", ctx) else {
            ctx.pop();
            continue;
        };

        if let Some(id) = require_nonempty_string(obj, "id", ctx) {
            if !seen.insert(id.to_string()) {
                ctx.error_at("id", codes::DUPLICATE_ID, format!("duplicate action id \"{}\"", id));
            }
        }

        match check_action_type(obj, ctx) {
            Some(ActionKind::Navigate) => {
                require_nonempty_string(obj, "path", ctx);
            }
            Some(ActionKind::SetState) => check_state_updates(obj, ctx),
            Some(ActionKind::Api) => {
                require_nonempty_string(obj, "apiRoute", ctx);
                require_nonempty_string(obj, "method", ctx);
            }
            Some(ActionKind::Custom) => {
                require_nonempty_string(obj, "handler", ctx);
            }
            Some(ActionKind::Reload) | None => {}
        }

        optional_string(obj, "confirm", ctx);
        optional_u64(obj, "debounceMs", ctx);
        ctx.pop();
    }
    ctx.pop();
    seen
}

fn check_action_type(obj: &Map<String, Value>, ctx: &mut ValidationContext) -> Option<ActionKind> {
    ctx.push("type");
    let kind = match obj.get("type") {
        None => {
            ctx.error(codes::MISSING_FIELD, "missing required field \"type\"");
            None
        }
        Some(Value::String(s)) => {
            let kind = ActionKind::parse(s);
            if kind.is_none() {
                ctx.error(
                    codes::INVALID_ACTION,
                    format!(
                        "unknown action type \"{}\", expected one of navigate, setState, api, reload, custom",
                        s
                    ),
                );
            }
            kind
        }
        Some(_) => {
            ctx.error(codes::INVALID_TYPE, "action type must be a string");
            None
        }
    };
    ctx.pop();
    kind
}

fn check_state_updates(obj: &Map<String, Value>, ctx: &mut ValidationContext) {
    ctx.push("stateUpdates");
    match obj.get("stateUpdates") {
        None => ctx.error(codes::MISSING_FIELD, "setState requires \"stateUpdates\""),
        Some(Value::Object(updates)) => {
            // Only lint against declared keys when the author declared any;
            // templates seeding state entirely from loaders stay quiet.
            if !ctx.state_keys().is_empty() {
                let unknown: Vec<String> = updates
                    .keys()
                    .filter(|k| !ctx.state_keys().contains(k))
                    .cloned()
                    .collect();
                for key in unknown {
                    ctx.push(&key);
                    ctx.warning(
                        codes::UNKNOWN_STATE_KEY,
                        format!("setState writes \"{}\", which is not declared in state.initial", key),
                    );
                    ctx.pop();
                }
            }
        }
        Some(other) => ctx.error(
            codes::INVALID_TYPE,
            format!("stateUpdates must be an object, got {}", json_kind(other)),
        ),
    }
    ctx.pop();
}

fn check_loaders(value: &Value, ctx: &mut ValidationContext) {
    ctx.push("loaders");
    let Some(entries) = require_array(value, "loaders", ctx) else {
        ctx.pop();
        return;
    };

    let mut seen = HashSet::new();
    for (i, entry) in entries.iter().enumerate() {
        ctx.push_index(i);
        let Some(obj) = require_object(entry, "loader", ctx) else {
            ctx.pop();
            continue;
        };

        if let Some(id) = require_nonempty_string(obj, "id", ctx) {
            if !seen.insert(id.to_string()) {
                ctx.error_at("id", codes::DUPLICATE_ID, format!("duplicate loader id \"{}\"", id));
            }
        }
        require_nonempty_string(obj, "apiRoute", ctx);
        require_nonempty_string(obj, "method", ctx);
        optional_string(obj, "stateKey", ctx);
        optional_string(obj, "dataKey", ctx);

        if let Some(cache) = obj.get("cache") {
            ctx.push("cache");
            match cache.as_object() {
                Some(cache_obj) => {
                    optional_u64(cache_obj, "ttlSecs", ctx);
                    optional_string(cache_obj, "key", ctx);
                }
                None => ctx.error(codes::INVALID_TYPE, "cache must be an object"),
            }
            ctx.pop();
        }

        if let Some(polling) = obj.get("polling") {
            ctx.push("polling");
            match polling.as_object() {
                Some(polling_obj) => {
                    ctx.push("intervalMs");
                    match polling_obj.get("intervalMs") {
                        None => ctx.error(codes::MISSING_FIELD, "polling requires \"intervalMs\""),
                        Some(v) if v.as_u64().is_none() => ctx.error(
                            codes::INVALID_TYPE,
                            "\"intervalMs\" must be a non-negative integer",
                        ),
                        Some(_) => {}
                    }
                    ctx.pop();
                }
                None => ctx.error(codes::INVALID_TYPE, "polling must be an object"),
            }
            ctx.pop();
        }

        optional_bool(obj, "runOnNavigate", ctx);
        ctx.pop();
    }
    ctx.pop();
}

fn check_fragment_props(value: &Value, ctx: &mut ValidationContext) {
    ctx.push("props");
    let Some(map) = require_object(value, "props", ctx) else {
        ctx.pop();
        return;
    };

    for (name, spec) in map {
        ctx.push(name);
        match spec.as_object() {
            Some(spec_obj) => {
                optional_string(spec_obj, "type", ctx);
                optional_bool(spec_obj, "required", ctx);
            }
            None => ctx.error(codes::INVALID_TYPE, "prop spec must be an object"),
        }
        ctx.pop();
    }
    ctx.pop();
}

// ================================
// Shared value-shape helpers
// ================================

pub(crate) fn as_object_root<'a>(
    value: &'a Value,
    what: &str,
    ctx: &mut ValidationContext,
) -> Option<&'a Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        other => {
            ctx.error(
                codes::INVALID_ROOT,
                format!("{} must be an object, got {}", what, json_kind(other)),
            );
            None
        }
    }
}

/// Object gate for a value whose path segment is already pushed.
pub(crate) fn require_object<'a>(
    value: &'a Value,
    what: &str,
    ctx: &mut ValidationContext,
) -> Option<&'a Map<String, Value>> {
    match value.as_object() {
        Some(map) => Some(map),
        None => {
            ctx.error(
                codes::INVALID_TYPE,
                format!("{} must be an object, got {}", what, json_kind(value)),
            );
            None
        }
    }
}

/// Array gate for a value whose path segment is already pushed.
pub(crate) fn require_array<'a>(
    value: &'a Value,
    what: &str,
    ctx: &mut ValidationContext,
) -> Option<&'a [Value]> {
    match value.as_array() {
        Some(items) => Some(items.as_slice()),
        None => {
            ctx.error(
                codes::INVALID_TYPE,
                format!("{} must be an array, got {}", what, json_kind(value)),
            );
            None
        }
    }
}

/// Check a required non-empty string field; returns it when well-formed.
pub(crate) fn require_nonempty_string<'a>(
    obj: &'a Map<String, Value>,
    field: &str,
    ctx: &mut ValidationContext,
) -> Option<&'a str> {
    ctx.push(field);
    let result = match obj.get(field) {
        None => {
            ctx.error(codes::MISSING_FIELD, format!("missing required field \"{}\"", field));
            None
        }
        Some(Value::String(s)) => {
            if s.trim().is_empty() {
                ctx.error(codes::EMPTY_FIELD, format!("\"{}\" must not be empty", field));
                None
            } else {
                Some(s.as_str())
            }
        }
        Some(_) => {
            ctx.error(codes::INVALID_TYPE, format!("\"{}\" must be a string", field));
            None
        }
    };
    ctx.pop();
    result
}

pub(crate) fn optional_string(obj: &Map<String, Value>, field: &str, ctx: &mut ValidationContext) {
    if let Some(v) = obj.get(field) {
        if !v.is_string() {
            ctx.error_at(field, codes::INVALID_TYPE, format!("\"{}\" must be a string", field));
        }
    }
}

fn optional_u64(obj: &Map<String, Value>, field: &str, ctx: &mut ValidationContext) {
    if let Some(v) = obj.get(field) {
        if v.as_u64().is_none() {
            ctx.error_at(
                field,
                codes::INVALID_TYPE,
                format!("\"{}\" must be a non-negative integer", field),
            );
        }
    }
}

fn optional_bool(obj: &Map<String, Value>, field: &str, ctx: &mut ValidationContext) {
    if let Some(v) = obj.get(field) {
        if !v.is_boolean() {
            ctx.error_at(field, codes::INVALID_TYPE, format!("\"{}\" must be a boolean", field));
        }
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
