//! Recursive widget-tree checks.

use std::collections::HashSet;

use serde_json::Value;

use crate::dsl::schema::FRAGMENT_TYPE;
use crate::widgets::WidgetRegistry;

use super::context::ValidationContext;
use super::template::{
    json_kind, optional_string, require_array, require_nonempty_string, require_object,
};
use super::types::codes;

/// Check every node in a widget array, one path index per element.
pub(crate) fn check_widget_list(
    items: &[Value],
    registry: &WidgetRegistry,
    declared_actions: Option<&HashSet<String>>,
    ctx: &mut ValidationContext,
) {
    for (i, item) in items.iter().enumerate() {
        ctx.push_index(i);
        check_widget(item, registry, declared_actions, ctx);
        ctx.pop();
    }
}

fn check_widget(
    value: &Value,
    registry: &WidgetRegistry,
    declared_actions: Option<&HashSet<String>>,
    ctx: &mut ValidationContext,
) {
    let Some(obj) = require_object(value, "widget node", ctx) else {
        return;
    };

    let widget_type = require_nonempty_string(obj, "type", ctx);
    let is_fragment = widget_type == Some(FRAGMENT_TYPE);

    if is_fragment {
        // Fragment references are structural; the registry never sees them.
        require_nonempty_string(obj, "fragmentId", ctx);
        if let Some(props) = obj.get("props") {
            if !props.is_object() {
                ctx.error_at(
                    "props",
                    codes::INVALID_TYPE,
                    format!("fragment props must be an object, got {}", json_kind(props)),
                );
            }
        }
    } else {
        if let Some(t) = widget_type {
            if !registry.contains(t) {
                ctx.push("type");
                ctx.error(codes::UNKNOWN_WIDGET, format!("unknown widget type \"{}\"", t));
                ctx.pop();
            }
        }
        ctx.push("props");
        match obj.get("props") {
            None => ctx.error(codes::MISSING_FIELD, "missing required field \"props\""),
            Some(props) if !props.is_object() => ctx.error(
                codes::INVALID_TYPE,
                format!("props must be an object, got {}", json_kind(props)),
            ),
            Some(_) => {}
        }
        ctx.pop();
    }

    optional_string(obj, "id", ctx);

    if let Some(bindings) = obj.get("bindings") {
        ctx.push("bindings");
        if let Some(map) = require_object(bindings, "bindings", ctx) {
            for (prop, path) in map {
                if !path.is_string() {
                    ctx.error_at(prop, codes::INVALID_TYPE, "binding path must be a string");
                }
            }
        }
        ctx.pop();
    }

    if let Some(actions) = obj.get("actions") {
        ctx.push("actions");
        if let Some(map) = require_object(actions, "actions", ctx) {
            for (event, action_id) in map {
                ctx.push(event);
                match action_id.as_str() {
                    None => ctx.error(
                        codes::INVALID_TYPE,
                        "action reference must be a string action id",
                    ),
                    Some(id) => {
                        // A reference outside the declared list still renders
                        // when the host supplies onAction, so warn only.
                        if let Some(declared) = declared_actions {
                            if !declared.contains(id) {
                                ctx.warning(
                                    codes::UNKNOWN_ACTION_REF,
                                    format!(
                                        "action \"{}\" is not declared in the template's action list",
                                        id
                                    ),
                                );
                            }
                        }
                    }
                }
                ctx.pop();
            }
        }
        ctx.pop();
    }

    if let Some(condition) = obj.get("condition") {
        if !condition.is_string() {
            ctx.push("condition");
            ctx.error(codes::INVALID_TYPE, "condition must be an expression string");
            ctx.pop();
        }
    }

    if let Some(loop_spec) = obj.get("loop") {
        ctx.push("loop");
        if let Some(loop_obj) = require_object(loop_spec, "loop", ctx) {
            require_nonempty_string(loop_obj, "items", ctx);
            optional_string(loop_obj, "itemVar", ctx);
            optional_string(loop_obj, "indexVar", ctx);
            optional_string(loop_obj, "keyExpr", ctx);
        }
        ctx.pop();
    }

    if let Some(children) = obj.get("children") {
        ctx.push("children");
        if let Some(kids) = require_array(children, "children", ctx) {
            if let Some(t) = widget_type {
                if is_fragment {
                    ctx.warning(
                        codes::NON_CONTAINER_CHILDREN,
                        "fragment references do not render children",
                    );
                } else if let Some(adapter) = registry.get(t) {
                    if !adapter.has_children() {
                        ctx.warning(
                            codes::NON_CONTAINER_CHILDREN,
                            format!("widget type \"{}\" does not render children", t),
                        );
                    }
                }
            }
            for (j, kid) in kids.iter().enumerate() {
                ctx.push_index(j);
                check_widget(kid, registry, declared_actions, ctx);
                ctx.pop();
            }
        }
        ctx.pop();
    }
}
