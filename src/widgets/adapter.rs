use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::runtime::actions::{ActionDispatcher, ActionHandler};
use crate::runtime::tree::RenderedNode;

/// Prop maps exchanged between documents, adapters and rendered output.
pub type PropMap = Map<String, Value>;

/// Render-time surroundings of one widget instance, handed to its adapter
/// while props are shaped.
pub struct TransformContext<'a> {
    /// Binding results for this node, resolved against the live scope.
    /// Paths that resolved to nothing are absent.
    pub bindings: &'a PropMap,
    /// Children rendered before the parent was dispatched.
    pub children: &'a [RenderedNode],
    /// Event name → declared action id.
    pub actions: &'a HashMap<String, String>,
    pub(crate) dispatcher: Option<&'a ActionDispatcher>,
}

impl<'a> TransformContext<'a> {
    /// Handle for the action wired to `event`, when one is declared and a
    /// dispatcher is in play.
    pub fn action_handler(&self, event: &str) -> Option<ActionHandler> {
        let action_id = self.actions.get(event)?;
        let dispatcher = self.dispatcher?;
        Some(dispatcher.handler(action_id))
    }

    #[cfg(test)]
    pub(crate) fn bare(bindings: &'a PropMap, actions: &'a HashMap<String, String>) -> Self {
        Self {
            bindings,
            children: &[],
            actions,
            dispatcher: None,
        }
    }
}

/// Capability seam between the engine and a concrete widget set. One
/// adapter per registered type name; the renderer consults it for child
/// handling and final prop shaping.
pub trait WidgetAdapter: Send + Sync {
    /// Whether declared children of this widget are rendered.
    fn has_children(&self) -> bool {
        false
    }

    /// Props layered underneath whatever the document declares.
    fn default_props(&self) -> PropMap {
        PropMap::new()
    }

    /// Final prop shaping for one instance. The default layers defaults,
    /// document props and resolved bindings, later wins.
    fn transform_props(&self, raw: PropMap, ctx: &TransformContext<'_>) -> PropMap {
        merge_props(self.default_props(), raw, ctx.bindings)
    }
}

/// Layer prop maps: `defaults` under `raw` under `bindings`.
pub fn merge_props(defaults: PropMap, raw: PropMap, bindings: &PropMap) -> PropMap {
    let mut merged = defaults;
    for (key, value) in raw {
        merged.insert(key, value);
    }
    for (key, value) in bindings {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> PropMap {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    struct Plain;
    impl WidgetAdapter for Plain {}

    #[test]
    fn test_merge_order_later_wins() {
        let merged = merge_props(
            as_map(json!({"a": 1, "b": 1, "c": 1})),
            as_map(json!({"b": 2, "c": 2})),
            &as_map(json!({"c": 3})),
        );
        assert_eq!(Value::Object(merged), json!({"a": 1, "b": 2, "c": 3}));
    }

    #[test]
    fn test_default_transform_applies_bindings_over_props() {
        let bindings = as_map(json!({"text": "from state"}));
        let actions = HashMap::new();
        let ctx = TransformContext::bare(&bindings, &actions);
        let out = Plain.transform_props(as_map(json!({"text": "literal", "size": 12})), &ctx);
        assert_eq!(
            Value::Object(out),
            json!({"text": "from state", "size": 12})
        );
    }

    #[test]
    fn test_adapter_defaults() {
        assert!(!Plain.has_children());
        assert!(Plain.default_props().is_empty());
    }

    #[test]
    fn test_action_handler_requires_declared_event() {
        let bindings = PropMap::new();
        let mut actions = HashMap::new();
        actions.insert("click".to_string(), "do-thing".to_string());
        let ctx = TransformContext::bare(&bindings, &actions);
        // No dispatcher attached, so even a declared event yields nothing.
        assert!(ctx.action_handler("click").is_none());
        assert!(ctx.action_handler("hover").is_none());
    }
}
