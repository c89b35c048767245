use std::collections::HashMap;

use crate::widgets::adapter::WidgetAdapter;
use crate::widgets::builtin;

/// Maps widget type names to their adapters. Always an injected value,
/// owned by the host and passed by reference into the validator and
/// renderer; there is no global registry.
pub struct WidgetRegistry {
    adapters: HashMap<String, Box<dyn WidgetAdapter>>,
}

impl WidgetRegistry {
    /// Empty registry; the host registers every type itself.
    pub fn new() -> Self {
        WidgetRegistry {
            adapters: HashMap::new(),
        }
    }

    /// Registry preloaded with the built-in widget set.
    pub fn with_builtins() -> Self {
        let mut registry = WidgetRegistry::new();
        builtin::register_builtins(&mut registry);
        registry
    }

    /// Register an adapter under a type name. Re-registering a name
    /// replaces the previous adapter.
    pub fn register(&mut self, widget_type: &str, adapter: Box<dyn WidgetAdapter>) {
        self.adapters.insert(widget_type.to_string(), adapter);
    }

    pub fn get(&self, widget_type: &str) -> Option<&dyn WidgetAdapter> {
        self.adapters.get(widget_type).map(|adapter| adapter.as_ref())
    }

    pub fn contains(&self, widget_type: &str) -> bool {
        self.adapters.contains_key(widget_type)
    }

    /// All registered type names.
    pub fn registered_types(&self) -> Vec<String> {
        self.adapters.keys().cloned().collect()
    }
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::adapter::{PropMap, TransformContext, WidgetAdapter};

    struct Probe;
    impl WidgetAdapter for Probe {
        fn has_children(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = WidgetRegistry::new();
        assert!(!registry.contains("probe"));
        registry.register("probe", Box::new(Probe));
        assert!(registry.contains("probe"));
        assert!(registry.get("probe").map(|a| a.has_children()).unwrap());
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn test_reregistering_replaces() {
        struct Leaf;
        impl WidgetAdapter for Leaf {}

        let mut registry = WidgetRegistry::new();
        registry.register("x", Box::new(Probe));
        registry.register("x", Box::new(Leaf));
        assert!(!registry.get("x").unwrap().has_children());
        assert_eq!(registry.registered_types(), vec!["x".to_string()]);
    }

    #[test]
    fn test_custom_adapter_transform_runs() {
        struct Stamper;
        impl WidgetAdapter for Stamper {
            fn transform_props(&self, mut raw: PropMap, _ctx: &TransformContext<'_>) -> PropMap {
                raw.insert("stamped".to_string(), serde_json::json!(true));
                raw
            }
        }

        let mut registry = WidgetRegistry::new();
        registry.register("stamper", Box::new(Stamper));
        let bindings = PropMap::new();
        let actions = std::collections::HashMap::new();
        let ctx = TransformContext::bare(&bindings, &actions);
        let out = registry
            .get("stamper")
            .unwrap()
            .transform_props(PropMap::new(), &ctx);
        assert_eq!(out.get("stamped"), Some(&serde_json::json!(true)));
    }
}
