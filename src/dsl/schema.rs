use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

// ================================
// Page Template Schema
// ================================

/// Root template aggregate: one renderable page.
///
/// `id`, `name` and `widgets` are required (`widgets` may be empty, never
/// omitted); everything else is optional and round-trips as absent.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PageTemplate {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<StateConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub loaders: Vec<LoaderConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ActionConfig>,
    pub widgets: Vec<WidgetNode>,
    /// Free-form host metadata; never interpreted by the engine.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub meta: HashMap<String, Value>,
}

/// A named, reusable widget subtree, spliced into pages by reference.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct TemplateFragment {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared parameter schema, keyed by prop name.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub props: HashMap<String, FragmentPropSpec>,
    pub widgets: Vec<WidgetNode>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct FragmentPropSpec {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub prop_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

// ================================
// Widget Nodes
// ================================

/// One declarative tree element.
///
/// A node whose `type` is `"fragment"` is a fragment reference: `fragment_id`
/// names the fragment to splice and `props` becomes the parameter payload.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct WidgetNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub widget_type: String,
    // Always serialized, even when empty: the validator requires the field
    // on ordinary widgets, so round-trips must keep it.
    #[serde(default)]
    pub props: serde_json::Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<WidgetNode>>,
    /// Prop name → dotted data path, resolved at render time.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub bindings: HashMap<String, String>,
    /// Event name → action id from the template's action list.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub actions: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(rename = "loop", default, skip_serializing_if = "Option::is_none")]
    pub loop_spec: Option<LoopSpec>,
    #[serde(rename = "fragmentId", default, skip_serializing_if = "Option::is_none")]
    pub fragment_id: Option<String>,
}

impl WidgetNode {
    /// Fragment references are detected structurally, never via the registry.
    pub fn is_fragment_reference(&self) -> bool {
        self.widget_type == FRAGMENT_TYPE
    }
}

/// Reserved widget type name marking a fragment reference.
pub const FRAGMENT_TYPE: &str = "fragment";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoopSpec {
    /// Dotted path to the array to iterate.
    pub items: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_var: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_var: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_expr: Option<String>,
}

impl LoopSpec {
    pub fn item_var(&self) -> &str {
        self.item_var.as_deref().unwrap_or(DEFAULT_ITEM_VAR)
    }

    pub fn index_var(&self) -> &str {
        self.index_var.as_deref().unwrap_or(DEFAULT_INDEX_VAR)
    }
}

pub const DEFAULT_ITEM_VAR: &str = "item";
pub const DEFAULT_INDEX_VAR: &str = "index";

// ================================
// Layout
// ================================

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    #[serde(rename = "type", default)]
    pub layout_type: LayoutType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<FlexDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub centered: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LayoutType {
    Flex,
    Grid,
    Block,
}

impl Default for LayoutType {
    fn default() -> Self {
        Self::Block
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FlexDirection {
    Row,
    Column,
    RowReverse,
    ColumnReverse,
}

impl std::fmt::Display for FlexDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(|s| s.to_string()))
            .unwrap_or_else(|| format!("{:?}", self));
        write!(f, "{}", s)
    }
}

// ================================
// State
// ================================

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct StateConfig {
    /// Seeds the renderer's state store.
    #[serde(default)]
    pub initial: serde_json::Map<String, Value>,
    /// Key → expression, re-evaluated into the state view on every render.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub computed: HashMap<String, String>,
}

// ================================
// Actions
// ================================

/// Declared response to a user-triggered event.  Kept deliberately loose so
/// invalid documents still decode and get path-keyed diagnostics; the
/// validator enforces the per-type required fields.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActionConfig {
    pub id: String,
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_updates: Option<serde_json::Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_route: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
    /// Host-side confirmation prompt before dispatch; never interpreted here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debounce_ms: Option<u64>,
}

/// Closed set of action types the engine knows how to classify.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    Navigate,
    SetState,
    Api,
    Reload,
    Custom,
}

impl ActionKind {
    pub const ALL: &'static [ActionKind] = &[
        ActionKind::Navigate,
        ActionKind::SetState,
        ActionKind::Api,
        ActionKind::Reload,
        ActionKind::Custom,
    ];

    /// Parse a wire type tag; `None` for anything outside the closed set.
    pub fn parse(tag: &str) -> Option<ActionKind> {
        serde_json::from_value(Value::String(tag.to_string())).ok()
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(|s| s.to_string()))
            .unwrap_or_else(|| format!("{:?}", self));
        write!(f, "{}", s)
    }
}

// ================================
// Loaders
// ================================

/// Declares *what* remote data a page needs; execution is entirely external.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoaderConfig {
    pub id: String,
    pub api_route: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<CachePolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polling: Option<PollingPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_on_navigate: Option<bool>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CachePolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PollingPolicy {
    pub interval_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_widget_node_minimal_roundtrip() {
        let raw = json!({"type": "text", "props": {"text": "hi"}});
        let node: WidgetNode = serde_json::from_value(raw).unwrap();
        assert_eq!(node.widget_type, "text");
        assert!(node.id.is_none());
        assert!(node.children.is_none());

        let back = serde_json::to_value(&node).unwrap();
        assert_eq!(back, json!({"type": "text", "props": {"text": "hi"}}));
    }

    #[test]
    fn test_loop_spec_var_defaults() {
        let spec: LoopSpec = serde_json::from_value(json!({"items": "data.rows"})).unwrap();
        assert_eq!(spec.item_var(), "item");
        assert_eq!(spec.index_var(), "index");

        let spec: LoopSpec =
            serde_json::from_value(json!({"items": "data.rows", "itemVar": "row"})).unwrap();
        assert_eq!(spec.item_var(), "row");
    }

    #[test]
    fn test_fragment_reference_detection() {
        let node: WidgetNode =
            serde_json::from_value(json!({"type": "fragment", "fragmentId": "header"})).unwrap();
        assert!(node.is_fragment_reference());
        assert_eq!(node.fragment_id.as_deref(), Some("header"));
    }

    #[test]
    fn test_layout_defaults_to_block() {
        let layout: LayoutConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(layout.layout_type, LayoutType::Block);

        let layout: LayoutConfig =
            serde_json::from_value(json!({"type": "flex", "direction": "row-reverse"})).unwrap();
        assert_eq!(layout.layout_type, LayoutType::Flex);
        assert_eq!(layout.direction, Some(FlexDirection::RowReverse));
    }

    #[test]
    fn test_action_kind_wire_names() {
        assert_eq!(ActionKind::parse("setState"), Some(ActionKind::SetState));
        assert_eq!(ActionKind::parse("navigate"), Some(ActionKind::Navigate));
        assert_eq!(ActionKind::parse("jump"), None);
        assert_eq!(ActionKind::SetState.to_string(), "setState");
    }

    #[test]
    fn test_template_optional_sections_default() {
        let raw = json!({"id": "p", "name": "Page", "widgets": []});
        let template: PageTemplate = serde_json::from_value(raw).unwrap();
        assert!(template.layout.is_none());
        assert!(template.actions.is_empty());
        assert!(template.loaders.is_empty());

        let back = serde_json::to_value(&template).unwrap();
        assert_eq!(back, json!({"id": "p", "name": "Page", "widgets": []}));
    }

    #[test]
    fn test_unknown_extra_fields_are_tolerated() {
        let raw = json!({
            "id": "p",
            "name": "Page",
            "widgets": [],
            "theme": {"mode": "dark"}
        });
        // Forward compatibility: undeclared fields decode without error.
        let template: PageTemplate = serde_json::from_value(raw).unwrap();
        assert_eq!(template.id, "p");
    }
}
