use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::evaluator::type_coercion::value_to_string;
use crate::widgets::adapter::{merge_props, PropMap, TransformContext, WidgetAdapter};
use crate::widgets::registry::WidgetRegistry;

/// Closed set of built-in widget type names. Documents address widgets by
/// these wire strings; custom types registered by the host live outside
/// this enum.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetKind {
    Text,
    Heading,
    Button,
    Image,
    Input,
    Container,
    Row,
    Column,
    Card,
    List,
    Divider,
}

impl WidgetKind {
    pub const ALL: &'static [WidgetKind] = &[
        WidgetKind::Text,
        WidgetKind::Heading,
        WidgetKind::Button,
        WidgetKind::Image,
        WidgetKind::Input,
        WidgetKind::Container,
        WidgetKind::Row,
        WidgetKind::Column,
        WidgetKind::Card,
        WidgetKind::List,
        WidgetKind::Divider,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetKind::Text => "text",
            WidgetKind::Heading => "heading",
            WidgetKind::Button => "button",
            WidgetKind::Image => "image",
            WidgetKind::Input => "input",
            WidgetKind::Container => "container",
            WidgetKind::Row => "row",
            WidgetKind::Column => "column",
            WidgetKind::Card => "card",
            WidgetKind::List => "list",
            WidgetKind::Divider => "divider",
        }
    }

    /// Whether this kind renders declared children.
    pub fn container_capable(&self) -> bool {
        matches!(
            self,
            WidgetKind::Container
                | WidgetKind::Row
                | WidgetKind::Column
                | WidgetKind::Card
                | WidgetKind::List
        )
    }
}

impl std::fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ================================
// Built-in adapters
// ================================

/// Shared adapter for every container kind; no prop shaping beyond the
/// default merge.
struct ContainerAdapter;

impl WidgetAdapter for ContainerAdapter {
    fn has_children(&self) -> bool {
        true
    }
}

struct TextAdapter;

impl WidgetAdapter for TextAdapter {
    fn transform_props(&self, raw: PropMap, ctx: &TransformContext<'_>) -> PropMap {
        let mut props = merge_props(self.default_props(), raw, ctx.bindings);
        coerce_to_display_string(&mut props, "text");
        props
    }
}

struct HeadingAdapter;

impl WidgetAdapter for HeadingAdapter {
    fn default_props(&self) -> PropMap {
        object(json!({"level": 2}))
    }

    fn transform_props(&self, raw: PropMap, ctx: &TransformContext<'_>) -> PropMap {
        let mut props = merge_props(self.default_props(), raw, ctx.bindings);
        coerce_to_display_string(&mut props, "text");
        props
    }
}

struct ButtonAdapter;

impl WidgetAdapter for ButtonAdapter {
    fn default_props(&self) -> PropMap {
        object(json!({"disabled": false}))
    }

    fn transform_props(&self, raw: PropMap, ctx: &TransformContext<'_>) -> PropMap {
        let mut props = merge_props(self.default_props(), raw, ctx.bindings);
        coerce_to_display_string(&mut props, "label");
        props.insert(
            "hasClickAction".to_string(),
            Value::Bool(ctx.action_handler("click").is_some()),
        );
        props
    }
}

struct ImageAdapter;

impl WidgetAdapter for ImageAdapter {
    fn default_props(&self) -> PropMap {
        object(json!({"alt": ""}))
    }

    fn transform_props(&self, raw: PropMap, ctx: &TransformContext<'_>) -> PropMap {
        let mut props = merge_props(self.default_props(), raw, ctx.bindings);
        coerce_to_display_string(&mut props, "src");
        coerce_to_display_string(&mut props, "alt");
        props
    }
}

struct InputAdapter;

impl WidgetAdapter for InputAdapter {
    fn default_props(&self) -> PropMap {
        object(json!({"value": ""}))
    }

    fn transform_props(&self, raw: PropMap, ctx: &TransformContext<'_>) -> PropMap {
        let mut props = merge_props(self.default_props(), raw, ctx.bindings);
        coerce_to_display_string(&mut props, "value");
        props
    }
}

struct DividerAdapter;

impl WidgetAdapter for DividerAdapter {}

/// Non-string values bound into display slots become display text.
fn coerce_to_display_string(props: &mut PropMap, key: &str) {
    if let Some(value) = props.get(key) {
        if !value.is_string() {
            let text = value_to_string(value);
            props.insert(key.to_string(), Value::String(text));
        }
    }
}

fn object(value: Value) -> PropMap {
    match value {
        Value::Object(map) => map,
        _ => PropMap::new(),
    }
}

/// Install every built-in adapter.
pub fn register_builtins(registry: &mut WidgetRegistry) {
    // Leaf widgets
    registry.register(WidgetKind::Text.as_str(), Box::new(TextAdapter));
    registry.register(WidgetKind::Heading.as_str(), Box::new(HeadingAdapter));
    registry.register(WidgetKind::Button.as_str(), Box::new(ButtonAdapter));
    registry.register(WidgetKind::Image.as_str(), Box::new(ImageAdapter));
    registry.register(WidgetKind::Input.as_str(), Box::new(InputAdapter));
    registry.register(WidgetKind::Divider.as_str(), Box::new(DividerAdapter));

    // Containers
    registry.register(WidgetKind::Container.as_str(), Box::new(ContainerAdapter));
    registry.register(WidgetKind::Row.as_str(), Box::new(ContainerAdapter));
    registry.register(WidgetKind::Column.as_str(), Box::new(ContainerAdapter));
    registry.register(WidgetKind::Card.as_str(), Box::new(ContainerAdapter));
    registry.register(WidgetKind::List.as_str(), Box::new(ContainerAdapter));
}
