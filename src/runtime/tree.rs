use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::runtime::layout::LayoutHints;
use crate::widgets::adapter::PropMap;

/// One widget instance after condition gates, loop expansion, binding
/// resolution and adapter prop shaping have all run. Hosts consume this
/// tree; nothing in it refers back to the declarative document.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RenderedNode {
    /// Stable identity for host-side reconciliation, unique among siblings.
    pub key: String,
    #[serde(rename = "type")]
    pub widget_type: String,
    #[serde(default, skip_serializing_if = "PropMap::is_empty")]
    pub props: PropMap,
    /// Event name → declared action id, copied through for the host to wire.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub actions: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RenderedNode>,
}

/// Full output of one render pass.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub layout: LayoutHints,
    pub widgets: Vec<RenderedNode>,
}

impl RenderedPage {
    /// Total node count across the whole tree.
    pub fn node_count(&self) -> usize {
        fn count(nodes: &[RenderedNode]) -> usize {
            nodes.iter().map(|n| 1 + count(&n.children)).sum()
        }
        count(&self.widgets)
    }

    /// Depth-first search by key.
    pub fn find(&self, key: &str) -> Option<&RenderedNode> {
        fn walk<'a>(nodes: &'a [RenderedNode], key: &str) -> Option<&'a RenderedNode> {
            for node in nodes {
                if node.key == key {
                    return Some(node);
                }
                if let Some(found) = walk(&node.children, key) {
                    return Some(found);
                }
            }
            None
        }
        walk(&self.widgets, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::layout::LayoutHints;
    use serde_json::json;

    fn leaf(key: &str) -> RenderedNode {
        RenderedNode {
            key: key.to_string(),
            widget_type: "text".to_string(),
            props: PropMap::new(),
            actions: HashMap::new(),
            children: Vec::new(),
        }
    }

    #[test]
    fn test_node_count_and_find() {
        let mut root = leaf("root");
        root.widget_type = "container".to_string();
        root.children = vec![leaf("a"), leaf("b")];
        let page = RenderedPage {
            layout: LayoutHints::from_config(None),
            widgets: vec![root, leaf("c")],
        };
        assert_eq!(page.node_count(), 4);
        assert_eq!(page.find("b").map(|n| n.widget_type.as_str()), Some("text"));
        assert!(page.find("missing").is_none());
    }

    #[test]
    fn test_serialized_shape() {
        let mut node = leaf("hello-0");
        node.props.insert("text".to_string(), json!("hi"));
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(
            value,
            json!({"key": "hello-0", "type": "text", "props": {"text": "hi"}})
        );
    }
}
