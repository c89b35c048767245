use serde::{Deserialize, Serialize};

use crate::dsl::schema::{FlexDirection, LayoutConfig, LayoutType};

/// Resolved layout description attached to a rendered page. Pure data; the
/// engine never interprets it beyond this translation.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LayoutHints {
    pub display: LayoutType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<FlexDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<String>,
    #[serde(default)]
    pub centered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
}

impl LayoutHints {
    /// Translate a declared layout block. No layout means block flow; a
    /// flex layout without a direction flows as a row.
    pub fn from_config(config: Option<&LayoutConfig>) -> Self {
        let Some(config) = config else {
            return Self::block();
        };
        let direction = config.direction.or_else(|| {
            matches!(config.layout_type, LayoutType::Flex).then_some(FlexDirection::Row)
        });
        Self {
            display: config.layout_type,
            direction,
            gap: config.gap,
            padding: config.padding,
            max_width: config.max_width.clone(),
            centered: config.centered.unwrap_or(false),
            columns: config.columns,
            rows: config.rows,
        }
    }

    fn block() -> Self {
        Self {
            display: LayoutType::Block,
            direction: None,
            gap: None,
            padding: None,
            max_width: None,
            centered: false,
            columns: None,
            rows: None,
        }
    }
}
