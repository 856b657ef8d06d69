//! Display cards built from raw search hits.

use crate::request::ContentItem;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Object type reported for hits without a `contentType`.
pub const DEFAULT_OBJECT_TYPE: &str = "content";

/// Rule set that shapes raw hits into cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CardMapping {
    /// Card field -> constant value merged into every card.
    pub constant_data: Map<String, Value>,
    /// Raw keys copied into `Card::meta_data`.
    pub meta_data: Vec<String>,
    /// Card field -> dotted path into the raw hit.
    pub dynamic_fields: BTreeMap<String, String>,
}

/// Display-shaped projection of one search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub identifier: Option<String>,
    pub object_type: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub rating: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    pub meta_data: Map<String, Value>,
}

impl Card {
    pub fn title(&self) -> &str {
        self.name
            .as_deref()
            .or(self.identifier.as_deref())
            .unwrap_or("Untitled")
    }

    pub fn field_str(&self, key: &str) -> Option<String> {
        self.fields.get(key).map(value_to_display)
    }
}

impl CardMapping {
    /// Map hits to cards, preserving order.
    pub fn to_cards(&self, content: &[ContentItem]) -> Vec<Card> {
        content.iter().map(|item| self.to_card(item)).collect()
    }

    pub fn to_card(&self, item: &ContentItem) -> Card {
        let mut fields = self.constant_data.clone();
        for (field, path) in &self.dynamic_fields {
            if let Some(value) = item.get_path(path) {
                fields.insert(field.clone(), value.clone());
            }
        }

        let meta_data = self
            .meta_data
            .iter()
            .filter_map(|key| item.get(key).map(|value| (key.clone(), value.clone())))
            .collect();

        Card {
            identifier: item.identifier().map(str::to_string),
            object_type: item
                .content_type()
                .unwrap_or(DEFAULT_OBJECT_TYPE)
                .to_string(),
            name: first_str(item, &["name", "courseName"]),
            image: first_str(item, &["appIcon", "courseLogoUrl"]),
            description: first_str(item, &["description"]),
            rating: item
                .get("me_averageRating")
                .filter(|value| !value.is_null())
                .map(value_to_display)
                .unwrap_or_else(|| "0".to_string()),
            fields,
            meta_data,
        }
    }
}

fn first_str(item: &ContentItem, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| item.get_str(key))
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

fn value_to_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_to_display)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
