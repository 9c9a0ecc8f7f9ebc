//! The field-descriptor node making up a form's item tree.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::identity::ItemId;

/// Field-specific configuration (label, required flag, validation bounds...).
///
/// Opaque to the core except for the `name` sub-key, which is normalized
/// whenever it is set or changed. Interpretation of everything else belongs
/// to the rendering layer.
pub type ItemData = Map<String, Value>;

/// One field descriptor in the form's item tree.
///
/// `items`, when present, is an ordered child collection of the same shape;
/// insertion order is the render order. Absence means leaf. Wire keys stay
/// camelCase to match the historical event log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub uuid: ItemId,
    #[serde(rename = "itemName")]
    pub item_name: String,
    pub data: ItemData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Item>>,
}

impl Item {
    /// Leaf node with the given identity, kind tag, and data.
    pub fn new(uuid: ItemId, item_name: impl Into<String>, data: ItemData) -> Self {
        Self {
            uuid,
            item_name: item_name.into(),
            data,
            items: None,
        }
    }

    /// Child collection, created on first use.
    pub fn children_mut(&mut self) -> &mut Vec<Item> {
        self.items.get_or_insert_with(Vec::new)
    }

    pub fn children(&self) -> &[Item] {
        self.items.as_deref().unwrap_or(&[])
    }
}

/// Normalizes a field name to lowercase ASCII alphanumerics.
///
/// Submitted values are keyed by these names downstream, so anything that is
/// not a safe identifier character is stripped rather than escaped.
pub fn normalize_name(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Rewrites `data.name` in place through [`normalize_name`], if set.
///
/// Non-string values are left alone; presence checks belong to validation.
pub fn normalize_data_name(data: &mut ItemData) {
    if let Some(Value::String(name)) = data.get("name") {
        let cleaned = normalize_name(name);
        data.insert("name".to_owned(), Value::String(cleaned));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalize_strips_and_lowercases() {
        assert_eq!(normalize_name("My Field!"), "myfield");
        assert_eq!(normalize_name("Email"), "email");
        assert_eq!(normalize_name("a-b_c 9"), "abc9");
        assert_eq!(normalize_name("Ümlaut"), "mlaut");
        assert_eq!(normalize_name("!!!"), "");
    }

    #[test]
    fn normalize_data_name_only_touches_name() {
        let mut data = ItemData::new();
        data.insert("name".into(), json!("Phone Number"));
        data.insert("label".into(), json!("Phone Number"));
        normalize_data_name(&mut data);
        assert_eq!(data["name"], json!("phonenumber"));
        assert_eq!(data["label"], json!("Phone Number"));
    }

    #[test]
    fn normalize_data_name_ignores_non_strings() {
        let mut data = ItemData::new();
        data.insert("name".into(), json!(42));
        normalize_data_name(&mut data);
        assert_eq!(data["name"], json!(42));
    }

    #[test]
    fn item_serializes_with_wire_keys() {
        let item = Item::new(ItemId::generate(), "text", ItemData::new());
        let value = serde_json::to_value(&item).unwrap();
        assert!(value.get("itemName").is_some());
        assert!(value.get("items").is_none());
    }
}
