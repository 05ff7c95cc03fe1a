//! Attribute: a uniquely named record with free-form extra fields.

use super::{DbId, Entity, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;

/// Keys that belong to the record itself and never land in `properties`.
const RESERVED_KEYS: &[&str] = &["id", "name", "createdAt", "created_at"];

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub id: DbId,
    pub name: String,
    /// Extra fields supplied by clients, flattened into the JSON object.
    #[sqlx(json)]
    #[serde(flatten)]
    pub properties: Map<String, Value>,
    pub created_at: Timestamp,
}

impl Entity for Attribute {
    type Draft = NewAttribute;
    const LABEL: &'static str = "Attribute";

    fn id(&self) -> DbId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAttribute {
    pub name: String,
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateAttribute {
    pub name: Option<String>,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

/// Partial update. Keys present in `properties` replace the stored ones;
/// a JSON `null` removes the key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAttribute {
    pub name: Option<String>,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

/// Drops keys that would shadow the record's own columns.
pub(crate) fn strip_reserved(mut properties: Map<String, Value>) -> Map<String, Value> {
    for key in RESERVED_KEYS {
        properties.remove(*key);
    }
    properties
}

impl Attribute {
    /// Merge a partial update into this record in place.
    pub(crate) fn apply(&mut self, name: Option<String>, properties: Map<String, Value>) {
        if let Some(name) = name {
            self.name = name;
        }
        for (key, value) in strip_reserved(properties) {
            if value.is_null() {
                self.properties.remove(&key);
            } else {
                self.properties.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Attribute {
        let mut properties = Map::new();
        properties.insert("unit".into(), json!("cm"));
        properties.insert("searchable".into(), json!(true));
        Attribute {
            id: 3,
            name: "Width".into(),
            properties,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn serializes_properties_inline() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["name"], "Width");
        assert_eq!(value["unit"], "cm");
        assert!(value.get("properties").is_none());
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn create_payload_collects_extra_fields() {
        let input: CreateAttribute =
            serde_json::from_value(json!({ "name": "Color", "group": "visual", "id": 9 })).unwrap();
        assert_eq!(input.name.as_deref(), Some("Color"));
        let props = strip_reserved(input.properties);
        assert_eq!(props.get("group"), Some(&json!("visual")));
        assert!(!props.contains_key("id"));
    }

    #[test]
    fn apply_merges_and_removes_keys() {
        let mut attr = sample();
        let mut patch = Map::new();
        patch.insert("unit".into(), json!("mm"));
        patch.insert("searchable".into(), Value::Null);
        patch.insert("createdAt".into(), json!("2020-01-01"));
        attr.apply(None, patch);
        assert_eq!(attr.name, "Width");
        assert_eq!(attr.properties.get("unit"), Some(&json!("mm")));
        assert!(!attr.properties.contains_key("searchable"));
        assert!(!attr.properties.contains_key("createdAt"));
    }
}
