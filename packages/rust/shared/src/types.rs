//! Index record shapes exchanged with the dispatch primitive.

use serde::{Deserialize, Serialize};

/// A single index record, scoped to the page it is written for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValueEntry<V = serde_json::Value> {
    pub key: String,
    pub value: V,
}

impl<V> KeyValueEntry<V> {
    pub fn new(key: impl Into<String>, value: V) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// A record returned by a prefix scan. Scans may span pages, so the owning
/// page travels with each record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexScanResult<V = serde_json::Value> {
    pub key: String,
    pub page: String,
    pub value: V,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_result_decodes_typed_value() {
        #[derive(Debug, PartialEq, Deserialize)]
        struct Tag {
            name: String,
        }

        let raw = serde_json::json!({
            "key": "tag:todo",
            "page": "Projects/Garden",
            "value": { "name": "todo" }
        });
        let parsed: IndexScanResult<Tag> = serde_json::from_value(raw).expect("deserialize");
        assert_eq!(parsed.page, "Projects/Garden");
        assert_eq!(parsed.value.name, "todo");
    }

    #[test]
    fn entry_serializes_as_key_value_object() {
        let entry = KeyValueEntry::new("link:index", serde_json::json!(3));
        let json = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(json, serde_json::json!({ "key": "link:index", "value": 3 }));
    }
}
