//! Structural schema for the configuration document, and a validator for it.
//!
//! [`config_schema`] is kept as a data literal in the dialect the front end
//! understands (OpenAPI-style `nullable`, custom `page-ref` format). The
//! [`ConfigValidator`] rewrites it into standard JSON Schema before handing
//! it to `jsonschema`.

use std::sync::LazyLock;

use jsonschema::{Draft, JSONSchema};
use regex::Regex;
use serde_json::{Map, Value, json};

use crate::error::{InkpageError, Result};

/// Name of the custom string format used for page references.
pub const PAGE_REF_FORMAT: &str = "page-ref";

/// The configuration schema. Unknown top-level keys are allowed so plugins
/// can add their own settings.
pub fn config_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "indexPage": { "type": "string", "format": PAGE_REF_FORMAT },
            "shortcuts": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "command": { "type": "string" },
                        "key": { "type": "string", "nullable": true },
                        "mac": { "type": "string", "nullable": true },
                        "slashCommand": { "type": "string", "nullable": true },
                        "priority": { "type": "number", "nullable": true }
                    },
                    "required": ["command"]
                },
                "nullable": true
            },
            "useSmartQuotes": { "type": "boolean", "nullable": true },
            "maximumAttachmentSize": { "type": "number", "nullable": true },
            "pwaOpenLastPage": { "type": "boolean", "nullable": true },
            "hideEditButton": { "type": "boolean", "nullable": true },
            "hideSyncButton": { "type": "boolean", "nullable": true },
            "libraries": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "import": { "type": "string", "format": PAGE_REF_FORMAT },
                        "exclude": {
                            "type": "array",
                            "items": { "type": "string", "format": PAGE_REF_FORMAT },
                            "nullable": true
                        }
                    },
                    "required": ["import"]
                },
                "nullable": true
            },
            "actionButtons": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "icon": { "type": "string" },
                        "description": { "type": "string", "nullable": true },
                        "command": { "type": "string" },
                        "args": {
                            "type": "array",
                            "items": { "type": "object" },
                            "nullable": true
                        },
                        "mobile": { "type": "boolean", "nullable": true }
                    },
                    "required": ["icon", "command"]
                }
            },
            "objectDecorators": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["where", "attributes"]
                },
                "nullable": true
            },
            "spaceIgnore": { "type": "string", "nullable": true },
            "emoji": {
                "type": "object",
                "properties": {
                    "aliases": {
                        "type": "object",
                        "additionalProperties": { "type": "string" }
                    }
                },
                "required": ["aliases"],
                "nullable": true
            },
            "customStyles": {
                "anyOf": [
                    { "type": "string" },
                    { "type": "array", "items": { "type": "string" } },
                    { "type": "null" }
                ]
            },
            "defaultLinkStyle": { "type": "string", "nullable": true }
        },
        "additionalProperties": true,
        "required": []
    })
}

/// Whether `value` is an acceptable page reference: a page name, optionally
/// wrapped in `[[...]]`, that is non-empty and does not start with `.`, `/`
/// or `^`.
pub fn is_page_ref(value: &str) -> bool {
    static PAGE_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^(?:\[\[(?P<wrapped>[^\[\]\n]+)\]\]|(?P<bare>[^\[\]\n]+))$")
            .expect("valid regex")
    });

    let Some(caps) = PAGE_REF_RE.captures(value) else {
        return false;
    };
    let name = caps
        .name("wrapped")
        .or_else(|| caps.name("bare"))
        .map(|m| m.as_str().trim())
        .unwrap_or_default();

    !name.is_empty() && !name.starts_with(['.', '/', '^'])
}

/// Keywords whose value maps arbitrary names to sub-schemas. The map itself
/// is not a schema, so an entry called `nullable` there is a property.
const SCHEMA_MAP_KEYWORDS: [&str; 4] = [
    "properties",
    "patternProperties",
    "definitions",
    "$defs",
];

/// Rewrite `nullable: true` into `anyOf: [<schema>, {"type": "null"}]`,
/// recursively. `nullable: false` is dropped.
pub fn normalize_nullable(schema: Value) -> Value {
    match schema {
        Value::Object(map) => {
            let mut map: Map<String, Value> = map
                .into_iter()
                .map(|(key, value)| {
                    let value = if SCHEMA_MAP_KEYWORDS.contains(&key.as_str()) {
                        normalize_schema_map(value)
                    } else {
                        normalize_nullable(value)
                    };
                    (key, value)
                })
                .collect();

            let nullable = match map.get("nullable") {
                Some(Value::Bool(flag)) => Some(*flag),
                _ => None,
            };
            match nullable {
                Some(true) => {
                    map.remove("nullable");
                    json!({ "anyOf": [Value::Object(map), { "type": "null" }] })
                }
                Some(false) => {
                    map.remove("nullable");
                    Value::Object(map)
                }
                None => Value::Object(map),
            }
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_nullable).collect()),
        other => other,
    }
}

/// Normalize every sub-schema of a name -> schema map, leaving the names alone.
fn normalize_schema_map(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(name, schema)| (name, normalize_nullable(schema)))
                .collect(),
        ),
        other => other,
    }
}

/// Compiled validator for configuration documents.
pub struct ConfigValidator {
    compiled: JSONSchema,
}

impl std::fmt::Debug for ConfigValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigValidator").finish_non_exhaustive()
    }
}

impl ConfigValidator {
    /// Compile the built-in [`config_schema`].
    pub fn new() -> Result<Self> {
        Self::from_schema(&config_schema())
    }

    /// Compile an arbitrary schema written in the same dialect.
    pub fn from_schema(schema: &Value) -> Result<Self> {
        let normalized = normalize_nullable(schema.clone());
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .with_format(PAGE_REF_FORMAT, is_page_ref)
            .compile(&normalized)
            .map_err(|e| InkpageError::config(format!("invalid config schema: {e}")))?;

        Ok(Self { compiled })
    }

    pub fn is_valid(&self, instance: &Value) -> bool {
        self.compiled.is_valid(instance)
    }

    /// Validate `instance`, collecting every violation.
    pub fn validate(&self, instance: &Value) -> Result<()> {
        let violations: Vec<String> = match self.compiled.validate(instance) {
            Ok(()) => return Ok(()),
            Err(errors) => errors
                .map(|e| {
                    let path = e.instance_path.to_string();
                    let path = if path.is_empty() { "/".to_string() } else { path };
                    format!("{path}: {e}")
                })
                .collect(),
        };

        tracing::debug!(count = violations.len(), "config failed schema validation");
        Err(InkpageError::validation(
            format!("{} schema violation(s)", violations.len()),
            violations,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> ConfigValidator {
        ConfigValidator::new().expect("compile config schema")
    }

    #[test]
    fn accepts_unknown_top_level_keys() {
        let config = json!({
            "indexPage": "index",
            "actionButtons": [],
            "myPlugin": { "enabled": true }
        });
        assert!(validator().is_valid(&config));
    }

    #[test]
    fn rejects_action_button_without_command() {
        let config = json!({
            "actionButtons": [{ "icon": "Home" }]
        });
        let err = validator().validate(&config).unwrap_err();
        match err {
            InkpageError::Validation { violations, .. } => {
                assert_eq!(violations.len(), 1);
                assert!(violations[0].starts_with("/actionButtons/0"));
                assert!(violations[0].contains("command"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn nullable_fields_accept_null() {
        let config = json!({
            "hideSyncButton": null,
            "shortcuts": [{ "command": "Navigate: Home", "key": null }],
            "customStyles": null
        });
        assert!(validator().is_valid(&config));
    }

    #[test]
    fn non_nullable_fields_reject_null() {
        assert!(!validator().is_valid(&json!({ "indexPage": null })));
        assert!(!validator().is_valid(&json!({ "actionButtons": null })));
    }

    #[test]
    fn type_mismatches_are_reported() {
        let config = json!({
            "maximumAttachmentSize": "ten",
            "customStyles": 4
        });
        let err = validator().validate(&config).unwrap_err();
        let InkpageError::Validation { violations, .. } = err else {
            panic!("expected validation error");
        };
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn emoji_aliases_must_be_strings() {
        assert!(validator().is_valid(&json!({ "emoji": { "aliases": { "ok": "👍" } } })));
        assert!(!validator().is_valid(&json!({ "emoji": { "aliases": { "ok": 1 } } })));
        assert!(!validator().is_valid(&json!({ "emoji": {} })));
    }

    #[test]
    fn page_ref_format() {
        assert!(is_page_ref("index"));
        assert!(is_page_ref("Library/Core"));
        assert!(is_page_ref("[[Journal/Today]]"));
        assert!(!is_page_ref(""));
        assert!(!is_page_ref("[[]]"));
        assert!(!is_page_ref("   "));
        assert!(!is_page_ref(".hidden"));
        assert!(!is_page_ref("/absolute"));
        assert!(!is_page_ref("[[index"));
    }

    #[test]
    fn page_ref_format_is_enforced() {
        assert!(!validator().is_valid(&json!({ "indexPage": "" })));
        assert!(!validator().is_valid(&json!({ "libraries": [{ "import": "[[]]" }] })));
        assert!(validator().is_valid(&json!({
            "libraries": [{ "import": "[[Library/Std]]", "exclude": ["Library/Std/Old"] }]
        })));
    }

    #[test]
    fn normalize_rewrites_nullable() {
        let normalized = normalize_nullable(json!({ "type": "string", "nullable": true }));
        assert_eq!(
            normalized,
            json!({ "anyOf": [{ "type": "string" }, { "type": "null" }] })
        );

        let normalized = normalize_nullable(json!({ "type": "string", "nullable": false }));
        assert_eq!(normalized, json!({ "type": "string" }));
    }

    #[test]
    fn normalize_keeps_property_named_nullable() {
        let schema = json!({
            "type": "object",
            "properties": { "nullable": { "type": "boolean" } }
        });
        assert_eq!(normalize_nullable(schema.clone()), schema);
    }

    #[test]
    fn normalize_keeps_boolean_property_named_nullable() {
        let schema = json!({
            "type": "object",
            "properties": { "nullable": true, "other": false }
        });
        assert_eq!(normalize_nullable(schema.clone()), schema);

        let validator = ConfigValidator::from_schema(&schema).expect("compile");
        assert!(validator.is_valid(&json!({ "nullable": 5 })));
        assert!(!validator.is_valid(&json!({ "other": 5 })));
    }

    #[test]
    fn normalize_recurses_into_named_sub_schemas() {
        let schema = json!({
            "properties": { "nullable": { "type": "string", "nullable": true } },
            "patternProperties": { "^x-": { "type": "number", "nullable": true } }
        });
        let normalized = normalize_nullable(schema);
        assert_eq!(
            normalized["properties"]["nullable"],
            json!({ "anyOf": [{ "type": "string" }, { "type": "null" }] })
        );
        assert_eq!(
            normalized["patternProperties"]["^x-"],
            json!({ "anyOf": [{ "type": "number" }, { "type": "null" }] })
        );
    }

    #[test]
    fn schema_top_level_allows_additional_properties() {
        let schema = config_schema();
        assert_eq!(schema["additionalProperties"], json!(true));
        assert_eq!(schema["required"], json!([]));
    }
}
