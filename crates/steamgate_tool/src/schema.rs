//! Tool metadata surfaced verbatim to the caller.
//!
//! Schemas are declarative only; the engine never interprets them. Each
//! tool's validator is written to accept exactly what its input schema
//! describes.

use serde::Serialize;
use serde_json::{Map, Value, json};
use steamgate_core::ErrorKind;

/// Descriptive metadata for one tool
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSchema {
    /// Tool name, unique within a registry
    pub name: String,
    /// What the tool does
    pub description: String,
    /// JSON Schema of the arguments
    pub input_schema: Value,
    /// JSON Schema of the result envelope
    pub output_schema: Value,
}

impl ToolSchema {
    /// Create a schema with no arguments and an opaque payload
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: InputSchema::new().into_value(),
            output_schema: OutputSchema::envelope(json!({"type": "object"})),
        }
    }

    /// Set input schema
    #[must_use]
    pub fn with_input(mut self, schema: InputSchema) -> Self {
        self.input_schema = schema.into_value();
        self
    }

    /// Set output schema
    #[must_use]
    pub fn with_output(mut self, schema: Value) -> Self {
        self.output_schema = schema;
        self
    }
}

/// Builder for an object-typed argument schema
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSchema {
    properties: Map<String, Value>,
    required: Vec<String>,
}

impl InputSchema {
    /// Create an empty object schema
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn field(mut self, name: &str, schema: Value, required: bool) -> Self {
        self.properties.insert(name.to_string(), schema);
        if required {
            self.required.push(name.to_string());
        }
        self
    }

    /// Add a required non-negative integer
    #[must_use]
    pub fn required_integer(self, name: &str, description: &str) -> Self {
        self.field(name, integer(description), true)
    }

    /// Add an optional non-negative integer
    #[must_use]
    pub fn optional_integer(self, name: &str, description: &str, default: Option<u64>) -> Self {
        let mut schema = integer(description);
        if let (Some(default), Value::Object(map)) = (default, &mut schema) {
            map.insert("default".to_string(), json!(default));
        }
        self.field(name, schema, false)
    }

    /// Add a required string
    #[must_use]
    pub fn required_string(self, name: &str, description: &str) -> Self {
        self.field(name, json!({"type": "string", "description": description}), true)
    }

    /// Add a required array of non-negative integers
    #[must_use]
    pub fn required_integer_array(self, name: &str, description: &str, min_items: usize, unique: bool) -> Self {
        let mut schema = json!({
            "type": "array",
            "description": description,
            "items": {"type": "integer", "minimum": 0},
            "minItems": min_items,
        });
        if unique {
            schema["uniqueItems"] = json!(true);
        }
        self.field(name, schema, true)
    }

    /// Add a required array of strings
    #[must_use]
    pub fn required_string_array(self, name: &str, description: &str, min_items: usize) -> Self {
        self.field(
            name,
            json!({
                "type": "array",
                "description": description,
                "items": {"type": "string"},
                "minItems": min_items,
            }),
            true,
        )
    }

    /// Render as a JSON Schema object
    #[must_use]
    pub fn into_value(self) -> Value {
        let mut schema = json!({
            "type": "object",
            "properties": Value::Object(self.properties),
        });
        if !self.required.is_empty() {
            schema["required"] = json!(self.required);
        }
        schema
    }
}

fn integer(description: &str) -> Value {
    json!({"type": "integer", "minimum": 0, "description": description})
}

/// Output schemas
pub struct OutputSchema;

impl OutputSchema {
    /// Schema of the uniform envelope around a tool-specific payload
    #[must_use]
    pub fn envelope(payload: Value) -> Value {
        let kinds: Vec<&str> = ErrorKind::ALL.iter().map(|kind| kind.as_str()).collect();
        json!({
            "type": "object",
            "oneOf": [
                {
                    "properties": {
                        "status": {"const": "success"},
                        "payload": payload,
                    },
                    "required": ["status", "payload"],
                },
                {
                    "properties": {
                        "status": {"const": "failure"},
                        "kind": {"type": "string", "enum": kinds},
                        "message": {"type": "string"},
                        "detail": {},
                    },
                    "required": ["status", "kind", "message"],
                },
            ],
        })
    }

    /// Payload schema of a fan-out result keyed by item
    #[must_use]
    pub fn batch(item_data: Value) -> Value {
        json!({
            "type": "object",
            "additionalProperties": {
                "type": "object",
                "properties": {
                    "success": {"type": "boolean"},
                    "data": item_data,
                    "error": {
                        "type": "object",
                        "properties": {
                            "kind": {"type": "string"},
                            "message": {"type": "string"},
                            "detail": {},
                        },
                        "required": ["kind", "message"],
                    },
                },
                "required": ["success"],
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_schema_new() {
        let schema = ToolSchema::new("getSupportedApiList", "List Web API interfaces");
        assert_eq!(schema.name, "getSupportedApiList");
        assert_eq!(schema.input_schema, json!({"type": "object", "properties": {}}));
    }

    #[test]
    fn test_input_schema_required_and_optional() {
        let schema = InputSchema::new()
            .required_integer("appid", "Application id")
            .optional_integer("count", "How many", Some(3))
            .into_value();
        assert_eq!(schema["required"], json!(["appid"]));
        assert_eq!(schema["properties"]["appid"]["type"], "integer");
        assert_eq!(schema["properties"]["appid"]["minimum"], 0);
        assert_eq!(schema["properties"]["count"]["default"], 3);
    }

    #[test]
    fn test_array_schema_constraints() {
        let schema = InputSchema::new()
            .required_integer_array("appids", "Ids", 1, true)
            .into_value();
        let appids = &schema["properties"]["appids"];
        assert_eq!(appids["minItems"], 1);
        assert_eq!(appids["uniqueItems"], true);
        assert_eq!(appids["items"]["type"], "integer");
    }

    #[test]
    fn test_envelope_lists_every_kind() {
        let schema = OutputSchema::envelope(json!({}));
        let kinds = schema["oneOf"][1]["properties"]["kind"]["enum"]
            .as_array()
            .unwrap()
            .clone();
        let expected: Vec<Value> = ErrorKind::ALL.iter().map(|k| json!(k.as_str())).collect();
        assert_eq!(kinds, expected);
    }

    #[test]
    fn test_schema_serializes_camel_case() {
        let schema = ToolSchema::new("t", "d");
        let encoded = serde_json::to_value(&schema).unwrap();
        assert!(encoded.get("inputSchema").is_some());
        assert!(encoded.get("outputSchema").is_some());
    }
}
