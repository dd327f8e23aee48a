//! Structural argument validation.
//!
//! Checks presence and primitive type only. Whether an identifier actually
//! exists is left to upstream.

use serde_json::{Map, Value};
use std::collections::HashSet;

/// Validation error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Arguments are not a JSON object
    #[error("arguments must be an object, got {found}")]
    NotAnObject {
        /// JSON type that was given
        found: &'static str,
    },

    /// Required field absent
    #[error("missing required field `{field}`")]
    MissingField {
        /// Field name
        field: String,
    },

    /// Field present with the wrong type
    #[error("field `{field}` must be {expected}, got {found}")]
    WrongType {
        /// Field name
        field: String,
        /// Type the field requires
        expected: &'static str,
        /// JSON type that was given
        found: &'static str,
    },

    /// Array element with the wrong type
    #[error("field `{field}` item {index} must be {expected}, got {found}")]
    WrongElementType {
        /// Field name
        field: String,
        /// Position of the bad element
        index: usize,
        /// Type each element requires
        expected: &'static str,
        /// JSON type that was given
        found: &'static str,
    },

    /// Array shorter than allowed
    #[error("field `{field}` must contain at least {min} item(s)")]
    TooFewItems {
        /// Field name
        field: String,
        /// Minimum item count
        min: usize,
    },

    /// Array repeats an item that must be unique
    #[error("field `{field}` lists {item} more than once")]
    DuplicateItem {
        /// Field name
        field: String,
        /// The repeated item
        item: String,
    },
}

impl ValidationError {
    /// Name of the offending field, if any
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::NotAnObject { .. } => None,
            Self::MissingField { field }
            | Self::WrongType { field, .. }
            | Self::WrongElementType { field, .. }
            | Self::TooFewItems { field, .. }
            | Self::DuplicateItem { field, .. } => Some(field),
        }
    }
}

const NON_NEGATIVE_INTEGER: &str = "a non-negative integer";
const STRING: &str = "a string";
const ARRAY: &str = "an array";

/// JSON type name used in error messages
#[must_use]
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(n) if n.is_i64() && n.as_i64().is_some_and(|v| v < 0) => "negative integer",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Interpret a JSON value as a non-negative integer
///
/// Whole-valued floats such as `570.0` count as integers, as they do in JSON Schema.
#[must_use]
pub fn as_non_negative_integer(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    if value.is_f64() && f.fract() == 0.0 && f >= 0.0 && f < u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

/// Read-only view over an argument object
#[derive(Debug, Clone, Copy)]
pub struct ArgObject<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> ArgObject<'a> {
    /// Accept only JSON objects
    ///
    /// # Errors
    ///
    /// Returns error if `raw` is not an object
    pub fn parse(raw: &'a Value) -> Result<Self, ValidationError> {
        match raw {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(ValidationError::NotAnObject {
                found: json_type_name(other),
            }),
        }
    }

    fn required(&self, field: &str) -> Result<&'a Value, ValidationError> {
        self.fields
            .get(field)
            .ok_or_else(|| ValidationError::MissingField {
                field: field.to_string(),
            })
    }

    /// Required non-negative integer
    ///
    /// # Errors
    ///
    /// Returns error if absent or not a non-negative integer
    pub fn required_u64(&self, field: &str) -> Result<u64, ValidationError> {
        let value = self.required(field)?;
        integer_field(field, value)
    }

    /// Optional non-negative integer; `null` counts as present and wrong
    ///
    /// # Errors
    ///
    /// Returns error if present and not a non-negative integer
    pub fn optional_u64(&self, field: &str) -> Result<Option<u64>, ValidationError> {
        self.fields
            .get(field)
            .map(|value| integer_field(field, value))
            .transpose()
    }

    /// Required string
    ///
    /// # Errors
    ///
    /// Returns error if absent or not a string
    pub fn required_str(&self, field: &str) -> Result<String, ValidationError> {
        match self.required(field)? {
            Value::String(s) => Ok(s.clone()),
            other => Err(ValidationError::WrongType {
                field: field.to_string(),
                expected: STRING,
                found: json_type_name(other),
            }),
        }
    }

    /// Required array of non-negative integers
    ///
    /// # Errors
    ///
    /// Returns error if absent, not an array, too short, holding a non-integer,
    /// or repeating an item when `unique` is set
    pub fn required_u64_list(
        &self,
        field: &str,
        min_items: usize,
        unique: bool,
    ) -> Result<Vec<u64>, ValidationError> {
        let items = self.required_array(field, min_items)?;
        let mut parsed = Vec::with_capacity(items.len());
        let mut seen = HashSet::new();
        for (index, item) in items.iter().enumerate() {
            let n = as_non_negative_integer(item).ok_or_else(|| ValidationError::WrongElementType {
                field: field.to_string(),
                index,
                expected: NON_NEGATIVE_INTEGER,
                found: json_type_name(item),
            })?;
            if unique && !seen.insert(n) {
                return Err(ValidationError::DuplicateItem {
                    field: field.to_string(),
                    item: n.to_string(),
                });
            }
            parsed.push(n);
        }
        Ok(parsed)
    }

    /// Required array of strings
    ///
    /// # Errors
    ///
    /// Returns error if absent, not an array, too short, or holding a non-string
    pub fn required_str_list(
        &self,
        field: &str,
        min_items: usize,
    ) -> Result<Vec<String>, ValidationError> {
        let items = self.required_array(field, min_items)?;
        items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(ValidationError::WrongElementType {
                    field: field.to_string(),
                    index,
                    expected: STRING,
                    found: json_type_name(other),
                }),
            })
            .collect()
    }

    fn required_array(&self, field: &str, min_items: usize) -> Result<&'a Vec<Value>, ValidationError> {
        let items = match self.required(field)? {
            Value::Array(items) => items,
            other => {
                return Err(ValidationError::WrongType {
                    field: field.to_string(),
                    expected: ARRAY,
                    found: json_type_name(other),
                })
            }
        };
        if items.len() < min_items {
            return Err(ValidationError::TooFewItems {
                field: field.to_string(),
                min: min_items,
            });
        }
        Ok(items)
    }
}

fn integer_field(field: &str, value: &Value) -> Result<u64, ValidationError> {
    as_non_negative_integer(value).ok_or_else(|| ValidationError::WrongType {
        field: field.to_string(),
        expected: NON_NEGATIVE_INTEGER,
        found: json_type_name(value),
    })
}
