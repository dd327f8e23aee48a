//! Call envelopes: what goes into the engine and what comes out.

use crate::error::{ErrorKind, Failure};
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// One inbound call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    /// Name of the tool to dispatch to
    pub tool_name: String,
    /// Untyped argument mapping, validated by the tool's contract
    #[serde(default)]
    pub arguments: Value,
}

impl CallRequest {
    /// Create a new call request
    #[must_use]
    pub fn new(tool_name: impl Into<String>, arguments: Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
        }
    }
}

/// The engine's sole external output type
///
/// Exactly one is produced per [`CallRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CallResult {
    /// Upstream payload, passed through unchanged
    Success {
        /// JSON payload
        payload: Value,
    },
    /// Classified failure
    Failure(Failure),
}

impl CallResult {
    /// Wrap a payload
    #[must_use]
    pub fn success(payload: Value) -> Self {
        Self::Success { payload }
    }

    /// Build a failure envelope
    #[must_use]
    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Failure(Failure::new(kind, message))
    }

    /// Whether this is a failure envelope
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Failure kind, if any
    #[must_use]
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure(failure) => Some(failure.kind),
        }
    }

    /// Success payload, if any
    #[must_use]
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Success { payload } => Some(payload),
            Self::Failure(_) => None,
        }
    }
}

impl From<Failure> for CallResult {
    fn from(failure: Failure) -> Self {
        Self::Failure(failure)
    }
}

/// Outcome of one item in a fan-out call
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEntry {
    /// Item fetched; carries the item's data
    Ok(Value),
    /// Item failed; carries the classified failure
    Failed(Failure),
}

impl BatchEntry {
    /// Whether the item succeeded
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }
}

impl Serialize for BatchEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        match self {
            Self::Ok(data) => {
                map.serialize_entry("success", &true)?;
                map.serialize_entry("data", data)?;
            }
            Self::Failed(failure) => {
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", failure)?;
            }
        }
        map.end()
    }
}

/// Per-key outcomes of a fan-out call, in request order
///
/// Holds one entry per requested key regardless of individual failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PartialBatchResult {
    entries: IndexMap<String, BatchEntry>,
}

impl PartialBatchResult {
    /// Create an empty result
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome for a key
    pub fn insert(&mut self, key: impl Into<String>, entry: BatchEntry) {
        self.entries.insert(key.into(), entry);
    }

    /// Number of failed entries
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.entries.values().filter(|e| !e.is_ok()).count()
    }

    /// Iterate keys and outcomes in request order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &BatchEntry)> {
        self.entries.iter()
    }

    /// Convert into a JSON payload
    #[must_use]
    pub fn into_value(self) -> Value {
        let map = self
            .entries
            .into_iter()
            .map(|(key, entry)| {
                let value = serde_json::to_value(&entry).unwrap_or(Value::Null);
                (key, value)
            })
            .collect();
        Value::Object(map)
    }
}

impl FromIterator<(String, BatchEntry)> for PartialBatchResult {
    fn from_iter<I: IntoIterator<Item = (String, BatchEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
