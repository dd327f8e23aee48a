//! Failure taxonomy shared by every tool.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification label attached to every failure envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Caller-supplied shape/type violation, or an upstream-signaled bad identifier
    InvalidArguments,

    /// Dispatch to an unregistered tool name
    UnknownTool,

    /// No response received from upstream
    NetworkError,

    /// Credential or visibility rejection
    PermissionOrAuthError,

    /// Upstream 5xx, malformed or missing expected shape, or unrecognized status
    UpstreamInternalError,

    /// Anything uncategorized
    InternalError,
}

impl ErrorKind {
    /// All kinds, in taxonomy order
    pub const ALL: [ErrorKind; 6] = [
        Self::InvalidArguments,
        Self::UnknownTool,
        Self::NetworkError,
        Self::PermissionOrAuthError,
        Self::UpstreamInternalError,
        Self::InternalError,
    ];

    /// Taxonomy code as it appears on the wire
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidArguments => "InvalidArguments",
            Self::UnknownTool => "UnknownTool",
            Self::NetworkError => "NetworkError",
            Self::PermissionOrAuthError => "PermissionOrAuthError",
            Self::UpstreamInternalError => "UpstreamInternalError",
            Self::InternalError => "InternalError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified failure: taxonomy code, readable message, optional diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    /// Taxonomy code
    pub kind: ErrorKind,
    /// Human-readable message naming the tool and, when known, the identifier
    pub message: String,
    /// Raw upstream status/body or other structured context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

impl Failure {
    /// Create a failure without detail
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    /// Attach structured detail
    #[must_use]
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Failure {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_as_taxonomy_code() {
        for kind in ErrorKind::ALL {
            let encoded = serde_json::to_value(kind).unwrap();
            assert_eq!(encoded, serde_json::Value::String(kind.as_str().to_string()));
        }
    }

    #[test]
    fn test_failure_display() {
        let failure = Failure::new(ErrorKind::UnknownTool, "no tool named doesNotExist");
        assert_eq!(failure.to_string(), "UnknownTool: no tool named doesNotExist");
    }

    #[test]
    fn test_failure_detail_omitted_when_absent() {
        let failure = Failure::new(ErrorKind::NetworkError, "connection refused");
        let encoded = serde_json::to_value(&failure).unwrap();
        assert!(encoded.get("detail").is_none());

        let failure = failure.with_detail(serde_json::json!({"status": 503}));
        let encoded = serde_json::to_value(&failure).unwrap();
        assert_eq!(encoded["detail"]["status"], 503);
    }
}
