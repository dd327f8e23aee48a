//! Raw failures raised anywhere between dispatch and normalization.

use crate::upstream::UpstreamError;
use crate::validate::ValidationError;
use steamgate_core::Failure;

/// Unclassified failure
///
/// Every value of this type ends up in
/// [`ErrorClassifier::classify`](crate::classify::ErrorClassifier::classify).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToolError {
    /// Arguments failed structural validation
    #[error("invalid arguments: {0}")]
    Invalid(#[from] ValidationError),

    /// No tool registered under this name
    #[error("unknown tool `{0}`")]
    UnknownTool(String),

    /// Upstream transport, status, or shape failure
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Anything else, including a panic inside a tool
    #[error("internal error: {0}")]
    Internal(String),

    /// Already classified; passes through the classifier unchanged
    #[error("{0}")]
    Classified(Failure),
}

impl From<Failure> for ToolError {
    fn from(failure: Failure) -> Self {
        Self::Classified(failure)
    }
}

/// Result alias for tool operations
pub type ToolResult<T> = Result<T, ToolError>;
