//! Error classification into the failure taxonomy.
//!
//! Rules, first match wins:
//!
//! 1. already classified: unchanged
//! 2. validation: `InvalidArguments`; unknown tool: `UnknownTool`
//! 3. no response: `NetworkError`
//! 4. HTTP status: see [`kind_for_status`]
//! 5. 2xx with the wrong shape: `UpstreamInternalError`
//! 6. anything else: `InternalError`

use crate::error::ToolError;
use crate::upstream::UpstreamError;
use serde_json::{Value, json};
use steamgate_core::{ErrorKind, Failure};

/// Map an upstream HTTP status onto a failure kind
///
/// 400 and 404 are read as a bad identifier from the caller, which is a
/// heuristic: upstream also answers them for transient trouble.
#[must_use]
pub fn kind_for_status(status: u16) -> ErrorKind {
    match status {
        400 | 404 => ErrorKind::InvalidArguments,
        401 | 403 => ErrorKind::PermissionOrAuthError,
        _ => ErrorKind::UpstreamInternalError,
    }
}

/// Turns raw failures into [`Failure`] values
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Create a classifier
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Classify a failure raised while serving `tool` with `args`
    ///
    /// The message names the tool and, when known, the identifier involved.
    /// `detail` carries the upstream status, body, or payload when present,
    /// never the request URL's query string.
    #[must_use]
    pub fn classify(&self, error: ToolError, tool: &str, args: &Value) -> Failure {
        match error {
            ToolError::Classified(failure) => failure,
            ToolError::Invalid(err) => {
                let failure = Failure::new(ErrorKind::InvalidArguments, format!("{tool}: invalid arguments: {err}"));
                match err.field() {
                    Some(field) => failure.with_detail(json!({"field": field})),
                    None => failure,
                }
            }
            ToolError::UnknownTool(name) => Failure::new(ErrorKind::UnknownTool, format!("unknown tool `{name}`")),
            ToolError::Upstream(err) => self.classify_upstream(err, tool, args),
            ToolError::Internal(reason) => {
                Failure::new(ErrorKind::InternalError, format!("{tool}: internal error: {reason}"))
            }
        }
    }

    fn classify_upstream(&self, error: UpstreamError, tool: &str, args: &Value) -> Failure {
        let about = error
            .subject()
            .map(str::to_string)
            .or_else(|| identify(args))
            .map(|subject| format!(" for {subject}"))
            .unwrap_or_default();

        match error {
            UpstreamError::Transport { target, reason, .. } => Failure::new(
                ErrorKind::NetworkError,
                format!("{tool}: no response from upstream{about}: {reason}"),
            )
            .with_detail(json!({"target": target, "reason": reason})),

            UpstreamError::Status { target, status, body, .. } => {
                let kind = kind_for_status(status);
                let hint = match kind {
                    ErrorKind::InvalidArguments => " (check the identifier)",
                    ErrorKind::PermissionOrAuthError => " (check the API key or profile visibility)",
                    _ => "",
                };
                Failure::new(kind, format!("{tool}: upstream answered HTTP {status}{about}{hint}"))
                    .with_detail(json!({"target": target, "status": status, "body": body}))
            }

            UpstreamError::Shape {
                target,
                reason,
                payload,
                ..
            } => Failure::new(
                ErrorKind::UpstreamInternalError,
                format!("{tool}: unexpected upstream response{about}: {reason}"),
            )
            .with_detail(json!({"target": target, "reason": reason, "payload": payload})),
        }
    }
}

/// Best-effort identifier from the caller's arguments
fn identify(args: &Value) -> Option<String> {
    let parts: Vec<String> = ["steamid", "appid", "appids"]
        .iter()
        .filter_map(|field| {
            args.get(field).map(|value| match value {
                Value::String(text) => format!("{field} {text}"),
                other => format!("{field} {other}"),
            })
        })
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}
