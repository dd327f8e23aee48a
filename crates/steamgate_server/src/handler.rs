//! Model Context Protocol method handling.

use crate::protocol::{JSONRPC_VERSION, JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use serde::Deserialize;
use serde_json::{Value, json};
use steamgate_core::CallRequest;
use steamgate_tool::Dispatcher;

/// Protocol revisions this server speaks, newest first
pub const SUPPORTED_PROTOCOL_VERSIONS: [&str; 3] = ["2025-06-18", "2025-03-26", "2024-11-05"];

/// Server name reported by `initialize`
pub const SERVER_NAME: &str = "steamgate";

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Option<Value>,
}

/// Answers one protocol message at a time
///
/// Holds no per-session state; concurrent calls are independent.
#[derive(Debug, Clone)]
pub struct McpHandler {
    dispatcher: Dispatcher,
}

impl McpHandler {
    /// Create a handler
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Handle one line of input
    ///
    /// Returns `None` for notifications and for stray responses from the
    /// client, which get no reply.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let message: Value = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(err) => {
                tracing::debug!(error = %err, "unparseable message");
                return Some(JsonRpcResponse::error(Value::Null, JsonRpcError::parse_error(err)));
            }
        };

        if message.get("method").is_none() && (message.get("result").is_some() || message.get("error").is_some()) {
            tracing::debug!("ignoring response from client");
            return None;
        }

        let id = message.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(err) => return Some(JsonRpcResponse::error(id, JsonRpcError::invalid_request(err))),
        };
        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_request(format!("unsupported jsonrpc version `{}`", request.jsonrpc)),
            ));
        }

        let Some(id) = request.id else {
            tracing::debug!(method = %request.method, "notification");
            return None;
        };

        Some(match self.handle_request(&request.method, request.params).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => {
                tracing::debug!(method = %request.method, code = error.code, "request rejected");
                JsonRpcResponse::error(id, error)
            }
        })
    }

    async fn handle_request(&self, method: &str, params: Option<Value>) -> Result<Value, JsonRpcError> {
        match method {
            "initialize" => Ok(self.initialize(params.as_ref())),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({"tools": self.dispatcher.list_tools()})),
            "tools/call" => self.call_tool(params).await,
            other => Err(JsonRpcError::method_not_found(other)),
        }
    }

    fn initialize(&self, params: Option<&Value>) -> Value {
        let requested = params
            .and_then(|p| p.get("protocolVersion"))
            .and_then(Value::as_str);
        let version = negotiate_version(requested);
        tracing::info!(requested = ?requested, negotiated = version, "session initialized");
        json!({
            "protocolVersion": version,
            "capabilities": {"tools": {"listChanged": false}},
            "serverInfo": {"name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION")},
        })
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params = params.ok_or_else(|| JsonRpcError::invalid_params("missing params"))?;
        let CallParams { name, arguments } = serde_json::from_value(params).map_err(JsonRpcError::invalid_params)?;
        let arguments = match arguments {
            None | Some(Value::Null) => json!({}),
            Some(arguments) => arguments,
        };

        let result = self.dispatcher.dispatch(CallRequest::new(name, arguments)).await;
        let text = serde_json::to_string(&result).map_err(JsonRpcError::internal)?;
        let structured = serde_json::to_value(&result).map_err(JsonRpcError::internal)?;
        Ok(json!({
            "content": [{"type": "text", "text": text}],
            "structuredContent": structured,
            "isError": result.is_failure(),
        }))
    }
}

/// Echo a supported version, otherwise offer the newest
#[must_use]
pub fn negotiate_version(requested: Option<&str>) -> &'static str {
    requested
        .and_then(|v| SUPPORTED_PROTOCOL_VERSIONS.iter().copied().find(|s| *s == v))
        .unwrap_or(SUPPORTED_PROTOCOL_VERSIONS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negotiate_version() {
        assert_eq!(negotiate_version(Some("2025-03-26")), "2025-03-26");
        assert_eq!(negotiate_version(Some("2024-11-05")), "2024-11-05");
        assert_eq!(negotiate_version(Some("1999-01-01")), "2025-06-18");
        assert_eq!(negotiate_version(None), "2025-06-18");
    }

    #[test]
    fn test_call_params_arguments_optional() {
        let params: CallParams = serde_json::from_value(json!({"name": "getSupportedApiList"})).unwrap();
        assert_eq!(params.name, "getSupportedApiList");
        assert!(params.arguments.is_none());
        assert!(serde_json::from_value::<CallParams>(json!({"arguments": {}})).is_err());
        assert!(serde_json::from_value::<CallParams>(json!({"name": 5})).is_err());
    }
}
