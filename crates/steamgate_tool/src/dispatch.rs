//! Dispatcher: one tool call in, exactly one [`CallResult`] out.
//!
//! Happy path: `Received → Validating → Invoking → Normalizing → Responded`.
//! Any failure jumps to `Classifying → Responded`. An unknown tool name
//! fails at `Received` without reaching validation.

use crate::classify::ErrorClassifier;
use crate::error::{ToolError, ToolResult};
use crate::invoke::Invoker;
use crate::normalize::Normalizer;
use crate::registry::ToolRegistry;
use crate::schema::ToolSchema;
use crate::upstream::Upstream;
use futures::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use steamgate_core::{CallRequest, CallResult};
use tracing::Instrument;

/// Phase of a single call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPhase {
    /// Request accepted, tool not yet resolved
    Received,
    /// Parsing arguments
    Validating,
    /// Awaiting upstream
    Invoking,
    /// Wrapping the payload
    Normalizing,
    /// Mapping a failure onto the taxonomy
    Classifying,
    /// Result produced
    Responded,
}

impl fmt::Display for CallPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Received => "received",
            Self::Validating => "validating",
            Self::Invoking => "invoking",
            Self::Normalizing => "normalizing",
            Self::Classifying => "classifying",
            Self::Responded => "responded",
        };
        f.write_str(name)
    }
}

/// Routes calls through validation, invocation, and normalization
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    invoker: Invoker,
    normalizer: Normalizer,
    classifier: ErrorClassifier,
}

impl Dispatcher {
    /// Create a dispatcher over a fully populated registry
    #[must_use]
    pub fn new(registry: Arc<ToolRegistry>, upstream: Arc<dyn Upstream>) -> Self {
        Self {
            registry,
            invoker: Invoker::new(upstream),
            normalizer: Normalizer::new(),
            classifier: ErrorClassifier::new(),
        }
    }

    /// The registry backing this dispatcher
    #[must_use]
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Metadata of every registered tool, in registration order
    #[must_use]
    pub fn list_tools(&self) -> Vec<ToolSchema> {
        self.registry.schemas()
    }

    /// Serve one call
    ///
    /// Never fails and never panics outward: every outcome, including a
    /// panic inside a tool, is folded into the returned envelope.
    pub async fn dispatch(&self, request: CallRequest) -> CallResult {
        let span = tracing::info_span!("tool_call", tool = %request.tool_name);
        self.run(request).instrument(span).await
    }

    async fn run(&self, request: CallRequest) -> CallResult {
        let started = Instant::now();
        let CallRequest { tool_name, arguments } = request;
        phase(CallPhase::Received);

        let result = match self.execute(&tool_name, &arguments).await {
            Ok(payload) => {
                phase(CallPhase::Normalizing);
                self.normalizer.normalize(payload)
            }
            Err(error) => {
                phase(CallPhase::Classifying);
                let failure = self.classifier.classify(error, &tool_name, &arguments);
                tracing::warn!(kind = %failure.kind, message = %failure.message, "tool call failed");
                CallResult::Failure(failure)
            }
        };

        phase(CallPhase::Responded);
        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            failed = result.is_failure(),
            "tool call finished"
        );
        result
    }

    async fn execute(&self, tool_name: &str, arguments: &Value) -> ToolResult<Value> {
        let tool = self
            .registry
            .get(tool_name)
            .ok_or_else(|| ToolError::UnknownTool(tool_name.to_string()))?;

        phase(CallPhase::Validating);
        let invocation = std::panic::catch_unwind(AssertUnwindSafe(|| tool.prepare(arguments)))
            .map_err(|panic| ToolError::Internal(panic_message(panic.as_ref())))??;

        phase(CallPhase::Invoking);
        tracing::debug!(requests = invocation.request_count(), "invoking upstream");
        AssertUnwindSafe(self.invoker.invoke(tool_name, invocation))
            .catch_unwind()
            .await
            .map_err(|panic| ToolError::Internal(panic_message(panic.as_ref())))?
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

fn phase(phase: CallPhase) {
    tracing::debug!(%phase, "call phase");
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(text) = panic.downcast_ref::<&str>() {
        format!("tool panicked: {text}")
    } else if let Some(text) = panic.downcast_ref::<String>() {
        format!("tool panicked: {text}")
    } else {
        "tool panicked".to_string()
    }
}
