//! Upstream invocation: single calls and all-settled fan-out.

use crate::classify::ErrorClassifier;
use crate::error::{ToolError, ToolResult};
use crate::signal::SuccessSignal;
use crate::upstream::{Upstream, UpstreamError, UpstreamRequest};
use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use steamgate_core::{BatchEntry, PartialBatchResult};

/// One request plus the signal its body must carry
#[derive(Debug, Clone, PartialEq)]
pub struct SingleCall {
    /// Outbound request
    pub request: UpstreamRequest,
    /// Success oracle
    pub signal: SuccessSignal,
}

impl SingleCall {
    /// Create a single call
    #[must_use]
    pub fn new(request: UpstreamRequest, signal: SuccessSignal) -> Self {
        Self { request, signal }
    }
}

/// One keyed item of a fan-out call
#[derive(Debug, Clone, PartialEq)]
pub struct BatchItem {
    /// Key of the item in the merged result
    pub key: String,
    /// Outbound request
    pub request: UpstreamRequest,
    /// Success oracle
    pub signal: SuccessSignal,
    /// JSON pointer to the item's data; the whole body when `None`
    pub extract: Option<String>,
}

/// Planned upstream work for one tool call
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    /// Exactly one request
    Single(SingleCall),
    /// One independent request per key, merged into a [`PartialBatchResult`]
    FanOut(Vec<BatchItem>),
}

impl Invocation {
    /// Number of outbound requests this plan issues
    #[must_use]
    pub fn request_count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::FanOut(items) => items.len(),
        }
    }
}

/// Executes invocation plans against an [`Upstream`]
#[derive(Clone)]
pub struct Invoker {
    upstream: Arc<dyn Upstream>,
    classifier: ErrorClassifier,
}

impl Invoker {
    /// Create an invoker
    #[must_use]
    pub fn new(upstream: Arc<dyn Upstream>) -> Self {
        Self {
            upstream,
            classifier: ErrorClassifier::new(),
        }
    }

    /// Run a plan
    ///
    /// Fan-out plans never fail as a whole: every item's outcome is recorded
    /// in the returned batch, success or not.
    ///
    /// # Errors
    ///
    /// Returns error if a single call fails at transport, status, or shape level
    pub async fn invoke(&self, tool: &str, invocation: Invocation) -> ToolResult<Value> {
        match invocation {
            Invocation::Single(call) => self.single(call).await,
            Invocation::FanOut(items) => Ok(self.fan_out(tool, items).await.into_value()),
        }
    }

    async fn single(&self, call: SingleCall) -> ToolResult<Value> {
        let body = self.upstream.get_json(&call.request).await?;
        call.signal
            .check(&body)
            .map_err(|reason| UpstreamError::shape(&call.request, reason, Some(body.clone())))?;
        Ok(body)
    }

    async fn fan_out(&self, tool: &str, items: Vec<BatchItem>) -> PartialBatchResult {
        let pending = items.iter().map(|item| self.fetch_item(item));
        let outcomes = join_all(pending).await;
        let requested = items.len();

        let batch: PartialBatchResult = items
            .into_iter()
            .zip(outcomes)
            .map(|(item, outcome)| {
                let entry = match outcome {
                    Ok(data) => BatchEntry::Ok(data),
                    Err(err) => {
                        let failure = self.classifier.classify(ToolError::Upstream(err), tool, &Value::Null);
                        tracing::debug!(key = %item.key, kind = %failure.kind, "batch item failed");
                        BatchEntry::Failed(failure)
                    }
                };
                (item.key, entry)
            })
            .collect();
        tracing::debug!(requested, failed = batch.failed_count(), "fan-out settled");
        batch
    }

    async fn fetch_item(&self, item: &BatchItem) -> Result<Value, UpstreamError> {
        let mut body = self.upstream.get_json(&item.request).await?;
        if let Err(reason) = item.signal.check(&body) {
            return Err(UpstreamError::shape(
                &item.request,
                format!("{} not found or unavailable ({reason})", item.key),
                Some(body),
            ));
        }
        Ok(match &item.extract {
            Some(pointer) => body.pointer_mut(pointer).map(Value::take).unwrap_or(Value::Null),
            None => body,
        })
    }
}

impl std::fmt::Debug for Invoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invoker").finish_non_exhaustive()
    }
}
