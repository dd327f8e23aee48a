//! Response normalization.

use serde_json::Value;
use steamgate_core::CallResult;

/// Wraps raw payloads into the success envelope
///
/// The payload is not reshaped, filtered, or reordered; callers see the
/// authoritative upstream structure.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer;

impl Normalizer {
    /// Create a normalizer
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Wrap a payload
    #[must_use]
    pub fn normalize(&self, payload: Value) -> CallResult {
        CallResult::success(payload)
    }
}
