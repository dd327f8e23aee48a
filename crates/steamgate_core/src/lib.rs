//! steamgate core types
//!
//! This crate contains pure types with no I/O: the failure taxonomy,
//! the call envelopes every tool call resolves to, and the immutable
//! gateway configuration shared by the engine.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod envelope;
pub mod error;

// Re-exports
pub use config::{ConfigError, GatewayConfig, DEFAULT_API_BASE_URL, DEFAULT_STORE_BASE_URL, DEFAULT_TIMEOUT};
pub use envelope::{BatchEntry, CallRequest, CallResult, PartialBatchResult};
pub use error::{ErrorKind, Failure};
