//! steamgate tool engine
//!
//! Tool contracts with typed validators, a registry in registration order,
//! upstream invocation with all-settled fan-out, and the classifier that
//! folds every failure into the taxonomy. The [`Dispatcher`] ties them
//! together: one [`CallRequest`](steamgate_core::CallRequest) in, one
//! [`CallResult`](steamgate_core::CallResult) out.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod classify;
pub mod dispatch;
pub mod error;
pub mod invoke;
pub mod normalize;
pub mod registry;
pub mod schema;
pub mod signal;
pub mod trait_;
pub mod upstream;
pub mod validate;

pub use classify::{kind_for_status, ErrorClassifier};
pub use dispatch::{CallPhase, Dispatcher};
pub use error::{ToolError, ToolResult};
pub use invoke::{BatchItem, Invocation, Invoker, SingleCall};
pub use normalize::Normalizer;
pub use registry::{RegistryError, ToolRegistry};
pub use schema::{InputSchema, OutputSchema, ToolSchema};
pub use signal::SuccessSignal;
pub use trait_::{Contract, Tool, ToolContract};
pub use upstream::{Endpoint, HttpUpstream, Upstream, UpstreamError, UpstreamRequest};
pub use validate::{ArgObject, ValidationError};
