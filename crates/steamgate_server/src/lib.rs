//! steamgate server
//!
//! Model Context Protocol over line-delimited JSON-RPC 2.0 on stdio.
//! stdout carries protocol messages only; logs go to stderr.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod handler;
pub mod protocol;
pub mod stdio;

pub use handler::{McpHandler, negotiate_version, SUPPORTED_PROTOCOL_VERSIONS};
pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use stdio::{serve, ProtocolError};
