//! Tool contracts
//!
//! A [`ToolContract`] is the typed description of one tool: its schema, a
//! parse step producing strongly-typed arguments, and a plan turning those
//! arguments into upstream requests. The registry stores contracts behind
//! the object-safe [`Tool`] trait.

use crate::invoke::Invocation;
use crate::schema::ToolSchema;
use crate::validate::ValidationError;
use serde_json::Value;

/// Typed definition of one tool
pub trait ToolContract: Send + Sync + 'static {
    /// Validated arguments
    type Args: Send;

    /// Descriptive metadata
    fn schema(&self) -> ToolSchema;

    /// Parse untyped arguments
    ///
    /// # Errors
    ///
    /// Returns error on any structural mismatch with the input schema
    fn validate(&self, raw: &Value) -> Result<Self::Args, ValidationError>;

    /// Map validated arguments onto upstream requests
    fn plan(&self, args: Self::Args) -> Invocation;
}

/// Object-safe view of a registered tool
pub trait Tool: Send + Sync {
    /// Tool name
    fn name(&self) -> &str {
        &self.schema().name
    }

    /// Descriptive metadata
    fn schema(&self) -> &ToolSchema;

    /// Validate and plan in one step
    ///
    /// # Errors
    ///
    /// Returns error if the arguments do not validate
    fn prepare(&self, raw: &Value) -> Result<Invocation, ValidationError>;
}

/// Adapter erasing a contract's argument type
pub struct Contract<C> {
    inner: C,
    schema: ToolSchema,
}

impl<C: ToolContract> Contract<C> {
    /// Wrap a contract, computing its schema once
    #[must_use]
    pub fn new(inner: C) -> Self {
        let schema = inner.schema();
        Self { inner, schema }
    }
}

impl<C: ToolContract> Tool for Contract<C> {
    fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    fn prepare(&self, raw: &Value) -> Result<Invocation, ValidationError> {
        let args = self.inner.validate(raw)?;
        Ok(self.inner.plan(args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoke::SingleCall;
    use crate::signal::SuccessSignal;
    use crate::upstream::UpstreamRequest;
    use crate::validate::ArgObject;
    use serde_json::json;

    struct Echo;

    impl ToolContract for Echo {
        type Args = u64;

        fn schema(&self) -> ToolSchema {
            ToolSchema::new("echo", "Echo an id")
        }

        fn validate(&self, raw: &Value) -> Result<u64, ValidationError> {
            ArgObject::parse(raw)?.required_u64("id")
        }

        fn plan(&self, id: u64) -> Invocation {
            Invocation::Single(SingleCall::new(
                UpstreamRequest::api("/echo").param("id", id),
                SuccessSignal::Status,
            ))
        }
    }

    #[test]
    fn test_contract_prepare() {
        let tool = Contract::new(Echo);
        assert_eq!(tool.name(), "echo");
        let Invocation::Single(call) = tool.prepare(&json!({"id": 7})).unwrap() else {
            panic!("expected single call");
        };
        assert_eq!(call.request.query_value("id"), Some("7"));
        assert!(tool.prepare(&json!({"id": "7"})).is_err());
    }
}
