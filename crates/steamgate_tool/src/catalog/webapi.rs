//! `ISteamWebAPIUtil` tools.

use crate::invoke::{Invocation, SingleCall};
use crate::schema::{OutputSchema, ToolSchema};
use crate::signal::SuccessSignal;
use crate::trait_::ToolContract;
use crate::upstream::UpstreamRequest;
use crate::validate::{ArgObject, ValidationError};
use serde_json::{Value, json};

const SUPPORTED_API_LIST_PATH: &str = "/ISteamWebAPIUtil/GetSupportedAPIList/v1/";

/// Interfaces and methods available to the configured key
#[derive(Debug, Clone, Copy, Default)]
pub struct SupportedApiList;

impl ToolContract for SupportedApiList {
    type Args = ();

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "getSupportedApiList",
            "List the Web API interfaces and methods available to the configured key",
        )
        .with_output(OutputSchema::envelope(json!({
            "type": "object",
            "properties": {
                "apilist": {
                    "type": "object",
                    "properties": {
                        "interfaces": {"type": "array"},
                    },
                },
            },
            "required": ["apilist"],
        })))
    }

    fn validate(&self, raw: &Value) -> Result<(), ValidationError> {
        ArgObject::parse(raw).map(|_| ())
    }

    fn plan(&self, _args: ()) -> Invocation {
        Invocation::Single(SingleCall::new(
            UpstreamRequest::api(SUPPORTED_API_LIST_PATH),
            SuccessSignal::field("apilist"),
        ))
    }
}
