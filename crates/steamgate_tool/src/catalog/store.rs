//! Storefront tools.

use super::{app_subject, APPID_DESCRIPTION};
use crate::invoke::{BatchItem, Invocation};
use crate::schema::{InputSchema, OutputSchema, ToolSchema};
use crate::signal::SuccessSignal;
use crate::trait_::ToolContract;
use crate::upstream::UpstreamRequest;
use crate::validate::{ArgObject, ValidationError};
use serde_json::{Value, json};

const APP_DETAILS_PATH: &str = "/api/appdetails";

/// Store details for several applications, fetched one id at a time
///
/// The storefront endpoint rejects multiple ids per request for most
/// filters, so each id is its own unauthenticated request. Items fail
/// independently.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppDetails;

impl ToolContract for AppDetails {
    type Args = Vec<u64>;

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "getAppDetails",
            "Get store details for one or more applications; each id succeeds or fails on its own",
        )
        .with_input(InputSchema::new().required_integer_array("appids", APPID_DESCRIPTION, 1, true))
        .with_output(OutputSchema::envelope(OutputSchema::batch(json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "steam_appid": {"type": "integer"},
                "type": {"type": "string"},
                "is_free": {"type": "boolean"},
            },
        }))))
    }

    fn validate(&self, raw: &Value) -> Result<Vec<u64>, ValidationError> {
        ArgObject::parse(raw)?.required_u64_list("appids", 1, true)
    }

    fn plan(&self, appids: Vec<u64>) -> Invocation {
        Invocation::FanOut(
            appids
                .into_iter()
                .map(|appid| BatchItem {
                    key: appid.to_string(),
                    request: UpstreamRequest::store(APP_DETAILS_PATH)
                        .param("appids", appid)
                        .subject(app_subject(appid)),
                    signal: SuccessSignal::flag(format!("/{appid}/success")),
                    extract: Some(format!("/{appid}/data")),
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_item_per_appid_in_order() {
        let appids = AppDetails.validate(&json!({"appids": [730, 10, 570]})).unwrap();
        let Invocation::FanOut(items) = AppDetails.plan(appids) else {
            panic!("expected fan-out");
        };
        let keys: Vec<_> = items.iter().map(|item| item.key.as_str()).collect();
        assert_eq!(keys, vec!["730", "10", "570"]);
        for item in &items {
            assert!(!item.request.authenticated);
            assert_eq!(item.request.query_value("appids"), Some(item.key.as_str()));
        }
        assert_eq!(items[1].signal, SuccessSignal::flag("/10/success"));
        assert_eq!(items[1].extract.as_deref(), Some("/10/data"));
    }

    #[test]
    fn test_rejects_bad_lists() {
        assert!(AppDetails.validate(&json!({"appids": []})).is_err());
        assert!(AppDetails.validate(&json!({"appids": [10, 10]})).is_err());
        assert!(AppDetails.validate(&json!({"appids": [10, "20"]})).is_err());
        assert!(AppDetails.validate(&json!({"appids": 10})).is_err());
    }
}
