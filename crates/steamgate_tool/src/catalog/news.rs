//! `ISteamNews` tools.

use super::{app_subject, APPID_DESCRIPTION};
use crate::invoke::{Invocation, SingleCall};
use crate::schema::{InputSchema, OutputSchema, ToolSchema};
use crate::signal::SuccessSignal;
use crate::trait_::ToolContract;
use crate::upstream::UpstreamRequest;
use crate::validate::{ArgObject, ValidationError};
use serde_json::{Value, json};

const NEWS_PATH: &str = "/ISteamNews/GetNewsForApp/v2/";

/// Entries returned when `count` is absent
pub const DEFAULT_NEWS_COUNT: u64 = 3;

/// Content length when `maxlength` is absent
pub const DEFAULT_NEWS_MAX_LENGTH: u64 = 300;

/// Arguments of [`GameNews`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewsArgs {
    /// Application id
    pub appid: u64,
    /// Number of entries
    pub count: u64,
    /// Maximum content length per entry
    pub maxlength: u64,
}

/// Latest news entries of a game
#[derive(Debug, Clone, Copy, Default)]
pub struct GameNews;

impl ToolContract for GameNews {
    type Args = NewsArgs;

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("getGameNews", "Get the latest news entries of a game")
            .with_input(
                InputSchema::new()
                    .required_integer("appid", APPID_DESCRIPTION)
                    .optional_integer("count", "Number of entries to return", Some(DEFAULT_NEWS_COUNT))
                    .optional_integer(
                        "maxlength",
                        "Maximum length of each entry's content",
                        Some(DEFAULT_NEWS_MAX_LENGTH),
                    ),
            )
            .with_output(OutputSchema::envelope(json!({
                "type": "object",
                "properties": {
                    "appnews": {
                        "type": "object",
                        "properties": {
                            "appid": {"type": "integer"},
                            "newsitems": {"type": "array"},
                            "count": {"type": "integer"},
                        },
                    },
                },
                "required": ["appnews"],
            })))
    }

    fn validate(&self, raw: &Value) -> Result<NewsArgs, ValidationError> {
        let args = ArgObject::parse(raw)?;
        Ok(NewsArgs {
            appid: args.required_u64("appid")?,
            count: args.optional_u64("count")?.unwrap_or(DEFAULT_NEWS_COUNT),
            maxlength: args.optional_u64("maxlength")?.unwrap_or(DEFAULT_NEWS_MAX_LENGTH),
        })
    }

    fn plan(&self, args: NewsArgs) -> Invocation {
        Invocation::Single(SingleCall::new(
            UpstreamRequest::api(NEWS_PATH)
                .param("appid", args.appid)
                .param("count", args.count)
                .param("maxlength", args.maxlength)
                .subject(app_subject(args.appid)),
            SuccessSignal::field("appnews"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let args = GameNews.validate(&json!({"appid": 440})).unwrap();
        assert_eq!(
            args,
            NewsArgs {
                appid: 440,
                count: 3,
                maxlength: 300
            }
        );
        let Invocation::Single(call) = GameNews.plan(args) else {
            panic!("expected single call");
        };
        assert_eq!(call.request.query_value("count"), Some("3"));
        assert_eq!(call.request.query_value("maxlength"), Some("300"));
    }

    #[test]
    fn test_explicit_values_win() {
        let args = GameNews
            .validate(&json!({"appid": 440, "count": 10, "maxlength": 0}))
            .unwrap();
        assert_eq!(args.count, 10);
        assert_eq!(args.maxlength, 0);
    }

    #[test]
    fn test_optional_fields_typed() {
        assert!(GameNews.validate(&json!({"appid": 440, "count": "5"})).is_err());
        assert!(GameNews.validate(&json!({"appid": 440, "maxlength": null})).is_err());
    }
}
