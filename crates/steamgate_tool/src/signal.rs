//! Per-tool success oracles for 200-status responses.

use serde_json::Value;
use std::borrow::Cow;

/// How a tool decides that a parsed upstream body is a success
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuccessSignal {
    /// HTTP status alone; any JSON body counts
    Status,
    /// Numeric result code at `pointer` must equal `expected`
    ResultCode {
        /// JSON pointer, e.g. `/response/result`
        pointer: Cow<'static, str>,
        /// Value meaning success
        expected: i64,
    },
    /// Boolean at `pointer` must be `true`
    Flag {
        /// JSON pointer, e.g. `/playerstats/success`
        pointer: Cow<'static, str>,
    },
    /// Top-level `key` must be present
    Field {
        /// Top-level key
        key: &'static str,
    },
}

impl SuccessSignal {
    /// Numeric result code at `pointer` must equal `expected`
    #[must_use]
    pub fn result_code(pointer: impl Into<Cow<'static, str>>, expected: i64) -> Self {
        Self::ResultCode {
            pointer: pointer.into(),
            expected,
        }
    }

    /// Boolean at `pointer` must be `true`
    #[must_use]
    pub fn flag(pointer: impl Into<Cow<'static, str>>) -> Self {
        Self::Flag {
            pointer: pointer.into(),
        }
    }

    /// Top-level `key` must be present
    #[must_use]
    pub fn field(key: &'static str) -> Self {
        Self::Field { key }
    }

    /// Check a body against this signal
    ///
    /// # Errors
    ///
    /// Returns a short reason when the signal is absent
    pub fn check(&self, body: &Value) -> Result<(), String> {
        match self {
            Self::Status => Ok(()),
            Self::ResultCode { pointer, expected } => match body.pointer(pointer) {
                Some(code) if code.as_i64() == Some(*expected) => Ok(()),
                Some(code) => Err(format!("`{}` is {code}, expected {expected}", dotted(pointer))),
                None => Err(format!("missing `{}`", dotted(pointer))),
            },
            Self::Flag { pointer } => match body.pointer(pointer) {
                Some(Value::Bool(true)) => Ok(()),
                Some(flag) => Err(format!("`{}` is {flag}", dotted(pointer))),
                None => Err(format!("missing `{}`", dotted(pointer))),
            },
            Self::Field { key } => {
                if body.get(key).is_some() {
                    Ok(())
                } else {
                    Err(format!("missing top-level `{key}`"))
                }
            }
        }
    }
}

/// `/a/b` as `a.b`
fn dotted(pointer: &str) -> String {
    pointer.trim_start_matches('/').replace('/', ".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_code() {
        let signal = SuccessSignal::result_code("/response/result", 1);
        assert!(signal.check(&json!({"response": {"player_count": 12000, "result": 1}})).is_ok());
        assert_eq!(
            signal.check(&json!({"response": {"result": 42}})).unwrap_err(),
            "`response.result` is 42, expected 1"
        );
        assert_eq!(
            signal.check(&json!({"response": {}})).unwrap_err(),
            "missing `response.result`"
        );
    }

    #[test]
    fn test_flag() {
        let signal = SuccessSignal::flag("/playerstats/success");
        assert!(signal.check(&json!({"playerstats": {"success": true}})).is_ok());
        assert!(signal.check(&json!({"playerstats": {"success": false}})).is_err());
        assert!(signal.check(&json!({"playerstats": {"success": "true"}})).is_err());
        assert!(signal.check(&json!({})).is_err());
    }

    #[test]
    fn test_field() {
        let signal = SuccessSignal::field("game");
        assert!(signal.check(&json!({"game": {}})).is_ok());
        assert!(signal.check(&json!({"game": null})).is_ok());
        assert_eq!(signal.check(&json!({})).unwrap_err(), "missing top-level `game`");
        assert!(signal.check(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_status_accepts_anything() {
        assert!(SuccessSignal::Status.check(&json!(null)).is_ok());
    }
}
