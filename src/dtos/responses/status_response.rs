use serde::Serialize;
use serde_json::{json, Value};

/// Result shape of the event driven handlers: `{statusCode, body}`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StatusResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: Value,
}

impl StatusResponse {
    pub fn ok(body: impl Into<Value>) -> Self {
        Self {
            status_code: 200,
            body: body.into(),
        }
    }

    pub fn bad_request(body: impl Into<Value>) -> Self {
        Self {
            status_code: 400,
            body: body.into(),
        }
    }

    /// Reports an unexpected failure as `{error}`.
    pub fn server_error(error: impl std::fmt::Display) -> Self {
        Self {
            status_code: 500,
            body: json!({ "error": error.to_string() }),
        }
    }
}
