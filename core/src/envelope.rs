//! JSON envelopes carried on the wire.
//!
//! # Design
//! A successful call answers `{"result":{"data":…}}`; a failed one answers
//! `{"error":{"message","code","data":{"code","httpStatus",…}}}`. The numeric
//! `code` follows JSON-RPC 2.0, the string `data.code` names the error kind.
//! Batched calls answer a JSON array of these envelopes in call order.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error kinds the server can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The request body is not valid JSON.
    ParseError,
    /// The input does not satisfy the procedure's schema.
    BadRequest,
    /// The procedure itself failed.
    InternalServerError,
    NotFound,
    MethodNotSupported,
    /// A kind this client does not know about. The envelope still decodes.
    #[serde(other)]
    Unknown,
}

impl ErrorCode {
    pub fn json_rpc_code(self) -> i32 {
        match self {
            ErrorCode::ParseError => -32700,
            ErrorCode::BadRequest => -32600,
            ErrorCode::InternalServerError | ErrorCode::Unknown => -32603,
            ErrorCode::NotFound => -32004,
            ErrorCode::MethodNotSupported => -32005,
        }
    }

    pub fn http_status(self) -> u16 {
        match self {
            ErrorCode::ParseError | ErrorCode::BadRequest => 400,
            ErrorCode::InternalServerError | ErrorCode::Unknown => 500,
            ErrorCode::NotFound => 404,
            ErrorCode::MethodNotSupported => 405,
        }
    }
}

/// One failed schema check. `path` is empty when the whole input is wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub path: Vec<String>,
    pub message: String,
}

impl Issue {
    pub fn new(path: &[&str], message: impl Into<String>) -> Self {
        Self {
            path: path.iter().map(|p| p.to_string()).collect(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorData {
    pub code: ErrorCode,
    pub http_status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorShape {
    pub message: String,
    pub code: i32,
    pub data: ErrorData,
}

impl ErrorShape {
    pub fn new(code: ErrorCode, message: impl Into<String>, path: Option<&str>) -> Self {
        Self {
            message: message.into(),
            code: code.json_rpc_code(),
            data: ErrorData {
                code,
                http_status: code.http_status(),
                path: path.map(str::to_string),
                issues: Vec::new(),
            },
        }
    }

    pub fn with_issues(mut self, issues: Vec<Issue>) -> Self {
        self.data.issues = issues;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultData {
    pub data: Value,
}

/// Response to a single call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Envelope {
    Result { result: ResultData },
    Error { error: ErrorShape },
}

impl Envelope {
    pub fn success(data: Value) -> Self {
        Envelope::Result {
            result: ResultData { data },
        }
    }

    pub fn failure(error: ErrorShape) -> Self {
        Envelope::Error { error }
    }

    /// HTTP status this envelope is sent with when it answers a single call.
    pub fn http_status(&self) -> u16 {
        match self {
            Envelope::Result { .. } => 200,
            Envelope::Error { error } => error.data.http_status,
        }
    }
}

/// Status for a batch response: 200 when every call succeeded, the shared
/// status when every call failed the same way, 207 otherwise.
pub fn batch_http_status(envelopes: &[Envelope]) -> u16 {
    let mut statuses = envelopes.iter().map(Envelope::http_status);
    let Some(first) = statuses.next() else {
        return 200;
    };
    if statuses.all(|status| status == first) {
        first
    } else {
        207
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn success_envelope_wraps_data() {
        let json = serde_json::to_value(Envelope::success(json!({"id": "1"}))).unwrap();
        assert_eq!(json, json!({"result": {"data": {"id": "1"}}}));
    }

    #[test]
    fn error_envelope_carries_kind_and_status() {
        let shape = ErrorShape::new(ErrorCode::BadRequest, "bad input", Some("createTodo"))
            .with_issues(vec![Issue::new(&["title"], "Required")]);
        let json = serde_json::to_value(Envelope::failure(shape)).unwrap();
        assert_eq!(json["error"]["code"], -32600);
        assert_eq!(json["error"]["data"]["code"], "BAD_REQUEST");
        assert_eq!(json["error"]["data"]["httpStatus"], 400);
        assert_eq!(json["error"]["data"]["path"], "createTodo");
        assert_eq!(json["error"]["data"]["issues"][0]["path"], json!(["title"]));
    }

    #[test]
    fn error_envelope_omits_empty_issues_and_path() {
        let shape = ErrorShape::new(ErrorCode::InternalServerError, "Internal server error", None);
        let json = serde_json::to_value(Envelope::failure(shape)).unwrap();
        assert!(json["error"]["data"].get("issues").is_none());
        assert!(json["error"]["data"].get("path").is_none());
    }

    #[test]
    fn envelope_decodes_either_variant() {
        let ok: Envelope = serde_json::from_str(r#"{"result":{"data":{"id":"1"}}}"#).unwrap();
        assert!(matches!(ok, Envelope::Result { .. }));

        let err: Envelope = serde_json::from_str(
            r#"{"error":{"message":"x","code":-32700,"data":{"code":"PARSE_ERROR","httpStatus":400}}}"#,
        )
        .unwrap();
        match err {
            Envelope::Error { error } => assert_eq!(error.data.code, ErrorCode::ParseError),
            other => panic!("expected error envelope, got {other:?}"),
        }
    }

    #[test]
    fn unrecognised_error_code_still_decodes() {
        let err: Envelope = serde_json::from_str(
            r#"{"error":{"message":"no token","code":-32001,"data":{"code":"UNAUTHORIZED","httpStatus":401}}}"#,
        )
        .unwrap();
        match err {
            Envelope::Error { error } => {
                assert_eq!(error.data.code, ErrorCode::Unknown);
                assert_eq!(error.data.http_status, 401);
                assert_eq!(error.message, "no token");
            }
            other => panic!("expected error envelope, got {other:?}"),
        }
    }

    #[test]
    fn batch_status_all_ok() {
        let envelopes = vec![Envelope::success(json!(1)), Envelope::success(json!(2))];
        assert_eq!(batch_http_status(&envelopes), 200);
    }

    #[test]
    fn batch_status_uniform_failure() {
        let bad = || Envelope::failure(ErrorShape::new(ErrorCode::BadRequest, "x", None));
        assert_eq!(batch_http_status(&[bad(), bad()]), 400);
    }

    #[test]
    fn batch_status_mixed_is_multi_status() {
        let envelopes = vec![
            Envelope::success(json!(1)),
            Envelope::failure(ErrorShape::new(ErrorCode::BadRequest, "x", None)),
        ];
        assert_eq!(batch_http_status(&envelopes), 207);
    }
}
