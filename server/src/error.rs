use thiserror::Error;
use todo_core::{ErrorCode, ErrorShape, Issue, ProcedureKind};

use crate::handler::HandlerError;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Everything that can stop a call from producing a result.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("{0}")]
    Parse(serde_json::Error),
    #[error("input validation failed")]
    Validation(Vec<Issue>),
    #[error("\"input\" needs to be an object when doing a batch call")]
    BatchInput,
    #[error("No \"{kind}\"-procedure on path \"{path}\"")]
    NotFound { path: String, kind: ProcedureKind },
    #[error("Unsupported {method}-request to {kind} procedure at path \"{path}\"")]
    MethodNotSupported {
        path: String,
        method: &'static str,
        kind: ProcedureKind,
    },
    #[error("No procedure on path \"{path}\"")]
    NoRoute { path: String },
    #[error("Unsupported {method}-request at path \"{path}\"")]
    UnroutedMethod { path: String, method: String },
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("handler failed: {0}")]
    Handler(#[from] HandlerError),
    #[error("handler panicked")]
    Panicked,
    #[error("error serializing procedure result: {0}")]
    SerializingResult(serde_json::Error),
}

impl RpcError {
    pub fn code(&self) -> ErrorCode {
        match self {
            RpcError::Parse(_) => ErrorCode::ParseError,
            RpcError::Validation(_) | RpcError::BatchInput | RpcError::BadRequest(_) => {
                ErrorCode::BadRequest
            }
            RpcError::NotFound { .. } | RpcError::NoRoute { .. } => ErrorCode::NotFound,
            RpcError::MethodNotSupported { .. } | RpcError::UnroutedMethod { .. } => {
                ErrorCode::MethodNotSupported
            }
            RpcError::Handler(_) | RpcError::Panicked | RpcError::SerializingResult(_) => {
                ErrorCode::InternalServerError
            }
        }
    }

    /// Wire representation. Internal failures are reduced to a fixed message.
    pub fn into_shape(self, path: Option<&str>) -> ErrorShape {
        let code = self.code();
        match self {
            RpcError::Validation(issues) => {
                ErrorShape::new(code, validation_message(&issues), path).with_issues(issues)
            }
            RpcError::Handler(_) | RpcError::Panicked | RpcError::SerializingResult(_) => {
                ErrorShape::new(code, INTERNAL_MESSAGE, path)
            }
            other => ErrorShape::new(code, other.to_string(), path),
        }
    }
}

fn validation_message(issues: &[Issue]) -> String {
    let details: Vec<String> = issues
        .iter()
        .map(|issue| {
            if issue.path.is_empty() {
                issue.message.clone()
            } else {
                format!("{}: {}", issue.path.join("."), issue.message)
            }
        })
        .collect();
    format!("Input validation failed: {}", details.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_shape_lists_fields() {
        let shape = RpcError::Validation(vec![
            Issue::new(&["title"], "Expected string, received number"),
            Issue::new(&["description"], "Required"),
        ])
        .into_shape(Some("createTodo"));
        assert_eq!(shape.data.code, ErrorCode::BadRequest);
        assert_eq!(
            shape.message,
            "Input validation failed: title: Expected string, received number, description: Required"
        );
        assert_eq!(shape.data.issues.len(), 2);
    }

    #[test]
    fn handler_detail_is_not_exposed() {
        let shape = RpcError::Handler(HandlerError("connection to 10.0.0.5 refused".into()))
            .into_shape(Some("createTodo"));
        assert_eq!(shape.data.code, ErrorCode::InternalServerError);
        assert_eq!(shape.message, INTERNAL_MESSAGE);
        assert_eq!(shape.data.http_status, 500);
    }

    #[test]
    fn not_found_names_kind_and_path() {
        let shape = RpcError::NotFound {
            path: "deleteTodo".into(),
            kind: ProcedureKind::Mutation,
        }
        .into_shape(Some("deleteTodo"));
        assert_eq!(shape.message, "No \"mutation\"-procedure on path \"deleteTodo\"");
        assert_eq!(shape.code, -32004);
    }

    #[test]
    fn unrouted_method_is_method_not_supported() {
        let shape = RpcError::UnroutedMethod {
            path: "/createTodo".into(),
            method: "PUT".into(),
        }
        .into_shape(None);
        assert_eq!(shape.data.code, ErrorCode::MethodNotSupported);
        assert_eq!(shape.data.http_status, 405);
        assert_eq!(shape.message, "Unsupported PUT-request at path \"/createTodo\"");
    }
}
