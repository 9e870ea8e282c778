//! Request dispatch: decode calls, run procedures, encode envelopes.
//!
//! A request names one procedure, or with `?batch=1` a comma-separated list
//! whose inputs arrive as a JSON object keyed by call index. Every call gets
//! its own envelope; a failure in one never aborts the others.

use std::panic::{catch_unwind, AssertUnwindSafe};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use todo_core::{
    envelope::batch_http_status, procedure, schema, Envelope, HttpMethod, ProcedureKind,
    CREATE_TODO,
};
use uuid::Uuid;

use crate::{error::RpcError, handler::TodoHandler, AppState};

pub(crate) fn handle(
    state: &AppState,
    method: HttpMethod,
    paths: &str,
    batch: bool,
    raw_input: &[u8],
) -> Response {
    let request_id = Uuid::new_v4();
    let kind = ProcedureKind::from_http_method(method);
    let span = tracing::info_span!("rpc", %request_id, path = paths, %kind, batch);
    let _enter = span.enter();

    if !batch {
        let envelope = match parse_input(raw_input) {
            Ok(input) => run_call(state, method, paths, input),
            Err(err) => fail(err, Some(paths)),
        };
        return reply(envelope.http_status(), &envelope);
    }

    let calls = match parse_batch(paths, raw_input) {
        Ok(calls) => calls,
        Err(err) => {
            let envelope = fail(err, None);
            return reply(envelope.http_status(), &envelope);
        }
    };

    let envelopes: Vec<Envelope> = calls
        .into_iter()
        .map(|(path, input)| run_call(state, method, path, input))
        .collect();
    reply(batch_http_status(&envelopes), &envelopes)
}

/// An empty body means the call carries no input.
fn parse_input(raw: &[u8]) -> Result<Option<Value>, RpcError> {
    if raw.trim_ascii().is_empty() {
        return Ok(None);
    }
    serde_json::from_slice(raw).map(Some).map_err(RpcError::Parse)
}

fn parse_batch<'a>(
    paths: &'a str,
    raw: &[u8],
) -> Result<Vec<(&'a str, Option<Value>)>, RpcError> {
    let mut inputs = match parse_input(raw)? {
        None => serde_json::Map::new(),
        Some(Value::Object(inputs)) => inputs,
        Some(_) => return Err(RpcError::BatchInput),
    };

    Ok(paths
        .split(',')
        .enumerate()
        .map(|(index, path)| (path, inputs.remove(&index.to_string())))
        .collect())
}

fn run_call(state: &AppState, method: HttpMethod, path: &str, input: Option<Value>) -> Envelope {
    match execute(state.handler.as_ref(), method, path, input) {
        Ok(data) => Envelope::success(data),
        Err(err) => fail(err, Some(path)),
    }
}

fn fail(err: RpcError, path: Option<&str>) -> Envelope {
    match &err {
        RpcError::Validation(issues) => {
            tracing::warn!(issues = issues.len(), "input validation failed");
        }
        RpcError::Handler(_) | RpcError::Panicked | RpcError::SerializingResult(_) => {
            tracing::error!(error = %err, "procedure failed");
        }
        _ => tracing::warn!(error = %err, "call rejected"),
    }
    Envelope::failure(err.into_shape(path))
}

fn execute(
    handler: &dyn TodoHandler,
    method: HttpMethod,
    path: &str,
    input: Option<Value>,
) -> Result<Value, RpcError> {
    let not_found = || RpcError::NotFound {
        path: path.to_string(),
        kind: ProcedureKind::from_http_method(method),
    };

    let def = procedure::lookup(path).ok_or_else(not_found)?;
    if def.kind.http_method() != method {
        return Err(RpcError::MethodNotSupported {
            path: path.to_string(),
            method: method.as_str(),
            kind: def.kind,
        });
    }

    match def.name {
        CREATE_TODO => create_todo(handler, input.as_ref()),
        _ => Err(not_found()),
    }
}

fn create_todo(handler: &dyn TodoHandler, input: Option<&Value>) -> Result<Value, RpcError> {
    let input = schema::validate_create_todo(input).map_err(RpcError::Validation)?;
    let output = catch_unwind(AssertUnwindSafe(|| handler.create_todo(input)))
        .map_err(|_| RpcError::Panicked)??;
    serde_json::to_value(output).map_err(RpcError::SerializingResult)
}

/// Answer a request that was refused before any call could be decoded.
pub(crate) fn reject(err: RpcError) -> Response {
    let envelope = fail(err, None);
    reply(envelope.http_status(), &envelope)
}

fn reply(status: u16, body: &impl Serialize) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_body_is_no_input() {
        assert_eq!(parse_input(b"").unwrap(), None);
        assert_eq!(parse_input(b"  \n").unwrap(), None);
    }

    #[test]
    fn malformed_body_is_parse_error() {
        let err = parse_input(b"{\"title\":").unwrap_err();
        assert!(matches!(err, RpcError::Parse(_)));
    }

    #[test]
    fn batch_inputs_follow_call_index() {
        let calls = parse_batch(
            "createTodo,createTodo",
            br#"{"1":{"title":"b","description":"y"}}"#,
        )
        .unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], ("createTodo", None));
        assert_eq!(calls[1].1, Some(json!({"title": "b", "description": "y"})));
    }

    #[test]
    fn query_call_to_mutation_is_method_not_supported() {
        let err = execute(
            &crate::handler::PlaceholderHandler,
            HttpMethod::Get,
            CREATE_TODO,
            Some(json!({"title": "a", "description": "b"})),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RpcError::MethodNotSupported {
                method: "GET",
                kind: ProcedureKind::Mutation,
                ..
            }
        ));
    }

    #[test]
    fn batch_body_must_be_object() {
        let err = parse_batch("createTodo", b"[1,2]").unwrap_err();
        assert!(matches!(err, RpcError::BatchInput));
    }
}
