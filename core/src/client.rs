//! Stateless HTTP request builder and response parser for the RPC endpoint.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each procedure call is split into a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping the core
//! deterministic and free of I/O dependencies.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Map;

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::procedure::{ProcedureKind, CREATE_TODO};
use crate::types::{CreateTodoInput, CreateTodoOutput};

/// Synchronous, stateless client for the RPC endpoint.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The caller is responsible for executing the HTTP
/// round-trip between `build_*` and `parse_*`.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_create_todo(&self, input: &CreateTodoInput) -> Result<HttpRequest, ApiError> {
        self.build_mutation(CREATE_TODO, input)
    }

    /// Build one request carrying `createTodo` once per input.
    pub fn build_create_todo_batch(
        &self,
        inputs: &[CreateTodoInput],
    ) -> Result<HttpRequest, ApiError> {
        let calls: Vec<(&str, &CreateTodoInput)> =
            inputs.iter().map(|input| (CREATE_TODO, input)).collect();
        self.build_mutation_batch(&calls)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<CreateTodoOutput, ApiError> {
        parse_single(&response)
    }

    /// Parse a batch response into one result per call, in call order.
    ///
    /// The outer `Err` covers failures of the batch as a whole (unparseable
    /// request body, transport-level garbage, wrong number of results).
    pub fn parse_create_todo_batch(
        &self,
        response: HttpResponse,
        expected: usize,
    ) -> Result<Vec<Result<CreateTodoOutput, ApiError>>, ApiError> {
        parse_batch(&response, expected)
    }

    fn build_mutation(&self, name: &str, input: &impl Serialize) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(post(format!("{}/{name}", self.base_url), body))
    }

    fn build_mutation_batch<T: Serialize>(&self, calls: &[(&str, T)]) -> Result<HttpRequest, ApiError> {
        if calls.is_empty() {
            return Err(ApiError::SerializationError("a batch needs at least one call".to_string()));
        }

        let mut body = Map::new();
        let mut names = Vec::with_capacity(calls.len());
        for (index, (name, input)) in calls.iter().enumerate() {
            let value = serde_json::to_value(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
            body.insert(index.to_string(), value);
            names.push(*name);
        }

        let body = serde_json::to_string(&body).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(post(format!("{}/{}?batch=1", self.base_url, names.join(",")), body))
    }
}

fn post(url: String, body: String) -> HttpRequest {
    HttpRequest {
        method: ProcedureKind::Mutation.http_method(),
        url,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    }
}

fn parse_single<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    let envelope: Envelope = serde_json::from_str(&response.body).map_err(|e| unexpected(response, e))?;
    decode(envelope)
}

fn parse_batch<T: DeserializeOwned>(
    response: &HttpResponse,
    expected: usize,
) -> Result<Vec<Result<T, ApiError>>, ApiError> {
    let envelopes: Vec<Envelope> = match serde_json::from_str(&response.body) {
        Ok(envelopes) => envelopes,
        // The whole batch was rejected before any call ran.
        Err(e) => {
            return match serde_json::from_str::<Envelope>(&response.body) {
                Ok(Envelope::Error { error }) => Err(error.into()),
                _ => Err(unexpected(response, e)),
            };
        }
    };

    if envelopes.len() != expected {
        return Err(ApiError::DeserializationError(format!(
            "expected {expected} results, received {}",
            envelopes.len()
        )));
    }

    Ok(envelopes.into_iter().map(decode::<T>).collect())
}

fn decode<T: DeserializeOwned>(envelope: Envelope) -> Result<T, ApiError> {
    match envelope {
        Envelope::Result { result } => {
            serde_json::from_value(result.data).map_err(|e| ApiError::DeserializationError(e.to_string()))
        }
        Envelope::Error { error } => Err(error.into()),
    }
}

/// A body that is not an envelope: report the status when it was already an
/// error, otherwise the decode failure.
fn unexpected(response: &HttpResponse, err: serde_json::Error) -> ApiError {
    if response.is_success() {
        ApiError::DeserializationError(err.to_string())
    } else {
        ApiError::HttpError {
            status: response.status,
            body: response.body.clone(),
        }
    }
}
