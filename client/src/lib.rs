//! Blocking RPC client for the todo server.
//!
//! # Overview
//! `todo_core::TodoClient` only builds and parses plain-data HTTP messages.
//! This crate is the host side of that split: `UreqTransport` performs the
//! round-trip and `TodoRpc` wires the two together behind one method per
//! procedure.
//!
//! # Design
//! - Each call blocks until the response arrives, fails, or
//!   `DEFAULT_TIMEOUT` expires.
//! - 4xx/5xx responses come back as data so the core can read the error
//!   envelope; only failures to get any response become
//!   `ApiError::Transport`.

use std::time::Duration;

use todo_core::config::DEFAULT_TIMEOUT;
use todo_core::{
    ApiError, CreateTodoInput, CreateTodoOutput, HttpMethod, HttpRequest, HttpResponse, TodoClient,
};

/// Executes `HttpRequest` values over the network with a ureq agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }

    pub fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = ?req.method, url = %req.url, "sending request");

        let result = match (req.method, req.body) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(&req.url), &req.headers).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(&req.url), &req.headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => {
                with_headers(self.agent.post(&req.url), &req.headers).send_empty()
            }
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        tracing::debug!(status, "received response");
        Ok(HttpResponse { status, body })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

/// Typed client with one accessor per procedure.
#[derive(Clone)]
pub struct TodoRpc {
    core: TodoClient,
    transport: UreqTransport,
}

impl TodoRpc {
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, UreqTransport::default())
    }

    pub fn with_transport(base_url: &str, transport: UreqTransport) -> Self {
        Self {
            core: TodoClient::new(base_url),
            transport,
        }
    }

    /// `createTodo` is a mutation, so the returned handle only offers
    /// `mutate`.
    pub fn create_todo(&self) -> CreateTodo<'_> {
        CreateTodo { rpc: self }
    }

    /// Send every input as one batched HTTP request. Results come back in
    /// input order; the outer error means the batch as a whole failed.
    pub fn create_todo_batch(
        &self,
        inputs: &[CreateTodoInput],
    ) -> Result<Vec<Result<CreateTodoOutput, ApiError>>, ApiError> {
        let req = self.core.build_create_todo_batch(inputs)?;
        let response = self.transport.execute(req)?;
        self.core.parse_create_todo_batch(response, inputs.len())
    }
}

/// Call handle for the `createTodo` procedure.
#[derive(Clone, Copy)]
pub struct CreateTodo<'a> {
    rpc: &'a TodoRpc,
}

impl CreateTodo<'_> {
    pub fn mutate(&self, input: &CreateTodoInput) -> Result<CreateTodoOutput, ApiError> {
        let req = self.rpc.core.build_create_todo(input)?;
        let response = self.rpc.transport.execute(req)?;
        let result = self.rpc.core.parse_create_todo(response);
        if let Err(err) = &result {
            tracing::warn!(kind = ?err.kind(), error = %err, "createTodo failed");
        }
        result
    }
}
