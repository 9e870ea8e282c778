//! HTTP server exposing the `createTodo` procedure.
//!
//! # Design
//! `POST /{procedure}` carries a mutation, `GET /{procedure}?input=…` a
//! query; `?batch=1` turns the path into a comma-separated list of calls.
//! Answers always use the JSON envelopes from `todo_core::envelope`, including
//! requests refused before dispatch (unknown route, unrouted method, bad path
//! or query string), and no failure inside a call ever takes the listener
//! down.

use std::{future::Future, sync::Arc};

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{Method, Uri},
    response::Response,
    routing::get,
    Router,
};
use serde::Deserialize;
use todo_core::HttpMethod;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handler;
mod rpc;

pub use error::RpcError;
pub use handler::{HandlerError, PlaceholderHandler, TodoHandler};

#[derive(Clone)]
pub struct AppState {
    handler: Arc<dyn TodoHandler>,
}

#[derive(Debug, Deserialize)]
struct RpcParams {
    batch: Option<String>,
    input: Option<String>,
}

impl RpcParams {
    fn is_batch(&self) -> bool {
        matches!(self.batch.as_deref(), Some("1" | "true"))
    }
}

pub fn app() -> Router {
    app_with_handler(PlaceholderHandler)
}

pub fn app_with_handler(handler: impl TodoHandler) -> Router {
    let state = AppState {
        handler: Arc::new(handler),
    };
    Router::new()
        .route(
            "/{path}",
            get(query_call)
                .post(mutation_call)
                .fallback(unsupported_method),
        )
        .fallback(no_route)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Like `run`, but stops accepting connections once `shutdown` resolves and
/// waits for in-flight requests.
pub async fn run_until<F>(listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app())
        .with_graceful_shutdown(shutdown)
        .await
}

async fn mutation_call(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    params: Result<Query<RpcParams>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let (Path(path), Query(params)) = match (path, params) {
        (Ok(path), Ok(params)) => (path, params),
        (Err(err), _) => return rpc::reject(RpcError::BadRequest(err.body_text())),
        (_, Err(err)) => return rpc::reject(RpcError::BadRequest(err.body_text())),
    };
    let body = match body {
        Ok(body) => body,
        Err(err) => return rpc::reject(RpcError::BadRequest(err.body_text())),
    };
    rpc::handle(&state, HttpMethod::Post, &path, params.is_batch(), &body)
}

async fn query_call(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    params: Result<Query<RpcParams>, QueryRejection>,
) -> Response {
    let (Path(path), Query(params)) = match (path, params) {
        (Ok(path), Ok(params)) => (path, params),
        (Err(err), _) => return rpc::reject(RpcError::BadRequest(err.body_text())),
        (_, Err(err)) => return rpc::reject(RpcError::BadRequest(err.body_text())),
    };
    let input = params.input.as_deref().unwrap_or_default();
    rpc::handle(&state, HttpMethod::Get, &path, params.is_batch(), input.as_bytes())
}

async fn unsupported_method(method: Method, uri: Uri) -> Response {
    rpc::reject(RpcError::UnroutedMethod {
        path: uri.path().to_string(),
        method: method.to_string(),
    })
}

async fn no_route(uri: Uri) -> Response {
    rpc::reject(RpcError::NoRoute {
        path: uri.path().to_string(),
    })
}
