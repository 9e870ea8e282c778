//! Error types for the RPC client.
//!
//! # Design
//! Failures reported by the server keep the error kind and the schema issues
//! from the error envelope, so callers can tell a parse error from a
//! validation error from a handler failure. Everything that prevented a
//! well-formed envelope from arriving is a transport failure.

use thiserror::Error;

use crate::envelope::{ErrorCode, ErrorShape, Issue};

/// Coarse classification of an `ApiError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The server could not parse the request body as JSON.
    Parse,
    /// The input failed schema validation; the handler did not run.
    Validation,
    /// The handler failed on the server.
    Handler,
    /// Connection refused, timeout, or a response that could not be decoded.
    Transport,
    /// The call itself was wrong: unknown procedure, wrong call kind, or an
    /// input that could not be encoded.
    Protocol,
}

/// Errors returned by `TodoClient` parse methods and by transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with an error envelope.
    #[error("{code:?}: {message}")]
    Rpc {
        code: ErrorCode,
        message: String,
        issues: Vec<Issue>,
    },

    /// The server returned a non-2xx status without a decodable error
    /// envelope.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be decoded into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Rpc { code, .. } => match code {
                ErrorCode::ParseError => ErrorKind::Parse,
                ErrorCode::BadRequest => ErrorKind::Validation,
                ErrorCode::InternalServerError => ErrorKind::Handler,
                ErrorCode::NotFound | ErrorCode::MethodNotSupported | ErrorCode::Unknown => {
                    ErrorKind::Protocol
                }
            },
            ApiError::HttpError { .. }
            | ApiError::Transport(_)
            | ApiError::DeserializationError(_) => ErrorKind::Transport,
            ApiError::SerializationError(_) => ErrorKind::Protocol,
        }
    }

    /// Error kind reported by the server, if the server reported one.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ApiError::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Schema issues reported with a validation error.
    pub fn issues(&self) -> &[Issue] {
        match self {
            ApiError::Rpc { issues, .. } => issues,
            _ => &[],
        }
    }
}

impl From<ErrorShape> for ApiError {
    fn from(shape: ErrorShape) -> Self {
        ApiError::Rpc {
            code: shape.data.code,
            message: shape.message,
            issues: shape.data.issues,
        }
    }
}
