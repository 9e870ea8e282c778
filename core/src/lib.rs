//! Shared contract and synchronous client core for the `createTodo` RPC.
//!
//! # Overview
//! Defines the payload types, the procedure table, the JSON envelopes on the
//! wire and the input schema check the server runs. `TodoClient` builds
//! `HttpRequest` values and parses `HttpResponse` values without touching the
//! network (host-does-IO pattern).
//!
//! # Design
//! - `TodoClient` is stateless; it holds only `base_url`.
//! - Each call is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit.
//! - The server crate depends on this crate for the same types and envelopes,
//!   so both ends agree on the wire format by construction.

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod procedure;
pub mod schema;
pub mod types;

pub use client::TodoClient;
pub use envelope::{Envelope, ErrorCode, ErrorShape, Issue};
pub use error::{ApiError, ErrorKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use procedure::{ProcedureDef, ProcedureKind, CREATE_TODO};
pub use types::{CreateTodoInput, CreateTodoOutput};
