//! Payload DTOs for the `createTodo` procedure.
//!
//! # Design
//! Both the server and the client depend on these definitions, so the shape
//! the client encodes is exactly the shape the server validates. Neither type
//! outlives a single request.

use serde::{Deserialize, Serialize};

/// Input of `createTodo`. Both fields are required strings; emptiness is not
/// checked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTodoInput {
    pub title: String,
    pub description: String,
}

/// Output of `createTodo`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTodoOutput {
    pub id: String,
}
