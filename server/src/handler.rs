use thiserror::Error;
use todo_core::{CreateTodoInput, CreateTodoOutput};

/// Failure raised inside a procedure. The message is logged on the server
/// and never sent to the caller.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct HandlerError(pub String);

/// Business logic behind the procedures. Runs only on validated input.
pub trait TodoHandler: Send + Sync + 'static {
    fn create_todo(&self, input: CreateTodoInput) -> Result<CreateTodoOutput, HandlerError>;
}

/// Logs the todo and answers with a fixed id. Nothing is stored.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderHandler;

impl TodoHandler for PlaceholderHandler {
    fn create_todo(&self, input: CreateTodoInput) -> Result<CreateTodoOutput, HandlerError> {
        tracing::info!(title = %input.title, description = %input.description, "creating todo");
        Ok(CreateTodoOutput { id: "1".to_string() })
    }
}
