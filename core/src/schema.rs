//! Structural validation of incoming procedure input.
//!
//! Validation walks the raw JSON instead of relying on a failed
//! `serde::Deserialize`, so every failing field is reported at once with a
//! path the caller can act on. Keys not named by the schema are ignored.

use serde_json::{Map, Value};

use crate::envelope::Issue;
use crate::types::CreateTodoInput;

/// Name of a JSON value's type as it appears in issue messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Check `input` against `{ title: string, description: string }`.
///
/// `None` means the call carried no input at all.
pub fn validate_create_todo(input: Option<&Value>) -> Result<CreateTodoInput, Vec<Issue>> {
    let object = expect_object(input)?;

    let mut issues = Vec::new();
    let title = required_string(object, "title", &mut issues);
    let description = required_string(object, "description", &mut issues);

    match (title, description) {
        (Some(title), Some(description)) => Ok(CreateTodoInput { title, description }),
        _ => Err(issues),
    }
}

fn expect_object(input: Option<&Value>) -> Result<&Map<String, Value>, Vec<Issue>> {
    match input {
        None => Err(vec![Issue::new(&[], "Required")]),
        Some(Value::Object(object)) => Ok(object),
        Some(other) => Err(vec![Issue::new(
            &[],
            format!("Expected object, received {}", json_type_name(other)),
        )]),
    }
}

fn required_string(
    object: &Map<String, Value>,
    field: &str,
    issues: &mut Vec<Issue>,
) -> Option<String> {
    match object.get(field) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            issues.push(Issue::new(
                &[field],
                format!("Expected string, received {}", json_type_name(other)),
            ));
            None
        }
        None => {
            issues.push(Issue::new(&[field], "Required"));
            None
        }
    }
}
