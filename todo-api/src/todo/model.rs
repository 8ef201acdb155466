//! Todo payload and stored record

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{TodoError, TodoResult};

/// Field holding the generated id in a stored record
pub const ID_FIELD: &str = "id";

/// User-supplied todo payload
///
/// Any JSON object is accepted; no further schema is enforced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Todo(pub Map<String, Value>);

impl Todo {
    /// Parses a request body into a todo, treating a missing body as `{}`
    ///
    /// # Errors
    ///
    /// Returns `TodoError::InvalidPayload` if the body is not a JSON object
    pub fn from_body(body: Option<&str>) -> TodoResult<Self> {
        let Some(body) = body else {
            return Ok(Self::default());
        };

        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(fields)) => Ok(Self(fields)),
            Ok(other) => Err(TodoError::InvalidPayload(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            ))),
            Err(e) => Err(TodoError::InvalidPayload(e.to_string())),
        }
    }
}

impl From<Map<String, Value>> for Todo {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Persisted envelope: the generated id merged with the todo fields
///
/// Serializes flat, e.g. `{"id": "...", "text": "buy milk"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoRecord {
    /// Generated id, assigned once at creation
    pub id: String,
    /// Payload fields
    #[serde(flatten)]
    pub todo: Map<String, Value>,
}

impl TodoRecord {
    /// Builds the record for a newly generated id
    ///
    /// A payload `id` field is dropped; the generated id always wins.
    #[must_use]
    pub fn new(id: String, todo: Todo) -> Self {
        let mut fields = todo.0;
        fields.remove(ID_FIELD);

        Self { id, todo: fields }
    }

    /// Object store key of the record with the given id
    #[must_use]
    pub fn storage_key_for(id: &str) -> String {
        format!("todos/{id}.json")
    }

    /// Object store key of this record
    #[must_use]
    pub fn storage_key(&self) -> String {
        Self::storage_key_for(&self.id)
    }

    /// Serialized body written to the object store
    ///
    /// # Errors
    ///
    /// Returns `TodoError::Parse` if serialization fails
    pub fn to_body(&self) -> TodoResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(TodoError::Parse)
    }

    /// Parses a whole stored object
    ///
    /// # Errors
    ///
    /// Returns `TodoError::Parse` if the bytes are not a valid UTF-8 JSON todo record
    pub fn from_object(body: &[u8]) -> TodoResult<Self> {
        serde_json::from_slice(body).map_err(TodoError::Parse)
    }

    /// Parses newline-delimited select output, returning the first record
    ///
    /// Output holding only whitespace yields `None`.
    ///
    /// # Errors
    ///
    /// Returns `TodoError::Parse` if the first record is not a valid UTF-8 JSON todo record
    pub fn from_select_output(output: &[u8]) -> TodoResult<Option<Self>> {
        serde_json::Deserializer::from_slice(output)
            .into_iter::<Self>()
            .next()
            .transpose()
            .map_err(TodoError::Parse)
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn todo(value: Value) -> Todo {
        match value {
            Value::Object(fields) => Todo(fields),
            _ => panic!("test payload must be an object"),
        }
    }

    #[test]
    fn test_record_serializes_flat() {
        let record = TodoRecord::new("abc".to_string(), todo(json!({ "text": "buy milk" })));

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({ "id": "abc", "text": "buy milk" })
        );
        assert_eq!(record.storage_key(), "todos/abc.json");
    }

    #[test]
    fn test_generated_id_wins_over_payload_id() {
        let record = TodoRecord::new(
            "generated".to_string(),
            todo(json!({ "id": "client", "text": "buy milk" })),
        );

        assert_eq!(record.id, "generated");
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({ "id": "generated", "text": "buy milk" })
        );
    }

    #[test]
    fn test_from_select_output_reads_first_record() {
        let output = b"{\"id\":\"abc\",\"done\":false}\n{\"id\":\"abc\",\"done\":true}\n";
        let record = TodoRecord::from_select_output(output).unwrap().unwrap();

        assert_eq!(record.id, "abc");
        assert_eq!(record.todo["done"], json!(false));
    }

    #[test]
    fn test_from_select_output_without_records() {
        assert_eq!(TodoRecord::from_select_output(b"").unwrap(), None);
        assert_eq!(TodoRecord::from_select_output(b" \n").unwrap(), None);
        assert!(matches!(
            TodoRecord::from_select_output(b"not json"),
            Err(TodoError::Parse(_))
        ));
        assert!(matches!(
            TodoRecord::from_select_output(b"{\"id\":\"bad\",\"text\":\"\xFF\"}\n"),
            Err(TodoError::Parse(_))
        ));
    }

    #[test]
    fn test_from_object_accepts_multi_line_json() {
        let body = b"{\n  \"id\": \"abc\",\n  \"text\": \"buy milk\"\n}\n";
        let record = TodoRecord::from_object(body).unwrap();

        assert_eq!(record.id, "abc");
        assert_eq!(record.todo["text"], json!("buy milk"));
    }

    #[test]
    fn test_from_object_rejects_invalid_content() {
        assert!(matches!(
            TodoRecord::from_object(b""),
            Err(TodoError::Parse(_))
        ));
        assert!(matches!(
            TodoRecord::from_object(b"{\"text\":\"no id\"}"),
            Err(TodoError::Parse(_))
        ));
        assert!(matches!(
            TodoRecord::from_object(b"{\"id\":\"bad\",\"text\":\"\xFF\"}"),
            Err(TodoError::Parse(_))
        ));
    }

    #[test]
    fn test_todo_from_body() {
        assert_eq!(Todo::from_body(None).unwrap(), Todo::default());
        assert_eq!(
            Todo::from_body(Some(r#"{"text":"buy milk"}"#)).unwrap(),
            todo(json!({ "text": "buy milk" }))
        );
        assert!(matches!(
            Todo::from_body(Some("[1,2]")),
            Err(TodoError::InvalidPayload(_))
        ));
        assert!(matches!(
            Todo::from_body(Some("{")),
            Err(TodoError::InvalidPayload(_))
        ));
    }
}
