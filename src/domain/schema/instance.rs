use serde::Serialize;
use serde_json::{Map, Value};

/// A value that passed schema validation, possibly still incomplete
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaInstance {
    schema: String,
    #[serde(skip)]
    primary: String,
    values: Map<String, Value>,
    complete: bool,
}

impl SchemaInstance {
    pub(crate) fn new(
        schema: String,
        primary: String,
        values: Map<String, Value>,
        complete: bool,
    ) -> Self {
        Self {
            schema,
            primary,
            values,
            complete,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Field rendered as text: strings as-is, other values as JSON
    pub fn text(&self, field: &str) -> Option<String> {
        match self.values.get(field)? {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn primary_text(&self) -> Option<String> {
        self.text(&self.primary)
    }

    /// Same field values, ignoring completeness
    pub fn same_values(&self, other: &SchemaInstance) -> bool {
        self.values == other.values
    }
}
