//! Response schema definitions and validation
//!
//! A [`ResponseSchema`] is the structural contract a model reply must meet.
//! It is validated in two flavours:
//! - `validate` for a finished reply: every required field present, all types match
//! - `validate_partial` for an in-progress reply: fields may be missing or `null`,
//!   but any field that is present must already have the right type

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

use super::SchemaInstance;

/// Type of a single schema field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
    Array(Box<FieldKind>),
}

impl FieldKind {
    fn json_type(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array(_) => "array",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::String, Value::String(_)) => true,
            (Self::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (Self::Number, Value::Number(_)) => true,
            (Self::Boolean, Value::Bool(_)) => true,
            (Self::Array(item), Value::Array(values)) => values.iter().all(|v| item.matches(v)),
            _ => false,
        }
    }

    fn to_json_schema(&self) -> Value {
        match self {
            Self::Array(item) => json!({ "type": "array", "items": item.to_json_schema() }),
            other => json!({ "type": other.json_type() }),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array(item) => write!(f, "array<{}>", item),
            other => write!(f, "{}", other.json_type()),
        }
    }
}

/// A named, typed field of a response schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

impl SchemaField {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            required: true,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// Reasons a value does not conform to a schema
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaViolation {
    #[error("response is not valid JSON: {message}")]
    InvalidJson { message: String },

    #[error("model did not call the '{name}' tool")]
    NoToolCall { name: String },

    #[error("expected a JSON object, found {found}")]
    NotAnObject { found: String },

    #[error("missing required field '{field}'")]
    MissingField { field: String },

    #[error("field '{field}' should be {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },
}

/// Structural contract the model output must conform to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSchema {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    fields: Vec<SchemaField>,
    /// Field streamed to clients; defaults to the first field
    #[serde(skip_serializing_if = "Option::is_none")]
    primary: Option<String>,
}

impl ResponseSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
            primary: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: SchemaField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn primary(mut self, field: impl Into<String>) -> Self {
        self.primary = Some(field.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    pub fn primary_field(&self) -> &str {
        self.primary
            .as_deref()
            .or_else(|| self.fields.first().map(|f| f.name.as_str()))
            .unwrap_or_default()
    }

    /// Render as a JSON Schema object.
    ///
    /// Every property is listed as required so the output is accepted by strict
    /// structured-output endpoints; optional fields become nullable instead.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();

        for field in &self.fields {
            let mut property = field.kind.to_json_schema();
            if !field.required {
                property["type"] = json!([field.kind.json_type(), "null"]);
            }
            if let Some(description) = &field.description {
                property["description"] = json!(description);
            }
            properties.insert(field.name.clone(), property);
        }

        let required: Vec<&str> = self.fields.iter().map(|f| f.name.as_str()).collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }

    /// Validate a finished value
    pub fn validate(&self, value: &Value) -> Result<SchemaInstance, SchemaViolation> {
        self.check(value, true)
    }

    /// Validate an in-progress value
    pub fn validate_partial(&self, value: &Value) -> Result<SchemaInstance, SchemaViolation> {
        self.check(value, false)
    }

    /// Parse raw model output and validate it as a finished value
    pub fn validate_text(&self, text: &str) -> Result<SchemaInstance, SchemaViolation> {
        let value: Value = serde_json::from_str(text.trim()).map_err(|e| {
            SchemaViolation::InvalidJson {
                message: e.to_string(),
            }
        })?;

        self.validate(&value)
    }

    fn check(&self, value: &Value, complete: bool) -> Result<SchemaInstance, SchemaViolation> {
        let object = value.as_object().ok_or_else(|| SchemaViolation::NotAnObject {
            found: describe(value).to_string(),
        })?;

        let mut values = Map::new();

        for field in &self.fields {
            match object.get(&field.name) {
                None | Some(Value::Null) => {
                    if complete && field.required {
                        return Err(SchemaViolation::MissingField {
                            field: field.name.clone(),
                        });
                    }
                }
                Some(v) if field.kind.matches(v) => {
                    values.insert(field.name.clone(), v.clone());
                }
                Some(v) => {
                    return Err(SchemaViolation::TypeMismatch {
                        field: field.name.clone(),
                        expected: field.kind.to_string(),
                        found: describe(v).to_string(),
                    });
                }
            }
        }

        Ok(SchemaInstance::new(
            self.name.clone(),
            self.primary_field().to_string(),
            values,
            complete,
        ))
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
