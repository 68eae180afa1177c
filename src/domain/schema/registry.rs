use std::collections::HashMap;
use std::sync::Arc;

use super::{ResponseSchema, SchemaField};
use crate::domain::DomainError;

/// Name of the built-in code generation schema
pub const CODE_SCHEMA: &str = "code";

/// Name of the built-in free-text answer schema
pub const ANSWER_SCHEMA: &str = "answer";

/// Lookup of response schemas by name
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Arc<ResponseSchema>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the `code` and `answer` schemas
    pub fn with_builtins() -> Self {
        Self::new()
            .with_schema(
                ResponseSchema::new(CODE_SCHEMA)
                    .with_description("Source code answering the user's request")
                    .field(
                        SchemaField::string("code")
                            .with_description("The complete source code, without markdown fences"),
                    ),
            )
            .with_schema(
                ResponseSchema::new(ANSWER_SCHEMA)
                    .with_description("Plain text answer to the user's message")
                    .field(SchemaField::string("response").with_description("The answer")),
            )
    }

    pub fn with_schema(mut self, schema: ResponseSchema) -> Self {
        self.register(schema);
        self
    }

    pub fn register(&mut self, schema: ResponseSchema) {
        self.schemas
            .insert(schema.name().to_string(), Arc::new(schema));
    }

    pub fn get(&self, name: &str) -> Result<Arc<ResponseSchema>, DomainError> {
        self.schemas.get(name).cloned().ok_or_else(|| {
            DomainError::configuration(format!(
                "Unknown response schema '{}' (available: {})",
                name,
                self.names().join(", ")
            ))
        })
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
