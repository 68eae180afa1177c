//! Response schemas, validated instances and partial JSON handling

mod definition;
mod instance;
mod partial_json;
mod registry;

pub use definition::{FieldKind, ResponseSchema, SchemaField, SchemaViolation};
pub use instance::SchemaInstance;
pub use partial_json::complete_partial_json;
pub use registry::{SchemaRegistry, ANSWER_SCHEMA, CODE_SCHEMA};
