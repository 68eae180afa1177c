//! Domain layer - Core business logic and entities

pub mod error;
pub mod llm;
pub mod schema;
pub mod structured;

pub use error::DomainError;
pub use llm::{
    FinishReason, LlmProvider, LlmRequest, LlmRequestBuilder, LlmResponse, LlmStream, Message,
    MessageRole, StreamChunk, ToolCall, Usage,
};
pub use schema::{
    complete_partial_json, FieldKind, ResponseSchema, SchemaField, SchemaInstance,
    SchemaRegistry, SchemaViolation,
};
pub use structured::{
    BridgeOptions, ExtractionMode, Frame, Invocation, InvokerOptions, PartialStream,
    StreamBridge, StructuredInvoker,
};
