//! LLM provider domain models and traits

mod message;
mod provider;
mod request;
mod response;

pub use message::{Message, MessageRole};
pub use provider::{LlmProvider, LlmStream};
pub use request::{LlmJsonSchema, LlmRequest, LlmRequestBuilder, LlmResponseFormat, LlmToolChoice};
pub use response::{FinishReason, LlmResponse, StreamChunk, ToolCall, Usage};

#[cfg(test)]
pub use provider::mock::MockLlmProvider;
