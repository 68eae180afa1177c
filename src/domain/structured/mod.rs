//! Schema-constrained requests and the event-stream bridge

mod assembler;
mod bridge;
mod invoker;

use std::pin::Pin;

use futures::Stream;
use serde::Deserialize;

use crate::domain::schema::SchemaInstance;
use crate::domain::DomainError;

pub use assembler::PartialAssembler;
pub use bridge::{
    escape_payload, unescape_payload, BridgeOptions, Frame, FrameStream, StreamBridge,
    DEFAULT_PACING,
};
pub use invoker::{Invocation, InvokerOptions, StructuredInvoker, DEFAULT_MAX_RETRIES};

/// Lazy, finite sequence of partial instances; the last item is complete
pub type PartialStream = Pin<Box<dyn Stream<Item = Result<SchemaInstance, DomainError>> + Send>>;

/// How the schema is enforced on the provider side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// Schema sent as a forced function call; value read from its arguments
    #[default]
    Tools,
    /// Schema sent as a strict `json_schema` response format
    JsonSchema,
}
