use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{ExtractionMode, PartialAssembler, PartialStream};
use crate::domain::llm::{
    LlmJsonSchema, LlmProvider, LlmRequest, LlmResponse, LlmResponseFormat, Message,
};
use crate::domain::schema::{ResponseSchema, SchemaInstance, SchemaViolation};
use crate::domain::DomainError;

/// Default number of attempts when the output does not match the schema
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Per-call generation options
#[derive(Debug, Clone, PartialEq)]
pub struct InvokerOptions {
    pub max_retries: u32,
    pub temperature: Option<f32>,
    pub mode: ExtractionMode,
}

impl Default for InvokerOptions {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            temperature: None,
            mode: ExtractionMode::default(),
        }
    }
}

/// Result of a structured call
pub enum Invocation {
    Complete(SchemaInstance),
    Streaming(PartialStream),
}

impl std::fmt::Debug for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Complete(instance) => f.debug_tuple("Complete").field(instance).finish(),
            Self::Streaming(_) => f.write_str("Streaming(..)"),
        }
    }
}

/// Sends schema-constrained chat requests and validates the replies
#[derive(Debug, Clone)]
pub struct StructuredInvoker {
    provider: Arc<dyn LlmProvider>,
    options: InvokerOptions,
}

impl StructuredInvoker {
    pub fn new(provider: Arc<dyn LlmProvider>, options: InvokerOptions) -> Self {
        Self { provider, options }
    }

    pub fn options(&self) -> &InvokerOptions {
        &self.options
    }

    /// Blocking or streaming call depending on `stream`
    pub async fn invoke(
        &self,
        model: &str,
        messages: Vec<Message>,
        schema: Arc<ResponseSchema>,
        stream: bool,
    ) -> Result<Invocation, DomainError> {
        if stream {
            self.create_partial(model, messages, schema)
                .await
                .map(Invocation::Streaming)
        } else {
            self.create(model, messages, &schema)
                .await
                .map(Invocation::Complete)
        }
    }

    /// Request a complete instance, re-sending the same messages while the
    /// output fails validation
    pub async fn create(
        &self,
        model: &str,
        messages: Vec<Message>,
        schema: &ResponseSchema,
    ) -> Result<SchemaInstance, DomainError> {
        validate_input(model, &messages)?;

        let request = self.build_request(messages, schema, false);
        let attempts = self.options.max_retries.max(1);
        let mut last_violation: Option<SchemaViolation> = None;

        for attempt in 1..=attempts {
            let response = self.provider.chat(model, request.clone()).await?;

            match self.extract(&response, schema) {
                Ok(instance) => {
                    info!(
                        model = %model,
                        schema = %schema.name(),
                        attempt,
                        total_tokens = response.usage.as_ref().map_or(0, |u| u.total_tokens),
                        "Structured response validated"
                    );
                    return Ok(instance);
                }
                Err(violation) => {
                    warn!(
                        model = %model,
                        schema = %schema.name(),
                        attempt,
                        max_attempts = attempts,
                        error = %violation,
                        "Model output failed schema validation"
                    );
                    last_violation = Some(violation);
                }
            }
        }

        Err(DomainError::schema_validation(
            schema.name(),
            attempts,
            last_violation
                .map(|v| v.to_string())
                .unwrap_or_default(),
        ))
    }

    /// Open a stream of partial instances ending with the complete one
    pub async fn create_partial(
        &self,
        model: &str,
        messages: Vec<Message>,
        schema: Arc<ResponseSchema>,
    ) -> Result<PartialStream, DomainError> {
        validate_input(model, &messages)?;

        let request = self.build_request(messages, &schema, true);
        let upstream = self.provider.chat_stream(model, request).await?;

        debug!(model = %model, schema = %schema.name(), "Partial stream opened");

        Ok(PartialAssembler::new(schema, self.options.mode).into_stream(upstream))
    }

    fn build_request(
        &self,
        messages: Vec<Message>,
        schema: &ResponseSchema,
        stream: bool,
    ) -> LlmRequest {
        let json_schema = LlmJsonSchema {
            name: schema.name().to_string(),
            description: schema.description().map(str::to_string),
            schema: schema.to_json_schema(),
            strict: true,
        };

        let mut builder = LlmRequest::builder().messages(messages).stream(stream);

        if let Some(temperature) = self.options.temperature {
            builder = builder.temperature(temperature);
        }

        builder = match self.options.mode {
            ExtractionMode::Tools => builder.forced_tool(json_schema),
            ExtractionMode::JsonSchema => {
                builder.response_format(LlmResponseFormat::JsonSchema { json_schema })
            }
        };

        builder.build()
    }

    fn extract(
        &self,
        response: &LlmResponse,
        schema: &ResponseSchema,
    ) -> Result<SchemaInstance, SchemaViolation> {
        let text = match self.options.mode {
            ExtractionMode::Tools => response.tool_arguments(schema.name()).ok_or_else(|| {
                SchemaViolation::NoToolCall {
                    name: schema.name().to_string(),
                }
            })?,
            ExtractionMode::JsonSchema => response.content(),
        };

        schema.validate_text(text)
    }
}

fn validate_input(model: &str, messages: &[Message]) -> Result<(), DomainError> {
    if model.trim().is_empty() {
        return Err(DomainError::validation("Model identifier cannot be empty"));
    }

    if messages.is_empty() {
        return Err(DomainError::validation("Messages cannot be empty"));
    }

    Ok(())
}
