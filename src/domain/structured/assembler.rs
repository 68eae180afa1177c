use std::sync::Arc;

use futures::{stream, StreamExt};

use super::{ExtractionMode, PartialStream};
use crate::domain::llm::{LlmStream, StreamChunk};
use crate::domain::schema::{complete_partial_json, ResponseSchema, SchemaInstance};
use crate::domain::DomainError;

/// Accumulates streamed fragments into successive partial instances
#[derive(Debug)]
pub struct PartialAssembler {
    schema: Arc<ResponseSchema>,
    mode: ExtractionMode,
    buffer: String,
    last: Option<SchemaInstance>,
}

impl PartialAssembler {
    pub fn new(schema: Arc<ResponseSchema>, mode: ExtractionMode) -> Self {
        Self {
            schema,
            mode,
            buffer: String::new(),
            last: None,
        }
    }

    /// Feed one chunk. Yields an instance only when the visible value changed.
    pub fn push(&mut self, chunk: &StreamChunk) -> Result<Option<SchemaInstance>, DomainError> {
        let fragment = match self.mode {
            ExtractionMode::Tools => chunk.tool_delta.as_deref(),
            ExtractionMode::JsonSchema => chunk.delta.as_deref(),
        };

        let Some(fragment) = fragment.filter(|f| !f.is_empty()) else {
            return Ok(None);
        };
        self.buffer.push_str(fragment);

        let Some(value) = complete_partial_json(&self.buffer) else {
            return Ok(None);
        };

        let instance = self.schema.validate_partial(&value).map_err(|violation| {
            DomainError::schema_validation(
                self.schema.name(),
                1,
                format!("malformed partial response: {}", violation),
            )
        })?;

        if self
            .last
            .as_ref()
            .is_some_and(|last| last.same_values(&instance))
        {
            return Ok(None);
        }

        self.last = Some(instance.clone());
        Ok(Some(instance))
    }

    /// Validate the accumulated text as a finished value
    pub fn finish(&self) -> Result<SchemaInstance, DomainError> {
        self.schema
            .validate_text(&self.buffer)
            .map_err(|violation| {
                DomainError::schema_validation(self.schema.name(), 1, violation.to_string())
            })
    }

    /// Drive a provider stream, ending with the complete instance
    pub fn into_stream(self, upstream: LlmStream) -> PartialStream {
        let partials = stream::unfold(Some((upstream, self)), |state| async move {
            let (mut upstream, mut assembler) = state?;

            loop {
                match upstream.next().await {
                    Some(Ok(chunk)) => match assembler.push(&chunk) {
                        Ok(Some(instance)) => {
                            return Some((Ok(instance), Some((upstream, assembler))));
                        }
                        Ok(None) => continue,
                        Err(e) => return Some((Err(e), None)),
                    },
                    Some(Err(e)) => return Some((Err(e), None)),
                    None => return Some((assembler.finish(), None)),
                }
            }
        });

        Box::pin(partials)
    }
}
