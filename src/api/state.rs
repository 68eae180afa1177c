//! Application state shared by the handlers
//!
//! Holds only immutable configuration and the client factory. Credentials and
//! parameters are re-read for every request.

use std::sync::Arc;

use crate::config::{ConfigFiles, ModelConfig, RequestSettings, StreamingConfig};
use crate::domain::schema::{ResponseSchema, SchemaRegistry};
use crate::domain::structured::{StreamBridge, StructuredInvoker};
use crate::domain::{DomainError, Message};
use crate::infrastructure::llm::ClientFactory;

#[derive(Clone)]
pub struct AppState {
    pub files: ConfigFiles,
    pub model: ModelConfig,
    pub schema: Arc<ResponseSchema>,
    pub bridge: StreamBridge,
    pub client_factory: Arc<dyn ClientFactory>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("files", &self.files)
            .field("model", &self.model.id)
            .field("schema", &self.schema.name())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Resolve the configured schema and check the streamed field exists
    pub fn new(
        files: ConfigFiles,
        model: ModelConfig,
        streaming: &StreamingConfig,
        registry: &SchemaRegistry,
        client_factory: Arc<dyn ClientFactory>,
    ) -> Result<Self, DomainError> {
        let schema = registry.get(&model.schema)?;

        if let Some(field) = &streaming.field {
            if !schema.has_field(field) {
                return Err(DomainError::configuration(format!(
                    "Streaming field '{}' is not part of schema '{}'",
                    field,
                    schema.name()
                )));
            }
        }

        Ok(Self {
            files,
            model,
            schema,
            bridge: StreamBridge::new(streaming.bridge_options()),
            client_factory,
        })
    }

    /// Conversation sent for one user prompt
    pub fn messages(&self, prompt: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(2);
        if !self.model.system_prompt.trim().is_empty() {
            messages.push(Message::system(self.model.system_prompt.as_str()));
        }
        messages.push(Message::user(prompt));
        messages
    }

    /// Load this request's settings and build an invoker around a fresh client
    pub async fn invoker(&self) -> Result<StructuredInvoker, DomainError> {
        let files = self.files.clone();
        let settings = tokio::task::spawn_blocking(move || RequestSettings::load(&files))
            .await
            .map_err(|e| DomainError::internal(format!("Settings loader failed: {}", e)))??;
        let provider = self.client_factory.build(settings.api_key()?)?;

        Ok(StructuredInvoker::new(
            provider,
            settings.parameters.invoker_options(self.model.mode),
        ))
    }
}
