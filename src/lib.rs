//! Schema Chat Gateway
//!
//! Forwards a prompt to an OpenAI-compatible chat API, requires the reply to
//! match a response schema and either returns the validated value or streams
//! it to the caller as server-sent events while it is being generated.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use config::ConfigFiles;
use domain::schema::SchemaRegistry;
use infrastructure::llm::OpenAiClientFactory;
use tracing::info;

/// Create the application state from configuration
pub fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let mut factory = OpenAiClientFactory::new();

    if let Some(base_url) = &config.model.base_url {
        factory = factory.with_base_url(base_url.as_str());
    }

    if let Some(timeout) = config.model.timeout() {
        factory = factory.with_timeout(timeout);
    }

    let state = AppState::new(
        ConfigFiles::from(&config.files),
        config.model.clone(),
        &config.streaming,
        &SchemaRegistry::with_builtins(),
        Arc::new(factory),
    )?;

    info!(
        model = %config.model.id,
        schema = %state.schema.name(),
        mode = ?config.model.mode,
        credentials = %config.files.credentials.display(),
        parameters = %config.files.parameters.display(),
        "Application state initialized"
    );

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_app_state_with_defaults() {
        let state = create_app_state(&AppConfig::default()).unwrap();

        assert_eq!(state.schema.name(), "code");
        assert_eq!(state.model.id, "gpt-4o");
    }

    #[test]
    fn test_unknown_schema_fails() {
        let mut config = AppConfig::default();
        config.model.schema = "poem".to_string();

        let err = create_app_state(&config).unwrap_err();
        assert!(err.to_string().contains("poem"));
    }
}
