use std::sync::Arc;
use std::time::Duration;

use super::http_client::HttpClient;
use super::openai::{OpenAiProvider, DEFAULT_OPENAI_BASE_URL};
use crate::domain::{DomainError, LlmProvider};

/// Builds a provider client for one request from its api key
pub trait ClientFactory: Send + Sync + std::fmt::Debug {
    fn build(&self, api_key: &str) -> Result<Arc<dyn LlmProvider>, DomainError>;
}

/// Factory for OpenAI-compatible providers
#[derive(Debug, Clone)]
pub struct OpenAiClientFactory {
    base_url: String,
    timeout: Option<Duration>,
}

impl OpenAiClientFactory {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for OpenAiClientFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientFactory for OpenAiClientFactory {
    fn build(&self, api_key: &str) -> Result<Arc<dyn LlmProvider>, DomainError> {
        if api_key.trim().is_empty() {
            return Err(DomainError::authentication("OpenAI api key is empty"));
        }

        let http_client = match self.timeout {
            Some(timeout) => HttpClient::with_timeout(timeout)?,
            None => HttpClient::new(),
        };

        Ok(Arc::new(OpenAiProvider::with_base_url(
            http_client,
            api_key,
            self.base_url.as_str(),
        )))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_openai_provider() {
        let provider = OpenAiClientFactory::new().build("sk-test").unwrap();
        assert_eq!(provider.provider_name(), "openai");
    }

    #[test]
    fn test_build_with_timeout_and_base_url() {
        let factory = OpenAiClientFactory::new()
            .with_base_url("http://localhost:8080")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(factory.base_url(), "http://localhost:8080");
        assert!(factory.build("sk-test").is_ok());
    }

    #[test]
    fn test_empty_key_is_rejected() {
        let result = OpenAiClientFactory::new().build("  ");
        assert!(matches!(result, Err(DomainError::Authentication { .. })));
    }
}
