use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Config file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Failed to parse config file {path}: {message}")]
    ConfigParse { path: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Authentication error: {message}")]
    Authentication { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Response did not match schema '{schema}' after {attempts} attempt(s): {message}")]
    SchemaValidation {
        schema: String,
        attempts: u32,
        message: String,
    },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn config_parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigParse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn schema_validation(
        schema: impl Into<String>,
        attempts: u32,
        message: impl Into<String>,
    ) -> Self {
        Self::SchemaValidation {
            schema: schema.into(),
            attempts,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_error() {
        let error = DomainError::config_not_found("./keys.yaml");
        assert_eq!(error.to_string(), "Config file not found: ./keys.yaml");
    }

    #[test]
    fn test_schema_validation_error() {
        let error = DomainError::schema_validation("code", 5, "missing field 'code'");
        assert_eq!(
            error.to_string(),
            "Response did not match schema 'code' after 5 attempt(s): missing field 'code'"
        );
        assert!(matches!(error, DomainError::SchemaValidation { attempts: 5, .. }));
    }

    #[test]
    fn test_authentication_error() {
        let error = DomainError::authentication("OpenAI api key missing");
        assert_eq!(error.to_string(), "Authentication error: OpenAI api key missing");
    }
}
