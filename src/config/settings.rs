//! Per-request credentials and generation parameters
//!
//! Both files are read on every request so edits apply without a restart.

use std::path::PathBuf;

use super::app_config::FilesConfig;
use super::document::ConfigDocument;
use crate::domain::structured::{ExtractionMode, InvokerOptions, DEFAULT_MAX_RETRIES};
use crate::domain::DomainError;

pub const DEFAULT_TEMPERATURE: f32 = 1.0;

const OPENAI_BLOCK: &str = "openai";
const OPENAI_KEY: &str = "openai.key";
const MAX_RETRIES_KEY: &str = "llm.instructor_max_retries";
const TEMPERATURE_KEY: &str = "llm.temperature";

/// Paths of the credential and parameter documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFiles {
    pub credentials: PathBuf,
    pub parameters: PathBuf,
}

impl From<&FilesConfig> for ConfigFiles {
    fn from(files: &FilesConfig) -> Self {
        Self {
            credentials: files.credentials.clone(),
            parameters: files.parameters.clone(),
        }
    }
}

/// Provider credentials
#[derive(Clone)]
pub struct Credentials {
    source: PathBuf,
    has_openai_block: bool,
    openai_key: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("source", &self.source)
            .field("openai_key", &self.openai_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Credentials {
    pub fn from_document(doc: &ConfigDocument) -> Result<Self, DomainError> {
        Ok(Self {
            source: doc.path().to_path_buf(),
            has_openai_block: doc.contains(OPENAI_BLOCK),
            openai_key: doc.get::<String>(OPENAI_KEY)?,
        })
    }

    /// OpenAI api key; an absent `openai` block or empty key is an
    /// authentication failure
    pub fn openai_key(&self) -> Result<&str, DomainError> {
        match self.openai_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ if !self.has_openai_block => Err(DomainError::authentication(format!(
                "OpenAI api key not configured: add an 'openai' block with a 'key' to {}",
                self.source.display()
            ))),
            _ => Err(DomainError::authentication(format!(
                "OpenAI api key not configured: 'openai.key' is empty in {}",
                self.source.display()
            ))),
        }
    }
}

/// Generation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct LlmParameters {
    pub max_retries: u32,
    pub temperature: f32,
}

impl Default for LlmParameters {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl LlmParameters {
    pub fn from_document(doc: &ConfigDocument) -> Result<Self, DomainError> {
        Ok(Self {
            max_retries: doc.get_or(MAX_RETRIES_KEY, DEFAULT_MAX_RETRIES)?,
            temperature: doc.get_or(TEMPERATURE_KEY, DEFAULT_TEMPERATURE)?,
        })
    }

    pub fn invoker_options(&self, mode: ExtractionMode) -> InvokerOptions {
        InvokerOptions {
            max_retries: self.max_retries,
            temperature: Some(self.temperature),
            mode,
        }
    }
}

/// Everything one request needs from disk
#[derive(Debug, Clone)]
pub struct RequestSettings {
    pub credentials: Credentials,
    pub parameters: LlmParameters,
}

impl RequestSettings {
    /// Read credentials first and fail on a missing key before the
    /// parameters file is touched
    pub fn load(files: &ConfigFiles) -> Result<Self, DomainError> {
        let credentials = Credentials::from_document(&ConfigDocument::load(&files.credentials)?)?;
        credentials.openai_key()?;

        let parameters = LlmParameters::from_document(&ConfigDocument::load(&files.parameters)?)?;

        Ok(Self {
            credentials,
            parameters,
        })
    }

    pub fn api_key(&self) -> Result<&str, DomainError> {
        self.credentials.openai_key()
    }
}
