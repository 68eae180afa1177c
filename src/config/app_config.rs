use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::domain::structured::{BridgeOptions, ExtractionMode, DEFAULT_PACING};
use crate::domain::schema::CODE_SCHEMA;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub files: FilesConfig,
    pub model: ModelConfig,
    pub streaming: StreamingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Locations of the per-request credential and parameter documents
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub credentials: PathBuf,
    pub parameters: PathBuf,
}

/// Prompt profile used for every request
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub id: String,
    pub mode: ExtractionMode,
    /// Registered response schema name
    pub schema: String,
    pub system_prompt: String,
    /// Override for OpenAI-compatible endpoints
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    pub pacing_ms: u64,
    pub done_marker: Option<String>,
    /// Field emitted per frame; the schema's primary field when unset
    pub field: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            credentials: PathBuf::from("keys.yaml"),
            parameters: PathBuf::from("config.yaml"),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            id: "gpt-4o".to_string(),
            mode: ExtractionMode::default(),
            schema: CODE_SCHEMA.to_string(),
            system_prompt: "You are a coding assistant. Answer with the requested source code only."
                .to_string(),
            base_url: None,
            timeout_secs: None,
        }
    }
}

impl ModelConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            pacing_ms: DEFAULT_PACING.as_millis() as u64,
            done_marker: None,
            field: None,
        }
    }
}

impl StreamingConfig {
    pub fn bridge_options(&self) -> BridgeOptions {
        BridgeOptions {
            field: self.field.clone(),
            pacing: Duration::from_millis(self.pacing_ms),
            done_marker: self.done_marker.clone(),
        }
    }
}

/// Directory holding `default.*` and `local.*`
pub const CONFIG_DIR: &str = "config";

impl AppConfig {
    /// Layer `<dir>/default`, `<dir>/local` and `APP__*` variables; files
    /// may be absent but must parse when present
    pub fn load_from(dir: &Path) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(dir.join("default")).required(false))
            .add_source(config::File::from(dir.join("local")).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.files.credentials, PathBuf::from("keys.yaml"));
        assert_eq!(config.files.parameters, PathBuf::from("config.yaml"));
        assert_eq!(config.model.schema, CODE_SCHEMA);
        assert_eq!(config.model.mode, ExtractionMode::Tools);
        assert_eq!(config.streaming.bridge_options(), BridgeOptions::default());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "[server]\nport = 9000\n[model]\nmode = \"json_schema\"\n[streaming]\npacing_ms = 5\ndone_marker = \"[DONE]\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.model.mode, ExtractionMode::JsonSchema);
        assert_eq!(config.model.id, "gpt-4o");

        let bridge = config.streaming.bridge_options();
        assert_eq!(bridge.pacing, Duration::from_millis(5));
        assert_eq!(bridge.done_marker.as_deref(), Some("[DONE]"));
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            "[model]\nid = \"gpt-4o-mini\"\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("local.toml"), "[server]\nport = 9100\n").unwrap();

        let config = AppConfig::load_from(dir.path()).unwrap();

        assert_eq!(config.model.id, "gpt-4o-mini");
        assert_eq!(config.server.port, 9100);
    }

    #[test]
    fn test_missing_directory_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();

        let config = AppConfig::load_from(&dir.path().join("absent")).unwrap();

        assert_eq!(config.model.id, "gpt-4o");
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            "[model]\nid = \"gpt-4o-mini\"\nmode = \"toolz\"\n",
        )
        .unwrap();

        assert!(AppConfig::load_from(dir.path()).is_err());
    }
}
