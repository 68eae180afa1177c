//! Read-only key/value documents loaded from disk

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, FileFormat};
use serde::de::DeserializeOwned;

use crate::domain::DomainError;

/// Parsed configuration file addressed with dotted keys (`openai.key`)
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    path: PathBuf,
    inner: Config,
}

impl ConfigDocument {
    /// Load a YAML document (JSON and TOML are picked by extension)
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(DomainError::config_not_found(path.display().to_string()));
        }

        let inner = Config::builder()
            .add_source(config::File::from(path).format(format_for(path)))
            .build()
            .map_err(|e| DomainError::config_parse(path.display().to_string(), e.to_string()))?;

        Ok(Self {
            path: path.to_path_buf(),
            inner,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Value at `key`, `None` when absent
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, DomainError> {
        match self.inner.get::<T>(key) {
            Ok(value) => Ok(Some(value)),
            Err(ConfigError::NotFound(_)) => Ok(None),
            Err(e) => Err(DomainError::config_parse(
                self.path.display().to_string(),
                format!("{}: {}", key, e),
            )),
        }
    }

    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, DomainError> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.get::<config::Value>(key).is_ok()
    }

    /// Non-empty string at `key`
    pub fn require_str(&self, key: &str) -> Result<String, DomainError> {
        match self.get::<String>(key)? {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(DomainError::configuration(format!(
                "{} is missing '{}'",
                self.path.display(),
                key
            ))),
        }
    }
}

fn format_for(path: &Path) -> FileFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => FileFormat::Json,
        Some("toml") => FileFormat::Toml,
        _ => FileFormat::Yaml,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn yaml_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_nested_keys() {
        let file = yaml_file("openai:\n  key: X\nllm:\n  temperature: 0.5\n");
        let doc = ConfigDocument::load(file.path()).unwrap();

        assert_eq!(doc.get::<String>("openai.key").unwrap().as_deref(), Some("X"));
        assert_eq!(doc.get::<f32>("llm.temperature").unwrap(), Some(0.5));
        assert!(doc.contains("openai"));
        assert!(!doc.contains("anthropic"));
    }

    #[test]
    fn test_missing_file() {
        let err = ConfigDocument::load("/nonexistent/keys.yaml").unwrap_err();

        match err {
            DomainError::ConfigNotFound { path } => assert_eq!(path, "/nonexistent/keys.yaml"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unparsable_file() {
        let file = yaml_file("openai: [unclosed\n");
        let err = ConfigDocument::load(file.path()).unwrap_err();

        assert!(matches!(err, DomainError::ConfigParse { .. }));
    }

    #[test]
    fn test_defaults_and_type_errors() {
        let file = yaml_file("llm:\n  instructor_max_retries: many\n");
        let doc = ConfigDocument::load(file.path()).unwrap();

        assert_eq!(doc.get_or("llm.temperature", 1.0f32).unwrap(), 1.0);
        assert!(matches!(
            doc.get::<u32>("llm.instructor_max_retries"),
            Err(DomainError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_require_str() {
        let file = yaml_file("openai:\n  key: \"\"\n  org: acme\n");
        let doc = ConfigDocument::load(file.path()).unwrap();

        assert!(doc.require_str("openai.key").is_err());
        assert!(doc.require_str("openai.project").is_err());
        assert_eq!(doc.require_str("openai.org").unwrap(), "acme");
    }

    #[test]
    fn test_empty_document() {
        let file = yaml_file("");
        let doc = ConfigDocument::load(file.path()).unwrap();

        assert_eq!(doc.get::<String>("openai.key").unwrap(), None);
    }
}
