//! Service configuration and per-request settings files

mod app_config;
mod document;
mod settings;

pub use app_config::{
    AppConfig, FilesConfig, LogFormat, LoggingConfig, ModelConfig, ServerConfig, StreamingConfig,
    CONFIG_DIR,
};
pub use document::ConfigDocument;
pub use settings::{ConfigFiles, Credentials, LlmParameters, RequestSettings, DEFAULT_TEMPERATURE};
