//! LLM provider implementations

mod factory;
mod http_client;
mod openai;

pub use factory::{ClientFactory, OpenAiClientFactory};
pub use http_client::{ByteStream, HttpClient, HttpClientTrait};
pub use openai::{OpenAiProvider, DEFAULT_OPENAI_BASE_URL};

#[cfg(test)]
pub use factory::mock::StaticClientFactory;
