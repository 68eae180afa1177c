//! Request and response bodies of the prompt endpoints

use serde::{Deserialize, Serialize};

/// Body of `POST /` and `POST /stream`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptRequest {
    pub message: String,
}

/// Body of a successful `POST /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptResponse {
    pub response: String,
}
