//! HTTP request, response and error bodies

pub mod chat;
pub mod error;
pub mod json;

pub use chat::{PromptRequest, PromptResponse};
pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use json::Json;
