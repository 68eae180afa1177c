//! API middleware components

pub mod logging;

pub use logging::{logging_middleware, redact_secrets, truncate_for_log};
