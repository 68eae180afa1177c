//! Request logging with sensitive data redaction

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// OpenAI-style secret keys (`sk-...`, `sk-proj-...`)
static SECRET_KEY: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"sk-[A-Za-z0-9_\-]{8,}").ok());

/// Logs every request and echoes its request id on the response.
/// `TraceLayer` owns the span, so no span is opened here.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = extract_path(&request);
    let request_id = extract_request_id(&request);

    info!(
        method = %method,
        path = %path,
        request_id = %request_id,
        headers = %redact_headers(&request),
        "Incoming request"
    );

    let mut response = next.run(request).await;

    info!(
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        duration_ms = %start.elapsed().as_millis(),
        request_id = %request_id,
        "Request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

fn extract_path(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

fn extract_request_id(request: &Request<Body>) -> String {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

fn redact_headers(request: &Request<Body>) -> String {
    request
        .headers()
        .iter()
        .filter(|(name, _)| should_log_header(name.as_str()))
        .map(|(name, value)| {
            let value = if is_sensitive_header(name.as_str()) {
                "[REDACTED]"
            } else {
                value.to_str().unwrap_or("[invalid]")
            };
            format!("{}={}", name, value)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn is_sensitive_header(name: &str) -> bool {
    matches!(
        name,
        "authorization" | "x-api-key" | "cookie" | "proxy-authorization"
    )
}

fn should_log_header(name: &str) -> bool {
    matches!(
        name,
        "content-type"
            | "content-length"
            | "accept"
            | "user-agent"
            | "x-request-id"
            | "x-forwarded-for"
            | "authorization"
    )
}

/// Mask api keys embedded in text, e.g. provider error bodies
pub fn redact_secrets(text: &str) -> String {
    match SECRET_KEY.as_ref() {
        Some(re) => re.replace_all(text, "sk-[REDACTED]").into_owned(),
        None => text.to_string(),
    }
}

/// Truncate long strings for logging, respecting char boundaries
pub fn truncate_for_log(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}...[truncated {} bytes]", &s[..cut], s.len() - cut),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_sensitive_header() {
        assert!(is_sensitive_header("authorization"));
        assert!(is_sensitive_header("cookie"));
        assert!(!is_sensitive_header("content-type"));
    }

    #[test]
    fn test_redact_headers() {
        let request = Request::builder()
            .header("authorization", "Bearer sk-secret")
            .header("content-type", "application/json")
            .header("etag", "abc")
            .body(Body::empty())
            .unwrap();

        let logged = redact_headers(&request);
        assert!(logged.contains("authorization=[REDACTED]"));
        assert!(logged.contains("content-type=application/json"));
        assert!(!logged.contains("etag"));
    }

    #[test]
    fn test_redact_secrets() {
        let text = "Incorrect API key provided: sk-proj-AbCdEf123456. Check keys.yaml";
        let redacted = redact_secrets(text);

        assert_eq!(redacted, "Incorrect API key provided: sk-[REDACTED]. Check keys.yaml");
        assert_eq!(redact_secrets("task-list is fine"), "task-list is fine");
    }

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("hello", 10), "hello");

        let truncated = truncate_for_log("héllo wörld, a long prompt", 5);
        assert!(truncated.starts_with("héllo..."));
        assert!(truncated.contains("[truncated"));
    }
}
