use async_trait::async_trait;
use eventsource_stream::{EventStreamError, Eventsource};
use futures::{future, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::http_client::{ByteStream, HttpClientTrait};
use crate::domain::llm::{LlmJsonSchema, LlmResponseFormat};
use crate::domain::{
    DomainError, FinishReason, LlmProvider, LlmRequest, LlmResponse, LlmStream, Message,
    StreamChunk, ToolCall, Usage,
};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

const DONE_SENTINEL: &str = "[DONE]";

/// OpenAI chat-completions provider
#[derive(Debug)]
pub struct OpenAiProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
}

impl<C: HttpClientTrait> OpenAiProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let auth_header = format!("Bearer {}", api_key.into());
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            auth_header,
            base_url,
        }
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn build_request(&self, model: &str, request: &LlmRequest) -> serde_json::Value {
        let messages: Vec<OpenAiMessage> =
            request.messages.iter().map(OpenAiMessage::from_domain).collect();

        let mut body = serde_json::json!({
            "model": model,
            "messages": messages,
            "stream": request.stream,
        });

        if let Some(temp) = request.temperature {
            body["temperature"] = serde_json::json!(temp);
        }

        if let Some(LlmResponseFormat::JsonSchema { ref json_schema }) = request.response_format {
            body["response_format"] = serde_json::json!({
                "type": "json_schema",
                "json_schema": {
                    "name": json_schema.name,
                    "strict": json_schema.strict,
                    "schema": json_schema.schema
                }
            });
        }

        // A single function tool the model must call
        if let Some(ref tool) = request.tool {
            body["tools"] = serde_json::json!([function_tool(&tool.function)]);
            body["tool_choice"] = serde_json::json!({
                "type": "function",
                "function": { "name": tool.function.name }
            });
        }

        body
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<LlmResponse, DomainError> {
        let response: OpenAiResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("openai", format!("Failed to parse response: {}", e))
        })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::provider("openai", "No choices in response"))?;

        let message = Message::assistant(choice.message.content.unwrap_or_default());
        let mut llm_response = LlmResponse::new(response.id, response.model, message);

        for call in choice.message.tool_calls {
            llm_response = llm_response.with_tool_call(ToolCall {
                id: call.id,
                name: call.function.name,
                arguments: call.function.arguments,
            });
        }

        if let Some(reason) = choice.finish_reason {
            llm_response = llm_response.with_finish_reason(parse_finish_reason(&reason));
        }

        if let Some(usage) = response.usage {
            llm_response =
                llm_response.with_usage(Usage::new(usage.prompt_tokens, usage.completion_tokens));
        }

        Ok(llm_response)
    }
}

fn function_tool(schema: &LlmJsonSchema) -> serde_json::Value {
    let mut function = serde_json::json!({
        "name": schema.name,
        "parameters": schema.schema,
        "strict": schema.strict,
    });

    if let Some(ref description) = schema.description {
        function["description"] = serde_json::json!(description);
    }

    serde_json::json!({ "type": "function", "function": function })
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for OpenAiProvider<C> {
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
        let mut req = request;
        req.stream = false;

        let url = self.chat_completions_url();
        let body = self.build_request(model, &req);
        let response = self.client.post_json(&url, self.headers(), &body).await?;

        self.parse_response(response)
    }

    async fn chat_stream(
        &self,
        model: &str,
        request: LlmRequest,
    ) -> Result<LlmStream, DomainError> {
        let mut req = request;
        req.stream = true;

        let url = self.chat_completions_url();
        let body = self.build_request(model, &req);
        let byte_stream = self
            .client
            .post_json_stream(&url, self.headers(), &body)
            .await?;

        Ok(decode_stream(byte_stream, model.to_string()))
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

/// Turn the raw event-stream body into provider chunks, ending at `[DONE]`
fn decode_stream(bytes: ByteStream, model: String) -> LlmStream {
    let finished_model = model.clone();

    let stream = bytes
        .eventsource()
        .take_while(move |event| {
            let done = matches!(event, Ok(event) if event.data.trim() == DONE_SENTINEL);
            if done {
                debug!(model = %finished_model, "Provider stream finished");
            }
            future::ready(!done)
        })
        .filter_map(move |event| {
            let item = match event {
                Ok(event) => parse_stream_data(&event.data, &model).transpose(),
                Err(EventStreamError::Transport(e)) => Some(Err(e)),
                Err(e) => Some(Err(DomainError::provider(
                    "openai",
                    format!("Malformed event stream: {}", e),
                ))),
            };
            future::ready(item)
        })
        // Nothing after the first error
        .scan(false, |failed, item| {
            if *failed {
                return future::ready(None);
            }
            *failed = item.is_err();
            future::ready(Some(item))
        });

    Box::pin(stream)
}

fn parse_stream_data(data: &str, model: &str) -> Result<Option<StreamChunk>, DomainError> {
    if data.trim().is_empty() {
        return Ok(None);
    }

    let chunk: OpenAiStreamChunk = serde_json::from_str(data).map_err(|e| {
        DomainError::provider("openai", format!("Malformed stream chunk: {}", e))
    })?;

    if let Some(error) = chunk.error {
        return Err(DomainError::provider("openai", error.message));
    }

    let Some(choice) = chunk.choices.into_iter().next() else {
        return Ok(None);
    };

    let mut stream_chunk = StreamChunk::new(
        chunk.id.unwrap_or_default(),
        chunk.model.unwrap_or_else(|| model.to_string()),
    );

    if let Some(delta) = choice.delta.content {
        stream_chunk = stream_chunk.with_delta(delta);
    }

    let arguments: String = choice
        .delta
        .tool_calls
        .into_iter()
        .filter_map(|call| call.function.and_then(|f| f.arguments))
        .collect();
    if !arguments.is_empty() {
        stream_chunk = stream_chunk.with_tool_delta(arguments);
    }

    if let Some(reason) = choice.finish_reason {
        stream_chunk = stream_chunk.with_finish_reason(parse_finish_reason(&reason));
    }

    Ok(Some(stream_chunk))
}

fn parse_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "stop" => FinishReason::Stop,
        "length" => FinishReason::Length,
        "content_filter" => FinishReason::ContentFilter,
        "tool_calls" | "function_call" => FinishReason::ToolCalls,
        _ => FinishReason::Stop,
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: &'static str,
    content: String,
}

impl OpenAiMessage {
    fn from_domain(message: &Message) -> Self {
        Self {
            role: message.role.as_str(),
            content: message.content().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    id: String,
    model: String,
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<OpenAiToolCall>,
}

#[derive(Debug, Deserialize)]
struct OpenAiToolCall {
    id: String,
    function: OpenAiFunctionCall,
}

#[derive(Debug, Deserialize)]
struct OpenAiFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiStreamChunk {
    id: Option<String>,
    model: Option<String>,
    #[serde(default)]
    choices: Vec<OpenAiStreamChoice>,
    error: Option<OpenAiStreamError>,
}

#[derive(Debug, Deserialize)]
struct OpenAiStreamError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiStreamChoice {
    delta: OpenAiDelta,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiDelta {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<OpenAiToolCallDelta>,
}

#[derive(Debug, Deserialize)]
struct OpenAiToolCallDelta {
    function: Option<OpenAiFunctionDelta>,
}

#[derive(Debug, Deserialize)]
struct OpenAiFunctionDelta {
    arguments: Option<String>,
}
