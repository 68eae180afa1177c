//! Prompt endpoints: blocking (`POST /`) and event-stream (`POST /stream`)

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, Sse},
};
use futures::{Stream, StreamExt};
use tracing::{debug, info};

use super::middleware::truncate_for_log;
use super::state::AppState;
use super::types::{ApiError, Json, PromptRequest, PromptResponse};

/// Return the validated primary field of the schema instance
pub async fn create_response(
    State(state): State<AppState>,
    Json(request): Json<PromptRequest>,
) -> Result<Json<PromptResponse>, ApiError> {
    debug!(prompt = %truncate_for_log(&request.message, 80), "Prompt received");

    let invoker = state.invoker().await?;
    let instance = invoker
        .create(&state.model.id, state.messages(&request.message), &state.schema)
        .await?;

    info!(model = %state.model.id, schema = %state.schema.name(), "Response generated");

    Ok(Json(PromptResponse {
        response: instance.primary_text().unwrap_or_default(),
    }))
}

/// Stream the monitored field as it grows. Failures before the first frame
/// are returned as an error body; later failures close the stream.
pub async fn stream_response(
    State(state): State<AppState>,
    Json(request): Json<PromptRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    debug!(prompt = %truncate_for_log(&request.message, 80), "Streaming prompt received");

    let invoker = state.invoker().await?;
    let partials = invoker
        .create_partial(
            &state.model.id,
            state.messages(&request.message),
            state.schema.clone(),
        )
        .await?;

    let frames = state.bridge.spawn(partials);

    Ok(Sse::new(frames.map(|frame| {
        Ok::<_, Infallible>(Event::default().data(frame.payload()))
    })))
}
