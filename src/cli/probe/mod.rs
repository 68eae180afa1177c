//! Probe command - posts a prompt to `/stream` and prints each frame

use clap::Args;
use eventsource_stream::Eventsource;
use futures::StreamExt;

use crate::api::types::PromptRequest;
use crate::domain::structured::unescape_payload;

pub const DEFAULT_URL: &str = "http://localhost:8000/stream";

/// Arguments for the probe command
#[derive(Args, Clone, Debug)]
pub struct ProbeArgs {
    /// Streaming endpoint of a running server
    #[arg(long, default_value = DEFAULT_URL)]
    pub url: String,

    /// Prompt to send
    pub message: String,
}

/// Print every frame payload, unescaped, as it arrives
pub async fn run(args: ProbeArgs) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let response = client
        .post(&args.url)
        .json(&PromptRequest {
            message: args.message,
        })
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("{} returned {}: {}", args.url, status, body);
    }

    let mut events = Box::pin(response.bytes_stream().eventsource());

    while let Some(event) = events.next().await {
        let event = event.map_err(|e| anyhow::anyhow!("Failed to read event stream: {}", e))?;
        println!("{}", unescape_payload(&event.data));
    }

    Ok(())
}
