//! Adapts a stream of partial instances into event-stream frames
//!
//! One producer task per stream pulls partial instances, renders the monitored
//! field into a single-line frame and hands it to a capacity-1 channel, so at
//! most one frame is in flight. The task stops pulling as soon as the receiving
//! side is dropped, which drops the provider stream with it.

use std::time::Duration;

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error};

use super::PartialStream;

/// Default delay inserted after each emitted frame
pub const DEFAULT_PACING: Duration = Duration::from_millis(100);

/// Stream of frames handed to the HTTP layer
pub type FrameStream = ReceiverStream<Frame>;

/// A single `data:` event whose payload never contains a line break
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    payload: String,
}

impl Frame {
    /// Frame carrying `text`, escaped onto one line
    pub fn new(text: &str) -> Self {
        Self {
            payload: escape_payload(text),
        }
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Wire form: `data: <payload>\n\n`
    pub fn encode(&self) -> String {
        format!("data: {}\n\n", self.payload)
    }
}

/// Escape `\`, LF and CR so the payload fits on one line
pub fn escape_payload(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}

/// Inverse of [`escape_payload`]
pub fn unescape_payload(payload: &str) -> String {
    let mut out = String::with_capacity(payload.len());
    let mut chars = payload.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

/// Bridge settings
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeOptions {
    /// Field to emit; the schema's primary field when unset
    pub field: Option<String>,
    pub pacing: Duration,
    /// Extra frame sent after a stream that completed without error
    pub done_marker: Option<String>,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            field: None,
            pacing: DEFAULT_PACING,
            done_marker: None,
        }
    }
}

/// Converts partial instances into paced event-stream frames
#[derive(Debug, Clone, Default)]
pub struct StreamBridge {
    options: BridgeOptions,
}

impl StreamBridge {
    pub fn new(options: BridgeOptions) -> Self {
        Self { options }
    }

    /// Spawn the producer task and return its frames
    pub fn spawn(&self, source: PartialStream) -> FrameStream {
        let (tx, rx) = mpsc::channel::<Frame>(1);
        let options = self.options.clone();

        tokio::spawn(async move {
            let mut source = source;
            let mut emitted = 0usize;

            loop {
                let next = tokio::select! {
                    _ = tx.closed() => {
                        debug!(frames = emitted, "Client disconnected, stopping stream");
                        return;
                    }
                    next = source.next() => next,
                };

                let instance = match next {
                    Some(Ok(instance)) => instance,
                    Some(Err(e)) => {
                        error!(frames = emitted, error = %e, "Stream aborted");
                        return;
                    }
                    None => break,
                };

                let text = match &options.field {
                    Some(field) => instance.text(field),
                    None => instance.primary_text(),
                };
                let Some(text) = text else {
                    continue;
                };

                if tx.send(Frame::new(&text)).await.is_err() {
                    debug!(frames = emitted, "Client disconnected, stopping stream");
                    return;
                }
                emitted += 1;

                tokio::select! {
                    _ = tx.closed() => {
                        debug!(frames = emitted, "Client disconnected, stopping stream");
                        return;
                    }
                    _ = tokio::time::sleep(options.pacing) => {}
                }
            }

            if let Some(marker) = &options.done_marker {
                let _ = tx.send(Frame::new(marker)).await;
            }

            debug!(frames = emitted, "Stream completed");
        });

        ReceiverStream::new(rx)
    }
}
