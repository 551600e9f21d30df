//! Model Gateway port
//!
//! Defines the interface for communicating with the hosted generative API.

use async_trait::async_trait;
use palaver_domain::{GenerationOutput, InlineImage, Model, StreamEvent};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Transport closed")]
    TransportClosed,

    #[error("Other error: {0}")]
    Other(String),
}

/// A single-shot generation request.
///
/// Used by the non-streamed modes: image generation (with
/// `expect_image`) and scene/app document generation (plain text).
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub model: Model,
    pub prompt: String,
    /// Optional inline image sent alongside the prompt.
    pub image: Option<InlineImage>,
    /// Request image output; the adapter decodes the first inline-image
    /// part of the response.
    pub expect_image: bool,
}

impl GenerateRequest {
    /// A text-output request (scene and app documents).
    pub fn text(model: Model, prompt: impl Into<String>) -> Self {
        Self {
            model,
            prompt: prompt.into(),
            image: None,
            expect_image: false,
        }
    }

    /// An image-output request.
    pub fn image(model: Model, prompt: impl Into<String>) -> Self {
        Self {
            model,
            prompt: prompt.into(),
            image: None,
            expect_image: true,
        }
    }

    pub fn with_image(mut self, image: InlineImage) -> Self {
        self.image = Some(image);
        self
    }
}

/// Gateway for generative model communication
///
/// This port defines how the application layer talks to the hosted API.
/// Implementations (adapters) live in the infrastructure layer. Errors are
/// never retried here; the controller turns them into errored messages.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Open a stateful chat handle with a fixed system instruction.
    async fn open_chat(
        &self,
        model: &Model,
        system_instruction: &str,
    ) -> Result<Box<dyn ChatHandle>, GatewayError>;

    /// Issue a stateless single-shot generation call.
    async fn generate(&self, request: GenerateRequest) -> Result<GenerationOutput, GatewayError>;
}

/// Handle for receiving streaming events from a chat turn.
///
/// Wraps an `mpsc::Receiver<StreamEvent>` so the producer side can be
/// dropped (or, later, cancelled) without the consumer caring.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Consume the stream and collect all text into a single string.
    pub async fn collect_text(mut self) -> Result<String, GatewayError> {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => full_text.push_str(&chunk),
                StreamEvent::Completed(text) => {
                    if full_text.is_empty() {
                        return Ok(text);
                    }
                    return Ok(full_text);
                }
                StreamEvent::Error(e) => {
                    return Err(GatewayError::RequestFailed(e));
                }
            }
        }
        // Channel closed without Completed — return what we have
        Ok(full_text)
    }
}

/// An active stateful chat session with the model.
///
/// The handle owns the provider-side conversation contents; each `send`
/// appends the user message and, once the stream completes, the model
/// reply.
#[async_trait]
pub trait ChatHandle: Send + Sync {
    /// Get the model used by this chat
    fn model(&self) -> &Model;

    /// Send one message (text plus optional inline image) and receive the
    /// response as a stream of text deltas.
    async fn send(
        &self,
        text: &str,
        image: Option<InlineImage>,
    ) -> Result<StreamHandle, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn collect_text_concatenates_deltas() {
        let (tx, rx) = mpsc::channel(8);
        for chunk in ["Hel", "lo, ", "world"] {
            tx.send(StreamEvent::Delta(chunk.to_string())).await.unwrap();
        }
        drop(tx);

        let text = StreamHandle::new(rx).collect_text().await.unwrap();
        assert_eq!(text, "Hello, world");
    }

    #[tokio::test]
    async fn collect_text_prefers_accumulated_over_completed() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(StreamEvent::Delta("partial".to_string())).await.unwrap();
        tx.send(StreamEvent::Completed("ignored".to_string())).await.unwrap();

        let text = StreamHandle::new(rx).collect_text().await.unwrap();
        assert_eq!(text, "partial");
    }

    #[tokio::test]
    async fn collect_text_surfaces_stream_error() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(StreamEvent::Error("boom".to_string())).await.unwrap();

        let result = StreamHandle::new(rx).collect_text().await;
        assert!(matches!(result, Err(GatewayError::RequestFailed(_))));
    }
}
