//! Stateful chat sessions against the streaming endpoint.
//!
//! The API itself is stateless; [`GeminiChat`] owns the conversation
//! contents and replays them on every send. A background task reads the
//! SSE body and forwards text deltas over the stream channel in arrival
//! order.

use crate::gemini::error::GeminiError;
use crate::gemini::sse::SseParser;
use crate::gemini::types::{Content, GenerateContentRequest, GenerateContentResponse};
use async_trait::async_trait;
use futures::StreamExt;
use palaver_application::{ChatHandle, GatewayError, StreamHandle};
use palaver_domain::{InlineImage, Model, StreamEvent};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// An active conversation with a chat model.
pub struct GeminiChat {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: Model,
    system_instruction: String,
    history: Arc<Mutex<Vec<Content>>>,
}

impl GeminiChat {
    pub(crate) fn new(
        client: reqwest::Client,
        base_url: String,
        api_key: String,
        model: Model,
        system_instruction: String,
    ) -> Self {
        Self {
            client,
            base_url,
            api_key,
            model,
            system_instruction,
            history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn stream_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl ChatHandle for GeminiChat {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn send(
        &self,
        text: &str,
        image: Option<InlineImage>,
    ) -> Result<StreamHandle, GatewayError> {
        // Append the user turn and snapshot the contents to replay.
        let (contents, rollback_len) = {
            let mut history = self.history.lock().unwrap();
            let rollback_len = history.len();
            history.push(Content::user(text, image.as_ref()));
            (history.clone(), rollback_len)
        };

        let request = GenerateContentRequest {
            contents,
            system_instruction: Some(Content::system(&self.system_instruction)),
            generation_config: None,
        };

        debug!("streaming chat request to {}", self.model);
        let response = self
            .client
            .post(self.stream_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::from(GeminiError::from(e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            // Roll back the user turn so a resubmission starts clean.
            truncate_history(&self.history, rollback_len);
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let (tx, rx) = mpsc::channel(32);
        let history = Arc::clone(&self.history);
        tokio::spawn(async move {
            let mut parser = SseParser::new();
            let mut accumulated = String::new();
            let mut body = response.bytes_stream();

            while let Some(chunk) = body.next().await {
                match chunk {
                    Ok(bytes) => {
                        for payload in parser.push(&bytes) {
                            if let Some(delta) = decode_delta(&payload) {
                                accumulated.push_str(&delta);
                                if tx.send(StreamEvent::Delta(delta)).await.is_err() {
                                    // Consumer hung up; abandon the turn.
                                    truncate_history(&history, rollback_len);
                                    return;
                                }
                            }
                        }
                    }
                    Err(e) => {
                        truncate_history(&history, rollback_len);
                        let _ = tx.send(StreamEvent::Error(e.to_string())).await;
                        return;
                    }
                }
            }

            if let Some(payload) = parser.finish() {
                if let Some(delta) = decode_delta(&payload) {
                    accumulated.push_str(&delta);
                    let _ = tx.send(StreamEvent::Delta(delta)).await;
                }
            }

            // Record the reply so the next turn carries the full exchange.
            history.lock().unwrap().push(Content::model(&accumulated));
            let _ = tx.send(StreamEvent::Completed(accumulated)).await;
        });

        Ok(StreamHandle::new(rx))
    }
}

/// Text delta carried by one SSE frame, if any.
fn decode_delta(payload: &str) -> Option<String> {
    match serde_json::from_str::<GenerateContentResponse>(payload) {
        Ok(envelope) => envelope.text(),
        Err(e) => {
            warn!("skipping unparseable stream frame: {e}");
            None
        }
    }
}

fn truncate_history(history: &Mutex<Vec<Content>>, len: usize) {
    let mut history = history.lock().unwrap();
    history.truncate(len);
}
