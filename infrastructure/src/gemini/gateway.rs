//! Gemini gateway implementation

use crate::gemini::chat::GeminiChat;
use crate::gemini::error::{GeminiError, Result};
use crate::gemini::types::{Content, GenerateContentRequest, GenerationConfig};
use async_trait::async_trait;
use palaver_application::ports::model_gateway::{
    ChatHandle, GatewayError, GenerateRequest, ModelGateway,
};
use palaver_domain::{GenerationOutput, Model};
use std::time::Duration;
use tracing::{debug, info};

/// Connection settings for the hosted API.
#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    pub base_url: String,
    /// Total timeout for single-shot calls. Streaming calls only apply the
    /// connect timeout, since a healthy stream can legitimately run long.
    pub request_timeout: Duration,
}

/// Model gateway backed by the Gemini REST API
pub struct GeminiGateway {
    client: reqwest::Client,
    settings: GeminiSettings,
}

impl GeminiGateway {
    pub fn new(settings: GeminiSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        info!("GeminiGateway initialized for {}", settings.base_url);
        Ok(Self { client, settings })
    }

    fn generate_url(&self, model: &Model) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.base_url, model
        )
    }
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    async fn open_chat(
        &self,
        model: &Model,
        system_instruction: &str,
    ) -> std::result::Result<Box<dyn ChatHandle>, GatewayError> {
        Ok(Box::new(GeminiChat::new(
            self.client.clone(),
            self.settings.base_url.clone(),
            self.settings.api_key.clone(),
            model.clone(),
            system_instruction.to_string(),
        )))
    }

    async fn generate(
        &self,
        request: GenerateRequest,
    ) -> std::result::Result<GenerationOutput, GatewayError> {
        let body = GenerateContentRequest {
            contents: vec![Content::user(&request.prompt, request.image.as_ref())],
            system_instruction: None,
            generation_config: request.expect_image.then(GenerationConfig::image_output),
        };

        debug!(
            "single-shot request to {} (expect_image: {})",
            request.model, request.expect_image
        );
        let response = self
            .client
            .post(self.generate_url(&request.model))
            .header("x-goog-api-key", &self.settings.api_key)
            .timeout(self.settings.request_timeout)
            .json(&body)
            .send()
            .await
            .map_err(GeminiError::from)?;

        let status = response.status();
        let raw = response.text().await.map_err(GeminiError::from)?;
        if !status.is_success() {
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message: raw,
            }
            .into());
        }

        let envelope = serde_json::from_str::<crate::gemini::types::GenerateContentResponse>(&raw)
            .map_err(|e| GeminiError::Parse {
                error: e.to_string(),
                raw,
            })?;

        if request.expect_image {
            envelope
                .first_image()
                .map(GenerationOutput::Image)
                .ok_or_else(|| GeminiError::MissingImage.into())
        } else {
            envelope
                .text()
                .map(GenerationOutput::Text)
                .ok_or_else(|| GeminiError::EmptyResponse.into())
        }
    }
}
