//! Wire types for the Gemini `generateContent` family of endpoints.
//!
//! Requests and responses share the `Content`/`Part` shape. Decoding into
//! domain types happens once, here; nothing outside this module touches
//! raw response JSON.

use palaver_domain::InlineImage;
use serde::{Deserialize, Serialize};

/// Content container used in both requests and responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// A user turn: the text (when non-empty) plus an optional inline image.
    pub fn user(text: &str, image: Option<&InlineImage>) -> Self {
        let mut parts = Vec::new();
        if !text.is_empty() {
            parts.push(Part::text(text));
        }
        if let Some(image) = image {
            parts.push(Part::inline(image));
        }
        Self {
            role: Some("user".to_string()),
            parts,
        }
    }

    /// A model turn, used when echoing history back to the API.
    pub fn model(text: &str) -> Self {
        Self {
            role: Some("model".to_string()),
            parts: vec![Part::text(text)],
        }
    }

    /// A bare system-instruction container (no role).
    pub fn system(text: &str) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }
}

/// Untagged union of text and inline media content parts.
///
/// Variant order matters for `#[serde(untagged)]` decoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn inline(image: &InlineImage) -> Self {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: image.mime_type.clone(),
                data: image.data.clone(),
            },
        }
    }
}

/// Base64 inline payload used for image requests and image responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl From<InlineData> for InlineImage {
    fn from(data: InlineData) -> Self {
        InlineImage {
            data: data.data,
            mime_type: data.mime_type,
        }
    }
}

/// Request body for `generateContent` / `streamGenerateContent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
}

impl GenerationConfig {
    /// Config for turns that should come back with an image part.
    pub fn image_output() -> Self {
        Self {
            response_modalities: Some(vec!["IMAGE".to_string(), "TEXT".to_string()]),
        }
    }
}

/// Top-level `generateContent` response envelope.
///
/// Streaming responses use the same shape per SSE frame.
#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// Candidate completion item.
#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's text parts.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let mut out = String::new();
        for part in &content.parts {
            if let Part::Text { text } = part {
                out.push_str(text);
            }
        }
        if out.is_empty() { None } else { Some(out) }
    }

    /// The first inline-image part of the first candidate, if any.
    pub fn first_image(&self) -> Option<InlineImage> {
        let content = self.candidates.first()?.content.as_ref()?;
        content.parts.iter().find_map(|part| match part {
            Part::InlineData { inline_data } => Some(inline_data.clone().into()),
            Part::Text { .. } => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_serialization_shapes() {
        let text = serde_json::to_value(Part::text("hi")).unwrap();
        assert_eq!(text, serde_json::json!({"text": "hi"}));

        let image = InlineImage {
            data: "QUJD".to_string(),
            mime_type: "image/png".to_string(),
        };
        let inline = serde_json::to_value(Part::inline(&image)).unwrap();
        assert_eq!(
            inline,
            serde_json::json!({"inlineData": {"mimeType": "image/png", "data": "QUJD"}})
        );
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let raw = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hel"},{"text":"lo"}]}}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.text().as_deref(), Some("Hello"));
        assert!(response.first_image().is_none());
    }

    #[test]
    fn test_response_first_image_skips_text_parts() {
        let raw = r#"{"candidates":[{"content":{"parts":[
            {"text":"Here you go:"},
            {"inlineData":{"mimeType":"image/png","data":"QUJD"}},
            {"inlineData":{"mimeType":"image/jpeg","data":"REVG"}}
        ]}}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let image = response.first_image().unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, "QUJD");
    }

    #[test]
    fn test_empty_candidates_yield_nothing() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.text().is_none());
        assert!(response.first_image().is_none());
    }
}
