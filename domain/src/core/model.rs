//! Model value object representing a generative model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Available generative models (Value Object)
///
/// The chat path and the image path use different models: text
/// conversations go to a fast chat model, while image generation needs a
/// model that can emit inline image parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    // Chat models
    Flash,
    Pro,
    FlashLite,
    // Image-output model
    FlashImage,
    // Custom
    Custom(String),
}

impl Model {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::Flash => "gemini-2.5-flash",
            Model::Pro => "gemini-2.5-pro",
            Model::FlashLite => "gemini-2.5-flash-lite",
            Model::FlashImage => "gemini-2.5-flash-image-preview",
            Model::Custom(s) => s,
        }
    }

    /// Default model for text conversations
    pub fn default_chat() -> Model {
        Model::Flash
    }

    /// Default model for image generation
    pub fn default_image() -> Model {
        Model::FlashImage
    }

    /// Check if this model can return inline image parts
    pub fn emits_images(&self) -> bool {
        matches!(self, Model::FlashImage)
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::Flash
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "gemini-2.5-flash" => Model::Flash,
            "gemini-2.5-pro" => Model::Pro,
            "gemini-2.5-flash-lite" => Model::FlashLite,
            "gemini-2.5-flash-image-preview" => Model::FlashImage,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_roundtrip() {
        for model in [Model::Flash, Model::Pro, Model::FlashImage] {
            let s = model.to_string();
            let parsed: Model = s.parse().unwrap();
            assert_eq!(model, parsed);
        }
    }

    #[test]
    fn test_custom_model() {
        let model: Model = "gemini-experimental".parse().unwrap();
        assert_eq!(model, Model::Custom("gemini-experimental".to_string()));
        assert_eq!(model.to_string(), "gemini-experimental");
    }

    #[test]
    fn test_image_capability() {
        assert!(Model::FlashImage.emits_images());
        assert!(!Model::Flash.emits_images());
        assert!(Model::default_image().emits_images());
    }
}
