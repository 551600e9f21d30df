//! Generation modes and slash-command classification.
//!
//! A submitted prompt is routed to one of four generation modes by a
//! leading-slash command convention. Every mode shares the same turn
//! state machine and persistence path; they differ only in prompt
//! assembly and call shape.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// How a submitted prompt is sent to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Stateful streamed conversation (the default).
    Chat,
    /// Single non-streamed call requesting image output.
    Image,
    /// Single non-streamed call producing a 3D-scene HTML document.
    Scene,
    /// Single non-streamed call producing a single-file web app.
    App,
}

impl GenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMode::Chat => "chat",
            GenerationMode::Image => "image",
            GenerationMode::Scene => "scene",
            GenerationMode::App => "app",
        }
    }

    /// The slash command that selects this mode, if any.
    pub fn command(&self) -> Option<&'static str> {
        match self {
            GenerationMode::Chat => None,
            GenerationMode::Image => Some("/imagine"),
            GenerationMode::Scene => Some("/scene"),
            GenerationMode::App => Some("/app"),
        }
    }

    /// Chat responses arrive as a delta stream; the other modes settle
    /// from a single response.
    pub fn is_streamed(&self) -> bool {
        matches!(self, GenerationMode::Chat)
    }
}

impl std::fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for GenerationMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chat" => Ok(GenerationMode::Chat),
            "image" | "imagine" => Ok(GenerationMode::Image),
            "scene" => Ok(GenerationMode::Scene),
            "app" => Ok(GenerationMode::App),
            other => Err(DomainError::UnknownCommand(other.to_string())),
        }
    }
}

/// A prompt with its routing decision applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedPrompt {
    pub mode: GenerationMode,
    /// The prompt text with any mode command stripped.
    pub prompt: String,
}

/// Classify raw input by the leading-slash command convention.
///
/// `/imagine <p>`, `/scene <p>` and `/app <p>` select their modes with the
/// remainder as prompt; any other leading slash is an unknown command;
/// everything else is plain chat with the input passed through verbatim.
pub fn classify(input: &str) -> Result<ClassifiedPrompt, DomainError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyPrompt);
    }

    let Some(tail) = trimmed.strip_prefix('/') else {
        return Ok(ClassifiedPrompt {
            mode: GenerationMode::Chat,
            prompt: trimmed.to_string(),
        });
    };

    let (command, rest) = match tail.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (tail, ""),
    };

    let mode = match command {
        "imagine" => GenerationMode::Image,
        "scene" => GenerationMode::Scene,
        "app" => GenerationMode::App,
        other => return Err(DomainError::UnknownCommand(format!("/{other}"))),
    };

    if rest.is_empty() {
        return Err(DomainError::EmptyPrompt);
    }

    Ok(ClassifiedPrompt {
        mode,
        prompt: rest.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_chat() {
        let classified = classify("tell me a story").unwrap();
        assert_eq!(classified.mode, GenerationMode::Chat);
        assert_eq!(classified.prompt, "tell me a story");
    }

    #[test]
    fn test_imagine_command() {
        let classified = classify("/imagine a red cube").unwrap();
        assert_eq!(classified.mode, GenerationMode::Image);
        assert_eq!(classified.prompt, "a red cube");
    }

    #[test]
    fn test_scene_and_app_commands() {
        assert_eq!(
            classify("/scene a forest clearing").unwrap().mode,
            GenerationMode::Scene
        );
        assert_eq!(
            classify("/app a pomodoro timer").unwrap().mode,
            GenerationMode::App
        );
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            classify("/summon a demon"),
            Err(DomainError::UnknownCommand("/summon".to_string()))
        );
    }

    #[test]
    fn test_command_without_prompt() {
        assert_eq!(classify("/imagine"), Err(DomainError::EmptyPrompt));
        assert_eq!(classify("/imagine   "), Err(DomainError::EmptyPrompt));
        assert_eq!(classify(""), Err(DomainError::EmptyPrompt));
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("image".parse::<GenerationMode>().unwrap(), GenerationMode::Image);
        assert_eq!("chat".parse::<GenerationMode>().unwrap(), GenerationMode::Chat);
        assert!("paint".parse::<GenerationMode>().is_err());
    }

    #[test]
    fn test_streamed_flag() {
        assert!(GenerationMode::Chat.is_streamed());
        assert!(!GenerationMode::Image.is_streamed());
        assert!(!GenerationMode::Scene.is_streamed());
    }
}
