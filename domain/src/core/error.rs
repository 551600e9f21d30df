//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("Prompt is empty")]
    EmptyPrompt,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid model: {0}")]
    InvalidModel(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_command_display() {
        let error = DomainError::UnknownCommand("/frobnicate".to_string());
        assert_eq!(error.to_string(), "Unknown command: /frobnicate");
    }

    #[test]
    fn test_empty_prompt_display() {
        assert_eq!(DomainError::EmptyPrompt.to_string(), "Prompt is empty");
    }
}
