//! Session domain entities

use crate::core::string::truncate_chars;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of characters of the first user message used for a
/// session title before the ellipsis marker is appended.
pub const TITLE_MAX_CHARS: usize = 30;

/// Title of a session that has no user message yet.
pub const DEFAULT_TITLE: &str = "New Chat";

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// Base64 image payload carried inline with a message.
///
/// Used both for user attachments sent to the model and for generated
/// images returned by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineImage {
    /// Base64-encoded bytes
    pub data: String,
    /// MIME type, e.g. "image/png"
    pub mime_type: String,
}

/// A message in a conversation (Entity)
///
/// Model messages are created with empty content as a loading placeholder
/// and filled in as streamed chunks arrive. Once a turn settles, the
/// message is never mutated again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub image: Option<InlineImage>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            role: Role::User,
            content: content.into(),
            image: None,
        }
    }

    pub fn user_with_image(content: impl Into<String>, image: InlineImage) -> Self {
        Self {
            id: new_id(),
            role: Role::User,
            content: content.into(),
            image: Some(image),
        }
    }

    /// An empty model message, appended when a turn is submitted and
    /// mutated in place while the response streams.
    pub fn model_placeholder() -> Self {
        Self {
            id: new_id(),
            role: Role::Model,
            content: String::new(),
            image: None,
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            role: Role::Model,
            content: content.into(),
            image: None,
        }
    }

    /// True while this is a model placeholder with nothing committed yet
    pub fn is_pending(&self) -> bool {
        self.role == Role::Model && self.content.is_empty() && self.image.is_none()
    }
}

/// Allocate a collision-resistant message/session id.
fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A chat session (Entity)
///
/// Holds an ordered message sequence. The ordering is append-only except
/// for in-place content updates to the most recent model message while it
/// is streaming.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    id: String,
    title: String,
    messages: Vec<Message>,
}

impl Session {
    pub fn new() -> Self {
        Self::with_id(new_id())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a message and recompute the title.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.title = derive_title(&self.messages);
    }

    /// Replace the full message sequence and recompute the title.
    pub fn replace_messages(&mut self, messages: Vec<Message>) {
        self.messages = messages;
        self.title = derive_title(&self.messages);
    }

    /// Update the content of the model message identified by `id`.
    ///
    /// Only the most recent message may be updated, and only while it is a
    /// model message; everything earlier is settled and immutable.
    /// Returns false if the id does not name the latest model message.
    pub fn update_streaming_content(&mut self, id: &str, content: &str) -> bool {
        match self.messages.last_mut() {
            Some(last) if last.id == id && last.role == Role::Model => {
                content.clone_into(&mut last.content);
                true
            }
            _ => false,
        }
    }

    /// Attach a generated image to the model message identified by `id`.
    ///
    /// Same restriction as [`update_streaming_content`](Self::update_streaming_content):
    /// only the latest model message is mutable.
    pub fn attach_image(&mut self, id: &str, image: InlineImage) -> bool {
        match self.messages.last_mut() {
            Some(last) if last.id == id && last.role == Role::Model => {
                last.image = Some(image);
                true
            }
            _ => false,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive a session title from its message sequence.
///
/// First [`TITLE_MAX_CHARS`] characters of the first user message,
/// ellipsized when truncated; [`DEFAULT_TITLE`] when no user message
/// exists.
pub fn derive_title(messages: &[Message]) -> String {
    messages
        .iter()
        .find(|m| m.role == Role::User && !m.content.is_empty())
        .map(|m| truncate_chars(&m.content, TITLE_MAX_CHARS))
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_first_user_message() {
        let mut session = Session::new();
        assert_eq!(session.title(), DEFAULT_TITLE);

        session.push(Message::user("Tell me about otters"));
        session.push(Message::model("They are mustelids."));
        assert_eq!(session.title(), "Tell me about otters");

        // Later user messages never change the title
        session.push(Message::user("And weasels?"));
        assert_eq!(session.title(), "Tell me about otters");
    }

    #[test]
    fn test_title_truncation_is_exact() {
        let mut session = Session::new();
        let long = "x".repeat(45);
        session.push(Message::user(long));

        let title = session.title();
        assert!(title.ends_with("..."));
        assert_eq!(title.chars().count(), TITLE_MAX_CHARS + 3);
    }

    #[test]
    fn test_title_derivation_idempotent() {
        let messages = vec![Message::user("a".repeat(60))];
        assert_eq!(derive_title(&messages), derive_title(&messages));
    }

    #[test]
    fn test_streaming_update_only_latest_model_message() {
        let mut session = Session::new();
        session.push(Message::user("hi"));
        let placeholder = Message::model_placeholder();
        let id = placeholder.id.clone();
        session.push(placeholder);

        assert!(session.update_streaming_content(&id, "Hel"));
        assert!(session.update_streaming_content(&id, "Hello"));
        assert_eq!(session.messages().last().unwrap().content, "Hello");

        // A settled message earlier in the sequence is immutable
        let first_id = session.messages()[0].id.clone();
        assert!(!session.update_streaming_content(&first_id, "rewritten"));
        assert_eq!(session.messages()[0].content, "hi");
    }

    #[test]
    fn test_message_ids_unique() {
        let a = Message::user("same text");
        let b = Message::user("same text");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_placeholder_is_pending() {
        let placeholder = Message::model_placeholder();
        assert!(placeholder.is_pending());
        assert!(!Message::model("done").is_pending());
        assert!(!Message::user("").is_pending());
    }
}
