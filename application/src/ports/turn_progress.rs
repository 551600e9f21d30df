//! Port for observing turn progress.
//!
//! The presentation layer implements this to render streamed output as it
//! arrives. Notification happens after every chunk with no batching, so
//! the display is exactly as incremental as the stream.

use palaver_domain::{Message, Session};

/// Observer for the lifecycle of a single turn.
///
/// All methods have empty defaults; implementations override what they
/// render.
pub trait TurnProgress: Send + Sync {
    /// The user message and model placeholder have been appended.
    fn on_submitted(&self, _session: &Session) {}

    /// A streamed chunk arrived. `accumulated` is the full content so far.
    fn on_delta(&self, _delta: &str, _accumulated: &str) {}

    /// The turn settled; `message` is the committed model message.
    fn on_settled(&self, _message: &Message) {}

    /// The turn errored; `content` is the user-readable error content.
    fn on_error(&self, _content: &str) {}
}

/// No-op implementation for tests and non-interactive callers.
pub struct NoTurnProgress;

impl TurnProgress for NoTurnProgress {}
