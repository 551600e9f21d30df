//! Streaming events for model session communication.
//!
//! [`StreamEvent`] represents individual events in a streaming model
//! response, enabling incremental display of output as it is generated.

/// An event in a streaming model response.
///
/// Bridges infrastructure-level streaming (SSE frames from the hosted API)
/// to the application layer through an explicit channel, so the consumer
/// side stays decoupled from the transport, leaving a seam for a future
/// cancellation path.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A text chunk from the model, in arrival order.
    Delta(String),
    /// The complete response text (signals stream end).
    Completed(String),
    /// An error that occurred during streaming.
    Error(String),
}

impl StreamEvent {
    /// Returns the text content if this is a Delta or Completed event.
    pub fn text(&self) -> Option<&str> {
        match self {
            StreamEvent::Delta(s) | StreamEvent::Completed(s) => Some(s),
            StreamEvent::Error(_) => None,
        }
    }

    /// Returns true if this event signals the end of the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Completed(_) | StreamEvent::Error(_))
    }
}
