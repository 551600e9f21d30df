//! Application layer for palaver
//!
//! This crate contains the conversation controller, the session store,
//! and the port definitions the infrastructure adapters implement. It
//! depends only on the domain layer.

pub mod ports;
pub mod session_store;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    key_value_store::{InMemoryStore, KeyValueStore, StoreError},
    model_gateway::{ChatHandle, GatewayError, GenerateRequest, ModelGateway, StreamHandle},
    transcript_logger::{NoTranscriptLogger, TranscriptEvent, TranscriptLogger},
    turn_progress::{NoTurnProgress, TurnProgress},
};
pub use session_store::{CURRENT_USER_KEY, SessionStore, history_key};
pub use use_cases::run_turn::{
    ConversationConfig, ConversationController, IMAGE_FALLBACK_CONTENT, TurnError, TurnInput,
    TurnOutcome, TurnPhase,
};
