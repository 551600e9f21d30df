//! Adapter for the Gemini REST API.
//!
//! Two call shapes, matching the gateway port: stateful streaming chat
//! over `streamGenerateContent?alt=sse`, and stateless single-shot
//! `generateContent` calls used by the image/scene/app modes.

pub mod chat;
pub mod error;
pub mod gateway;
pub mod sse;
pub mod types;

pub use chat::GeminiChat;
pub use error::{GeminiError, Result};
pub use gateway::{GeminiGateway, GeminiSettings};
pub use sse::SseParser;
