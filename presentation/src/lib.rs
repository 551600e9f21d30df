//! Presentation layer for palaver
//!
//! This crate contains CLI definitions, output formatters, the turn
//! progress reporter, and the interactive chat REPL.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatRepl, ReplOptions};
pub use cli::Cli;
pub use output::artifacts::{persist_outcome, read_image_attachment};
pub use output::console::ConsoleFormatter;
pub use progress::TurnReporter;
