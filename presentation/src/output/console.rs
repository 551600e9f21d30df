//! Console formatting for sessions and transcripts

use colored::Colorize;
use palaver_domain::{Role, Session};

/// Formats sessions and transcripts for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// One line per session, oldest first, with the current one marked.
    pub fn format_session_list(sessions: &[Session], current: Option<&str>) -> String {
        if sessions.is_empty() {
            return "No saved sessions.".to_string();
        }

        let mut output = String::new();
        for (index, session) in sessions.iter().enumerate() {
            let marker = if current == Some(session.id()) {
                "*"
            } else {
                " "
            };
            output.push_str(&format!(
                "{} {:>3}  {}  {}\n",
                marker,
                index + 1,
                session.title().cyan(),
                format!("({} messages)", session.messages().len()).bright_black()
            ));
        }
        output.pop();
        output
    }

    /// Replay a stored session transcript.
    pub fn format_session_replay(session: &Session) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n", format!("── {} ──", session.title()).bold()));
        for message in session.messages() {
            let (label, content) = match message.role {
                Role::User => ("you".green().bold(), message.content.as_str()),
                Role::Model => ("model".blue().bold(), message.content.as_str()),
            };
            output.push_str(&format!("{label}: {content}\n"));
            if message.image.is_some() {
                output.push_str(&format!("{}\n", "  [image]".bright_black()));
            }
        }
        output.pop();
        output
    }

    /// REPL help text.
    pub fn help() -> String {
        let mut output = String::new();
        output.push_str("Commands:\n");
        output.push_str("  /help, /h, /?        - Show this help\n");
        output.push_str("  /new                 - Start a fresh conversation\n");
        output.push_str("  /sessions            - List saved sessions\n");
        output.push_str("  /switch <n>          - Continue saved session n\n");
        output.push_str("  /delete <n>          - Delete saved session n\n");
        output.push_str("  /user <name>         - Switch to another user's history\n");
        output.push_str("  /attach <path>       - Attach an image to the next message\n");
        output.push_str("  /quit, /exit, /q     - Exit chat\n");
        output.push('\n');
        output.push_str("Generation:\n");
        output.push_str("  /imagine <prompt>    - Generate an image\n");
        output.push_str("  /scene <prompt>      - Generate a 3D-scene HTML document\n");
        output.push_str("  /app <prompt>        - Generate a single-file web app\n");
        output
    }
}
