//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::ConsoleFormatter;
use crate::output::artifacts::{persist_outcome, read_image_attachment};
use crate::progress::TurnReporter;
use colored::Colorize;
use palaver_application::{ConversationController, TurnInput};
use palaver_domain::InlineImage;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::{Path, PathBuf};

/// Presentation options for the REPL.
#[derive(Debug, Clone)]
pub struct ReplOptions {
    pub save_history: bool,
    pub show_spinner: bool,
}

impl Default for ReplOptions {
    fn default() -> Self {
        Self {
            save_history: true,
            show_spinner: true,
        }
    }
}

enum CommandAction {
    /// Leave the REPL.
    Exit,
    /// Handled locally; read the next line.
    Handled,
    /// Not a REPL command; submit it as a turn.
    Submit,
}

/// Interactive chat REPL
pub struct ChatRepl {
    controller: ConversationController,
    options: ReplOptions,
    artifacts_dir: PathBuf,
    /// Image staged by `/attach` for the next submission.
    pending_image: Option<InlineImage>,
}

impl ChatRepl {
    pub fn new(
        controller: ConversationController,
        options: ReplOptions,
        artifacts_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            controller,
            options,
            artifacts_dir: artifacts_dir.into(),
            pending_image: None,
        }
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = dirs::data_dir().map(|p| p.join("palaver").join("history.txt"));

        if self.options.save_history
            && let Some(ref path) = history_path
        {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            let readline = rl.readline(">>> ");

            match readline {
                Ok(line) => {
                    let line = line.trim().to_string();

                    if line.is_empty() {
                        continue;
                    }

                    match self.handle_command(&line) {
                        CommandAction::Exit => break,
                        CommandAction::Handled => continue,
                        CommandAction::Submit => {}
                    }

                    let _ = rl.add_history_entry(&line);
                    self.process_turn(&line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if self.options.save_history
            && let Some(ref path) = history_path
        {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│              palaver - chat mode            │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Signed in as {}", self.controller.user().cyan());
        println!("Type /help for commands; /imagine, /scene and /app generate things.");
        println!();
    }

    /// Handle REPL-level slash commands. Generation commands fall through
    /// to the controller's classifier.
    fn handle_command(&mut self, line: &str) -> CommandAction {
        if !line.starts_with('/') {
            return CommandAction::Submit;
        }
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                CommandAction::Exit
            }
            "/help" | "/h" | "/?" => {
                println!();
                println!("{}", ConsoleFormatter::help());
                CommandAction::Handled
            }
            "/new" => {
                self.controller.new_chat();
                println!("Started a new conversation.");
                CommandAction::Handled
            }
            "/sessions" => {
                let current = self.controller.current_session().map(|s| s.id().to_string());
                println!(
                    "{}",
                    ConsoleFormatter::format_session_list(
                        self.controller.sessions(),
                        current.as_deref()
                    )
                );
                CommandAction::Handled
            }
            "/switch" => {
                match self.session_id_at(rest) {
                    Some(id) => {
                        self.controller.switch_to(&id);
                        if let Some(session) = self.controller.current_session() {
                            println!("{}", ConsoleFormatter::format_session_replay(session));
                        }
                    }
                    None => eprintln!("Usage: /switch <n> (see /sessions)"),
                }
                CommandAction::Handled
            }
            "/delete" => {
                match self.session_id_at(rest) {
                    Some(id) => {
                        self.controller.delete_session(&id);
                        println!("Deleted.");
                    }
                    None => eprintln!("Usage: /delete <n> (see /sessions)"),
                }
                CommandAction::Handled
            }
            "/user" => {
                if rest.is_empty() {
                    eprintln!("Usage: /user <name>");
                } else {
                    self.controller.switch_user(rest);
                    println!("Signed in as {}", rest.cyan());
                }
                CommandAction::Handled
            }
            "/attach" => {
                if rest.is_empty() {
                    eprintln!("Usage: /attach <path-to-image>");
                } else {
                    match read_image_attachment(Path::new(rest)) {
                        Ok(image) => {
                            println!(
                                "Attached {} ({}); it will ride along with your next message.",
                                rest,
                                image.mime_type
                            );
                            self.pending_image = Some(image);
                        }
                        Err(e) => eprintln!("{}", e.red()),
                    }
                }
                CommandAction::Handled
            }
            // Generation commands are the controller's business
            "/imagine" | "/scene" | "/app" => CommandAction::Submit,
            _ => {
                eprintln!("Unknown command: {command}");
                eprintln!("Type /help for available commands");
                CommandAction::Handled
            }
        }
    }

    /// Resolve a 1-based session index from /sessions.
    fn session_id_at(&self, arg: &str) -> Option<String> {
        let index: usize = arg.parse().ok()?;
        self.controller
            .sessions()
            .get(index.checked_sub(1)?)
            .map(|s| s.id().to_string())
    }

    async fn process_turn(&mut self, line: &str) {
        let mut input = TurnInput::text(line);
        if let Some(image) = self.pending_image.take() {
            input = input.with_image(image);
        }

        let reporter = TurnReporter::new(self.options.show_spinner);
        match self.controller.submit(input, &reporter).await {
            Ok(outcome) => {
                if outcome.errored {
                    return; // the reporter already printed the error
                }
                match persist_outcome(&outcome, &self.artifacts_dir) {
                    Ok(Some(path)) => {
                        println!(
                            "{} {}",
                            format!("Saved {} result to", outcome.mode).green(),
                            path.display()
                        );
                    }
                    Ok(None) => {
                        // Chat output already streamed to the console. An
                        // image turn that came back as prose still needs
                        // printing.
                        if !outcome.mode.is_streamed() && !outcome.message.content.is_empty() {
                            println!("{}", outcome.message.content);
                        }
                    }
                    Err(e) => eprintln!("{}", format!("Could not save result: {e}").red()),
                }
            }
            Err(e) => {
                eprintln!("{}", e.to_string().red());
            }
        }
        println!();
    }
}
