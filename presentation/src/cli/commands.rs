//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for palaver
#[derive(Parser, Debug)]
#[command(name = "palaver")]
#[command(author, version, about = "Terminal chat client for a hosted generative-AI API")]
#[command(long_about = r#"
Palaver keeps streamed conversations with a hosted generative model,
persists them per user, and routes slash commands to generation modes:

  /imagine <prompt>   generate an image
  /scene <prompt>     generate an interactive 3D-scene HTML document
  /app <prompt>       generate a single-file web app

Configuration files are loaded from (in priority order):
1. --config <path>      Explicit config file
2. ./palaver.toml       Project-level config
3. ~/.config/palaver/config.toml   Global config

The API key is read from $GEMINI_API_KEY (or [provider] in the config).

Example:
  palaver "What's a good name for a gray cat?"
  palaver --mode image "a lighthouse in a storm"
  palaver --chat -u ada
"#)]
pub struct Cli {
    /// One-shot prompt (omit and pass --chat for interactive mode)
    pub prompt: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Generation mode for the one-shot prompt (chat, image, scene, app)
    #[arg(short, long, value_name = "MODE")]
    pub mode: Option<String>,

    /// User name owning the persisted history
    #[arg(short, long, value_name = "NAME")]
    pub user: Option<String>,

    /// Override the chat model
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Attach an image file to the prompt
    #[arg(long, value_name = "PATH")]
    pub attach: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the spinner and non-essential output
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
