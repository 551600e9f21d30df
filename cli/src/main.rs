//! CLI entrypoint for palaver
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use palaver_application::{
    CURRENT_USER_KEY, ConversationConfig, ConversationController, KeyValueStore,
    NoTranscriptLogger, SessionStore, TranscriptLogger, TurnInput,
};
use palaver_domain::GenerationMode;
use palaver_infrastructure::{
    ConfigLoader, FileConfig, FileKeyValueStore, GeminiGateway, JsonlTranscriptLogger,
};
use palaver_presentation::{ChatRepl, Cli, ReplOptions, TurnReporter, persist_outcome};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // Load configuration
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?
    };

    // Route tracing to a file when configured, stderr otherwise. The
    // non-blocking writer guard must outlive main.
    let _log_guard = init_tracing(filter, &config)?;
    info!("Starting palaver");

    // === Dependency Injection ===
    let storage_dir = config.storage.resolve_dir();
    let store = FileKeyValueStore::open(&storage_dir)
        .with_context(|| format!("cannot open storage dir {}", storage_dir.display()))?
        .with_quota(config.storage.quota_bytes);
    let store: Arc<dyn KeyValueStore> = Arc::new(store);

    // The signed-in user: flag, then the persisted stub, then "guest"
    let user = cli
        .user
        .clone()
        .or_else(|| store.get(CURRENT_USER_KEY))
        .unwrap_or_else(|| "guest".to_string());

    // A missing API key is a startup error; no turn ever begins without it
    let settings = config
        .provider
        .to_settings()
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    let gateway = Arc::new(GeminiGateway::new(settings).map_err(|e| anyhow::anyhow!("{e}"))?);

    let transcript: Arc<dyn TranscriptLogger> = if config.logging.transcript {
        match JsonlTranscriptLogger::for_run(config.logging.resolve_transcript_dir()) {
            Some(logger) => Arc::new(logger),
            None => Arc::new(NoTranscriptLogger),
        }
    } else {
        Arc::new(NoTranscriptLogger)
    };

    let mut conversation = ConversationConfig {
        chat_model: config.provider.chat_model(),
        image_model: config.provider.image_model(),
    };
    if let Some(model) = &cli.model {
        conversation.chat_model = model.parse().unwrap();
    }

    let sessions = SessionStore::open(Arc::clone(&store), user);
    let controller = ConversationController::new(gateway, transcript, conversation, sessions);

    let artifacts_dir = config.storage.resolve_artifacts_dir();

    // Chat mode
    if cli.chat {
        let options = ReplOptions {
            save_history: config.repl.save_history,
            show_spinner: config.repl.show_spinner && !cli.quiet,
        };
        let mut repl = ChatRepl::new(controller, options, artifacts_dir);
        repl.run().await?;
        return Ok(());
    }

    // One-shot mode - a prompt is required
    let prompt = match cli.prompt.clone() {
        Some(p) => p,
        None => bail!("Prompt is required. Use --chat for interactive mode."),
    };

    run_one_shot(controller, &cli, prompt, &artifacts_dir).await
}

async fn run_one_shot(
    mut controller: ConversationController,
    cli: &Cli,
    prompt: String,
    artifacts_dir: &Path,
) -> Result<()> {
    let mut input = TurnInput::text(prompt);
    if let Some(mode) = &cli.mode {
        let mode: GenerationMode = mode.parse().map_err(|e| anyhow::anyhow!("{e}"))?;
        input = input.with_mode(mode);
    }
    if let Some(path) = &cli.attach {
        let image =
            palaver_presentation::read_image_attachment(path).map_err(|e| anyhow::anyhow!(e))?;
        input = input.with_image(image);
    }

    let reporter = TurnReporter::new(!cli.quiet);
    let outcome = controller.submit(input, &reporter).await?;
    if outcome.errored {
        // The reporter already printed the error content
        return Ok(());
    }

    match persist_outcome(&outcome, artifacts_dir)? {
        Some(path) => println!("Saved {} result to {}", outcome.mode, path.display()),
        None => {
            // Chat output already streamed; print anything non-streamed
            if !outcome.mode.is_streamed() && !outcome.message.content.is_empty() {
                println!("{}", outcome.message.content);
            }
        }
    }

    Ok(())
}

fn init_tracing(
    filter: EnvFilter,
    config: &FileConfig,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    match &config.logging.file {
        Some(path) => {
            let dir = match path.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => dir,
                _ => Path::new("."),
            };
            std::fs::create_dir_all(dir)
                .with_context(|| format!("cannot create log dir {}", dir.display()))?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "palaver.log".to_string());
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .init();
            Ok(None)
        }
    }
}
