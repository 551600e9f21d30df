//! Streaming progress rendering for a turn.
//!
//! Implements the [`TurnProgress`] port: a spinner while waiting for the
//! first chunk, then raw chunks printed as they arrive so the transcript
//! grows exactly as incrementally as the stream.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use palaver_application::TurnProgress;
use palaver_domain::{Message, Session};
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;

/// Console reporter for turn progress.
pub struct TurnReporter {
    spinner: Mutex<Option<ProgressBar>>,
    show_spinner: bool,
}

impl TurnReporter {
    pub fn new(show_spinner: bool) -> Self {
        Self {
            spinner: Mutex::new(None),
            show_spinner,
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap()
    }

    fn clear_spinner(&self) {
        if let Ok(mut spinner) = self.spinner.lock()
            && let Some(bar) = spinner.take()
        {
            bar.finish_and_clear();
        }
    }
}

impl Default for TurnReporter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl TurnProgress for TurnReporter {
    fn on_submitted(&self, _session: &Session) {
        if !self.show_spinner {
            return;
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(Self::spinner_style());
        bar.set_message("thinking...");
        bar.enable_steady_tick(Duration::from_millis(80));
        if let Ok(mut spinner) = self.spinner.lock() {
            *spinner = Some(bar);
        }
    }

    fn on_delta(&self, delta: &str, _accumulated: &str) {
        self.clear_spinner();
        print!("{delta}");
        let _ = io::stdout().flush();
    }

    fn on_settled(&self, message: &Message) {
        self.clear_spinner();
        // Streamed content was already printed delta by delta; just close
        // the line. Non-streamed results are rendered by the caller.
        if !message.content.is_empty() {
            println!();
        }
    }

    fn on_error(&self, content: &str) {
        self.clear_spinner();
        eprintln!("{}", content.red());
    }
}
