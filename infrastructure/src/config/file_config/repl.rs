//! REPL configuration from TOML (`[repl]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReplConfig {
    /// Persist line-editing history across runs.
    pub save_history: bool,
    /// Show a spinner between submission and the first chunk.
    pub show_spinner: bool,
}

impl Default for FileReplConfig {
    fn default() -> Self {
        Self {
            save_history: true,
            show_spinner: true,
        }
    }
}
