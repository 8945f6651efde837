//! # App Configuration
//!
//! Optional TOML configuration for CLI defaults. Flags always win over the
//! config file; the config file wins over built-in defaults.
//!
//! ```toml
//! # trigraph.toml
//! database = "graphs/world.redb"
//! log_format = "json"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Built-in default database path.
pub const DEFAULT_DATABASE: &str = "trigraph.redb";

/// Configuration file contents. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Path to the graph database.
    pub database: Option<PathBuf>,
    /// Log output format: "text" or "json".
    pub log_format: Option<String>,
}

impl AppConfig {
    /// Load the configuration from a file. A missing file is fine (all
    /// defaults); a file that exists but does not parse is reported and
    /// ignored, so a typo never hides the CLI.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let Ok(raw) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("warning: ignoring config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// The database path to use, given an optional CLI override.
    #[must_use]
    pub fn database_path(&self, cli_override: Option<&Path>) -> PathBuf {
        cli_override
            .map(Path::to_path_buf)
            .or_else(|| self.database.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE))
    }
}

// =============================================================================
// TESTS
// =============================================================================
