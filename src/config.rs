//! Configuration for vault-find.
//!
//! Configuration is loaded once from environment variables with sensible
//! defaults; command-line flags then override individual values.

use std::env;
use std::path::PathBuf;

use crate::search::ToolPrograms;

/// Runtime configuration, passed by reference to whatever needs it.
#[derive(Debug, Clone)]
pub struct Config {
    /// Vault root searched by the external tools
    pub base_directory: PathBuf,
    /// Search file contents instead of markdown file names
    pub full_text: bool,
    /// `find`-compatible program used for filename searches
    pub find_program: String,
    /// Custom content-search tool, invoked as `<tool> <base> <query> md`
    pub content_tool: Option<String>,
    /// Viewer command used to open documents
    pub opener: Option<String>,
    /// Free-text user preference carried over from the settings blob
    pub preference: String,
    /// Log format: "json" or anything else for human-readable
    pub log_format: String,
    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn flag(key: &str) -> bool {
    env::var(key)
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(false)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `VAULT_FIND_BASE_DIR` - Vault root (required unless given on the command line)
    /// - `VAULT_FIND_FULL_TEXT` - Search contents by default (default: false)
    /// - `VAULT_FIND_FIND_PROGRAM` - Filename search program (default: find)
    /// - `VAULT_FIND_CONTENT_TOOL` - Custom content search tool (default: grep)
    /// - `VAULT_FIND_OPENER` - Viewer command (default: platform opener)
    /// - `VAULT_FIND_PREFERENCE` - Free-text preference (default: "default")
    /// - `VAULT_FIND_LOG_FORMAT` - `json` for JSON logs (default: text)
    /// - `RUST_LOG` - Log level (default: warn)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with_base(None)
    }

    /// Like [`Config::from_env`], with an explicit vault root taking precedence.
    pub fn from_env_with_base(base_directory: Option<PathBuf>) -> Result<Self, ConfigError> {
        let base_directory = base_directory
            .or_else(|| non_empty("VAULT_FIND_BASE_DIR").map(PathBuf::from))
            .ok_or(ConfigError::MissingRequired("VAULT_FIND_BASE_DIR"))?;

        if !base_directory.is_dir() {
            return Err(ConfigError::NotADirectory(base_directory));
        }

        Ok(Config {
            base_directory,
            full_text: flag("VAULT_FIND_FULL_TEXT"),
            find_program: non_empty("VAULT_FIND_FIND_PROGRAM").unwrap_or_else(|| "find".to_string()),
            content_tool: non_empty("VAULT_FIND_CONTENT_TOOL"),
            opener: non_empty("VAULT_FIND_OPENER"),
            preference: env::var("VAULT_FIND_PREFERENCE").unwrap_or_else(|_| "default".to_string()),
            log_format: env::var("VAULT_FIND_LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()),
        })
    }

    /// Programs used to build the external tool invocations.
    pub fn tool_programs(&self) -> ToolPrograms {
        ToolPrograms {
            find_program: self.find_program.clone(),
            content_tool: self.content_tool.clone(),
        }
    }

    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0} (or pass --vault)")]
    MissingRequired(&'static str),

    #[error("Vault path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}
