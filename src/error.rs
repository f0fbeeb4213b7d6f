//! Error types for vault searches.

use std::io;

use crate::search::ToolKind;

/// Errors that can end a single search invocation.
///
/// None of these are fatal for the process as a whole; each one aborts only
/// the search that produced it.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Please enter a query.")]
    EmptyQuery,

    #[error("Vault directory is not a readable directory: {0}")]
    InvalidBaseDirectory(String),

    #[error("Failed to start {tool} search ({program}): {source}")]
    Spawn {
        tool: ToolKind,
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{tool} search failed: {source}")]
    Process {
        tool: ToolKind,
        #[source]
        source: io::Error,
    },

    #[error("{tool} search stopped reporting before it exited")]
    ProcessVanished { tool: ToolKind },

    #[error("Couldn't find selected file {0} in the vault.")]
    NoMatch(String),
}

impl SearchError {
    /// Whether the error came from an external search tool rather than user input.
    pub fn is_tool_failure(&self) -> bool {
        matches!(
            self,
            SearchError::Spawn { .. } | SearchError::Process { .. } | SearchError::ProcessVanished { .. }
        )
    }
}
