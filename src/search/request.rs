//! Request and result types shared by the orchestrator and the session.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Which tool handles the markdown half of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Match markdown file contents as well as titles.
    ContentAndTitle,
    /// Match markdown file names only.
    #[default]
    TitleOnly,
}

impl SearchMode {
    pub fn from_full_text(full_text: bool) -> Self {
        if full_text {
            SearchMode::ContentAndTitle
        } else {
            SearchMode::TitleOnly
        }
    }

    pub fn is_full_text(self) -> bool {
        self == SearchMode::ContentAndTitle
    }
}

/// One user submission. Immutable for the lifetime of a search.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub base_directory: PathBuf,
    pub query: String,
    pub mode: SearchMode,
}

impl SearchRequest {
    pub fn new(base_directory: impl Into<PathBuf>, query: impl Into<String>, mode: SearchMode) -> Self {
        Self {
            base_directory: base_directory.into(),
            query: query.into(),
            mode,
        }
    }
}

/// A single path emitted by an external search tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub path: String,
}

impl SearchResult {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Final path component of the result.
    pub fn basename(&self) -> &str {
        basename(&self.path)
    }

    /// Display label for the choice list: the basename, minus a trailing
    /// `.md` (any case). Other extensions are left alone.
    pub fn label(&self) -> &str {
        let name = self.basename();
        let split = name.len().saturating_sub(3);
        match (name.get(..split), name.get(split..)) {
            (Some(stem), Some(ext)) if !stem.is_empty() && ext.eq_ignore_ascii_case(".md") => stem,
            _ => name,
        }
    }
}

/// Final component of `path`, or `path` itself when it has none.
pub fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    Path::new(trimmed)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(trimmed)
}

/// Splits combined tool output into results, dropping empty lines.
pub fn split_results(output: &str) -> Vec<SearchResult> {
    output
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(SearchResult::new)
        .collect()
}
