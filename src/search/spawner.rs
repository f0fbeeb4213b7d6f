//! Process spawning seam between the orchestrator and the operating system.

use std::fmt;
use std::io;
use std::path::Path;

use tokio::sync::mpsc;

use crate::error::SearchError;

/// The role a spawned tool plays in a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    /// Filename-glob search for `*query*.pdf`.
    PdfGlob,
    /// Filename-glob search for `*query*.md`.
    MarkdownGlob,
    /// Content search over markdown files.
    ContentSearch,
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolKind::PdfGlob => write!(f, "pdf filename"),
            ToolKind::MarkdownGlob => write!(f, "markdown filename"),
            ToolKind::ContentSearch => write!(f, "content"),
        }
    }
}

/// A fully resolved external command: program plus argv, never run through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub kind: ToolKind,
    pub program: String,
    pub args: Vec<String>,
}

/// One event from a running tool.
///
/// A process emits any number of `Data` events followed by exactly one
/// terminal `Exit` or `Error`.
#[derive(Debug)]
pub enum ProcessEvent {
    /// One or more complete lines of standard output, without the trailing newline.
    Data(String),
    /// Standard output reached EOF and the process exited.
    Exit(Option<i32>),
    /// The process failed after starting.
    Error(io::Error),
}

/// Events tagged with the index of the process that produced them.
pub type ProcessSender = mpsc::UnboundedSender<(usize, ProcessEvent)>;

/// Launches external tools and forwards their events.
///
/// Implementations must return promptly: the process runs in the
/// background and reports through `events`, tagging every event with `slot`.
/// A failure to start is returned directly.
pub trait ProcessSpawner: Send + Sync {
    fn spawn(
        &self,
        invocation: &ToolInvocation,
        slot: usize,
        events: ProcessSender,
    ) -> Result<(), SearchError>;
}

/// Programs used to build tool invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPrograms {
    /// Filename-glob program, `find`-compatible.
    pub find_program: String,
    /// Custom content-search program invoked as `<tool> <base> <query> md`.
    /// `None` runs `find_program` with a `grep` test per file.
    pub content_tool: Option<String>,
}

impl Default for ToolPrograms {
    fn default() -> Self {
        Self {
            find_program: "find".to_string(),
            content_tool: None,
        }
    }
}

impl ToolPrograms {
    /// Filename-glob search for files named `*query*.<extension>`, case-insensitive.
    pub fn filename_glob(&self, kind: ToolKind, base: &Path, query: &str, extension: &str) -> ToolInvocation {
        let pattern = format!("*{}*.{}", escape_glob(query), extension);
        let mut args = find_prefix(base);
        args.extend(["-type", "f", "-iname", pattern.as_str(), "-print"].map(String::from));
        ToolInvocation {
            kind,
            program: self.find_program.clone(),
            args,
        }
    }

    /// Full-text search over markdown files under `base`.
    ///
    /// A file matches when its name contains the query (any case) or its
    /// contents contain the query verbatim. The default runs as one `find`
    /// process that only calls `grep` for files whose name did not match.
    pub fn content_search(&self, base: &Path, query: &str) -> ToolInvocation {
        if let Some(tool) = &self.content_tool {
            return ToolInvocation {
                kind: ToolKind::ContentSearch,
                program: tool.clone(),
                args: vec![base.display().to_string(), query.to_string(), "md".to_string()],
            };
        }

        let name = format!("*{}*", escape_glob(query));
        let mut args = find_prefix(base);
        args.extend(
            [
                "-type",
                "f",
                "-iname",
                "*.md",
                "(",
                "-iname",
                name.as_str(),
                "-o",
                "-exec",
                "grep",
                "-q",
                "-F",
                "-I",
                "-e",
                query,
                "{}",
                ";",
                ")",
                "-print",
            ]
            .map(String::from),
        );
        ToolInvocation {
            kind: ToolKind::ContentSearch,
            program: self.find_program.clone(),
            args,
        }
    }
}

/// `find <base>` with hidden entries below the root pruned, matching what
/// the vault lists as documents.
fn find_prefix(base: &Path) -> Vec<String> {
    let mut args = vec![base.display().to_string()];
    args.extend(["-mindepth", "1", "-name", ".*", "-prune", "-o"].map(String::from));
    args
}

/// Escapes glob metacharacters so `find -iname` matches the query literally.
pub fn escape_glob(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
