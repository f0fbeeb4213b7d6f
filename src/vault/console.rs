//! Terminal implementations of the host actions.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{info, warn};

use super::{Document, DocumentOpener, Notifier};

/// Writes notices to stderr, one per line.
#[derive(Debug, Default, Clone)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notice(&self, message: &str) {
        info!(notice = %message, "Notice");
        eprintln!("{}", message);
    }
}

/// Prints the resolved document location to stdout instead of opening it.
#[derive(Debug, Default, Clone)]
pub struct PrintOpener;

impl DocumentOpener for PrintOpener {
    fn open(&self, document: &Document) {
        let location = document
            .location
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| document.path.clone());
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", location) {
            warn!(error = %e, "Failed to write document path");
        }
    }
}

/// Opens documents with an external viewer command (`xdg-open`, `open`, ...).
///
/// The viewer is started detached; its exit status is not awaited.
#[derive(Debug, Clone)]
pub struct CommandOpener {
    program: String,
    vault_root: PathBuf,
}

impl CommandOpener {
    pub fn new(program: impl Into<String>, vault_root: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            vault_root: vault_root.into(),
        }
    }

    /// Platform default viewer command.
    pub fn default_program() -> &'static str {
        if cfg!(target_os = "macos") {
            "open"
        } else if cfg!(target_os = "windows") {
            "explorer"
        } else {
            "xdg-open"
        }
    }

    fn target(&self, document: &Document) -> PathBuf {
        document
            .location
            .clone()
            .unwrap_or_else(|| self.vault_root.join(&document.path))
    }
}

impl DocumentOpener for CommandOpener {
    fn open(&self, document: &Document) {
        let target = self.target(document);
        match Command::new(&self.program)
            .arg(&target)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(_) => info!(program = %self.program, path = %target.display(), "Opened document"),
            Err(e) => warn!(
                program = %self.program,
                path = %target.display(),
                error = %e,
                "Failed to launch document viewer"
            ),
        }
    }
}
