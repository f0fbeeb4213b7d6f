//! Host-side collaborators: the document collection and user-facing actions.
//!
//! The resolver and session only see these traits. Implementations:
//! - `FsVault` - Documents found by walking the vault directory
//! - `InMemoryVault` - A fixed document list for testing
//! - `ConsoleNotifier`, `CommandOpener`, `PrintOpener` - Terminal front end

mod console;
mod fs;
mod memory;

use std::path::PathBuf;

pub use console::{CommandOpener, ConsoleNotifier, PrintOpener};
pub use fs::FsVault;
pub use memory::InMemoryVault;

/// A document known to the host, addressed by its vault-relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Path relative to the vault root, using `/` separators.
    pub path: String,
    /// Location on disk, when the document is backed by a file.
    pub location: Option<PathBuf>,
}

impl Document {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// Read-only listing of every document the host knows about.
pub trait DocumentLister: Send + Sync {
    fn documents(&self) -> Vec<Document>;
}

/// Opens a resolved document in a new view.
pub trait DocumentOpener: Send + Sync {
    fn open(&self, document: &Document);
}

/// Fire-and-forget user-visible message.
pub trait Notifier: Send + Sync {
    fn notice(&self, message: &str);
}
