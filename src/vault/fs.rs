//! Filesystem-backed document listing.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use super::{Document, DocumentLister};

/// Extensions treated as vault documents.
const DOCUMENT_EXTENSIONS: &[&str] = &["md", "pdf"];

/// Lists markdown and PDF files under the vault root.
///
/// Hidden entries (such as `.obsidian`, `.git` or `.trash`) are skipped, the
/// same set the search tools prune. The
/// directory is walked on every call so the listing reflects the current
/// state of the vault.
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| DOCUMENT_EXTENSIONS.iter().any(|d| ext.eq_ignore_ascii_case(d)))
        .unwrap_or(false)
}

impl DocumentLister for FsVault {
    fn documents(&self) -> Vec<Document> {
        let mut documents = Vec::new();

        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_hidden(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable vault entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_document(entry.path()) {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let path = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            documents.push(Document::new(path).with_location(entry.path()));
        }

        debug!(root = %self.root.display(), count = documents.len(), "Listed vault documents");
        documents
    }
}
