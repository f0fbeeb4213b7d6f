//! Maps a path emitted by a search tool back to a known document.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::SearchError;
use crate::search::basename;
use crate::vault::{Document, DocumentLister, DocumentOpener, Notifier};

/// Resolves tool output paths against the document collection and opens them.
///
/// Tools report paths relative to whatever root they were run from, so
/// matching is by basename suffix rather than exact path.
#[derive(Clone)]
pub struct PathResolver {
    lister: Arc<dyn DocumentLister>,
    opener: Arc<dyn DocumentOpener>,
    notifier: Arc<dyn Notifier>,
}

impl PathResolver {
    pub fn new(
        lister: Arc<dyn DocumentLister>,
        opener: Arc<dyn DocumentOpener>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            lister,
            opener,
            notifier,
        }
    }

    /// First document whose path ends with the basename of `path`.
    pub fn resolve(&self, path: &str) -> Result<Document, SearchError> {
        let name = basename(path);
        let documents = self.lister.documents();
        debug!(basename = %name, candidates = documents.len(), "Resolving search result");

        documents
            .into_iter()
            .find(|doc| doc.path.ends_with(name))
            .ok_or_else(|| SearchError::NoMatch(name.to_string()))
    }

    /// Opens the document matching `path`, or shows a not-found notice.
    pub fn open_by_path(&self, path: &str) -> Option<Document> {
        match self.resolve(path) {
            Ok(document) => {
                info!(path = %document.path, "Opening document");
                self.opener.open(&document);
                Some(document)
            }
            Err(e) => {
                self.notifier.notice(&e.to_string());
                None
            }
        }
    }
}
