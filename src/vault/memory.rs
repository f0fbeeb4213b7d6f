//! In-memory document collection.

use super::{Document, DocumentLister};

/// A fixed set of documents, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVault {
    documents: Vec<Document>,
}

impl InMemoryVault {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            documents: paths.into_iter().map(Document::new).collect(),
        }
    }
}

impl DocumentLister for InMemoryVault {
    fn documents(&self) -> Vec<Document> {
        self.documents.clone()
    }
}
