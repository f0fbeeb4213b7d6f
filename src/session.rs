//! Query submission flow: run the search, then open or offer a choice.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use frizbee::{match_list, Config};
use tracing::{info, warn};

use crate::error::SearchError;
use crate::resolver::PathResolver;
use crate::search::{split_results, Orchestrator, SearchMode, SearchRequest, SearchResult};
use crate::vault::{Document, Notifier};

/// Presents several results and returns the index of the chosen one.
#[async_trait]
pub trait Chooser: Send + Sync {
    /// `None` means the user dismissed the list.
    async fn choose(&self, placeholder: &str, results: &[SearchResult]) -> Option<usize>;
}

/// How a submission ended.
#[derive(Debug)]
pub enum SearchOutcome {
    EmptyQuery,
    Failed(SearchError),
    NoResults,
    Opened(Document),
    NotFound(String),
    Cancelled,
}

impl SearchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SearchOutcome::Opened(_) | SearchOutcome::NoResults)
    }
}

/// Results whose label fuzzy-matches `filter`, best match first.
///
/// Every filter character must appear in the label in order (ignoring case);
/// ties keep the original result order. A blank filter keeps everything.
pub fn filter_results<'a>(results: &'a [SearchResult], filter: &str) -> Vec<(usize, &'a SearchResult)> {
    let needle = filter.trim();
    if needle.is_empty() {
        return results.iter().enumerate().collect();
    }

    let labels: Vec<&str> = results.iter().map(|r| r.label()).collect();
    let config = Config {
        prefilter: true,
        max_typos: Some(0),
        ..Config::default()
    };
    let mut scored: Vec<(u16, usize)> = match_list(needle, &labels, &config)
        .into_iter()
        .filter(|entry| entry.score > 0)
        .map(|entry| (entry.score, entry.index as usize))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

    scored.into_iter().map(|(_, index)| (index, &results[index])).collect()
}

/// One quick-search surface bound to a vault.
pub struct QuickSearch {
    base_directory: PathBuf,
    orchestrator: Orchestrator,
    resolver: PathResolver,
    notifier: Arc<dyn Notifier>,
    chooser: Arc<dyn Chooser>,
}

impl QuickSearch {
    pub fn new(
        base_directory: impl Into<PathBuf>,
        orchestrator: Orchestrator,
        resolver: PathResolver,
        notifier: Arc<dyn Notifier>,
        chooser: Arc<dyn Chooser>,
    ) -> Self {
        Self {
            base_directory: base_directory.into(),
            orchestrator,
            resolver,
            notifier,
            chooser,
        }
    }

    /// Runs the search and returns the merged results without opening anything.
    pub async fn results(&self, query: &str, mode: SearchMode) -> Result<Vec<SearchResult>, SearchError> {
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        let request = SearchRequest::new(self.base_directory.clone(), query, mode);
        let output = self.orchestrator.search(&request).await?;
        Ok(split_results(&output))
    }

    /// Full submission: search, report the count, then open directly or via the chooser.
    pub async fn submit(&self, query: &str, mode: SearchMode) -> SearchOutcome {
        if query.is_empty() {
            self.notifier.notice(&SearchError::EmptyQuery.to_string());
            return SearchOutcome::EmptyQuery;
        }

        self.notifier.notice(&format!("Searching for \"{}\" ...", query));

        let results = match self.results(query, mode).await {
            Ok(results) => results,
            Err(e) => {
                warn!(query = %query, error = %e, "Search failed");
                self.notifier
                    .notice(&format!("Search for \"{}\" failed: {}", query, e));
                return SearchOutcome::Failed(e);
            }
        };

        info!(query = %query, results = results.len(), "Search returned");
        self.notifier
            .notice(&format!("Found {} results for \"{}\".", results.len(), query));

        match results.as_slice() {
            [] => {
                info!(query = %query, "No results");
                SearchOutcome::NoResults
            }
            [only] => self.open(only),
            many => {
                let placeholder = format!("Showing results below for \"{}\".", query);
                match self.chooser.choose(&placeholder, many).await {
                    Some(index) => match many.get(index) {
                        Some(chosen) => self.open(chosen),
                        None => {
                            warn!(index, "Chooser returned an out-of-range index");
                            SearchOutcome::Cancelled
                        }
                    },
                    None => SearchOutcome::Cancelled,
                }
            }
        }
    }

    fn open(&self, result: &SearchResult) -> SearchOutcome {
        match self.resolver.open_by_path(&result.path) {
            Some(document) => SearchOutcome::Opened(document),
            None => SearchOutcome::NotFound(result.basename().to_string()),
        }
    }
}
