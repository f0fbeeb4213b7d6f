//! Dual-process search orchestration.
//!
//! Every search launches a filename-glob search for PDFs alongside either a
//! content search or a filename-glob search for markdown files. Both run
//! concurrently and feed a single channel; the orchestrator task owns the
//! accumulator, so no locking is needed even on a multi-threaded runtime.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use super::request::{SearchMode, SearchRequest};
use super::spawner::{ProcessEvent, ProcessSpawner, ToolInvocation, ToolKind, ToolPrograms};
use crate::error::SearchError;
use crate::metrics;

/// Runs the external tools for a request and merges their output.
pub struct Orchestrator {
    spawner: Arc<dyn ProcessSpawner>,
    programs: ToolPrograms,
}

impl Orchestrator {
    pub fn new(spawner: Arc<dyn ProcessSpawner>, programs: ToolPrograms) -> Self {
        Self { spawner, programs }
    }

    /// Tool invocations for `request`, PDF search first.
    pub fn plan(&self, request: &SearchRequest) -> Vec<ToolInvocation> {
        let base = request.base_directory.as_path();
        let query = request.query.as_str();
        let pdf = self.programs.filename_glob(ToolKind::PdfGlob, base, query, "pdf");
        let markdown = match request.mode {
            SearchMode::ContentAndTitle => self.programs.content_search(base, query),
            SearchMode::TitleOnly => self.programs.filename_glob(ToolKind::MarkdownGlob, base, query, "md"),
        };
        vec![pdf, markdown]
    }

    /// Runs every planned tool and returns their combined output.
    ///
    /// Lines appear in arrival order across processes, which is not stable
    /// between runs. Resolves only after every process has exited; the first
    /// process error aborts the search without waiting for the others.
    #[instrument(skip(self, request), fields(query = %request.query, full_text = request.mode.is_full_text()))]
    pub async fn search(&self, request: &SearchRequest) -> Result<String, SearchError> {
        let start = Instant::now();
        metrics::increment_search_count();

        let result = self.run(request).await;

        let took_ms = start.elapsed().as_millis() as u64;
        metrics::record_search_latency(took_ms as f64);
        match &result {
            Ok(output) => info!(took_ms, bytes = output.len(), "Search completed"),
            Err(e) => {
                metrics::increment_search_errors();
                warn!(took_ms, error = %e, "Search failed");
            }
        }
        result
    }

    async fn run(&self, request: &SearchRequest) -> Result<String, SearchError> {
        if request.query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        if !request.base_directory.is_dir() {
            return Err(SearchError::InvalidBaseDirectory(
                request.base_directory.display().to_string(),
            ));
        }

        let invocations = self.plan(request);
        let (tx, mut rx) = mpsc::unbounded_channel();
        for (slot, invocation) in invocations.iter().enumerate() {
            self.spawner.spawn(invocation, slot, tx.clone())?;
        }
        // Only the spawned tasks hold senders now, so a closed channel means
        // every process has stopped reporting.
        drop(tx);

        let mut finished = vec![false; invocations.len()];
        let mut received_any = false;
        let mut output = String::new();

        while !finished.iter().all(|done| *done) {
            let Some((slot, event)) = rx.recv().await else {
                let slot = finished.iter().position(|done| !done).unwrap_or(0);
                return Err(SearchError::ProcessVanished {
                    tool: invocations[slot].kind,
                });
            };
            let tool = invocations[slot].kind;

            match event {
                ProcessEvent::Data(chunk) => {
                    received_any = true;
                    output.push_str(&chunk);
                    output.push('\n');
                }
                ProcessEvent::Exit(code) => {
                    debug!(%tool, ?code, "Search tool finished");
                    finished[slot] = true;
                }
                ProcessEvent::Error(source) => {
                    return Err(SearchError::Process { tool, source });
                }
            }
        }

        if received_any && output.ends_with('\n') {
            output.pop();
        }
        Ok(output)
    }
}
