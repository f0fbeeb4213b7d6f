//! End-to-end submission flows with scripted search tools.
//!
//! These tests wire the session exactly as the binary does, but swap the
//! OS processes for `ScriptedSpawner` and the vault for `InMemoryVault`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use vault_find::resolver::PathResolver;
use vault_find::search::{Orchestrator, ScriptStep, ScriptedSpawner, SearchMode, SearchResult, ToolKind, ToolPrograms};
use vault_find::session::{Chooser, QuickSearch, SearchOutcome};
use vault_find::vault::{Document, DocumentOpener, InMemoryVault, Notifier};

/// Records everything the session asks the host to do.
#[derive(Default)]
struct Host {
    opened: Mutex<Vec<String>>,
    notices: Mutex<Vec<String>>,
    offered: Mutex<Vec<Vec<String>>>,
    pick: Option<usize>,
}

impl Host {
    fn picking(index: usize) -> Self {
        Self {
            pick: Some(index),
            ..Self::default()
        }
    }

    fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }

    fn offered(&self) -> Vec<Vec<String>> {
        self.offered.lock().unwrap().clone()
    }
}

impl DocumentOpener for Host {
    fn open(&self, document: &Document) {
        self.opened.lock().unwrap().push(document.path.clone());
    }
}

impl Notifier for Host {
    fn notice(&self, message: &str) {
        self.notices.lock().unwrap().push(message.to_string());
    }
}

#[async_trait]
impl Chooser for Host {
    async fn choose(&self, placeholder: &str, results: &[SearchResult]) -> Option<usize> {
        assert!(placeholder.contains("Showing results below"));
        self.offered
            .lock()
            .unwrap()
            .push(results.iter().map(|r| r.path.clone()).collect());
        self.pick
    }
}

struct Fixture {
    _vault_dir: TempDir,
    session: QuickSearch,
    spawner: Arc<ScriptedSpawner>,
    host: Arc<Host>,
}

fn fixture(spawner: ScriptedSpawner, host: Host, documents: &[&str]) -> Fixture {
    let vault_dir = tempfile::tempdir().expect("temp vault");
    let spawner = spawner.into_shared();
    let host = Arc::new(host);

    let resolver = PathResolver::new(
        Arc::new(InMemoryVault::new(documents.iter().copied())),
        host.clone(),
        host.clone(),
    );
    let session = QuickSearch::new(
        vault_dir.path(),
        Orchestrator::new(spawner.clone(), ToolPrograms::default()),
        resolver,
        host.clone(),
        host.clone(),
    );

    Fixture {
        _vault_dir: vault_dir,
        session,
        spawner,
        host,
    }
}

const DOCS: &[&str] = &["Notes/Alpha.md", "Notes/Beta.md", "Papers/Alpha Survey.pdf"];

#[tokio::test]
async fn test_empty_query_spawns_nothing_and_notifies() {
    let f = fixture(ScriptedSpawner::new(), Host::default(), DOCS);

    let outcome = f.session.submit("", SearchMode::TitleOnly).await;

    assert!(matches!(outcome, SearchOutcome::EmptyQuery));
    assert_eq!(f.spawner.spawn_count(), 0);
    assert!(f.spawner.invocations().is_empty());
    assert_eq!(f.host.notices(), vec!["Please enter a query."]);
}

#[tokio::test]
async fn test_zero_results_opens_nothing_and_offers_nothing() {
    let f = fixture(ScriptedSpawner::new(), Host::picking(0), DOCS);

    let outcome = f.session.submit("zeta", SearchMode::TitleOnly).await;

    assert!(matches!(outcome, SearchOutcome::NoResults));
    assert_eq!(f.spawner.spawn_count(), 2);
    assert!(f.host.opened().is_empty());
    assert!(f.host.offered().is_empty());
    assert!(f
        .host
        .notices()
        .contains(&"Found 0 results for \"zeta\".".to_string()));
}

#[tokio::test]
async fn test_single_result_opens_directly() {
    let spawner = ScriptedSpawner::new().lines(
        ToolKind::MarkdownGlob,
        &["/home/me/vault/Notes/Beta.md"],
        Duration::ZERO,
    );
    let f = fixture(spawner, Host::picking(0), DOCS);

    let outcome = f.session.submit("Beta", SearchMode::TitleOnly).await;

    match outcome {
        SearchOutcome::Opened(doc) => assert_eq!(doc.path, "Notes/Beta.md"),
        other => panic!("expected Opened, got {other:?}"),
    }
    assert_eq!(f.host.opened(), vec!["Notes/Beta.md"]);
    assert!(f.host.offered().is_empty());
}

#[tokio::test]
async fn test_many_results_go_through_chooser() {
    let spawner = ScriptedSpawner::new()
        .lines(ToolKind::PdfGlob, &["/v/Papers/Alpha Survey.pdf"], Duration::from_millis(2))
        .lines(ToolKind::MarkdownGlob, &["/v/Notes/Alpha.md"], Duration::ZERO);
    let f = fixture(spawner, Host::default(), DOCS);

    // Order across tools is not fixed, so pick by looking at what was offered.
    let outcome = f.session.submit("Alpha", SearchMode::TitleOnly).await;
    assert!(matches!(outcome, SearchOutcome::Cancelled));

    let offered = f.host.offered();
    assert_eq!(offered.len(), 1);
    let mut paths = offered[0].clone();
    paths.sort();
    assert_eq!(paths, vec!["/v/Notes/Alpha.md", "/v/Papers/Alpha Survey.pdf"]);
    assert!(f.host.opened().is_empty());
}

#[tokio::test]
async fn test_chosen_entry_is_resolved_and_opened() {
    let spawner = ScriptedSpawner::new()
        .lines(ToolKind::PdfGlob, &["/v/Papers/Alpha Survey.pdf"], Duration::from_millis(20))
        .lines(ToolKind::ContentSearch, &["/v/Notes/Alpha.md", "/v/Notes/Beta.md"], Duration::ZERO);
    let f = fixture(spawner, Host::picking(1), DOCS);

    let outcome = f.session.submit("Alpha", SearchMode::ContentAndTitle).await;

    let offered = f.host.offered();
    assert_eq!(offered[0].len(), 3);
    let expected = vault_find::search::basename(&offered[0][1]).to_string();
    match outcome {
        SearchOutcome::Opened(doc) => assert!(doc.path.ends_with(&expected)),
        other => panic!("expected Opened, got {other:?}"),
    }
    assert_eq!(f.host.opened().len(), 1);
}

#[tokio::test]
async fn test_unknown_result_reports_not_found() {
    let spawner = ScriptedSpawner::new().lines(ToolKind::MarkdownGlob, &["/elsewhere/Gamma.md"], Duration::ZERO);
    let f = fixture(spawner, Host::default(), DOCS);

    let outcome = f.session.submit("Gamma", SearchMode::TitleOnly).await;

    assert!(matches!(outcome, SearchOutcome::NotFound(ref name) if name == "Gamma.md"));
    assert!(f.host.opened().is_empty());
    assert!(f
        .host
        .notices()
        .contains(&"Couldn't find selected file Gamma.md in the vault.".to_string()));
}

#[tokio::test]
async fn test_tool_failure_is_reported_to_user() {
    let spawner = ScriptedSpawner::new()
        .script(ToolKind::ContentSearch, vec![ScriptStep::Error("grep exploded".into())])
        .lines(ToolKind::PdfGlob, &["/v/Papers/Alpha Survey.pdf"], Duration::from_millis(20));
    let f = fixture(spawner, Host::picking(0), DOCS);

    let outcome = f.session.submit("Alpha", SearchMode::ContentAndTitle).await;

    match outcome {
        SearchOutcome::Failed(e) => assert!(e.is_tool_failure()),
        other => panic!("expected Failed, got {other:?}"),
    }
    assert!(f.host.opened().is_empty());
    assert!(f
        .host
        .notices()
        .iter()
        .any(|n| n.starts_with("Search for \"Alpha\" failed") && n.contains("grep exploded")));
}

#[tokio::test]
async fn test_missing_tool_is_reported_to_user() {
    let spawner = ScriptedSpawner::new().fail_to_start(ToolKind::PdfGlob);
    let f = fixture(spawner, Host::default(), DOCS);

    let outcome = f.session.submit("Alpha", SearchMode::TitleOnly).await;

    assert!(matches!(outcome, SearchOutcome::Failed(_)));
    assert!(f.host.notices().iter().any(|n| n.contains("Failed to start")));
}

#[tokio::test]
async fn test_results_without_opening() {
    let spawner = ScriptedSpawner::new()
        .lines(ToolKind::PdfGlob, &["a.pdf"], Duration::ZERO)
        .lines(ToolKind::MarkdownGlob, &["b.md", "c.md"], Duration::ZERO);
    let f = fixture(spawner, Host::default(), DOCS);

    let mut results: Vec<_> = f
        .session
        .results("x", SearchMode::TitleOnly)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.path)
        .collect();
    results.sort();

    assert_eq!(results, vec!["a.pdf", "b.md", "c.md"]);
    assert!(f.host.notices().is_empty());
    assert!(f.host.opened().is_empty());
}

#[tokio::test]
async fn test_query_reaches_tool_arguments() {
    let f = fixture(ScriptedSpawner::new(), Host::default(), DOCS);

    f.session.submit("well-posed", SearchMode::ContentAndTitle).await;

    let invocations = f.spawner.invocations();
    assert_eq!(invocations.len(), 2);
    assert_eq!(invocations[0].kind, ToolKind::PdfGlob);
    assert!(invocations[0].args.contains(&"*well-posed*.pdf".to_string()));
    assert_eq!(invocations[1].kind, ToolKind::ContentSearch);
    assert!(invocations[1].args.contains(&"well-posed".to_string()));
}
