//! vault-find: quick search over a markdown/PDF notes vault.
//!
//! Runs `find` (and `grep` in full-text mode) against the vault, then opens
//! the single hit or offers a filterable list when there are several.
//!
//! # Environment Variables
//! - `VAULT_FIND_BASE_DIR` - Vault root (or `--vault`)
//! - `VAULT_FIND_FULL_TEXT` - Search contents by default (or `--full-text`)
//! - `VAULT_FIND_CONTENT_TOOL` - Custom content search tool
//! - `VAULT_FIND_OPENER` - Viewer command
//! - `VAULT_FIND_LOG_FORMAT` - `json` for JSON logs
//! - `RUST_LOG` - Log level (default: warn)

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vault_find::chooser::ConsoleChooser;
use vault_find::config::Config;
use vault_find::metrics;
use vault_find::resolver::PathResolver;
use vault_find::search::{Orchestrator, SearchMode, SystemSpawner};
use vault_find::session::QuickSearch;
use vault_find::vault::{
    CommandOpener, ConsoleNotifier, DocumentOpener, FsVault, Notifier, PrintOpener,
};

#[derive(Debug, Parser)]
#[command(name = "vault-find", version, about = "Quick search over a notes vault")]
struct Cli {
    /// Text to look for in file names (and contents with --full-text)
    query: String,

    /// Vault root directory
    #[arg(long, env = "VAULT_FIND_BASE_DIR")]
    vault: Option<PathBuf>,

    /// Search markdown file contents, not just titles
    #[arg(long)]
    full_text: bool,

    /// Print the chosen document's path instead of opening it
    #[arg(long)]
    print: bool,

    /// Print all results as JSON and exit without opening anything
    #[arg(long, conflicts_with = "print")]
    json: bool,

    /// Print Prometheus metrics to stderr before exiting
    #[arg(long)]
    emit_metrics: bool,
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<bool> {
    let mode = SearchMode::from_full_text(cli.full_text || config.full_text);
    let orchestrator = Orchestrator::new(Arc::new(SystemSpawner::new()), config.tool_programs());

    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);
    let opener: Arc<dyn DocumentOpener> = if cli.print {
        Arc::new(PrintOpener)
    } else {
        let program = config
            .opener
            .clone()
            .unwrap_or_else(|| CommandOpener::default_program().to_string());
        Arc::new(CommandOpener::new(program, &config.base_directory))
    };
    let resolver = PathResolver::new(
        Arc::new(FsVault::new(&config.base_directory)),
        opener,
        Arc::clone(&notifier),
    );
    let session = QuickSearch::new(
        &config.base_directory,
        orchestrator,
        resolver,
        notifier,
        Arc::new(ConsoleChooser::stdio()),
    );

    if cli.json {
        let results = match session.results(&cli.query, mode).await {
            Ok(results) => results,
            Err(e) => {
                eprintln!("vault-find: {}", e);
                return Ok(false);
            }
        };
        let json = serde_json::to_string_pretty(&results).context("Failed to encode results")?;
        println!("{}", json);
        return Ok(true);
    }

    let outcome = session.submit(&cli.query, mode).await;
    debug!(?outcome, "Search finished");
    // Failures have already been reported through the notifier.
    Ok(outcome.is_success())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_env_with_base(cli.vault.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("vault-find: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config);
    debug!(
        vault = %config.base_directory.display(),
        full_text = config.full_text,
        preference = %config.preference,
        "Configuration loaded"
    );

    let metrics_handle = if cli.emit_metrics {
        match metrics::init_metrics() {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!(error = %e, "Failed to install metrics recorder");
                None
            }
        }
    } else {
        None
    };

    let result = run(cli, config).await;

    if let Some(handle) = metrics_handle {
        eprint!("{}", handle.render());
    }

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!(error = %e, "vault-find failed");
            eprintln!("vault-find: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
