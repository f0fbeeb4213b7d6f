//! Vault search over external command-line tools.
//!
//! This module provides the orchestrator plus the `ProcessSpawner` seam and
//! its implementations:
//! - `SystemSpawner` - Real subprocesses via `tokio::process`
//! - `ScriptedSpawner` - Replays scripted output for testing

pub mod mock;
mod orchestrator;
mod request;
mod spawner;
mod system;

pub use mock::{ScriptStep, ScriptedSpawner};
pub use orchestrator::Orchestrator;
pub use request::{basename, split_results, SearchMode, SearchRequest, SearchResult};
pub use spawner::{
    escape_glob, ProcessEvent, ProcessSender, ProcessSpawner, ToolInvocation, ToolKind, ToolPrograms,
};
pub use system::SystemSpawner;
