//! Scripted spawner for exercising the orchestrator without real processes.

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::info;

use super::spawner::{ProcessEvent, ProcessSender, ProcessSpawner, ToolInvocation, ToolKind};
use crate::error::SearchError;

/// One step of a scripted process.
#[derive(Debug, Clone)]
pub enum ScriptStep {
    Sleep(Duration),
    Data(String),
    Exit(Option<i32>),
    Error(String),
}

/// Spawner that replays a fixed script per tool kind.
///
/// Tool kinds without a script behave like a tool that finds nothing and
/// exits cleanly. Kinds registered with [`ScriptedSpawner::fail_to_start`]
/// return a spawn error.
#[derive(Default)]
pub struct ScriptedSpawner {
    scripts: HashMap<ToolKind, Vec<ScriptStep>>,
    unstartable: Vec<ToolKind>,
    spawned: AtomicUsize,
    invocations: Mutex<Vec<ToolInvocation>>,
}

impl ScriptedSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the script played when a tool of `kind` is spawned.
    pub fn script(mut self, kind: ToolKind, steps: Vec<ScriptStep>) -> Self {
        self.scripts.insert(kind, steps);
        self
    }

    /// Convenience script: emit each line after `delay`, then exit with 0.
    pub fn lines(self, kind: ToolKind, lines: &[&str], delay: Duration) -> Self {
        let mut steps = Vec::with_capacity(lines.len() * 2 + 1);
        for line in lines {
            steps.push(ScriptStep::Sleep(delay));
            steps.push(ScriptStep::Data(line.to_string()));
        }
        steps.push(ScriptStep::Exit(Some(0)));
        self.script(kind, steps)
    }

    pub fn fail_to_start(mut self, kind: ToolKind) -> Self {
        self.unstartable.push(kind);
        self
    }

    /// Number of processes successfully started so far.
    pub fn spawn_count(&self) -> usize {
        self.spawned.load(Ordering::SeqCst)
    }

    /// Every invocation seen, including ones that failed to start.
    pub fn invocations(&self) -> Vec<ToolInvocation> {
        self.invocations
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_default()
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl ProcessSpawner for ScriptedSpawner {
    fn spawn(
        &self,
        invocation: &ToolInvocation,
        slot: usize,
        events: ProcessSender,
    ) -> Result<(), SearchError> {
        if let Ok(mut seen) = self.invocations.lock() {
            seen.push(invocation.clone());
        }

        if self.unstartable.contains(&invocation.kind) {
            return Err(SearchError::Spawn {
                tool: invocation.kind,
                program: invocation.program.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "scripted spawn failure"),
            });
        }

        self.spawned.fetch_add(1, Ordering::SeqCst);
        let steps = self
            .scripts
            .get(&invocation.kind)
            .cloned()
            .unwrap_or_else(|| vec![ScriptStep::Exit(Some(0))]);

        info!(tool = %invocation.kind, steps = steps.len(), "Playing scripted search tool");

        tokio::spawn(async move {
            for step in steps {
                let event = match step {
                    ScriptStep::Sleep(delay) => {
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    ScriptStep::Data(chunk) => ProcessEvent::Data(chunk),
                    ScriptStep::Exit(code) => ProcessEvent::Exit(code),
                    ScriptStep::Error(msg) => ProcessEvent::Error(io::Error::other(msg)),
                };
                // Late events after the orchestrator gave up are dropped.
                let _ = events.send((slot, event));
            }
        });

        Ok(())
    }
}
