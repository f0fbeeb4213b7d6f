//! Real subprocess spawner backed by `tokio::process`.

use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{ChildStderr, Command};
use tracing::{debug, warn};

use super::spawner::{ProcessEvent, ProcessSender, ProcessSpawner, ToolInvocation, ToolKind};
use crate::error::SearchError;

/// Spawns external tools as OS processes.
///
/// Each process gets its own reader task that forwards stdout line by line,
/// decoded lossily.
/// Processes are not killed when the search that launched them gives up;
/// they run to completion and their remaining output is discarded.
#[derive(Debug, Default, Clone)]
pub struct SystemSpawner;

impl SystemSpawner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessSpawner for SystemSpawner {
    fn spawn(
        &self,
        invocation: &ToolInvocation,
        slot: usize,
        events: ProcessSender,
    ) -> Result<(), SearchError> {
        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(false)
            .spawn()
            .map_err(|source| SearchError::Spawn {
                tool: invocation.kind,
                program: invocation.program.clone(),
                source,
            })?;

        debug!(
            tool = %invocation.kind,
            program = %invocation.program,
            args = ?invocation.args,
            pid = ?child.id(),
            "Spawned search tool"
        );

        let kind = invocation.kind;
        let stdout = child.stdout.take();
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(log_stderr(kind, stderr));
        }

        tokio::spawn(async move {
            if let Some(stdout) = stdout {
                // Paths are bytes on unix; split on raw newlines so a name
                // that is not UTF-8 cannot fail the whole read.
                let mut segments = BufReader::new(stdout).split(b'\n');
                loop {
                    match segments.next_segment().await {
                        Ok(Some(segment)) => {
                            // Receiver may be gone after another tool failed.
                            let _ = events.send((slot, ProcessEvent::Data(decode_line(&segment))));
                        }
                        Ok(None) => break,
                        Err(e) => {
                            let _ = events.send((slot, ProcessEvent::Error(e)));
                            return;
                        }
                    }
                }
            }

            match child.wait().await {
                Ok(status) => {
                    if !status.success() {
                        debug!(tool = %kind, status = ?status.code(), "Search tool exited with non-zero status");
                    }
                    let _ = events.send((slot, ProcessEvent::Exit(status.code())));
                }
                Err(e) => {
                    warn!(tool = %kind, error = %e, "Failed to wait for search tool");
                    let _ = events.send((slot, ProcessEvent::Error(e)));
                }
            }
        });

        Ok(())
    }
}

/// One stdout line as text, invalid UTF-8 replaced with U+FFFD.
fn decode_line(segment: &[u8]) -> String {
    let segment = segment.strip_suffix(b"\r").unwrap_or(segment);
    String::from_utf8_lossy(segment).into_owned()
}

async fn log_stderr(kind: ToolKind, stderr: ChildStderr) {
    let mut lines = BufReader::new(stderr).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        debug!(tool = %kind, stderr = %line, "Search tool diagnostic");
    }
}
