//! Dispatch service
//!
//! Runs a pipeline invocation as a child process and captures its output.
//! The watcher never retries or times out a dispatch: once started, the
//! subprocess runs until the pipeline exits on its own.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use routine_qc_core::PipelineInvocation;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Errors that prevent a dispatch from producing an outcome
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The runner executable could not be started or waited on
    #[error("Failed to run '{program}' for run {run_id}: {source}")]
    Spawn {
        program: String,
        run_id: String,
        #[source]
        source: std::io::Error,
    },
}

impl DispatchError {
    /// Whether the runner executable could not be found
    pub fn is_runner_missing(&self) -> bool {
        match self {
            Self::Spawn { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
        }
    }
}

/// Result of a finished pipeline subprocess
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub run_id: String,

    /// Exit code, or None if the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl DispatchOutcome {
    /// Wall-clock time the subprocess ran for
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Service trait for dispatching pipeline invocations
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Runs one invocation to completion
    ///
    /// A non-zero exit is reported through the outcome, not as an error.
    async fn dispatch(
        &self,
        invocation: PipelineInvocation,
    ) -> Result<DispatchOutcome, DispatchError>;
}

/// Dispatcher that runs each invocation as a local subprocess
#[derive(Debug, Default)]
pub struct ProcessDispatcher {}

impl ProcessDispatcher {
    /// Creates a new process dispatcher
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl Dispatcher for ProcessDispatcher {
    async fn dispatch(
        &self,
        invocation: PipelineInvocation,
    ) -> Result<DispatchOutcome, DispatchError> {
        debug!("Executing: {}", invocation.command_line());

        let started_at = Utc::now();

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| DispatchError::Spawn {
                program: invocation.program.to_string_lossy().into_owned(),
                run_id: invocation.run.run_id.clone(),
                source,
            })?;

        Ok(DispatchOutcome {
            run_id: invocation.run.run_id,
            exit_code: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            started_at,
            finished_at: Utc::now(),
        })
    }
}
