//! Run poller
//!
//! Scans the sequencer output directory on every tick and dispatches each
//! eligible run on its own task. Dispatches are not awaited by the pass, so
//! one long pipeline never delays the next scan or another run.

use anyhow::{Context, Result};
use routine_qc_core::{PipelineInvocation, ScanError, scan_and_build};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::service::{DispatchError, DispatchOutcome, Dispatcher};

/// Runs whose pipeline subprocess has not exited yet
///
/// The pipeline creates the analysis marker some time after it starts, so
/// without this set a run would be dispatched again on every tick until the
/// marker shows up. Only this process's own dispatches are tracked.
#[derive(Debug, Clone, Default)]
struct InFlight {
    runs: Arc<Mutex<HashSet<PathBuf>>>,
}

impl InFlight {
    fn lock(&self) -> MutexGuard<'_, HashSet<PathBuf>> {
        self.runs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks a run as in flight, returning None if it already was
    fn claim(&self, run_dir: PathBuf) -> Option<InFlightGuard> {
        if !self.lock().insert(run_dir.clone()) {
            return None;
        }

        Some(InFlightGuard {
            in_flight: self.clone(),
            run_dir,
        })
    }

    #[cfg(test)]
    fn contains(&self, run_dir: &std::path::Path) -> bool {
        self.lock().contains(run_dir)
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}

/// Releases a run from the in-flight set when dropped
struct InFlightGuard {
    in_flight: InFlight,
    run_dir: PathBuf,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.lock().remove(&self.run_dir);
    }
}

/// Poller that periodically scans for and dispatches runs
pub struct RunPoller {
    config: Config,
    dispatcher: Arc<dyn Dispatcher>,
    in_flight: InFlight,
}

impl RunPoller {
    /// Creates a new run poller
    pub fn new(config: Config, dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self {
            config,
            dispatcher,
            in_flight: InFlight::default(),
        }
    }

    /// Starts the polling loop
    ///
    /// Never returns on its own; a failed pass is logged and the next tick
    /// tries again.
    pub async fn run(&self) -> Result<()> {
        info!(
            "Watching {} (interval: {:?})",
            self.config.root_dir.display(),
            self.config.poll_interval
        );

        let mut interval = time::interval(self.config.poll_interval);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            debug!("Scanning for completed runs");

            match self.poll_and_dispatch_once().await {
                Ok(handles) => {
                    if !handles.is_empty() {
                        info!("Dispatched {} run(s) this cycle", handles.len());
                    }
                }
                Err(e) => log_cycle_error(&e),
            }
        }
    }

    /// Performs a single scan and dispatches every eligible run
    ///
    /// Returns the handles of the spawned dispatch tasks. Runs already in
    /// flight from an earlier pass are skipped.
    pub async fn poll_and_dispatch_once(&self) -> Result<Vec<JoinHandle<()>>> {
        let root = self.config.root_dir.clone();
        let settings = self.config.pipeline.clone();

        let invocations = tokio::task::spawn_blocking(move || scan_and_build(&root, &settings))
            .await
            .context("Scan task panicked")?
            .context("Failed to scan sequencer output directory")?;

        if invocations.is_empty() {
            debug!("No runs awaiting analysis");
            return Ok(Vec::new());
        }

        let mut handles = Vec::new();

        for invocation in invocations {
            let Some(guard) = self.in_flight.claim(invocation.run.path.clone()) else {
                debug!("Run {} is already being analysed, skipping", invocation.run);
                continue;
            };

            handles.push(self.spawn_dispatch_task(invocation, guard));
        }

        Ok(handles)
    }

    /// Number of runs whose pipeline is still running
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Whether a run's pipeline is still running
    #[cfg(test)]
    pub fn is_in_flight(&self, run_dir: &std::path::Path) -> bool {
        self.in_flight.contains(run_dir)
    }

    /// Spawns a task to dispatch a single run
    fn spawn_dispatch_task(
        &self,
        invocation: PipelineInvocation,
        guard: InFlightGuard,
    ) -> JoinHandle<()> {
        let dispatcher = Arc::clone(&self.dispatcher);

        info!(
            "Dispatching QC for run {} (instrument: {}, work dir: {})",
            invocation.run,
            invocation.instrument_type,
            invocation.work_dir.display()
        );
        if !invocation.instrument_type.is_known() {
            warn!(
                "Run {} matches no known instrument pattern",
                invocation.run
            );
        }

        tokio::spawn(async move {
            let run_id = invocation.run.run_id.clone();

            match dispatcher.dispatch(invocation).await {
                Ok(outcome) => log_outcome(&outcome),
                Err(e) => log_dispatch_error(&run_id, &e),
            }

            // Released only after the subprocess has exited
            drop(guard);
        })
    }
}

/// Logs a failed poll cycle
///
/// A missing root is expected while a sequencer share is not mounted yet,
/// so it is reported as a warning; every other failure is an error.
fn log_cycle_error(e: &anyhow::Error) {
    match e.downcast_ref::<ScanError>() {
        Some(scan) if scan.is_not_found() => warn!(
            "Sequencer output directory {} not found, retrying next cycle",
            scan.path().display()
        ),
        _ => error!("Error during poll cycle: {:#}", e),
    }
}

fn log_dispatch_error(run_id: &str, e: &DispatchError) {
    if e.is_runner_missing() {
        error!(
            "Failed to dispatch run {}: {} (is the runner installed and on PATH?)",
            run_id, e
        );
    } else {
        error!("Failed to dispatch run {}: {:#}", run_id, e);
    }
}

/// Logs the captured output and exit status of a finished pipeline
fn log_outcome(outcome: &DispatchOutcome) {
    for line in outcome.stdout.lines().filter(|line| !line.trim().is_empty()) {
        info!("[{}] {}", outcome.run_id, line.trim_end());
    }

    for line in outcome.stderr.lines().filter(|line| !line.trim().is_empty()) {
        if outcome.success {
            debug!("[{}] {}", outcome.run_id, line.trim_end());
        } else {
            warn!("[{}] {}", outcome.run_id, line.trim_end());
        }
    }

    let elapsed = outcome.elapsed().num_seconds();

    if outcome.success {
        info!(
            "QC pipeline for run {} completed in {}s",
            outcome.run_id, elapsed
        );
    } else {
        match outcome.exit_code {
            Some(code) => warn!(
                "QC pipeline for run {} failed with exit code {} after {}s",
                outcome.run_id, code, elapsed
            ),
            None => warn!(
                "QC pipeline for run {} was terminated by a signal after {}s",
                outcome.run_id, elapsed
            ),
        }
    }
}
