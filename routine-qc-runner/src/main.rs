//! Routine QC Runner
//!
//! Watches a sequencer output directory and dispatches the routine QC
//! pipeline once for every completed run.
//!
//! Architecture:
//! - Configuration: CLI arguments plus pipeline settings from the environment
//! - Core: scanning, filtering and command building (routine-qc-core)
//! - Services: subprocess dispatch and output capture
//! - Scheduler: the fixed-interval polling loop
//!
//! Which runs have been analysed is never stored here: a run is eligible
//! until the pipeline writes its `RoutineQC` directory, so a restarted
//! watcher picks up exactly where the filesystem says it should.

mod config;
mod scheduler;
mod service;

use anyhow::Result;
use clap::Parser;
use routine_qc_core::PipelineSettings;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, DEFAULT_POLL_INTERVAL_SECS};
use crate::scheduler::RunPoller;
use crate::service::{Dispatcher, ProcessDispatcher};

#[derive(Parser)]
#[command(name = "routine-qc")]
#[command(about = "Dispatch routine QC for completed sequencing runs", long_about = None)]
struct Cli {
    /// Directory the sequencers write run folders into
    sequencer_output_dir: PathBuf,

    /// Seconds between scans
    #[arg(
        long,
        env = "ROUTINE_QC_INTERVAL",
        default_value_t = DEFAULT_POLL_INTERVAL_SECS
    )]
    interval: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "routine_qc_runner=info,routine_qc_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Routine QC Runner");

    let config = load_config(cli)?;
    info!(
        "Loaded configuration: root_dir={}, pipeline={} {}, runner={}",
        config.root_dir.display(),
        config.pipeline.pipeline,
        config.pipeline.pipeline_version,
        config.pipeline.runner
    );

    if !config.root_dir.is_dir() {
        warn!(
            "Sequencer output directory {} is not available yet, will keep polling",
            config.root_dir.display()
        );
    }

    let dispatcher: Arc<dyn Dispatcher> = Arc::new(ProcessDispatcher::new());
    let poller = RunPoller::new(config, dispatcher);

    tokio::select! {
        result = poller.run() => {
            if let Err(e) = result {
                error!("Poller error: {:#}", e);
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!(
                "Interrupted, exiting with {} pipeline(s) still running",
                poller.in_flight_count()
            );
        }
    }

    Ok(())
}

/// Builds the configuration from CLI arguments and the environment
fn load_config(cli: Cli) -> Result<Config> {
    let config = Config::new(cli.sequencer_output_dir, Duration::from_secs(cli.interval))
        .with_pipeline(PipelineSettings::from_env())
        .absolutize_root()?;

    config.validate()?;
    Ok(config)
}
