//! Watcher configuration
//!
//! Defines the directory to watch, how often to scan it, and the constant
//! parts of the pipeline command line.

use anyhow::Context;
use routine_qc_core::PipelineSettings;
use std::path::PathBuf;
use std::time::Duration;

/// Default scan interval in seconds
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Watcher configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Sequencer output directory whose immediate children are runs
    pub root_dir: PathBuf,

    /// How often to scan the root directory
    pub poll_interval: Duration,

    /// Constant parts of every pipeline invocation
    pub pipeline: PipelineSettings,
}

impl Config {
    /// Creates a new configuration with default pipeline settings
    pub fn new(root_dir: PathBuf, poll_interval: Duration) -> Self {
        Self {
            root_dir,
            poll_interval,
            pipeline: PipelineSettings::default(),
        }
    }

    /// Replaces the pipeline settings
    pub fn with_pipeline(mut self, pipeline: PipelineSettings) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Resolves the root directory to an absolute path
    ///
    /// Run directories are handed to the pipeline as `--run_dir`, which must
    /// be absolute since the pipeline does not share our working directory.
    /// The directory does not have to exist yet: a share that is mounted
    /// after startup is picked up by the next scan.
    pub fn absolutize_root(mut self) -> anyhow::Result<Self> {
        self.root_dir = std::path::absolute(&self.root_dir).with_context(|| {
            format!(
                "Failed to resolve sequencer output directory {}",
                self.root_dir.display()
            )
        })?;
        Ok(self)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.root_dir.as_os_str().is_empty() {
            anyhow::bail!("sequencer output directory cannot be empty");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        let missing = self.pipeline.missing_fields();
        if !missing.is_empty() {
            anyhow::bail!("pipeline settings cannot be empty: {}", missing.join(", "));
        }

        Ok(())
    }
}
