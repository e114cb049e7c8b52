//! Pipeline settings
//!
//! Fixed parts of the external command line: which runner to call, which
//! pipeline and revision it should run, and the profile and package cache
//! it should use. Bumping the pipeline revision means changing these values
//! and restarting the watcher.


/// Default workflow runner executable
pub const DEFAULT_RUNNER: &str = "nextflow";

/// Default pipeline identifier
pub const DEFAULT_PIPELINE: &str = "BCCDC-PHL/routine-qc";

/// Default pipeline revision
pub const DEFAULT_PIPELINE_VERSION: &str = "v0.3.2";

/// Default runner profile
pub const DEFAULT_PROFILE: &str = "conda";

/// Default package cache path
pub const DEFAULT_CACHE: &str = "~/.conda/envs";

/// Constant parts of every pipeline invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Workflow runner executable (e.g., "nextflow")
    pub runner: String,

    /// Pipeline identifier passed to `<runner> run`
    pub pipeline: String,

    /// Pipeline revision passed as `-r`
    pub pipeline_version: String,

    /// Runner profile passed as `-profile`
    pub profile: String,

    /// Package cache path passed as `--cache`
    pub cache: String,
}

impl PipelineSettings {
    /// Creates settings from environment variables with fallback to defaults
    ///
    /// Recognised environment variables:
    /// - ROUTINE_QC_RUNNER (default: nextflow)
    /// - ROUTINE_QC_PIPELINE (default: BCCDC-PHL/routine-qc)
    /// - ROUTINE_QC_PIPELINE_VERSION (default: v0.3.2)
    /// - ROUTINE_QC_PROFILE (default: conda)
    /// - ROUTINE_QC_CACHE (default: ~/.conda/envs)
    ///
    /// A leading `~/` in the cache path is expanded against `HOME`, since the
    /// command is executed without a shell.
    pub fn from_env() -> Self {
        let var = |key: &str, default: &str| {
            std::env::var(key)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let home = std::env::var("HOME").ok();

        Self {
            runner: var("ROUTINE_QC_RUNNER", DEFAULT_RUNNER),
            pipeline: var("ROUTINE_QC_PIPELINE", DEFAULT_PIPELINE),
            pipeline_version: var("ROUTINE_QC_PIPELINE_VERSION", DEFAULT_PIPELINE_VERSION),
            profile: var("ROUTINE_QC_PROFILE", DEFAULT_PROFILE),
            cache: expand_home(&var("ROUTINE_QC_CACHE", DEFAULT_CACHE), home.as_deref()),
        }
    }

    /// Replaces the runner executable
    pub fn with_runner(mut self, runner: impl Into<String>) -> Self {
        self.runner = runner.into();
        self
    }

    /// Names of settings that are empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("runner", &self.runner),
            ("pipeline", &self.pipeline),
            ("pipeline_version", &self.pipeline_version),
            ("profile", &self.profile),
            ("cache", &self.cache),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            runner: DEFAULT_RUNNER.to_string(),
            pipeline: DEFAULT_PIPELINE.to_string(),
            pipeline_version: DEFAULT_PIPELINE_VERSION.to_string(),
            profile: DEFAULT_PROFILE.to_string(),
            cache: DEFAULT_CACHE.to_string(),
        }
    }
}

/// Expands a leading `~` or `~/` against the given home directory
fn expand_home(path: &str, home: Option<&str>) -> String {
    match (path.strip_prefix('~'), home) {
        (Some(""), Some(home)) => home.to_string(),
        (Some(rest), Some(home)) if rest.starts_with('/') => {
            format!("{}{}", home.trim_end_matches('/'), rest)
        }
        _ => path.to_string(),
    }
}
