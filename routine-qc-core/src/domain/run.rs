//! Run directory domain model
//!
//! A run directory is one sequencing instrument output folder. The watcher
//! only ever reads it: markers inside it are written by the instrument and
//! by the QC pipeline.

use std::path::PathBuf;

use crate::domain::instrument::InstrumentType;

/// File written by the instrument once a run has finished uploading
pub const COMPLETION_MARKER: &str = "upload_complete.json";

/// Directory created by the QC pipeline once analysis has been dispatched
pub const ANALYSIS_MARKER: &str = "RoutineQC";

/// Prefix of the per-invocation pipeline work directory
pub const WORK_DIR_PREFIX: &str = "work-";

/// One sequencing instrument output run
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunDirectory {
    /// Path to the run directory
    pub path: PathBuf,

    /// Run ID, the final component of `path`
    pub run_id: String,
}

impl RunDirectory {
    /// Creates a run directory from its path
    ///
    /// The run ID is the final path component. A path without one (such as
    /// `/` or `..`) yields an empty run ID, which classifies as unknown.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let run_id = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self { path, run_id }
    }

    /// Path to the completion marker
    pub fn completion_marker(&self) -> PathBuf {
        self.path.join(COMPLETION_MARKER)
    }

    /// Path to the analysis marker, also used as the pipeline output directory
    pub fn analysis_marker(&self) -> PathBuf {
        self.path.join(ANALYSIS_MARKER)
    }

    /// Whether the instrument has finished writing this run
    pub fn is_complete(&self) -> bool {
        self.completion_marker().exists()
    }

    /// Whether QC analysis has already been dispatched for this run
    pub fn is_analyzed(&self) -> bool {
        self.analysis_marker().exists()
    }

    /// Instrument type derived from the run ID
    pub fn instrument_type(&self) -> InstrumentType {
        InstrumentType::classify(&self.run_id)
    }

    /// Work directory path for the given invocation token
    pub fn work_dir(&self, token: &uuid::Uuid) -> PathBuf {
        self.path.join(format!("{}{}", WORK_DIR_PREFIX, token))
    }
}

impl std::fmt::Display for RunDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.run_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_run_id_from_path() {
        let run = RunDirectory::new("/data/runs/201203_M00325_0123_000000000-A1B2C");
        assert_eq!(run.run_id, "201203_M00325_0123_000000000-A1B2C");
        assert_eq!(run.instrument_type(), InstrumentType::MiSeq);
    }

    #[test]
    fn test_run_id_without_file_name() {
        let run = RunDirectory::new("/");
        assert_eq!(run.run_id, "");
        assert_eq!(run.instrument_type(), InstrumentType::Unknown);
    }

    #[test]
    fn test_markers() {
        let tmp = TempDir::new().unwrap();
        let run = RunDirectory::new(tmp.path().join("runA"));
        fs::create_dir(&run.path).unwrap();

        assert!(!run.is_complete());
        assert!(!run.is_analyzed());

        fs::write(run.completion_marker(), "{}").unwrap();
        assert!(run.is_complete());

        fs::create_dir(run.analysis_marker()).unwrap();
        assert!(run.is_analyzed());
    }

    #[test]
    fn test_work_dir_nested_under_run() {
        let run = RunDirectory::new("/data/runs/runA");
        let token = uuid::Uuid::new_v4();
        let work_dir = run.work_dir(&token);

        assert_eq!(work_dir.parent(), Some(run.path.as_path()));
        assert_eq!(
            work_dir.file_name().unwrap().to_string_lossy(),
            format!("work-{}", token)
        );
    }
}
