//! Pipeline invocation domain model

use std::ffi::OsString;
use std::path::PathBuf;
use uuid::Uuid;

use crate::domain::instrument::InstrumentType;
use crate::domain::run::RunDirectory;

/// A fully-formed external pipeline command for one run
///
/// Built fresh on every pass. The work directory token is unique per
/// invocation so concurrent or repeated invocations for the same run never
/// share a work directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineInvocation {
    /// Run this invocation analyses
    pub run: RunDirectory,

    /// Instrument type passed as `--instrument_type`
    pub instrument_type: InstrumentType,

    /// Token embedded in the work directory name
    pub work_token: Uuid,

    /// Work directory passed to the runner
    pub work_dir: PathBuf,

    /// Output directory, which doubles as the analysis marker
    pub outdir: PathBuf,

    /// Executable to run
    pub program: OsString,

    /// Arguments, in order
    ///
    /// Paths are kept as raw OS strings, so run folders whose names are not
    /// valid UTF-8 reach the pipeline unchanged.
    pub args: Vec<OsString>,
}

impl PipelineInvocation {
    /// Renders the full command line as a single string, for logging
    ///
    /// Non-UTF-8 bytes are replaced, so the result is not guaranteed to be
    /// executable as-is; `program` and `args` are what gets run.
    pub fn command_line(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| part.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for PipelineInvocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.command_line())
    }
}
