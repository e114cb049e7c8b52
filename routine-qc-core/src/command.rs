//! Command builder
//!
//! Turns an eligible run into the external pipeline command line. Apart
//! from drawing a random work directory token this is pure string
//! construction: nothing is created on disk and the run path is not
//! validated.

use std::ffi::OsString;
use std::path::Path;
use uuid::Uuid;

use crate::domain::invocation::PipelineInvocation;
use crate::domain::run::RunDirectory;
use crate::settings::PipelineSettings;

/// Builds the pipeline invocation for a run
///
/// Every call draws a fresh v4 UUID for the work directory, so two calls
/// for the same run never share one.
///
/// The resulting command has the shape:
///
/// ```text
/// <runner> run <pipeline> -profile <profile> --cache <cache> -r <version>
///   --run_dir <run_dir> --instrument_type <type>
///   -work <run_dir>/work-<uuid> --outdir <run_dir>/RoutineQC
/// ```
pub fn build_invocation(run: &RunDirectory, settings: &PipelineSettings) -> PipelineInvocation {
    build_invocation_with_token(run, settings, Uuid::new_v4())
}

fn build_invocation_with_token(
    run: &RunDirectory,
    settings: &PipelineSettings,
    work_token: Uuid,
) -> PipelineInvocation {
    let instrument_type = run.instrument_type();
    let work_dir = run.work_dir(&work_token);
    let outdir = run.analysis_marker();

    let args: Vec<OsString> = vec![
        "run".into(),
        settings.pipeline.as_str().into(),
        "-profile".into(),
        settings.profile.as_str().into(),
        "--cache".into(),
        settings.cache.as_str().into(),
        "-r".into(),
        settings.pipeline_version.as_str().into(),
        "--run_dir".into(),
        path_arg(&run.path),
        "--instrument_type".into(),
        instrument_type.as_str().into(),
        "-work".into(),
        path_arg(&work_dir),
        "--outdir".into(),
        path_arg(&outdir),
    ];

    PipelineInvocation {
        run: run.clone(),
        instrument_type,
        work_token,
        work_dir,
        outdir,
        program: settings.runner.as_str().into(),
        args,
    }
}

fn path_arg(path: &Path) -> OsString {
    path.as_os_str().to_os_string()
}
