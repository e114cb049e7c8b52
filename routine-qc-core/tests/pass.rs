//! End-to-end tests for the scan, filter, build pass

use routine_qc_core::{InstrumentType, PipelineSettings, RunDirectory, scan_and_build};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn make_run(root: &Path, name: &str, complete: bool, analyzed: bool) {
    let run = root.join(name);
    fs::create_dir(&run).unwrap();
    if complete {
        fs::write(run.join("upload_complete.json"), "{}").unwrap();
    }
    if analyzed {
        fs::create_dir(run.join("RoutineQC")).unwrap();
    }
}

fn eligible_ids(root: &Path) -> BTreeSet<String> {
    scan_and_build(root, &PipelineSettings::default())
        .unwrap()
        .into_iter()
        .map(|invocation| invocation.run.run_id)
        .collect()
}

#[test]
fn test_complete_run_dispatched_incomplete_skipped() {
    let root = TempDir::new().unwrap();
    make_run(root.path(), "runA", true, false);
    make_run(root.path(), "runB", false, false);

    let invocations = scan_and_build(root.path(), &PipelineSettings::default()).unwrap();
    assert_eq!(invocations.len(), 1);

    let invocation = &invocations[0];
    let run_a = RunDirectory::new(root.path().join("runA"));
    assert_eq!(invocation.run, run_a);
    assert_eq!(invocation.instrument_type, run_a.instrument_type());
    assert!(invocation.work_dir.starts_with(&run_a.path));

    let args = &invocation.args;
    let value_of = |flag: &str| {
        let idx = args.iter().position(|arg| arg == flag).unwrap();
        args[idx + 1].clone()
    };
    assert_eq!(value_of("--instrument_type"), "unknown");
    assert_eq!(value_of("--run_dir"), run_a.path.clone().into_os_string());
    assert_eq!(
        value_of("--outdir"),
        run_a.path.join("RoutineQC").into_os_string()
    );
}

#[test]
fn test_analyzed_run_yields_nothing() {
    let root = TempDir::new().unwrap();
    make_run(root.path(), "runC", true, true);

    let invocations = scan_and_build(root.path(), &PipelineSettings::default()).unwrap();
    assert!(invocations.is_empty());
}

#[test]
fn test_repeated_passes_are_idempotent() {
    let root = TempDir::new().unwrap();
    make_run(root.path(), "201203_M00325_0123_000000000-A1B2C", true, false);
    make_run(root.path(), "201203_VH00123_0045_AB12CD345", true, false);
    make_run(root.path(), "in-progress", false, false);
    make_run(root.path(), "finished", true, true);

    let first = eligible_ids(root.path());
    let second = eligible_ids(root.path());

    assert_eq!(first, second);
    assert_eq!(
        first,
        BTreeSet::from([
            "201203_M00325_0123_000000000-A1B2C".to_string(),
            "201203_VH00123_0045_AB12CD345".to_string(),
        ])
    );
}

#[test]
fn test_instrument_types_follow_run_ids() {
    let root = TempDir::new().unwrap();
    make_run(root.path(), "201203_M00325_0123_000000000-A1B2C", true, false);
    make_run(root.path(), "201203_VH00123_0045_AB12CD345", true, false);

    let mut types: Vec<_> = scan_and_build(root.path(), &PipelineSettings::default())
        .unwrap()
        .into_iter()
        .map(|invocation| (invocation.run.run_id, invocation.instrument_type))
        .collect();
    types.sort_by(|a, b| a.0.cmp(&b.0));

    assert_eq!(
        types,
        vec![
            (
                "201203_M00325_0123_000000000-A1B2C".to_string(),
                InstrumentType::MiSeq
            ),
            (
                "201203_VH00123_0045_AB12CD345".to_string(),
                InstrumentType::NextSeq
            ),
        ]
    );
}

#[test]
fn test_marker_appearing_between_passes_excludes_run() {
    let root = TempDir::new().unwrap();
    make_run(root.path(), "runA", true, false);

    assert_eq!(eligible_ids(root.path()).len(), 1);

    fs::create_dir(root.path().join("runA/RoutineQC")).unwrap();
    assert!(eligible_ids(root.path()).is_empty());
}

#[test]
fn test_missing_root_is_an_error() {
    let root = TempDir::new().unwrap();
    let result = scan_and_build(&root.path().join("gone"), &PipelineSettings::default());
    assert!(result.is_err());
}

#[cfg(unix)]
#[test]
fn test_non_utf8_run_folder_points_at_real_directory() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    use std::path::PathBuf;

    let root = TempDir::new().unwrap();
    let run = root.path().join(OsStr::from_bytes(b"run\xffA"));
    fs::create_dir(&run).unwrap();
    fs::write(run.join("upload_complete.json"), "{}").unwrap();

    let invocations = scan_and_build(root.path(), &PipelineSettings::default()).unwrap();
    assert_eq!(invocations.len(), 1);

    let args = &invocations[0].args;
    let idx = args.iter().position(|arg| arg == "--run_dir").unwrap();
    let run_dir = PathBuf::from(&args[idx + 1]);

    assert_eq!(run_dir, run);
    assert!(run_dir.is_dir());
}
