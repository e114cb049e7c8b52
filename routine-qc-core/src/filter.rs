//! Run filter
//!
//! A run is eligible for dispatch until its analysis marker appears. The
//! marker is written by the pipeline, never by the watcher, so a pipeline
//! that fails before creating it leaves the run eligible on the next pass.

use crate::domain::run::RunDirectory;

/// Whether a run still needs QC analysis
pub fn is_eligible(run: &RunDirectory) -> bool {
    !run.is_analyzed()
}

/// Keeps only runs without an analysis marker
pub fn filter_unanalyzed(runs: Vec<RunDirectory>) -> Vec<RunDirectory> {
    runs.into_iter().filter(is_eligible).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_run(root: &TempDir, name: &str, complete: bool, analyzed: bool) -> RunDirectory {
        let run = RunDirectory::new(root.path().join(name));
        fs::create_dir(&run.path).unwrap();
        if complete {
            fs::write(run.completion_marker(), "{}").unwrap();
        }
        if analyzed {
            fs::create_dir(run.analysis_marker()).unwrap();
        }
        run
    }

    #[test]
    fn test_is_eligible() {
        let root = TempDir::new().unwrap();
        let fresh = make_run(&root, "fresh", true, false);
        let done = make_run(&root, "done", true, true);

        assert!(is_eligible(&fresh));
        assert!(!is_eligible(&done));
    }

    #[test]
    fn test_analyzed_excluded_regardless_of_completion() {
        let root = TempDir::new().unwrap();
        let run = make_run(&root, "orphan", false, true);

        assert!(!is_eligible(&run));
    }

    #[test]
    fn test_analysis_marker_as_file() {
        let root = TempDir::new().unwrap();
        let run = make_run(&root, "runA", true, false);
        fs::write(run.analysis_marker(), "").unwrap();

        assert!(!is_eligible(&run));
    }

    #[test]
    fn test_filter_keeps_every_eligible_run_once() {
        let root = TempDir::new().unwrap();
        let runs = vec![
            make_run(&root, "a", true, false),
            make_run(&root, "b", true, true),
            make_run(&root, "c", true, false),
            make_run(&root, "d", true, true),
        ];

        let eligible = filter_unanalyzed(runs);
        let mut ids: Vec<_> = eligible.iter().map(|run| run.run_id.as_str()).collect();
        ids.sort();

        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_filter_empty() {
        assert!(filter_unanalyzed(Vec::new()).is_empty());
    }
}
