//! Scan and build pass
//!
//! One pass over the sequencer output directory: scan for completed runs,
//! drop analysed ones, and build an invocation for each remaining run. The
//! pass holds no state between calls; eligibility comes from the markers on
//! disk every time.

use std::path::Path;
use tracing::debug;

use crate::command::build_invocation;
use crate::domain::invocation::PipelineInvocation;
use crate::error::Result;
use crate::filter::filter_unanalyzed;
use crate::scanner::scan_completed_runs;
use crate::settings::PipelineSettings;

/// Builds invocations for every run under `root` that is complete and not yet analysed
pub fn scan_and_build(root: &Path, settings: &PipelineSettings) -> Result<Vec<PipelineInvocation>> {
    let completed = scan_completed_runs(root)?;
    let completed_count = completed.len();

    let eligible = filter_unanalyzed(completed);

    debug!(
        "Scanned {}: {} completed run(s), {} eligible",
        root.display(),
        completed_count,
        eligible.len()
    );

    Ok(eligible
        .iter()
        .map(|run| build_invocation(run, settings))
        .collect())
}
