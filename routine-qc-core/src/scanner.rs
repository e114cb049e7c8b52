//! Run directory scanner
//!
//! Lists the immediate children of the sequencer output directory and keeps
//! those that carry a completion marker. The scan is one level deep and
//! read-only.

use std::path::Path;
use tracing::{debug, warn};

use crate::domain::run::RunDirectory;
use crate::error::{Result, ScanError};

/// Returns every completed run directly under `root`
///
/// Failing to list `root` itself fails the scan. Entries that cannot be
/// inspected are logged and skipped. The order of the result is
/// unspecified.
pub fn scan_completed_runs(root: &Path) -> Result<Vec<RunDirectory>> {
    let entries = std::fs::read_dir(root).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotADirectory {
            ScanError::NotADirectory(root.to_path_buf())
        } else {
            ScanError::ReadRoot {
                path: root.to_path_buf(),
                source,
            }
        }
    })?;

    let mut runs = Vec::new();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", root.display(), e);
                continue;
            }
        };

        let path = entry.path();

        // Follows symlinks, so linked run folders are picked up too
        if !path.is_dir() {
            continue;
        }

        let run = RunDirectory::new(path);
        if run.is_complete() {
            runs.push(run);
        } else {
            debug!("Run {} is not complete yet", run);
        }
    }

    Ok(runs)
}
