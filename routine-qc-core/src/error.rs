//! Error types for the core crate

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for scanning operations
pub type Result<T> = std::result::Result<T, ScanError>;

/// Errors that can occur while scanning a sequencer output directory
#[derive(Debug, Error)]
pub enum ScanError {
    /// The root directory could not be listed
    #[error("Failed to read directory {}: {source}", .path.display())]
    ReadRoot {
        /// Directory that was being listed
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The root path exists but is not a directory
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

impl ScanError {
    /// Path the failed scan was pointed at
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::ReadRoot { path, .. } => path,
            Self::NotADirectory(path) => path,
        }
    }

    /// Check if the root is missing entirely
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ReadRoot { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}
