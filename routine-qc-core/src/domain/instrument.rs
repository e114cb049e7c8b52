//! Instrument type classification
//!
//! Sequencers embed an instrument-specific identifier in the run folder
//! name. Both patterns are matched at the start of the run ID only; any
//! trailing text after a match is ignored.

use regex::Regex;
use std::sync::LazyLock;

static MISEQ_RUN_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{6}_M\d{5}_\d+_\d{9}-[A-Z0-9]{5}").unwrap());

static NEXTSEQ_RUN_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{6}_VH\d{5}_\d+_[A-Z0-9]{9}").unwrap());

/// Sequencing instrument that produced a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstrumentType {
    MiSeq,
    NextSeq,

    /// Run ID matched no known pattern; passed through to the pipeline as-is
    Unknown,
}

impl InstrumentType {
    /// Classifies a run ID
    pub fn classify(run_id: &str) -> Self {
        if MISEQ_RUN_ID.is_match(run_id) {
            Self::MiSeq
        } else if NEXTSEQ_RUN_ID.is_match(run_id) {
            Self::NextSeq
        } else {
            Self::Unknown
        }
    }

    /// Value passed to the pipeline's `--instrument_type` parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MiSeq => "miseq",
            Self::NextSeq => "nextseq",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the run ID matched one of the instrument patterns
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl std::fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
