//! Routine QC Core
//!
//! Core types and logic for the routine QC watcher.
//!
//! This crate contains:
//! - Domain types: run directories, instrument types, pipeline invocations
//! - Scanner: discovery of completed runs under a sequencer output directory
//! - Filter: exclusion of runs that already carry an analysis marker
//! - Command builder: construction of the external pipeline command line
//! - Pass: the stateless scan, filter, build routine driven by the runner
//!
//! Process execution and scheduling live in the runner.

pub mod command;
pub mod domain;
pub mod error;
pub mod filter;
pub mod pass;
pub mod scanner;
pub mod settings;

pub use command::build_invocation;
pub use domain::instrument::InstrumentType;
pub use domain::invocation::PipelineInvocation;
pub use domain::run::RunDirectory;
pub use error::{Result, ScanError};
pub use filter::{filter_unanalyzed, is_eligible};
pub use pass::scan_and_build;
pub use scanner::scan_completed_runs;
pub use settings::PipelineSettings;
