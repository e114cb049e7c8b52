//! Core domain types
//!
//! These types describe what the watcher observes on disk (run directories
//! and their markers) and what it hands to the dispatcher (pipeline
//! invocations). None of them are persisted.

pub mod instrument;
pub mod invocation;
pub mod run;
