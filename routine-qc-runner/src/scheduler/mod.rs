//! Scheduler layer for the watcher
//!
//! This layer re-runs the scan and build pass on a fixed interval and hands
//! each resulting invocation to the dispatcher.

pub mod poller;

pub use poller::RunPoller;
