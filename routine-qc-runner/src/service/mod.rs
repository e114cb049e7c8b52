//! Service layer
//!
//! Services wrap the side-effecting parts of the watcher. Dispatching is
//! trait-based so the poller can be tested without spawning processes.

mod dispatch;

// Re-export traits
pub use dispatch::Dispatcher;

// Re-export implementations and types
pub use dispatch::{DispatchError, DispatchOutcome, ProcessDispatcher};
