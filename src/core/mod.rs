//! Orchestration core: registry, runtime adapter and OS signals.
//!
//! Internal modules:
//! - [`registry`]: ordered services and fail-fast phase dispatch;
//! - [`runtime`]: init → start → wait → stop, with programmatic and OS-signal stop;
//! - [`builder`]: wires a registry to the bus and subscribers;
//! - [`shutdown`]: cross-platform termination signals.

mod builder;
mod registry;
mod runtime;
mod shutdown;

pub use builder::RuntimeBuilder;
pub use registry::Registry;
pub use runtime::{Runtime, StopHandle};
pub use shutdown::{Signal, SignalListener};
