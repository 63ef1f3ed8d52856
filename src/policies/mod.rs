//! # Runtime policies.
//!
//! - [`StartFailurePolicy`] which services to tear down when the start phase fails.

mod start_failure;

pub use start_failure::StartFailurePolicy;
