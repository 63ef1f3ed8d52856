//! # Teardown policy after a failed start phase.
//!
//! [`StartFailurePolicy`] decides what [`Runtime::run`](crate::Runtime::run)
//! stops when service `k` fails to start. Services `0..k` started
//! successfully, service `k` returned an error, services `k+1..` were never
//! started.
//!
//! - [`StartFailurePolicy::StopStarted`] — stop `k-1..=0` in reverse (default);
//! - [`StartFailurePolicy::StopAll`] — stop every registered service in reverse,
//!   including ones that never started;
//! - [`StartFailurePolicy::Skip`] — stop nothing; the caller owns cleanup.
//!
//! After an **init** failure nothing has started and nothing is stopped,
//! regardless of this policy.

/// Policy controlling teardown when the start phase fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StartFailurePolicy {
    /// Stop only the services whose `start` returned `Ok`.
    #[default]
    StopStarted,
    /// Stop the full registered set.
    StopAll,
    /// Do not stop anything.
    Skip,
}

impl StartFailurePolicy {
    /// Number of leading services to stop, given the index of the service
    /// whose start failed and the registry length. `0` means no teardown.
    pub fn stop_count(&self, failed_at: usize, registered: usize) -> usize {
        match self {
            StartFailurePolicy::StopStarted => failed_at.min(registered),
            StartFailurePolicy::StopAll => registered,
            StartFailurePolicy::Skip => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_count_per_policy() {
        assert_eq!(StartFailurePolicy::StopStarted.stop_count(2, 5), 2);
        assert_eq!(StartFailurePolicy::StopStarted.stop_count(0, 5), 0);
        assert_eq!(StartFailurePolicy::StopAll.stop_count(2, 5), 5);
        assert_eq!(StartFailurePolicy::Skip.stop_count(2, 5), 0);
    }
}
