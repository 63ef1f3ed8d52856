//! # Runtime configuration.
//!
//! Provides [`Config`], the settings consumed by
//! [`Runtime::builder`](crate::Runtime::builder).
//!
//! ## Defaults
//! - `bus_capacity = 1024`
//! - `signals = Signal::default_set()` (interrupt + terminate)
//! - `start_failure = StartFailurePolicy::StopStarted`

use crate::core::Signal;
use crate::policies::StartFailurePolicy;

/// Default ring-buffer size of the event bus.
pub const DEFAULT_BUS_CAPACITY: usize = 1024;

/// Configuration for the runtime adapter.
///
/// ## Field semantics
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by `Bus`)
/// - `signals`: OS signals that count as a stop request during `run()`;
///   an empty list means only programmatic stop
/// - `start_failure`: which services to stop when `start` fails partway
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the event bus broadcast channel.
    ///
    /// Subscribers that lag more than `bus_capacity` events behind skip the
    /// oldest ones.
    pub bus_capacity: usize,

    /// Termination signals observed by [`Runtime::run`](crate::Runtime::run).
    ///
    /// [`Runtime::run_with_signals`](crate::Runtime::run_with_signals)
    /// overrides this per call.
    pub signals: Vec<Signal>,

    /// Teardown applied when the start phase fails.
    pub start_failure: StartFailurePolicy,
}

impl Config {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Replaces the signal set.
    pub fn with_signals(mut self, signals: impl IntoIterator<Item = Signal>) -> Self {
        self.signals = signals.into_iter().collect();
        self
    }

    /// Replaces the start-failure policy.
    pub fn with_start_failure(mut self, policy: StartFailurePolicy) -> Self {
        self.start_failure = policy;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bus_capacity: DEFAULT_BUS_CAPACITY,
            signals: Signal::default_set().to_vec(),
            start_failure: StartFailurePolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.bus_capacity, DEFAULT_BUS_CAPACITY);
        assert_eq!(cfg.signals, vec![Signal::Interrupt, Signal::Terminate]);
        assert_eq!(cfg.start_failure, StartFailurePolicy::StopStarted);
    }

    #[test]
    fn builders_override_fields() {
        let cfg = Config {
            bus_capacity: 0,
            ..Config::default()
        }
        .with_signals(Vec::<Signal>::new())
        .with_start_failure(StartFailurePolicy::Skip);
        assert_eq!(cfg.bus_capacity_clamped(), 1);
        assert!(cfg.signals.is_empty());
        assert_eq!(cfg.start_failure, StartFailurePolicy::Skip);
    }
}
