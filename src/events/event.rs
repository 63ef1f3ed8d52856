//! # Lifecycle events emitted by the registry and the runtime.
//!
//! The [`EventKind`] enum classifies events across three groups:
//! - **Registration**: a service was appended to the registry
//! - **Phase events**: a phase pass started, completed, or hit a failing service
//! - **Runtime events**: running, shutdown requested, start rollback, stopped
//!
//! The [`Event`] struct carries the metadata (phase, service, index, ...).
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order across subscribers.
//!
//! ## Example
//! ```rust
//! use svcwire::{Event, EventKind, Phase};
//!
//! let ev = Event::new(EventKind::ServiceFailed)
//!     .with_phase(Phase::Start)
//!     .with_service("db")
//!     .with_index(0)
//!     .with_error("connection refused");
//!
//! assert_eq!(ev.kind, EventKind::ServiceFailed);
//! assert_eq!(ev.service.as_deref(), Some("db"));
//! assert_eq!(ev.phase, Some(Phase::Start));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::core::Signal;
use crate::services::Phase;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Registration ===
    /// A service was appended to the registry.
    ///
    /// Sets:
    /// - `service`: service name
    /// - `index`: registration index
    ServiceRegistered,

    // === Phase events ===
    /// A phase pass is about to walk the registry.
    ///
    /// Sets:
    /// - `phase`: phase
    /// - `count`: number of services the pass covers
    /// - `key`: message key (notify only)
    PhaseStarting,

    /// Every service of the pass succeeded.
    ///
    /// Sets:
    /// - `phase`: phase
    /// - `count`: number of services invoked
    /// - `key`: message key (notify only)
    PhaseCompleted,

    /// A service failed; the pass was aborted at this service.
    ///
    /// Sets:
    /// - `phase`: phase
    /// - `service`: failing service name
    /// - `index`: failing service registration index
    /// - `error`: error message
    /// - `key`: message key (notify only)
    ServiceFailed,

    // === Runtime events ===
    /// Init and start succeeded; the runtime waits for a termination request.
    Running,

    /// Termination was requested.
    ///
    /// Sets:
    /// - `signal`: OS signal, or `None` for a programmatic request
    ShutdownRequested,

    /// Start failed; the services that did start are being stopped.
    ///
    /// Sets:
    /// - `count`: number of services being stopped
    StartRollback,

    /// The runtime finished (successfully or not) and will not run again.
    ///
    /// Sets:
    /// - `error`: error message if the run failed
    Stopped,
}

/// Lifecycle event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Phase the event belongs to.
    pub phase: Option<Phase>,
    /// Name of the service, if applicable.
    pub service: Option<Arc<str>>,
    /// Registration index of the service.
    pub index: Option<usize>,
    /// Number of services covered.
    pub count: Option<usize>,
    /// Message key of a notify broadcast.
    pub key: Option<Arc<str>>,
    /// Human-readable error.
    pub error: Option<Arc<str>>,
    /// OS signal that caused a shutdown.
    pub signal: Option<Signal>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            phase: None,
            service: None,
            index: None,
            count: None,
            key: None,
            error: None,
            signal: None,
        }
    }

    #[inline]
    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    #[inline]
    pub fn with_service(mut self, service: impl Into<Arc<str>>) -> Self {
        self.service = Some(service.into());
        self
    }

    #[inline]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    #[inline]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Attaches a message key; `None` leaves the event untouched.
    #[inline]
    pub fn with_key(mut self, key: Option<Arc<str>>) -> Self {
        if key.is_some() {
            self.key = key;
        }
        self
    }

    #[inline]
    pub fn with_error(mut self, error: impl Into<Arc<str>>) -> Self {
        self.error = Some(error.into());
        self
    }

    #[inline]
    pub fn with_signal(mut self, signal: Signal) -> Self {
        self.signal = Some(signal);
        self
    }

    /// True for events reporting a failure.
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self.kind, EventKind::ServiceFailed)
            || (matches!(self.kind, EventKind::Stopped) && self.error.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Event::new(EventKind::Running);
        let b = Event::new(EventKind::Running);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn failure_classification() {
        assert!(Event::new(EventKind::ServiceFailed).is_failure());
        assert!(!Event::new(EventKind::Stopped).is_failure());
        assert!(Event::new(EventKind::Stopped).with_error("boom").is_failure());
        assert!(
            Event::new(EventKind::PhaseStarting)
                .with_key(None)
                .key
                .is_none()
        );
    }
}
