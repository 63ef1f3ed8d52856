//! Error types used by the svcwire registry, runtime and services.
//!
//! This module defines three error enums:
//!
//! - [`ServiceError`] — errors raised by an individual service inside a phase.
//! - [`PhaseError`] — the first service failure of a phase, annotated with the
//!   phase, the failing service and its registration index.
//! - [`RuntimeError`] — errors returned by [`Runtime::run`](crate::Runtime::run).
//!
//! All of them provide `as_label` (stable snake_case, for logs/metrics) and
//! `as_message` helpers.

use std::sync::Arc;

use thiserror::Error;

use crate::services::Phase;

/// Boxed error type accepted by [`ServiceError::Source`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// # Errors produced by a service.
///
/// Returned from [`Service`](crate::Service) methods. The orchestrator never
/// retries, so the distinction between `Fail` and `Fatal` is informational for
/// the composing program.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The operation failed.
    #[error("service failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The service is in a state it cannot recover from.
    #[error("fatal service error: {error}")]
    Fatal {
        /// The underlying error message.
        error: String,
    },

    /// Wraps an arbitrary error returned by service code.
    #[error(transparent)]
    Source(BoxError),
}

impl ServiceError {
    /// Shorthand for [`ServiceError::Fail`].
    ///
    /// # Example
    /// ```
    /// use svcwire::ServiceError;
    ///
    /// let err = ServiceError::fail("port already bound");
    /// assert_eq!(err.to_string(), "service failed: port already bound");
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        ServiceError::Fail {
            error: error.into(),
        }
    }

    /// Shorthand for [`ServiceError::Fatal`].
    pub fn fatal(error: impl Into<String>) -> Self {
        ServiceError::Fatal {
            error: error.into(),
        }
    }

    /// Wraps any error type.
    pub fn from_error(error: impl Into<BoxError>) -> Self {
        ServiceError::Source(error.into())
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ServiceError::Fail { .. } => "service_failed",
            ServiceError::Fatal { .. } => "service_fatal",
            ServiceError::Source(_) => "service_error",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ServiceError::Fail { error } => format!("error: {error}"),
            ServiceError::Fatal { error } => format!("fatal: {error}"),
            ServiceError::Source(e) => format!("error: {e}"),
        }
    }

    /// True for [`ServiceError::Fatal`].
    pub fn is_fatal(&self) -> bool {
        matches!(self, ServiceError::Fatal { .. })
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(e: std::io::Error) -> Self {
        ServiceError::Source(Box::new(e))
    }
}

/// # First failure of a lifecycle phase.
///
/// Every registry phase is fail-fast: the first service that returns an error
/// aborts the phase and its error is returned wrapped in the variant matching
/// the phase. Services after it (before it, for [`PhaseError::Stop`]) were not
/// invoked.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum PhaseError {
    /// A service failed to initialize. Earlier services stay initialized.
    #[error("init failed at service {service:?} (#{index}): {source}")]
    Init {
        /// Name of the failing service.
        service: Arc<str>,
        /// Registration index of the failing service.
        index: usize,
        /// Error returned by the service.
        #[source]
        source: ServiceError,
    },

    /// A service failed to start.
    #[error("start failed at service {service:?} (#{index}): {source}")]
    Start {
        /// Name of the failing service.
        service: Arc<str>,
        /// Registration index of the failing service.
        index: usize,
        /// Error returned by the service.
        #[source]
        source: ServiceError,
    },

    /// A service rejected a notification. Only this broadcast is aborted.
    #[error("notify {key:?} failed at service {service:?} (#{index}): {source}")]
    Notify {
        /// Name of the failing service.
        service: Arc<str>,
        /// Registration index of the failing service.
        index: usize,
        /// Key of the message being broadcast.
        key: Arc<str>,
        /// Error returned by the service.
        #[source]
        source: ServiceError,
    },

    /// A service failed to stop. Earlier-registered services were not stopped.
    #[error("stop failed at service {service:?} (#{index}): {source}")]
    Stop {
        /// Name of the failing service.
        service: Arc<str>,
        /// Registration index of the failing service.
        index: usize,
        /// Error returned by the service.
        #[source]
        source: ServiceError,
    },
}

impl PhaseError {
    pub(crate) fn new(
        phase: Phase,
        service: Arc<str>,
        index: usize,
        key: Option<Arc<str>>,
        source: ServiceError,
    ) -> Self {
        match phase {
            Phase::Init => PhaseError::Init {
                service,
                index,
                source,
            },
            Phase::Start => PhaseError::Start {
                service,
                index,
                source,
            },
            Phase::Notify => PhaseError::Notify {
                service,
                index,
                key: key.unwrap_or_else(|| Arc::from("")),
                source,
            },
            Phase::Stop => PhaseError::Stop {
                service,
                index,
                source,
            },
        }
    }

    /// Phase in which the error occurred.
    pub fn phase(&self) -> Phase {
        match self {
            PhaseError::Init { .. } => Phase::Init,
            PhaseError::Start { .. } => Phase::Start,
            PhaseError::Notify { .. } => Phase::Notify,
            PhaseError::Stop { .. } => Phase::Stop,
        }
    }

    /// Name of the service that failed.
    pub fn service(&self) -> &str {
        match self {
            PhaseError::Init { service, .. }
            | PhaseError::Start { service, .. }
            | PhaseError::Notify { service, .. }
            | PhaseError::Stop { service, .. } => service,
        }
    }

    /// Registration index of the service that failed.
    pub fn index(&self) -> usize {
        match self {
            PhaseError::Init { index, .. }
            | PhaseError::Start { index, .. }
            | PhaseError::Notify { index, .. }
            | PhaseError::Stop { index, .. } => *index,
        }
    }

    /// The service's own error.
    pub fn service_error(&self) -> &ServiceError {
        match self {
            PhaseError::Init { source, .. }
            | PhaseError::Start { source, .. }
            | PhaseError::Notify { source, .. }
            | PhaseError::Stop { source, .. } => source,
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use svcwire::{PhaseError, ServiceError};
    ///
    /// let err = PhaseError::Stop {
    ///     service: "db".into(),
    ///     index: 0,
    ///     source: ServiceError::fail("flush"),
    /// };
    /// assert_eq!(err.as_label(), "shutdown_error");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            PhaseError::Init { .. } => "initialization_error",
            PhaseError::Start { .. } => "start_error",
            PhaseError::Notify { .. } => "notify_error",
            PhaseError::Stop { .. } => "shutdown_error",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        format!(
            "{} service={} index={} {}",
            self.phase(),
            self.service(),
            self.index(),
            self.service_error().as_message()
        )
    }
}

/// # Errors returned by the runtime adapter.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// A lifecycle phase failed.
    #[error(transparent)]
    Phase(#[from] PhaseError),

    /// Start failed and stopping the already started services failed too.
    ///
    /// `start` is the primary error; `rollback` is the stop failure that
    /// ended the teardown early.
    #[error("{start}; rollback stop also failed: {rollback}")]
    StartRollback {
        /// The start failure that triggered the rollback.
        #[source]
        start: PhaseError,
        /// The stop failure raised during the rollback.
        rollback: PhaseError,
    },

    /// OS signal listeners could not be installed; no service was touched.
    #[error("failed to install signal handlers: {0}")]
    Signal(#[source] std::io::Error),

    /// [`Runtime::run`](crate::Runtime::run) was already called on this runtime.
    #[error("runtime already started")]
    AlreadyRunning,
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::Phase(e) => e.as_label(),
            RuntimeError::StartRollback { .. } => "start_rollback_error",
            RuntimeError::Signal(_) => "runtime_signal_setup",
            RuntimeError::AlreadyRunning => "runtime_already_running",
        }
    }

    /// Returns the phase error, if this error came from a lifecycle phase.
    ///
    /// For [`RuntimeError::StartRollback`] this is the start error.
    pub fn as_phase(&self) -> Option<&PhaseError> {
        match self {
            RuntimeError::Phase(e) | RuntimeError::StartRollback { start: e, .. } => Some(e),
            _ => None,
        }
    }

    /// The stop failure raised while rolling back a failed start, if any.
    pub fn rollback_error(&self) -> Option<&PhaseError> {
        match self {
            RuntimeError::StartRollback { rollback, .. } => Some(rollback),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_error_keeps_annotation() {
        let err = PhaseError::new(
            Phase::Notify,
            Arc::from("cache"),
            2,
            Some(Arc::from("reload")),
            ServiceError::fail("stale"),
        );
        assert_eq!(err.phase(), Phase::Notify);
        assert_eq!(err.service(), "cache");
        assert_eq!(err.index(), 2);
        assert_eq!(err.as_label(), "notify_error");
        assert!(err.to_string().contains("\"reload\""));
        assert!(matches!(err, PhaseError::Notify { ref key, .. } if &**key == "reload"));
    }

    #[test]
    fn runtime_error_labels_follow_phase() {
        let err: RuntimeError = PhaseError::new(
            Phase::Init,
            Arc::from("db"),
            0,
            None,
            ServiceError::fatal("no schema"),
        )
        .into();
        assert_eq!(err.as_label(), "initialization_error");
        assert!(err.as_phase().is_some_and(|p| p.service_error().is_fatal()));
        assert_eq!(RuntimeError::AlreadyRunning.as_label(), "runtime_already_running");
    }

    #[test]
    fn start_rollback_keeps_both_failures() {
        let err = RuntimeError::StartRollback {
            start: PhaseError::new(
                Phase::Start,
                Arc::from("http"),
                1,
                None,
                ServiceError::fail("bind"),
            ),
            rollback: PhaseError::new(
                Phase::Stop,
                Arc::from("db"),
                0,
                None,
                ServiceError::fail("flush failed"),
            ),
        };
        assert_eq!(err.as_label(), "start_rollback_error");
        assert_eq!(err.as_phase().map(|e| e.service()), Some("http"));
        assert_eq!(err.rollback_error().map(|e| e.phase()), Some(Phase::Stop));
        let text = err.to_string();
        assert!(text.contains("bind") && text.contains("flush failed"));
    }

    #[test]
    fn io_errors_convert_into_source() {
        let err: ServiceError = std::io::Error::other("disk").into();
        assert_eq!(err.as_label(), "service_error");
        assert_eq!(err.to_string(), "disk");
    }
}
