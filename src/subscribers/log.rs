//! # LogWriter: lifecycle events as `tracing` records
//!
//! A subscriber that turns every [`Event`] into one `tracing` record under the
//! `svcwire` target. Install any `tracing` subscriber (e.g. `tracing-subscriber`
//! with an `EnvFilter`) to see them.
//!
//! ## Levels
//! - `ServiceFailed`, failed `Stopped` → `ERROR`
//! - `ShutdownRequested`, `StartRollback` → `WARN`
//! - `Running`, successful `Stopped` → `INFO`
//! - registration and phase progress → `DEBUG`
//!
//! ## Example output (fmt layer)
//! ```text
//! DEBUG svcwire: phase starting phase=init services=2
//! DEBUG svcwire: phase completed phase=init services=2
//!  INFO svcwire: running
//!  WARN svcwire: shutdown requested signal=SIGTERM
//! ERROR svcwire: service failed phase=stop service="db" index=0 error="flush timed out"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn phase_of(e: &Event) -> &'static str {
    e.phase.map(|p| p.as_str()).unwrap_or("-")
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::ServiceRegistered => {
                tracing::debug!(
                    target: "svcwire",
                    service = e.service.as_deref().unwrap_or("?"),
                    index = e.index,
                    "service registered"
                );
            }
            EventKind::PhaseStarting => {
                tracing::debug!(
                    target: "svcwire",
                    phase = phase_of(e),
                    services = e.count,
                    key = e.key.as_deref(),
                    "phase starting"
                );
            }
            EventKind::PhaseCompleted => {
                tracing::debug!(
                    target: "svcwire",
                    phase = phase_of(e),
                    services = e.count,
                    key = e.key.as_deref(),
                    "phase completed"
                );
            }
            EventKind::ServiceFailed => {
                tracing::error!(
                    target: "svcwire",
                    phase = phase_of(e),
                    service = e.service.as_deref().unwrap_or("?"),
                    index = e.index,
                    key = e.key.as_deref(),
                    error = e.error.as_deref().unwrap_or("?"),
                    "service failed"
                );
            }
            EventKind::Running => {
                tracing::info!(target: "svcwire", "running");
            }
            EventKind::ShutdownRequested => match e.signal {
                Some(sig) => {
                    tracing::warn!(target: "svcwire", signal = %sig, "shutdown requested");
                }
                None => {
                    tracing::warn!(target: "svcwire", "shutdown requested programmatically");
                }
            },
            EventKind::StartRollback => {
                tracing::warn!(
                    target: "svcwire",
                    services = e.count,
                    "start failed; stopping started services"
                );
            }
            EventKind::Stopped => match e.error.as_deref() {
                Some(error) => tracing::error!(target: "svcwire", error, "stopped with error"),
                None => tracing::info!(target: "svcwire", "stopped"),
            },
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
