//! # Runtime: drives a frozen registry from start to shutdown.
//!
//! The [`Runtime`] owns the registry (behind an `Arc`, so registration is
//! over), the event bus and the subscriber fan-out. [`Runtime::run`] turns the
//! registry's phases into a blocking lifecycle:
//!
//! ```text
//! run()
//!   ├─► SignalListener::install(signals)        Err ─► RuntimeError::Signal
//!   ├─► registry.init_all()                     Err ─► return (nothing stopped)
//!   ├─► registry.start_all()                    Err at k ─► StartFailurePolicy:
//!   │                                                 ├─ StopStarted ─► stop_started(k)
//!   │                                                 ├─ StopAll     ─► stop_all()
//!   │                                                 └─ Skip        ─► (nothing)
//!   │                                              ─► return start error
//!   │                                                 (StartRollback if the teardown failed too)
//!   ├─► publish(Running)
//!   ├─► select! {
//!   │     stop_token.cancelled()  (request_stop / StopHandle, any thread)
//!   │     listener.recv()         (OS signal)
//!   │   } ─► publish(ShutdownRequested)
//!   └─► registry.stop_all() ─► return its result
//! ```
//!
//! `run` is meant to be spawned on its own task while the rest of the program
//! keeps an `Arc<Runtime>` to [`notify`](Runtime::notify) and finally
//! [`request_stop`](Runtime::request_stop). Before exiting, await
//! [`shutdown_subscribers`](Runtime::shutdown_subscribers) so subscribers see
//! the final `Stopped` event.
//!
//! ## Example
//! ```rust
//! use svcwire::{BaseService, Config, Registry, Runtime, Signal};
//! use std::sync::Arc;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut registry = Registry::new();
//!     registry.register(Arc::new(BaseService));
//!
//!     let cfg = Config::default().with_signals(Vec::<Signal>::new());
//!     let runtime = Runtime::builder(cfg).build(registry);
//!
//!     let stop = runtime.stop_handle();
//!     let run = tokio::spawn({
//!         let runtime = runtime.clone();
//!         async move { runtime.run().await }
//!     });
//!
//!     stop.request_stop();
//!     run.await??;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::{sync::Mutex, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use super::builder::RuntimeBuilder;
use super::registry::Registry;
use super::shutdown::{Signal, SignalListener};
use crate::config::Config;
use crate::error::{PhaseError, RuntimeError};
use crate::events::{Bus, Event, EventKind};
use crate::services::Message;
use crate::subscribers::SubscriberSet;

/// Cloneable handle that requests termination of a running [`Runtime`].
///
/// Safe to use from any thread, including threads outside the tokio runtime.
#[derive(Clone, Debug)]
pub struct StopHandle {
    token: CancellationToken,
}

impl StopHandle {
    /// Requests termination. Idempotent.
    pub fn request_stop(&self) {
        self.token.cancel();
    }

    /// True once a stop has been requested.
    pub fn is_requested(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Subscriber workers plus the bus listener feeding them.
pub(super) struct Fanout {
    pub(super) set: Arc<SubscriberSet>,
    pub(super) listener: Option<JoinHandle<()>>,
    pub(super) done: CancellationToken,
}

/// Runs a frozen [`Registry`] through init, start, wait and stop.
pub struct Runtime {
    cfg: Config,
    registry: Arc<Registry>,
    bus: Bus,
    subscribers: usize,
    fanout: Mutex<Option<Fanout>>,
    stop: CancellationToken,
    started: AtomicBool,
}

impl Runtime {
    /// Returns a builder for a runtime with the given configuration.
    pub fn builder(cfg: Config) -> RuntimeBuilder {
        RuntimeBuilder::new(cfg)
    }

    pub(super) fn new_internal(
        cfg: Config,
        registry: Arc<Registry>,
        bus: Bus,
        fanout: Fanout,
    ) -> Self {
        Self {
            cfg,
            registry,
            bus,
            subscribers: fanout.set.len(),
            fanout: Mutex::new(Some(fanout)),
            stop: CancellationToken::new(),
            started: AtomicBool::new(false),
        }
    }

    /// Runs the lifecycle using the configured signal set.
    ///
    /// Returns after stop completes, or early if init or start fails.
    /// A runtime runs at most once; later calls return
    /// [`RuntimeError::AlreadyRunning`].
    pub async fn run(&self) -> Result<(), RuntimeError> {
        self.run_with_signals(&self.cfg.signals).await
    }

    /// Like [`Runtime::run`], observing exactly `signals` (empty = programmatic stop only).
    pub async fn run_with_signals(&self, signals: &[Signal]) -> Result<(), RuntimeError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(RuntimeError::AlreadyRunning);
        }

        let res = self.drive(signals).await;
        let stopped = match &res {
            Ok(()) => Event::new(EventKind::Stopped),
            Err(e) => Event::new(EventKind::Stopped).with_error(e.to_string()),
        };
        self.bus.publish(stopped);
        res
    }

    async fn drive(&self, signals: &[Signal]) -> Result<(), RuntimeError> {
        let mut listener = SignalListener::install(signals).map_err(RuntimeError::Signal)?;

        self.registry.init_all().await?;
        if let Err(start) = self.registry.start_all().await {
            return Err(match self.rollback_start(&start).await {
                Some(rollback) => RuntimeError::StartRollback { start, rollback },
                None => start.into(),
            });
        }

        self.bus.publish(Event::new(EventKind::Running));

        let requested = tokio::select! {
            _ = self.stop.cancelled() => Event::new(EventKind::ShutdownRequested),
            sig = listener.recv() => {
                self.stop.cancel();
                Event::new(EventKind::ShutdownRequested).with_signal(sig)
            }
        };
        self.bus.publish(requested);

        self.registry.stop_all().await?;
        Ok(())
    }

    /// Applies the start-failure policy and returns the stop failure, if the
    /// teardown hit one.
    async fn rollback_start(&self, err: &PhaseError) -> Option<PhaseError> {
        let count = self
            .cfg
            .start_failure
            .stop_count(err.index(), self.registry.len());
        if count == 0 {
            return None;
        }
        self.bus
            .publish(Event::new(EventKind::StartRollback).with_count(count));
        self.registry.stop_started(count).await.err()
    }

    /// Requests termination of [`Runtime::run`].
    ///
    /// A request made before `run` reaches its waiting point is kept: `run`
    /// then goes straight from start to stop.
    pub fn request_stop(&self) {
        self.stop.cancel();
    }

    /// Returns a cloneable handle to [`Runtime::request_stop`].
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            token: self.stop.clone(),
        }
    }

    /// True once termination was requested (programmatically or by signal).
    pub fn is_stop_requested(&self) -> bool {
        self.stop.is_cancelled()
    }

    /// Runs the init phase on the registry.
    pub async fn init(&self) -> Result<(), PhaseError> {
        self.registry.init_all().await
    }

    /// Runs the start phase on the registry.
    pub async fn start(&self) -> Result<(), PhaseError> {
        self.registry.start_all().await
    }

    /// Broadcasts a message to every service, in registration order.
    pub async fn notify(&self, msg: &Message) -> Result<(), PhaseError> {
        self.registry.notify_all(msg).await
    }

    /// Runs the stop phase on the registry, in reverse order.
    ///
    /// This calls the services directly; it does not unblock [`Runtime::run`].
    /// Use [`Runtime::request_stop`] for that.
    pub async fn stop(&self) -> Result<(), PhaseError> {
        self.registry.stop_all().await
    }

    /// The frozen registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The event bus shared with the registry.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Number of attached subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
    }

    /// Delivers every event published so far to the subscribers, then stops
    /// their workers.
    ///
    /// Call it after [`Runtime::run`] returned. Events published afterwards
    /// reach bus receivers only. Later calls are no-ops.
    pub async fn shutdown_subscribers(&self) {
        let Some(fanout) = self.fanout.lock().await.take() else {
            return;
        };
        fanout.done.cancel();
        if let Some(listener) = fanout.listener {
            let _ = listener.await;
        }
        if let Ok(set) = Arc::try_unwrap(fanout.set) {
            set.shutdown().await;
        }
    }

    /// Runtime configuration.
    pub fn config(&self) -> &Config {
        &self.cfg
    }
}
