//! # svcwire
//!
//! **svcwire** composes independently written services into one process
//! lifecycle. Services are registered in order; the registry then drives them
//! through the phases *init*, *start*, *notify* and *stop*: forward for the
//! first three, reverse for stop. A service registered after its dependency
//! therefore starts after it and stops before it, without either knowing
//! about the other.
//!
//! ## Architecture
//! ```text
//!     ┌───────────┐ ┌───────────┐ ┌───────────┐
//!     │ Service A │ │ Service B │ │ Service C │     register(A), register(B), register(C)
//!     └─────┬─────┘ └─────┬─────┘ └─────┬─────┘
//!           ▼             ▼             ▼
//! ┌─────────────────────────────────────────────────┐
//! │ Registry  [A, B, C]                             │
//! │  init_all / start_all / notify_all  : A → B → C │
//! │  stop_all                           : C → B → A │
//! │  fail-fast: first error ends the pass           │
//! └───────────────┬───────────────────────┬─────────┘
//!                 │ owned (Arc, frozen)   │ publish(Event)
//!                 ▼                       ▼
//! ┌──────────────────────────────┐   ┌─────────┐    ┌───────────────┐
//! │ Runtime                      │──►│   Bus   │───►│ SubscriberSet │──► LogWriter, ...
//! │  run(): init → start → wait  │   └─────────┘    └───────────────┘
//! │         → stop               │
//! │  wait ends on request_stop() │◄── StopHandle (any thread)
//! │  or an OS signal             │◄── SIGINT / SIGTERM / ...
//! └──────────────────────────────┘
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                          |
//! |-------------------|---------------------------------------------------------------|---------------------------------------------|
//! | **Services**      | Lifecycle capabilities with no-op defaults.                   | [`Service`], [`BaseService`], [`ServiceFn`] |
//! | **Registry**      | Ordered registration and fail-fast phase dispatch.            | [`Registry`], [`Phase`], [`Message`]        |
//! | **Runtime**       | Blocking run loop, programmatic and OS-signal stop.           | [`Runtime`], [`StopHandle`], [`Signal`]     |
//! | **Policies**      | Teardown after a failed start phase.                          | [`StartFailurePolicy`]                      |
//! | **Errors**        | Phase-annotated errors.                                       | [`PhaseError`], [`ServiceError`], [`RuntimeError`] |
//! | **Subscriber API**| Observe lifecycle events.                                     | [`Subscribe`], [`Event`], [`EventKind`]     |
//! | **Configuration** | Runtime settings.                                             | [`Config`]                                  |
//!
//! ## Optional features
//! - `logging` (default): exports [`LogWriter`], which renders events through `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use svcwire::{BaseService, Config, Message, Registry, Runtime, ServiceError, ServiceFn, Signal};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut registry = Registry::new();
//!     registry.register(Arc::new(BaseService));
//!     registry.register(
//!         ServiceFn::new("printer")
//!             .on_notify(|msg: Message| async move {
//!                 println!("got {}", msg.key());
//!                 Ok::<_, ServiceError>(())
//!             })
//!             .arc(),
//!     );
//!
//!     // No OS signals for this example: stop is requested programmatically.
//!     let cfg = Config::default().with_signals(Vec::<Signal>::new());
//!     let runtime = Runtime::builder(cfg).build(registry);
//!
//!     let run = tokio::spawn({
//!         let runtime = runtime.clone();
//!         async move { runtime.run().await }
//!     });
//!
//!     runtime.notify(&Message::new("NullMessage", "change")).await?;
//!     runtime.request_stop();
//!     run.await??;
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod policies;
mod services;
mod subscribers;

// ---- Public re-exports ----

pub use config::{Config, DEFAULT_BUS_CAPACITY};
pub use crate::core::{Registry, Runtime, RuntimeBuilder, Signal, SignalListener, StopHandle};
pub use error::{BoxError, PhaseError, RuntimeError, ServiceError};
pub use events::{Bus, Event, EventKind};
pub use policies::StartFailurePolicy;
pub use services::{BaseService, Message, Phase, Service, ServiceFn, ServiceRef};
pub use subscribers::{Subscribe, SubscriberSet};

// Built-in `tracing` subscriber; enabled by default.
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
