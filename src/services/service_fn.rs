//! # Closure-backed service (`ServiceFn`)
//!
//! [`ServiceFn`] assembles a service from optional per-phase closures. Each
//! closure *creates* a fresh future per call, so no state hides between phases;
//! shared state goes into an explicit `Arc<...>` captured by the closures.
//!
//! Phases without a hook behave like [`BaseService`](crate::BaseService):
//! they succeed immediately.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use svcwire::{Message, ServiceError, ServiceFn, ServiceRef};
//!
//! let seen = Arc::new(AtomicUsize::new(0));
//! let counter = seen.clone();
//!
//! let svc: ServiceRef = ServiceFn::new("counter")
//!     .on_start(|| async { Ok::<_, ServiceError>(()) })
//!     .on_notify(move |_msg: Message| {
//!         let counter = counter.clone();
//!         async move {
//!             counter.fetch_add(1, Ordering::Relaxed);
//!             Ok(())
//!         }
//!     })
//!     .arc();
//!
//! assert_eq!(svc.name(), "counter");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::ServiceError;
use crate::services::{Message, Service};

type PhaseHook = Box<dyn Fn() -> BoxFuture<'static, Result<(), ServiceError>> + Send + Sync>;
type NotifyHook =
    Box<dyn Fn(Message) -> BoxFuture<'static, Result<(), ServiceError>> + Send + Sync>;

/// Function-backed service implementation.
pub struct ServiceFn {
    name: Cow<'static, str>,
    init: Option<PhaseHook>,
    start: Option<PhaseHook>,
    stop: Option<PhaseHook>,
    notify: Option<NotifyHook>,
}

impl ServiceFn {
    /// Creates a service with no hooks; every phase succeeds.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            init: None,
            start: None,
            stop: None,
            notify: None,
        }
    }

    /// Sets the `init` hook.
    pub fn on_init<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ServiceError>> + Send + 'static,
    {
        self.init = Some(phase_hook(f));
        self
    }

    /// Sets the `start` hook.
    pub fn on_start<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ServiceError>> + Send + 'static,
    {
        self.start = Some(phase_hook(f));
        self
    }

    /// Sets the `stop` hook.
    pub fn on_stop<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ServiceError>> + Send + 'static,
    {
        self.stop = Some(phase_hook(f));
        self
    }

    /// Sets the `notify` hook. The hook receives its own clone of the message.
    pub fn on_notify<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Message) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ServiceError>> + Send + 'static,
    {
        self.notify = Some(Box::new(move |msg| Box::pin(f(msg))));
        self
    }

    /// Finishes the builder as a shared handle.
    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

fn phase_hook<F, Fut>(f: F) -> PhaseHook
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ServiceError>> + Send + 'static,
{
    Box::new(move || Box::pin(f()))
}

async fn call(hook: &Option<PhaseHook>) -> Result<(), ServiceError> {
    match hook {
        Some(f) => f().await,
        None => Ok(()),
    }
}

#[async_trait]
impl Service for ServiceFn {
    fn name(&self) -> &str {
        &self.name
    }

    async fn init(&self) -> Result<(), ServiceError> {
        call(&self.init).await
    }

    async fn start(&self) -> Result<(), ServiceError> {
        call(&self.start).await
    }

    async fn stop(&self) -> Result<(), ServiceError> {
        call(&self.stop).await
    }

    async fn notify(&self, msg: &Message) -> Result<(), ServiceError> {
        match &self.notify {
            Some(f) => f(msg.clone()).await,
            None => Ok(()),
        }
    }
}

impl fmt::Debug for ServiceFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceFn")
            .field("name", &self.name)
            .field("init", &self.init.is_some())
            .field("start", &self.start.is_some())
            .field("stop", &self.stop.is_some())
            .field("notify", &self.notify.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_hooks_succeed() {
        let svc = ServiceFn::new("empty");
        assert!(svc.init().await.is_ok());
        assert!(svc.start().await.is_ok());
        assert!(svc.notify(&Message::key_only("x")).await.is_ok());
        assert!(svc.stop().await.is_ok());
    }

    #[tokio::test]
    async fn hooks_are_called_per_phase() {
        let svc = ServiceFn::new("failing")
            .on_start(|| async { Err(ServiceError::fail("bind")) })
            .on_notify(|msg: Message| async move {
                if msg.key() == "bad" {
                    Err(ServiceError::fail("rejected"))
                } else {
                    Ok(())
                }
            });

        assert!(svc.init().await.is_ok());
        assert!(matches!(svc.start().await, Err(ServiceError::Fail { .. })));
        assert!(svc.notify(&Message::key_only("good")).await.is_ok());
        assert!(svc.notify(&Message::key_only("bad")).await.is_err());
        assert_eq!(
            format!("{svc:?}"),
            r#"ServiceFn { name: "failing", init: false, start: true, stop: false, notify: true }"#
        );
    }
}
