//! # Registry: ordered services and phase dispatch.
//!
//! The [`Registry`] holds services in registration order and drives them
//! through the lifecycle phases.
//!
//! ## Dispatch order
//! ```text
//! register(A); register(B); register(C);
//!
//! init_all()    A.init   ─► B.init   ─► C.init
//! start_all()   A.start  ─► B.start  ─► C.start
//! notify_all(m) A.notify ─► B.notify ─► C.notify
//! stop_all()    C.stop   ─► B.stop   ─► A.stop
//! ```
//!
//! ## Rules
//! - Append-only: order equals registration order, no reordering, no dedup.
//! - Sequential: one service at a time, each call awaited before the next.
//! - Fail-fast: the first error ends the pass and is returned as a
//!   [`PhaseError`]; no rollback, no retry.
//! - Phases do not gate each other: `start_all` does not check that
//!   `init_all` succeeded, and a failed broadcast does not affect later ones.
//! - `register` needs `&mut self`, phases need `&self`. Once the registry is
//!   shared (e.g. moved into a [`Runtime`](crate::Runtime)), it is frozen.
//!
//! Every pass publishes `PhaseStarting`, then `PhaseCompleted` or
//! `ServiceFailed`, on the registry's [`Bus`].

use std::sync::Arc;

use crate::error::{PhaseError, ServiceError};
use crate::events::{Bus, Event, EventKind};
use crate::services::{Message, Phase, Service, ServiceRef};

/// Ordered collection of services.
pub struct Registry {
    services: Vec<ServiceRef>,
    bus: Bus,
    shared_bus: bool,
}

impl Registry {
    /// Creates an empty registry with its own event bus.
    ///
    /// Events are dropped unless someone subscribes to [`Registry::bus`].
    /// [`RuntimeBuilder::build`](crate::RuntimeBuilder::build) swaps it for
    /// a bus sized by the runtime's config.
    pub fn new() -> Self {
        Self {
            services: Vec::new(),
            bus: Bus::default(),
            shared_bus: false,
        }
    }

    /// Creates an empty registry publishing on the given bus.
    ///
    /// A runtime built from this registry keeps publishing on the same bus,
    /// so receivers created beforehand see the whole lifecycle.
    pub fn with_bus(bus: Bus) -> Self {
        Self {
            services: Vec::new(),
            bus,
            shared_bus: true,
        }
    }

    /// Appends a service and returns its registration index.
    pub fn register(&mut self, service: ServiceRef) -> usize {
        let index = self.services.len();
        self.bus.publish(
            Event::new(EventKind::ServiceRegistered)
                .with_service(service.name())
                .with_index(index),
        );
        self.services.push(service);
        index
    }

    /// Chainable form of [`Registry::register`].
    #[must_use]
    pub fn with(mut self, service: ServiceRef) -> Self {
        self.register(service);
        self
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Service names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.services.iter().map(|s| s.name().to_string()).collect()
    }

    /// The bus this registry publishes on.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// True if the bus was supplied by the caller.
    pub(crate) fn has_shared_bus(&self) -> bool {
        self.shared_bus
    }

    pub(crate) fn set_bus(&mut self, bus: Bus) {
        self.bus = bus;
    }

    /// Publishes `ServiceRegistered` again for every service, in order.
    pub(crate) fn announce(&self) {
        for (index, svc) in self.services.iter().enumerate() {
            self.bus.publish(
                Event::new(EventKind::ServiceRegistered)
                    .with_service(svc.name())
                    .with_index(index),
            );
        }
    }

    /// Calls `init` on every service in registration order.
    pub async fn init_all(&self) -> Result<(), PhaseError> {
        self.forward(Call::Init).await
    }

    /// Calls `start` on every service in registration order.
    pub async fn start_all(&self) -> Result<(), PhaseError> {
        self.forward(Call::Start).await
    }

    /// Broadcasts `msg` to every service in registration order.
    ///
    /// With no services registered this is a no-op success.
    pub async fn notify_all(&self, msg: &Message) -> Result<(), PhaseError> {
        self.forward(Call::Notify(msg)).await
    }

    /// Calls `stop` on every service in reverse registration order.
    pub async fn stop_all(&self) -> Result<(), PhaseError> {
        self.stop_started(self.services.len()).await
    }

    /// Calls `stop` in reverse order on the first `count` registered services
    /// only (`count - 1` down to `0`). `count` is clamped to [`Registry::len`].
    ///
    /// Used to tear down the services that started before a start failure.
    pub async fn stop_started(&self, count: usize) -> Result<(), PhaseError> {
        let count = count.min(self.services.len());
        self.publish_starting(Phase::Stop, count, None);

        for (index, svc) in self.services[..count].iter().enumerate().rev() {
            if let Err(e) = svc.stop().await {
                return Err(self.fail(Phase::Stop, index, svc.as_ref(), None, e));
            }
        }

        self.publish_completed(Phase::Stop, count, None);
        Ok(())
    }

    /// Forward pass for init, start and notify.
    async fn forward(&self, call: Call<'_>) -> Result<(), PhaseError> {
        let phase = call.phase();
        let key = call.key();
        self.publish_starting(phase, self.services.len(), key.clone());

        for (index, svc) in self.services.iter().enumerate() {
            if let Err(e) = call.invoke(svc.as_ref()).await {
                return Err(self.fail(phase, index, svc.as_ref(), key, e));
            }
        }

        self.publish_completed(phase, self.services.len(), key);
        Ok(())
    }

    fn fail(
        &self,
        phase: Phase,
        index: usize,
        svc: &dyn Service,
        key: Option<Arc<str>>,
        source: ServiceError,
    ) -> PhaseError {
        let service: Arc<str> = Arc::from(svc.name());
        self.bus.publish(
            Event::new(EventKind::ServiceFailed)
                .with_phase(phase)
                .with_service(Arc::clone(&service))
                .with_index(index)
                .with_key(key.clone())
                .with_error(source.to_string()),
        );
        PhaseError::new(phase, service, index, key, source)
    }

    fn publish_starting(&self, phase: Phase, count: usize, key: Option<Arc<str>>) {
        self.bus.publish(
            Event::new(EventKind::PhaseStarting)
                .with_phase(phase)
                .with_count(count)
                .with_key(key),
        );
    }

    fn publish_completed(&self, phase: Phase, count: usize, key: Option<Arc<str>>) {
        self.bus.publish(
            Event::new(EventKind::PhaseCompleted)
                .with_phase(phase)
                .with_count(count)
                .with_key(key),
        );
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// A forward-dispatched service call.
#[derive(Clone, Copy)]
enum Call<'a> {
    Init,
    Start,
    Notify(&'a Message),
}

impl Call<'_> {
    fn phase(&self) -> Phase {
        match self {
            Call::Init => Phase::Init,
            Call::Start => Phase::Start,
            Call::Notify(_) => Phase::Notify,
        }
    }

    fn key(&self) -> Option<Arc<str>> {
        match self {
            Call::Notify(msg) => Some(msg.key_arc()),
            _ => None,
        }
    }

    async fn invoke(&self, svc: &dyn Service) -> Result<(), ServiceError> {
        match self {
            Call::Init => svc.init().await,
            Call::Start => svc.start().await,
            Call::Notify(msg) => svc.notify(msg).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::services::BaseService;

    type Journal = Arc<Mutex<Vec<String>>>;

    /// Records every call into a shared journal; fails the phases listed in `fail_on`.
    struct Spy {
        name: &'static str,
        journal: Journal,
        fail_on: Vec<Phase>,
    }

    impl Spy {
        fn arc(name: &'static str, journal: &Journal) -> ServiceRef {
            Self::failing(name, journal, &[])
        }

        fn failing(name: &'static str, journal: &Journal, fail_on: &[Phase]) -> ServiceRef {
            Arc::new(Self {
                name,
                journal: journal.clone(),
                fail_on: fail_on.to_vec(),
            })
        }

        fn record(&self, phase: Phase) -> Result<(), ServiceError> {
            self.journal
                .lock()
                .unwrap()
                .push(format!("{}.{}", self.name, phase));
            if self.fail_on.contains(&phase) {
                Err(ServiceError::fail(format!("{} {}", self.name, phase)))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl Service for Spy {
        fn name(&self) -> &str {
            self.name
        }
        async fn init(&self) -> Result<(), ServiceError> {
            self.record(Phase::Init)
        }
        async fn start(&self) -> Result<(), ServiceError> {
            self.record(Phase::Start)
        }
        async fn stop(&self) -> Result<(), ServiceError> {
            self.record(Phase::Stop)
        }
        async fn notify(&self, _msg: &Message) -> Result<(), ServiceError> {
            self.record(Phase::Notify)
        }
    }

    fn journal() -> Journal {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn take(j: &Journal) -> Vec<String> {
        std::mem::take(&mut *j.lock().unwrap())
    }

    fn abc(j: &Journal) -> Registry {
        Registry::new()
            .with(Spy::arc("a", j))
            .with(Spy::arc("b", j))
            .with(Spy::arc("c", j))
    }

    #[tokio::test]
    async fn forward_phases_follow_registration_order() {
        let j = journal();
        let reg = abc(&j);

        reg.init_all().await.unwrap();
        assert_eq!(take(&j), ["a.init", "b.init", "c.init"]);

        reg.start_all().await.unwrap();
        assert_eq!(take(&j), ["a.start", "b.start", "c.start"]);

        reg.notify_all(&Message::key_only("tick")).await.unwrap();
        assert_eq!(take(&j), ["a.notify", "b.notify", "c.notify"]);
    }

    #[tokio::test]
    async fn stop_runs_in_reverse_order() {
        let j = journal();
        let reg = abc(&j);

        reg.init_all().await.unwrap();
        reg.stop_all().await.unwrap();
        assert_eq!(
            take(&j),
            ["a.init", "b.init", "c.init", "c.stop", "b.stop", "a.stop"]
        );
    }

    #[tokio::test]
    async fn forward_failure_skips_later_services() {
        let j = journal();
        let reg = Registry::new()
            .with(Spy::arc("a", &j))
            .with(Spy::failing("b", &j, &[Phase::Start]))
            .with(Spy::arc("c", &j));

        let err = reg.start_all().await.unwrap_err();
        assert_eq!(take(&j), ["a.start", "b.start"]);
        assert_eq!(err.phase(), Phase::Start);
        assert_eq!(err.service(), "b");
        assert_eq!(err.index(), 1);
        assert!(matches!(err, PhaseError::Start { .. }));
    }

    #[tokio::test]
    async fn stop_failure_skips_earlier_services() {
        let j = journal();
        let reg = Registry::new()
            .with(Spy::arc("a", &j))
            .with(Spy::failing("b", &j, &[Phase::Stop]))
            .with(Spy::arc("c", &j));

        let err = reg.stop_all().await.unwrap_err();
        assert_eq!(take(&j), ["c.stop", "b.stop"]);
        assert!(matches!(err, PhaseError::Stop { index: 1, .. }));
    }

    #[tokio::test]
    async fn failed_broadcast_does_not_disable_later_ones() {
        let j = journal();
        let reg = Registry::new()
            .with(Spy::failing("a", &j, &[Phase::Notify]))
            .with(Spy::arc("b", &j));

        let err = reg
            .notify_all(&Message::new("reload", 7u32))
            .await
            .unwrap_err();
        assert!(matches!(err, PhaseError::Notify { ref key, .. } if &**key == "reload"));
        assert_eq!(take(&j), ["a.notify"]);

        let _ = reg.notify_all(&Message::key_only("again")).await;
        assert_eq!(take(&j), ["a.notify"]);
    }

    #[tokio::test]
    async fn start_does_not_require_successful_init() {
        let j = journal();
        let reg = Registry::new()
            .with(Spy::failing("a", &j, &[Phase::Init]))
            .with(Spy::arc("b", &j));

        assert!(reg.init_all().await.is_err());
        reg.start_all().await.unwrap();
        assert_eq!(take(&j), ["a.init", "a.start", "b.start"]);
    }

    #[tokio::test]
    async fn empty_registry_phases_succeed() {
        let reg = Registry::new();
        assert!(reg.is_empty());
        reg.init_all().await.unwrap();
        reg.start_all().await.unwrap();
        reg.notify_all(&Message::key_only("nobody")).await.unwrap();
        reg.stop_all().await.unwrap();
    }

    #[tokio::test]
    async fn default_stop_keeps_its_place() {
        let j = journal();
        let reg = Registry::new()
            .with(Spy::arc("a", &j))
            .with(Arc::new(BaseService))
            .with(Spy::arc("c", &j));

        reg.stop_all().await.unwrap();
        assert_eq!(take(&j), ["c.stop", "a.stop"]);
        assert_eq!(reg.names(), ["a", "base", "c"]);
    }

    #[tokio::test]
    async fn stop_started_only_touches_prefix() {
        let j = journal();
        let reg = abc(&j);

        reg.stop_started(2).await.unwrap();
        assert_eq!(take(&j), ["b.stop", "a.stop"]);

        reg.stop_started(0).await.unwrap();
        reg.stop_started(99).await.unwrap();
        assert_eq!(take(&j), ["c.stop", "b.stop", "a.stop"]);
    }

    #[tokio::test]
    async fn duplicates_are_kept() {
        let j = journal();
        let svc = Spy::arc("a", &j);
        let mut reg = Registry::new();
        assert_eq!(reg.register(svc.clone()), 0);
        assert_eq!(reg.register(svc), 1);

        reg.init_all().await.unwrap();
        assert_eq!(take(&j), ["a.init", "a.init"]);
    }

    #[tokio::test]
    async fn passes_publish_events() {
        let j = journal();
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let reg = Registry::with_bus(bus)
            .with(Spy::arc("a", &j))
            .with(Spy::failing("b", &j, &[Phase::Init]));

        let _ = reg.init_all().await;

        let kinds: Vec<EventKind> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|e| e.kind)
            .collect();
        assert_eq!(
            kinds,
            [
                EventKind::ServiceRegistered,
                EventKind::ServiceRegistered,
                EventKind::PhaseStarting,
                EventKind::ServiceFailed,
            ]
        );
    }
}
