use std::sync::Arc;

use tokio::{sync::broadcast::error::RecvError, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use super::{
    registry::Registry,
    runtime::{Fanout, Runtime},
};
use crate::{
    config::Config,
    events::Bus,
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for constructing a [`Runtime`] around a populated [`Registry`].
pub struct RuntimeBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl RuntimeBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers, replacing any set before.
    ///
    /// Subscribers receive lifecycle events through dedicated workers with
    /// bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Adds one event subscriber.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Freezes the registry and builds the runtime.
    ///
    /// - picks the event bus: the registry's own if it was created with
    ///   [`Registry::with_bus`], otherwise a new one sized by
    ///   [`Config::bus_capacity`]
    /// - spawns one worker per subscriber plus the bus listener feeding them
    /// - on a new bus, re-announces already registered services
    ///
    /// With at least one subscriber this must be called within a tokio runtime.
    pub fn build(self, mut registry: Registry) -> Arc<Runtime> {
        let shared = registry.has_shared_bus();
        let bus = if shared {
            registry.bus().clone()
        } else {
            Bus::new(self.cfg.bus_capacity_clamped())
        };

        let set = Arc::new(SubscriberSet::new(self.subscribers));
        let done = CancellationToken::new();
        let listener =
            (!set.is_empty()).then(|| spawn_listener(&bus, Arc::clone(&set), done.clone()));

        if !shared {
            registry.set_bus(bus.clone());
            registry.announce();
        }

        Arc::new(Runtime::new_internal(
            self.cfg,
            Arc::new(registry),
            bus,
            Fanout {
                set,
                listener,
                done,
            },
        ))
    }
}

/// Forwards bus events to the subscriber set until `done` fires and the
/// backlog is delivered.
fn spawn_listener(bus: &Bus, set: Arc<SubscriberSet>, done: CancellationToken) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                res = rx.recv() => match res {
                    Ok(ev) => set.emit(&ev),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "svcwire event listener lagged; events dropped");
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = done.cancelled() => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use crate::services::BaseService;

    #[tokio::test]
    async fn build_keeps_a_caller_supplied_bus() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let registry = Registry::with_bus(bus).with(Arc::new(BaseService));

        let rt = RuntimeBuilder::new(Config::default().with_signals(Vec::<crate::Signal>::new()))
            .build(registry);
        rt.request_stop();
        rt.run().await.unwrap();

        let kinds: Vec<EventKind> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|e| e.kind)
            .collect();
        // Registered once, before build; not re-announced.
        assert_eq!(
            kinds
                .iter()
                .filter(|k| **k == EventKind::ServiceRegistered)
                .count(),
            1
        );
        assert_eq!(kinds.last(), Some(&EventKind::Stopped));
    }

    #[tokio::test]
    async fn build_replaces_the_default_bus() {
        let registry = Registry::new().with(Arc::new(BaseService));
        let mut old = registry.bus().subscribe();
        let rt = RuntimeBuilder::new(Config::default()).build(registry);

        let mut rx = rt.bus().subscribe();
        rt.notify(&crate::Message::key_only("ping")).await.unwrap();
        assert!(rx.try_recv().is_ok());
        assert!(old.try_recv().is_err());
    }
}
