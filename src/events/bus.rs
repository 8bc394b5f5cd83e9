//! # Placement bus: the upstream stream's entry point into this crate.
//!
//! The third-party SDK emits all of its events through one global listener.
//! [`PlacementBus`] is that listener's sink: the embedder (or the SDK
//! implementation itself, which is handed a bus clone at init) calls
//! [`PlacementBus::publish`] for every upstream callback, and the bus
//! routes the event through the [`SubscriptionRegistry`]:
//!
//! ```text
//! Upstream SDK (one callback thread)
//!      │ publish(SdkEvent)
//!      ▼
//! PlacementBus ──► SubscriptionRegistry::dispatch(key, &event)
//!                      ├─► global subscribers   (host proxy first)
//!                      └─► placement subscribers (FIFO)
//! ```
//!
//! Placement-carrying events dispatch under their placement key; global
//! errors dispatch under [`SubscriptionKey::Global`] and reach global
//! subscribers only.
//!
//! Cheap to clone (internally holds an `Arc`-backed registry).

use std::sync::{Arc, Weak};

use crate::subscribers::{Subscribe, SubscriberHandle, SubscriptionKey, SubscriptionRegistry};

use super::event::SdkEvent;

/// Fan-out sink for the upstream SDK's global event stream.
#[derive(Clone)]
pub struct PlacementBus {
    registry: Arc<SubscriptionRegistry>,
}

impl PlacementBus {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(SubscriptionRegistry::new()),
        }
    }

    /// Routes one upstream event to all interested subscribers.
    ///
    /// Synchronous: returns after every live subscriber has been invoked
    /// (faults isolated per subscriber).
    pub fn publish(&self, event: &SdkEvent) {
        let key = match event.placement() {
            Some(placement) => SubscriptionKey::Placement(Arc::clone(placement)),
            None => SubscriptionKey::Global,
        };
        log::debug!("dispatching {} event for {:?}", event.as_label(), key);
        self.registry.dispatch(&key, event);
    }

    /// Subscribes a listener to one placement's events.
    pub fn subscribe_placement(
        &self,
        placement: &Arc<str>,
        listener: Weak<dyn Subscribe>,
    ) -> SubscriberHandle {
        self.registry
            .subscribe(SubscriptionKey::Placement(Arc::clone(placement)), listener)
    }

    /// Subscribes a listener to every event (delivered before per-placement
    /// subscribers).
    pub fn subscribe_global(&self, listener: Weak<dyn Subscribe>) -> SubscriberHandle {
        self.registry.subscribe(SubscriptionKey::Global, listener)
    }

    /// Cancels a subscription and sweeps dead entries.
    pub fn unsubscribe(&self, handle: &SubscriberHandle) {
        self.registry.unsubscribe(handle);
    }

    /// The underlying registry, for direct keyed dispatch in tests or
    /// host-side plumbing.
    pub fn registry(&self) -> &SubscriptionRegistry {
        &self.registry
    }
}

impl Default for PlacementBus {
    fn default() -> Self {
        Self::new()
    }
}
