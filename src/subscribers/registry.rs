//! # SubscriptionRegistry: keyed fan-out over weakly-held subscribers.
//!
//! [`SubscriptionRegistry`] is a thread-safe multimap from a
//! [`SubscriptionKey`] (a placement id or the global key) to subscriber
//! entries. One upstream event is fanned out to every interested
//! subscriber:
//!
//! ```text
//!    dispatch(Placement("a"), &event)
//!        │            (snapshot under lock, deliver outside it)
//!        ├──► global subscriber 1          (subscription order)
//!        ├──► global subscriber 2
//!        ├──► placement "a" subscriber 1   (subscription order)
//!        └──► placement "a" subscriber 2
//! ```
//!
//! ## What it guarantees
//! - Global entries are delivered before per-placement entries, each group
//!   in FIFO subscription order. A host-level proxy subscribed globally
//!   therefore sees every event before per-placement routing.
//! - A snapshot of the matching entries is taken before iterating, so
//!   subscribing or unsubscribing during dispatch never invalidates the
//!   pass. An entry cancelled mid-pass (including by its own callback) is
//!   skipped for the rest of the pass.
//! - Panics inside subscribers are caught and logged (isolation); the
//!   remaining subscribers still receive the event.
//! - Entries whose subscriber was dropped or whose handle was cancelled are
//!   skipped and lazily pruned.
//!
//! ## What it does **not** guarantee
//! - No cross-key ordering: dispatches for different placements may
//!   interleave if the upstream source is multi-threaded.
//! - Best-effort cancellation: an event already snapshotted may still reach
//!   a subscriber that cancels concurrently from another thread.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::events::SdkEvent;

use super::{Subscribe, SubscriberHandle};

/// Routing key for subscriptions and dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SubscriptionKey {
    /// Receives every event, before any per-placement delivery.
    Global,
    /// Receives events for one placement id.
    Placement(Arc<str>),
}

/// One registered subscriber.
struct Entry {
    handle: SubscriberHandle,
    listener: Weak<dyn Subscribe>,
}

impl Entry {
    /// Live entries upgrade and are not cancelled; everything else is
    /// garbage to prune.
    fn live(&self) -> Option<(SubscriberHandle, Arc<dyn Subscribe>)> {
        if self.handle.is_cancelled() {
            return None;
        }
        self.listener
            .upgrade()
            .map(|sub| (self.handle.clone(), sub))
    }

    fn is_live(&self) -> bool {
        !self.handle.is_cancelled() && self.listener.strong_count() > 0
    }
}

/// Thread-safe multimap of event subscribers.
///
/// All mutation and snapshotting happens under one internal mutex; the lock
/// is never held while a subscriber callback runs.
pub struct SubscriptionRegistry {
    inner: Mutex<Maps>,
}

#[derive(Default)]
struct Maps {
    global: Vec<Entry>,
    placements: HashMap<Arc<str>, Vec<Entry>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Maps::default()),
        }
    }

    /// Registers a subscriber under `key` and returns its handle.
    ///
    /// The registry keeps only a weak reference; the caller retains
    /// ownership of the subscriber.
    pub fn subscribe(&self, key: SubscriptionKey, listener: Weak<dyn Subscribe>) -> SubscriberHandle {
        let handle = SubscriberHandle::new();
        let entry = Entry {
            handle: handle.clone(),
            listener,
        };

        let mut maps = self.inner.lock();
        match key {
            SubscriptionKey::Global => maps.global.push(entry),
            SubscriptionKey::Placement(id) => maps.placements.entry(id).or_default().push(entry),
        }
        handle
    }

    /// Cancels the handle and prunes dead entries.
    ///
    /// Equivalent to `handle.cancel()` plus an eager sweep; safe to call
    /// from inside a dispatch callback (the lock is not held during
    /// delivery) and idempotent.
    pub fn unsubscribe(&self, handle: &SubscriberHandle) {
        handle.cancel();
        self.prune();
    }

    /// Delivers `event` to all global subscribers, then (for a placement
    /// key) to that placement's subscribers, in subscription order.
    ///
    /// Dead and cancelled entries encountered while snapshotting are
    /// dropped from the maps.
    pub fn dispatch(&self, key: &SubscriptionKey, event: &SdkEvent) {
        let snapshot = self.snapshot(key);

        for (handle, sub) in snapshot {
            // Re-checked per delivery: a subscriber earlier in this pass may
            // have cancelled a later one.
            if handle.is_cancelled() {
                continue;
            }
            if let Err(panic_err) = catch_unwind(AssertUnwindSafe(|| sub.on_event(event))) {
                log::warn!(
                    "subscriber '{}' panicked handling {} event: {:?}",
                    sub.name(),
                    event.as_label(),
                    panic_err
                );
            }
        }
    }

    /// Drops cancelled and dropped entries from every key.
    pub fn prune(&self) {
        let mut maps = self.inner.lock();
        maps.global.retain(Entry::is_live);
        maps.placements.retain(|_, entries| {
            entries.retain(Entry::is_live);
            !entries.is_empty()
        });
    }

    /// Number of live entries under `key`.
    pub fn len(&self, key: &SubscriptionKey) -> usize {
        let maps = self.inner.lock();
        let entries = match key {
            SubscriptionKey::Global => Some(&maps.global),
            SubscriptionKey::Placement(id) => maps.placements.get(id),
        };
        entries.map_or(0, |e| e.iter().filter(|en| en.is_live()).count())
    }

    /// Snapshot of live entries for one dispatch pass: globals first, then
    /// the placement's own entries. Prunes garbage in passing.
    fn snapshot(&self, key: &SubscriptionKey) -> Vec<(SubscriberHandle, Arc<dyn Subscribe>)> {
        let mut maps = self.inner.lock();
        let mut out = Vec::new();

        collect_live(&mut maps.global, &mut out);
        if let SubscriptionKey::Placement(id) = key {
            if let Some(entries) = maps.placements.get_mut(id) {
                collect_live(entries, &mut out);
                if entries.is_empty() {
                    maps.placements.remove(id);
                }
            }
        }
        out
    }
}

impl Default for SubscriptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Moves upgraded live entries into `out`, retaining only live ones.
fn collect_live(entries: &mut Vec<Entry>, out: &mut Vec<(SubscriberHandle, Arc<dyn Subscribe>)>) {
    entries.retain(|entry| match entry.live() {
        Some(pair) => {
            out.push(pair);
            true
        }
        None => false,
    });
}
