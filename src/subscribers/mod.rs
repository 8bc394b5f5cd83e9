//! Subscriber API: the [`Subscribe`] trait, subscription handles, and the
//! keyed fan-out registry.
//!
//! Modules:
//! - [`subscribe`]: the subscriber contract and [`SubscriberHandle`];
//! - [`registry`]: the thread-safe multimap that routes one upstream event
//!   to global and per-placement subscribers.

mod registry;
mod subscribe;

pub use registry::{SubscriptionKey, SubscriptionRegistry};
pub use subscribe::{Subscribe, SubscriberHandle};
