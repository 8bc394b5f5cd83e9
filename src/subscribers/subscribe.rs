//! # Core subscriber trait and subscription handle.
//!
//! `Subscribe` is the extension point for receiving upstream SDK events
//! from the [`SubscriptionRegistry`](crate::SubscriptionRegistry). Each
//! `AdLifecycle` implements it; a host-level proxy can too.
//!
//! ## Contract
//! - `on_event` is called on the upstream callback thread, inside a
//!   dispatch pass. Implementations must not block for long and must take
//!   their own locks (the registry holds none while calling out).
//! - The registry holds subscribers weakly. Ownership stays with the
//!   request that created the subscriber; a dropped subscriber is skipped
//!   and pruned.
//! - Unsubscribing is done through the [`SubscriberHandle`] returned at
//!   subscribe time. Cancelling the handle from inside `on_event` is
//!   allowed and suppresses any later delivery in the same pass.

use tokio_util::sync::CancellationToken;

use crate::events::SdkEvent;

/// Contract for event subscribers.
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single upstream event.
    ///
    /// Only called while the subscription is live (handle not cancelled,
    /// subscriber not dropped).
    fn on_event(&self, event: &SdkEvent);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Handle identifying one subscription entry.
///
/// Cancelling the handle removes the entry logically at once (it will not
/// be delivered to again, even within an in-flight dispatch pass) and
/// physically on the next lazy prune. Cloneable so a subscriber can keep a
/// copy to cancel itself from inside its own callback.
#[derive(Clone, Debug)]
pub struct SubscriberHandle {
    token: CancellationToken,
}

impl SubscriberHandle {
    pub(crate) fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Logically removes the subscription. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// True once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}
