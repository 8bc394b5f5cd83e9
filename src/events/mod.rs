//! Upstream event model and the bus that fans it out.
//!
//! Modules:
//! - [`event`]: [`SdkEvent`], [`PlacementState`], [`FinishReason`];
//! - [`bus`]: [`PlacementBus`], the sink the upstream SDK publishes into.

mod bus;
mod event;

pub use bus::PlacementBus;
pub use event::{FinishReason, PlacementState, SdkErrorKind, SdkEvent};
