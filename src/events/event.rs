//! # Upstream SDK events and placement states.
//!
//! The third-party SDK owns a single global event stream. [`SdkEvent`]
//! models that stream as a tagged enum: one variant per upstream callback,
//! each carrying the placement it concerns (except [`SdkEvent::Error`],
//! which is global).
//!
//! [`PlacementState`] is the availability snapshot returned by
//! `NetworkSdk::placement_state` and carried by
//! [`SdkEvent::StateChanged`]; [`FinishReason`] classifies how a shown ad
//! ended and decides whether a reward is granted.

use std::sync::Arc;

/// Availability of a placement as reported by the upstream SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementState {
    /// An ad is cached and ready to show.
    Ready,
    /// No ad inventory is available for this placement.
    NoFill,
    /// The placement is disabled upstream.
    Disabled,
    /// The SDK is still fetching inventory.
    Waiting,
    /// The SDK has no information yet (e.g. not initialized).
    Unknown,
}

impl PlacementState {
    /// True for the states that definitively deny fill (`NoFill`, `Disabled`).
    ///
    /// A load observing one of these fails immediately instead of waiting
    /// for further events.
    #[inline]
    pub fn is_fill_denied(self) -> bool {
        matches!(self, PlacementState::NoFill | PlacementState::Disabled)
    }
}

/// How a shown ad finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// Watched to the end; rewarded placements grant their reward.
    Completed,
    /// Skipped by the user; no reward.
    Skipped,
    /// Playback failed; no reward.
    Error,
}

/// Classification of upstream SDK errors carried by [`SdkEvent::Error`].
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdkErrorKind {
    /// The SDK was used before initialization finished.
    NotInitialized,
    /// Initialization itself failed.
    InitializeFailed,
    /// A call was made with invalid arguments.
    InvalidArgument,
    /// Showing an ad failed.
    ShowError,
    /// Anything else the SDK reports.
    Internal,
}

/// One event from the upstream SDK's global stream.
///
/// Placement ids are `Arc<str>` so cloning an event for dispatch is cheap.
#[derive(Debug, Clone)]
pub enum SdkEvent {
    /// Availability of a placement changed.
    StateChanged {
        placement: Arc<str>,
        old: PlacementState,
        new: PlacementState,
    },
    /// Playback started for a placement that is being shown.
    Start { placement: Arc<str> },
    /// The user clicked the ad.
    Click { placement: Arc<str> },
    /// Playback finished.
    Finish {
        placement: Arc<str>,
        reason: FinishReason,
    },
    /// A global SDK error; not tied to a placement.
    Error {
        kind: SdkErrorKind,
        message: Arc<str>,
    },
}

impl SdkEvent {
    /// The placement this event concerns, if any.
    ///
    /// [`SdkEvent::Error`] returns `None`: it is routed to global
    /// subscribers only.
    pub fn placement(&self) -> Option<&Arc<str>> {
        match self {
            SdkEvent::StateChanged { placement, .. }
            | SdkEvent::Start { placement }
            | SdkEvent::Click { placement }
            | SdkEvent::Finish { placement, .. } => Some(placement),
            SdkEvent::Error { .. } => None,
        }
    }

    /// Short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            SdkEvent::StateChanged { .. } => "state_changed",
            SdkEvent::Start { .. } => "start",
            SdkEvent::Click { .. } => "click",
            SdkEvent::Finish { .. } => "finish",
            SdkEvent::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_accessor() {
        let ev = SdkEvent::Start {
            placement: "video".into(),
        };
        assert_eq!(ev.placement().map(|p| &**p), Some("video"));

        let err = SdkEvent::Error {
            kind: SdkErrorKind::Internal,
            message: "boom".into(),
        };
        assert!(err.placement().is_none());
    }

    #[test]
    fn test_fill_denied_states() {
        assert!(PlacementState::NoFill.is_fill_denied());
        assert!(PlacementState::Disabled.is_fill_denied());
        assert!(!PlacementState::Ready.is_fill_denied());
        assert!(!PlacementState::Waiting.is_fill_denied());
        assert!(!PlacementState::Unknown.is_fill_denied());
    }
}
