//! # Per-request ad lifecycle state machine.
//!
//! One [`AdLifecycle`] exists per ad request. It subscribes to the
//! [`PlacementBus`] under its placement key, tracks load/show progress,
//! and forwards host-facing callbacks.
//!
//! ## States
//! ```text
//! NotLoaded ──load()──► Loading ──► Loaded ──show()──► Showing ──► Finished
//!                          │           │
//!                          ▼           ▼ (availability lost)
//!                        Failed     Invalidated
//!
//! any state ──destroy()──► Invalidated (terminal, all events ignored)
//! ```
//! No transition leaves `Finished`, `Failed`, or `Invalidated`.
//!
//! ## Rules
//! - Every transition happens under the per-instance mutex: the owning
//!   request's thread (`load`/`show`/`destroy`/`poll_timeout`) and the
//!   upstream dispatch thread both mutate this state.
//! - Host callbacks are invoked only after the lock is released, so a host
//!   that calls back into the lifecycle from inside a callback cannot
//!   deadlock.
//! - Availability events are honored only while `Loading` and within the
//!   load-timeout window. Later events are silently ignored; a load that
//!   times out with no further upstream event stays `Loading` until the
//!   caller invokes [`AdLifecycle::poll_timeout`]. The timeout is checked
//!   lazily, never via a scheduled expiry.
//! - `show` on anything but a loaded ad synthesizes an immediate
//!   `on_ad_opened`/`on_ad_closed` pair without touching the SDK, keeping
//!   the host contract that every opened ad eventually closes.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::error::{InitError, LoadFailure};
use crate::events::{FinishReason, PlacementBus, PlacementState, SdkEvent};
use crate::host::HostListener;
use crate::policies::{AdKind, KindPolicy};
use crate::sdk::{NetworkSdk, Surface};
use crate::subscribers::{Subscribe, SubscriberHandle};

/// Lifecycle state of one ad request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdState {
    NotLoaded,
    Loading,
    Loaded,
    Showing,
    Finished,
    Failed,
    Invalidated,
}

struct Inner {
    state: AdState,
    load_started: Option<Instant>,
    subscription: Option<SubscriberHandle>,
}

/// Host-facing notification computed under the lock, delivered after it is
/// released.
enum Notify {
    Loaded,
    LoadFailed(LoadFailure),
    Opened,
    Clicked,
    Finished(FinishReason),
    SynthesizedOpenClose,
}

/// State machine for a single ad request.
///
/// Owned by the request that created it; destroyed (or dropped) when the
/// request is torn down. Multiple lifecycles may target the same placement
/// concurrently — they share nothing but the upstream event stream.
pub struct AdLifecycle {
    placement: Arc<str>,
    kind: AdKind,
    policy: KindPolicy,
    timeout: Duration,
    sdk: Arc<dyn NetworkSdk>,
    bus: PlacementBus,
    host: Arc<dyn HostListener>,
    inner: Mutex<Inner>,
}

impl AdLifecycle {
    pub fn new(
        placement: impl Into<Arc<str>>,
        kind: AdKind,
        timeout: Duration,
        sdk: Arc<dyn NetworkSdk>,
        bus: PlacementBus,
        host: Arc<dyn HostListener>,
    ) -> Arc<Self> {
        Arc::new(Self {
            placement: placement.into(),
            kind,
            policy: kind.policy(),
            timeout,
            sdk,
            bus,
            host,
            inner: Mutex::new(Inner {
                state: AdState::NotLoaded,
                load_started: None,
                subscription: None,
            }),
        })
    }

    /// Starts loading. Legal only once, from `NotLoaded`.
    ///
    /// Queries current availability first: a denied placement fails
    /// immediately without subscribing; a ready one loads immediately with
    /// no timeout tracking; anything else enters `Loading` and waits for
    /// upstream events.
    pub fn load(self: &Arc<Self>) {
        log::debug!(
            "loading {} placement {}",
            self.kind.as_label(),
            self.placement
        );

        let (notify, attempted) = {
            let mut inner = self.inner.lock();
            if inner.state != AdState::NotLoaded {
                (Some(Notify::LoadFailed(LoadFailure::AlreadyRequested)), false)
            } else {
                let availability = self.sdk.placement_state(&self.placement);
                if availability.is_fill_denied() {
                    inner.state = AdState::Failed;
                    (Some(Notify::LoadFailed(denial(availability))), true)
                } else {
                    let listener: Arc<dyn Subscribe> = self.clone();
                    inner.subscription = Some(
                        self.bus
                            .subscribe_placement(&self.placement, Arc::downgrade(&listener)),
                    );
                    if availability == PlacementState::Ready {
                        inner.state = AdState::Loaded;
                        (Some(Notify::Loaded), true)
                    } else {
                        inner.state = AdState::Loading;
                        inner.load_started = Some(Instant::now());
                        (None, true)
                    }
                }
            }
        };

        if attempted {
            self.sdk.record_load(&self.placement, self.kind);
        }
        if let Some(notify) = notify {
            self.notify(notify);
        }
    }

    /// Shows the loaded ad on `surface`.
    ///
    /// Only a `Loaded` lifecycle with an interactive surface reaches the
    /// SDK; every other combination synthesizes the opened/closed pair
    /// immediately and leaves the state untouched, so at most one
    /// `Loaded → Showing` transition ever happens per instance.
    pub fn show(&self, surface: Surface) {
        if !surface.is_interactive() {
            log::warn!(
                "cannot show placement {}: surface is not interactive",
                self.placement
            );
            self.notify(Notify::SynthesizedOpenClose);
            return;
        }

        let transitioned = {
            let mut inner = self.inner.lock();
            if inner.state == AdState::Loaded {
                inner.state = AdState::Showing;
                true
            } else {
                false
            }
        };

        if transitioned {
            self.sdk.show(surface, &self.placement);
        } else {
            log::warn!(
                "show called on placement {} with no loaded ad; synthesizing open/close",
                self.placement
            );
            self.notify(Notify::SynthesizedOpenClose);
        }
    }

    /// Caller-driven load watchdog.
    ///
    /// If the lifecycle is still `Loading` past its timeout window, fails
    /// it with [`LoadFailure::Timeout`] and returns true. The bridge never
    /// schedules this itself; without a caller invoking it, a load with no
    /// further upstream event stays `Loading` indefinitely.
    pub fn poll_timeout(&self) -> bool {
        let timed_out = {
            let mut inner = self.inner.lock();
            match (inner.state, inner.load_started) {
                (AdState::Loading, Some(started)) if started.elapsed() >= self.timeout => {
                    inner.state = AdState::Failed;
                    true
                }
                _ => false,
            }
        };

        if timed_out {
            self.notify(Notify::LoadFailed(LoadFailure::Timeout));
        }
        timed_out
    }

    /// Unsubscribes and invalidates. Idempotent; all further events and
    /// show attempts are ignored (shows still synthesize their pair).
    pub fn destroy(&self) {
        let subscription = {
            let mut inner = self.inner.lock();
            inner.state = AdState::Invalidated;
            inner.subscription.take()
        };
        if let Some(handle) = subscription {
            self.bus.unsubscribe(&handle);
        }
    }

    /// Fails a lifecycle whose SDK initialization never succeeded.
    pub(crate) fn reject(&self, cause: InitError) {
        let rejected = {
            let mut inner = self.inner.lock();
            if inner.state == AdState::NotLoaded {
                inner.state = AdState::Failed;
                true
            } else {
                false
            }
        };
        if rejected {
            self.notify(Notify::LoadFailed(LoadFailure::Init(cause)));
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> AdState {
        self.inner.lock().state
    }

    /// True while a loaded ad is waiting to be shown.
    pub fn is_loaded(&self) -> bool {
        self.state() == AdState::Loaded
    }

    pub fn placement(&self) -> &str {
        &self.placement
    }

    pub fn kind(&self) -> AdKind {
        self.kind
    }

    fn within_window(&self, inner: &Inner) -> bool {
        inner
            .load_started
            .map_or(false, |started| started.elapsed() < self.timeout)
    }

    /// Delivers one computed notification to the host. Never called while
    /// the lock is held.
    fn notify(&self, notify: Notify) {
        match notify {
            Notify::Loaded => {
                log::debug!("placement {} successfully loaded", self.placement);
                self.host.on_ad_loaded();
            }
            Notify::LoadFailed(reason) => {
                log::debug!(
                    "placement {} loading failed: {}",
                    self.placement,
                    reason.as_label()
                );
                self.host.on_ad_failed_to_load(reason);
            }
            Notify::Opened => {
                self.host.on_ad_opened();
                if self.policy.video_signals {
                    self.host.on_video_started();
                }
            }
            Notify::Clicked => {
                self.host.on_ad_clicked();
                self.host.on_ad_left_application();
            }
            Notify::Finished(reason) => {
                if self.policy.video_signals {
                    if reason == FinishReason::Completed {
                        if let Some(reward) = self.policy.reward.clone() {
                            self.host.on_rewarded(reward);
                        }
                    }
                    self.host.on_video_completed();
                }
                self.host.on_ad_closed();
            }
            Notify::SynthesizedOpenClose => {
                self.host.on_ad_opened();
                self.host.on_ad_closed();
            }
        }
    }
}

// Manual impl: the SDK, bus, and host fields are trait objects.
impl fmt::Debug for AdLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdLifecycle")
            .field("placement", &self.placement)
            .field("kind", &self.kind)
            .field("state", &self.inner.lock().state)
            .finish_non_exhaustive()
    }
}

impl Subscribe for AdLifecycle {
    fn on_event(&self, event: &SdkEvent) {
        let notify = {
            let mut inner = self.inner.lock();
            match event {
                SdkEvent::StateChanged { old, new, .. } => match inner.state {
                    AdState::Loading if self.within_window(&inner) => {
                        if *new == PlacementState::Ready {
                            inner.state = AdState::Loaded;
                            Some(Notify::Loaded)
                        } else if new.is_fill_denied() {
                            inner.state = AdState::Failed;
                            Some(Notify::LoadFailed(denial(*new)))
                        } else {
                            None
                        }
                    }
                    // The cached ad can no longer be trusted to show.
                    AdState::Loaded
                        if *old == PlacementState::Ready && *new != PlacementState::Ready =>
                    {
                        inner.state = AdState::Invalidated;
                        None
                    }
                    _ => None,
                },
                SdkEvent::Start { .. } if inner.state == AdState::Showing => Some(Notify::Opened),
                SdkEvent::Click { .. } if inner.state == AdState::Showing => Some(Notify::Clicked),
                SdkEvent::Finish { reason, .. } if inner.state == AdState::Showing => {
                    inner.state = AdState::Finished;
                    Some(Notify::Finished(*reason))
                }
                _ => None,
            }
        };

        if let Some(notify) = notify {
            self.notify(notify);
        }
    }

    fn name(&self) -> &'static str {
        "ad-lifecycle"
    }
}

fn denial(state: PlacementState) -> LoadFailure {
    match state {
        PlacementState::Disabled => LoadFailure::Disabled,
        _ => LoadFailure::NoFill,
    }
}
