//! # Mediator: the host-facing entry point.
//!
//! [`Mediator`] owns the shared plumbing — the [`PlacementBus`], the
//! [`InitCoordinator`], the SDK handle — and turns each validated
//! [`AdRequest`] into its own [`AdLifecycle`]:
//!
//! ```text
//! request_ad(request, host)
//!   ├─ validate ids          → Err(InvalidRequest)
//!   ├─ surface interactive?  → Err(InvalidSurface)
//!   ├─ build AdLifecycle (subscribes on load)
//!   └─ ensure_initialized(account_id)
//!         ├─ Ok  → lifecycle.load()
//!         └─ Err → lifecycle fails with LoadFailure::Init
//! ```
//!
//! Rejections are synchronous `Err`s; everything past validation is
//! reported through the request's [`HostListener`]. `request_ad` itself
//! never blocks on the SDK.

use std::sync::Arc;

use crate::core::config::Config;
use crate::core::init::InitCoordinator;
use crate::core::lifecycle::AdLifecycle;
use crate::core::request::AdRequest;
use crate::error::MediationError;
use crate::events::PlacementBus;
use crate::host::HostListener;
use crate::sdk::NetworkSdk;

/// Front door of the mediation bridge.
///
/// One per process (and per SDK): all requests created through the same
/// mediator share its bus and its init outcome.
pub struct Mediator {
    sdk: Arc<dyn NetworkSdk>,
    bus: PlacementBus,
    init: Arc<InitCoordinator>,
    cfg: Config,
}

impl Mediator {
    pub fn new(sdk: Arc<dyn NetworkSdk>, cfg: Config) -> Self {
        let bus = PlacementBus::new();
        let init = InitCoordinator::new(Arc::clone(&sdk), bus.clone(), cfg.clone());
        Self {
            sdk,
            bus,
            init,
            cfg,
        }
    }

    /// Creates and starts loading an ad for `request`.
    ///
    /// Returns the lifecycle handle on acceptance; the caller keeps it to
    /// `show`, `poll_timeout`, and `destroy` the ad. Load progress arrives
    /// through `host`. Invalid ids and non-interactive surfaces are
    /// rejected here, before any lifecycle exists.
    pub fn request_ad(
        &self,
        request: &AdRequest,
        host: Arc<dyn HostListener>,
    ) -> Result<Arc<AdLifecycle>, MediationError> {
        request.validate()?;
        if !request.surface.is_interactive() {
            log::warn!(
                "rejecting {} request for placement {}: surface is not interactive",
                request.kind.as_label(),
                request.placement_id
            );
            return Err(MediationError::InvalidSurface);
        }

        let lifecycle = AdLifecycle::new(
            request.placement_id.as_str(),
            request.kind,
            self.cfg.load_timeout,
            Arc::clone(&self.sdk),
            self.bus.clone(),
            host,
        );

        let pending = Arc::clone(&lifecycle);
        self.init.ensure_initialized(
            &request.account_id,
            Box::new(move |outcome| match outcome {
                Ok(()) => pending.load(),
                Err(cause) => pending.reject(cause),
            }),
        );

        Ok(lifecycle)
    }

    /// The event sink the embedder wires the SDK's global stream into.
    pub fn bus(&self) -> &PlacementBus {
        &self.bus
    }

    /// Init coordinator handle, for embedders that want to warm the SDK up
    /// ahead of the first request.
    pub fn init(&self) -> &Arc<InitCoordinator> {
        &self.init
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lifecycle::AdState;
    use crate::error::{InitError, LoadFailure};
    use crate::events::{PlacementState, SdkEvent};
    use crate::policies::AdKind;
    use crate::sdk::{InitCallback, Surface};
    use parking_lot::Mutex as PlMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct RecordingHost {
        calls: PlMutex<Vec<String>>,
    }

    impl RecordingHost {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    impl HostListener for RecordingHost {
        fn on_ad_loaded(&self) {
            self.calls.lock().push("loaded".into());
        }
        fn on_ad_failed_to_load(&self, reason: LoadFailure) {
            self.calls.lock().push(format!("failed:{}", reason.as_label()));
        }
        fn on_ad_opened(&self) {
            self.calls.lock().push("opened".into());
        }
        fn on_ad_clicked(&self) {
            self.calls.lock().push("clicked".into());
        }
        fn on_ad_left_application(&self) {
            self.calls.lock().push("left_application".into());
        }
        fn on_ad_closed(&self) {
            self.calls.lock().push("closed".into());
        }
    }

    /// SDK fake: manual init resolution plus a scriptable availability.
    struct ManualSdk {
        init_calls: AtomicUsize,
        pending: PlMutex<Vec<InitCallback>>,
        availability: PlMutex<PlacementState>,
        shows: AtomicUsize,
    }

    impl ManualSdk {
        fn ready() -> Arc<Self> {
            Arc::new(Self {
                init_calls: AtomicUsize::new(0),
                pending: PlMutex::new(Vec::new()),
                availability: PlMutex::new(PlacementState::Ready),
                shows: AtomicUsize::new(0),
            })
        }
        fn resolve_all(&self, outcome: Result<(), InitError>) {
            for cb in self.pending.lock().drain(..) {
                cb(outcome.clone());
            }
        }
    }

    impl NetworkSdk for ManualSdk {
        fn init(&self, _account_id: &str, _events: PlacementBus, on_done: InitCallback) {
            self.init_calls.fetch_add(1, Ordering::SeqCst);
            self.pending.lock().push(on_done);
        }
        fn placement_state(&self, _placement_id: &str) -> PlacementState {
            *self.availability.lock()
        }
        fn show(&self, _surface: Surface, _placement_id: &str) {
            self.shows.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn request(kind: AdKind) -> AdRequest {
        AdRequest {
            account_id: "12345".into(),
            placement_id: "video".into(),
            kind,
            surface: Surface::Interactive,
        }
    }

    #[test]
    fn test_invalid_request_is_rejected_synchronously() {
        let sdk = ManualSdk::ready();
        let mediator = Mediator::new(Arc::clone(&sdk) as Arc<dyn NetworkSdk>, Config::default());

        let mut req = request(AdKind::Interstitial);
        req.placement_id = String::new();
        let err = mediator
            .request_ad(&req, Arc::new(RecordingHost::default()))
            .unwrap_err();
        assert_eq!(err, MediationError::InvalidRequest { missing: "placement id" });
        assert_eq!(sdk.init_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_headless_surface_is_rejected_synchronously() {
        let sdk = ManualSdk::ready();
        let mediator = Mediator::new(Arc::clone(&sdk) as Arc<dyn NetworkSdk>, Config::default());

        let mut req = request(AdKind::Interstitial);
        req.surface = Surface::Headless;
        let err = mediator
            .request_ad(&req, Arc::new(RecordingHost::default()))
            .unwrap_err();
        assert_eq!(err, MediationError::InvalidSurface);
        assert_eq!(sdk.init_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_load_waits_for_init_then_proceeds() {
        let sdk = ManualSdk::ready();
        let mediator = Mediator::new(Arc::clone(&sdk) as Arc<dyn NetworkSdk>, Config::default());
        let host = Arc::new(RecordingHost::default());

        let ad = mediator
            .request_ad(&request(AdKind::Interstitial), Arc::clone(&host) as _)
            .unwrap();
        assert_eq!(ad.state(), AdState::NotLoaded, "load gated on init");
        assert!(host.calls().is_empty());

        sdk.resolve_all(Ok(()));
        assert_eq!(ad.state(), AdState::Loaded);
        assert_eq!(host.calls(), vec!["loaded"]);
    }

    #[test]
    fn test_init_failure_fails_every_pending_request() {
        let sdk = ManualSdk::ready();
        let mediator = Mediator::new(Arc::clone(&sdk) as Arc<dyn NetworkSdk>, Config::default());

        let hosts: Vec<Arc<RecordingHost>> = (0..3)
            .map(|_| Arc::new(RecordingHost::default()))
            .collect();
        let ads: Vec<_> = hosts
            .iter()
            .map(|host| {
                mediator
                    .request_ad(&request(AdKind::Rewarded), Arc::clone(host) as _)
                    .unwrap()
            })
            .collect();
        assert_eq!(sdk.init_calls.load(Ordering::SeqCst), 1, "deduplicated");

        sdk.resolve_all(Err(InitError::sdk("no network")));
        for (host, ad) in hosts.iter().zip(&ads) {
            assert_eq!(ad.state(), AdState::Failed);
            assert_eq!(host.calls(), vec!["failed:load_init_failed"]);
        }
    }

    #[test]
    fn test_requests_share_one_bus_and_one_init() {
        let sdk = ManualSdk::ready();
        let mediator = Mediator::new(Arc::clone(&sdk) as Arc<dyn NetworkSdk>, Config::default());
        let host = Arc::new(RecordingHost::default());

        let ad = mediator
            .request_ad(&request(AdKind::Interstitial), Arc::clone(&host) as _)
            .unwrap();
        sdk.resolve_all(Ok(()));
        ad.show(Surface::Interactive);

        // Events published into the mediator's bus drive the lifecycle.
        mediator.bus().publish(&SdkEvent::Start {
            placement: "video".into(),
        });
        mediator.bus().publish(&SdkEvent::Finish {
            placement: "video".into(),
            reason: crate::events::FinishReason::Error,
        });

        assert_eq!(ad.state(), AdState::Finished);
        assert_eq!(host.calls(), vec!["loaded", "opened", "closed"]);
        assert_eq!(sdk.shows.load(Ordering::SeqCst), 1);
    }
}
