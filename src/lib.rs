//! # admux
//!
//! **Admux** is a mediation bridge between an ad-serving host and a
//! third-party ad network SDK.
//!
//! It provides primitives to validate ad requests, coordinate the SDK's
//! once-per-process initialization, track each ad's load/show lifecycle,
//! and fan the SDK's single global event stream out to per-placement
//! listeners. The crate is designed as a building block for concrete
//! network adapters.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  AdRequest   │   │  AdRequest   │   │  AdRequest   │
//!     │(interstitial)│   │ (rewarded)   │   │ (banner)     │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  Mediator (host-facing entry point)                           │
//! │  - validates requests (ids, surface)                          │
//! │  - InitCoordinator (one SDK init, replayed to everyone)       │
//! │  - PlacementBus (SDK's global stream, shared by all requests) │
//! └──────┬──────────────────┬──────────────────┬──────────────────┘
//!        ▼                  ▼                  ▼
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ AdLifecycle  │   │ AdLifecycle  │   │ AdLifecycle  │
//!     │(state machine│   │  per request │   │   ...)       │
//!     └┬─────────────┘   └┬─────────────┘   └┬─────────────┘
//!      │ host callbacks   │                  │
//!      ▼                  ▼                  ▼
//!   on_ad_loaded / on_ad_failed_to_load / on_ad_opened /
//!   on_ad_clicked / on_rewarded / on_ad_closed / ...
//!
//!                 Upstream SDK (one global listener)
//!                        │ publish(SdkEvent)
//!                        ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  PlacementBus ──► SubscriptionRegistry::dispatch(key, &event) │
//! │      ├─► global subscribers (host proxy first)                │
//! │      └─► per-placement subscribers (FIFO, fault-isolated)     │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Request lifecycle
//! ```text
//! Mediator::request_ad(request, host)
//!   ├─► validate ids            ─► Err(InvalidRequest)
//!   ├─► surface interactive?    ─► Err(InvalidSurface)
//!   ├─► build AdLifecycle
//!   └─► ensure_initialized(account_id)
//!         ├─ Ok  ─► lifecycle.load()
//!         │          ├─ placement denied  ─► Failed, on_ad_failed_to_load
//!         │          ├─ placement ready   ─► Loaded, on_ad_loaded
//!         │          └─ otherwise         ─► Loading (subscribed to bus)
//!         │                ├─ Ready event in window ─► Loaded
//!         │                ├─ denial event in window ─► Failed
//!         │                ├─ late event             ─► ignored
//!         │                └─ poll_timeout()         ─► Failed (Timeout)
//!         └─ Err ─► Failed, on_ad_failed_to_load(Init)
//!
//! show(surface):
//!   Loaded + interactive ─► Showing ─► NetworkSdk::show
//!        ├─ Start  event ─► on_ad_opened (+ on_video_started)
//!        ├─ Click  event ─► on_ad_clicked, on_ad_left_application
//!        └─ Finish event ─► Finished ─► (on_rewarded if completed,)
//!                                       on_video_completed, on_ad_closed
//!   anything else ─► synthesized on_ad_opened + on_ad_closed, no SDK call
//! ```
//!
//! ## Features
//! | Area               | Description                                                       | Key types / traits                         |
//! |--------------------|-------------------------------------------------------------------|---------------------------------------------|
//! | **Mediation**      | Validate requests, create and drive per-request lifecycles.      | [`Mediator`], [`AdRequest`], [`AdLifecycle`] |
//! | **Initialization** | Deduplicate SDK init, replay the sticky outcome to late joiners. | [`InitCoordinator`], [`InitState`]           |
//! | **Event routing**  | Fan the SDK's global stream out by placement.                    | [`PlacementBus`], [`SdkEvent`]               |
//! | **Subscriptions**  | Cancelable, weakly-held, fault-isolated listeners.               | [`Subscribe`], [`SubscriberHandle`]          |
//! | **Kind policies**  | What differs between interstitial, rewarded, and banner ads.     | [`AdKind`], [`KindPolicy`], [`Reward`]       |
//! | **Host callbacks** | The surface the mediation host implements.                       | [`HostListener`], [`LoadFailure`]            |
//! | **SDK seam**       | The surface a concrete network adapter implements.               | [`NetworkSdk`], [`Surface`]                  |
//! | **Errors**         | Typed errors for request intake and initialization.              | [`MediationError`], [`InitError`]            |
//! | **Configuration**  | Centralize bridge settings.                                      | [`Config`]                                   |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use admux::{
//!     AdKind, AdRequest, Config, FinishReason, HostListener, InitCallback, LoadFailure,
//!     Mediator, NetworkSdk, PlacementBus, PlacementState, SdkEvent, Surface,
//! };
//!
//! // A network adapter: wraps the vendor SDK. This stub is always ready.
//! struct StubSdk;
//! impl NetworkSdk for StubSdk {
//!     fn init(&self, _account_id: &str, _events: PlacementBus, on_done: InitCallback) {
//!         on_done(Ok(()));
//!     }
//!     fn placement_state(&self, _placement_id: &str) -> PlacementState {
//!         PlacementState::Ready
//!     }
//!     fn show(&self, _surface: Surface, _placement_id: &str) {}
//! }
//!
//! // The mediation host's side of the contract.
//! struct Host;
//! impl HostListener for Host {
//!     fn on_ad_loaded(&self) { println!("loaded"); }
//!     fn on_ad_failed_to_load(&self, reason: LoadFailure) { println!("failed: {reason}"); }
//!     fn on_ad_opened(&self) { println!("opened"); }
//!     fn on_ad_clicked(&self) {}
//!     fn on_ad_left_application(&self) {}
//!     fn on_ad_closed(&self) { println!("closed"); }
//! }
//!
//! let mediator = Mediator::new(Arc::new(StubSdk), Config::default());
//!
//! let request = AdRequest {
//!     account_id: "12345".into(),
//!     placement_id: "rewardedVideo".into(),
//!     kind: AdKind::Rewarded,
//!     surface: Surface::Interactive,
//! };
//! let ad = mediator.request_ad(&request, Arc::new(Host))?;
//! assert!(ad.is_loaded());
//!
//! ad.show(Surface::Interactive);
//!
//! // The real SDK publishes these from its callback thread; the embedder
//! // wires that stream into `mediator.bus()`.
//! mediator.bus().publish(&SdkEvent::Finish {
//!     placement: "rewardedVideo".into(),
//!     reason: FinishReason::Completed,
//! });
//! # Ok::<(), admux::MediationError>(())
//! ```
mod core;
mod error;
mod events;
mod host;
mod policies;
mod sdk;
mod subscribers;

// ---- Public re-exports ----

pub use core::{AdLifecycle, AdRequest, AdState, Config, InitCoordinator, InitState, InitWaiter, Mediator};
pub use error::{InitError, LoadFailure, MediationError};
pub use events::{FinishReason, PlacementBus, PlacementState, SdkErrorKind, SdkEvent};
pub use host::HostListener;
pub use policies::{AdKind, KindPolicy, Reward};
pub use sdk::{InitCallback, NetworkSdk, Surface};
pub use subscribers::{Subscribe, SubscriberHandle, SubscriptionKey, SubscriptionRegistry};
