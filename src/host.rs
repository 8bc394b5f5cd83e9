//! # Host-facing callback surface.
//!
//! [`HostListener`] is the per-request callback interface the mediation
//! host supplies with each ad request. The bridge guarantees that any
//! `on_ad_opened` is eventually paired with exactly one `on_ad_closed`,
//! even on error paths (a `show` on an unloaded ad synthesizes the pair
//! immediately).
//!
//! The video/reward callbacks only fire for ad kinds whose
//! [`KindPolicy`](crate::KindPolicy) enables them; they default to no-ops
//! so interstitial and banner hosts implement only what they consume.

use crate::error::LoadFailure;
use crate::policies::Reward;

/// Per-request lifecycle callbacks toward the mediation host.
///
/// Called from either the requesting thread (synchronous load outcomes,
/// synthesized show pairs) or the upstream callback thread (event-driven
/// transitions). Implementations must be thread-safe and should return
/// quickly.
pub trait HostListener: Send + Sync + 'static {
    /// The ad is cached and ready to show.
    fn on_ad_loaded(&self);

    /// The load resolved without an ad; `reason` says why.
    fn on_ad_failed_to_load(&self, reason: LoadFailure);

    /// The ad took over the screen.
    fn on_ad_opened(&self);

    /// The user clicked the ad.
    fn on_ad_clicked(&self);

    /// The click is taking the user out of the application.
    fn on_ad_left_application(&self);

    /// Video playback started (rewarded only).
    fn on_video_started(&self) {}

    /// The user earned a reward (rewarded only, completed finish only).
    fn on_rewarded(&self, _reward: Reward) {}

    /// Video playback reached its end state (rewarded only).
    fn on_video_completed(&self) {}

    /// The ad released the screen. Always the final signal of a show.
    fn on_ad_closed(&self);
}
