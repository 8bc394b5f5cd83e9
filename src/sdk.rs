//! # Upstream SDK capability surface.
//!
//! [`NetworkSdk`] is the seam between this crate and the third-party ad
//! network. Everything the bridge needs from the SDK is behind this trait:
//! asynchronous initialization, placement availability snapshots, and the
//! show call. The real implementation wraps the vendor SDK; tests use
//! scriptable fakes.
//!
//! The SDK owns one global event stream. At init it receives a
//! [`PlacementBus`] clone and is expected to publish every stream callback
//! into it for the lifetime of the process.

use crate::error::InitError;
use crate::events::{PlacementBus, PlacementState};
use crate::policies::AdKind;

/// Completion callback for [`NetworkSdk::init`]. Invoked exactly once.
pub type InitCallback = Box<dyn FnOnce(Result<(), InitError>) + Send>;

/// Display surface an ad can be rendered on.
///
/// The bridge only cares whether the surface can host interactive content;
/// a headless surface fails request validation and turns `show` into a
/// synthesized open/close pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// A foreground, user-interactive surface.
    Interactive,
    /// No interactive surface available (background, service context, ...).
    Headless,
}

impl Surface {
    #[inline]
    pub fn is_interactive(self) -> bool {
        matches!(self, Surface::Interactive)
    }
}

/// Contract the third-party ad network SDK must fulfil.
///
/// All methods may be called from any thread. `init` is asynchronous: it
/// returns immediately and reports through `on_done`, possibly on a
/// different thread (the init coordinator holds no lock while calling it,
/// so synchronous completion is also legal).
pub trait NetworkSdk: Send + Sync + 'static {
    /// Starts SDK initialization for the given account.
    ///
    /// `events` is the sink for the SDK's global event stream; the SDK must
    /// keep publishing into it for the process lifetime. `on_done` must be
    /// invoked exactly once.
    fn init(&self, account_id: &str, events: PlacementBus, on_done: InitCallback);

    /// Records the mediation layer's identity before init. Optional.
    fn set_mediation_metadata(&self, _name: &str, _version: &str) {}

    /// Records one load attempt for upstream reporting. Optional.
    ///
    /// Called once per accepted `load()` (repeated loads on the same
    /// lifecycle are rejected before reaching this).
    fn record_load(&self, _placement_id: &str, _kind: AdKind) {}

    /// Current availability snapshot for a placement.
    fn placement_state(&self, placement_id: &str) -> PlacementState;

    /// Shows the loaded ad for `placement_id` on `surface`.
    ///
    /// Only called for a lifecycle in the `Loaded` state with an
    /// interactive surface; progress is reported through the event stream.
    fn show(&self, surface: Surface, placement_id: &str);
}
