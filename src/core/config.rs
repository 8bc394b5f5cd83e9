//! # Bridge configuration.
//!
//! [`Config`] centralizes the few tunables the bridge has. It is consumed
//! by [`Mediator::new`](crate::Mediator::new) and applied to every
//! lifecycle created through it.
//!
//! ## Field semantics
//! - `load_timeout`: window after entering `Loading` during which upstream
//!   availability events are honored. Events arriving later are ignored;
//!   see [`AdLifecycle::poll_timeout`](crate::AdLifecycle::poll_timeout)
//!   for the caller-driven watchdog.
//! - `mediation_name` / `mediation_version`: identity committed to the
//!   underlying SDK before init so upstream reporting can attribute
//!   traffic to this mediation layer.

use std::time::Duration;

/// Configuration for the mediation bridge.
#[derive(Clone, Debug)]
pub struct Config {
    /// How long a lifecycle in `Loading` keeps honoring availability
    /// events, measured from `load()`.
    pub load_timeout: Duration,

    /// Mediation layer name reported to the SDK.
    pub mediation_name: &'static str,

    /// Mediation layer version reported to the SDK.
    pub mediation_version: &'static str,
}

impl Default for Config {
    /// Defaults:
    /// - `load_timeout = 30s`
    /// - `mediation_name = "admux"`
    /// - `mediation_version =` this crate's version
    fn default() -> Self {
        Self {
            load_timeout: Duration::from_secs(30),
            mediation_name: env!("CARGO_PKG_NAME"),
            mediation_version: env!("CARGO_PKG_VERSION"),
        }
    }
}
