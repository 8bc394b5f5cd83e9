//! Error types used by the mediation bridge.
//!
//! This module defines three error enums:
//!
//! - [`MediationError`] — errors raised while accepting an ad request,
//!   before any lifecycle exists.
//! - [`InitError`] — errors raised by SDK initialization. Sticky: once the
//!   init coordinator records one, every later caller receives the same
//!   value until process restart.
//! - [`LoadFailure`] — the reason forwarded to the host through
//!   `on_ad_failed_to_load`. No-fill and disabled placements are normal
//!   business outcomes, not system errors.
//!
//! All types provide `as_label` for logging/metrics.

use std::sync::Arc;
use thiserror::Error;

/// # Errors produced while accepting an ad request.
///
/// Surfaced synchronously from [`Mediator::request_ad`](crate::Mediator::request_ad);
/// no lifecycle is created and the underlying SDK is never touched.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediationError {
    /// A required request id was missing or empty.
    #[error("{missing} cannot be empty")]
    InvalidRequest {
        /// Which id(s) were empty, e.g. `"account id"` or `"account id and placement id"`.
        missing: &'static str,
    },

    /// The supplied display surface cannot host an interactive ad.
    #[error("surface is not interactive; an interactive surface is required to load ads")]
    InvalidSurface,
}

impl MediationError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use admux::MediationError;
    ///
    /// let err = MediationError::InvalidSurface;
    /// assert_eq!(err.as_label(), "invalid_surface");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            MediationError::InvalidRequest { .. } => "invalid_request",
            MediationError::InvalidSurface => "invalid_surface",
        }
    }
}

/// # Errors produced by SDK initialization.
///
/// Cloneable because the init coordinator replays one recorded outcome to
/// every waiter and to every later caller (sticky error semantics).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InitError {
    /// The account id was empty; the underlying SDK was never started.
    #[error("account id cannot be empty")]
    EmptyAccountId,

    /// The underlying SDK reported an initialization failure.
    #[error("sdk initialization failed: {message}")]
    Sdk {
        /// Failure message reported by the SDK.
        message: Arc<str>,
    },
}

impl InitError {
    /// Creates an [`InitError::Sdk`] from any message.
    pub fn sdk(message: impl Into<Arc<str>>) -> Self {
        InitError::Sdk {
            message: message.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use admux::InitError;
    ///
    /// let err = InitError::EmptyAccountId;
    /// assert_eq!(err.as_label(), "init_empty_account_id");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            InitError::EmptyAccountId => "init_empty_account_id",
            InitError::Sdk { .. } => "init_sdk_failed",
        }
    }
}

/// # Load-failure reasons forwarded to the host.
///
/// Delivered through [`HostListener::on_ad_failed_to_load`](crate::HostListener::on_ad_failed_to_load).
/// `NoFill` and `Disabled` mirror the upstream placement states of the same
/// names; `Timeout` is only produced by the explicit watchdog hook
/// [`AdLifecycle::poll_timeout`](crate::AdLifecycle::poll_timeout).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadFailure {
    /// The placement has no ad inventory to serve.
    #[error("no fill for placement")]
    NoFill,

    /// The placement is disabled upstream.
    #[error("placement is disabled")]
    Disabled,

    /// The load window elapsed without the placement becoming ready.
    #[error("load timed out")]
    Timeout,

    /// `load()` was called on a lifecycle that already consumed its load.
    #[error("ad was already requested on this lifecycle")]
    AlreadyRequested,

    /// SDK initialization failed, so the load never started.
    #[error(transparent)]
    Init(#[from] InitError),
}

impl LoadFailure {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            LoadFailure::NoFill => "load_no_fill",
            LoadFailure::Disabled => "load_disabled",
            LoadFailure::Timeout => "load_timeout",
            LoadFailure::AlreadyRequested => "load_already_requested",
            LoadFailure::Init(_) => "load_init_failed",
        }
    }
}
