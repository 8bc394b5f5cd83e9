//! Core building blocks: configuration, request validation, the init
//! coordinator, the per-request lifecycle, and the host-facing mediator.

mod config;
mod init;
mod lifecycle;
mod mediator;
mod request;

pub use config::Config;
pub use init::{InitCoordinator, InitState, InitWaiter};
pub use lifecycle::{AdLifecycle, AdState};
pub use mediator::Mediator;
pub use request::AdRequest;
