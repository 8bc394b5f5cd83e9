//! Kind policies: what differs between interstitial, rewarded, and banner
//! lifecycles.

mod kind;

pub use kind::{AdKind, KindPolicy, Reward};
