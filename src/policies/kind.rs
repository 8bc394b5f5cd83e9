//! # Per-kind ad behavior.
//!
//! Interstitial, rewarded, and banner placements share one lifecycle state
//! machine; everything kind-specific is expressed as a small policy table
//! instead of separate lifecycle types:
//!
//! ```text
//! kind          video signals   reward on completed finish
//! ------------  -------------   --------------------------
//! Interstitial  no              none
//! Rewarded      yes             Reward { amount: 1 }
//! Banner        no              none
//! ```

/// The ad formats the bridge mediates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdKind {
    /// Full-screen static or video interstitial.
    Interstitial,
    /// Full-screen video that grants a reward when watched to the end.
    Rewarded,
    /// Inline banner.
    Banner,
}

impl AdKind {
    /// Kind-specific behavior during show/finish.
    pub fn policy(self) -> KindPolicy {
        match self {
            AdKind::Rewarded => KindPolicy {
                video_signals: true,
                reward: Some(Reward::default()),
            },
            AdKind::Interstitial | AdKind::Banner => KindPolicy {
                video_signals: false,
                reward: None,
            },
        }
    }

    /// Short stable label (snake_case) for logs.
    pub fn as_label(self) -> &'static str {
        match self {
            AdKind::Interstitial => "interstitial",
            AdKind::Rewarded => "rewarded",
            AdKind::Banner => "banner",
        }
    }
}

/// Kind-specific lifecycle behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindPolicy {
    /// Emit `on_video_started` / `on_video_completed` around playback.
    pub video_signals: bool,
    /// Reward granted on a completed finish, if any.
    pub reward: Option<Reward>,
}

/// Reward payload for completed rewarded playback.
///
/// The upstream SDK does not report amounts per placement, so the bridge
/// grants one unit per completed view (the host applies its own exchange
/// rate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reward {
    pub amount: u32,
}

impl Default for Reward {
    fn default() -> Self {
        Self { amount: 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_rewarded_grants_rewards() {
        assert_eq!(AdKind::Rewarded.policy().reward, Some(Reward { amount: 1 }));
        assert_eq!(AdKind::Interstitial.policy().reward, None);
        assert_eq!(AdKind::Banner.policy().reward, None);
    }

    #[test]
    fn test_only_rewarded_emits_video_signals() {
        assert!(AdKind::Rewarded.policy().video_signals);
        assert!(!AdKind::Interstitial.policy().video_signals);
        assert!(!AdKind::Banner.policy().video_signals);
    }
}
