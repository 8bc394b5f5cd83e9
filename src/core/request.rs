//! # Inbound ad-request parameters.
//!
//! [`AdRequest`] carries what the mediation host hands over per request:
//! the upstream account id, the placement to load, the ad format, and the
//! display surface. Validation rejects empty ids before anything else
//! happens — no lifecycle is created and the SDK is never touched.

use crate::error::MediationError;
use crate::policies::AdKind;
use crate::sdk::Surface;

/// Parameters of one ad request.
#[derive(Debug, Clone)]
pub struct AdRequest {
    /// Upstream account (game) id used for SDK initialization.
    pub account_id: String,
    /// Placement to load.
    pub placement_id: String,
    /// Requested ad format.
    pub kind: AdKind,
    /// Surface the ad will be shown on.
    pub surface: Surface,
}

impl AdRequest {
    /// Rejects empty/blank ids, naming exactly which ones are missing.
    pub fn validate(&self) -> Result<(), MediationError> {
        let account_empty = self.account_id.trim().is_empty();
        let placement_empty = self.placement_id.trim().is_empty();

        let missing = match (account_empty, placement_empty) {
            (true, true) => "account id and placement id",
            (true, false) => "account id",
            (false, true) => "placement id",
            (false, false) => return Ok(()),
        };
        log::warn!("rejecting ad request: {missing} cannot be empty");
        Err(MediationError::InvalidRequest { missing })
    }
}
