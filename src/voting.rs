//! Voting-status classification.
//!
//! A pool proposal is validated by absolute vote (up minus down) reaching the
//! activation threshold, and only while the voting window is open. Once the
//! window closes the proposal reads as deactivated even when the threshold
//! was met during the window.

use serde::{Deserialize, Serialize};

use crate::pool::PoolVoting;
use crate::Timestamp;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VotingStatus {
    Upcoming,
    InVoting,
    Validated,
    Deactivated,
}

/// Classify a voting record at `now`.
pub fn classify_voting_status(voting: &PoolVoting, now: Timestamp) -> VotingStatus {
    if now < voting.voting_start {
        return VotingStatus::Upcoming;
    }
    if now >= voting.voting_end {
        return VotingStatus::Deactivated;
    }
    let absolute = voting.total_up.saturating_sub(voting.total_down);
    if absolute >= voting.min_can_active {
        VotingStatus::Validated
    } else {
        VotingStatus::InVoting
    }
}
