//! Pool snapshot model.
//!
//! A pool is a time-boxed sale with up to four participation phases. Every
//! value here is a read-only snapshot rebuilt per fetch by the ingestion
//! boundary; derivations never mutate a snapshot in place.
//!
//! Invariant: a phase with `is_active = false` does not participate in any
//! derivation. Its window and caps are ignored by every consumer.

use serde::{Deserialize, Serialize};

use crate::scale::{mul_div, ClaimablePercentage};
use crate::{Amount, Count, Timestamp, BPS_DENOM};

/// The four participation phases, in policy (display) order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PhaseKind {
    /// Early-join round for whitelisted wallets.
    Whitelist,
    /// Staker-exclusive round with per-tier individual caps.
    Exclusive,
    /// First-come-first-served round for stakers, caps multiplied up.
    FcfsStaker,
    /// Open FCFS round for everyone.
    Public,
}

impl PhaseKind {
    /// Fixed policy order. Display order is policy order, not time order.
    pub const ORDER: [PhaseKind; 4] = [
        PhaseKind::Whitelist,
        PhaseKind::Exclusive,
        PhaseKind::FcfsStaker,
        PhaseKind::Public,
    ];
}

/// Half-open participation window: `start_at` inclusive, `end_at` exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseWindow {
    pub start_at: Timestamp,
    pub end_at: Timestamp,
}

impl PhaseWindow {
    pub fn contains(&self, now: Timestamp) -> bool {
        now >= self.start_at && now < self.end_at
    }
}

/// Per-level individual caps for the Exclusive round, levels 1..=5.
/// Values are raw (pre-scaling); they are scaled where surfaced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierWeights {
    pub levels: [Amount; 5],
}

impl TierWeights {
    /// Cap for a tier level; 0 when the level is outside 1..=5.
    pub fn max_individual_amount(&self, level: u8) -> Amount {
        match level {
            1..=5 => self.levels[(level - 1) as usize],
            _ => 0,
        }
    }
}

/// One participation phase of a pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolPhase {
    pub kind: PhaseKind,
    pub is_active: bool,
    /// Missing for disabled phases. An active phase always carries a window;
    /// the ingestion boundary rejects snapshots that violate this.
    pub window: Option<PhaseWindow>,
    pub max_total_alloc: Amount,
    pub max_individual_alloc: Amount,
    pub sold_allocation: Amount,
    pub joined_users: Count,
    /// Populated on the Exclusive phase.
    pub tier_weights: Option<TierWeights>,
    /// Exclusive-cap multiplier in basis points (10_000 = 1.0x). Populated on
    /// the FcfsStaker phase.
    pub multiplication_rate_bps: Option<u32>,
}

impl PoolPhase {
    /// Disabled placeholder of the given kind.
    pub fn disabled(kind: PhaseKind) -> Self {
        Self {
            kind,
            is_active: false,
            window: None,
            max_total_alloc: 0,
            max_individual_alloc: 0,
            sold_allocation: 0,
            joined_users: 0,
            tier_weights: None,
            multiplication_rate_bps: None,
        }
    }
}

/// Raise-token per sale-token as a rational pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRatio {
    pub num: Amount,
    pub den: Amount,
}

/// Normalized pool snapshot. Amounts are post-scaling except the per-tier
/// weights, which stay raw until surfaced (see `tier`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    pub id: u64,
    pub contract_address: String,
    pub token_ratio: TokenRatio,
    pub claimable_percentage: ClaimablePercentage,
    /// Published/live flag. Distinct from per-phase `is_active`.
    pub is_active: bool,
    pub start_date: Timestamp,
    pub claim_at: Option<Timestamp>,
    pub max_allocation_all_phases: Amount,
    pub phases: Vec<PoolPhase>,
}

impl PoolConfig {
    /// The phase of the given kind, only when it is enabled.
    pub fn active_phase(&self, kind: PhaseKind) -> Option<&PoolPhase> {
        self.phases
            .iter()
            .find(|p| p.kind == kind && p.is_active)
    }

    /// First enabled phase start in precedence order Whitelist, Exclusive,
    /// FcfsStaker, Public. Used both for overall pool timing and for
    /// contribution-window gating.
    pub fn join_pool_start(&self) -> Option<Timestamp> {
        PhaseKind::ORDER.iter().find_map(|&kind| {
            self.active_phase(kind)
                .and_then(|p| p.window)
                .map(|w| w.start_at)
        })
    }

    /// The Public phase end. None when the Public phase is disabled.
    pub fn join_pool_end(&self) -> Option<Timestamp> {
        self.active_phase(PhaseKind::Public)
            .and_then(|p| p.window)
            .map(|w| w.end_at)
    }

    /// Total raise target in raise-token units.
    pub fn token_total_raise(&self) -> Amount {
        self.max_allocation_all_phases
    }

    /// Sum of sold allocation across enabled phases.
    pub fn token_current_raise(&self) -> Amount {
        self.phases
            .iter()
            .filter(|p| p.is_active)
            .fold(0u128, |acc, p| acc.saturating_add(p.sold_allocation))
    }

    /// Progress as basis points (two-decimal percent). 0 when the total is
    /// 0, capped at 10_000 when the merged numbers overshoot the total.
    pub fn progress_bps(&self) -> u32 {
        let total = self.token_total_raise();
        if total == 0 {
            return 0;
        }
        let current = self.token_current_raise();
        mul_div(current, BPS_DENOM as u128, total)
            .map(|bps| bps.min(BPS_DENOM as u128) as u32)
            .unwrap_or(BPS_DENOM)
    }
}

/// One staking tier: the stake threshold granting the level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationTier {
    /// 1..=5, ascending with `min_allocation`.
    pub level: u8,
    pub min_allocation: Amount,
}

/// Governance voting record for a pool proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolVoting {
    /// Half-open voting window: start inclusive, end exclusive.
    pub voting_start: Timestamp,
    pub voting_end: Timestamp,
    pub total_up: u128,
    pub total_down: u128,
    /// Absolute-vote threshold (up minus down) that validates the pool while
    /// the window is open.
    pub min_can_active: u128,
}
