//! Staking-tier resolution and per-tier individual caps.
//!
//! A user's staked total maps to a discrete level 1..=5 by ordered threshold
//! comparison; level 0 means no tier reached. The level then selects the
//! per-user cap for the Exclusive round, and the FcfsStaker round multiplies
//! that cap up while its window is open.

use serde::{Deserialize, Serialize};

use crate::error::PoolError;
use crate::pool::{AllocationTier, PhaseKind, PoolConfig};
use crate::scale::{mul_div, scale, ClaimablePercentage};
use crate::{Amount, Timestamp, BPS_DENOM};

/// Highest level whose threshold the stake reaches, scanning ascending.
/// Thresholds are inclusive; 24_000 staked against a level-3 threshold of
/// 24_000 resolves to level 3.
pub fn resolve_tier(staked_total: Amount, tiers: &[AllocationTier]) -> u8 {
    let mut level = 0;
    for tier in tiers {
        if tier.min_allocation <= staked_total {
            level = tier.level;
        }
    }
    level
}

/// Check a tier table: levels must run 1..=5 without gaps and thresholds
/// must ascend, otherwise [`resolve_tier`] ties would be ambiguous.
pub fn validate_tiers(tiers: &[AllocationTier]) -> Result<(), PoolError> {
    if tiers.len() > 5 {
        return Err(PoolError::InvalidConfig("tier table has more than 5 levels"));
    }
    for (i, tier) in tiers.iter().enumerate() {
        if tier.level != i as u8 + 1 {
            return Err(PoolError::InvalidConfig("tier levels must run 1..=5 in order"));
        }
        if i > 0 && tiers[i - 1].min_allocation >= tier.min_allocation {
            return Err(PoolError::InvalidConfig("tier thresholds must be ascending"));
        }
    }
    Ok(())
}

/// Per-user caps for the restricted rounds, in raw (pre-scaling) units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualCaps {
    pub exclusive: Amount,
    pub fcfs_staker: Amount,
}

impl IndividualCaps {
    /// Apply the claimable-percentage scaler once, at the boundary where the
    /// caps are surfaced to a caller.
    pub fn scaled(&self, percent: ClaimablePercentage) -> Result<IndividualCaps, PoolError> {
        Ok(IndividualCaps {
            exclusive: scale(self.exclusive, percent)?,
            fcfs_staker: scale(self.fcfs_staker, percent)?,
        })
    }
}

/// Per-user caps for a user at `level`, evaluated at `now`.
///
/// The exclusive cap comes from the Exclusive phase tier weights; 0 when the
/// level is outside 1..=5 or the phase is disabled. The FcfsStaker cap is the
/// exclusive cap times the phase multiplication rate, and is nonzero only
/// while `now` sits inside an enabled FcfsStaker window.
pub fn max_individual_allocation(
    pool: &PoolConfig,
    level: u8,
    now: Timestamp,
) -> IndividualCaps {
    let exclusive = pool
        .active_phase(PhaseKind::Exclusive)
        .and_then(|p| p.tier_weights)
        .map(|w| w.max_individual_amount(level))
        .unwrap_or(0);

    let fcfs_staker = match pool.active_phase(PhaseKind::FcfsStaker) {
        Some(phase) if phase.window.is_some_and(|w| w.contains(now)) => {
            let rate = phase.multiplication_rate_bps.unwrap_or(BPS_DENOM);
            mul_div(exclusive, rate as u128, BPS_DENOM as u128).unwrap_or(0)
        }
        _ => 0,
    };

    IndividualCaps { exclusive, fcfs_staker }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{PhaseWindow, PoolPhase, TierWeights, TokenRatio};

    fn tiers() -> Vec<AllocationTier> {
        [400u128, 8_000, 24_000, 40_000, 80_000]
            .iter()
            .enumerate()
            .map(|(i, &min)| AllocationTier { level: i as u8 + 1, min_allocation: min })
            .collect()
    }

    fn pool_with_rounds(fcfs_rate_bps: u32, fcfs_window: PhaseWindow) -> PoolConfig {
        let exclusive = PoolPhase {
            kind: PhaseKind::Exclusive,
            is_active: true,
            window: Some(PhaseWindow { start_at: 0, end_at: 1_000 }),
            max_total_alloc: 0,
            max_individual_alloc: 0,
            sold_allocation: 0,
            joined_users: 0,
            tier_weights: Some(TierWeights { levels: [100, 500, 1_500, 4_000, 10_000] }),
            multiplication_rate_bps: None,
        };
        let fcfs = PoolPhase {
            kind: PhaseKind::FcfsStaker,
            is_active: true,
            window: Some(fcfs_window),
            max_total_alloc: 0,
            max_individual_alloc: 0,
            sold_allocation: 0,
            joined_users: 0,
            tier_weights: None,
            multiplication_rate_bps: Some(fcfs_rate_bps),
        };
        PoolConfig {
            id: 5,
            contract_address: "pool".into(),
            token_ratio: TokenRatio { num: 1, den: 1 },
            claimable_percentage: ClaimablePercentage::FULL,
            is_active: true,
            start_date: 0,
            claim_at: None,
            max_allocation_all_phases: 0,
            phases: vec![exclusive, fcfs],
        }
    }

    #[test]
    fn stake_at_threshold_reaches_the_tier() {
        assert_eq!(resolve_tier(24_000, &tiers()), 3);
        assert_eq!(resolve_tier(23_999, &tiers()), 2);
        assert_eq!(resolve_tier(24_001, &tiers()), 3);
    }

    #[test]
    fn zero_stake_is_level_zero() {
        assert_eq!(resolve_tier(0, &tiers()), 0);
        assert_eq!(resolve_tier(399, &tiers()), 0);
    }

    #[test]
    fn top_tier_is_open_ended() {
        assert_eq!(resolve_tier(80_000, &tiers()), 5);
        assert_eq!(resolve_tier(u128::MAX, &tiers()), 5);
    }

    #[test]
    fn tier_is_monotone_in_stake() {
        let table = tiers();
        let mut prev = 0;
        for stake in (0..100_000u128).step_by(613) {
            let level = resolve_tier(stake, &table);
            assert!(level >= prev, "tier dropped at stake {stake}");
            prev = level;
        }
    }

    #[test]
    fn tier_table_validation() {
        assert!(validate_tiers(&tiers()).is_ok());
        assert!(validate_tiers(&[]).is_ok());

        let mut gap = tiers();
        gap.remove(1);
        assert!(validate_tiers(&gap).is_err());

        let mut flat = tiers();
        flat[3].min_allocation = flat[2].min_allocation;
        assert!(validate_tiers(&flat).is_err());
    }

    #[test]
    fn fcfs_cap_is_exclusive_cap_times_rate_inside_window() {
        // Level-2 cap 500, rate 2.0x, inside the FcfsStaker window.
        let p = pool_with_rounds(20_000, PhaseWindow { start_at: 1_000, end_at: 2_000 });
        let caps = max_individual_allocation(&p, 2, 1_500);
        assert_eq!(caps.exclusive, 500);
        assert_eq!(caps.fcfs_staker, 1_000);
    }

    #[test]
    fn fcfs_cap_is_zero_outside_window() {
        let p = pool_with_rounds(20_000, PhaseWindow { start_at: 1_000, end_at: 2_000 });
        assert_eq!(max_individual_allocation(&p, 2, 999).fcfs_staker, 0);
        assert_eq!(max_individual_allocation(&p, 2, 2_000).fcfs_staker, 0);
    }

    #[test]
    fn out_of_range_level_yields_zero_caps() {
        let p = pool_with_rounds(20_000, PhaseWindow { start_at: 1_000, end_at: 2_000 });
        for level in [0u8, 6, 200] {
            let caps = max_individual_allocation(&p, level, 1_500);
            assert_eq!(caps.exclusive, 0);
            assert_eq!(caps.fcfs_staker, 0);
        }
    }

    #[test]
    fn absent_phases_yield_zero_caps() {
        let p = PoolConfig {
            id: 5,
            contract_address: "pool".into(),
            token_ratio: TokenRatio { num: 1, den: 1 },
            claimable_percentage: ClaimablePercentage::FULL,
            is_active: true,
            start_date: 0,
            claim_at: None,
            max_allocation_all_phases: 0,
            phases: vec![],
        };
        let caps = max_individual_allocation(&p, 3, 1_500);
        assert_eq!(caps, IndividualCaps::default());
    }

    #[test]
    fn caps_scale_once_at_the_surfacing_boundary() {
        let p = pool_with_rounds(20_000, PhaseWindow { start_at: 1_000, end_at: 2_000 });
        let raw = max_individual_allocation(&p, 2, 1_500);
        let half = ClaimablePercentage::new(50).unwrap();
        let shown = raw.scaled(half).unwrap();
        assert_eq!(shown.exclusive, 1_000);
        assert_eq!(shown.fcfs_staker, 2_000);
    }
}
