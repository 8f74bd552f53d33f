//! Ingestion and normalization boundary.
//!
//! Every pool snapshot is reconstructed per fetch from two collaborators: a
//! backend record (JSON over HTTP, deserialized here) and an on-chain account
//! read (deserialized by the chain reader, handed over as a versioned value).
//! This module merges the two, validates the result and applies the
//! claimable-percentage scaling. Rules:
//!
//! - Chain-authoritative numeric fields override the backend values.
//! - On-chain schema versions are resolved exactly once, here; nothing
//!   downstream branches on a version.
//! - Scaling is applied exactly once, here, to the amounts stored on the
//!   [`PoolConfig`]. Per-tier weights stay raw and are scaled where surfaced.
//! - An active phase without a complete window is a configuration error,
//!   never a wall-clock fallback.
//! - A merged current raise above the total is tolerated: progress caps at
//!   100% and the anomaly is logged.

use serde::Deserialize;
use tracing::warn;

use crate::error::PoolError;
use crate::pool::{
    PhaseKind, PhaseWindow, PoolConfig, PoolPhase, PoolVoting, TierWeights, TokenRatio,
};
use crate::scale::{scale, ClaimablePercentage};
use crate::{Amount, Count, Timestamp, BPS_DENOM};

// ---------- Backend DTOs ----------

fn default_ratio_part() -> Amount {
    1
}

fn default_claimable() -> u8 {
    100
}

/// Pool record as served by the backend API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendPoolRecord {
    pub id: u64,
    pub contract_address: String,
    #[serde(default = "default_ratio_part")]
    pub token_ratio_num: Amount,
    #[serde(default = "default_ratio_part")]
    pub token_ratio_den: Amount,
    /// Raw percent in 1..=100; validated during normalization.
    #[serde(default = "default_claimable")]
    pub claimable_percentage: u8,
    #[serde(default)]
    pub is_active: bool,
    pub start_date: Timestamp,
    #[serde(default)]
    pub claim_at: Option<Timestamp>,
    #[serde(default)]
    pub max_allocation_all_phases: Amount,
    #[serde(default)]
    pub early_join_phase: Option<BackendPhaseRecord>,
    #[serde(default)]
    pub exclusive_phase: Option<BackendPhaseRecord>,
    #[serde(default)]
    pub fcfs_stake_phase: Option<BackendPhaseRecord>,
    #[serde(default)]
    pub public_phase: Option<BackendPhaseRecord>,
}

/// Phase sub-object of a backend pool record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendPhaseRecord {
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub start_at: Option<Timestamp>,
    #[serde(default)]
    pub end_at: Option<Timestamp>,
    #[serde(default)]
    pub max_total_alloc: Amount,
    #[serde(default)]
    pub max_individual_alloc: Amount,
    #[serde(default)]
    pub sold_allocation: Amount,
    #[serde(default)]
    pub number_joined_user: Count,
    #[serde(default)]
    pub level1: Option<BackendTierWeight>,
    #[serde(default)]
    pub level2: Option<BackendTierWeight>,
    #[serde(default)]
    pub level3: Option<BackendTierWeight>,
    #[serde(default)]
    pub level4: Option<BackendTierWeight>,
    #[serde(default)]
    pub level5: Option<BackendTierWeight>,
    /// Exclusive-cap multiplier as served by the backend (e.g. 2.0).
    #[serde(default)]
    pub multiplication_rate: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendTierWeight {
    #[serde(default)]
    pub max_individual_amount: Amount,
}

/// Voting record as served by the backend API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendVotingRecord {
    pub voting_start: Timestamp,
    pub voting_end: Timestamp,
    #[serde(default)]
    pub voting_total_up: u128,
    #[serde(default)]
    pub voting_total_down: u128,
    #[serde(default)]
    pub voting_min_can_active: u128,
}

// ---------- On-chain account, versioned ----------

/// Chain-authoritative counters for one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainPhaseNumbers {
    pub max_total_alloc: Amount,
    pub max_individual_alloc: Amount,
    pub sold_allocation: Amount,
    pub joined_users: Count,
}

/// On-chain pool account across deployed program schema versions. The chain
/// reader resolves the account layout and hands over one of these variants;
/// [`ChainPoolAccount::normalized`] flattens it so the rest of the crate
/// never sees a version again.
#[derive(Debug, Clone)]
pub enum ChainPoolAccount {
    /// Original layout: early-join and public rounds only.
    V1 {
        early_join: Option<ChainPhaseNumbers>,
        public: Option<ChainPhaseNumbers>,
    },
    /// Adds the staker-exclusive round with per-tier caps.
    V2 {
        early_join: Option<ChainPhaseNumbers>,
        exclusive: Option<ChainPhaseNumbers>,
        public: Option<ChainPhaseNumbers>,
        exclusive_tier_caps: Option<[Amount; 5]>,
    },
    /// Adds the FCFS-for-staker round and its multiplication rate.
    V3 {
        early_join: Option<ChainPhaseNumbers>,
        exclusive: Option<ChainPhaseNumbers>,
        fcfs_staker: Option<ChainPhaseNumbers>,
        public: Option<ChainPhaseNumbers>,
        exclusive_tier_caps: Option<[Amount; 5]>,
        multiplication_rate_bps: Option<u32>,
    },
    /// Adds an on-chain claimable percentage.
    V4 {
        early_join: Option<ChainPhaseNumbers>,
        exclusive: Option<ChainPhaseNumbers>,
        fcfs_staker: Option<ChainPhaseNumbers>,
        public: Option<ChainPhaseNumbers>,
        exclusive_tier_caps: Option<[Amount; 5]>,
        multiplication_rate_bps: Option<u32>,
        claimable_percentage: Option<u8>,
    },
}

/// Version-free view of an on-chain account.
#[derive(Debug, Clone, Default)]
pub struct ChainPoolState {
    pub early_join: Option<ChainPhaseNumbers>,
    pub exclusive: Option<ChainPhaseNumbers>,
    pub fcfs_staker: Option<ChainPhaseNumbers>,
    pub public: Option<ChainPhaseNumbers>,
    pub exclusive_tier_caps: Option<[Amount; 5]>,
    pub multiplication_rate_bps: Option<u32>,
    pub claimable_percentage: Option<u8>,
}

impl ChainPoolAccount {
    /// Flatten the versioned layout. The single place that matches on a
    /// schema version.
    pub fn normalized(&self) -> ChainPoolState {
        match self.clone() {
            ChainPoolAccount::V1 { early_join, public } => ChainPoolState {
                early_join,
                public,
                ..ChainPoolState::default()
            },
            ChainPoolAccount::V2 { early_join, exclusive, public, exclusive_tier_caps } => {
                ChainPoolState {
                    early_join,
                    exclusive,
                    public,
                    exclusive_tier_caps,
                    ..ChainPoolState::default()
                }
            }
            ChainPoolAccount::V3 {
                early_join,
                exclusive,
                fcfs_staker,
                public,
                exclusive_tier_caps,
                multiplication_rate_bps,
            } => ChainPoolState {
                early_join,
                exclusive,
                fcfs_staker,
                public,
                exclusive_tier_caps,
                multiplication_rate_bps,
                claimable_percentage: None,
            },
            ChainPoolAccount::V4 {
                early_join,
                exclusive,
                fcfs_staker,
                public,
                exclusive_tier_caps,
                multiplication_rate_bps,
                claimable_percentage,
            } => ChainPoolState {
                early_join,
                exclusive,
                fcfs_staker,
                public,
                exclusive_tier_caps,
                multiplication_rate_bps,
                claimable_percentage,
            },
        }
    }
}

// ---------- Normalization ----------

/// Merge a backend record with an optional on-chain read into a normalized,
/// scaled [`PoolConfig`] snapshot.
pub fn normalize(
    backend: &BackendPoolRecord,
    chain: Option<&ChainPoolAccount>,
) -> Result<PoolConfig, PoolError> {
    let chain = chain.map(ChainPoolAccount::normalized).unwrap_or_default();

    let percent = ClaimablePercentage::new(
        chain
            .claimable_percentage
            .unwrap_or(backend.claimable_percentage),
    )?;

    if backend.token_ratio_den == 0 {
        return Err(PoolError::InvalidConfig("token ratio denominator is zero"));
    }

    let sources: [(PhaseKind, &Option<BackendPhaseRecord>, &Option<ChainPhaseNumbers>); 4] = [
        (PhaseKind::Whitelist, &backend.early_join_phase, &chain.early_join),
        (PhaseKind::Exclusive, &backend.exclusive_phase, &chain.exclusive),
        (PhaseKind::FcfsStaker, &backend.fcfs_stake_phase, &chain.fcfs_staker),
        (PhaseKind::Public, &backend.public_phase, &chain.public),
    ];

    let mut phases = Vec::with_capacity(4);
    for (kind, record, numbers) in sources {
        phases.push(build_phase(kind, record.as_ref(), numbers.as_ref(), &chain, percent)?);
    }

    let config = PoolConfig {
        id: backend.id,
        contract_address: backend.contract_address.clone(),
        token_ratio: TokenRatio {
            num: scale(backend.token_ratio_num, percent)?,
            den: backend.token_ratio_den,
        },
        claimable_percentage: percent,
        is_active: backend.is_active,
        start_date: backend.start_date,
        claim_at: backend.claim_at,
        max_allocation_all_phases: scale(backend.max_allocation_all_phases, percent)?,
        phases,
    };

    let total = config.token_total_raise();
    let current = config.token_current_raise();
    if current > total {
        warn!(
            pool = config.id,
            current, total, "current raise exceeds total raise; progress capped"
        );
    }

    Ok(config)
}

/// Map a backend voting record into the normalized voting shape.
pub fn normalize_voting(record: &BackendVotingRecord) -> PoolVoting {
    PoolVoting {
        voting_start: record.voting_start,
        voting_end: record.voting_end,
        total_up: record.voting_total_up,
        total_down: record.voting_total_down,
        min_can_active: record.voting_min_can_active,
    }
}

fn build_phase(
    kind: PhaseKind,
    record: Option<&BackendPhaseRecord>,
    numbers: Option<&ChainPhaseNumbers>,
    chain: &ChainPoolState,
    percent: ClaimablePercentage,
) -> Result<PoolPhase, PoolError> {
    let Some(record) = record else {
        return Ok(PoolPhase::disabled(kind));
    };
    if !record.is_active {
        return Ok(PoolPhase::disabled(kind));
    }

    let window = match (record.start_at, record.end_at) {
        (Some(start_at), Some(end_at)) => {
            if start_at >= end_at {
                return Err(PoolError::InvalidConfig("phase window is inverted or empty"));
            }
            PhaseWindow { start_at, end_at }
        }
        _ => return Err(PoolError::InvalidConfig("active phase is missing its window")),
    };

    // Chain counters replace the backend ones wholesale when present.
    let (max_total, max_individual, sold, joined) = match numbers {
        Some(n) => (n.max_total_alloc, n.max_individual_alloc, n.sold_allocation, n.joined_users),
        None => (
            record.max_total_alloc,
            record.max_individual_alloc,
            record.sold_allocation,
            record.number_joined_user,
        ),
    };

    let tier_weights = match kind {
        PhaseKind::Exclusive => Some(tier_weights_for(record, chain)),
        _ => None,
    };

    let multiplication_rate_bps = match kind {
        PhaseKind::FcfsStaker => Some(match chain.multiplication_rate_bps {
            Some(bps) => bps,
            None => match record.multiplication_rate {
                Some(rate) => rate_to_bps(rate)?,
                None => BPS_DENOM,
            },
        }),
        _ => None,
    };

    Ok(PoolPhase {
        kind,
        is_active: true,
        window: Some(window),
        max_total_alloc: scale(max_total, percent)?,
        max_individual_alloc: scale(max_individual, percent)?,
        sold_allocation: scale(sold, percent)?,
        joined_users: joined,
        tier_weights,
        multiplication_rate_bps,
    })
}

/// Per-level caps stay raw here; they are scaled where surfaced.
fn tier_weights_for(record: &BackendPhaseRecord, chain: &ChainPoolState) -> TierWeights {
    if let Some(levels) = chain.exclusive_tier_caps {
        return TierWeights { levels };
    }
    let cap = |w: &Option<BackendTierWeight>| w.map(|t| t.max_individual_amount).unwrap_or(0);
    TierWeights {
        levels: [
            cap(&record.level1),
            cap(&record.level2),
            cap(&record.level3),
            cap(&record.level4),
            cap(&record.level5),
        ],
    }
}

fn rate_to_bps(rate: f64) -> Result<u32, PoolError> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(PoolError::InvalidConfig(
            "multiplication rate must be a finite non-negative number",
        ));
    }
    let bps = (rate * BPS_DENOM as f64).round();
    if bps > u32::MAX as f64 {
        return Err(PoolError::InvalidConfig("multiplication rate out of range"));
    }
    Ok(bps as u32)
}
