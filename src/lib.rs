//! Launchpad pool core.
//!
//! Features:
//! - Phase model: Whitelist, Exclusive, FcfsStaker, Public windows with
//!   enable flags and per-phase caps.
//! - Deterministic sale/voting status classification over a caller-supplied
//!   unix-seconds timepoint.
//! - Policy-ordered timeline with active-interval resolution.
//! - Staking-tier resolution (levels 1..=5) and per-tier individual caps.
//! - Claimable-percentage scaling applied once at the ingestion boundary.
//! - Ingestion: backend DTO + versioned on-chain account merged into one
//!   normalized snapshot; chain-authoritative numbers win.
//! - Integer-only math: u128 amounts, basis points for percentages, checked
//!   and saturating arithmetic throughout.
//!
//! Time model: seconds since Unix epoch (i64), always passed in by the
//! caller. The core never reads the system clock; given the same snapshot
//! and the same `now`, every function returns the same result.

#![forbid(unsafe_code)]

pub mod clock;
pub mod error;
pub mod ingest;
pub mod pool;
pub mod scale;
pub mod status;
pub mod tier;
pub mod timeline;
pub mod voting;

/// Amount type (atomic raise-token units).
pub type Amount = u128;

/// Seconds since Unix epoch.
pub type Timestamp = i64;

/// Participant counter.
pub type Count = u64;

/// Basis points denominator (100.00% == 10_000 bps).
pub const BPS_DENOM: u32 = 10_000;

pub use clock::{SharedClock, SystemTimeSource, TimeSource};
pub use error::PoolError;
pub use ingest::{
    normalize, normalize_voting, BackendPoolRecord, BackendVotingRecord, ChainPoolAccount,
};
pub use pool::{
    AllocationTier, PhaseKind, PhaseWindow, PoolConfig, PoolPhase, PoolVoting, TierWeights,
    TokenRatio,
};
pub use scale::{scale, unscale, ClaimablePercentage};
pub use status::{classify_sale_status, SaleStatus, SaleStatusKind};
pub use tier::{max_individual_allocation, resolve_tier, validate_tiers, IndividualCaps};
pub use timeline::{build_timeline, resolve_active_interval, IntervalKey, TimelineEntry};
pub use voting::{classify_voting_status, VotingStatus};
