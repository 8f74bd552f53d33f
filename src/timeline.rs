//! Pool timeline derivation.
//!
//! The timeline lists the enabled phases in fixed policy order (Whitelist,
//! Exclusive, FcfsStaker, Public) regardless of their chronological starts;
//! display order is policy order. Active-interval resolution scans that list
//! and falls back to the upcoming/claimable pseudo-intervals at the edges.

use serde::{Deserialize, Serialize};

use crate::pool::{PhaseKind, PoolConfig};
use crate::Timestamp;

/// A timeline slot: one of the four phases or a boundary pseudo-interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntervalKey {
    Whitelist,
    Exclusive,
    FcfsStaker,
    Public,
    /// Pool not yet live.
    Upcoming,
    /// All sale phases elapsed; claims are what remains.
    Claimable,
}

impl From<PhaseKind> for IntervalKey {
    fn from(kind: PhaseKind) -> Self {
        match kind {
            PhaseKind::Whitelist => IntervalKey::Whitelist,
            PhaseKind::Exclusive => IntervalKey::Exclusive,
            PhaseKind::FcfsStaker => IntervalKey::FcfsStaker,
            PhaseKind::Public => IntervalKey::Public,
        }
    }
}

/// One named interval of the pool timeline. Bounds stay optional so callers
/// can render phases whose window is only partially known.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub key: IntervalKey,
    pub start_at: Option<Timestamp>,
    pub end_at: Option<Timestamp>,
}

/// Enabled phases of the pool, in policy order.
pub fn build_timeline(pool: &PoolConfig) -> Vec<TimelineEntry> {
    PhaseKind::ORDER
        .iter()
        .filter_map(|&kind| {
            pool.active_phase(kind).map(|phase| TimelineEntry {
                key: kind.into(),
                start_at: phase.window.map(|w| w.start_at),
                end_at: phase.window.map(|w| w.end_at),
            })
        })
        .collect()
}

/// Resolve the interval the pool currently sits in.
///
/// `now` is `None` until the host clock has a baseline; resolution is
/// undefined before that and returns `None`. An unpublished pool always
/// resolves to [`IntervalKey::Upcoming`]. Otherwise the timeline is scanned
/// in order and the first matching interval wins; when every interval has
/// elapsed and `now` is past `join_pool_end`, the pool is claimable.
pub fn resolve_active_interval(
    timeline: &[TimelineEntry],
    now: Option<Timestamp>,
    pool_active: bool,
    join_pool_end: Option<Timestamp>,
) -> Option<IntervalKey> {
    let now = now?;
    if !pool_active {
        return Some(IntervalKey::Upcoming);
    }
    for entry in timeline {
        let matched = match (entry.start_at, entry.end_at) {
            (None, Some(end)) => now < end,
            (Some(start), None) => now > start,
            (Some(start), Some(end)) => now > start && now < end,
            (None, None) => false,
        };
        if matched {
            return Some(entry.key);
        }
    }
    if join_pool_end.is_some_and(|end| now > end) {
        return Some(IntervalKey::Claimable);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{PhaseWindow, PoolPhase, PoolConfig, TokenRatio};
    use crate::scale::ClaimablePercentage;

    fn phase(kind: PhaseKind, start: Timestamp, end: Timestamp) -> PoolPhase {
        PoolPhase {
            kind,
            is_active: true,
            window: Some(PhaseWindow { start_at: start, end_at: end }),
            max_total_alloc: 0,
            max_individual_alloc: 0,
            sold_allocation: 0,
            joined_users: 0,
            tier_weights: None,
            multiplication_rate_bps: None,
        }
    }

    fn pool(phases: Vec<PoolPhase>) -> PoolConfig {
        PoolConfig {
            id: 3,
            contract_address: "pool".into(),
            token_ratio: TokenRatio { num: 1, den: 1 },
            claimable_percentage: ClaimablePercentage::FULL,
            is_active: true,
            start_date: 0,
            claim_at: None,
            max_allocation_all_phases: 0,
            phases,
        }
    }

    #[test]
    fn timeline_keeps_policy_order_not_time_order() {
        // Exclusive chronologically precedes Whitelist; display order is
        // still Whitelist first.
        let p = pool(vec![
            phase(PhaseKind::Exclusive, 100, 200),
            phase(PhaseKind::Whitelist, 300, 400),
            phase(PhaseKind::Public, 400, 500),
        ]);
        let keys: Vec<_> = build_timeline(&p).iter().map(|e| e.key).collect();
        assert_eq!(
            keys,
            vec![IntervalKey::Whitelist, IntervalKey::Exclusive, IntervalKey::Public]
        );
    }

    #[test]
    fn disabled_phases_are_omitted() {
        let mut wl = phase(PhaseKind::Whitelist, 100, 200);
        wl.is_active = false;
        let p = pool(vec![wl, phase(PhaseKind::Public, 200, 300)]);
        let keys: Vec<_> = build_timeline(&p).iter().map(|e| e.key).collect();
        assert_eq!(keys, vec![IntervalKey::Public]);
    }

    #[test]
    fn no_time_baseline_resolves_nothing() {
        let p = pool(vec![phase(PhaseKind::Public, 100, 200)]);
        let tl = build_timeline(&p);
        assert_eq!(resolve_active_interval(&tl, None, true, Some(200)), None);
    }

    #[test]
    fn inactive_pool_is_upcoming() {
        let p = pool(vec![phase(PhaseKind::Public, 100, 200)]);
        let tl = build_timeline(&p);
        assert_eq!(
            resolve_active_interval(&tl, Some(150), false, Some(200)),
            Some(IntervalKey::Upcoming)
        );
    }

    #[test]
    fn first_containing_interval_wins() {
        let p = pool(vec![
            phase(PhaseKind::Whitelist, 100, 200),
            phase(PhaseKind::Exclusive, 200, 300),
            phase(PhaseKind::Public, 300, 400),
        ]);
        let tl = build_timeline(&p);
        assert_eq!(
            resolve_active_interval(&tl, Some(150), true, Some(400)),
            Some(IntervalKey::Whitelist)
        );
        assert_eq!(
            resolve_active_interval(&tl, Some(250), true, Some(400)),
            Some(IntervalKey::Exclusive)
        );
        assert_eq!(
            resolve_active_interval(&tl, Some(350), true, Some(400)),
            Some(IntervalKey::Public)
        );
    }

    #[test]
    fn containment_is_strict_on_both_bounds() {
        let p = pool(vec![phase(PhaseKind::Public, 100, 200)]);
        let tl = build_timeline(&p);
        assert_eq!(resolve_active_interval(&tl, Some(100), true, Some(200)), None);
        assert_eq!(resolve_active_interval(&tl, Some(101), true, Some(200)), Some(IntervalKey::Public));
        assert_eq!(resolve_active_interval(&tl, Some(200), true, Some(200)), None);
    }

    #[test]
    fn open_ended_entries_match_one_sided() {
        let tl = [
            TimelineEntry { key: IntervalKey::Whitelist, start_at: None, end_at: Some(100) },
            TimelineEntry { key: IntervalKey::Public, start_at: Some(100), end_at: None },
        ];
        assert_eq!(
            resolve_active_interval(&tl, Some(50), true, None),
            Some(IntervalKey::Whitelist)
        );
        assert_eq!(
            resolve_active_interval(&tl, Some(500), true, None),
            Some(IntervalKey::Public)
        );
    }

    #[test]
    fn elapsed_timeline_falls_back_to_claimable() {
        let p = pool(vec![phase(PhaseKind::Public, 100, 200)]);
        let tl = build_timeline(&p);
        assert_eq!(
            resolve_active_interval(&tl, Some(201), true, Some(200)),
            Some(IntervalKey::Claimable)
        );
        // Exactly at the end: not past it yet, and not inside any interval.
        assert_eq!(resolve_active_interval(&tl, Some(200), true, Some(200)), None);
    }
}
