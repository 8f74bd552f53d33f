//! Sale-status classification.
//!
//! Derives one of five statuses from the pool windows, the publication flag
//! and sale progress, plus a humanized message for display. First matching
//! rule wins; the classifier is total over any snapshot and timepoint.

use serde::{Deserialize, Serialize};

use crate::pool::PoolConfig;
use crate::Timestamp;

/// Progress threshold, in basis points, at which an open pool reads as
/// filled (99.98%).
pub const MIN_PROGRESS_PASS_FULL_BPS: u32 = 9_998;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleStatusKind {
    Draft,
    Upcoming,
    Open,
    Closed,
    Filled,
}

/// Classification result: the status kind, the humanized span it was derived
/// from, and a ready display message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleStatus {
    pub kind: SaleStatusKind,
    pub diff: String,
    pub message: String,
}

/// a <= x < b.
fn between(a: Timestamp, x: Timestamp, b: Timestamp) -> bool {
    x >= a && x < b
}

/// Classify a pool at `now`.
///
/// Decision order:
/// 1. Unpublished pool: UPCOMING regardless of anything else.
/// 2. Publication instant before the join window: DRAFT. Both containment
///    checks must hold, which pins `now` to `start_date`.
/// 3. Before `join_pool_start`: UPCOMING with an "opens in" message.
/// 4. Inside the join window: FILLED at or above the pass-full threshold,
///    OPEN below it; "published ... ago" from `start_date`.
/// 5. From `join_pool_end` on: CLOSED. Progress never flips a closed pool
///    back to FILLED.
pub fn classify_sale_status(pool: &PoolConfig, now: Timestamp) -> SaleStatus {
    if !pool.is_active {
        return upcoming(pool, now);
    }
    let (Some(join_start), Some(join_end)) = (pool.join_pool_start(), pool.join_pool_end())
    else {
        // No enabled phase carries a window yet; nothing to open.
        return upcoming(pool, now);
    };

    if between(pool.start_date, now, join_start) && between(now, pool.start_date, join_start) {
        let diff = humanize_span(join_start - now);
        let message = opens_message(&diff);
        return SaleStatus { kind: SaleStatusKind::Draft, diff, message };
    }

    if now < join_start {
        let diff = humanize_span(join_start - now);
        let message = opens_message(&diff);
        return SaleStatus { kind: SaleStatusKind::Upcoming, diff, message };
    }

    if now < join_end {
        let kind = if pool.progress_bps() >= MIN_PROGRESS_PASS_FULL_BPS {
            SaleStatusKind::Filled
        } else {
            SaleStatusKind::Open
        };
        let diff = humanize_span(now - pool.start_date);
        let message = ago_message("published", &diff);
        return SaleStatus { kind, diff, message };
    }

    let diff = humanize_span(now - join_end);
    let message = ago_message("closed", &diff);
    SaleStatus { kind: SaleStatusKind::Closed, diff, message }
}

fn upcoming(pool: &PoolConfig, now: Timestamp) -> SaleStatus {
    let span = pool.join_pool_start().map(|j| j - now).unwrap_or(0);
    let diff = humanize_span(span);
    let message = opens_message(&diff);
    SaleStatus { kind: SaleStatusKind::Upcoming, diff, message }
}

fn opens_message(diff: &str) -> String {
    if diff == "now" {
        "opens now".to_string()
    } else {
        format!("opens in {diff}")
    }
}

fn ago_message(verb: &str, diff: &str) -> String {
    if diff == "now" {
        format!("{verb} just now")
    } else {
        format!("{verb} {diff} ago")
    }
}

/// Humanize a span in seconds: the largest nonzero unit among days, hours
/// and seconds wins, units are never combined, and an empty span is "now".
pub fn humanize_span(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let days = seconds / 86_400;
    if days > 0 {
        return plural(days, "day");
    }
    let hours = seconds / 3_600;
    if hours > 0 {
        return plural(hours, "hour");
    }
    if seconds > 0 {
        return plural(seconds, "second");
    }
    "now".to_string()
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}
