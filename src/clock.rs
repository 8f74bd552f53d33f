//! Host-side time seam.
//!
//! Every derivation in this crate takes `now` as an explicit argument; none
//! of them read ambient time. These types live on the host side of that
//! boundary: the application owns a single clock-refresh loop, stores the
//! value in a [`SharedClock`], and passes the read value down into the core.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::RwLock;

use crate::Timestamp;

/// Provider of the current instant in Unix seconds.
pub trait TimeSource: Send + Sync + 'static {
    fn now(&self) -> Timestamp;
}

/// System clock. For hosts only; never used inside the core.
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as Timestamp)
            .unwrap_or_default()
    }
}

/// One shared "now" value read by many call sites and refreshed by a single
/// host loop (typically from a server or blockchain clock rather than the
/// local wall clock). Starts unset; reads return `None` until the first
/// refresh so callers can distinguish "no time baseline yet".
#[derive(Clone, Default)]
pub struct SharedClock {
    inner: Arc<RwLock<Option<Timestamp>>>,
}

impl SharedClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the shared value. Called by the host refresh loop only.
    pub fn set(&self, now: Timestamp) {
        *self.inner.write() = Some(now);
    }

    /// Latest refreshed value, `None` before the first refresh.
    pub fn get(&self) -> Option<Timestamp> {
        *self.inner.read()
    }
}
