//! Error taxonomy for the pool core.
//!
//! The core performs no I/O and never retries; every error is a pure-function
//! return. Out-of-range queries (unknown tier level, absent phase) are not
//! errors at all and yield zero/neutral values instead.

use thiserror::Error;

/// Errors surfaced by normalization and the scaling math.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// A snapshot field violates its invariants (active phase without a
    /// complete window, claimable percentage outside 1..=100, tier table not
    /// ascending).
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// Arithmetic overflow in u128 scaling math.
    #[error("arithmetic overflow")]
    Overflow,
}
