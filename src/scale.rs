//! Claimable-percentage scaling.
//!
//! A pool that releases only a fraction of its nominal allocation at claim
//! time reports all displayed amounts raised by the inverse of that fraction:
//! `scale(x, p) = x * 100 / p`. The scaler is applied exactly once per raw
//! value, at the ingestion boundary; see `ingest::normalize`.

use serde::{Deserialize, Serialize};

use crate::error::PoolError;
use crate::Amount;

/// Fraction of the nominal allocation released at claim time, in whole
/// percent. Valid range is 1..=100; construction rejects anything else so the
/// scaler never divides by zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ClaimablePercentage(u8);

impl ClaimablePercentage {
    /// 100%: amounts pass through unscaled.
    pub const FULL: ClaimablePercentage = ClaimablePercentage(100);

    pub fn new(percent: u8) -> Result<Self, PoolError> {
        if percent == 0 || percent > 100 {
            return Err(PoolError::InvalidConfig(
                "claimable percentage must be in 1..=100",
            ));
        }
        Ok(Self(percent))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for ClaimablePercentage {
    fn default() -> Self {
        Self::FULL
    }
}

impl TryFrom<u8> for ClaimablePercentage {
    type Error = PoolError;
    fn try_from(v: u8) -> Result<Self, PoolError> {
        Self::new(v)
    }
}

impl From<ClaimablePercentage> for u8 {
    fn from(p: ClaimablePercentage) -> u8 {
        p.0
    }
}

/// Raise a raw amount to its displayed value: `amount * 100 / percent`.
pub fn scale(amount: Amount, percent: ClaimablePercentage) -> Result<Amount, PoolError> {
    mul_div(amount, 100, percent.0 as u128)
}

/// Inverse of [`scale`]: `amount * percent / 100`. Round-trips within floor
/// rounding.
pub fn unscale(amount: Amount, percent: ClaimablePercentage) -> Result<Amount, PoolError> {
    mul_div(amount, percent.0 as u128, 100)
}

/// floor(a * b / d) with checked u128 arithmetic.
pub(crate) fn mul_div(a: u128, b: u128, d: u128) -> Result<u128, PoolError> {
    if d == 0 {
        return Err(PoolError::InvalidConfig("division by zero"));
    }
    a.checked_mul(b).ok_or(PoolError::Overflow).map(|p| p / d)
}
