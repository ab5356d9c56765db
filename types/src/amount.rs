//! Amount requests and integer parsing shared by amounts and rates.
//!
//! Amounts are raw `u128` units throughout the ledger. The only special value
//! is "everything the holder has", which is an explicit enum variant instead
//! of a reserved number.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How much of a balance an operation should move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmountRequest {
    /// Exactly this many raw units.
    Exact(u128),
    /// The holder's full displayed balance at the time of the operation.
    All,
}

impl AmountRequest {
    /// Resolve against the holder's full balance.
    pub fn resolve(self, full_balance: u128) -> u128 {
        match self {
            Self::Exact(amount) => amount,
            Self::All => full_balance,
        }
    }
}

impl From<u128> for AmountRequest {
    fn from(amount: u128) -> Self {
        Self::Exact(amount)
    }
}

impl fmt::Display for AmountRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(amount) => write!(f, "{amount}"),
            Self::All => write!(f, "all"),
        }
    }
}

impl FromStr for AmountRequest {
    type Err = TypesError;

    /// Accepts `all` (case-insensitive) or an integer in the notation accepted
    /// by [`parse_u128`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        parse_u128(s)
            .map(Self::Exact)
            .ok_or_else(|| TypesError::InvalidAmount(s.to_string()))
    }
}

/// Parse a non-negative integer written as digits (with optional `_`
/// separators) or as `<digits>e<exponent>`, e.g. `1_000_000` or `5e10`.
///
/// Returns `None` for anything else, including values beyond `u128::MAX`.
pub fn parse_u128(s: &str) -> Option<u128> {
    let s = s.trim();
    let (mantissa, exponent) = match s.split_once(|c: char| c == 'e' || c == 'E') {
        Some((m, e)) => (m, Some(e)),
        None => (s, None),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '_').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let base: u128 = digits.parse().ok()?;
    match exponent {
        None => Some(base),
        Some(e) => {
            if e.is_empty() || !e.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            let exp: u32 = e.parse().ok()?;
            base.checked_mul(10u128.checked_pow(exp)?)
        }
    }
}
