//! Ledger parameters supplied by configuration.

use crate::error::TypesError;
use crate::rate::Rate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Comparison applied when the global rate is updated.
///
/// Both variants forbid raising the rate. They differ only on whether
/// re-submitting the current value is accepted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatePolicy {
    /// `new <= current` is accepted.
    #[default]
    NonIncreasing,
    /// Only `new < current` is accepted.
    StrictlyDecreasing,
}

impl RatePolicy {
    pub fn permits(&self, current: Rate, requested: Rate) -> bool {
        match self {
            Self::NonIncreasing => requested <= current,
            Self::StrictlyDecreasing => requested < current,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NonIncreasing => "non_increasing",
            Self::StrictlyDecreasing => "strictly_decreasing",
        }
    }
}

impl fmt::Display for RatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RatePolicy {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "non_increasing" => Ok(Self::NonIncreasing),
            "strictly_decreasing" | "strict" => Ok(Self::StrictlyDecreasing),
            _ => Err(TypesError::UnknownRatePolicy(s.to_string())),
        }
    }
}

/// Parameters a ledger is created with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerParams {
    /// Global rate of a ledger that has no persisted state yet. Ignored once a
    /// rate has been stored: the stored rate can only go down.
    #[serde(default = "default_initial_rate")]
    pub initial_rate: Rate,

    #[serde(default)]
    pub rate_policy: RatePolicy,
}

fn default_initial_rate() -> Rate {
    LedgerParams::DEFAULT_INITIAL_RATE
}

impl LedgerParams {
    /// 5e10 at scale 1e18, about 0.16% per year.
    pub const DEFAULT_INITIAL_RATE: Rate = Rate::from_raw(50_000_000_000);

    pub fn with_rate(initial_rate: Rate) -> Self {
        Self {
            initial_rate,
            rate_policy: RatePolicy::default(),
        }
    }
}

impl Default for LedgerParams {
    fn default() -> Self {
        Self::with_rate(Self::DEFAULT_INITIAL_RATE)
    }
}
