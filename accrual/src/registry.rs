//! The global interest rate and its one-way ratchet.

use crate::error::LedgerError;
use lockrate_types::{Rate, RatePolicy};
use serde::{Deserialize, Serialize};

/// Holds the single global rate new holders are locked into.
///
/// The rate can only be lowered. Which comparison counts as "lowered" is set
/// by the [`RatePolicy`] the registry was created with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestRateRegistry {
    current: Rate,
    policy: RatePolicy,
}

impl InterestRateRegistry {
    pub fn new(initial_rate: Rate, policy: RatePolicy) -> Self {
        Self {
            current: initial_rate,
            policy,
        }
    }

    pub fn global_rate(&self) -> Rate {
        self.current
    }

    pub fn policy(&self) -> RatePolicy {
        self.policy
    }

    /// Replace the global rate. Fails without touching state when the new rate
    /// is not permitted by the policy.
    pub fn set_global_rate(&mut self, new_rate: Rate) -> Result<(), LedgerError> {
        if !self.policy.permits(self.current, new_rate) {
            return Err(LedgerError::RateIncreaseRejected {
                current: self.current,
                requested: new_rate,
            });
        }
        self.current = new_rate;
        Ok(())
    }
}
