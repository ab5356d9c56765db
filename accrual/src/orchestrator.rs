//! Mint, burn, and transfer on top of lazy accrual.
//!
//! Every mutation follows the same shape: copy the touched records, realize
//! their pending interest at `now`, validate, apply the principal change, and
//! only then write the copies back. A failed check returns before anything in
//! the ledger has changed.

use crate::engine::AccrualEngine;
use crate::error::LedgerError;
use crate::events::{EventBus, LedgerEvent};
use crate::holders::HolderLedger;
use crate::record::HolderRecord;
use crate::registry::InterestRateRegistry;
use lockrate_types::{AmountRequest, HolderId, LedgerParams, Rate, Timestamp};

/// Outcome of a successful mutation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Receipt {
    /// Amount minted, burned, or moved after resolving [`AmountRequest::All`].
    pub amount: u128,
    /// Interest realized into principal across every touched holder. Callers
    /// keeping their own supply figure add this to it.
    pub interest_realized: u128,
}

/// The interest-bearing ledger: a rate registry plus a holder store, with the
/// accrual engine applied at every entry point.
#[derive(Debug)]
pub struct InterestLedger {
    pub(crate) registry: InterestRateRegistry,
    pub(crate) holders: HolderLedger,
    events: EventBus,
}

impl InterestLedger {
    pub fn new(params: &LedgerParams) -> Self {
        Self::from_parts(
            InterestRateRegistry::new(params.initial_rate, params.rate_policy),
            HolderLedger::new(),
        )
    }

    /// Ledger at `rate` under the default policy.
    pub fn with_rate(rate: Rate) -> Self {
        Self::new(&LedgerParams::with_rate(rate))
    }

    pub(crate) fn from_parts(registry: InterestRateRegistry, holders: HolderLedger) -> Self {
        Self {
            registry,
            holders,
            events: EventBus::new(),
        }
    }

    /// Register a listener for events emitted after each committed operation.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&LedgerEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(listener);
    }

    // ── Administrative ──────────────────────────────────────────────────

    pub fn set_global_rate(&mut self, new_rate: Rate) -> Result<(), LedgerError> {
        let previous = self.registry.global_rate();
        self.registry.set_global_rate(new_rate)?;
        tracing::info!(from = %previous, to = %new_rate, "global rate lowered");
        self.events.emit(&LedgerEvent::GlobalRateLowered {
            from: previous,
            to: new_rate,
        });
        Ok(())
    }

    // ── Mutations ───────────────────────────────────────────────────────

    /// Create `amount` of principal for `holder` and lock them into `rate`.
    ///
    /// The rate is stamped on every mint, whatever the holder's prior balance.
    pub fn mint(
        &mut self,
        holder: &HolderId,
        amount: u128,
        rate: Rate,
        now: Timestamp,
    ) -> Result<Receipt, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount(
                "mint amount must be non-zero".into(),
            ));
        }
        let mut record = self.holders.record(holder);
        let interest = AccrualEngine::realize_accrual(&mut record, now)?;
        record.locked_rate = rate;
        record.principal = record
            .principal
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        let total = self.adjusted_total(interest, amount, 0)?;

        self.holders.commit([(holder.clone(), record)], total);
        tracing::debug!(holder = %holder, amount, interest, rate = %rate, "minted");
        self.emit_realized(holder, interest, now);
        self.events.emit(&LedgerEvent::Minted {
            holder: holder.clone(),
            amount,
            rate,
        });
        Ok(Receipt {
            amount,
            interest_realized: interest,
        })
    }

    /// Mint at the current global rate.
    pub fn mint_at_global_rate(
        &mut self,
        holder: &HolderId,
        amount: u128,
        now: Timestamp,
    ) -> Result<Receipt, LedgerError> {
        self.mint(holder, amount, self.registry.global_rate(), now)
    }

    /// Destroy principal. [`AmountRequest::All`] burns the full displayed
    /// balance and leaves the holder at exactly zero.
    pub fn burn(
        &mut self,
        holder: &HolderId,
        request: AmountRequest,
        now: Timestamp,
    ) -> Result<Receipt, LedgerError> {
        reject_zero(request)?;
        let mut record = self.holders.record(holder);
        let interest = AccrualEngine::realize_accrual(&mut record, now)?;
        let amount = request.resolve(record.principal);
        debit(&mut record, amount)?;
        let total = self.adjusted_total(interest, 0, amount)?;

        self.holders.commit([(holder.clone(), record)], total);
        tracing::debug!(holder = %holder, amount, interest, "burned");
        self.emit_realized(holder, interest, now);
        self.events.emit(&LedgerEvent::Burned {
            holder: holder.clone(),
            amount,
        });
        Ok(Receipt {
            amount,
            interest_realized: interest,
        })
    }

    /// Move principal from `sender` to `recipient`.
    ///
    /// A recipient holding nothing after realization takes over the sender's
    /// locked rate; a recipient with a balance keeps its own.
    pub fn transfer(
        &mut self,
        sender: &HolderId,
        recipient: &HolderId,
        request: AmountRequest,
        now: Timestamp,
    ) -> Result<Receipt, LedgerError> {
        reject_zero(request)?;
        let mut from = self.holders.record(sender);
        let from_interest = AccrualEngine::realize_accrual(&mut from, now)?;
        let amount = request.resolve(from.principal);

        if sender == recipient {
            if amount > from.principal {
                return Err(insufficient(amount, from.principal));
            }
            let total = self.adjusted_total(from_interest, 0, 0)?;
            self.holders.commit([(sender.clone(), from)], total);
            self.emit_realized(sender, from_interest, now);
            return Ok(Receipt {
                amount,
                interest_realized: from_interest,
            });
        }

        let mut to = self.holders.record(recipient);
        let to_interest = AccrualEngine::realize_accrual(&mut to, now)?;
        debit(&mut from, amount)?;

        let inherits = to.is_empty() && amount > 0;
        if inherits {
            to.locked_rate = from.locked_rate;
        }
        to.principal = to
            .principal
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        let interest = from_interest
            .checked_add(to_interest)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        let total = self.adjusted_total(interest, 0, 0)?;

        self.holders
            .commit([(sender.clone(), from), (recipient.clone(), to)], total);
        tracing::debug!(
            from = %sender,
            to = %recipient,
            amount,
            interest,
            inherited = inherits,
            "transferred"
        );
        self.emit_realized(sender, from_interest, now);
        self.emit_realized(recipient, to_interest, now);
        if inherits {
            self.events.emit(&LedgerEvent::RateInherited {
                holder: recipient.clone(),
                from: sender.clone(),
                rate: to.locked_rate,
            });
        }
        self.events.emit(&LedgerEvent::Transferred {
            from: sender.clone(),
            to: recipient.clone(),
            amount,
        });
        Ok(Receipt {
            amount,
            interest_realized: interest,
        })
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn global_rate(&self) -> Rate {
        self.registry.global_rate()
    }

    pub fn registry(&self) -> &InterestRateRegistry {
        &self.registry
    }

    pub fn holders(&self) -> &HolderLedger {
        &self.holders
    }

    pub fn record(&self, holder: &HolderId) -> HolderRecord {
        self.holders.record(holder)
    }

    pub fn locked_rate(&self, holder: &HolderId) -> Rate {
        self.holders.locked_rate(holder)
    }

    /// Realized principal, excluding interest accrued since the last touch.
    pub fn principal_balance(&self, holder: &HolderId) -> u128 {
        self.holders.principal(holder)
    }

    /// Principal plus pending interest at `now`, saturating at `u128::MAX`.
    pub fn displayed_balance(&self, holder: &HolderId, now: Timestamp) -> u128 {
        AccrualEngine::compute_displayed_balance(&self.holders.record(holder), now)
    }

    pub fn displayed_balance_checked(
        &self,
        holder: &HolderId,
        now: Timestamp,
    ) -> Result<u128, LedgerError> {
        AccrualEngine::compute_displayed_balance_checked(&self.holders.record(holder), now)
            .ok_or(LedgerError::ArithmeticOverflow)
    }

    /// Sum of realized principal across all holders.
    pub fn total_principal(&self) -> u128 {
        self.holders.total_principal()
    }

    pub fn holder_count(&self) -> usize {
        self.holders.len()
    }

    /// Verify the tracked total against the sum of holder principals.
    pub fn check_conservation(&self) -> Result<(), LedgerError> {
        let recorded = self.holders.total_principal();
        let computed = self
            .holders
            .sum_principal()
            .ok_or(LedgerError::ArithmeticOverflow)?;
        if recorded != computed {
            return Err(LedgerError::ConservationViolated { recorded, computed });
        }
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn adjusted_total(&self, interest: u128, added: u128, removed: u128) -> Result<u128, LedgerError> {
        self.holders
            .total_principal()
            .checked_add(interest)
            .and_then(|t| t.checked_add(added))
            .and_then(|t| t.checked_sub(removed))
            .ok_or(LedgerError::ArithmeticOverflow)
    }

    fn emit_realized(&self, holder: &HolderId, amount: u128, at: Timestamp) {
        if amount > 0 {
            self.events.emit(&LedgerEvent::InterestRealized {
                holder: holder.clone(),
                amount,
                at,
            });
        }
    }
}

fn reject_zero(request: AmountRequest) -> Result<(), LedgerError> {
    if request == AmountRequest::Exact(0) {
        return Err(LedgerError::InvalidAmount("amount must be non-zero".into()));
    }
    Ok(())
}

fn insufficient(needed: u128, available: u128) -> LedgerError {
    LedgerError::InsufficientBalance { needed, available }
}

fn debit(record: &mut HolderRecord, amount: u128) -> Result<(), LedgerError> {
    let available = record.principal;
    record.principal = available
        .checked_sub(amount)
        .ok_or_else(|| insufficient(amount, available))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    const RATE: Rate = Rate::from_raw(50_000_000_000);

    fn id(name: &str) -> HolderId {
        HolderId::new(name)
    }

    fn t(secs: u64) -> Timestamp {
        Timestamp::new(secs)
    }

    fn ledger() -> InterestLedger {
        InterestLedger::with_rate(RATE)
    }

    #[test]
    fn deposit_scenario_accrues_linearly() {
        let mut l = ledger();
        let alice = id("alice");
        l.mint_at_global_rate(&alice, 1_000_000, t(0)).unwrap();

        assert_eq!(l.principal_balance(&alice), 1_000_000);
        assert_eq!(l.locked_rate(&alice), RATE);
        assert_eq!(l.displayed_balance(&alice, t(0)), 1_000_000);

        let first = l.displayed_balance(&alice, t(3600));
        let second = l.displayed_balance(&alice, t(7200));
        assert_eq!(first, 1_000_180);
        assert!((second - first).abs_diff(first - 1_000_000) <= 1);
        // queries never realize
        assert_eq!(l.principal_balance(&alice), 1_000_000);
    }

    #[test]
    fn mint_realizes_then_restamps_rate() {
        let mut l = ledger();
        let alice = id("alice");
        l.mint(&alice, 1_000_000, RATE, t(0)).unwrap();
        let low = Rate::from_raw(10_000_000_000);
        let receipt = l.mint(&alice, 500, low, t(3600)).unwrap();

        assert_eq!(receipt.interest_realized, 180);
        assert_eq!(l.principal_balance(&alice), 1_000_680);
        assert_eq!(l.locked_rate(&alice), low);
        assert_eq!(l.record(&alice).last_accrual, t(3600));
        assert_eq!(l.total_principal(), 1_000_680);
    }

    #[test]
    fn mint_zero_is_invalid() {
        let mut l = ledger();
        let err = l.mint(&id("a"), 0, RATE, t(0)).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));
        assert_eq!(l.holder_count(), 0);
    }

    #[test]
    fn mint_overflow_is_rejected_atomically() {
        let mut l = ledger();
        let a = id("a");
        l.mint(&a, u128::MAX - 5, Rate::ZERO, t(0)).unwrap();
        let err = l.mint(&a, 10, Rate::ZERO, t(1)).unwrap_err();
        assert!(matches!(err, LedgerError::ArithmeticOverflow));
        assert_eq!(l.principal_balance(&a), u128::MAX - 5);
        assert_eq!(l.record(&a).last_accrual, t(0));
    }

    #[test]
    fn burn_realizes_before_checking_balance() {
        let mut l = ledger();
        let a = id("a");
        l.mint(&a, 1_000_000, RATE, t(0)).unwrap();
        // 1_000_100 exceeds the minted principal but not the accrued balance
        let receipt = l.burn(&a, AmountRequest::Exact(1_000_100), t(3600)).unwrap();
        assert_eq!(receipt.interest_realized, 180);
        assert_eq!(l.principal_balance(&a), 80);
        assert_eq!(l.total_principal(), 80);
    }

    #[test]
    fn burn_more_than_balance_fails_without_mutation() {
        let mut l = ledger();
        let a = id("a");
        l.mint(&a, 1_000, RATE, t(0)).unwrap();
        let err = l.burn(&a, AmountRequest::Exact(2_000), t(3600)).unwrap_err();
        match err {
            LedgerError::InsufficientBalance { needed, available } => {
                assert_eq!(needed, 2_000);
                assert_eq!(available, 1_000);
            }
            other => panic!("expected InsufficientBalance, got {other:?}"),
        }
        // accrual was not realized either
        assert_eq!(l.record(&a).last_accrual, t(0));
        assert_eq!(l.principal_balance(&a), 1_000);
    }

    #[test]
    fn burn_all_leaves_exactly_zero() {
        let mut l = ledger();
        let a = id("a");
        l.mint(&a, 1_000_000, RATE, t(0)).unwrap();
        let expected = l.displayed_balance(&a, t(86_400));
        let receipt = l.burn(&a, AmountRequest::All, t(86_400)).unwrap();
        assert_eq!(receipt.amount, expected);
        assert_eq!(l.principal_balance(&a), 0);
        assert_eq!(l.displayed_balance(&a, t(200_000)), 0);
        assert_eq!(l.total_principal(), 0);
    }

    #[test]
    fn burn_all_on_empty_holder_is_a_noop() {
        let mut l = ledger();
        let receipt = l.burn(&id("ghost"), AmountRequest::All, t(10)).unwrap();
        assert_eq!(receipt, Receipt::default());
        assert!(matches!(
            l.burn(&id("ghost"), AmountRequest::Exact(0), t(10)),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn transfer_all_to_empty_holder_inherits_rate() {
        let mut l = ledger();
        let (a, b) = (id("a"), id("b"));
        let r1 = Rate::from_raw(70_000_000_000);
        l.mint(&a, 1_000_000, r1, t(0)).unwrap();
        l.set_global_rate(Rate::from_raw(1)).unwrap();

        let receipt = l.transfer(&a, &b, AmountRequest::All, t(3600)).unwrap();
        assert_eq!(receipt.amount, 1_000_252);
        assert_eq!(l.principal_balance(&a), 0);
        assert_eq!(l.principal_balance(&b), 1_000_252);
        assert_eq!(l.locked_rate(&b), r1);
    }

    #[test]
    fn empty_transfer_leaves_empty_recipient_rate_alone() {
        let mut l = ledger();
        let (a, b) = (id("a"), id("b"));
        let ra = Rate::from_raw(10_000_000_000);
        let rb = Rate::from_raw(40_000_000_000);
        l.mint(&a, 100, ra, t(0)).unwrap();
        l.burn(&a, AmountRequest::All, t(0)).unwrap();
        l.mint(&b, 100, rb, t(0)).unwrap();
        l.burn(&b, AmountRequest::All, t(0)).unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        l.subscribe(move |e| sink.lock().unwrap().push(e.clone()));

        let receipt = l.transfer(&a, &b, AmountRequest::All, t(10)).unwrap();
        assert_eq!(receipt.amount, 0);
        assert_eq!(l.locked_rate(&b), rb);
        assert!(!seen
            .lock()
            .unwrap()
            .iter()
            .any(|e| matches!(e, LedgerEvent::RateInherited { .. })));
    }

    #[test]
    fn transfer_into_funded_holder_keeps_its_rate() {
        let mut l = ledger();
        let (a, b) = (id("a"), id("b"));
        let high = Rate::from_raw(90_000_000_000);
        let low = Rate::from_raw(1_000_000_000);
        l.mint(&a, 5_000, low, t(0)).unwrap();
        l.mint(&b, 5_000, high, t(0)).unwrap();
        l.transfer(&a, &b, AmountRequest::Exact(1_000), t(10)).unwrap();
        assert_eq!(l.locked_rate(&b), high);
        assert_eq!(l.locked_rate(&a), low);
    }

    #[test]
    fn transfer_realizes_both_sides() {
        let mut l = ledger();
        let (a, b) = (id("a"), id("b"));
        l.mint(&a, 1_000_000, RATE, t(0)).unwrap();
        l.mint(&b, 2_000_000, RATE, t(0)).unwrap();
        let receipt = l.transfer(&a, &b, AmountRequest::Exact(100), t(3600)).unwrap();
        assert_eq!(receipt.interest_realized, 180 + 360);
        assert_eq!(l.principal_balance(&a), 1_000_080);
        assert_eq!(l.principal_balance(&b), 2_000_460);
        assert_eq!(l.total_principal(), 3_000_540);
        l.check_conservation().unwrap();
    }

    #[test]
    fn failed_transfer_touches_neither_side() {
        let mut l = ledger();
        let (a, b) = (id("a"), id("b"));
        l.mint(&a, 100, RATE, t(0)).unwrap();
        l.mint(&b, 100, RATE, t(0)).unwrap();
        let before = (l.record(&a), l.record(&b));
        assert!(l.transfer(&a, &b, AmountRequest::Exact(101), t(50)).is_err());
        assert_eq!((l.record(&a), l.record(&b)), before);
    }

    #[test]
    fn self_transfer_moves_nothing() {
        let mut l = ledger();
        let a = id("a");
        l.mint(&a, 1_000_000, RATE, t(0)).unwrap();
        let receipt = l.transfer(&a, &a, AmountRequest::Exact(10), t(3600)).unwrap();
        assert_eq!(receipt.amount, 10);
        assert_eq!(l.principal_balance(&a), 1_000_180);
        assert!(l.transfer(&a, &a, AmountRequest::Exact(2_000_000), t(3600)).is_err());
    }

    #[test]
    fn clock_regression_is_rejected() {
        let mut l = ledger();
        let a = id("a");
        l.mint(&a, 10, RATE, t(100)).unwrap();
        assert!(matches!(
            l.burn(&a, AmountRequest::Exact(1), t(99)),
            Err(LedgerError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn rate_raise_is_rejected() {
        let mut l = ledger();
        let err = l
            .set_global_rate(Rate::from_raw(RATE.raw() + 1))
            .unwrap_err();
        assert!(matches!(err, LedgerError::RateIncreaseRejected { .. }));
        assert_eq!(l.global_rate(), RATE);
    }

    #[test]
    fn events_follow_commit_order() {
        let mut l = ledger();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        l.subscribe(move |e| sink.lock().unwrap().push(e.clone()));

        let (a, b) = (id("a"), id("b"));
        l.mint(&a, 1_000_000, RATE, t(0)).unwrap();
        l.transfer(&a, &b, AmountRequest::Exact(10), t(3600)).unwrap();
        // failed operations emit nothing
        let _ = l.burn(&b, AmountRequest::Exact(1_000), t(3600));

        let events = seen.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                LedgerEvent::Minted {
                    holder: a.clone(),
                    amount: 1_000_000,
                    rate: RATE
                },
                LedgerEvent::InterestRealized {
                    holder: a.clone(),
                    amount: 180,
                    at: t(3600)
                },
                LedgerEvent::RateInherited {
                    holder: b.clone(),
                    from: a.clone(),
                    rate: RATE
                },
                LedgerEvent::Transferred {
                    from: a,
                    to: b,
                    amount: 10
                },
            ]
        );
    }
}
