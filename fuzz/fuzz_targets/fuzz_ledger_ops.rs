#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use lockrate_accrual::InterestLedger;
use lockrate_types::{AmountRequest, HolderId, Rate, Timestamp};

#[derive(Debug, Arbitrary)]
enum Op {
    SetRate(u64),
    Mint { holder: u8, amount: u64, rate: u64 },
    Burn { holder: u8, amount: Option<u64> },
    Transfer { from: u8, to: u8, amount: Option<u64> },
    Advance(u32),
}

fn holder(i: u8) -> HolderId {
    HolderId::new(format!("h{}", i % 8))
}

fn request(amount: Option<u64>) -> AmountRequest {
    amount.map_or(AmountRequest::All, |a| AmountRequest::Exact(a as u128))
}

// Arbitrary operation sequences must never panic, and principal must stay
// conserved whatever succeeds or fails.
fuzz_target!(|input: (u64, Vec<Op>)| {
    let (initial_rate, ops) = input;
    let mut ledger = InterestLedger::with_rate(Rate::from_raw(initial_rate as u128));
    let mut now = Timestamp::EPOCH;

    for op in ops {
        let _ = match op {
            Op::SetRate(r) => ledger.set_global_rate(Rate::from_raw(r as u128)).map(|_| ()),
            Op::Mint { holder: h, amount, rate } => ledger
                .mint(&holder(h), amount as u128, Rate::from_raw(rate as u128), now)
                .map(|_| ()),
            Op::Burn { holder: h, amount } => {
                ledger.burn(&holder(h), request(amount), now).map(|_| ())
            }
            Op::Transfer { from, to, amount } => ledger
                .transfer(&holder(from), &holder(to), request(amount), now)
                .map(|_| ()),
            Op::Advance(secs) => {
                now = now.checked_add_secs(secs as u64).unwrap_or(now);
                Ok(())
            }
        };
        assert!(ledger.check_conservation().is_ok());
    }
});
