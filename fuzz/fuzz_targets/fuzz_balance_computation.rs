#![no_main]

use libfuzzer_sys::fuzz_target;

use lockrate_accrual::{AccrualEngine, HolderRecord};
use lockrate_types::{Rate, Timestamp};

// Displayed-balance computation with arbitrary principal, rate, and times.
// Must never panic; realization must either fail cleanly or agree with the
// checked balance.
fuzz_target!(|data: &[u8]| {
    if data.len() < 48 {
        return;
    }
    let word = |i: usize| {
        let mut buf = [0u8; 16];
        buf.copy_from_slice(&data[i..i + 16]);
        u128::from_le_bytes(buf)
    };

    let principal = word(0);
    let rate = Rate::from_raw(word(16));
    let times = word(32);
    let last = Timestamp::new(times as u64);
    let now = Timestamp::new((times >> 64) as u64);

    let record = HolderRecord::new(principal, rate, last);
    let checked = AccrualEngine::compute_displayed_balance_checked(&record, now);
    let saturated = AccrualEngine::compute_displayed_balance(&record, now);
    if let Some(balance) = checked {
        assert_eq!(balance, saturated);
        assert!(balance >= principal);
    }

    let mut realized = record;
    if AccrualEngine::realize_accrual(&mut realized, now).is_ok() {
        assert_eq!(Some(realized.principal), checked);
    } else {
        assert_eq!(realized, record);
    }
});
