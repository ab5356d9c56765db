//! Nullable clock: deterministic time for testing.

use lockrate_types::{Clock, Timestamp};
use std::cell::Cell;

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to.
pub struct NullClock {
    current: Cell<u64>,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: Cell::new(initial_secs),
        }
    }

    /// Advance time by a number of seconds.
    pub fn advance(&self, secs: u64) {
        self.current.set(self.current.get() + secs);
    }

    /// Set the time to a specific value.
    pub fn set(&self, secs: u64) {
        self.current.set(secs);
    }
}

impl Clock for NullClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.current.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_moves_only_on_request() {
        let clock = NullClock::new(10);
        assert_eq!(clock.now(), Timestamp::new(10));
        clock.advance(5);
        assert_eq!(clock.now(), Timestamp::new(15));
        clock.set(3);
        assert_eq!(clock.now(), Timestamp::new(3));
    }
}
