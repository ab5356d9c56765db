//! Events emitted after ledger operations commit.

use lockrate_types::{HolderId, Rate, Timestamp};
use serde::Serialize;

/// Ledger-level events that observers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// Pending interest was folded into a holder's principal.
    InterestRealized {
        holder: HolderId,
        amount: u128,
        at: Timestamp,
    },
    /// New principal was created for a holder, locking them into `rate`.
    Minted {
        holder: HolderId,
        amount: u128,
        rate: Rate,
    },
    /// Principal was destroyed.
    Burned { holder: HolderId, amount: u128 },
    /// Principal moved between holders.
    Transferred {
        from: HolderId,
        to: HolderId,
        amount: u128,
    },
    /// An empty recipient took over the sender's rate.
    RateInherited {
        holder: HolderId,
        from: HolderId,
        rate: Rate,
    },
    /// The global rate was lowered (or re-set to the same value).
    GlobalRateLowered { from: Rate, to: Rate },
}

/// Synchronous fan-out event bus for ledger events.
///
/// Listeners are invoked inline on the emitting thread; keep handlers fast.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&LedgerEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&LedgerEvent) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn emit(&self, event: &LedgerEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn every_listener_sees_every_event() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        for _ in 0..2 {
            let sink = Arc::clone(&seen);
            bus.subscribe(move |e| sink.lock().unwrap().push(e.clone()));
        }
        bus.emit(&LedgerEvent::Burned {
            holder: HolderId::new("a"),
            amount: 3,
        });
        assert_eq!(bus.listener_count(), 2);
        assert_eq!(seen.lock().unwrap().len(), 2);
    }
}
