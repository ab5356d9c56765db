//! Abstract storage traits for the lockrate ledger.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these traits.
//! The ledger depends only on the traits.

pub mod error;
pub mod ledger;
pub mod meta;

pub use error::StoreError;
pub use ledger::{LedgerStore, StoreSnapshot};
pub use meta::MetaStore;
