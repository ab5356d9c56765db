//! LMDB storage backend for the lockrate ledger.
//!
//! Implements the storage traits from `lockrate-store` using the `heed` LMDB
//! bindings. One environment holds a `holders` and a `meta` database.

pub mod environment;
pub mod error;
pub mod ledger;
pub mod migration;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use ledger::LmdbLedgerStore;
