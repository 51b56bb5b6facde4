//! # repboard-store — Persistence and ledger adapters for Repboard.
//!
//! - [`storage::RocksStore`] — [`RecordStore`](repboard_core::traits::RecordStore) backed by RocksDB
//! - [`balances::BalanceSnapshot`] — [`BalanceOracle`](repboard_core::traits::BalanceOracle) read from a JSON export

pub mod balances;
pub mod storage;

pub use balances::{BalanceSnapshot, SnapshotError};
pub use storage::RocksStore;
