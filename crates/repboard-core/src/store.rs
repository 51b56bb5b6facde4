//! In-memory record store and balance oracle.
//!
//! [`MemoryStore`] is suitable for tests and embedding; the persistent
//! store lives in repboard-store (RocksDB). [`MemoryBalances`] stands in
//! for the external token ledger.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::{OracleError, StoreError};
use crate::traits::{BalanceOracle, RecordStore};
use crate::types::{Identity, Record, RecordBatch, RecordKey, ReputationEntry, TokenId};

/// HashMap-backed [`RecordStore`].
///
/// A batch is checked in full before any write lands, so a rejected batch
/// leaves the map untouched.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: HashMap<RecordKey, Record>,
    commits: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of successful commits so far.
    pub fn commit_count(&self) -> u64 {
        self.commits
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, key: &RecordKey) -> Result<Option<Record>, StoreError> {
        Ok(self.records.get(key).cloned())
    }

    fn commit(&mut self, batch: RecordBatch) -> Result<(), StoreError> {
        batch.check_keys()?;
        self.records.extend(batch);
        self.commits += 1;
        Ok(())
    }

    fn iter_entries(&self) -> Result<Vec<ReputationEntry>, StoreError> {
        Ok(self
            .records
            .values()
            .filter_map(|record| match record {
                Record::Entry(entry) => Some(entry.clone()),
                _ => None,
            })
            .collect())
    }
}

/// Mutable in-memory token ledger.
///
/// Balances can be changed through a shared reference, so a test can hold
/// an `Arc<MemoryBalances>` next to the scoreboard that reads it.
#[derive(Debug, Default)]
pub struct MemoryBalances {
    balances: RwLock<HashMap<(Identity, TokenId), u64>>,
}

impl MemoryBalances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set`](Self::set).
    pub fn with_balance(self, owner: Identity, token: TokenId, amount: u64) -> Self {
        self.set(owner, token, amount);
        self
    }

    /// Overwrite the balance of `owner` in `token`.
    pub fn set(&self, owner: Identity, token: TokenId, amount: u64) {
        self.balances.write().insert((owner, token), amount);
    }

    /// Add `amount` to the balance, saturating at `u64::MAX`.
    pub fn credit(&self, owner: Identity, token: TokenId, amount: u64) {
        let mut balances = self.balances.write();
        let slot = balances.entry((owner, token)).or_insert(0);
        *slot = slot.saturating_add(amount);
    }
}

impl BalanceOracle for MemoryBalances {
    fn balance_of(&self, owner: &Identity, token: &TokenId) -> Result<u64, OracleError> {
        Ok(self
            .balances
            .read()
            .get(&(*owner, *token))
            .copied()
            .unwrap_or(0))
    }
}
