//! Trait interfaces for the scoreboard's external collaborators.
//!
//! - [`RecordStore`] — durable records with atomic multi-key commit (repboard-store implements)
//! - [`BalanceOracle`] — read-only token balances from an external ledger

use std::sync::Arc;

use crate::error::{OracleError, StoreError};
use crate::types::{
    BoardConfig, Identity, Record, RecordBatch, RecordKey, ReputationEntry, TokenId, VoteRecord,
};

/// Keyed record storage.
///
/// Keys are the board singleton, a target (for reputation entries), and an
/// ordered (voter, target) pair (for vote records). Implementations must
/// apply a [`RecordBatch`] entirely or not at all.
///
/// Mutation takes `&mut self`; callers sharing a store across threads wrap
/// its owner in a `Mutex`.
pub trait RecordStore: Send + Sync {
    /// Look up a record. Returns `None` if the key was never written.
    fn get(&self, key: &RecordKey) -> Result<Option<Record>, StoreError>;

    /// Atomically apply every write in `batch`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::RecordMismatch`] if a record's kind does not fit its key;
    ///   nothing is written in that case
    /// - [`StoreError::Backend`] if the underlying storage fails
    fn commit(&mut self, batch: RecordBatch) -> Result<(), StoreError>;

    /// Write a single record.
    ///
    /// Default implementation commits a one-element batch.
    fn put(&mut self, key: RecordKey, record: Record) -> Result<(), StoreError> {
        let mut batch = RecordBatch::new();
        batch.put(key, record);
        self.commit(batch)
    }

    /// The board singleton, if initialized.
    fn board(&self) -> Result<Option<BoardConfig>, StoreError> {
        match self.get(&RecordKey::Board)? {
            Some(Record::Board(config)) => Ok(Some(config)),
            Some(_) => Err(mismatch(&RecordKey::Board)),
            None => Ok(None),
        }
    }

    /// The reputation entry of `target`, if any vote ever landed on it.
    fn entry(&self, target: &Identity) -> Result<Option<ReputationEntry>, StoreError> {
        let key = RecordKey::Entry(*target);
        match self.get(&key)? {
            Some(Record::Entry(entry)) => Ok(Some(entry)),
            Some(_) => Err(mismatch(&key)),
            None => Ok(None),
        }
    }

    /// The cooldown record of `(voter, target)`, if the pair ever voted.
    fn vote_record(
        &self,
        voter: &Identity,
        target: &Identity,
    ) -> Result<Option<VoteRecord>, StoreError> {
        let key = RecordKey::Vote {
            voter: *voter,
            target: *target,
        };
        match self.get(&key)? {
            Some(Record::Vote(record)) => Ok(Some(record)),
            Some(_) => Err(mismatch(&key)),
            None => Ok(None),
        }
    }

    /// Every stored reputation entry, in no particular order.
    fn iter_entries(&self) -> Result<Vec<ReputationEntry>, StoreError>;
}

fn mismatch(key: &RecordKey) -> StoreError {
    StoreError::RecordMismatch {
        key: key.to_string(),
    }
}

/// Read-only view of an external token ledger.
pub trait BalanceOracle: Send + Sync {
    /// Balance of `token` held by `owner`, in the token's smallest unit.
    fn balance_of(&self, owner: &Identity, token: &TokenId) -> Result<u64, OracleError>;
}

impl<T: BalanceOracle + ?Sized> BalanceOracle for Arc<T> {
    fn balance_of(&self, owner: &Identity, token: &TokenId) -> Result<u64, OracleError> {
        (**self).balance_of(owner, token)
    }
}

impl<T: BalanceOracle + ?Sized> BalanceOracle for &T {
    fn balance_of(&self, owner: &Identity, token: &TokenId) -> Result<u64, OracleError> {
        (**self).balance_of(owner, token)
    }
}
