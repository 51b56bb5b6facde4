//! RocksDB-backed persistent record storage.
//!
//! Implements [`RecordStore`] using one column family per record kind.
//! Every commit is a single [`WriteBatch`], so the entry and vote record
//! written by a vote land together or not at all.

use std::path::Path;

use rocksdb::{ColumnFamilyDescriptor, IteratorMode, Options, WriteBatch, DB};

use repboard_core::error::StoreError;
use repboard_core::traits::RecordStore;
use repboard_core::types::{
    BoardConfig, Identity, Record, RecordBatch, RecordKey, ReputationEntry, VoteRecord,
};

// --- Column family names ---

const CF_BOARD: &str = "board";
const CF_ENTRIES: &str = "entries";
const CF_VOTES: &str = "votes";

/// All column family names.
const ALL_CFS: &[&str] = &[CF_BOARD, CF_ENTRIES, CF_VOTES];

/// Key of the board singleton inside [`CF_BOARD`].
const BOARD_KEY: &[u8] = b"board";

/// RocksDB-backed persistent record storage.
///
/// Values are bincode-encoded (standard config). Entry keys are the 32-byte
/// target; vote keys are `voter || target` (64 bytes).
pub struct RocksStore {
    db: DB,
}

impl RocksStore {
    /// Open or create a RocksDB database at the given path.
    ///
    /// Creates all column families if they don't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = ALL_CFS
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(*name, Options::default()))
            .collect();

        let db = DB::open_cf_descriptors(&db_opts, path.as_ref(), cf_descriptors)
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        tracing::debug!(path = %path.as_ref().display(), "opened record store");
        Ok(Self { db })
    }

    /// Flush all in-memory buffers to disk.
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db
            .flush()
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    /// Number of stored reputation entries.
    pub fn entry_count(&self) -> Result<usize, StoreError> {
        let cf = self.cf_handle(CF_ENTRIES)?;
        let mut count = 0;
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            item.map_err(|e| StoreError::Backend(e.to_string()))?;
            count += 1;
        }
        Ok(count)
    }

    // --- Internal helpers ---

    fn cf_handle(&self, name: &str) -> Result<&rocksdb::ColumnFamily, StoreError> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Backend(format!("missing column family: {name}")))
    }

    /// Column family and raw key for a record key.
    fn locate(key: &RecordKey) -> (&'static str, Vec<u8>) {
        match key {
            RecordKey::Board => (CF_BOARD, BOARD_KEY.to_vec()),
            RecordKey::Entry(target) => (CF_ENTRIES, target.as_bytes().to_vec()),
            RecordKey::Vote { voter, target } => (CF_VOTES, Self::vote_key(voter, target).to_vec()),
        }
    }

    /// Encode a vote key: voter || target.
    fn vote_key(voter: &Identity, target: &Identity) -> [u8; 64] {
        let mut key = [0u8; 64];
        key[0..32].copy_from_slice(voter.as_bytes());
        key[32..64].copy_from_slice(target.as_bytes());
        key
    }

    fn encode<T: bincode::Encode>(value: &T) -> Result<Vec<u8>, StoreError> {
        bincode::encode_to_vec(value, bincode::config::standard())
            .map_err(|e| StoreError::Codec(e.to_string()))
    }

    fn decode<T: bincode::Decode<()>>(bytes: &[u8]) -> Result<T, StoreError> {
        let (value, _) = bincode::decode_from_slice(bytes, bincode::config::standard())
            .map_err(|e| StoreError::Codec(e.to_string()))?;
        Ok(value)
    }

    fn encode_record(record: &Record) -> Result<Vec<u8>, StoreError> {
        match record {
            Record::Board(config) => Self::encode(config),
            Record::Entry(entry) => Self::encode(entry),
            Record::Vote(vote) => Self::encode(vote),
        }
    }

    fn decode_record(key: &RecordKey, bytes: &[u8]) -> Result<Record, StoreError> {
        Ok(match key {
            RecordKey::Board => Record::Board(Self::decode::<BoardConfig>(bytes)?),
            RecordKey::Entry(_) => Record::Entry(Self::decode::<ReputationEntry>(bytes)?),
            RecordKey::Vote { .. } => Record::Vote(Self::decode::<VoteRecord>(bytes)?),
        })
    }
}

impl RecordStore for RocksStore {
    fn get(&self, key: &RecordKey) -> Result<Option<Record>, StoreError> {
        let (cf_name, raw_key) = Self::locate(key);
        let cf = self.cf_handle(cf_name)?;
        match self
            .db
            .get_cf(&cf, raw_key)
            .map_err(|e| StoreError::Backend(e.to_string()))?
        {
            Some(bytes) => Ok(Some(Self::decode_record(key, &bytes)?)),
            None => Ok(None),
        }
    }

    fn commit(&mut self, batch: RecordBatch) -> Result<(), StoreError> {
        batch.check_keys()?;
        if batch.is_empty() {
            return Ok(());
        }

        let mut write = WriteBatch::default();
        for (key, record) in batch.iter() {
            let (cf_name, raw_key) = Self::locate(key);
            let cf = self.cf_handle(cf_name)?;
            write.put_cf(cf, raw_key, Self::encode_record(record)?);
        }

        let writes = write.len();
        self.db
            .write(write)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        tracing::trace!(writes, "committed record batch");
        Ok(())
    }

    fn iter_entries(&self) -> Result<Vec<ReputationEntry>, StoreError> {
        let cf = self.cf_handle(CF_ENTRIES)?;
        let mut entries = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_, value) = item.map_err(|e| StoreError::Backend(e.to_string()))?;
            entries.push(Self::decode::<ReputationEntry>(&value)?);
        }
        Ok(entries)
    }
}
