//! Core scoreboard types: identities, records, and record batches.
//!
//! Reputation and timestamps are signed 64-bit integers. Timestamps are
//! Unix seconds supplied by the caller; nothing here reads a clock.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::constants::{IDENTITY_LEN, VOTE_DELTA};
use crate::error::{BoardError, IdentityError};

/// A 32-byte identity: voter, target, authority, or token.
///
/// Displayed and parsed as base58. Authentication happens before an
/// identity reaches the engine.
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, bincode::Encode, bincode::Decode,
)]
pub struct Identity(pub [u8; IDENTITY_LEN]);

/// Identifier of the fungible token that gates voting.
pub type TokenId = Identity;

impl Identity {
    /// The all-zero identity.
    pub const ZERO: Self = Self([0u8; IDENTITY_LEN]);

    pub fn from_bytes(bytes: [u8; IDENTITY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; IDENTITY_LEN] {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({self})")
    }
}

impl FromStr for Identity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| IdentityError::InvalidBase58(e.to_string()))?;
        let bytes: [u8; IDENTITY_LEN] = bytes
            .try_into()
            .map_err(|v: Vec<u8>| IdentityError::InvalidLength(v.len()))?;
        Ok(Self(bytes))
    }
}

impl From<[u8; IDENTITY_LEN]> for Identity {
    fn from(bytes: [u8; IDENTITY_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Identity {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Direction of a vote. Both directions share one cooldown clock per pair.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash,
    bincode::Encode, bincode::Decode,
)]
#[serde(rename_all = "snake_case")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// Signed reputation change for one accepted vote.
    pub fn delta(self) -> i64 {
        match self {
            Self::Up => VOTE_DELTA,
            Self::Down => -VOTE_DELTA,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "upvote",
            Self::Down => "downvote",
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Governance parameters. Created once by initialize, immutable afterwards.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct BoardConfig {
    /// Identity allowed to reset scores.
    pub authority: Identity,
    /// Token whose non-zero balance makes a voter eligible.
    pub token_identifier: TokenId,
    /// Minimum seconds between two accepted votes of one voter on one target.
    pub cooldown_seconds: i64,
    /// Reputation at or above which a target may unlock the top contributor role.
    pub top_contributor_threshold: i64,
}

impl BoardConfig {
    /// Build a config, rejecting negative cooldown or threshold.
    pub fn new(
        authority: Identity,
        token_identifier: TokenId,
        cooldown_seconds: i64,
        top_contributor_threshold: i64,
    ) -> Result<Self, BoardError> {
        if cooldown_seconds < 0 {
            return Err(BoardError::InvalidParameter {
                name: "cooldown_seconds",
                value: cooldown_seconds,
            });
        }
        if top_contributor_threshold < 0 {
            return Err(BoardError::InvalidParameter {
                name: "top_contributor_threshold",
                value: top_contributor_threshold,
            });
        }
        Ok(Self {
            authority,
            token_identifier,
            cooldown_seconds,
            top_contributor_threshold,
        })
    }

    pub fn is_authority(&self, caller: &Identity) -> bool {
        self.authority == *caller
    }

    pub fn meets_threshold(&self, reputation: i64) -> bool {
        reputation >= self.top_contributor_threshold
    }
}

/// Score record for one target, shared by all voters.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct ReputationEntry {
    pub subject: Identity,
    /// Net of accepted votes since the last reset. May be negative.
    pub reputation: i64,
    pub is_top_contributor: bool,
}

impl ReputationEntry {
    /// A fresh entry as created by the first vote on `subject`.
    pub fn new(subject: Identity) -> Self {
        Self {
            subject,
            reputation: 0,
            is_top_contributor: false,
        }
    }
}

/// Cooldown tracker for one ordered (voter, target) pair.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct VoteRecord {
    pub voter: Identity,
    pub target: Identity,
    /// Time of the last accepted vote, `None` before the first one.
    pub last_vote_at: Option<i64>,
}

impl VoteRecord {
    pub fn new(voter: Identity, target: Identity) -> Self {
        Self {
            voter,
            target,
            last_vote_at: None,
        }
    }

    /// Last accepted vote time, `0` if the pair never voted.
    pub fn last_vote_timestamp(&self) -> i64 {
        self.last_vote_at.unwrap_or(0)
    }

    pub fn has_voted(&self) -> bool {
        self.last_vote_at.is_some()
    }

    /// Earliest time at which the next vote is accepted, `None` if any time is.
    pub fn next_vote_at(&self, cooldown_seconds: i64) -> Option<i64> {
        self.last_vote_at
            .map(|last| last.saturating_add(cooldown_seconds))
    }
}

/// Storage key of a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordKey {
    /// The board singleton.
    Board,
    /// Reputation entry of a target.
    Entry(Identity),
    /// Cooldown record of a (voter, target) pair.
    Vote { voter: Identity, target: Identity },
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Board => f.write_str("board"),
            Self::Entry(target) => write!(f, "entry/{target}"),
            Self::Vote { voter, target } => write!(f, "vote/{voter}/{target}"),
        }
    }
}

/// A stored record of any kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Record {
    Board(BoardConfig),
    Entry(ReputationEntry),
    Vote(VoteRecord),
}

impl Record {
    /// The key this record belongs under.
    pub fn key(&self) -> RecordKey {
        match self {
            Self::Board(_) => RecordKey::Board,
            Self::Entry(entry) => RecordKey::Entry(entry.subject),
            Self::Vote(record) => RecordKey::Vote {
                voter: record.voter,
                target: record.target,
            },
        }
    }
}

/// A set of writes committed atomically by a [`RecordStore`](crate::traits::RecordStore).
///
/// Later writes to the same key win.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordBatch {
    writes: Vec<(RecordKey, Record)>,
}

impl RecordBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a write under an explicit key.
    pub fn put(&mut self, key: RecordKey, record: Record) -> &mut Self {
        self.writes.push((key, record));
        self
    }

    /// Queue a write under the record's own key.
    pub fn insert(&mut self, record: Record) -> &mut Self {
        let key = record.key();
        self.put(key, record)
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(RecordKey, Record)> {
        self.writes.iter()
    }

    /// Fail with the first write whose record kind does not match its key.
    pub fn check_keys(&self) -> Result<(), crate::error::StoreError> {
        for (key, record) in &self.writes {
            if record.key() != *key {
                return Err(crate::error::StoreError::RecordMismatch {
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl IntoIterator for RecordBatch {
    type Item = (RecordKey, Record);
    type IntoIter = std::vec::IntoIter<(RecordKey, Record)>;

    fn into_iter(self) -> Self::IntoIter {
        self.writes.into_iter()
    }
}
