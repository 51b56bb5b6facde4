//! Scoreboard entry points.
//!
//! Each operation loads the records it needs, runs the matching rule
//! component, and commits the resulting writes as one [`RecordBatch`].
//! A rejected operation commits nothing and emits no event.

use std::collections::VecDeque;

use tracing::{debug, info};

use crate::constants::{MAX_EVENTS, ROLE_TOP_CONTRIBUTOR};
use crate::error::{BoardError, ScoreboardError};
use crate::events::BoardEvent;
use crate::reset::ScoreResetter;
use crate::traits::{BalanceOracle, RecordStore};
use crate::types::{
    BoardConfig, Identity, Record, RecordBatch, ReputationEntry, TokenId, VoteDirection,
    VoteRecord,
};
use crate::unlock::RoleUnlocker;
use crate::vote::{VoteProcessor, VoteRequest};

/// The reputation board over a record store and a balance oracle.
///
/// Operations take `&mut self` and are therefore serialized per board.
/// Share a board across threads with `Arc<parking_lot::Mutex<Scoreboard<..>>>`.
///
/// The event journal keeps the latest [`MAX_EVENTS`] events.
pub struct Scoreboard<S, O> {
    store: S,
    oracle: O,
    events: VecDeque<BoardEvent>,
}

impl<S: RecordStore, O: BalanceOracle> Scoreboard<S, O> {
    pub fn new(store: S, oracle: O) -> Self {
        Self {
            store,
            oracle,
            events: VecDeque::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn into_parts(self) -> (S, O) {
        (self.store, self.oracle)
    }

    // ------------------------------------------------------------------
    // Mutating operations
    // ------------------------------------------------------------------

    /// Create the board singleton with `authority` as its owner.
    ///
    /// # Errors
    ///
    /// - [`BoardError::AlreadyInitialized`] if a board exists
    /// - [`BoardError::InvalidParameter`] on a negative cooldown or threshold
    pub fn initialize(
        &mut self,
        authority: Identity,
        token_identifier: TokenId,
        cooldown_seconds: i64,
        top_contributor_threshold: i64,
    ) -> Result<BoardConfig, ScoreboardError> {
        if self.store.board()?.is_some() {
            debug!(%authority, "initialize rejected: board exists");
            return Err(BoardError::AlreadyInitialized.into());
        }
        let config = BoardConfig::new(
            authority,
            token_identifier,
            cooldown_seconds,
            top_contributor_threshold,
        )?;

        let mut batch = RecordBatch::new();
        batch.insert(Record::Board(config.clone()));
        self.store.commit(batch)?;

        info!(
            %authority,
            token = %token_identifier,
            cooldown_seconds,
            top_contributor_threshold,
            "board initialized"
        );
        self.record_event(BoardEvent::BoardInitialized {
            authority,
            token_identifier,
            cooldown_seconds,
            threshold: top_contributor_threshold,
        });
        Ok(config)
    }

    /// Cast a vote from `voter` on `target` at `current_time`.
    ///
    /// Creates the target's entry and the pair's vote record on first use.
    /// Both are written in one commit.
    ///
    /// # Errors
    ///
    /// - [`BoardError::NotInitialized`] if no board exists
    /// - [`BoardError::InsufficientTokenBalance`] if the voter holds none of the token
    /// - [`BoardError::CooldownNotElapsed`] if the pair voted too recently
    /// - [`BoardError::ArithmeticOverflow`] at the limits of `i64`
    pub fn vote(
        &mut self,
        voter: Identity,
        target: Identity,
        direction: VoteDirection,
        current_time: i64,
    ) -> Result<ReputationEntry, ScoreboardError> {
        let config = self.load_board()?;
        let entry = self
            .store
            .entry(&target)?
            .unwrap_or_else(|| ReputationEntry::new(target));
        let record = self
            .store
            .vote_record(&voter, &target)?
            .unwrap_or_else(|| VoteRecord::new(voter, target));
        let balance = self.oracle.balance_of(&voter, &config.token_identifier)?;

        let request = VoteRequest {
            voter,
            target,
            direction,
            current_time,
        };
        let (entry, record) = VoteProcessor::new(&config)
            .process(&request, balance, entry, record)
            .inspect_err(|e| {
                debug!(%voter, %target, %direction, current_time, "vote rejected: {e}");
            })?;

        let mut batch = RecordBatch::new();
        batch
            .insert(Record::Entry(entry.clone()))
            .insert(Record::Vote(record));
        self.store.commit(batch)?;

        info!(%voter, %target, %direction, score = entry.reputation, "vote accepted");
        self.record_event(BoardEvent::Voted {
            voter,
            target,
            direction,
            new_score: entry.reputation,
        });
        Ok(entry)
    }

    pub fn upvote(
        &mut self,
        voter: Identity,
        target: Identity,
        current_time: i64,
    ) -> Result<ReputationEntry, ScoreboardError> {
        self.vote(voter, target, VoteDirection::Up, current_time)
    }

    pub fn downvote(
        &mut self,
        voter: Identity,
        target: Identity,
        current_time: i64,
    ) -> Result<ReputationEntry, ScoreboardError> {
        self.vote(voter, target, VoteDirection::Down, current_time)
    }

    /// Grant `target` the top contributor role if its reputation allows.
    ///
    /// Idempotent: a second call on an unlocked entry succeeds without a write.
    ///
    /// # Errors
    ///
    /// - [`BoardError::NotInitialized`] if no board exists
    /// - [`BoardError::EntryNotFound`] if nobody ever voted on `target`
    /// - [`BoardError::InsufficientReputation`] below the threshold
    pub fn unlock_role(&mut self, target: Identity) -> Result<ReputationEntry, ScoreboardError> {
        let config = self.load_board()?;
        let entry = self.load_entry(&target)?;

        let (entry, newly_unlocked) = RoleUnlocker::new(&config)
            .unlock(entry)
            .inspect_err(|e| debug!(%target, "unlock rejected: {e}"))?;
        if !newly_unlocked {
            return Ok(entry);
        }

        let mut batch = RecordBatch::new();
        batch.insert(Record::Entry(entry.clone()));
        self.store.commit(batch)?;

        info!(%target, reputation = entry.reputation, role = ROLE_TOP_CONTRIBUTOR, "role unlocked");
        self.record_event(BoardEvent::RoleUnlocked {
            subject: target,
            role: ROLE_TOP_CONTRIBUTOR.to_string(),
            reputation: entry.reputation,
        });
        Ok(entry)
    }

    /// Zero `target`'s score and clear its role. Only the board authority may.
    ///
    /// # Errors
    ///
    /// - [`BoardError::NotInitialized`] if no board exists
    /// - [`BoardError::NotAuthorized`] unless `caller` is the authority
    /// - [`BoardError::EntryNotFound`] if nobody ever voted on `target`
    pub fn reset_score(
        &mut self,
        caller: Identity,
        target: Identity,
    ) -> Result<ReputationEntry, ScoreboardError> {
        let config = self.load_board()?;
        // Authority is checked before the entry lookup.
        let granted = ScoreResetter::new(&config)
            .authorize(&caller)
            .inspect_err(|e| debug!(%caller, %target, "reset rejected: {e}"))?;
        let entry = granted.reset(self.load_entry(&target)?);

        let mut batch = RecordBatch::new();
        batch.insert(Record::Entry(entry.clone()));
        self.store.commit(batch)?;

        info!(authority = %caller, %target, "score reset");
        self.record_event(BoardEvent::ScoreReset {
            authority: caller,
            target,
        });
        Ok(entry)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn board(&self) -> Result<Option<BoardConfig>, ScoreboardError> {
        Ok(self.store.board()?)
    }

    pub fn entry(&self, target: &Identity) -> Result<Option<ReputationEntry>, ScoreboardError> {
        Ok(self.store.entry(target)?)
    }

    pub fn vote_record(
        &self,
        voter: &Identity,
        target: &Identity,
    ) -> Result<Option<VoteRecord>, ScoreboardError> {
        Ok(self.store.vote_record(voter, target)?)
    }

    /// Earliest time at which `voter` may vote on `target` again.
    ///
    /// `None` if the pair has never voted, meaning any time is accepted.
    pub fn next_vote_at(
        &self,
        voter: &Identity,
        target: &Identity,
    ) -> Result<Option<i64>, ScoreboardError> {
        let config = self.load_board()?;
        Ok(self
            .store
            .vote_record(voter, target)?
            .and_then(|record| record.next_vote_at(config.cooldown_seconds)))
    }

    /// Entries ordered by reputation, highest first, at most `limit` of them.
    pub fn leaderboard(&self, limit: usize) -> Result<Vec<ReputationEntry>, ScoreboardError> {
        let mut entries = self.store.iter_entries()?;
        entries.sort_by(|a, b| {
            b.reputation
                .cmp(&a.reputation)
                .then_with(|| a.subject.cmp(&b.subject))
        });
        entries.truncate(limit);
        Ok(entries)
    }

    /// Events of committed operations, oldest first.
    pub fn events(&self) -> &VecDeque<BoardEvent> {
        &self.events
    }

    /// Drain the event journal.
    pub fn take_events(&mut self) -> Vec<BoardEvent> {
        self.events.drain(..).collect()
    }

    fn record_event(&mut self, event: BoardEvent) {
        if self.events.len() == MAX_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    fn load_board(&self) -> Result<BoardConfig, ScoreboardError> {
        self.store
            .board()?
            .ok_or_else(|| BoardError::NotInitialized.into())
    }

    fn load_entry(&self, target: &Identity) -> Result<ReputationEntry, ScoreboardError> {
        self.store
            .entry(target)?
            .ok_or_else(|| BoardError::EntryNotFound(*target).into())
    }
}
