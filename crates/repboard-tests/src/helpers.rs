//! Shared test helpers for scenario and adversarial tests.

use std::sync::Arc;

use repboard_core::scoreboard::Scoreboard;
use repboard_core::store::{MemoryBalances, MemoryStore};
use repboard_core::types::Identity;

pub const AUTHORITY: Identity = Identity([0xAA; 32]);
pub const TOKEN: Identity = Identity([0xEE; 32]);

/// Deterministic identity from a seed byte.
pub fn id(seed: u8) -> Identity {
    Identity([seed; 32])
}

pub type MemoryBoard = Scoreboard<MemoryStore, Arc<MemoryBalances>>;

/// An initialized in-memory board whose `holders` each own one token.
///
/// The returned balances handle stays live: changes show up in later votes.
pub fn memory_board(
    cooldown_seconds: i64,
    threshold: i64,
    holders: &[Identity],
) -> (MemoryBoard, Arc<MemoryBalances>) {
    let balances = Arc::new(MemoryBalances::new());
    for holder in holders {
        balances.set(*holder, TOKEN, 1);
    }
    let mut board = Scoreboard::new(MemoryStore::new(), Arc::clone(&balances));
    board
        .initialize(AUTHORITY, TOKEN, cooldown_seconds, threshold)
        .expect("fresh board initializes");
    (board, balances)
}
