//! # repboard-core
//! Foundation types, storage traits, and the vote engine for Repboard.
//!
//! - [`scoreboard::Scoreboard`] — entry points for initialize, vote, unlock, and reset
//! - [`vote::VoteProcessor`], [`unlock::RoleUnlocker`], [`reset::ScoreResetter`] — pure rule checks
//! - [`traits::RecordStore`], [`traits::BalanceOracle`] — external collaborators
//! - [`store::MemoryStore`], [`store::MemoryBalances`] — in-memory implementations for tests

pub mod constants;
pub mod error;
pub mod events;
pub mod reset;
pub mod scoreboard;
pub mod store;
pub mod traits;
pub mod types;
pub mod unlock;
pub mod vote;

pub use error::{BoardError, OracleError, ScoreboardError, StoreError};
pub use events::BoardEvent;
pub use scoreboard::Scoreboard;
pub use types::{BoardConfig, Identity, ReputationEntry, TokenId, VoteDirection, VoteRecord};
