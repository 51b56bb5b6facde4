//! Error types for the Repboard scoreboard.
use thiserror::Error;

use crate::types::{Identity, TokenId};

/// A rule violation detected while validating a request.
///
/// Every variant is terminal: the operation that produced it wrote nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("board already initialized")] AlreadyInitialized,
    #[error("board not initialized")] NotInitialized,
    #[error("invalid parameter {name}: {value} must not be negative")] InvalidParameter { name: &'static str, value: i64 },
    #[error("Insufficient token balance to vote")] InsufficientTokenBalance,
    #[error("Cooldown period has not passed since last vote ({remaining}s remaining)")] CooldownNotElapsed { remaining: i64 },
    #[error("Insufficient reputation to unlock this role: have {have}, need {need}")] InsufficientReputation { have: i64, need: i64 },
    #[error("Not authorized to perform this action")] NotAuthorized,
    #[error("reputation entry not found: {0}")] EntryNotFound(Identity),
    #[error("reputation arithmetic overflow")] ArithmeticOverflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("storage backend: {0}")] Backend(String),
    #[error("record codec: {0}")] Codec(String),
    #[error("record type does not match key {key}")] RecordMismatch { key: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("balance oracle unavailable: {0}")] Unavailable(String),
    #[error("oracle does not track token {0}")] UnknownToken(TokenId),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("invalid base58: {0}")] InvalidBase58(String),
    #[error("invalid identity length: {0} bytes")] InvalidLength(usize),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoreboardError {
    #[error(transparent)] Board(#[from] BoardError),
    #[error(transparent)] Store(#[from] StoreError),
    #[error(transparent)] Oracle(#[from] OracleError),
}

impl ScoreboardError {
    /// The rule violation behind this error, if it is one.
    pub fn board_error(&self) -> Option<&BoardError> {
        match self {
            Self::Board(e) => Some(e),
            _ => None,
        }
    }

    /// Whether the same request may succeed later without changing its inputs.
    ///
    /// Only a pending cooldown clears on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Board(BoardError::CooldownNotElapsed { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_keep_distinguishable_phrases() {
        let cooldown = BoardError::CooldownNotElapsed { remaining: 3 }.to_string();
        assert!(cooldown.contains("Cooldown period has not passed since last vote"));
        assert!(BoardError::InsufficientTokenBalance.to_string().contains("Insufficient token balance"));
        assert!(BoardError::InsufficientReputation { have: 1, need: 3 }
            .to_string()
            .contains("Insufficient reputation"));
        assert!(BoardError::NotAuthorized.to_string().contains("Not authorized"));
    }

    #[test]
    fn transparent_wrapping_preserves_message() {
        let err: ScoreboardError = BoardError::NotAuthorized.into();
        assert_eq!(err.to_string(), BoardError::NotAuthorized.to_string());
        assert_eq!(err.board_error(), Some(&BoardError::NotAuthorized));
    }

    #[test]
    fn only_cooldown_is_retryable() {
        assert!(ScoreboardError::from(BoardError::CooldownNotElapsed { remaining: 1 }).is_retryable());
        assert!(!ScoreboardError::from(BoardError::InsufficientTokenBalance).is_retryable());
        assert!(!ScoreboardError::from(StoreError::Backend("io".into())).is_retryable());
    }

    #[test]
    fn store_errors_have_no_board_error() {
        let err: ScoreboardError = StoreError::Codec("bad".into()).into();
        assert!(err.board_error().is_none());
    }
}
