//! Events emitted by committed scoreboard operations.

use serde::{Deserialize, Serialize};

use crate::types::{Identity, TokenId, VoteDirection};

/// A state change that has been committed to the store.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BoardEvent {
    BoardInitialized {
        authority: Identity,
        token_identifier: TokenId,
        cooldown_seconds: i64,
        threshold: i64,
    },
    Voted {
        voter: Identity,
        target: Identity,
        direction: VoteDirection,
        new_score: i64,
    },
    /// Only emitted when the flag actually flips.
    RoleUnlocked {
        subject: Identity,
        role: String,
        reputation: i64,
    },
    ScoreReset {
        authority: Identity,
        target: Identity,
    },
}

impl BoardEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::BoardInitialized { .. } => "board_initialized",
            Self::Voted { .. } => "voted",
            Self::RoleUnlocked { .. } => "role_unlocked",
            Self::ScoreReset { .. } => "score_reset",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_tag_matches_name() {
        let event = BoardEvent::ScoreReset {
            authority: Identity([1; 32]),
            target: Identity([2; 32]),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], event.name());
        assert_eq!(json["target"], Identity([2; 32]).to_string());
    }

    #[test]
    fn voted_event_serializes_direction() {
        let event = BoardEvent::Voted {
            voter: Identity([1; 32]),
            target: Identity([2; 32]),
            direction: VoteDirection::Down,
            new_score: -1,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["direction"], "down");
        assert_eq!(json["new_score"], -1);
    }
}
